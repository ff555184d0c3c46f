use crate::core::{ApplicationHandle, CandidateList, RegistryEvent};
use crate::macos::WorkspaceWatcher;
use objc2_foundation::MainThreadMarker;

/// Trait for enumerating and activating running applications.
/// This abstraction allows mocking in tests.
pub trait ApplicationRegistry {
    /// Handle that keeps a subscription alive; dropping it unsubscribes.
    type Subscription;

    /// Switchable applications in the registry's enumeration order
    fn list_running(&self) -> Vec<ApplicationHandle>;
    /// Bring an application to the front. Returns false if the OS refused.
    fn activate(&self, app: &ApplicationHandle) -> bool;
    /// Deliver launch/terminate/activate notifications to `on_event`.
    fn subscribe(&self, on_event: Box<dyn Fn(RegistryEvent)>) -> Self::Subscription;
}

/// macOS implementation of ApplicationRegistry backed by NSWorkspace
pub struct MacOSApplicationRegistry {
    mtm: MainThreadMarker,
}

impl MacOSApplicationRegistry {
    pub fn new(mtm: MainThreadMarker) -> Self {
        Self { mtm }
    }
}

impl ApplicationRegistry for MacOSApplicationRegistry {
    type Subscription = WorkspaceWatcher;

    fn list_running(&self) -> Vec<ApplicationHandle> {
        crate::macos::running_applications()
    }

    fn activate(&self, app: &ApplicationHandle) -> bool {
        crate::macos::activate_application(app.pid)
    }

    fn subscribe(&self, on_event: Box<dyn Fn(RegistryEvent)>) -> WorkspaceWatcher {
        WorkspaceWatcher::new(on_event, self.mtm)
    }
}

/// Receives session state changes and renders them.
pub trait SessionHost {
    fn present(&self, candidates: &CandidateList, selected: usize);
    fn update_selection(&self, selected: usize);
    fn dismiss(&self);
}

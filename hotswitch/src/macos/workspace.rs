use objc2::rc::Retained;
use objc2::runtime::AnyObject;
use objc2::{define_class, msg_send, sel, DefinedClass};
use objc2_app_kit::{NSRunningApplication, NSWorkspace};
use objc2_foundation::{MainThreadMarker, NSNotification, NSObject, NSObjectProtocol, NSString};
use std::cell::RefCell;

use super::running_apps::{app_id_of, handle_from_running_app};
use crate::core::RegistryEvent;

type Callback = Box<dyn Fn(RegistryEvent)>;

struct Ivars {
    on_event: RefCell<Option<Callback>>,
}

define_class!(
    #[unsafe(super(NSObject))]
    #[ivars = Ivars]
    struct WorkspaceObserver;

    unsafe impl NSObjectProtocol for WorkspaceObserver {}

    impl WorkspaceObserver {
        #[unsafe(method(appLaunched:))]
        fn app_launched(&self, notification: &NSNotification) {
            if let Some(handle) = app_from_notification(notification)
                .as_deref()
                .and_then(handle_from_running_app)
            {
                tracing::debug!("App launched: {} (pid {})", handle.id, handle.pid);
                self.deliver(RegistryEvent::Launched(handle));
            }
        }

        #[unsafe(method(appTerminated:))]
        fn app_terminated(&self, notification: &NSNotification) {
            if let Some(app) = app_from_notification(notification) {
                let id = app_id_of(&app);
                tracing::debug!("App terminated: {}", id);
                self.deliver(RegistryEvent::Terminated(id));
            }
        }

        #[unsafe(method(appActivated:))]
        fn app_activated(&self, notification: &NSNotification) {
            if let Some(handle) = app_from_notification(notification)
                .as_deref()
                .and_then(handle_from_running_app)
            {
                tracing::debug!("App activated: {} (pid {})", handle.id, handle.pid);
                self.deliver(RegistryEvent::Activated(handle));
            }
        }
    }
);

fn app_from_notification(notification: &NSNotification) -> Option<Retained<NSRunningApplication>> {
    unsafe {
        let user_info = notification.userInfo()?;
        let key = NSString::from_str("NSWorkspaceApplicationKey");
        msg_send![&user_info, objectForKey: &*key]
    }
}

impl WorkspaceObserver {
    fn new(on_event: Callback, mtm: MainThreadMarker) -> Retained<Self> {
        let this = mtm.alloc::<Self>();
        let this = this.set_ivars(Ivars {
            on_event: RefCell::new(Some(on_event)),
        });
        unsafe { msg_send![super(this), init] }
    }

    fn deliver(&self, event: RegistryEvent) {
        if let Some(on_event) = self.ivars().on_event.borrow().as_ref() {
            on_event(event);
        }
    }
}

/// Subscription to NSWorkspace app lifecycle notifications.
/// Dropping it removes the observer from the notification center.
pub struct WorkspaceWatcher {
    observer: Retained<WorkspaceObserver>,
}

impl WorkspaceWatcher {
    pub fn new(on_event: Callback, mtm: MainThreadMarker) -> Self {
        let observer = WorkspaceObserver::new(on_event, mtm);

        unsafe {
            let workspace = NSWorkspace::sharedWorkspace();
            let center = workspace.notificationCenter();

            let names = [
                ("NSWorkspaceDidLaunchApplicationNotification", sel!(appLaunched:)),
                ("NSWorkspaceDidTerminateApplicationNotification", sel!(appTerminated:)),
                ("NSWorkspaceDidActivateApplicationNotification", sel!(appActivated:)),
            ];

            let observer_obj: &AnyObject =
                std::mem::transmute::<&WorkspaceObserver, &AnyObject>(&*observer);

            for (name, selector) in names {
                let name = NSString::from_str(name);
                center.addObserver_selector_name_object(observer_obj, selector, Some(&name), None);
            }
        }

        tracing::info!("Workspace watcher started");

        Self { observer }
    }
}

impl Drop for WorkspaceWatcher {
    fn drop(&mut self) {
        unsafe {
            let center = NSWorkspace::sharedWorkspace().notificationCenter();
            let observer_obj: &AnyObject =
                std::mem::transmute::<&WorkspaceObserver, &AnyObject>(&*self.observer);
            center.removeObserver(observer_obj);
        }
        self.observer.ivars().on_event.borrow_mut().take();
        tracing::info!("Workspace watcher stopped");
    }
}

use objc2_app_kit::{
    NSApplicationActivationOptions, NSApplicationActivationPolicy, NSRunningApplication,
    NSWorkspace,
};

use crate::core::{AppId, ApplicationHandle};

/// Regular (Dock-visible) applications in workspace enumeration order.
pub fn running_applications() -> Vec<ApplicationHandle> {
    let apps = unsafe { NSWorkspace::sharedWorkspace().runningApplications() };
    apps.iter()
        .filter_map(|app| handle_from_running_app(&app))
        .collect()
}

/// Bring the application with `pid` to the front, ignoring other apps.
pub fn activate_application(pid: i32) -> bool {
    let Some(app) = (unsafe { NSRunningApplication::runningApplicationWithProcessIdentifier(pid) })
    else {
        tracing::warn!("No running application with pid {}", pid);
        return false;
    };

    #[allow(deprecated)]
    let activated = unsafe {
        app.activateWithOptions(NSApplicationActivationOptions::ActivateIgnoringOtherApps)
    };
    if !activated {
        tracing::warn!("Failed to activate application (pid {})", pid);
    }
    activated
}

pub(crate) fn app_id_of(app: &NSRunningApplication) -> AppId {
    match unsafe { app.bundleIdentifier() } {
        Some(bundle_id) => AppId::new(bundle_id.to_string()),
        None => AppId::for_pid(unsafe { app.processIdentifier() }),
    }
}

pub(crate) fn handle_from_running_app(app: &NSRunningApplication) -> Option<ApplicationHandle> {
    unsafe {
        if app.activationPolicy() != NSApplicationActivationPolicy::Regular {
            return None;
        }

        let id = app_id_of(app);
        let name = app
            .localizedName()
            .map(|n| n.to_string())
            .unwrap_or_else(|| id.to_string());
        let icon_path = app
            .bundleURL()
            .and_then(|url| url.path())
            .map(|p| p.to_string());

        Some(ApplicationHandle {
            id,
            name,
            icon_path,
            pid: app.processIdentifier(),
        })
    }
}

use std::fmt;

/// Stable application identity (bundle identifier).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AppId(String);

impl AppId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identity for an application without a bundle identifier
    pub fn for_pid(pid: i32) -> Self {
        Self(format!("pid:{}", pid))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AppId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for AppId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A running, switchable application as reported by the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationHandle {
    pub id: AppId,
    pub name: String,
    /// Bundle path; renderers load the icon from it.
    pub icon_path: Option<String>,
    pub pid: i32,
}

impl ApplicationHandle {
    pub fn new(id: impl Into<AppId>, name: impl Into<String>, pid: i32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icon_path: None,
            pid,
        }
    }

    pub fn with_icon_path(mut self, path: impl Into<String>) -> Self {
        self.icon_path = Some(path.into());
        self
    }
}

/// Notifications delivered by the application registry.
#[derive(Debug, Clone)]
pub enum RegistryEvent {
    Launched(ApplicationHandle),
    Terminated(AppId),
    Activated(ApplicationHandle),
}

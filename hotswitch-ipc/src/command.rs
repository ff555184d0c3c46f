use serde::{Deserialize, Serialize};

use crate::ModifierKey;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    // Pinned apps
    Pin { app_id: String },
    Unpin { app_id: String },
    TogglePin { app_id: String },
    MovePin { app_id: String, index: usize },
    SetPinned { app_ids: Vec<String> },
    ListPinned,

    // Settings
    SetModifier { modifier: ModifierKey },

    // Queries
    ListApps,
    GetState,

    // Switching
    SwitchTo { app_id: String },
    CancelSession,

    // Control
    Quit,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    Ok,
    Error { message: String },
    Pinned { app_ids: Vec<String> },
    Apps { apps: Vec<AppInfo> },
    State { state: StateInfo },
}

/// A running application as listed by `list_apps`, in switcher order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppInfo {
    pub app_id: String,
    pub name: String,
    pub pid: i32,
    pub icon_path: Option<String>,
    pub is_pinned: bool,
    /// Seconds since the Unix epoch, `None` when never seen active.
    pub last_activated: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateInfo {
    pub modifier: ModifierKey,
    pub shortcut: String,
    pub session_open: bool,
    pub selected_index: Option<usize>,
    pub candidate_count: usize,
    pub pinned_count: usize,
    pub running_count: usize,
}

use serde::{Deserialize, Serialize};

/// Request sent by a subscriber when it connects to the event socket
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubscribeRequest {
    /// Whether to send the current session state on connection
    #[serde(default)]
    pub snapshot: bool,
}

impl SubscribeRequest {
    /// Create a subscribe request with snapshot enabled
    pub fn with_snapshot() -> Self {
        Self { snapshot: true }
    }
}

/// One entry of the candidate list shown by a session renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateInfo {
    pub app_id: String,
    pub name: String,
    pub pid: i32,
    pub icon_path: Option<String>,
    pub is_pinned: bool,
}

/// Switch session events sent to subscribers.
/// A renderer draws the list on `session_presented`, moves its highlight on
/// `selection_changed` and hides on `session_dismissed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    SessionPresented {
        candidates: Vec<CandidateInfo>,
        selected: usize,
    },
    SelectionChanged {
        selected: usize,
    },
    SessionDismissed,
    /// Current state, sent once on connection when a snapshot was requested.
    Snapshot {
        candidates: Vec<CandidateInfo>,
        selected: Option<usize>,
    },
}

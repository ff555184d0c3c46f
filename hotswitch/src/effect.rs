use crate::core::{AppId, ApplicationHandle, CandidateList};

use hotswitch_ipc::Response;

/// Side effects requested by the switcher or a command, run by the executor
/// in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Present {
        candidates: CandidateList,
        selected: usize,
    },
    UpdateSelection {
        selected: usize,
    },
    Dismiss,
    Activate(ApplicationHandle),
    RecordActivation(AppId),
}

pub struct CommandResult {
    pub response: Response,
    pub effects: Vec<Effect>,
}

impl CommandResult {
    pub fn ok() -> Self {
        Self {
            response: Response::Ok,
            effects: vec![],
        }
    }

    pub fn ok_with_effects(effects: Vec<Effect>) -> Self {
        Self {
            response: Response::Ok,
            effects,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            response: Response::Error {
                message: message.into(),
            },
            effects: vec![],
        }
    }

    pub fn with_response(response: Response) -> Self {
        Self {
            response,
            effects: vec![],
        }
    }
}

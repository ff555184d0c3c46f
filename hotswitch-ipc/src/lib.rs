pub mod command;
pub mod event;
pub mod modifier;

pub use command::{AppInfo, Command, Response, StateInfo};
pub use event::{CandidateInfo, SessionEvent, SubscribeRequest};
pub use modifier::ModifierKey;

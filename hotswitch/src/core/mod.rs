mod app;
mod classifier;
mod config;
mod ordering;
mod recency;
mod session;

pub use app::*;
pub use classifier::*;
pub use config::*;
pub use ordering::*;
pub use recency::*;
pub use session::*;

mod accessibility;
mod event_tap;
pub mod keycode;
mod running_apps;
mod workspace;

pub use accessibility::*;
pub use event_tap::*;
pub use running_apps::*;
pub use workspace::*;

//! Line-oriented command shell over a [`FileTree`](crate::filesystem::FileTree).

mod command;
mod render;
mod repl;
mod report;
mod session;

pub use command::Command;
pub use render::{level_order_listing, stdout_supports_color};
pub use repl::{Shell, ShellError};
pub use report::Report;
pub use session::{Session, SessionError};

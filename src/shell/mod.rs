//! External command execution and host queries.

pub mod command;
pub mod mock;
pub mod path;
pub mod platform;
pub mod runner;

pub use command::{argv, display_command, execute, CommandOptions, CommandResult};
pub use mock::{Invocation, MockRunner};
pub use path::{is_executable, parse_system_path, resolve_on_path, resolve_tool_path};
pub use platform::{current_username, is_ci, is_elevated};
pub use runner::{CommandRunner, SystemRunner};

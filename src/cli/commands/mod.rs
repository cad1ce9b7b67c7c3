//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results. Commands take a
//! [`CommandRunner`](crate::shell::CommandRunner) so tests can drive them
//! without starting processes.

pub mod base;
pub mod install;
pub mod vm_setup;

pub use base::{Command, CommandResult};
pub use install::InstallCommand;
pub use vm_setup::VmSetupCommand;

//! Command-line interface for hostprep.
//!
//! # Architecture
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations
//!
//! The binaries under `src/bin` parse their arguments, call
//! [`init_tracing`], build a UI and execute one command.

pub mod args;
pub mod commands;

pub use args::{GlobalArgs, InstallCli, VmSetupCli};
pub use commands::{Command, CommandResult, InstallCommand, VmSetupCommand};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
///
/// Logs go to stderr so they never mix with command output.
pub fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("hostprep=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hostprep=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

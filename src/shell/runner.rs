//! The seam between provisioning logic and the host system.

use std::path::PathBuf;

use super::command::{execute, CommandOptions, CommandResult};
use super::path::resolve_on_path;

/// Runs external programs and resolves executables.
///
/// This trait allows mocking process execution in tests.
pub trait CommandRunner {
    /// Run `program` with `args` and wait for it to exit.
    fn run(&self, program: &str, args: &[String], options: &CommandOptions) -> CommandResult;

    /// Resolve `program` on the execution path.
    fn which(&self, program: &str) -> Option<PathBuf>;
}

/// Runner backed by real processes and the process `PATH`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String], options: &CommandOptions) -> CommandResult {
        execute(program, args, options)
    }

    fn which(&self, program: &str) -> Option<PathBuf> {
        resolve_on_path(program)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::argv;

    #[test]
    fn system_runner_runs_commands() {
        let runner = SystemRunner;
        let result = runner.run(
            "sh",
            &argv(&["-c", "printf ok"]),
            &CommandOptions::default(),
        );
        assert!(result.success);
        assert_eq!(result.stdout, "ok");
    }

    #[cfg(unix)]
    #[test]
    fn system_runner_resolves_sh() {
        assert!(SystemRunner.which("sh").is_some());
        assert!(SystemRunner.which("hostprep-no-such-tool").is_none());
    }
}

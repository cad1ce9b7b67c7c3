//! Mock command runner for testing.
//!
//! `MockRunner` implements [`CommandRunner`] without starting processes.
//! It records every invocation for later assertion and answers with
//! pre-configured results.
//!
//! # Example
//!
//! ```
//! use hostprep::shell::{argv, CommandOptions, CommandRunner, MockRunner};
//!
//! let mut runner = MockRunner::new();
//! runner.add_program("git");
//! runner.fail("git pull --rebase", "conflict");
//!
//! let result = runner.run("git", &argv(&["pull", "--rebase"]), &CommandOptions::default());
//! assert!(!result.success);
//! assert!(runner.ran("git pull"));
//! assert!(runner.which("git").is_some());
//! assert!(runner.which("brew").is_none());
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use super::command::{display_command, CommandOptions, CommandResult};
use super::runner::CommandRunner;

/// A recorded call to [`CommandRunner::run`].
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    /// Program name as passed to the runner.
    pub program: String,
    /// Arguments as passed to the runner.
    pub args: Vec<String>,
    /// Working directory, if one was set.
    pub cwd: Option<PathBuf>,
}

impl Invocation {
    /// The full command line, space-joined.
    pub fn command_line(&self) -> String {
        display_command(&self.program, &self.args)
    }
}

type Handler = Box<dyn Fn(&Invocation) -> CommandResult>;

/// Mock runner for testing.
///
/// Resolution order for a command: an exact response set with
/// [`set_response`](Self::set_response), then the first handler whose
/// prefix matches, then the default (success with empty output unless
/// changed via [`set_default_success`](Self::set_default_success)).
pub struct MockRunner {
    on_path: HashMap<String, PathBuf>,
    responses: HashMap<String, CommandResult>,
    handlers: Vec<(String, Handler)>,
    default_success: bool,
    invocations: RefCell<Vec<Invocation>>,
}

impl Default for MockRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRunner {
    /// Create a runner with an empty PATH where every command succeeds.
    pub fn new() -> Self {
        Self {
            on_path: HashMap::new(),
            responses: HashMap::new(),
            handlers: Vec::new(),
            default_success: true,
            invocations: RefCell::new(Vec::new()),
        }
    }

    /// Make `program` resolvable at `/usr/bin/<program>`.
    pub fn add_program(&mut self, program: &str) {
        self.on_path
            .insert(program.to_string(), PathBuf::from("/usr/bin").join(program));
    }

    /// Set the result for an exact command line.
    pub fn set_response(&mut self, command_line: &str, result: CommandResult) {
        self.responses.insert(command_line.to_string(), result);
    }

    /// Make an exact command line succeed with `stdout`.
    pub fn succeed(&mut self, command_line: &str, stdout: &str) {
        self.set_response(
            command_line,
            CommandResult::success(stdout.to_string(), String::new(), Duration::ZERO),
        );
    }

    /// Make an exact command line fail with `stderr`.
    pub fn fail(&mut self, command_line: &str, stderr: &str) {
        self.set_response(
            command_line,
            CommandResult::failure(Some(1), String::new(), stderr.to_string(), Duration::ZERO),
        );
    }

    /// Answer every command line starting with `prefix` through `handler`.
    ///
    /// Handlers can perform side effects such as creating files, which
    /// lets tests stand in for `git clone` or `tar`.
    pub fn on_command<F>(&mut self, prefix: &str, handler: F)
    where
        F: Fn(&Invocation) -> CommandResult + 'static,
    {
        self.handlers.push((prefix.to_string(), Box::new(handler)));
    }

    /// Choose whether unconfigured commands succeed or fail.
    pub fn set_default_success(&mut self, success: bool) {
        self.default_success = success;
    }

    /// All recorded invocations, in order.
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.borrow().clone()
    }

    /// All recorded command lines, in order.
    pub fn commands(&self) -> Vec<String> {
        self.invocations
            .borrow()
            .iter()
            .map(Invocation::command_line)
            .collect()
    }

    /// Check if any recorded command line starts with `prefix`.
    pub fn ran(&self, prefix: &str) -> bool {
        self.invocations
            .borrow()
            .iter()
            .any(|i| i.command_line().starts_with(prefix))
    }

    /// Check if nothing was run.
    pub fn is_untouched(&self) -> bool {
        self.invocations.borrow().is_empty()
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, program: &str, args: &[String], options: &CommandOptions) -> CommandResult {
        let invocation = Invocation {
            program: program.to_string(),
            args: args.to_vec(),
            cwd: options.cwd.clone(),
        };
        let line = invocation.command_line();
        self.invocations.borrow_mut().push(invocation.clone());

        if let Some(result) = self.responses.get(&line) {
            return result.clone();
        }

        if let Some((_, handler)) = self
            .handlers
            .iter()
            .find(|(prefix, _)| line.starts_with(prefix.as_str()))
        {
            return handler(&invocation);
        }

        if self.default_success {
            CommandResult::success(String::new(), String::new(), Duration::ZERO)
        } else {
            CommandResult::failure(Some(1), String::new(), String::new(), Duration::ZERO)
        }
    }

    fn which(&self, program: &str) -> Option<PathBuf> {
        self.on_path.get(program).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::argv;

    #[test]
    fn records_invocations_in_order() {
        let runner = MockRunner::new();
        let opts = CommandOptions::default();
        runner.run("uname", &argv(&["-m"]), &opts);
        runner.run("git", &argv(&["status"]), &opts);

        assert_eq!(runner.commands(), vec!["uname -m", "git status"]);
        assert!(runner.ran("git"));
        assert!(!runner.ran("curl"));
    }

    #[test]
    fn exact_response_wins_over_handler() {
        let mut runner = MockRunner::new();
        runner.on_command("git", |_| {
            CommandResult::failure(Some(9), String::new(), "handler".into(), Duration::ZERO)
        });
        runner.succeed("git status", "clean");

        let result = runner.run("git", &argv(&["status"]), &CommandOptions::default());
        assert!(result.success);
        assert_eq!(result.stdout, "clean");

        let other = runner.run("git", &argv(&["log"]), &CommandOptions::default());
        assert_eq!(other.exit_code, Some(9));
    }

    #[test]
    fn default_result_is_configurable() {
        let mut runner = MockRunner::new();
        assert!(runner.run("true", &[], &CommandOptions::default()).success);

        runner.set_default_success(false);
        assert!(!runner.run("true", &[], &CommandOptions::default()).success);
    }

    #[test]
    fn records_working_directory() {
        let runner = MockRunner::new();
        let dir = PathBuf::from("/tmp/repo");
        runner.run("git", &argv(&["pull"]), &CommandOptions::in_dir(&dir));

        assert_eq!(runner.invocations()[0].cwd, Some(dir));
    }

    #[test]
    fn which_only_knows_added_programs() {
        let mut runner = MockRunner::new();
        runner.add_program("apt");

        assert_eq!(runner.which("apt"), Some(PathBuf::from("/usr/bin/apt")));
        assert_eq!(runner.which("brew"), None);
        assert!(runner.is_untouched());
    }
}

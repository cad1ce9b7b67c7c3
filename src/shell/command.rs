//! External command execution.
//!
//! Every process hostprep starts goes through [`execute`]. It blocks until
//! the child exits and always returns a [`CommandResult`]: a program that
//! cannot be spawned is reported as a failed result carrying the spawn
//! error in `stderr`, so callers decide locally whether a failure matters.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Result of executing an external command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal or never started).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
        }
    }

    /// Create a failure result for a process that never started.
    pub fn spawn_failure(program: &str, err: &std::io::Error) -> Self {
        Self::failure(
            None,
            String::new(),
            format!("failed to start '{}': {}", program, err),
            Duration::ZERO,
        )
    }

    /// Trimmed stderr, falling back to the exit code when stderr is empty.
    pub fn error_summary(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        match self.exit_code {
            Some(code) => format!("exited with code {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Working directory.
    pub cwd: Option<PathBuf>,
}

impl CommandOptions {
    /// Options that run the command inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            cwd: Some(dir.to_path_buf()),
        }
    }
}

/// Execute `program` with `args`, capturing stdout and stderr.
pub fn execute(program: &str, args: &[String], options: &CommandOptions) -> CommandResult {
    let start = Instant::now();
    tracing::debug!("Running: {}", display_command(program, args));

    let mut cmd = Command::new(program);
    cmd.args(args);

    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }

    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let output = match cmd.output() {
        Ok(output) => output,
        Err(e) => {
            tracing::debug!("Could not spawn {}: {}", program, e);
            return CommandResult::spawn_failure(program, &e);
        }
    };

    let duration = start.elapsed();
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    if output.status.success() {
        CommandResult::success(stdout, stderr, duration)
    } else {
        tracing::debug!(
            "{} exited with {:?} after {:?}",
            program,
            output.status.code(),
            duration
        );
        CommandResult::failure(output.status.code(), stdout, stderr, duration)
    }
}

/// Build an owned argument vector from string slices.
pub fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|p| p.to_string()).collect()
}

/// Render a command line for logs and error messages.
pub fn display_command(program: &str, args: &[String]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}

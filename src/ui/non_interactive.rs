//! Non-interactive UI for CI/headless environments.

use std::collections::HashMap;
use std::io::{self, BufRead, BufReader, Write};

use crate::error::Result;

use super::{OutputMode, Prompt, SpinnerHandle, UserInterface};

/// Prefix for environment variables that answer prompts.
pub const PROMPT_ENV_PREFIX: &str = "HOSTPREP_PROMPT_";

/// UI implementation for non-interactive mode.
///
/// Prompts are answered from `HOSTPREP_PROMPT_<KEY>` environment
/// variables first. Otherwise the question is printed and one line is read
/// from the input (stdin by default). At end of input the prompt's default
/// applies.
pub struct NonInteractiveUI {
    mode: OutputMode,
    env_overrides: HashMap<String, String>,
    input: Box<dyn BufRead>,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI reading answers from stdin.
    pub fn new(mode: OutputMode) -> Self {
        let env_overrides: HashMap<String, String> = std::env::vars()
            .filter(|(k, _)| k.starts_with(PROMPT_ENV_PREFIX))
            .collect();

        Self {
            mode,
            env_overrides,
            input: Box::new(BufReader::new(io::stdin())),
        }
    }

    /// Create with explicit overrides and no input (for testing).
    pub fn with_overrides(mode: OutputMode, overrides: HashMap<String, String>) -> Self {
        Self {
            mode,
            env_overrides: overrides,
            input: Box::new(io::empty()),
        }
    }

    /// Read prompt answers from `input` instead of stdin.
    pub fn with_input(mut self, input: impl BufRead + 'static) -> Self {
        self.input = Box::new(input);
        self
    }

    /// One line from the input, without its line ending. `None` at end of input.
    fn read_answer(&mut self, prompt: &Prompt) -> Option<String> {
        let echo = self.mode.shows_status();
        if echo {
            print!("{} ", prompt.question);
            io::stdout().flush().ok();
        }

        let mut line = String::new();
        let answer = match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
            Err(e) => {
                tracing::debug!("Reading answer for '{}' failed: {}", prompt.key, e);
                None
            }
        };

        // Piped input is not echoed, so end the question line ourselves.
        if echo {
            println!();
        }
        answer
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("✓ {}", msg);
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("⚠ {}", msg);
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<String> {
        let env_key = format!("{}{}", PROMPT_ENV_PREFIX, prompt.key.to_uppercase());
        if let Some(value) = self.env_overrides.get(&env_key) {
            tracing::debug!("Answering '{}' from {}", prompt.key, env_key);
            return Ok(value.clone());
        }

        if let Some(answer) = self.read_answer(prompt) {
            return Ok(answer);
        }

        if let Some(default) = &prompt.default {
            return Ok(default.clone());
        }

        Err(anyhow::anyhow!(
            "Cannot prompt for '{}' in non-interactive mode (no default value); set {}",
            prompt.key,
            env_key
        )
        .into())
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_spinners() {
            println!("{}", message);
        }
        Box::new(NoopSpinner { mode: self.mode })
    }

    fn start_status(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_status() {
            println!("{}", message);
        }
        Box::new(NoopSpinner { mode: self.mode })
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            let rule = "=".repeat(50);
            println!("{}\n{}\n{}", rule, title, rule);
        }
    }

    fn show_hint(&mut self, hint: &str) {
        if self.mode.shows_status() {
            println!("  {}", hint);
        }
    }

    fn show_key_value(&mut self, key: &str, value: &str) {
        if self.mode.shows_status() {
            println!("{}: {}", key, value);
        }
    }
}

/// Spinner that prints its outcome once (for non-interactive mode).
struct NoopSpinner {
    mode: OutputMode,
}

impl SpinnerHandle for NoopSpinner {
    fn finish_success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("✓ {}", msg);
        }
    }

    fn finish_error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn update_prompt(default: Option<&str>) -> Prompt {
        Prompt {
            key: "update_repo".to_string(),
            question: "Do you want to update it? (y/n)".to_string(),
            default: default.map(String::from),
        }
    }

    #[test]
    fn prompt_uses_env_override() {
        let mut overrides = HashMap::new();
        overrides.insert("HOSTPREP_PROMPT_UPDATE_REPO".to_string(), "y".to_string());
        let mut ui = NonInteractiveUI::with_overrides(OutputMode::Silent, overrides);

        let result = ui.prompt(&update_prompt(Some("n"))).unwrap();
        assert_eq!(result, "y");
    }

    #[test]
    fn prompt_falls_back_to_default() {
        let mut ui = NonInteractiveUI::with_overrides(OutputMode::Silent, HashMap::new());

        let result = ui.prompt(&update_prompt(Some("n"))).unwrap();
        assert_eq!(result, "n");
    }

    #[test]
    fn prompt_without_default_is_an_error() {
        let mut ui = NonInteractiveUI::with_overrides(OutputMode::Silent, HashMap::new());

        let err = ui.prompt(&update_prompt(None)).unwrap_err();
        assert!(err.to_string().contains("HOSTPREP_PROMPT_UPDATE_REPO"));
    }

    #[test]
    fn prompt_reads_a_line_from_input() {
        let mut ui = NonInteractiveUI::with_overrides(OutputMode::Silent, HashMap::new())
            .with_input(Cursor::new("y\r\nignored\n"));

        assert_eq!(ui.prompt(&update_prompt(Some("n"))).unwrap(), "y");
        assert_eq!(ui.prompt(&update_prompt(Some("n"))).unwrap(), "ignored");
        assert_eq!(ui.prompt(&update_prompt(Some("n"))).unwrap(), "n");
    }

    #[test]
    fn empty_line_is_an_answer() {
        let mut ui = NonInteractiveUI::with_overrides(OutputMode::Silent, HashMap::new())
            .with_input(Cursor::new("\n"));

        assert_eq!(ui.prompt(&update_prompt(Some("n"))).unwrap(), "");
    }

    #[test]
    fn env_override_wins_over_input() {
        let mut overrides = HashMap::new();
        overrides.insert("HOSTPREP_PROMPT_UPDATE_REPO".to_string(), "n".to_string());
        let mut ui = NonInteractiveUI::with_overrides(OutputMode::Silent, overrides)
            .with_input(Cursor::new("y\n"));

        assert_eq!(ui.prompt(&update_prompt(None)).unwrap(), "n");
    }
}

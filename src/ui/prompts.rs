//! Interactive prompts.

use console::Term;
use dialoguer::Input;

use crate::error::{HostprepError, Result};

use super::Prompt;

/// Convert dialoguer errors to HostprepError.
fn map_dialoguer_err(e: dialoguer::Error) -> HostprepError {
    HostprepError::Io(e.into())
}

/// Ask a free-text question on the terminal.
pub fn prompt_user(prompt: &Prompt, term: &Term) -> Result<String> {
    let input = Input::<String>::new()
        .with_prompt(&prompt.question)
        .allow_empty(true);

    match &prompt.default {
        Some(default) => input
            .default(default.clone())
            .show_default(false)
            .interact_text_on(term)
            .map_err(map_dialoguer_err),
        None => input.interact_text_on(term).map_err(map_dialoguer_err),
    }
}

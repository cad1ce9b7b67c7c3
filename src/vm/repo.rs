//! Repository checkout for the VM environment.
//!
//! A missing checkout is shallow-cloned with submodules. An existing one is
//! only touched if the user asks for an update.

use std::path::PathBuf;

use crate::error::{HostprepError, Result};
use crate::shell::{argv, CommandOptions, CommandRunner};
use crate::ui::{Prompt, UserInterface};

/// Prompt key for the update question.
pub const UPDATE_PROMPT_KEY: &str = "update_repo";

/// What happened to the checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoStatus {
    /// Freshly cloned.
    Cloned,
    /// Existing checkout pulled.
    Updated,
    /// The pull failed; the checkout is used as-is.
    UpdateFailed,
    /// The user declined the update.
    Skipped,
}

/// A repository and the directory it lives in.
pub struct RepoCheckout {
    url: String,
    path: PathBuf,
}

impl RepoCheckout {
    pub fn new(url: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            path: path.into(),
        }
    }

    /// Clone the repository, or offer to update an existing checkout.
    ///
    /// # Errors
    ///
    /// Returns `CloneFailed` if the initial clone fails. Update failures are
    /// reported as warnings and yield [`RepoStatus::UpdateFailed`].
    pub fn acquire(
        &self,
        runner: &dyn CommandRunner,
        ui: &mut dyn UserInterface,
    ) -> Result<RepoStatus> {
        if self.path.exists() {
            ui.message(&format!("Directory {} already exists.", self.path.display()));
            if !self.confirm_update(ui) {
                ui.message("Skipping clone/update.");
                return Ok(RepoStatus::Skipped);
            }
            return Ok(self.update(runner, ui));
        }

        self.clone_repo(runner, ui)?;
        Ok(RepoStatus::Cloned)
    }

    fn confirm_update(&self, ui: &mut dyn UserInterface) -> bool {
        let prompt = Prompt {
            key: UPDATE_PROMPT_KEY.to_string(),
            question: "Do you want to update it? (y/n)".to_string(),
            default: Some("n".to_string()),
        };

        match ui.prompt(&prompt) {
            Ok(answer) => answer.trim().to_lowercase() == "y",
            Err(e) => {
                tracing::debug!("Update prompt failed, treating as no: {}", e);
                false
            }
        }
    }

    fn update(&self, runner: &dyn CommandRunner, ui: &mut dyn UserInterface) -> RepoStatus {
        let mut spinner =
            ui.start_spinner(&format!("Updating repository in {}...", self.path.display()));
        let result = runner.run(
            "git",
            &argv(&["pull", "--rebase"]),
            &CommandOptions::in_dir(&self.path),
        );

        if result.success {
            spinner.finish_success("Repository updated successfully!");
            RepoStatus::Updated
        } else {
            spinner.finish_error("Update failed");
            ui.warning(&format!("Failed to update: {}", result.error_summary()));
            RepoStatus::UpdateFailed
        }
    }

    fn clone_repo(&self, runner: &dyn CommandRunner, ui: &mut dyn UserInterface) -> Result<()> {
        let mut spinner = ui.start_spinner(&format!(
            "Cloning {} repository to {}...",
            repo_name(&self.url),
            self.path.display()
        ));
        let args = vec![
            "clone".to_string(),
            "--depth".to_string(),
            "1".to_string(),
            "--recursive".to_string(),
            self.url.clone(),
            self.path.display().to_string(),
        ];
        let result = runner.run("git", &args, &CommandOptions::default());

        if !result.success {
            spinner.finish_error("Clone failed");
            return Err(HostprepError::CloneFailed {
                url: self.url.clone(),
                path: self.path.clone(),
                message: result.error_summary(),
            });
        }

        spinner.finish_success("Repository cloned successfully!");
        Ok(())
    }
}

/// Repository name from its URL: the last path segment without `.git`.
fn repo_name(url: &str) -> &str {
    let last = url.trim_end_matches('/').rsplit('/').next().unwrap_or(url);
    last.strip_suffix(".git").unwrap_or(last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::MockRunner;
    use crate::ui::MockUI;
    use tempfile::TempDir;

    const URL: &str = "https://github.com/kholia/OSX-KVM.git";

    #[test]
    fn repo_name_strips_git_suffix() {
        assert_eq!(repo_name(URL), "OSX-KVM");
        assert_eq!(repo_name("https://example.com/a/b/"), "b");
        assert_eq!(repo_name("plain"), "plain");
    }

    #[test]
    fn missing_directory_is_cloned() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("OSX-KVM");
        let runner = MockRunner::new();
        let mut ui = MockUI::new();

        let status = RepoCheckout::new(URL, &target).acquire(&runner, &mut ui).unwrap();

        assert_eq!(status, RepoStatus::Cloned);
        assert_eq!(
            runner.commands(),
            vec![format!(
                "git clone --depth 1 --recursive {} {}",
                URL,
                target.display()
            )]
        );
        assert!(ui.prompts_shown().is_empty());
    }

    #[test]
    fn clone_failure_is_an_error() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("OSX-KVM");
        let mut runner = MockRunner::new();
        runner.set_default_success(false);
        let mut ui = MockUI::new();

        let err = RepoCheckout::new(URL, &target)
            .acquire(&runner, &mut ui)
            .unwrap_err();

        assert!(matches!(err, HostprepError::CloneFailed { .. }));
    }

    #[test]
    fn existing_directory_declined_runs_nothing() {
        let temp = TempDir::new().unwrap();
        let runner = MockRunner::new();
        let mut ui = MockUI::new();
        ui.set_prompt_response(UPDATE_PROMPT_KEY, "n");

        let status = RepoCheckout::new(URL, temp.path())
            .acquire(&runner, &mut ui)
            .unwrap();

        assert_eq!(status, RepoStatus::Skipped);
        assert!(runner.is_untouched());
        assert!(ui.has_message("already exists"));
        assert!(ui.has_message("Skipping clone/update."));
    }

    #[test]
    fn default_answer_is_no() {
        let temp = TempDir::new().unwrap();
        let runner = MockRunner::new();
        let mut ui = MockUI::new();

        let status = RepoCheckout::new(URL, temp.path())
            .acquire(&runner, &mut ui)
            .unwrap();

        assert_eq!(status, RepoStatus::Skipped);
        assert_eq!(ui.prompts_shown(), &[UPDATE_PROMPT_KEY]);
    }

    #[test]
    fn only_a_single_y_accepts() {
        for (answer, expected) in [
            ("y", RepoStatus::Updated),
            (" Y \n", RepoStatus::Updated),
            ("yes", RepoStatus::Skipped),
            ("", RepoStatus::Skipped),
        ] {
            let temp = TempDir::new().unwrap();
            let runner = MockRunner::new();
            let mut ui = MockUI::new();
            ui.set_prompt_response(UPDATE_PROMPT_KEY, answer);

            let status = RepoCheckout::new(URL, temp.path())
                .acquire(&runner, &mut ui)
                .unwrap();

            assert_eq!(status, expected, "answer {answer:?}");
        }
    }

    #[test]
    fn update_pulls_inside_checkout() {
        let temp = TempDir::new().unwrap();
        let runner = MockRunner::new();
        let mut ui = MockUI::new();
        ui.set_prompt_response(UPDATE_PROMPT_KEY, "y");

        RepoCheckout::new(URL, temp.path())
            .acquire(&runner, &mut ui)
            .unwrap();

        let invocations = runner.invocations();
        assert_eq!(invocations.len(), 1);
        assert_eq!(invocations[0].command_line(), "git pull --rebase");
        assert_eq!(invocations[0].cwd.as_deref(), Some(temp.path()));
    }

    #[test]
    fn update_failure_is_a_warning() {
        let temp = TempDir::new().unwrap();
        let mut runner = MockRunner::new();
        runner.fail("git pull --rebase", "cannot pull with rebase: unstaged changes");
        let mut ui = MockUI::new();
        ui.set_prompt_response(UPDATE_PROMPT_KEY, "y");

        let status = RepoCheckout::new(URL, temp.path())
            .acquire(&runner, &mut ui)
            .unwrap();

        assert_eq!(status, RepoStatus::UpdateFailed);
        assert!(ui.has_warning("Failed to update: cannot pull with rebase"));
    }
}

//! The `install-mutagen` command.

use crate::config::InstallerConfig;
use crate::error::Result;
use crate::installer::{InstallOutcome, ToolInstaller};
use crate::shell::CommandRunner;
use crate::ui::UserInterface;

use super::base::{Command, CommandResult};

/// Installs the configured tool.
pub struct InstallCommand<'a> {
    config: InstallerConfig,
    runner: &'a dyn CommandRunner,
    elevated: Option<bool>,
}

impl<'a> InstallCommand<'a> {
    pub fn new(config: InstallerConfig, runner: &'a dyn CommandRunner) -> Self {
        Self {
            config,
            runner,
            elevated: None,
        }
    }

    /// Override privilege detection.
    pub fn with_elevated(mut self, elevated: bool) -> Self {
        self.elevated = Some(elevated);
        self
    }
}

impl Command for InstallCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        ui.show_header("Mutagen Installation Script");

        let mut installer = ToolInstaller::new(&self.config, self.runner);
        if let Some(elevated) = self.elevated {
            installer = installer.with_elevated(elevated);
        }

        let outcome = installer.run(ui);
        tracing::debug!("Install outcome: {:?}", outcome);

        match outcome {
            InstallOutcome::Failed => Ok(CommandResult::failure(1)),
            _ => Ok(CommandResult::success()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::MockRunner;
    use crate::ui::MockUI;

    #[test]
    fn already_installed_succeeds() {
        let mut runner = MockRunner::new();
        runner.add_program("mutagen");
        let mut ui = MockUI::new();

        let result = InstallCommand::new(InstallerConfig::default(), &runner)
            .execute(&mut ui)
            .unwrap();

        assert_eq!(result, CommandResult::success());
        assert_eq!(ui.headers(), &["Mutagen Installation Script"]);
    }

    #[test]
    fn package_manager_install_succeeds() {
        let mut runner = MockRunner::new();
        runner.add_program("pacman");
        let mut ui = MockUI::new();

        let result = InstallCommand::new(InstallerConfig::default(), &runner)
            .with_elevated(true)
            .execute(&mut ui)
            .unwrap();

        assert!(result.success);
        assert!(runner.ran("pacman -S --noconfirm mutagen"));
    }

    #[test]
    fn total_failure_exits_one() {
        let temp = tempfile::TempDir::new().unwrap();
        let config = InstallerConfig {
            temp_dir: temp.path().to_path_buf(),
            ..Default::default()
        };
        let mut runner = MockRunner::new();
        runner.set_default_success(false);
        let mut ui = MockUI::new();

        let result = InstallCommand::new(config, &runner)
            .execute(&mut ui)
            .unwrap();

        assert_eq!(result, CommandResult::failure(1));
        assert!(ui.has_hint("https://mutagen.io/documentation/introduction/installation"));
    }
}

//! The `setup-osx-kvm` command.

use std::path::PathBuf;

use anyhow::anyhow;

use crate::cli::args::VmSetupCli;
use crate::config::VmConfig;
use crate::error::Result;
use crate::shell::{current_username, CommandRunner};
use crate::ui::UserInterface;
use crate::vm::VmSetup;

use super::base::{Command, CommandResult};

/// Prepares an OSX-KVM checkout with a custom boot script.
pub struct VmSetupCommand<'a> {
    config: VmConfig,
    runner: &'a dyn CommandRunner,
    target_dir: Option<PathBuf>,
    username: Option<String>,
}

impl<'a> VmSetupCommand<'a> {
    pub fn new(config: VmConfig, runner: &'a dyn CommandRunner) -> Self {
        Self {
            config,
            runner,
            target_dir: None,
            username: None,
        }
    }

    /// Take the target directory and username from parsed arguments.
    pub fn with_args(mut self, args: &VmSetupCli) -> Self {
        self.target_dir = args.target_dir.clone();
        self.username = args.username.clone();
        self
    }

    pub fn with_target_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.target_dir = Some(dir.into());
        self
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    fn resolve_target(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.target_dir {
            return Ok(dir.clone());
        }
        let home = dirs::home_dir()
            .ok_or_else(|| anyhow!("Could not determine home directory; pass --target-dir"))?;
        Ok(home.join(&self.config.default_dir_name))
    }

    fn resolve_username(&self) -> Result<String> {
        if let Some(name) = &self.username {
            return Ok(name.clone());
        }
        Ok(current_username()
            .ok_or_else(|| anyhow!("Could not determine current user; pass --username"))?)
    }
}

impl Command for VmSetupCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let target = self.resolve_target()?;
        let username = self.resolve_username()?;
        tracing::debug!("Setting up {} for {}", target.display(), username);

        ui.show_header("OSX-KVM Setup Script");

        let report = VmSetup::new(&self.config, self.runner).run(&target, &username, ui)?;

        ui.show_header("Setup complete!");
        ui.show_key_value("Repository", &report.repo_path.display().to_string());
        ui.show_key_value(
            "Custom boot script",
            &report.script_path.display().to_string(),
        );

        Ok(CommandResult::success())
    }
}

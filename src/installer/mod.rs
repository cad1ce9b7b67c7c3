//! Tool installation.
//!
//! [`ToolInstaller`] makes sure a single command-line tool is on PATH. It
//! leaves an existing install alone; otherwise it tries the host's package
//! managers and falls back to the pinned release archive.

pub mod package_manager;
pub mod release;

use std::path::PathBuf;

use crate::config::InstallerConfig;
use crate::shell::{is_elevated, CommandOptions, CommandRunner};
use crate::ui::UserInterface;

pub use package_manager::{install_via_package_manager, PackageManagerDef, PACKAGE_MANAGERS};
pub use release::{
    install_from_release, normalize_arch, release_url, HostPlatform, ReleaseError, ReleasePaths,
};

/// How an installer run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The tool was already on PATH.
    AlreadyInstalled {
        path: PathBuf,
        version: Option<String>,
    },
    /// A package manager installed it.
    PackageManager { manager: &'static str },
    /// The release archive was installed.
    Release { path: PathBuf },
    /// Every strategy failed.
    Failed,
}

impl InstallOutcome {
    /// Whether the tool is available after the run.
    pub fn is_installed(&self) -> bool {
        !matches!(self, InstallOutcome::Failed)
    }
}

/// Installs the configured tool.
pub struct ToolInstaller<'a> {
    config: &'a InstallerConfig,
    runner: &'a dyn CommandRunner,
    elevated: bool,
    platform: Option<HostPlatform>,
}

impl<'a> ToolInstaller<'a> {
    pub fn new(config: &'a InstallerConfig, runner: &'a dyn CommandRunner) -> Self {
        Self {
            config,
            runner,
            elevated: is_elevated(),
            platform: None,
        }
    }

    /// Override whether privileged commands run without `sudo`.
    pub fn with_elevated(mut self, elevated: bool) -> Self {
        self.elevated = elevated;
        self
    }

    /// Use a fixed platform instead of detecting it.
    pub fn with_platform(mut self, platform: HostPlatform) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Run the installer.
    pub fn run(&self, ui: &mut dyn UserInterface) -> InstallOutcome {
        let tool = display_name(&self.config.tool);

        if let Some(path) = self.runner.which(&self.config.tool) {
            ui.success(&format!("{} is already installed!", tool));
            let version = self.installed_version(&path);
            if let Some(version) = &version {
                ui.message(version);
            }
            return InstallOutcome::AlreadyInstalled { path, version };
        }

        ui.message("1. Trying package manager installation...");
        if let Some(manager) =
            install_via_package_manager(self.config, self.runner, ui, self.elevated)
        {
            self.check_on_path(ui);
            return InstallOutcome::PackageManager { manager };
        }

        ui.message("2. Trying GitHub release installation...");
        let platform = self
            .platform
            .clone()
            .unwrap_or_else(|| HostPlatform::detect(self.runner));

        match install_from_release(self.config, &platform, self.runner, ui, self.elevated) {
            Ok(path) => {
                ui.success(&format!(
                    "{} installed successfully from GitHub release!",
                    tool
                ));
                self.check_on_path(ui);
                InstallOutcome::Release { path }
            }
            Err(e) => {
                tracing::debug!("Release install failed: {:?}", e);
                ui.error(&e.to_string());
                ui.error(&format!("Failed to install {}. Please install manually:", tool));
                ui.show_hint(&format!("Visit: {}", self.config.manual_install_url));
                InstallOutcome::Failed
            }
        }
    }

    fn installed_version(&self, path: &std::path::Path) -> Option<String> {
        let program = path.display().to_string();
        let result = self.runner.run(
            &program,
            &["version".to_string()],
            &CommandOptions::default(),
        );
        let version = result.stdout.trim();
        (result.success && !version.is_empty()).then(|| version.to_string())
    }

    fn check_on_path(&self, ui: &mut dyn UserInterface) {
        if self.runner.which(&self.config.tool).is_none() {
            ui.warning(&format!(
                "{} was installed but is not on PATH yet. You may need to restart your shell.",
                self.config.tool
            ));
        }
    }
}

/// Wrap a privileged command line in `sudo` unless already elevated.
///
/// Returns the program and its arguments.
pub(crate) fn elevate(mut argv: Vec<String>, elevated: bool) -> (String, Vec<String>) {
    if !elevated {
        return ("sudo".to_string(), argv);
    }
    if argv.is_empty() {
        return (String::new(), argv);
    }
    let program = argv.remove(0);
    (program, argv)
}

/// The tool name with its first letter capitalized, for messages.
pub(crate) fn display_name(tool: &str) -> String {
    let mut chars = tool.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

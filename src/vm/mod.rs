//! macOS-on-KVM environment setup.
//!
//! [`VmSetup`] checks out the OSX-KVM repository, sizes the VM from the
//! host's resources and writes a custom boot script into the checkout.

pub mod repo;
pub mod resources;
pub mod script;
pub mod template;

use std::path::{Path, PathBuf};

use crate::config::VmConfig;
use crate::error::Result;
use crate::shell::CommandRunner;
use crate::ui::UserInterface;

pub use repo::{RepoCheckout, RepoStatus, UPDATE_PROMPT_KEY};
pub use resources::{
    logical_cpus, parse_meminfo, read_meminfo, HostResources, MemInfoError, VmAllocation,
};
pub use script::{BootScript, BOOT_SCRIPT_TEMPLATE, SCRIPT_MODE};

/// Result of a successful setup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmSetupReport {
    pub repo_path: PathBuf,
    pub repo_status: RepoStatus,
    pub host: HostResources,
    pub allocation: VmAllocation,
    pub script_path: PathBuf,
}

/// Prepares a VM checkout.
pub struct VmSetup<'a> {
    config: &'a VmConfig,
    runner: &'a dyn CommandRunner,
    host_cores: Option<usize>,
}

impl<'a> VmSetup<'a> {
    pub fn new(config: &'a VmConfig, runner: &'a dyn CommandRunner) -> Self {
        Self {
            config,
            runner,
            host_cores: None,
        }
    }

    /// Use a fixed core count instead of querying the host.
    pub fn with_host_cores(mut self, cores: usize) -> Self {
        self.host_cores = Some(cores);
        self
    }

    /// Check out the repository into `target` and write the boot script.
    ///
    /// # Errors
    ///
    /// Fails if the clone fails or the script cannot be written. No script
    /// is written when the clone fails.
    pub fn run(
        &self,
        target: &Path,
        username: &str,
        ui: &mut dyn UserInterface,
    ) -> Result<VmSetupReport> {
        let repo_status = RepoCheckout::new(&self.config.repo_url, target).acquire(self.runner, ui)?;

        let host = self.detect_host(ui);
        let allocation = VmAllocation::from_host(&host, self.config);

        ui.message("Host resources detected:");
        ui.message(&format!("  CPU cores: {}", host.cores));
        ui.message(&format!(
            "  Allocating to VM: {} cores, {} threads, {}MB RAM",
            allocation.cores, allocation.threads, allocation.ram_mb
        ));

        let script_path = target.join(&self.config.script_name);
        ui.message(&format!(
            "Creating custom boot script at {}...",
            script_path.display()
        ));
        let script_path =
            BootScript::new(username, allocation).write_to(target, &self.config.script_name)?;
        ui.success("Custom boot script created and made executable!");

        Ok(VmSetupReport {
            repo_path: target.to_path_buf(),
            repo_status,
            host,
            allocation,
            script_path,
        })
    }

    fn detect_host(&self, ui: &mut dyn UserInterface) -> HostResources {
        let cores = self.host_cores.unwrap_or_else(logical_cpus);
        let memory_mb = match read_meminfo(&self.config.meminfo_path) {
            Ok(mb) => Some(mb),
            Err(e) => {
                tracing::debug!("meminfo: {:?}", e);
                ui.warning(&format!(
                    "Could not read {} ({}), using default {}MB RAM",
                    self.config.meminfo_path.display(),
                    e,
                    self.config.fallback_ram_mb
                ));
                None
            }
        };

        HostResources { cores, memory_mb }
    }
}

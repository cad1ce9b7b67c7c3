//! Configuration schema definitions for hostprep.
//!
//! Every field has a default, so an absent or partial config file yields
//! the stock behavior: install mutagen 0.17.3 and prepare an OSX-KVM
//! checkout.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for `config.yml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostprepConfig {
    /// Tool installer settings.
    pub installer: InstallerConfig,

    /// VM environment setup settings.
    pub vm: VmConfig,
}

/// Settings for the tool installer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallerConfig {
    /// Binary name probed on PATH and shipped in the release archive.
    pub tool: String,

    /// Pinned release version, without the leading `v`.
    pub version: String,

    /// Release host, e.g. `https://github.com/<org>/<repo>/releases`.
    pub release_base_url: String,

    /// Package name for apt and pacman.
    pub package: String,

    /// Formula passed to `brew install`.
    pub homebrew_formula: String,

    /// Directory the release binary is copied into.
    pub install_dir: PathBuf,

    /// Directory for the downloaded archive and its extraction.
    pub temp_dir: PathBuf,

    /// Where to send users when every strategy fails.
    pub manual_install_url: String,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            tool: "mutagen".to_string(),
            version: "0.17.3".to_string(),
            release_base_url: "https://github.com/mutagen-io/mutagen/releases".to_string(),
            package: "mutagen".to_string(),
            homebrew_formula: "mutagen-io/mutagen/mutagen".to_string(),
            install_dir: PathBuf::from("/usr/local/bin"),
            temp_dir: PathBuf::from("/tmp"),
            manual_install_url: "https://mutagen.io/documentation/introduction/installation"
                .to_string(),
        }
    }
}

/// Settings for the VM environment setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VmConfig {
    /// Repository to clone.
    pub repo_url: String,

    /// Directory name under the home directory used when no target is given.
    pub default_dir_name: String,

    /// File name of the generated boot script.
    pub script_name: String,

    /// Memory information source.
    pub meminfo_path: PathBuf,

    /// VM RAM used when host memory cannot be read.
    pub fallback_ram_mb: u64,

    /// Lower bound for VM RAM.
    pub min_ram_mb: u64,
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            repo_url: "https://github.com/kholia/OSX-KVM.git".to_string(),
            default_dir_name: "OSX-KVM".to_string(),
            script_name: "OpenCore-Boot-Custom.sh".to_string(),
            meminfo_path: PathBuf::from("/proc/meminfo"),
            fallback_ram_mb: 6144,
            min_ram_mb: 1024,
        }
    }
}

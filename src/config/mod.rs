//! Configuration loading.
//!
//! Both binaries read the same optional YAML file:
//!
//! ```yaml
//! installer:
//!   version: 0.17.3
//!   temp_dir: /tmp
//! vm:
//!   repo_url: https://github.com/kholia/OSX-KVM.git
//!   fallback_ram_mb: 6144
//! ```
//!
//! Any omitted field keeps its built-in default.

pub mod loader;
pub mod schema;

pub use loader::{load_config, load_config_file, parse_config, user_config_path};
pub use schema::{HostprepConfig, InstallerConfig, VmConfig};

//! hostprep - host provisioning helpers.
//!
//! Two binaries share this library:
//!
//! - `install-mutagen` makes sure the mutagen CLI is on PATH, trying the
//!   host's package managers before the pinned GitHub release.
//! - `setup-osx-kvm` checks out OSX-KVM and writes a QEMU boot script that
//!   gives the VM half of the host's CPUs and memory.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Optional YAML configuration
//! - [`error`] - Error types and result aliases
//! - [`installer`] - Package-manager and release-archive installation
//! - [`shell`] - External command execution and host queries
//! - [`ui`] - Prompts, spinners, and terminal output
//! - [`vm`] - Repository checkout, resource sizing and boot script generation
//!
//! # Example
//!
//! ```
//! use hostprep::config::VmConfig;
//! use hostprep::vm::{BootScript, HostResources, VmAllocation};
//!
//! let host = HostResources { cores: 8, memory_mb: Some(16000) };
//! let allocation = VmAllocation::from_host(&host, &VmConfig::default());
//! let script = BootScript::new("alice", allocation).render().unwrap();
//! assert!(script.contains("CPU_CORES=\"4\""));
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod installer;
pub mod shell;
pub mod ui;
pub mod vm;

pub use error::{HostprepError, Result};

//! CLI argument definitions.
//!
//! Each binary has its own top-level parser. Flags shared by both live in
//! [`GlobalArgs`] and are flattened into each.

use clap::{ArgAction, Args, Parser};
use std::path::PathBuf;

use crate::ui::OutputMode;

/// Flags accepted by every hostprep binary.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// Path to config file (overrides ~/.config/hostprep/config.yml)
    #[arg(short, long, env = "HOSTPREP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Minimal output (repeat to show errors only)
    #[arg(short, long, action = ArgAction::Count)]
    pub quiet: u8,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl GlobalArgs {
    /// Output mode selected by `--verbose` and `--quiet`.
    pub fn output_mode(&self) -> OutputMode {
        OutputMode::from_flags(self.verbose, self.quiet)
    }
}

/// Install mutagen via a package manager or the GitHub release.
#[derive(Debug, Parser)]
#[command(name = "install-mutagen")]
#[command(author, version, about, long_about = None)]
pub struct InstallCli {
    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Clone OSX-KVM and add a custom boot script sized to this host.
#[derive(Debug, Parser)]
#[command(name = "setup-osx-kvm")]
#[command(author, version, about, long_about = None)]
pub struct VmSetupCli {
    /// Target directory for the OSX-KVM repository (default: ~/OSX-KVM)
    #[arg(long)]
    pub target_dir: Option<PathBuf>,

    /// Username for hugepages ownership (default: current user)
    #[arg(long)]
    pub username: Option<String>,

    #[command(flatten)]
    pub global: GlobalArgs,
}

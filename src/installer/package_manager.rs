//! Package-manager installation strategy.
//!
//! Managers are tried in the fixed order of [`PACKAGE_MANAGERS`]. A manager
//! is only considered when its executable resolves on PATH; the first
//! install that exits 0 ends the phase.

use crate::config::InstallerConfig;
use crate::shell::{display_command, CommandOptions, CommandRunner};
use crate::ui::UserInterface;

use super::{display_name, elevate};

/// A package manager the installer knows how to drive.
pub struct PackageManagerDef {
    /// Executable probed on PATH.
    pub name: &'static str,
    /// Refreshes the package index before installing.
    pub update: Option<&'static [&'static str]>,
    /// Builds the install command line for the configured tool.
    pub install: Option<fn(&InstallerConfig) -> Vec<String>>,
    /// Whether the commands need root.
    pub privileged: bool,
}

/// Known package managers, in probe order.
///
/// `yum` and `dnf` are probed but carry no install command: the tool is not
/// packaged in their default repositories.
pub const PACKAGE_MANAGERS: &[PackageManagerDef] = &[
    PackageManagerDef {
        name: "apt",
        update: Some(&["apt-get", "update", "-y"]),
        install: Some(apt_install),
        privileged: true,
    },
    PackageManagerDef {
        name: "yum",
        update: None,
        install: None,
        privileged: true,
    },
    PackageManagerDef {
        name: "dnf",
        update: None,
        install: None,
        privileged: true,
    },
    PackageManagerDef {
        name: "pacman",
        update: None,
        install: Some(pacman_install),
        privileged: true,
    },
    PackageManagerDef {
        name: "brew",
        update: None,
        install: Some(brew_install),
        privileged: false,
    },
];

fn apt_install(config: &InstallerConfig) -> Vec<String> {
    vec![
        "apt-get".to_string(),
        "install".to_string(),
        "-y".to_string(),
        config.package.clone(),
    ]
}

fn pacman_install(config: &InstallerConfig) -> Vec<String> {
    vec![
        "pacman".to_string(),
        "-S".to_string(),
        "--noconfirm".to_string(),
        config.package.clone(),
    ]
}

fn brew_install(config: &InstallerConfig) -> Vec<String> {
    vec![
        "brew".to_string(),
        "install".to_string(),
        config.homebrew_formula.clone(),
    ]
}

/// Try each available package manager in order.
///
/// Returns the name of the manager that installed the tool, or `None` when
/// no manager is present or every install failed.
pub fn install_via_package_manager(
    config: &InstallerConfig,
    runner: &dyn CommandRunner,
    ui: &mut dyn UserInterface,
    elevated: bool,
) -> Option<&'static str> {
    let tool = display_name(&config.tool);

    for pm in PACKAGE_MANAGERS {
        if runner.which(pm.name).is_none() {
            tracing::debug!("Package manager {} not found", pm.name);
            continue;
        }
        ui.message(&format!("Found {} package manager", pm.name));

        if let Some(update) = pm.update {
            let argv: Vec<String> = update.iter().map(|s| s.to_string()).collect();
            let (program, args) = command_for(pm, argv, elevated);
            ui.message("Updating package list...");
            let result = runner.run(&program, &args, &CommandOptions::default());
            if !result.success {
                // Non-fatal: the install below may still work with a stale index.
                tracing::warn!("{} failed: {}", display_command(&program, &args), result.stderr);
                ui.warning(&format!(
                    "Failed to update package list: {}",
                    result.error_summary()
                ));
            }
        }

        let Some(build_install) = pm.install else {
            tracing::debug!("No install command known for {}", pm.name);
            continue;
        };

        let (program, args) = command_for(pm, build_install(config), elevated);
        let label = format!("Installing {} via {}...", config.tool, pm.name);
        let mut spinner = if program == "sudo" {
            ui.start_status(&label)
        } else {
            ui.start_spinner(&label)
        };
        let result = runner.run(&program, &args, &CommandOptions::default());

        if ui.output_mode().shows_command_output() && !result.stdout.trim().is_empty() {
            ui.message(result.stdout.trim_end());
        }

        if result.success {
            spinner.finish_success(&format!("{} installed successfully!", tool));
            return Some(pm.name);
        }

        spinner.finish_error(&format!("Failed to install via {}", pm.name));
        ui.warning(&format!(
            "Failed to install via {}: {}",
            pm.name,
            result.error_summary()
        ));
    }

    None
}

fn command_for(pm: &PackageManagerDef, argv: Vec<String>, elevated: bool) -> (String, Vec<String>) {
    if pm.privileged {
        elevate(argv, elevated)
    } else {
        split_argv(argv)
    }
}

fn split_argv(mut argv: Vec<String>) -> (String, Vec<String>) {
    if argv.is_empty() {
        return (String::new(), argv);
    }
    let program = argv.remove(0);
    (program, argv)
}

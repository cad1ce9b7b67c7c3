//! Release-archive installation strategy.
//!
//! Downloads the pinned Linux tarball for the host architecture, unpacks it
//! and copies the binary into the install directory. Temporary artifacts are
//! removed on every exit path.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::InstallerConfig;
use crate::shell::{argv, CommandOptions, CommandRunner};
use crate::ui::UserInterface;

use super::elevate;

/// Machine identifiers and the release architecture they map to.
pub const ARCH_MAP: &[(&str, &str)] = &[
    ("x86_64", "amd64"),
    ("amd64", "amd64"),
    ("aarch64", "arm64"),
    ("arm64", "arm64"),
    ("armv7l", "arm"),
];

/// Architecture used for identifiers missing from [`ARCH_MAP`].
pub const DEFAULT_ARCH: &str = "amd64";

/// Errors that end the release strategy.
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Release installs are only supported on linux (detected {os})")]
    UnsupportedOs { os: String },

    #[error("Failed to download {url}: {message}")]
    Download { url: String, message: String },

    #[error("Failed to extract {archive}: {message}")]
    Extract { archive: PathBuf, message: String },

    #[error("Archive did not contain {}", path.display())]
    BinaryMissing { path: PathBuf },

    #[error("Failed to install {}: {message}", path.display())]
    Install { path: PathBuf, message: String },
}

/// Operating system and machine identifier of the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostPlatform {
    pub os: String,
    pub machine: String,
}

impl HostPlatform {
    /// Detect the host platform.
    ///
    /// The machine identifier comes from `uname -m`, falling back to the
    /// architecture this binary was compiled for.
    pub fn detect(runner: &dyn CommandRunner) -> Self {
        let uname = runner.run("uname", &argv(&["-m"]), &CommandOptions::default());
        let machine = match uname.stdout.trim() {
            m if uname.success && !m.is_empty() => m.to_string(),
            _ => std::env::consts::ARCH.to_string(),
        };

        Self {
            os: std::env::consts::OS.to_string(),
            machine,
        }
    }
}

/// Map a machine identifier to a release architecture.
///
/// Matching is case-insensitive; unknown identifiers map to [`DEFAULT_ARCH`].
pub fn normalize_arch(machine: &str) -> &'static str {
    let machine = machine.trim().to_lowercase();
    ARCH_MAP
        .iter()
        .find(|(id, _)| *id == machine)
        .map(|(_, arch)| *arch)
        .unwrap_or(DEFAULT_ARCH)
}

/// Download URL for the configured version and `arch`.
pub fn release_url(config: &InstallerConfig, arch: &str) -> String {
    format!(
        "{base}/download/v{ver}/{tool}_linux_{arch}_v{ver}.tar.gz",
        base = config.release_base_url.trim_end_matches('/'),
        ver = config.version,
        tool = config.tool,
        arch = arch,
    )
}

/// Temporary locations used by one release install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleasePaths {
    pub archive: PathBuf,
    pub extract_dir: PathBuf,
}

impl ReleasePaths {
    pub fn new(config: &InstallerConfig) -> Self {
        Self {
            archive: config.temp_dir.join(format!("{}.tar.gz", config.tool)),
            extract_dir: config.temp_dir.join(format!("{}_extract", config.tool)),
        }
    }
}

/// Removes the archive and extraction directory when dropped.
struct TempArtifacts<'a> {
    paths: &'a ReleasePaths,
}

impl Drop for TempArtifacts<'_> {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.paths.archive) {
            tracing::debug!("Cleanup of {}: {}", self.paths.archive.display(), e);
        }
        if let Err(e) = fs::remove_dir_all(&self.paths.extract_dir) {
            tracing::debug!("Cleanup of {}: {}", self.paths.extract_dir.display(), e);
        }
    }
}

/// Install the tool from its release archive.
///
/// Returns the installed binary path.
pub fn install_from_release(
    config: &InstallerConfig,
    platform: &HostPlatform,
    runner: &dyn CommandRunner,
    ui: &mut dyn UserInterface,
    elevated: bool,
) -> Result<PathBuf, ReleaseError> {
    if platform.os != "linux" {
        return Err(ReleaseError::UnsupportedOs {
            os: platform.os.clone(),
        });
    }

    let arch = normalize_arch(&platform.machine);
    ui.message(&format!("Detected architecture: {}", arch));

    let url = release_url(config, arch);
    let paths = ReleasePaths::new(config);
    let _cleanup = TempArtifacts { paths: &paths };

    download(&url, &paths.archive, runner, ui)?;
    let binary = extract(config, &paths, runner)?;
    install_binary(config, &binary, runner, ui, elevated)
}

fn download(
    url: &str,
    archive: &Path,
    runner: &dyn CommandRunner,
    ui: &mut dyn UserInterface,
) -> Result<(), ReleaseError> {
    let mut spinner = ui.start_spinner(&format!("Downloading from: {}", url));
    let args = vec![
        "-fL".to_string(),
        "-o".to_string(),
        archive.display().to_string(),
        url.to_string(),
    ];
    let result = runner.run("curl", &args, &CommandOptions::default());

    if !result.success {
        spinner.finish_error("Download failed");
        return Err(ReleaseError::Download {
            url: url.to_string(),
            message: result.error_summary(),
        });
    }
    spinner.finish_success("Downloaded");
    Ok(())
}

fn extract(
    config: &InstallerConfig,
    paths: &ReleasePaths,
    runner: &dyn CommandRunner,
) -> Result<PathBuf, ReleaseError> {
    fs::create_dir_all(&paths.extract_dir).map_err(|e| ReleaseError::Extract {
        archive: paths.archive.clone(),
        message: e.to_string(),
    })?;

    let args = vec![
        "-xzf".to_string(),
        paths.archive.display().to_string(),
        "-C".to_string(),
        paths.extract_dir.display().to_string(),
    ];
    let result = runner.run("tar", &args, &CommandOptions::default());
    if !result.success {
        return Err(ReleaseError::Extract {
            archive: paths.archive.clone(),
            message: result.error_summary(),
        });
    }

    let binary = paths.extract_dir.join(&config.tool);
    if !binary.exists() {
        return Err(ReleaseError::BinaryMissing { path: binary });
    }
    Ok(binary)
}

fn install_binary(
    config: &InstallerConfig,
    binary: &Path,
    runner: &dyn CommandRunner,
    ui: &mut dyn UserInterface,
    elevated: bool,
) -> Result<PathBuf, ReleaseError> {
    let target = config.install_dir.join(&config.tool);
    ui.message(&format!("Installing to {}...", target.display()));

    let steps = [
        vec![
            "cp".to_string(),
            binary.display().to_string(),
            target.display().to_string(),
        ],
        vec![
            "chmod".to_string(),
            "+x".to_string(),
            target.display().to_string(),
        ],
    ];

    for step in steps {
        let (program, args) = elevate(step, elevated);
        let result = runner.run(&program, &args, &CommandOptions::default());
        if !result.success {
            return Err(ReleaseError::Install {
                path: target,
                message: result.error_summary(),
            });
        }
    }

    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::{CommandResult, MockRunner};
    use crate::ui::MockUI;
    use std::time::Duration;
    use tempfile::TempDir;

    fn linux(machine: &str) -> HostPlatform {
        HostPlatform {
            os: "linux".to_string(),
            machine: machine.to_string(),
        }
    }

    fn config_in(temp: &TempDir) -> InstallerConfig {
        InstallerConfig {
            temp_dir: temp.path().to_path_buf(),
            install_dir: PathBuf::from("/opt/bin"),
            ..Default::default()
        }
    }

    fn ok() -> CommandResult {
        CommandResult::success(String::new(), String::new(), Duration::ZERO)
    }

    /// Runner whose curl writes the archive and whose tar unpacks `contents`.
    fn release_runner(contents: Option<&'static str>) -> MockRunner {
        let mut runner = MockRunner::new();
        runner.on_command("curl", |inv| {
            fs::write(&inv.args[2], b"archive").unwrap();
            ok()
        });
        runner.on_command("tar", move |inv| {
            if let Some(name) = contents {
                fs::write(Path::new(&inv.args[3]).join(name), b"#!/bin/sh\n").unwrap();
            }
            ok()
        });
        runner
    }

    #[test]
    fn arch_mapping() {
        assert_eq!(normalize_arch("x86_64"), "amd64");
        assert_eq!(normalize_arch("amd64"), "amd64");
        assert_eq!(normalize_arch("aarch64"), "arm64");
        assert_eq!(normalize_arch("arm64"), "arm64");
        assert_eq!(normalize_arch("armv7l"), "arm");
    }

    #[test]
    fn arch_mapping_ignores_case_and_defaults_to_amd64() {
        assert_eq!(normalize_arch("X86_64"), "amd64");
        assert_eq!(normalize_arch("AARCH64\n"), "arm64");
        assert_eq!(normalize_arch("riscv64"), "amd64");
        assert_eq!(normalize_arch(""), "amd64");
    }

    #[test]
    fn url_for_pinned_version() {
        let config = InstallerConfig::default();
        assert_eq!(
            release_url(&config, "arm64"),
            "https://github.com/mutagen-io/mutagen/releases/download/v0.17.3/mutagen_linux_arm64_v0.17.3.tar.gz"
        );
    }

    #[test]
    fn url_tolerates_trailing_slash() {
        let config = InstallerConfig {
            release_base_url: "https://example.com/releases/".to_string(),
            ..Default::default()
        };
        assert!(release_url(&config, "amd64")
            .starts_with("https://example.com/releases/download/v0.17.3/"));
    }

    #[test]
    fn detect_uses_uname() {
        let mut runner = MockRunner::new();
        runner.succeed("uname -m", "aarch64\n");

        let platform = HostPlatform::detect(&runner);
        assert_eq!(platform.machine, "aarch64");
        assert_eq!(platform.os, std::env::consts::OS);
    }

    #[test]
    fn detect_falls_back_to_compiled_arch() {
        let mut runner = MockRunner::new();
        runner.fail("uname -m", "not found");

        let platform = HostPlatform::detect(&runner);
        assert_eq!(platform.machine, std::env::consts::ARCH);
    }

    #[test]
    fn non_linux_is_rejected_before_any_command() {
        let temp = TempDir::new().unwrap();
        let runner = MockRunner::new();
        let mut ui = MockUI::new();
        let platform = HostPlatform {
            os: "macos".to_string(),
            machine: "arm64".to_string(),
        };

        let err =
            install_from_release(&config_in(&temp), &platform, &runner, &mut ui, false).unwrap_err();

        assert!(matches!(err, ReleaseError::UnsupportedOs { .. }));
        assert!(runner.is_untouched());
    }

    #[test]
    fn successful_install_runs_expected_commands() {
        let temp = TempDir::new().unwrap();
        let config = config_in(&temp);
        let runner = release_runner(Some("mutagen"));
        let mut ui = MockUI::new();

        let path =
            install_from_release(&config, &linux("x86_64"), &runner, &mut ui, false).unwrap();

        assert_eq!(path, PathBuf::from("/opt/bin/mutagen"));
        let archive = temp.path().join("mutagen.tar.gz");
        let extract = temp.path().join("mutagen_extract");
        assert_eq!(
            runner.commands(),
            vec![
                format!(
                    "curl -fL -o {} https://github.com/mutagen-io/mutagen/releases/download/v0.17.3/mutagen_linux_amd64_v0.17.3.tar.gz",
                    archive.display()
                ),
                format!("tar -xzf {} -C {}", archive.display(), extract.display()),
                format!("sudo cp {} /opt/bin/mutagen", extract.join("mutagen").display()),
                "sudo chmod +x /opt/bin/mutagen".to_string(),
            ]
        );
        assert!(ui.has_message("Detected architecture: amd64"));
    }

    #[test]
    fn temporary_files_are_removed_after_success() {
        let temp = TempDir::new().unwrap();
        let config = config_in(&temp);
        let runner = release_runner(Some("mutagen"));
        let mut ui = MockUI::new();

        install_from_release(&config, &linux("x86_64"), &runner, &mut ui, true).unwrap();

        assert!(!temp.path().join("mutagen.tar.gz").exists());
        assert!(!temp.path().join("mutagen_extract").exists());
    }

    #[test]
    fn missing_binary_fails_and_still_cleans_up() {
        let temp = TempDir::new().unwrap();
        let config = config_in(&temp);
        let runner = release_runner(Some("README.md"));
        let mut ui = MockUI::new();

        let err =
            install_from_release(&config, &linux("x86_64"), &runner, &mut ui, false).unwrap_err();

        assert!(matches!(err, ReleaseError::BinaryMissing { .. }));
        assert!(!runner.ran("sudo cp"));
        assert!(!temp.path().join("mutagen.tar.gz").exists());
        assert!(!temp.path().join("mutagen_extract").exists());
    }

    #[test]
    fn download_failure_stops_the_strategy() {
        let temp = TempDir::new().unwrap();
        let config = config_in(&temp);
        let mut runner = MockRunner::new();
        runner.set_default_success(false);
        let mut ui = MockUI::new();

        let err =
            install_from_release(&config, &linux("aarch64"), &runner, &mut ui, false).unwrap_err();

        assert!(matches!(err, ReleaseError::Download { .. }));
        assert!(err.to_string().contains("mutagen_linux_arm64_v0.17.3.tar.gz"));
        assert_eq!(runner.commands().len(), 1);
    }

    #[test]
    fn extract_failure_stops_the_strategy() {
        let temp = TempDir::new().unwrap();
        let config = config_in(&temp);
        let mut runner = MockRunner::new();
        runner.on_command("curl", |inv| {
            fs::write(&inv.args[2], b"not a tarball").unwrap();
            ok()
        });
        runner.on_command("tar", |_| {
            CommandResult::failure(
                Some(2),
                String::new(),
                "gzip: stdin: not in gzip format".to_string(),
                Duration::ZERO,
            )
        });
        let mut ui = MockUI::new();

        let err =
            install_from_release(&config, &linux("x86_64"), &runner, &mut ui, false).unwrap_err();

        match &err {
            ReleaseError::Extract { message, .. } => {
                assert_eq!(message, "gzip: stdin: not in gzip format")
            }
            other => panic!("Expected Extract error, got {other:?}"),
        }
        assert_eq!(runner.commands().len(), 2);
        assert!(!runner.ran("sudo cp"));
        assert!(!temp.path().join("mutagen.tar.gz").exists());
        assert!(!temp.path().join("mutagen_extract").exists());
    }

    #[test]
    fn copy_failure_is_fatal() {
        let temp = TempDir::new().unwrap();
        let config = config_in(&temp);
        let mut runner = release_runner(Some("mutagen"));
        let extracted = temp.path().join("mutagen_extract").join("mutagen");
        runner.fail(
            &format!("sudo cp {} /opt/bin/mutagen", extracted.display()),
            "cp: cannot create regular file: Read-only file system",
        );
        let mut ui = MockUI::new();

        let err =
            install_from_release(&config, &linux("x86_64"), &runner, &mut ui, false).unwrap_err();

        match err {
            ReleaseError::Install { path, message } => {
                assert_eq!(path, PathBuf::from("/opt/bin/mutagen"));
                assert!(message.contains("Read-only file system"));
            }
            other => panic!("Expected Install error, got {other:?}"),
        }
        assert!(runner.ran("sudo cp"));
        assert!(!runner.ran("sudo chmod"));
        assert!(!temp.path().join("mutagen_extract").exists());
    }

    #[test]
    fn chmod_failure_is_fatal() {
        let temp = TempDir::new().unwrap();
        let config = config_in(&temp);
        let mut runner = release_runner(Some("mutagen"));
        runner.fail("chmod +x /opt/bin/mutagen", "Operation not permitted");
        let mut ui = MockUI::new();

        let err =
            install_from_release(&config, &linux("x86_64"), &runner, &mut ui, true).unwrap_err();

        match err {
            ReleaseError::Install { message, .. } => {
                assert_eq!(message, "Operation not permitted")
            }
            other => panic!("Expected Install error, got {other:?}"),
        }
        assert!(!temp.path().join("mutagen_extract").exists());
    }

    #[test]
    fn cleanup_ignores_missing_artifacts() {
        let temp = TempDir::new().unwrap();
        let paths = ReleasePaths::new(&config_in(&temp));
        drop(TempArtifacts { paths: &paths });
        assert!(!paths.archive.exists());
    }
}

//! Host resource detection and VM sizing.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::VmConfig;

/// Why host memory could not be determined.
#[derive(Error, Debug)]
pub enum MemInfoError {
    #[error("{0}")]
    Read(#[from] std::io::Error),

    #[error("no MemTotal entry")]
    MissingTotal,

    #[error("invalid MemTotal value '{0}'")]
    InvalidValue(String),
}

/// Total memory in MB from `/proc/meminfo` formatted content.
///
/// Reads the `MemTotal:` line, whose value is in kB.
pub fn parse_meminfo(content: &str) -> Result<u64, MemInfoError> {
    let line = content
        .lines()
        .find(|line| line.starts_with("MemTotal:"))
        .ok_or(MemInfoError::MissingTotal)?;

    let value = line.split_whitespace().nth(1).unwrap_or_default();
    let kb: u64 = value
        .parse()
        .map_err(|_| MemInfoError::InvalidValue(value.to_string()))?;

    Ok(kb / 1024)
}

/// Read total memory in MB from a meminfo file.
pub fn read_meminfo(path: &Path) -> Result<u64, MemInfoError> {
    let content = fs::read_to_string(path)?;
    parse_meminfo(&content)
}

/// Number of logical CPUs on the host.
pub fn logical_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Detected host resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostResources {
    pub cores: usize,
    /// Total memory in MB, if it could be read.
    pub memory_mb: Option<u64>,
}

/// Resources handed to the VM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VmAllocation {
    pub cores: usize,
    pub threads: usize,
    pub ram_mb: u64,
}

impl VmAllocation {
    /// Allocate half of the host to the VM.
    ///
    /// Cores never drop below 1 and RAM never below `min_ram_mb`. Unknown
    /// host memory uses `fallback_ram_mb`.
    pub fn from_host(host: &HostResources, config: &VmConfig) -> Self {
        let cores = (host.cores / 2).max(1);
        let ram_mb = match host.memory_mb {
            Some(mb) => (mb / 2).max(config.min_ram_mb),
            None => config.fallback_ram_mb,
        };

        Self {
            cores,
            threads: cores,
            ram_mb,
        }
    }
}

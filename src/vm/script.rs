//! Custom OpenCore boot script generation.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{HostprepError, Result};

use super::resources::VmAllocation;
use super::template::{render, TemplateContext};

/// Permission bits of the generated script.
pub const SCRIPT_MODE: u32 = 0o755;

/// QEMU launcher written into the repository checkout.
///
/// Paths are relative to the checkout, so the script is meant to be run
/// from there.
pub const BOOT_SCRIPT_TEMPLATE: &str = r#"#!/usr/bin/env bash

# Special thanks to:
# https://github.com/Leoyzen/KVM-Opencore
# https://github.com/thenickdude/KVM-Opencore/
# https://github.com/qemu/qemu/blob/master/docs/usb2.txt
#
# qemu-img create -f qcow2 mac_hdd_ng.img 128G
#
# echo 1 > /sys/module/kvm/parameters/ignore_msrs (this is required)

###############################################################################
# NOTE: Tweak the "MY_OPTIONS" line in case you are having booting problems!
###############################################################################
#
# Change `Penryn` to `Haswell-noTSX` in OpenCore-Boot.sh file for macOS Sonoma!
#
###############################################################################

MY_OPTIONS="+ssse3,+sse4.2,+popcnt,+aes,check"

# Auto-configured: Half of host resources allocated to VM
ALLOCATED_RAM="${vm_ram_mb}"
CPU_SOCKETS="1"
CPU_CORES="${vm_cores}"
CPU_THREADS="${vm_threads}"

REPO_PATH="."
OVMF_DIR="."

args=(
  -enable-kvm
  -machine q35,accel=kvm,usb=off,vmport=off,dump-guest-core=off
  -m "$ALLOCATED_RAM"

  # 1. Performance: Hugepages & Memory backing
  -mem-path /dev/hugepages
  -mem-prealloc

  # 2. CPU: Keep 'host' but ensure 'topoext' is there for AMD or proper cache for Intel
  -cpu Haswell-noTSX,kvm=on,vendor=GenuineIntel,+invtsc,+hypervisor,check,"$MY_OPTIONS"
  -smp "$CPU_THREADS",cores="$CPU_CORES",sockets="$CPU_SOCKETS"

  -device isa-applesmc,osk="ourhardworkbythesewordsguardedpleasedontsteal(c)AppleComputerInc"
  -smbios type=2

  -drive if=pflash,format=raw,readonly=on,file="$REPO_PATH/OVMF_CODE.fd"
  -drive if=pflash,format=raw,file="$REPO_PATH/OVMF_VARS-1920x1080.fd"

  # OpenCore
  -drive if=none,id=OpenCore,format=qcow2,snapshot=on,file="$REPO_PATH/OpenCore/OpenCore.qcow2",aio=native,cache=none
  -device nvme,drive=OpenCore,serial=4321,bootindex=0

  # Installer
  -drive if=none,id=InstallMedia,format=raw,file="$REPO_PATH/BaseSystem.img"
  -device virtio-blk-pci,drive=InstallMedia

  # Audio
  -device ich9-intel-hda -device hda-duplex

  # USB
  -device qemu-xhci
  -device usb-kbd
  -device usb-tablet

  # macOS disk
  -drive if=none,id=MacHDD,format=qcow2,file="$REPO_PATH/mac_hdd_ng.img"
  -device nvme,drive=MacHDD,serial=1234

  # 4. Networking: Use vhost for kernel-level speed
  -netdev user,id=net0,hostfwd=tcp::2222-:22,hostfwd=tcp::8081-:8081
  -device virtio-net-pci,netdev=net0,mac=52:54:00:c9:18:27

  # Display (IMPORTANT)
  -display gtk,gl=on,show-cursor=on
  #-device ramfb

  -monitor stdio
)

# Setup hugepages ownership
sudo chown ${username} /dev/hugepages 2>/dev/null || true

# Execute QEMU
qemu-system-x86_64 "$${args[@]}"
"#;

/// Inputs for one boot script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootScript {
    /// Owner of `/dev/hugepages`.
    pub username: String,
    pub allocation: VmAllocation,
}

impl BootScript {
    pub fn new(username: impl Into<String>, allocation: VmAllocation) -> Self {
        Self {
            username: username.into(),
            allocation,
        }
    }

    fn context(&self) -> TemplateContext {
        TemplateContext::new()
            .with("vm_ram_mb", self.allocation.ram_mb)
            .with("vm_cores", self.allocation.cores)
            .with("vm_threads", self.allocation.threads)
            .with("username", &self.username)
    }

    /// Render the script text.
    pub fn render(&self) -> Result<String> {
        render(BOOT_SCRIPT_TEMPLATE, &self.context())
    }

    /// Render and write the script into `dir` as `file_name`.
    ///
    /// An existing file is overwritten. The result is mode 0755.
    pub fn write_to(&self, dir: &Path, file_name: &str) -> Result<PathBuf> {
        let content = self.render()?;
        let path = dir.join(file_name);
        write_executable(&path, &content)?;
        Ok(path)
    }
}

fn write_executable(path: &Path, content: &str) -> Result<()> {
    let wrap = |source: std::io::Error| HostprepError::ScriptWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    fs::write(path, content).map_err(wrap)?;
    set_mode(path).map_err(wrap)
}

#[cfg(unix)]
fn set_mode(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(SCRIPT_MODE))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

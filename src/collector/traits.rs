//! Abstractions over the kernel interfaces the collectors read from.
//!
//! `FileSystem` covers the pseudo-file side (`/proc`, `/sys`, `/etc`), `Host`
//! covers the few metrics that only come from system calls or CPU
//! instructions. Both have real and mock implementations so collectors can be
//! exercised without a Linux kernel underneath.

use std::io;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};

use tracing::trace;

/// Abstraction for filesystem operations.
///
/// This trait allows collectors to read from the real filesystem or from
/// a mock implementation for testing purposes.
pub trait FileSystem {
    /// Reads the entire contents of a file as a string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Lists entries in a directory.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;
}

/// Reads a pseudo-file start to finish, turning any failure into a miss.
pub fn read_source<F: FileSystem + ?Sized>(fs: &F, path: &Path) -> Option<String> {
    match fs.read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) => {
            trace!(path = %path.display(), error = %e, "source unavailable");
            None
        }
    }
}

/// Lists a directory sorted by path, or returns an empty list on a miss.
pub fn read_dir_sorted<F: FileSystem + ?Sized>(fs: &F, path: &Path) -> Vec<PathBuf> {
    match fs.read_dir(path) {
        Ok(mut entries) => {
            entries.sort();
            entries
        }
        Err(e) => {
            trace!(path = %path.display(), error = %e, "directory unavailable");
            Vec::new()
        }
    }
}

/// Real filesystem implementation that delegates to `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl RealFs {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let entries = std::fs::read_dir(path)?;
        let mut paths = Vec::new();
        for entry in entries {
            paths.push(entry?.path());
        }
        Ok(paths)
    }
}

/// Block counts returned by a filesystem statistics query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FsStats {
    pub blocks: u64,
    pub blocks_free: u64,
    pub fragment_size: u64,
}

/// RAM and swap totals in bytes, as reported by the system-info call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryTotals {
    pub total_ram: u64,
    pub free_ram: u64,
    pub total_swap: u64,
    pub free_swap: u64,
}

/// Vendor and brand strings of the processor.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct CpuIdentity {
    pub vendor: String,
    pub model: String,
}

/// Host queries that are not backed by a readable file.
pub trait Host {
    /// Filesystem statistics for a mount point.
    fn fs_stats(&self, mount_point: &Path) -> io::Result<FsStats>;

    /// `(interface, address)` pairs for every IPv4 address, in discovery order.
    fn ipv4_addresses(&self) -> io::Result<Vec<(String, Ipv4Addr)>>;

    /// RAM and swap totals.
    fn memory_totals(&self) -> io::Result<MemoryTotals>;

    fn hostname(&self) -> Option<String>;

    /// Name of the user running this process.
    fn login_user(&self) -> Option<String>;

    /// Processor identification straight from the CPU, when the architecture
    /// has such an instruction.
    fn cpu_identity(&self) -> Option<CpuIdentity>;

    /// Size of a memory page in bytes.
    fn page_size(&self) -> u64;
}

/// `Host` backed by the running kernel.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealHost;

impl RealHost {
    pub fn new() -> Self {
        Self
    }
}

impl Host for RealHost {
    fn fs_stats(&self, mount_point: &Path) -> io::Result<FsStats> {
        let stat = nix::sys::statvfs::statvfs(mount_point).map_err(io::Error::from)?;
        Ok(FsStats {
            blocks: stat.blocks() as u64,
            blocks_free: stat.blocks_free() as u64,
            fragment_size: stat.fragment_size() as u64,
        })
    }

    fn ipv4_addresses(&self) -> io::Result<Vec<(String, Ipv4Addr)>> {
        let addrs = nix::ifaddrs::getifaddrs().map_err(io::Error::from)?;
        Ok(addrs
            .filter_map(|ifa| {
                let sin = ifa.address.as_ref()?.as_sockaddr_in().copied()?;
                let addr = std::net::SocketAddrV4::from(sin);
                Some((ifa.interface_name, *addr.ip()))
            })
            .collect())
    }

    #[cfg(any(target_os = "linux", target_os = "android"))]
    fn memory_totals(&self) -> io::Result<MemoryTotals> {
        let info = nix::sys::sysinfo::sysinfo().map_err(io::Error::from)?;
        Ok(MemoryTotals {
            total_ram: info.ram_total(),
            free_ram: info.ram_unused(),
            total_swap: info.swap_total(),
            free_swap: info.swap_free(),
        })
    }

    #[cfg(not(any(target_os = "linux", target_os = "android")))]
    fn memory_totals(&self) -> io::Result<MemoryTotals> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "sysinfo is only available on Linux",
        ))
    }

    fn hostname(&self) -> Option<String> {
        nix::unistd::gethostname()
            .ok()
            .and_then(|name| name.into_string().ok())
            .filter(|name| !name.is_empty())
    }

    fn login_user(&self) -> Option<String> {
        if let Ok(user) = std::env::var("USER")
            && !user.is_empty()
        {
            return Some(user);
        }
        nix::unistd::User::from_uid(nix::unistd::getuid())
            .ok()
            .flatten()
            .map(|u| u.name)
    }

    fn cpu_identity(&self) -> Option<CpuIdentity> {
        cpuid_identity()
    }

    fn page_size(&self) -> u64 {
        match nix::unistd::sysconf(nix::unistd::SysconfVar::PAGE_SIZE) {
            Ok(Some(size)) if size > 0 => size as u64,
            _ => 4096,
        }
    }
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
#[allow(unused_unsafe)]
fn cpuid_identity() -> Option<CpuIdentity> {
    #[cfg(target_arch = "x86")]
    use std::arch::x86::__cpuid;
    #[cfg(target_arch = "x86_64")]
    use std::arch::x86_64::__cpuid;

    // SAFETY: CPUID is available on every x86_64 CPU and on every x86 CPU
    // this crate targets; the leaves queried are read-only.
    let leaf0 = unsafe { __cpuid(0) };
    let mut vendor_bytes = Vec::with_capacity(12);
    for reg in [leaf0.ebx, leaf0.edx, leaf0.ecx] {
        vendor_bytes.extend_from_slice(&reg.to_le_bytes());
    }

    let max_extended = unsafe { __cpuid(0x8000_0000) }.eax;
    let mut brand_bytes = Vec::with_capacity(48);
    if max_extended >= 0x8000_0004 {
        for leaf in 0x8000_0002u32..=0x8000_0004 {
            let r = unsafe { __cpuid(leaf) };
            for reg in [r.eax, r.ebx, r.ecx, r.edx] {
                brand_bytes.extend_from_slice(&reg.to_le_bytes());
            }
        }
    }

    let vendor = cpuid_string(&vendor_bytes);
    let model = cpuid_string(&brand_bytes);
    if vendor.is_empty() && model.is_empty() {
        return None;
    }
    Some(CpuIdentity { vendor, model })
}

#[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
fn cpuid_identity() -> Option<CpuIdentity> {
    None
}

/// Turns a NUL-padded register dump into a trimmed string.
#[cfg_attr(not(any(target_arch = "x86", target_arch = "x86_64")), allow(dead_code))]
fn cpuid_string(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_real_fs_read_to_string() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "42").unwrap();

        let fs = RealFs::new();
        assert_eq!(fs.read_to_string(file.path()).unwrap(), "42\n");
    }

    #[test]
    fn test_real_fs_read_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a"), "1").unwrap();
        std::fs::write(dir.path().join("b"), "2").unwrap();

        let fs = RealFs::new();
        assert!(fs.read_to_string(&dir.path().join("missing")).is_err());

        let entries = read_dir_sorted(&fs, dir.path());
        assert_eq!(entries, vec![dir.path().join("a"), dir.path().join("b")]);
    }

    #[test]
    fn test_read_source_miss() {
        let fs = RealFs::new();
        assert_eq!(read_source(&fs, Path::new("/nonexistent/path/12345")), None);
        assert!(read_dir_sorted(&fs, Path::new("/nonexistent/path/12345")).is_empty());
    }

    #[test]
    fn test_cpuid_string_trims_padding() {
        let mut raw = b"  Intel(R) Core(TM)".to_vec();
        raw.extend_from_slice(&[0, 0, 0]);
        assert_eq!(cpuid_string(&raw), "Intel(R) Core(TM)");
        assert_eq!(cpuid_string(&[0; 12]), "");
    }
}

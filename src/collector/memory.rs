//! RAM and swap usage.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::collector::config::MemorySource;
use crate::collector::procfs::parse_meminfo;
use crate::collector::traits::{FileSystem, Host, read_source};
use crate::model::MemoryInfo;

/// Bytes per kB as used by `/proc/meminfo`.
const KB: u64 = 1024;

/// Collects RAM and swap totals from the configured [`MemorySource`].
pub struct MemoryCollector<F: FileSystem, H: Host> {
    fs: F,
    host: H,
    meminfo_path: PathBuf,
    source: MemorySource,
}

impl<F: FileSystem, H: Host> MemoryCollector<F, H> {
    pub fn new(fs: F, host: H, proc_path: &Path, source: MemorySource) -> Self {
        Self {
            fs,
            host,
            meminfo_path: proc_path.join("meminfo"),
            source,
        }
    }

    /// Current memory snapshot; all zeros if the source is unavailable.
    pub fn collect(&self) -> MemoryInfo {
        match self.source {
            MemorySource::SysInfo => self.from_sysinfo(),
            MemorySource::MemInfo => self.from_meminfo(),
        }
    }

    fn from_sysinfo(&self) -> MemoryInfo {
        let totals = match self.host.memory_totals() {
            Ok(totals) => totals,
            Err(e) => {
                debug!(error = %e, "sysinfo unavailable");
                return MemoryInfo::default();
            }
        };
        MemoryInfo {
            total_ram: totals.total_ram,
            used_ram: totals.total_ram.saturating_sub(totals.free_ram),
            free_ram: totals.free_ram,
            total_swap: totals.total_swap,
            used_swap: totals.total_swap.saturating_sub(totals.free_swap),
            free_swap: totals.free_swap,
        }
    }

    fn from_meminfo(&self) -> MemoryInfo {
        let Some(content) = read_source(&self.fs, &self.meminfo_path) else {
            return MemoryInfo::default();
        };
        let values = parse_meminfo(&content);
        let get = |key: &str| values.get(key).copied().unwrap_or(0).saturating_mul(KB);

        let total_ram = get("MemTotal");
        let used_ram = total_ram
            .saturating_sub(get("MemFree"))
            .saturating_sub(get("Buffers"))
            .saturating_sub(get("Cached"));
        let total_swap = get("SwapTotal");
        let free_swap = get("SwapFree").min(total_swap);

        MemoryInfo {
            total_ram,
            used_ram,
            free_ram: total_ram - used_ram,
            total_swap,
            used_swap: total_swap - free_swap,
            free_swap,
        }
    }
}

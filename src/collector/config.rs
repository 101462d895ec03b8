//! Collector configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Where RAM/swap totals come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MemorySource {
    /// The `sysinfo(2)` call: used = total - free.
    #[default]
    SysInfo,
    /// `/proc/meminfo`: used = total - free - buffers - cached.
    MemInfo,
}

/// Paths and refresh intervals shared by all collectors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectorConfig {
    /// Base path to proc filesystem (usually "/proc").
    pub proc_path: PathBuf,
    /// Base path to sysfs (usually "/sys").
    pub sys_path: PathBuf,
    /// Directory holding `os-release` and `mtab` (usually "/etc").
    pub etc_path: PathBuf,
    pub memory_source: MemorySource,
    /// Minimum time between two network re-scans.
    pub net_refresh: Duration,
    /// Minimum time between two task-state re-scans.
    pub task_refresh: Duration,
    /// Points kept per graphed metric.
    pub history_capacity: usize,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            proc_path: PathBuf::from("/proc"),
            sys_path: PathBuf::from("/sys"),
            etc_path: PathBuf::from("/etc"),
            memory_source: MemorySource::default(),
            net_refresh: Duration::from_secs(1),
            task_refresh: Duration::from_secs(2),
            history_capacity: 120,
        }
    }
}

//! Snapshot value types returned by the collectors.
//!
//! All of them are owned, immutable-by-convention values; nothing here
//! borrows from collector state.

use serde::Serialize;

use crate::collector::traits::CpuIdentity;
use crate::rates::usage_percent;

/// Static identity of the host, read once.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SystemInfo {
    /// Distribution pretty name, e.g. "Ubuntu 24.04 LTS".
    pub os_name: String,
    pub hostname: String,
    pub user: String,
    pub cpu: CpuIdentity,
    pub logical_cpus: usize,
}

/// System-wide CPU utilization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CpuStats {
    pub usage_percent: f64,
}

/// RAM and swap in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MemoryInfo {
    pub total_ram: u64,
    pub used_ram: u64,
    pub free_ram: u64,
    pub total_swap: u64,
    pub used_swap: u64,
    pub free_swap: u64,
}

impl MemoryInfo {
    pub fn ram_usage_percent(&self) -> f64 {
        usage_percent(self.used_ram, self.total_ram)
    }

    pub fn swap_usage_percent(&self) -> f64 {
        usage_percent(self.used_swap, self.total_swap)
    }
}

/// Space on one mounted filesystem, in bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiskInfo {
    pub device: String,
    pub mount_point: String,
    pub fs_type: String,
    pub total_space: u64,
    pub used_space: u64,
    pub free_space: u64,
}

impl DiskInfo {
    pub fn usage_percent(&self) -> f64 {
        usage_percent(self.used_space, self.total_space)
    }
}

/// Counters of one network interface plus derived byte rates.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NetworkStats {
    pub interface: String,
    /// First IPv4 address bound to the interface, empty if none.
    pub ipv4: String,
    pub rx_bytes: u64,
    pub rx_packets: u64,
    pub rx_errs: u64,
    pub rx_drop: u64,
    pub rx_fifo: u64,
    pub rx_frame: u64,
    pub rx_compressed: u64,
    pub rx_multicast: u64,
    pub tx_bytes: u64,
    pub tx_packets: u64,
    pub tx_errs: u64,
    pub tx_drop: u64,
    pub tx_fifo: u64,
    pub tx_colls: u64,
    pub tx_carrier: u64,
    pub tx_compressed: u64,
    pub rx_bytes_per_sec: f64,
    pub tx_bytes_per_sec: f64,
}

/// One entry of the process table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProcessInfo {
    pub pid: u32,
    pub ppid: u32,
    pub name: String,
    pub state: char,
    pub num_threads: i64,
    /// Virtual memory size in bytes.
    pub vsize: u64,
    /// Resident set size in pages.
    pub rss: u64,
    /// Resident set size in bytes.
    pub rss_bytes: u64,
    pub utime: u64,
    pub stime: u64,
    pub cpu_percent: f64,
    pub mem_percent: f64,
}

/// Process counts per scheduler state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub running: u32,
    pub sleeping: u32,
    pub uninterruptible: u32,
    pub zombie: u32,
    pub traced: u32,
    pub total: u32,
}

impl TaskStats {
    /// Sum of the per-state counts.
    pub fn counted(&self) -> u32 {
        self.running + self.sleeping + self.uninterruptible + self.zombie + self.traced
    }
}

/// Hardware sensor readings; zero when no sensor is exposed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SensorReadings {
    pub fan_rpm: u64,
    pub temperature_celsius: f64,
}

/// Everything the façade collects in one pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SystemSnapshot {
    /// Wall-clock time of the pass, RFC 3339.
    pub timestamp: String,
    pub system: SystemInfo,
    pub cpu: CpuStats,
    pub memory: MemoryInfo,
    pub disks: Vec<DiskInfo>,
    pub networks: Vec<NetworkStats>,
    pub processes: Vec<ProcessInfo>,
    pub tasks: TaskStats,
    pub sensors: SensorReadings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_percentages_with_zero_totals() {
        let info = MemoryInfo::default();
        assert_eq!(info.ram_usage_percent(), 0.0);
        assert_eq!(info.swap_usage_percent(), 0.0);

        let info = MemoryInfo {
            total_ram: 1000,
            used_ram: 250,
            free_ram: 750,
            total_swap: 0,
            used_swap: 0,
            free_swap: 0,
        };
        assert_eq!(info.ram_usage_percent(), 25.0);
        assert_eq!(info.swap_usage_percent(), 0.0);
    }

    #[test]
    fn test_disk_usage_percent() {
        let disk = DiskInfo {
            total_space: 4096,
            used_space: 1024,
            free_space: 3072,
            ..DiskInfo::default()
        };
        assert_eq!(disk.usage_percent(), 25.0);
        assert_eq!(DiskInfo::default().usage_percent(), 0.0);
    }

    #[test]
    fn test_task_stats_counted() {
        let tasks = TaskStats {
            running: 1,
            sleeping: 2,
            uninterruptible: 3,
            zombie: 4,
            traced: 5,
            total: 15,
        };
        assert_eq!(tasks.counted(), tasks.total);
    }
}

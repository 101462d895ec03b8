//! Main collector that combines every domain collector.
//!
//! The `Collector` struct owns all per-domain state (previous samples,
//! throttles, cached identity) and produces one `SystemSnapshot` per call.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::collector::config::CollectorConfig;
use crate::collector::cpu::CpuCollector;
use crate::collector::disk::DiskCollector;
use crate::collector::memory::MemoryCollector;
use crate::collector::network::NetworkCollector;
use crate::collector::process::ProcessCollector;
use crate::collector::sensors::SensorCollector;
use crate::collector::system::SystemInfoCollector;
use crate::collector::tasks::TaskStatsCollector;
use crate::collector::traits::{FileSystem, Host};
use crate::model::{SystemInfo, SystemSnapshot};

/// Timing information for each collector phase.
///
/// Used for debugging and performance monitoring.
#[derive(Debug, Clone, Default)]
pub struct CollectorTiming {
    /// Total snapshot collection time.
    pub total: Duration,
    pub cpu: Duration,
    pub memory: Duration,
    pub disks: Duration,
    pub networks: Duration,
    pub processes: Duration,
    pub tasks: Duration,
    pub sensors: Duration,
}

/// Main collector that gathers all system metrics.
pub struct Collector<F: FileSystem + Clone, H: Host + Clone> {
    config: CollectorConfig,
    system: SystemInfo,
    cpu: CpuCollector<F>,
    memory: MemoryCollector<F, H>,
    disks: DiskCollector<F, H>,
    networks: NetworkCollector<F, H>,
    processes: ProcessCollector<F>,
    tasks: TaskStatsCollector<F>,
    sensors: SensorCollector<F>,
    /// Timing information from the last snapshot call.
    last_timing: Option<CollectorTiming>,
}

impl<F: FileSystem + Clone, H: Host + Clone> Collector<F, H> {
    /// Creates a new collector.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation (real or mock)
    /// * `host` - Host query implementation (real or mock)
    /// * `config` - Source paths, memory source and refresh intervals
    ///
    /// Static identity (OS, host, user, CPU) is read here, once.
    pub fn new(fs: F, host: H, config: CollectorConfig) -> Self {
        let cpu = CpuCollector::new(fs.clone(), &host, &config.proc_path);
        let mut system = SystemInfoCollector::new(&fs, &host, &config.etc_path)
            .info()
            .clone();
        system.cpu = cpu.identity().clone();
        system.logical_cpus = cpu.logical_cpus();

        Self {
            system,
            cpu,
            memory: MemoryCollector::new(
                fs.clone(),
                host.clone(),
                &config.proc_path,
                config.memory_source,
            ),
            disks: DiskCollector::new(fs.clone(), host.clone(), &config.etc_path, &config.proc_path),
            networks: NetworkCollector::new(
                fs.clone(),
                host.clone(),
                &config.sys_path,
                config.net_refresh,
            ),
            processes: ProcessCollector::new(fs.clone(), &config.proc_path, host.page_size()),
            tasks: TaskStatsCollector::new(fs.clone(), &config.proc_path, config.task_refresh),
            sensors: SensorCollector::new(fs, &config.sys_path),
            config,
            last_timing: None,
        }
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    /// Identity information resolved at construction.
    pub fn system_info(&self) -> &SystemInfo {
        &self.system
    }

    /// Returns timing information from the last snapshot call.
    pub fn last_timing(&self) -> Option<&CollectorTiming> {
        self.last_timing.as_ref()
    }

    pub fn snapshot(&mut self) -> SystemSnapshot {
        self.snapshot_at(Instant::now())
    }

    /// Samples every domain as of `now`.
    ///
    /// Rates are relative to the previous call; the first call reports 0 for
    /// all of them.
    pub fn snapshot_at(&mut self, now: Instant) -> SystemSnapshot {
        let start = Instant::now();
        let mut timing = CollectorTiming::default();

        let t = Instant::now();
        let cpu = self.cpu.usage_at(now);
        timing.cpu = t.elapsed();

        let t = Instant::now();
        let memory = self.memory.collect();
        timing.memory = t.elapsed();

        let t = Instant::now();
        let disks = self.disks.collect();
        timing.disks = t.elapsed();

        let t = Instant::now();
        let networks = self.networks.collect_at(now);
        timing.networks = t.elapsed();

        let t = Instant::now();
        let processes = self.processes.collect_at(now, memory.total_ram);
        timing.processes = t.elapsed();

        let t = Instant::now();
        let tasks = self.tasks.collect_at(now);
        timing.tasks = t.elapsed();

        let t = Instant::now();
        let sensors = self.sensors.collect();
        timing.sensors = t.elapsed();

        timing.total = start.elapsed();
        debug!(
            total_us = timing.total.as_micros() as u64,
            processes = processes.len(),
            interfaces = networks.len(),
            disks = disks.len(),
            "snapshot collected"
        );
        self.last_timing = Some(timing);

        SystemSnapshot {
            timestamp: chrono::Local::now().to_rfc3339(),
            system: self.system.clone(),
            cpu,
            memory,
            disks,
            networks,
            processes,
            tasks,
            sensors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::mock::{MockFs, MockHost};

    #[test]
    fn test_snapshot_typical_system() {
        let fs = MockFs::typical_system();
        let host = MockHost::typical_system();
        let mut collector = Collector::new(fs, host, CollectorConfig::default());

        let snapshot = collector.snapshot();
        assert_eq!(snapshot.system.hostname, "testhost");
        assert_eq!(snapshot.system.os_name, "Debian GNU/Linux 12 (bookworm)");
        assert_eq!(snapshot.system.cpu.vendor, "GenuineIntel");
        assert_eq!(snapshot.system.logical_cpus, 4);
        assert_eq!(snapshot.cpu.usage_percent, 0.0);
        assert_eq!(snapshot.disks.len(), 1);
        assert_eq!(snapshot.networks.len(), 2);
        assert_eq!(snapshot.processes.len(), 3);
        assert_eq!(snapshot.tasks.total, 3);
        assert_eq!(snapshot.sensors.fan_rpm, 2100);
        assert!(chrono::DateTime::parse_from_rfc3339(&snapshot.timestamp).is_ok());
        assert!(collector.last_timing().is_some());
        assert_eq!(collector.system_info(), &snapshot.system);
    }

    #[test]
    fn test_process_memory_percent_uses_total_ram() {
        let fs = MockFs::typical_system();
        let host = MockHost::typical_system();
        let mut collector = Collector::new(fs, host, CollectorConfig::default());

        let snapshot = collector.snapshot();
        let init = &snapshot.processes[0];
        let expected = init.rss_bytes as f64 / snapshot.memory.total_ram as f64 * 100.0;
        assert!((init.mem_percent - expected).abs() < 1e-9);
    }
}

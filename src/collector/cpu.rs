//! System-wide CPU utilization and processor identity.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info};

use crate::collector::procfs::{count_cpu_lines, parse_cpu_line, parse_cpuinfo_identity};
use crate::collector::traits::{CpuIdentity, FileSystem, Host, read_source};
use crate::model::CpuStats;
use crate::rates::{CpuTicks, SampleStore, cpu_utilization};

const UNKNOWN: &str = "Unknown";

/// Samples the aggregate `cpu` line of `/proc/stat`.
pub struct CpuCollector<F: FileSystem> {
    fs: F,
    stat_path: PathBuf,
    ticks: SampleStore<(), CpuTicks>,
    identity: CpuIdentity,
    logical_cpus: usize,
}

impl<F: FileSystem> CpuCollector<F> {
    /// Creates the collector and resolves the processor identity once.
    ///
    /// Identity comes from the CPU identification instruction, then from
    /// `cpuinfo`, then falls back to "Unknown".
    pub fn new<H: Host>(fs: F, host: &H, proc_path: &Path) -> Self {
        let stat_path = proc_path.join("stat");
        let identity = resolve_identity(&fs, host, proc_path);
        info!(vendor = %identity.vendor, model = %identity.model, "cpu identity resolved");
        let logical_cpus = read_source(&fs, &stat_path)
            .map(|content| count_cpu_lines(&content))
            .unwrap_or(0);

        Self {
            fs,
            stat_path,
            ticks: SampleStore::new(),
            identity,
            logical_cpus,
        }
    }

    pub fn identity(&self) -> &CpuIdentity {
        &self.identity
    }

    /// Number of `cpuN` lines seen at construction.
    pub fn logical_cpus(&self) -> usize {
        self.logical_cpus
    }

    pub fn usage(&mut self) -> CpuStats {
        self.usage_at(Instant::now())
    }

    /// Utilization since the previous call; 0 on the first call or when the
    /// stat source is unavailable.
    pub fn usage_at(&mut self, now: Instant) -> CpuStats {
        let Some(content) = read_source(&self.fs, &self.stat_path) else {
            return CpuStats::default();
        };
        let line = match parse_cpu_line(&content) {
            Ok(line) => line,
            Err(e) => {
                debug!(error = %e, "skipping malformed cpu line");
                return CpuStats::default();
            }
        };
        let ticks = CpuTicks {
            user: line.user,
            nice: line.nice,
            system: line.system,
            idle: line.idle,
        };
        let usage_percent = self
            .ticks
            .observe((), ticks, now, |prev, curr, _| cpu_utilization(prev, curr));
        CpuStats { usage_percent }
    }
}

fn resolve_identity<F: FileSystem, H: Host>(fs: &F, host: &H, proc_path: &Path) -> CpuIdentity {
    let native = host.cpu_identity().unwrap_or_default();
    let (vendor, model) = if native.vendor.is_empty() || native.model.is_empty() {
        read_source(fs, &proc_path.join("cpuinfo"))
            .map(|content| parse_cpuinfo_identity(&content))
            .unwrap_or((None, None))
    } else {
        (None, None)
    };

    let pick = |native: String, fallback: Option<String>| {
        if !native.is_empty() {
            native
        } else {
            fallback.unwrap_or_else(|| UNKNOWN.to_string())
        }
    };
    CpuIdentity {
        vendor: pick(native.vendor, vendor),
        model: pick(native.model, model),
    }
}

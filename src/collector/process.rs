//! Process collector for gathering per-process metrics from `/proc/[pid]/stat`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use thiserror::Error;
use tracing::debug;

use crate::collector::procfs::{ParseError, ProcStat, parse_proc_stat};
use crate::collector::traits::{FileSystem, read_dir_sorted};
use crate::model::ProcessInfo;
use crate::rates::{ProcessTimes, SampleStore, process_cpu_percent, usage_percent};

/// Error type for collection failures.
#[derive(Debug, Error)]
pub enum CollectError {
    /// Process disappeared during collection.
    #[error("process {0} disappeared")]
    ProcessGone(u32),
    /// I/O error reading process files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Parse error in process files.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Lists the numeric entries of the proc directory.
pub(crate) fn list_pids<F: FileSystem>(fs: &F, proc_path: &Path) -> Vec<u32> {
    let mut pids: Vec<u32> = read_dir_sorted(fs, proc_path)
        .iter()
        .filter_map(|p| p.file_name()?.to_str()?.parse().ok())
        .collect();
    pids.sort_unstable();
    pids
}

/// Reads and parses `/proc/<pid>/stat`.
pub(crate) fn read_proc_stat<F: FileSystem>(
    fs: &F,
    proc_path: &Path,
    pid: u32,
) -> Result<ProcStat, CollectError> {
    let path = proc_path.join(pid.to_string()).join("stat");
    let content = fs.read_to_string(&path).map_err(|e| {
        // ESRCH: the pid exited after its stat file was opened.
        if e.kind() == std::io::ErrorKind::NotFound
            || e.raw_os_error() == Some(nix::errno::Errno::ESRCH as i32)
        {
            CollectError::ProcessGone(pid)
        } else {
            CollectError::Io(e)
        }
    })?;
    Ok(parse_proc_stat(&content)?)
}

/// Collects the process table and per-process CPU usage.
pub struct ProcessCollector<F: FileSystem> {
    fs: F,
    proc_path: PathBuf,
    page_size: u64,
    cpu_times: SampleStore<u32, ProcessTimes>,
}

impl<F: FileSystem> ProcessCollector<F> {
    /// Creates a new process collector.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation (real or mock)
    /// * `proc_path` - Base path to proc filesystem (usually "/proc")
    /// * `page_size` - Bytes per page, used to convert RSS
    pub fn new(fs: F, proc_path: impl Into<PathBuf>, page_size: u64) -> Self {
        Self {
            fs,
            proc_path: proc_path.into(),
            page_size,
            cpu_times: SampleStore::new(),
        }
    }

    pub fn collect(&mut self, total_ram: u64) -> Vec<ProcessInfo> {
        self.collect_at(Instant::now(), total_ram)
    }

    /// One entry per process whose stat record could be read and parsed,
    /// sorted by pid.
    ///
    /// CPU % is relative to the previous call for the same pid (0 for new
    /// pids); memory % is relative to `total_ram` bytes.
    pub fn collect_at(&mut self, now: Instant, total_ram: u64) -> Vec<ProcessInfo> {
        let mut processes = Vec::new();
        for pid in list_pids(&self.fs, &self.proc_path) {
            match read_proc_stat(&self.fs, &self.proc_path, pid) {
                Ok(stat) => processes.push(self.process_info(stat, now, total_ram)),
                Err(e) => debug!(pid, error = %e, "skipping process"),
            }
        }

        let live: HashSet<u32> = processes.iter().map(|p| p.pid).collect();
        self.cpu_times.retain(|pid| live.contains(pid));
        processes
    }

    fn process_info(&mut self, stat: ProcStat, now: Instant, total_ram: u64) -> ProcessInfo {
        let times = ProcessTimes {
            utime: stat.utime,
            stime: stat.stime,
        };
        let cpu_percent = self.cpu_times.observe(stat.pid, times, now, process_cpu_percent);
        let rss = stat.rss.max(0) as u64;
        let rss_bytes = rss.saturating_mul(self.page_size);

        ProcessInfo {
            pid: stat.pid,
            ppid: stat.ppid,
            name: stat.comm,
            state: stat.state,
            num_threads: stat.num_threads,
            vsize: stat.vsize,
            rss,
            rss_bytes,
            utime: stat.utime,
            stime: stat.stime,
            cpu_percent,
            mem_percent: usage_percent(rss_bytes, total_ram),
        }
    }
}

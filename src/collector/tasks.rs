//! Process counts per scheduler state.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::collector::process::{list_pids, read_proc_stat};
use crate::collector::traits::FileSystem;
use crate::model::TaskStats;

/// Aggregates `/proc/<pid>/stat` state codes, re-scanning at most once per
/// refresh interval.
pub struct TaskStatsCollector<F: FileSystem> {
    fs: F,
    proc_path: PathBuf,
    refresh: Duration,
    cached: Option<(Instant, TaskStats)>,
}

impl<F: FileSystem> TaskStatsCollector<F> {
    pub fn new(fs: F, proc_path: impl Into<PathBuf>, refresh: Duration) -> Self {
        Self {
            fs,
            proc_path: proc_path.into(),
            refresh,
            cached: None,
        }
    }

    pub fn collect(&mut self) -> TaskStats {
        self.collect_at(Instant::now())
    }

    /// Current counts. `total` always equals the sum of the states, even when
    /// processes exit between listing and reading.
    pub fn collect_at(&mut self, now: Instant) -> TaskStats {
        if let Some((at, stats)) = self.cached
            && now.saturating_duration_since(at) < self.refresh
        {
            return stats;
        }

        let mut stats = TaskStats::default();
        for pid in list_pids(&self.fs, &self.proc_path) {
            match read_proc_stat(&self.fs, &self.proc_path, pid) {
                Ok(stat) => count_state(&mut stats, stat.state),
                Err(e) => debug!(pid, error = %e, "not counting process"),
            }
        }
        stats.total = stats.counted();

        self.cached = Some((now, stats));
        stats
    }
}

/// Adds one process in `state` to the matching bucket.
///
/// Idle kernel threads (`I`) count as sleeping and stopped tasks (`T`) as
/// traced. Dead or unknown states are not counted.
fn count_state(stats: &mut TaskStats, state: char) {
    match state {
        'R' => stats.running += 1,
        'S' | 'I' => stats.sleeping += 1,
        'D' => stats.uninterruptible += 1,
        'Z' => stats.zombie += 1,
        'T' | 't' => stats.traced += 1,
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::mock::MockFs;

    fn stat_line(pid: u32, state: char) -> String {
        format!(
            "{pid} (task {pid}) {state} 1 {pid} {pid} 0 -1 4194304 0 0 0 0 0 0 0 0 20 0 1 0 100 0 0 18446744073709551615 0 0 0 0 0 0 0 0 0 0 0 0 17 0 0 0 0 0 0 0 0 0 0 0 0 0 0"
        )
    }

    fn fs_with_states(states: &[char]) -> MockFs {
        let fs = MockFs::new();
        for (i, state) in states.iter().enumerate() {
            let pid = i as u32 + 1;
            fs.add_process(pid, &stat_line(pid, *state));
        }
        fs
    }

    #[test]
    fn test_counts_each_state() {
        let fs = fs_with_states(&['R', 'S', 'S', 'I', 'D', 'Z', 'T', 't', 'X']);
        let mut tasks = TaskStatsCollector::new(fs, "/proc", Duration::ZERO);

        let stats = tasks.collect();
        assert_eq!(stats.running, 1);
        assert_eq!(stats.sleeping, 3);
        assert_eq!(stats.uninterruptible, 1);
        assert_eq!(stats.zombie, 1);
        assert_eq!(stats.traced, 2);
        assert_eq!(stats.total, 8);
        assert_eq!(stats.total, stats.counted());
    }

    #[test]
    fn test_total_matches_sum_when_process_vanishes() {
        let fs = fs_with_states(&['R', 'S', 'S']);
        // Listed in /proc but its stat is gone by the time it is read.
        fs.add_dir("/proc/77");
        fs.add_process(78, "78 (broken");
        let mut tasks = TaskStatsCollector::new(fs, "/proc", Duration::ZERO);

        let stats = tasks.collect();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.total, stats.counted());
    }

    #[test]
    fn test_results_are_cached_for_refresh_interval() {
        let fs = fs_with_states(&['R']);
        let mut tasks = TaskStatsCollector::new(fs.clone(), "/proc", Duration::from_secs(2));
        let t0 = Instant::now();

        assert_eq!(tasks.collect_at(t0).total, 1);
        fs.add_process(2, &stat_line(2, 'S'));
        assert_eq!(tasks.collect_at(t0 + Duration::from_secs(1)).total, 1);

        let fresh = tasks.collect_at(t0 + Duration::from_secs(2));
        assert_eq!(fresh.total, 2);
        assert_eq!(fresh.sleeping, 1);
    }

    #[test]
    fn test_empty_proc() {
        let mut tasks = TaskStatsCollector::new(MockFs::new(), "/proc", Duration::ZERO);
        assert_eq!(tasks.collect(), TaskStats::default());
    }
}

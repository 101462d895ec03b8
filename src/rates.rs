//! Previous-sample caches and rate computation.
//!
//! Every derived metric in the crate is computed here from two counter
//! samples. Collectors own one [`SampleStore`] per metric domain and call
//! [`SampleStore::observe`], which yields 0 for the first observation of a
//! key and then commits the new sample.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Instant;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Clock ticks per second (USER_HZ). Standard value for Linux.
pub const CLOCK_TICKS_PER_SEC: f64 = 100.0;

// ---------------------------------------------------------------------------
// Counter samples
// ---------------------------------------------------------------------------

/// Counters of one entity together with the instant they were read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample<S> {
    pub counters: S,
    pub at: Instant,
}

/// System-wide CPU ticks used for utilization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuTicks {
    pub user: u64,
    /// Low-priority (nice) user time.
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
}

/// Cumulative CPU time of one process, in clock ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessTimes {
    pub utime: u64,
    pub stime: u64,
}

/// Cumulative byte counters of one network interface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InterfaceTraffic {
    pub rx_bytes: u64,
    pub tx_bytes: u64,
}

// ---------------------------------------------------------------------------
// Sample store
// ---------------------------------------------------------------------------

/// Most recent sample per entity key.
///
/// Stale entries for vanished entities are harmless; use [`retain`] to prune
/// them.
///
/// [`retain`]: SampleStore::retain
#[derive(Debug, Clone)]
pub struct SampleStore<K, S> {
    samples: HashMap<K, Sample<S>>,
}

impl<K, S> Default for SampleStore<K, S> {
    fn default() -> Self {
        Self {
            samples: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash, S> SampleStore<K, S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &K) -> Option<&Sample<S>> {
        self.samples.get(key)
    }

    /// Replaces the sample for `key`.
    pub fn put(&mut self, key: K, sample: Sample<S>) {
        self.samples.insert(key, sample);
    }

    /// Keeps only the entries whose key satisfies `live`.
    pub fn retain(&mut self, mut live: impl FnMut(&K) -> bool) {
        self.samples.retain(|k, _| live(k));
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Computes a rate against the previous sample of `key`, then commits the
    /// new one.
    ///
    /// `rate` receives `(prev, curr, elapsed_secs)`. Returns 0 without calling
    /// `rate` when no previous sample exists.
    pub fn observe<F>(&mut self, key: K, counters: S, at: Instant, rate: F) -> f64
    where
        F: FnOnce(&S, &S, f64) -> f64,
    {
        let result = match self.samples.get(&key) {
            Some(prev) => {
                let elapsed = elapsed_secs(prev.at, at);
                rate(&prev.counters, &counters, elapsed)
            }
            None => 0.0,
        };
        self.put(key, Sample { counters, at });
        result
    }
}

/// Seconds from `from` to `to`; 0 when `to` is not after `from`.
pub fn elapsed_secs(from: Instant, to: Instant) -> f64 {
    to.saturating_duration_since(from).as_secs_f64()
}

// ---------------------------------------------------------------------------
// Rate computation
// ---------------------------------------------------------------------------

/// System CPU utilization in percent between two tick samples.
///
/// `busy / total * 100` over user, nice, system and idle deltas. Returns 0
/// when no ticks elapsed (sampled faster than the counter granularity).
pub fn cpu_utilization(prev: &CpuTicks, curr: &CpuTicks) -> f64 {
    let user = curr.user.saturating_sub(prev.user);
    let nice = curr.nice.saturating_sub(prev.nice);
    let system = curr.system.saturating_sub(prev.system);
    let idle = curr.idle.saturating_sub(prev.idle);

    let total = user + nice + system + idle;
    if total == 0 {
        return 0.0;
    }
    let busy = total - idle;
    (busy as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
}

/// CPU usage of one process in percent of a single CPU.
///
/// Not capped at 100: a multi-threaded process can keep several CPUs busy.
pub fn process_cpu_percent(prev: &ProcessTimes, curr: &ProcessTimes, elapsed_secs: f64) -> f64 {
    if elapsed_secs <= 0.0 {
        return 0.0;
    }
    let ticks = curr.utime.saturating_sub(prev.utime) + curr.stime.saturating_sub(prev.stime);
    ticks as f64 / CLOCK_TICKS_PER_SEC / elapsed_secs * 100.0
}

/// `used / total` in percent, 0 for an empty total.
pub fn usage_percent(used: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (used as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
}

/// Bytes per second between two cumulative readings. Not clamped.
pub fn byte_rate(prev: u64, curr: u64, elapsed_secs: f64) -> f64 {
    if elapsed_secs <= 0.0 {
        return 0.0;
    }
    curr.saturating_sub(prev) as f64 / elapsed_secs
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_cpu_utilization_scenario() {
        let prev = CpuTicks {
            user: 100,
            nice: 0,
            system: 50,
            idle: 850,
        };
        let curr = CpuTicks {
            user: 110,
            nice: 0,
            system: 55,
            idle: 935,
        };
        assert!((cpu_utilization(&prev, &curr) - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_cpu_utilization_no_elapsed_ticks() {
        let t = CpuTicks {
            user: 1,
            nice: 2,
            system: 3,
            idle: 4,
        };
        assert_eq!(cpu_utilization(&t, &t), 0.0);
    }

    #[test]
    fn test_cpu_utilization_counter_regression() {
        let prev = CpuTicks {
            user: 500,
            nice: 0,
            system: 500,
            idle: 500,
        };
        let curr = CpuTicks {
            user: 10,
            nice: 0,
            system: 10,
            idle: 600,
        };
        // Busy counters went backwards: only idle advanced.
        assert_eq!(cpu_utilization(&prev, &curr), 0.0);
    }

    #[test]
    fn test_process_cpu_percent() {
        let prev = ProcessTimes {
            utime: 100,
            stime: 50,
        };
        let curr = ProcessTimes {
            utime: 150,
            stime: 75,
        };
        // 75 ticks over 1s at 100 ticks/s.
        assert!((process_cpu_percent(&prev, &curr, 1.0) - 75.0).abs() < 1e-9);
        assert!((process_cpu_percent(&prev, &curr, 0.5) - 150.0).abs() < 1e-9);
        assert_eq!(process_cpu_percent(&prev, &curr, 0.0), 0.0);
        assert_eq!(process_cpu_percent(&prev, &curr, -1.0), 0.0);
        assert_eq!(process_cpu_percent(&curr, &prev, 1.0), 0.0);
    }

    #[test]
    fn test_usage_percent() {
        assert_eq!(usage_percent(0, 0), 0.0);
        assert_eq!(usage_percent(10, 0), 0.0);
        assert_eq!(usage_percent(50, 200), 25.0);
        assert_eq!(usage_percent(300, 200), 100.0);
    }

    #[test]
    fn test_byte_rate() {
        assert_eq!(byte_rate(1000, 3000, 2.0), 1000.0);
        assert_eq!(byte_rate(1000, 3000, 0.0), 0.0);
        assert_eq!(byte_rate(3000, 1000, 1.0), 0.0);
        assert_eq!(byte_rate(0, 10_000_000_000, 1.0), 10_000_000_000.0);
    }

    #[test]
    fn test_observe_first_sample_is_zero() {
        let mut store: SampleStore<u32, ProcessTimes> = SampleStore::new();
        let t0 = Instant::now();
        let mut called = false;
        let rate = store.observe(
            7,
            ProcessTimes {
                utime: 1_000_000,
                stime: 0,
            },
            t0,
            |_, _, _| {
                called = true;
                99.0
            },
        );
        assert_eq!(rate, 0.0);
        assert!(!called);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&7).unwrap().counters.utime, 1_000_000);
    }

    #[test]
    fn test_observe_uses_previous_sample() {
        let mut store: SampleStore<(), CpuTicks> = SampleStore::new();
        let t0 = Instant::now();
        let a = CpuTicks {
            user: 100,
            nice: 0,
            system: 50,
            idle: 850,
        };
        let b = CpuTicks {
            user: 110,
            nice: 0,
            system: 55,
            idle: 935,
        };
        assert_eq!(store.observe((), a, t0, |p, c, _| cpu_utilization(p, c)), 0.0);
        let usage = store.observe((), b, t0 + Duration::from_secs(1), |p, c, _| {
            cpu_utilization(p, c)
        });
        assert!((usage - 15.0).abs() < 1e-9);
        assert_eq!(store.get(&()).unwrap().counters, b);
    }

    #[test]
    fn test_observe_passes_elapsed_seconds() {
        let mut store: SampleStore<String, u64> = SampleStore::new();
        let t0 = Instant::now();
        store.observe("eth0".to_string(), 0, t0, |_, _, _| 0.0);
        let rate = store.observe(
            "eth0".to_string(),
            4096,
            t0 + Duration::from_secs(2),
            |p, c, dt| byte_rate(*p, *c, dt),
        );
        assert_eq!(rate, 2048.0);

        // Going back in time counts as zero elapsed.
        let rate = store.observe("eth0".to_string(), 8192, t0, |p, c, dt| byte_rate(*p, *c, dt));
        assert_eq!(rate, 0.0);
    }

    #[test]
    fn test_store_keys_are_independent_and_prunable() {
        let mut store: SampleStore<u32, ProcessTimes> = SampleStore::new();
        let t0 = Instant::now();
        for pid in [1, 2, 3] {
            store.observe(pid, ProcessTimes::default(), t0, |_, _, _| 0.0);
        }
        assert_eq!(store.len(), 3);

        store.retain(|pid| *pid != 2);
        assert!(store.get(&2).is_none());
        assert!(store.get(&1).is_some());

        store.clear();
        assert!(store.is_empty());
    }
}

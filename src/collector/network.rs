//! Network interface enumeration and traffic counters from sysfs.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::collector::procfs::parse_counter;
use crate::collector::traits::{FileSystem, Host, read_dir_sorted, read_source};
use crate::model::NetworkStats;
use crate::rates::{InterfaceTraffic, SampleStore, byte_rate};

/// Collects per-interface statistics from `<sys>/class/net/<iface>/statistics`.
///
/// Re-enumeration happens at most once per refresh interval; calls inside
/// the interval return the previous result.
pub struct NetworkCollector<F: FileSystem, H: Host> {
    fs: F,
    host: H,
    net_path: PathBuf,
    refresh: Duration,
    last_refresh: Option<Instant>,
    cached: Vec<NetworkStats>,
    traffic: SampleStore<String, InterfaceTraffic>,
}

impl<F: FileSystem, H: Host> NetworkCollector<F, H> {
    pub fn new(fs: F, host: H, sys_path: &Path, refresh: Duration) -> Self {
        Self {
            fs,
            host,
            net_path: sys_path.join("class").join("net"),
            refresh,
            last_refresh: None,
            cached: Vec::new(),
            traffic: SampleStore::new(),
        }
    }

    pub fn collect(&mut self) -> Vec<NetworkStats> {
        self.collect_at(Instant::now())
    }

    /// One entry per interface, sorted by name.
    pub fn collect_at(&mut self, now: Instant) -> Vec<NetworkStats> {
        if let Some(last) = self.last_refresh
            && now.saturating_duration_since(last) < self.refresh
        {
            debug!("network refresh throttled");
            return self.cached.clone();
        }

        let addresses = self.first_ipv4_by_interface();
        let mut stats = Vec::new();
        for dir in read_dir_sorted(&self.fs, &self.net_path) {
            let Some(name) = dir.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            let mut iface = self.read_interface(name, &dir.join("statistics"));
            iface.ipv4 = addresses.get(name).cloned().unwrap_or_default();

            let traffic = InterfaceTraffic {
                rx_bytes: iface.rx_bytes,
                tx_bytes: iface.tx_bytes,
            };
            let mut tx_rate = 0.0;
            iface.rx_bytes_per_sec =
                self.traffic
                    .observe(name.to_string(), traffic, now, |prev, curr, dt| {
                        tx_rate = byte_rate(prev.tx_bytes, curr.tx_bytes, dt);
                        byte_rate(prev.rx_bytes, curr.rx_bytes, dt)
                    });
            iface.tx_bytes_per_sec = tx_rate;
            stats.push(iface);
        }

        let live: HashSet<&str> = stats.iter().map(|s| s.interface.as_str()).collect();
        self.traffic.retain(|name| live.contains(name.as_str()));

        self.last_refresh = Some(now);
        self.cached = stats.clone();
        stats
    }

    /// Maps each interface to the first IPv4 address discovered for it.
    fn first_ipv4_by_interface(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();
        match self.host.ipv4_addresses() {
            Ok(addrs) => {
                for (name, addr) in addrs {
                    map.entry(name).or_insert_with(|| addr.to_string());
                }
            }
            Err(e) => debug!(error = %e, "interface addresses unavailable"),
        }
        map
    }

    fn read_interface(&self, name: &str, dir: &Path) -> NetworkStats {
        let counter = |file: &str| {
            read_source(&self.fs, &dir.join(file))
                .and_then(|content| parse_counter(&content).ok())
                .unwrap_or(0)
        };
        NetworkStats {
            interface: name.to_string(),
            rx_bytes: counter("rx_bytes"),
            rx_packets: counter("rx_packets"),
            rx_errs: counter("rx_errors"),
            rx_drop: counter("rx_dropped"),
            rx_fifo: counter("rx_fifo_errors"),
            rx_frame: counter("rx_frame_errors"),
            rx_compressed: counter("rx_compressed"),
            rx_multicast: counter("multicast"),
            tx_bytes: counter("tx_bytes"),
            tx_packets: counter("tx_packets"),
            tx_errs: counter("tx_errors"),
            tx_drop: counter("tx_dropped"),
            tx_fifo: counter("tx_fifo_errors"),
            tx_colls: counter("collisions"),
            tx_carrier: counter("tx_carrier_errors"),
            tx_compressed: counter("tx_compressed"),
            ..NetworkStats::default()
        }
    }
}

//! End-to-end tests of the collector façade over mock sources.

use std::time::{Duration, Instant};

use sysmon::collector::{Collector, CollectorConfig, MemorySource, MockFs, MockHost};
use sysmon::model::SystemSnapshot;

fn collector(fs: &MockFs, host: &MockHost) -> Collector<MockFs, MockHost> {
    Collector::new(fs.clone(), host.clone(), CollectorConfig::default())
}

fn without_timestamp(mut snapshot: SystemSnapshot) -> SystemSnapshot {
    snapshot.timestamp.clear();
    snapshot
}

fn stat_line(pid: u32, name: &str, state: char, utime: u64, stime: u64) -> String {
    format!(
        "{pid} ({name}) {state} 1 {pid} {pid} 0 -1 4194560 1000 0 0 0 {utime} {stime} 0 0 20 0 1 0 500 15000000 1000 18446744073709551615 1 1 0 0 0 0 0 4096 81926 0 0 0 17 2 0 0 0 0 0 0 0 0 0 0 0 0 0"
    )
}

#[test]
fn test_unchanged_sources_give_identical_snapshots() {
    let fs = MockFs::typical_system();
    let host = MockHost::typical_system();
    let mut collector = collector(&fs, &host);
    let t0 = Instant::now();

    let first = without_timestamp(collector.snapshot_at(t0));
    let second = without_timestamp(collector.snapshot_at(t0 + Duration::from_secs(5)));
    assert_eq!(first, second);
}

#[test]
fn test_first_rates_are_zero() {
    let fs = MockFs::typical_system();
    let host = MockHost::typical_system();
    let snapshot = collector(&fs, &host).snapshot();

    assert_eq!(snapshot.cpu.usage_percent, 0.0);
    assert!(snapshot.processes.iter().all(|p| p.cpu_percent == 0.0));
    assert!(
        snapshot
            .networks
            .iter()
            .all(|n| n.rx_bytes_per_sec == 0.0 && n.tx_bytes_per_sec == 0.0)
    );
}

#[test]
fn test_cpu_usage_between_two_passes() {
    let fs = MockFs::typical_system();
    let host = MockHost::typical_system();
    fs.add_file("/proc/stat", "cpu  100 0 50 850 0 0 0 0 0 0\n");
    let mut collector = collector(&fs, &host);
    let t0 = Instant::now();

    assert_eq!(collector.snapshot_at(t0).cpu.usage_percent, 0.0);

    fs.add_file("/proc/stat", "cpu  110 0 55 935 0 0 0 0 0 0\n");
    let usage = collector
        .snapshot_at(t0 + Duration::from_secs(1))
        .cpu
        .usage_percent;
    assert!((usage - 15.0).abs() < 1e-9, "usage = {}", usage);
}

#[test]
fn test_process_and_network_rates_follow_counters() {
    let fs = MockFs::typical_system();
    let host = MockHost::typical_system();
    let mut collector = collector(&fs, &host);
    let t0 = Instant::now();
    collector.snapshot_at(t0);

    fs.add_process(500, &stat_line(500, "sshd", 'R', 10 + 100, 5));
    fs.add_file("/sys/class/net/eth0/statistics/rx_bytes", "1234577890\n");
    let snapshot = collector.snapshot_at(t0 + Duration::from_secs(2));

    let sshd = snapshot
        .processes
        .iter()
        .find(|p| p.pid == 500)
        .expect("sshd listed");
    assert!((sshd.cpu_percent - 50.0).abs() < 1e-9);

    let eth0 = snapshot
        .networks
        .iter()
        .find(|n| n.interface == "eth0")
        .expect("eth0 listed");
    assert!((eth0.rx_bytes_per_sec - 5000.0).abs() < 1e-9);
    assert_eq!(eth0.tx_bytes_per_sec, 0.0);
    assert_eq!(eth0.ipv4, "192.168.1.100");
}

#[test]
fn test_task_total_matches_counted_states() {
    let fs = MockFs::typical_system();
    let host = MockHost::typical_system();
    fs.add_process(42, &stat_line(42, "defunct", 'Z', 0, 0));
    fs.add_process(43, &stat_line(43, "kworker/0:1", 'I', 0, 0));
    fs.add_process(44, &stat_line(44, "gdb target", 't', 0, 0));
    fs.add_process(45, &stat_line(45, "dead", 'X', 0, 0));
    let mut collector = collector(&fs, &host);
    let t0 = Instant::now();

    let tasks = collector.snapshot_at(t0).tasks;
    assert_eq!(tasks.total, tasks.counted());
    assert_eq!(tasks.running, 1);
    assert_eq!(tasks.sleeping, 3);
    assert_eq!(tasks.zombie, 1);
    assert_eq!(tasks.traced, 1);
    assert_eq!(tasks.total, 6);

    // A process whose stat vanished between enumeration and read is dropped.
    fs.remove_file("/proc/1000/stat");
    let snapshot = collector.snapshot_at(t0 + Duration::from_secs(3));
    assert_eq!(snapshot.tasks.total, snapshot.tasks.counted());
    assert_eq!(snapshot.tasks.sleeping, 2);
    assert!(snapshot.processes.iter().all(|p| p.pid != 1000));
}

#[test]
fn test_interface_with_missing_counter_reads_zero() {
    let fs = MockFs::typical_system();
    let host = MockHost::typical_system();
    fs.add_interface("wlan0", &[("rx_bytes", 4096)]);
    let snapshot = collector(&fs, &host).snapshot();

    let wlan0 = snapshot
        .networks
        .iter()
        .find(|n| n.interface == "wlan0")
        .expect("wlan0 listed");
    assert_eq!(wlan0.rx_bytes, 4096);
    assert_eq!(wlan0.tx_bytes, 0);
    assert_eq!(wlan0.rx_multicast, 0);
    assert!(wlan0.ipv4.is_empty());
}

#[test]
fn test_missing_sources_yield_defaults() {
    let fs = MockFs::new();
    let host = MockHost::new();
    let snapshot = collector(&fs, &host).snapshot();

    assert_eq!(snapshot.system.hostname, "Unknown");
    assert_eq!(snapshot.cpu.usage_percent, 0.0);
    assert!(snapshot.disks.is_empty());
    assert!(snapshot.networks.is_empty());
    assert!(snapshot.processes.is_empty());
    assert_eq!(snapshot.tasks.total, 0);
    assert_eq!(snapshot.sensors.fan_rpm, 0);
}

#[test]
fn test_meminfo_source_excludes_buffers_and_cache() {
    let fs = MockFs::typical_system();
    let host = MockHost::typical_system();
    let config = CollectorConfig {
        memory_source: MemorySource::MemInfo,
        ..CollectorConfig::default()
    };
    let memory = Collector::new(fs, host, config).snapshot().memory;

    let used_kb: u64 = 16_384_000 - 8_192_000 - 512_000 - 2_048_000;
    assert_eq!(memory.total_ram, 16_384_000 * 1024);
    assert_eq!(memory.used_ram, used_kb * 1024);
    assert_eq!(memory.used_swap, 0);
}

#[test]
fn test_snapshot_serializes_to_json() {
    let fs = MockFs::typical_system();
    let host = MockHost::typical_system();
    let snapshot = collector(&fs, &host).snapshot();

    let json: serde_json::Value = serde_json::to_value(&snapshot).expect("serializable");
    assert_eq!(json["system"]["hostname"], "testhost");
    assert_eq!(json["tasks"]["total"], 3);
    assert_eq!(json["sensors"]["fan_rpm"], 2100);
    assert_eq!(json["networks"].as_array().map(Vec::len), Some(2));
    assert_eq!(json["processes"][0]["name"], "systemd");
}

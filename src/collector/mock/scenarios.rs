//! Pre-built mock scenarios for testing.
//!
//! These scenarios provide realistic `/proc`, `/sys` and `/etc` states
//! together with a matching host.

use std::net::Ipv4Addr;

use super::filesystem::{MockFs, MockHost};
use crate::collector::traits::{FsStats, MemoryTotals};

impl MockFs {
    /// Creates a typical system with a few processes.
    ///
    /// Includes: init (PID 1), bash shell, a sleeping daemon, two network
    /// interfaces, one local filesystem and a fan plus a thermal zone.
    pub fn typical_system() -> Self {
        let fs = Self::new();

        fs.add_file(
            "/etc/os-release",
            "\
PRETTY_NAME=\"Debian GNU/Linux 12 (bookworm)\"
NAME=\"Debian GNU/Linux\"
VERSION_ID=\"12\"
ID=debian
",
        );
        fs.add_file(
            "/etc/mtab",
            "\
/dev/sda1 / ext4 rw,relatime 0 0
proc /proc proc rw,nosuid,nodev,noexec,relatime 0 0
sysfs /sys sysfs rw,nosuid,nodev,noexec,relatime 0 0
tmpfs /run tmpfs rw,nosuid,nodev,size=1632224k,mode=755 0 0
",
        );

        fs.add_file(
            "/proc/meminfo",
            "\
MemTotal:       16384000 kB
MemFree:         8192000 kB
MemAvailable:   12000000 kB
Buffers:          512000 kB
Cached:          2048000 kB
SwapCached:            0 kB
SwapTotal:       4096000 kB
SwapFree:        4096000 kB
",
        );
        fs.add_file(
            "/proc/stat",
            "\
cpu  10000 500 3000 80000 1000 200 100 0 0 0
cpu0 2500 125 750 20000 250 50 25 0 0 0
cpu1 2500 125 750 20000 250 50 25 0 0 0
cpu2 2500 125 750 20000 250 50 25 0 0 0
cpu3 2500 125 750 20000 250 50 25 0 0 0
intr 1000000 50 0 0 0 0 0 0 0 1 0 0 0 100 0 0 1000
ctxt 500000
btime 1700000000
processes 10000
procs_running 2
procs_blocked 0
",
        );
        fs.add_file(
            "/proc/cpuinfo",
            "\
processor\t: 0
vendor_id\t: GenuineIntel
model name\t: Intel(R) Xeon(R) CPU E5-2680 v4 @ 2.40GHz
",
        );

        // init
        fs.add_process(
            1,
            "1 (systemd) S 0 1 1 0 -1 4194560 50000 1000000 100 500 1000 500 5000 2000 20 0 1 0 1 170000000 3000 18446744073709551615 1 1 0 0 0 0 671173123 4096 1260 0 0 0 17 0 0 0 0 0 0 0 0 0 0 0 0 0 0",
        );
        // bash shell
        fs.add_process(
            1000,
            "1000 (bash) S 1 1000 1000 34816 1000 4194304 2000 10000 0 0 50 20 100 50 20 0 1 0 1000 25000000 1500 18446744073709551615 1 1 0 0 0 0 65536 3670020 1266777851 0 0 0 17 1 0 0 0 0 0 0 0 0 0 0 0 0 0",
        );
        // daemon
        fs.add_process(
            500,
            "500 (sshd) R 1 500 500 0 -1 4194560 1000 0 0 0 10 5 0 0 20 0 1 0 500 15000000 1000 18446744073709551615 1 1 0 0 0 0 0 4096 81926 0 0 0 17 2 0 0 0 0 0 0 0 0 0 0 0 0 0",
        );
        fs.add_dir("/proc/self");

        fs.add_interface(
            "eth0",
            &[
                ("rx_bytes", 1_234_567_890),
                ("rx_packets", 1_000_000),
                ("tx_bytes", 987_654_321),
                ("tx_packets", 800_000),
            ],
        );
        fs.add_interface("lo", &[("rx_bytes", 12_345_678), ("tx_bytes", 12_345_678)]);

        fs.add_file("/sys/class/hwmon/hwmon0/name", "coretemp\n");
        fs.add_file("/sys/class/hwmon/hwmon0/temp1_input", "52000\n");
        fs.add_file("/sys/class/hwmon/hwmon1/fan1_input", "2100\n");
        fs.add_file("/sys/class/thermal/thermal_zone0/temp", "48000\n");

        fs
    }
}

impl MockHost {
    /// Host answers matching [`MockFs::typical_system`].
    pub fn typical_system() -> Self {
        let host = Self::new();
        host.set_hostname("testhost");
        host.set_login_user("user");
        host.set_memory(MemoryTotals {
            total_ram: 16_384_000 * 1024,
            free_ram: 8_192_000 * 1024,
            total_swap: 4_096_000 * 1024,
            free_swap: 4_096_000 * 1024,
        });
        host.set_fs_stats(
            "/",
            FsStats {
                blocks: 25_600_000,
                blocks_free: 12_800_000,
                fragment_size: 4096,
            },
        );
        host.add_ipv4("lo", Ipv4Addr::LOCALHOST);
        host.add_ipv4("eth0", Ipv4Addr::new(192, 168, 1, 100));
        host
    }
}

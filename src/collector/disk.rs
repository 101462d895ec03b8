//! Space usage of locally mounted filesystems.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::collector::procfs::parse_mounts;
use crate::collector::traits::{FileSystem, Host, read_source};
use crate::model::DiskInfo;

/// Filesystem types reported; everything else (virtual, network, tmpfs) is
/// skipped.
pub const LOCAL_FS_TYPES: &[&str] = &["ext4", "xfs", "btrfs", "zfs"];

/// Enumerates the mount table and queries each local filesystem.
pub struct DiskCollector<F: FileSystem, H: Host> {
    fs: F,
    host: H,
    mount_tables: Vec<PathBuf>,
}

impl<F: FileSystem, H: Host> DiskCollector<F, H> {
    /// Reads `<etc>/mtab`, falling back to `<proc>/mounts`.
    pub fn new(fs: F, host: H, etc_path: &Path, proc_path: &Path) -> Self {
        Self {
            fs,
            host,
            mount_tables: vec![etc_path.join("mtab"), proc_path.join("mounts")],
        }
    }

    /// One entry per mounted local filesystem, in mount-table order.
    pub fn collect(&self) -> Vec<DiskInfo> {
        let Some(content) = self
            .mount_tables
            .iter()
            .find_map(|path| read_source(&self.fs, path))
        else {
            return Vec::new();
        };

        let mut seen = HashSet::new();
        let mut disks = Vec::new();
        for entry in parse_mounts(&content) {
            if !LOCAL_FS_TYPES.contains(&entry.fs_type.as_str()) {
                continue;
            }
            if !seen.insert(entry.mount_point.clone()) {
                continue;
            }
            let stats = match self.host.fs_stats(Path::new(&entry.mount_point)) {
                Ok(stats) => stats,
                Err(e) => {
                    debug!(mount = %entry.mount_point, error = %e, "skipping mount");
                    continue;
                }
            };
            let total_space = stats.blocks.saturating_mul(stats.fragment_size);
            let free_space = stats
                .blocks_free
                .saturating_mul(stats.fragment_size)
                .min(total_space);
            disks.push(DiskInfo {
                device: entry.device,
                mount_point: entry.mount_point,
                fs_type: entry.fs_type,
                total_space,
                used_space: total_space - free_space,
                free_space,
            });
        }
        disks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::mock::{MockFs, MockHost};
    use crate::collector::traits::FsStats;

    const MTAB: &str = "\
/dev/nvme0n1p2 / ext4 rw,relatime 0 0
proc /proc proc rw,nosuid,nodev,noexec,relatime 0 0
tmpfs /run tmpfs rw,nosuid,nodev 0 0
/dev/nvme0n1p3 /home btrfs rw,relatime 0 0
server:/export /mnt/nfs nfs4 rw 0 0
/dev/sdb1 /data xfs rw 0 0
/dev/nvme0n1p3 /home btrfs rw,relatime 0 0
";

    fn host() -> MockHost {
        let host = MockHost::new();
        host.set_fs_stats(
            "/",
            FsStats {
                blocks: 1000,
                blocks_free: 250,
                fragment_size: 4096,
            },
        );
        host.set_fs_stats(
            "/home",
            FsStats {
                blocks: 2000,
                blocks_free: 2000,
                fragment_size: 4096,
            },
        );
        host
    }

    #[test]
    fn test_collect_filters_local_types() {
        let fs = MockFs::new();
        fs.add_file("/etc/mtab", MTAB);
        let collector = DiskCollector::new(fs, host(), Path::new("/etc"), Path::new("/proc"));

        let disks = collector.collect();
        // /data is xfs but its statistics query fails, so it is skipped.
        assert_eq!(disks.len(), 2);

        assert_eq!(disks[0].mount_point, "/");
        assert_eq!(disks[0].fs_type, "ext4");
        assert_eq!(disks[0].total_space, 1000 * 4096);
        assert_eq!(disks[0].free_space, 250 * 4096);
        assert_eq!(disks[0].used_space, 750 * 4096);
        assert_eq!(disks[0].usage_percent(), 75.0);

        assert_eq!(disks[1].mount_point, "/home");
        assert_eq!(disks[1].used_space, 0);
    }

    #[test]
    fn test_collect_falls_back_to_proc_mounts() {
        let fs = MockFs::new();
        fs.add_file("/proc/mounts", "/dev/sda1 / ext4 rw 0 0\n");
        let collector = DiskCollector::new(fs, host(), Path::new("/etc"), Path::new("/proc"));

        let disks = collector.collect();
        assert_eq!(disks.len(), 1);
        assert_eq!(disks[0].device, "/dev/sda1");
    }

    #[test]
    fn test_collect_without_mount_table() {
        let collector =
            DiskCollector::new(MockFs::new(), host(), Path::new("/etc"), Path::new("/proc"));
        assert!(collector.collect().is_empty());
    }
}

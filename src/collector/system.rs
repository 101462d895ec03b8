//! OS, host and user identity.

use std::path::Path;

use crate::collector::procfs::parse_os_release;
use crate::collector::traits::{FileSystem, Host, read_source};
use crate::model::SystemInfo;

const UNKNOWN: &str = "Unknown";

/// Reads the static identity of the machine once at construction.
pub struct SystemInfoCollector {
    info: SystemInfo,
}

impl SystemInfoCollector {
    /// `cpu` and `logical_cpus` are left at their defaults; the façade fills
    /// them in from the CPU collector.
    pub fn new<F: FileSystem, H: Host>(fs: &F, host: &H, etc_path: &Path) -> Self {
        let os_name = read_source(fs, &etc_path.join("os-release"))
            .and_then(|content| parse_os_release(&content))
            .unwrap_or_else(|| os_family().to_string());

        Self {
            info: SystemInfo {
                os_name,
                hostname: host.hostname().unwrap_or_else(|| UNKNOWN.to_string()),
                user: host.login_user().unwrap_or_else(|| UNKNOWN.to_string()),
                ..SystemInfo::default()
            },
        }
    }

    pub fn info(&self) -> &SystemInfo {
        &self.info
    }
}

/// Display name of the OS this binary was built for.
fn os_family() -> &'static str {
    match std::env::consts::OS {
        "linux" => "Linux",
        "macos" => "macOS",
        "freebsd" => "FreeBSD",
        "openbsd" => "OpenBSD",
        "netbsd" => "NetBSD",
        "android" => "Android",
        _ => UNKNOWN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::mock::{MockFs, MockHost};

    #[test]
    fn test_reads_identity() {
        let fs = MockFs::new();
        fs.add_file(
            "/etc/os-release",
            "NAME=\"Ubuntu\"\nPRETTY_NAME=\"Ubuntu 24.04.1 LTS\"\nID=ubuntu\n",
        );
        let host = MockHost::new();
        host.set_hostname("build-01");
        host.set_login_user("alice");

        let collector = SystemInfoCollector::new(&fs, &host, Path::new("/etc"));
        let info = collector.info();
        assert_eq!(info.os_name, "Ubuntu 24.04.1 LTS");
        assert_eq!(info.hostname, "build-01");
        assert_eq!(info.user, "alice");
    }

    #[test]
    fn test_falls_back_when_sources_missing() {
        let collector =
            SystemInfoCollector::new(&MockFs::new(), &MockHost::new(), Path::new("/etc"));
        let info = collector.info();
        assert_eq!(info.os_name, os_family());
        assert_eq!(info.hostname, "Unknown");
        assert_eq!(info.user, "Unknown");
    }

    #[test]
    fn test_name_used_without_pretty_name() {
        let fs = MockFs::new();
        fs.add_file("/etc/os-release", "NAME=Alpine Linux\n");
        let collector = SystemInfoCollector::new(&fs, &MockHost::new(), Path::new("/etc"));
        assert_eq!(collector.info().os_name, "Alpine Linux");
    }
}

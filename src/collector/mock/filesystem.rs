//! In-memory mock sources for testing collectors without a real kernel.
//!
//! `MockFs` simulates a filesystem in memory and `MockHost` answers the
//! non-file queries from plain fields, so tests run anywhere.

use crate::collector::traits::{CpuIdentity, FileSystem, FsStats, Host, MemoryTotals};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::io;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use std::rc::Rc;

#[derive(Debug, Default)]
struct MockFsInner {
    /// Map from path to file contents.
    files: HashMap<PathBuf, String>,
    /// Set of directories (for read_dir support).
    directories: HashSet<PathBuf>,
}

/// In-memory filesystem for testing.
///
/// Clones share the same contents, so a test can keep a handle and mutate
/// files after the collector has taken its own copy.
#[derive(Debug, Clone, Default)]
pub struct MockFs {
    inner: Rc<RefCell<MockFsInner>>,
}

impl MockFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a file with the given content.
    ///
    /// Parent directories are automatically created.
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<String>) {
        let path = path.as_ref().to_path_buf();
        let mut inner = self.inner.borrow_mut();
        add_parents(&mut inner.directories, &path);
        inner.files.insert(path, content.into());
    }

    /// Adds an empty directory.
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        let mut inner = self.inner.borrow_mut();
        add_parents(&mut inner.directories, &path);
        inner.directories.insert(path);
    }

    /// Removes a file, simulating an entity that vanished.
    pub fn remove_file(&self, path: impl AsRef<Path>) {
        self.inner.borrow_mut().files.remove(path.as_ref());
    }

    /// Removes a directory and everything below it.
    pub fn remove_dir(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut inner = self.inner.borrow_mut();
        inner.files.retain(|p, _| !p.starts_with(path));
        inner.directories.retain(|p| !p.starts_with(path));
    }

    /// Adds `/proc/<pid>/stat`.
    pub fn add_process(&self, pid: u32, stat: &str) {
        self.add_file(format!("/proc/{}/stat", pid), stat);
    }

    /// Adds a network interface with the given `statistics/` counters.
    pub fn add_interface(&self, name: &str, counters: &[(&str, u64)]) {
        let base = PathBuf::from(format!("/sys/class/net/{}", name));
        self.add_dir(base.join("statistics"));
        for (file, value) in counters {
            self.add_file(base.join("statistics").join(file), format!("{}\n", value));
        }
    }
}

fn add_parents(directories: &mut HashSet<PathBuf>, path: &Path) {
    let mut parent = path.parent();
    while let Some(p) = parent {
        if !p.as_os_str().is_empty() {
            directories.insert(p.to_path_buf());
        }
        parent = p.parent();
    }
}

impl FileSystem for MockFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.inner.borrow().files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found: {:?}", path),
            )
        })
    }


    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let inner = self.inner.borrow();
        if !inner.directories.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("directory not found: {:?}", path),
            ));
        }

        let mut entries = HashSet::new();

        for file_path in inner.files.keys() {
            if file_path.parent().is_some_and(|parent| parent == path) {
                entries.insert(file_path.clone());
            }
        }

        for dir_path in &inner.directories {
            if dir_path.parent().is_some_and(|parent| parent == path) && dir_path != path {
                entries.insert(dir_path.clone());
            }
        }

        Ok(entries.into_iter().collect())
    }
}

#[derive(Debug, Default)]
struct MockHostInner {
    fs_stats: HashMap<PathBuf, FsStats>,
    ipv4: Vec<(String, Ipv4Addr)>,
    memory: Option<MemoryTotals>,
    hostname: Option<String>,
    login_user: Option<String>,
    cpu_identity: Option<CpuIdentity>,
    page_size: u64,
}

/// `Host` answering from preset values. Clones share state like `MockFs`.
#[derive(Debug, Clone)]
pub struct MockHost {
    inner: Rc<RefCell<MockHostInner>>,
}

impl Default for MockHost {
    fn default() -> Self {
        Self {
            inner: Rc::new(RefCell::new(MockHostInner {
                page_size: 4096,
                ..MockHostInner::default()
            })),
        }
    }
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fs_stats(&self, mount_point: impl AsRef<Path>, stats: FsStats) {
        self.inner
            .borrow_mut()
            .fs_stats
            .insert(mount_point.as_ref().to_path_buf(), stats);
    }

    pub fn add_ipv4(&self, interface: &str, addr: Ipv4Addr) {
        self.inner
            .borrow_mut()
            .ipv4
            .push((interface.to_string(), addr));
    }

    pub fn set_memory(&self, totals: MemoryTotals) {
        self.inner.borrow_mut().memory = Some(totals);
    }

    pub fn set_hostname(&self, name: &str) {
        self.inner.borrow_mut().hostname = Some(name.to_string());
    }

    pub fn set_login_user(&self, name: &str) {
        self.inner.borrow_mut().login_user = Some(name.to_string());
    }

    pub fn set_cpu_identity(&self, vendor: &str, model: &str) {
        self.inner.borrow_mut().cpu_identity = Some(CpuIdentity {
            vendor: vendor.to_string(),
            model: model.to_string(),
        });
    }

    pub fn set_page_size(&self, size: u64) {
        self.inner.borrow_mut().page_size = size;
    }
}

impl Host for MockHost {
    fn fs_stats(&self, mount_point: &Path) -> io::Result<FsStats> {
        self.inner
            .borrow()
            .fs_stats
            .get(mount_point)
            .copied()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such mount point"))
    }

    fn ipv4_addresses(&self) -> io::Result<Vec<(String, Ipv4Addr)>> {
        Ok(self.inner.borrow().ipv4.clone())
    }

    fn memory_totals(&self) -> io::Result<MemoryTotals> {
        self.inner
            .borrow()
            .memory
            .ok_or_else(|| io::Error::new(io::ErrorKind::Unsupported, "no memory totals set"))
    }

    fn hostname(&self) -> Option<String> {
        self.inner.borrow().hostname.clone()
    }

    fn login_user(&self) -> Option<String> {
        self.inner.borrow().login_user.clone()
    }

    fn cpu_identity(&self) -> Option<CpuIdentity> {
        self.inner.borrow().cpu_identity.clone()
    }

    fn page_size(&self) -> u64 {
        self.inner.borrow().page_size
    }
}

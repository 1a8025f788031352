//! Filesystem abstraction used by the entry lister.
//!
//! [`HostFileSystem`] talks to the real OS. [`MemoryFileSystem`] is an
//! in-memory tree for tests and headless hosts; it can be mutated through a
//! shared reference so a test can delete a directory mid-session.
use crate::platform::drives::{DriveInfo, DriveType};
use crate::platform::{self, paths};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashSet};
use std::ffi::{OsStr, OsString};
use std::io;
use std::path::{Path, PathBuf};

/// One raw child of a directory, before it becomes an [`Entry`](crate::Entry).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    pub name: OsString,
    pub is_dir: bool,
    pub is_hidden: bool,
}

/// Host filesystem primitives the lister depends on.
///
/// Implementations must be shareable with the background lister thread.
pub trait FileSystem: Send + Sync {
    /// Every drive or volume currently mounted.
    fn drives(&self) -> io::Result<Vec<DriveInfo>>;

    /// `true` if `path` exists and is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Immediate children of `path`, in no particular order.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntryInfo>>;
}

// ── Host ──────────────────────────────────────────────────────────────────────

/// The real filesystem, via `std::fs` and [`platform::enumerate_drives`].
#[derive(Debug, Clone, Copy, Default)]
pub struct HostFileSystem;

impl FileSystem for HostFileSystem {
    fn drives(&self) -> io::Result<Vec<DriveInfo>> {
        platform::enumerate_drives()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntryInfo>> {
        let mut out = Vec::new();
        for entry in std::fs::read_dir(path)? {
            // A child can vanish between readdir and stat; skip it rather
            // than failing the whole listing.
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::debug!("Skipping unreadable entry in {}: {}", path.display(), e);
                    continue;
                }
            };
            let file_type = match entry.file_type() {
                Ok(t) => t,
                Err(e) => {
                    tracing::debug!("Skipping {:?}: {}", entry.path(), e);
                    continue;
                }
            };

            // Symlinks to directories navigate like directories.
            let is_dir = file_type.is_dir()
                || (file_type.is_symlink()
                    && std::fs::metadata(entry.path())
                        .map(|m| m.is_dir())
                        .unwrap_or(false));

            let name = entry.file_name();
            let is_hidden = is_hidden(&entry, &name);
            out.push(DirEntryInfo {
                name,
                is_dir,
                is_hidden,
            });
        }
        Ok(out)
    }
}

#[cfg(windows)]
fn is_hidden(entry: &std::fs::DirEntry, _name: &OsStr) -> bool {
    use std::os::windows::fs::MetadataExt;
    const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;
    entry
        .metadata()
        .map(|m| m.file_attributes() & FILE_ATTRIBUTE_HIDDEN != 0)
        .unwrap_or(false)
}

#[cfg(not(windows))]
fn is_hidden(_entry: &std::fs::DirEntry, name: &OsStr) -> bool {
    is_dot_name(name)
}

fn is_dot_name(name: &OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

// ── In-memory ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeKind {
    Dir,
    File,
}

#[derive(Debug, Default)]
struct MemoryTree {
    drives: Vec<DriveInfo>,
    /// Keyed by normalised absolute path.
    nodes: BTreeMap<PathBuf, NodeKind>,
    /// Directories whose `read_dir` fails with `PermissionDenied`.
    denied: HashSet<PathBuf>,
}

impl MemoryTree {
    fn insert_dir_all(&mut self, path: &Path) {
        let path = paths::normalize(path);
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            self.nodes.insert(ancestor.to_path_buf(), NodeKind::Dir);
        }
    }
}

/// An in-memory filesystem.
///
/// Paths are normalised on the way in, so `a/./b` and `a/b` are the same
/// node. Hidden entries are those whose name starts with a dot.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    tree: RwLock<MemoryTree>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fixed drive rooted at `root` (and create the root directory).
    pub fn with_drive(self, root: impl AsRef<Path>) -> Self {
        self.add_drive(root.as_ref(), DriveType::Fixed);
        self
    }

    pub fn with_dir(self, path: impl AsRef<Path>) -> Self {
        self.create_dir_all(path.as_ref());
        self
    }

    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.add_file(path.as_ref());
        self
    }

    pub fn add_drive(&self, root: &Path, drive_type: DriveType) {
        let mut tree = self.tree.write();
        tree.insert_dir_all(root);
        tree.drives
            .push(DriveInfo::new(root.to_path_buf(), drive_type));
    }

    /// Create a directory and every missing ancestor.
    pub fn create_dir_all(&self, path: &Path) {
        self.tree.write().insert_dir_all(path);
    }

    /// Create a file, creating its parent directories as needed.
    pub fn add_file(&self, path: &Path) {
        let path = paths::normalize(path);
        let mut tree = self.tree.write();
        if let Some(parent) = path.parent() {
            tree.insert_dir_all(parent);
        }
        tree.nodes.insert(path, NodeKind::File);
    }

    /// Remove a node and everything beneath it.
    pub fn remove(&self, path: &Path) {
        let path = paths::normalize(path);
        let mut tree = self.tree.write();
        tree.nodes.retain(|p, _| !p.starts_with(&path));
        tree.denied.retain(|p| !p.starts_with(&path));
    }

    /// Make `read_dir` on `path` fail with `PermissionDenied`.
    pub fn deny(&self, path: &Path) {
        self.tree.write().denied.insert(paths::normalize(path));
    }
}

impl FileSystem for MemoryFileSystem {
    fn drives(&self) -> io::Result<Vec<DriveInfo>> {
        Ok(self.tree.read().drives.clone())
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.tree.read().nodes.get(&paths::normalize(path)) == Some(&NodeKind::Dir)
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntryInfo>> {
        let path = paths::normalize(path);
        let tree = self.tree.read();
        match tree.nodes.get(&path) {
            Some(NodeKind::Dir) => {}
            Some(NodeKind::File) => {
                return Err(io::Error::new(
                    io::ErrorKind::Other,
                    format!("{} is not a directory", path.display()),
                ))
            }
            None => {
                return Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("{} not found", path.display()),
                ))
            }
        }
        if tree.denied.contains(&path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("access to {} denied", path.display()),
            ));
        }

        Ok(tree
            .nodes
            .iter()
            .filter(|(p, _)| p.parent() == Some(path.as_path()))
            .filter_map(|(p, kind)| {
                let name = p.file_name()?.to_os_string();
                let is_hidden = is_dot_name(&name);
                Some(DirEntryInfo {
                    name,
                    is_dir: *kind == NodeKind::Dir,
                    is_hidden,
                })
            })
            .collect())
    }
}

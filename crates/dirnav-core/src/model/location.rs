//! The browsed location: a directory path, or drive selection.

use std::fmt;
use std::path::{Path, PathBuf};

/// What the navigator is currently showing.
///
/// `Drives` is the "empty" location: no directory is selected and the
/// listing shows every mounted drive instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Location {
    /// Drive selection mode.
    #[default]
    Drives,
    /// Browsing the contents of a directory.
    Directory(PathBuf),
}

impl Location {
    /// Build a location from a path, mapping the empty path to `Drives`.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if path.as_os_str().is_empty() {
            Self::Drives
        } else {
            Self::Directory(path)
        }
    }

    /// `true` in drive selection mode.
    pub fn is_drives(&self) -> bool {
        matches!(self, Self::Drives)
    }

    /// The browsed directory, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Drives => None,
            Self::Directory(p) => Some(p),
        }
    }
}

impl From<PathBuf> for Location {
    fn from(path: PathBuf) -> Self {
        Self::from_path(path)
    }
}

impl From<&Path> for Location {
    fn from(path: &Path) -> Self {
        Self::from_path(path)
    }
}

impl From<&str> for Location {
    fn from(path: &str) -> Self {
        Self::from_path(path)
    }
}

impl From<Option<PathBuf>> for Location {
    fn from(path: Option<PathBuf>) -> Self {
        path.map(Self::from_path).unwrap_or_default()
    }
}

impl fmt::Display for Location {
    /// Drive selection renders as the empty string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Drives => Ok(()),
            Self::Directory(p) => write!(f, "{}", p.display()),
        }
    }
}

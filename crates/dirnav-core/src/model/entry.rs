//! A single navigable entry in a listing.
//!
//! Entries are immutable. The display name is a lossy UTF-8 rendering used
//! for keying and presentation; the navigation key keeps the exact OS name
//! so non-UTF-8 directories still navigate correctly.
use compact_str::CompactString;
use std::ffi::{OsStr, OsString};
use std::path::Path;

/// Name and key of the synthetic "go up" entry.
pub const PARENT_MARKER: &str = "..";

/// Entry classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Drive,
    Directory,
    File,
    /// The synthetic `..` entry at the head of every directory listing.
    ParentMarker,
}

impl EntryKind {
    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Drive => "Drive",
            Self::Directory => "Directory",
            Self::File => "File",
            Self::ParentMarker => "Parent",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub kind: EntryKind,
    /// Name shown to the user and used as the deduplication key.
    pub display_name: CompactString,
    /// Resolves the next location: the drive root, a name relative to the
    /// listed directory, or `..`.
    pub navigation_key: OsString,
}

impl Entry {
    fn new(kind: EntryKind, key: &OsStr) -> Self {
        Self {
            kind,
            display_name: CompactString::from(key.to_string_lossy()),
            navigation_key: key.to_os_string(),
        }
    }

    /// A drive entry keyed by its root, e.g. `C:\` or `/`.
    pub fn drive(root: &Path) -> Self {
        Self::new(EntryKind::Drive, root.as_os_str())
    }

    pub fn parent_marker() -> Self {
        Self::new(EntryKind::ParentMarker, OsStr::new(PARENT_MARKER))
    }

    pub fn directory(name: &OsStr) -> Self {
        Self::new(EntryKind::Directory, name)
    }

    pub fn file(name: &OsStr) -> Self {
        Self::new(EntryKind::File, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_marker_key() {
        let e = Entry::parent_marker();
        assert_eq!(e.kind, EntryKind::ParentMarker);
        assert_eq!(e.display_name, "..");
        assert_eq!(e.navigation_key, OsString::from(".."));
    }

    #[test]
    fn test_drive_uses_root_as_name_and_key() {
        let root = Path::new(std::path::MAIN_SEPARATOR_STR);
        let e = Entry::drive(root);
        assert_eq!(e.kind, EntryKind::Drive);
        assert_eq!(e.display_name, std::path::MAIN_SEPARATOR_STR);
        assert_eq!(Path::new(&e.navigation_key), root);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_name_keeps_exact_key() {
        use std::os::unix::ffi::OsStrExt;
        let raw = OsStr::from_bytes(b"caf\xe9");
        let e = Entry::directory(raw);
        assert_eq!(e.navigation_key.as_os_str(), raw);
        assert!(e.display_name.contains('\u{FFFD}'));
    }
}

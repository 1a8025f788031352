//! Entry lister — turns a [`Location`] into the ordered set of navigable
//! entries shown for it.
//!
//! Provides two ways to run a listing:
//! - **Inline:** [`list_entries`] runs synchronously on the caller's thread.
//! - **Background:** [`worker::ListingWorker`] runs listings on a dedicated
//!   thread and tags each result with the generation it was requested for,
//!   so the caller can discard results that were superseded in the meantime.
pub mod worker;

use crate::config::ListOptions;
use crate::error::ListingError;
use crate::fs::{DirEntryInfo, FileSystem};
use crate::model::{Entry, EntryKind, Location};
use crate::platform::DriveType;
use compact_str::CompactString;
use indexmap::IndexMap;
use std::path::Path;
use std::sync::Arc;

/// Produce the entries for `location`.
///
/// - `Drives`: one [`EntryKind::Drive`] per mounted drive, nothing else.
/// - `Directory(p)`: the `..` parent marker first, then sub-directories,
///   then files. Each group is sorted case-insensitively by name.
///
/// Entries are assembled into a map keyed by display name, so two entries
/// with the same name collapse into one: the later value wins and keeps the
/// earlier entry's position.
pub fn list_entries(
    fs: &dyn FileSystem,
    location: &Location,
    options: &ListOptions,
) -> Result<Vec<Entry>, ListingError> {
    let mut entries: IndexMap<CompactString, Entry> = IndexMap::new();
    let mut insert = |entry: Entry| {
        entries.insert(entry.display_name.clone(), entry);
    };

    match location {
        Location::Drives => {
            let drives = fs
                .drives()
                .map_err(|source| ListingError::Drives {
                    source: Arc::new(source),
                })?;
            for drive in drives {
                let wanted = match drive.drive_type {
                    DriveType::Network => options.include_network_drives,
                    DriveType::Virtual => options.include_virtual_drives,
                    _ => true,
                };
                if wanted {
                    insert(Entry::drive(&drive.root));
                }
            }
        }
        Location::Directory(path) => {
            let children = read_children(fs, path)?;
            let (mut dirs, mut files): (Vec<_>, Vec<_>) = children
                .into_iter()
                .filter(|c| options.show_hidden || !c.is_hidden)
                .partition(|c| c.is_dir);
            sort_by_name(&mut dirs);
            sort_by_name(&mut files);

            insert(Entry::parent_marker());
            for dir in dirs {
                insert(Entry::directory(&dir.name));
            }
            for file in files {
                insert(Entry::file(&file.name));
            }
        }
    }

    let entries: Vec<Entry> = entries.into_values().collect();
    debug_assert!(
        location.is_drives() || entries.first().map(|e| e.kind) == Some(EntryKind::ParentMarker),
        "directory listings must start with the parent marker"
    );
    Ok(entries)
}

fn read_children(fs: &dyn FileSystem, path: &Path) -> Result<Vec<DirEntryInfo>, ListingError> {
    if !fs.is_dir(path) {
        return Err(ListingError::Missing {
            location: path.to_path_buf(),
        });
    }
    fs.read_dir(path).map_err(|source| ListingError::ReadDir {
        location: path.to_path_buf(),
        source: Arc::new(source),
    })
}

fn sort_by_name(children: &mut [DirEntryInfo]) {
    children.sort_by_cached_key(|c| (c.name.to_string_lossy().to_lowercase(), c.name.clone()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFileSystem;
    use crate::platform::DriveType;
    use std::path::{PathBuf, MAIN_SEPARATOR_STR};

    fn root() -> PathBuf {
        PathBuf::from(MAIN_SEPARATOR_STR)
    }

    fn summary(entries: &[Entry]) -> Vec<(EntryKind, &str)> {
        entries
            .iter()
            .map(|e| (e.kind, e.display_name.as_str()))
            .collect()
    }

    #[test]
    fn test_drives_listing_has_only_drives() {
        let fs = MemoryFileSystem::new().with_drive(root());
        let entries = list_entries(&fs, &Location::Drives, &ListOptions::default()).unwrap();
        assert_eq!(summary(&entries), vec![(EntryKind::Drive, MAIN_SEPARATOR_STR)]);
    }

    #[test]
    fn test_drive_filters() {
        let fs = MemoryFileSystem::new().with_drive(root());
        fs.add_drive(&root().join("net"), DriveType::Network);
        fs.add_drive(&root().join("proc"), DriveType::Virtual);

        let all = list_entries(&fs, &Location::Drives, &ListOptions::default()).unwrap();
        assert_eq!(all.len(), 3);

        let options = ListOptions {
            include_network_drives: false,
            include_virtual_drives: false,
            ..ListOptions::default()
        };
        let local = list_entries(&fs, &Location::Drives, &options).unwrap();
        assert_eq!(local.len(), 1);
        assert!(local.iter().all(|e| e.kind == EntryKind::Drive));
    }

    #[test]
    fn test_duplicate_drive_roots_collapse() {
        let fs = MemoryFileSystem::new().with_drive(root()).with_drive(root());
        let entries = list_entries(&fs, &Location::Drives, &ListOptions::default()).unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_directory_order() {
        let docs = root().join("home").join("user").join("docs");
        let fs = MemoryFileSystem::new()
            .with_file(docs.join("b.txt"))
            .with_file(docs.join("A.txt"))
            .with_dir(docs.join("zeta"))
            .with_dir(docs.join("Alpha"));

        let entries =
            list_entries(&fs, &Location::Directory(docs), &ListOptions::default()).unwrap();
        assert_eq!(
            summary(&entries),
            vec![
                (EntryKind::ParentMarker, ".."),
                (EntryKind::Directory, "Alpha"),
                (EntryKind::Directory, "zeta"),
                (EntryKind::File, "A.txt"),
                (EntryKind::File, "b.txt"),
            ]
        );
    }

    #[test]
    fn test_empty_directory_has_only_parent_marker() {
        let fs = MemoryFileSystem::new().with_dir(root().join("empty"));
        let entries = list_entries(
            &fs,
            &Location::Directory(root().join("empty")),
            &ListOptions::default(),
        )
        .unwrap();
        assert_eq!(summary(&entries), vec![(EntryKind::ParentMarker, "..")]);
    }

    #[test]
    fn test_hidden_filter() {
        let dir = root().join("d");
        let fs = MemoryFileSystem::new()
            .with_file(dir.join(".hidden"))
            .with_file(dir.join("shown"));

        let loc = Location::Directory(dir);
        let all = list_entries(&fs, &loc, &ListOptions::default()).unwrap();
        assert_eq!(all.len(), 3);

        let options = ListOptions {
            show_hidden: false,
            ..ListOptions::default()
        };
        let visible = list_entries(&fs, &loc, &options).unwrap();
        assert_eq!(
            summary(&visible),
            vec![(EntryKind::ParentMarker, ".."), (EntryKind::File, "shown")]
        );
    }

    #[test]
    fn test_missing_directory() {
        let fs = MemoryFileSystem::new().with_drive(root());
        let missing = root().join("nope");
        let err = list_entries(
            &fs,
            &Location::Directory(missing.clone()),
            &ListOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ListingError::Missing { ref location } if *location == missing));
    }

    #[test]
    fn test_file_location_is_missing() {
        let file = root().join("f.txt");
        let fs = MemoryFileSystem::new().with_file(&file);
        let err =
            list_entries(&fs, &Location::Directory(file), &ListOptions::default()).unwrap_err();
        assert!(matches!(err, ListingError::Missing { .. }));
    }

    #[test]
    fn test_unreadable_directory() {
        let locked = root().join("locked");
        let fs = MemoryFileSystem::new().with_dir(&locked);
        fs.deny(&locked);
        let err = list_entries(
            &fs,
            &Location::Directory(locked.clone()),
            &ListOptions::default(),
        )
        .unwrap_err();
        match err {
            ListingError::ReadDir { location, source } => {
                assert_eq!(location, locked);
                assert_eq!(source.kind(), std::io::ErrorKind::PermissionDenied);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

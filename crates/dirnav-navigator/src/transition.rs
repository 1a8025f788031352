//! Navigation transitions — what selecting an entry does to the location.
//!
//! | Origin         | Entry        | Result                          |
//! |----------------|--------------|---------------------------------|
//! | drives         | drive        | browse the drive root           |
//! | directory `p`  | directory    | browse `p/name`, normalised     |
//! | directory `p`  | `..` at root | back to drive selection         |
//! | directory `p`  | `..`         | browse the parent of `p`        |
//! | directory `p`  | file         | report the file, stay put       |
//!
//! Any other combination cannot come out of the lister and is ignored.
use dirnav_core::model::{Entry, EntryKind, Location};
use dirnav_core::platform::paths;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Location becomes drive selection.
    ShowDrives,
    /// Location becomes this directory.
    Browse(PathBuf),
    /// A file was picked; the location is unchanged.
    FileSelected(PathBuf),
    /// Nothing happens.
    Ignored,
}

/// The two navigation states, borrowed from a [`Location`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseState<'a> {
    DriveSelection,
    Browsing(&'a Path),
}

impl<'a> From<&'a Location> for BrowseState<'a> {
    fn from(location: &'a Location) -> Self {
        match location {
            Location::Drives => Self::DriveSelection,
            Location::Directory(p) => Self::Browsing(p),
        }
    }
}

/// Compute the transition for selecting `entry` from a listing of `origin`.
///
/// `origin` is the location the entry was listed for, not whatever the
/// navigator shows now.
pub fn transition_for(origin: &Location, entry: &Entry) -> Transition {
    let key = Path::new(&entry.navigation_key);
    match (BrowseState::from(origin), entry.kind) {
        (BrowseState::DriveSelection, EntryKind::Drive) => Transition::Browse(key.to_path_buf()),
        (BrowseState::Browsing(dir), EntryKind::Directory) => {
            Transition::Browse(paths::resolve(dir, key))
        }
        (BrowseState::Browsing(dir), EntryKind::ParentMarker) => {
            if paths::is_root(dir) {
                Transition::ShowDrives
            } else {
                paths::parent_of(dir).map_or(Transition::ShowDrives, Transition::Browse)
            }
        }
        (BrowseState::Browsing(dir), EntryKind::File) => Transition::FileSelected(dir.join(key)),
        _ => Transition::Ignored,
    }
}

//! A complete, atomic listing for one location.

use super::{Entry, EntryKind, Location};
use chrono::{DateTime, Local};

/// The entry set produced by one listing pass.
///
/// A fresh `Listing` is built on every location change and replaces the
/// previous one wholesale; listings are never patched in place.
#[derive(Debug, Clone)]
pub struct Listing {
    /// Monotonic request number this listing answers.
    pub generation: u64,
    /// The location the entries were listed for.
    pub location: Location,
    pub entries: Vec<Entry>,
    /// Wall-clock time the listing completed.
    pub listed_at: DateTime<Local>,
}

impl Listing {
    pub fn new(generation: u64, location: Location, entries: Vec<Entry>) -> Self {
        Self {
            generation,
            location,
            entries,
            listed_at: Local::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries of the given kind.
    pub fn count(&self, kind: EntryKind) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }

    /// Look up an entry by its display name.
    pub fn find(&self, display_name: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.display_name == display_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    #[test]
    fn test_count_and_find() {
        let listing = Listing::new(
            3,
            Location::from("docs"),
            vec![
                Entry::parent_marker(),
                Entry::directory(OsStr::new("reports")),
                Entry::file(OsStr::new("a.txt")),
            ],
        );
        assert_eq!(listing.len(), 3);
        assert_eq!(listing.count(EntryKind::Directory), 1);
        assert_eq!(listing.count(EntryKind::Drive), 0);
        assert_eq!(
            listing.find("a.txt").map(|e| e.kind),
            Some(EntryKind::File)
        );
        assert!(listing.find("missing").is_none());
    }
}

//! Data model for DirNav listings.
//!
//! Re-exports the location value, entry types, and the listing snapshot.
pub mod entry;
pub mod listing;
pub mod location;

pub use entry::{Entry, EntryKind, PARENT_MARKER};
pub use listing::Listing;
pub use location::Location;

//! DirNav Core — entries, drives, path primitives, and listing.
//!
//! This crate contains all listing logic with zero UI dependencies.
//! It is designed to be driven by any frontend (GUI, TUI, headless host)
//! through the `dirnav-navigator` state machine.
//!
//! # Modules
//!
//! - [`model`] — Locations, entries, and listings.
//! - [`platform`] — Drive enumeration and path primitives for the host OS.
//! - [`fs`] — Filesystem abstraction with host and in-memory implementations.
//! - [`lister`] — The entry lister and its background worker.
//! - [`config`] — Navigator configuration.
//! - [`error`] — Error types.
pub mod config;
pub mod error;
pub mod fs;
pub mod lister;
pub mod model;
pub mod platform;

pub use config::{ListOptions, ListingMode, NavigatorConfig};
pub use error::{ConfigError, ListingError};
pub use fs::{DirEntryInfo, FileSystem, HostFileSystem, MemoryFileSystem};
pub use lister::list_entries;
pub use model::{Entry, EntryKind, Listing, Location};

//! DirNav — a toolkit-independent drive and directory navigator.
//!
//! Thin facade over the `dirnav-core` and `dirnav-navigator` crates, plus
//! logging setup for hosts that do not install their own subscriber.
//!
//! ```no_run
//! use dirnav::{Navigator, Transition};
//!
//! dirnav::init_logging(tracing::Level::INFO);
//!
//! // Headless: read entries straight from the navigator.
//! let mut nav = Navigator::new("", ());
//! let first_drive = nav.entries().next().map(|(handle, _)| handle);
//! if let Some(handle) = first_drive {
//!     let transition = nav.select(handle).expect("drive should be listable");
//!     assert!(matches!(transition, Transition::Browse(_)));
//! }
//! ```
pub use dirnav_core::{
    config, fs, lister, model, platform, ConfigError, Entry, EntryKind, FileSystem, HostFileSystem,
    ListOptions, Listing, ListingError, ListingMode, Location, MemoryFileSystem, NavigatorConfig,
};
pub use dirnav_navigator::{
    BrowseState, EntryViewFactory, LocationHandle, Navigator, NavigatorBuilder, NavigatorError,
    SelectHandle, SubscriptionId, Transition,
};

/// Install a `tracing` fmt subscriber capped at `max_level`.
///
/// Returns `false` if a global subscriber was already installed, in which
/// case the existing one is left alone.
pub fn init_logging(max_level: tracing::Level) -> bool {
    let installed = tracing_subscriber::fmt()
        .with_max_level(max_level)
        .try_init()
        .is_ok();
    if installed {
        tracing::info!("DirNav logging initialised at {max_level}");
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_twice_is_harmless() {
        let _ = init_logging(tracing::Level::DEBUG);
        assert!(!init_logging(tracing::Level::DEBUG));
    }
}

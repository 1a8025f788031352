//! Navigator error type.

use dirnav_core::ListingError;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

/// Errors reported to the owner of a [`Navigator`](crate::Navigator).
///
/// Every variant is recoverable: the navigator keeps its previous listing
/// and waits for the next location change.
#[derive(Debug, Clone, thiserror::Error)]
pub enum NavigatorError {
    /// A location set from outside does not resolve to an existing directory.
    #[error("invalid location {}: not an existing directory", .location.display())]
    InvalidLocation { location: PathBuf },

    /// Listing failed for a location reached through navigation.
    #[error(transparent)]
    Listing(#[from] ListingError),

    /// The background lister thread could not be started; listing runs inline.
    #[error("failed to start background lister: {0}")]
    WorkerSpawn(#[source] Arc<io::Error>),
}

//! Error types for listing and configuration.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

/// A listing pass could not produce entries.
///
/// None of these are fatal: the navigator keeps its previous entries and
/// reports the error to its owner. I/O sources are shared so the same error
/// can be handed to both the caller and an error hook.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ListingError {
    /// The location does not exist or is not a directory.
    #[error("location {} does not exist or is not a directory", .location.display())]
    Missing { location: PathBuf },

    /// The directory exists but could not be enumerated.
    #[error("failed to list {}: {source}", .location.display())]
    ReadDir {
        location: PathBuf,
        #[source]
        source: Arc<io::Error>,
    },

    /// Drive enumeration failed.
    #[error("failed to enumerate drives: {source}")]
    Drives {
        #[source]
        source: Arc<io::Error>,
    },

    /// The background lister thread is gone.
    #[error("background lister is no longer running")]
    WorkerDisconnected,
}

impl ListingError {
    /// The location this error refers to, if any.
    pub fn location(&self) -> Option<&std::path::Path> {
        match self {
            Self::Missing { location } | Self::ReadDir { location, .. } => Some(location),
            Self::Drives { .. } | Self::WorkerDisconnected => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

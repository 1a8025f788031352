//! Navigator configuration.
//!
//! Every field has a default, so an empty JSON object is a valid config.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default cap on chained location changes handled in one drain.
pub const DEFAULT_MAX_CHAINED_CHANGES: usize = 32;

/// Default cap on background messages drained per `process_messages` call.
pub const DEFAULT_MAX_MESSAGES_PER_PUMP: usize = 64;

/// Where listing work runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingMode {
    /// Synchronously, inside the location setter.
    #[default]
    Inline,
    /// On the `dirnav-lister` thread; results are applied by `process_messages`.
    Background,
}

/// Filters applied by the entry lister.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListOptions {
    /// Include dot-files (Unix) and hidden-attribute entries (Windows).
    pub show_hidden: bool,
    pub include_network_drives: bool,
    /// Include pseudo filesystems such as `proc`, `sysfs` and `cgroup`.
    pub include_virtual_drives: bool,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            show_hidden: true,
            include_network_drives: true,
            include_virtual_drives: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
    pub listing_mode: ListingMode,
    pub listing: ListOptions,
    /// Maximum queued location changes applied back-to-back before the
    /// rest is left for the next `process_messages` call.
    pub max_chained_changes: usize,
    /// Maximum background listing results drained per call.
    pub max_messages_per_pump: usize,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            listing_mode: ListingMode::Inline,
            listing: ListOptions::default(),
            max_chained_changes: DEFAULT_MAX_CHAINED_CHANGES,
            max_messages_per_pump: DEFAULT_MAX_MESSAGES_PER_PUMP,
        }
    }
}

impl NavigatorConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a config from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&text)?;
        tracing::debug!("Loaded navigator config from {}", path.display());
        Ok(config)
    }
}

//! # Clipboard Settings
//!
//! Chooses which backing store a clipboard generates when none is injected.
//! Loaded once at startup from TOML:
//!
//! ```toml
//! storage = "disk"
//! disk_directory = "/var/lib/lattice/clipboards"
//! hot_layers = 16
//! max_entities = 4096
//! ```
//!
//! Every key is optional.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ClipboardError, ClipboardResult};

/// Backing store variant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageKind {
    /// Dense in-memory array.
    #[default]
    Linear,
    /// LZ4-compressed layers with a small uncompressed working set.
    MemoryOptimized,
    /// Memory-mapped page file.
    Disk,
}

/// Settings for generated backing stores.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipboardSettings {
    /// Store variant to generate.
    pub storage: StorageKind,
    /// Directory for disk store files.
    pub disk_directory: PathBuf,
    /// Uncompressed layers kept by the memory-optimized store.
    pub hot_layers: usize,
    /// Entity cap per store; `None` is unlimited.
    pub max_entities: Option<usize>,
}

impl Default for ClipboardSettings {
    fn default() -> Self {
        Self {
            storage: StorageKind::Linear,
            disk_directory: std::env::temp_dir().join("lattice-clipboard"),
            hot_layers: 8,
            max_entities: None,
        }
    }
}

impl ClipboardSettings {
    /// Parses settings from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `ClipboardError::InvalidConfig` on malformed TOML or invalid values.
    pub fn from_toml_str(text: &str) -> ClipboardResult<Self> {
        let settings: Self =
            toml::from_str(text).map_err(|e| ClipboardError::InvalidConfig(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Loads settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `ClipboardError::Io` if the file cannot be read, or
    /// `ClipboardError::InvalidConfig` if it does not parse.
    pub fn load(path: impl AsRef<Path>) -> ClipboardResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns `ClipboardError::InvalidConfig` describing the first bad value.
    pub fn validate(&self) -> ClipboardResult<()> {
        if self.hot_layers == 0 {
            return Err(ClipboardError::InvalidConfig(
                "hot_layers must be at least 1".to_string(),
            ));
        }
        if self.storage == StorageKind::Disk && self.disk_directory.as_os_str().is_empty() {
            return Err(ClipboardError::InvalidConfig(
                "disk storage needs a disk_directory".to_string(),
            ));
        }
        Ok(())
    }
}

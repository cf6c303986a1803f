//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// Main configuration for the anreu pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnreuConfig {
    /// Text acquisition configuration.
    pub acquisition: AcquisitionConfig,

    /// Output configuration.
    pub output: OutputConfig,
}

/// Text acquisition configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquisitionConfig {
    /// Try the secondary backend when the primary fails or yields no text.
    pub enable_fallback: bool,

    /// Maximum pages to read per document (0 = unlimited).
    pub max_pages: usize,

    /// Attempt to open encrypted PDFs with an empty user password.
    pub try_empty_password: bool,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            enable_fallback: true,
            max_pages: 0,
            try_empty_password: true,
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON output.
    pub pretty: bool,

    /// Include the full record in outcome log events.
    pub log_records: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: false,
            log_records: true,
        }
    }
}

impl AnreuConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

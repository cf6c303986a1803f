//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod inspect;
pub mod process;

use std::path::{Path, PathBuf};

use tracing::debug;

use anreu_core::{AnreuConfig, Extraction, Outcome, ReceiptExtractor};

/// Default configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("anreu")
        .join("config.json")
}

/// Load the configuration named on the command line, else the default file, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<AnreuConfig> {
    if let Some(path) = config_path {
        return Ok(AnreuConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Loading config from {}", default_path.display());
        return Ok(AnreuConfig::from_file(&default_path)?);
    }

    Ok(AnreuConfig::default())
}

/// Whether a file holds already-extracted text rather than a PDF.
pub fn is_text_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("txt"))
}

/// Run one document through the extractor, choosing the entry point by extension.
pub fn extract_file(extractor: &ReceiptExtractor, path: &Path) -> Extraction {
    if is_text_file(path) {
        extractor.process_text_path(path)
    } else {
        extractor.process_path(path)
    }
}

/// Serialize an outcome as JSON.
pub fn outcome_json(outcome: &Outcome, pretty: bool) -> anyhow::Result<String> {
    Ok(if pretty {
        serde_json::to_string_pretty(outcome)?
    } else {
        serde_json::to_string(outcome)?
    })
}

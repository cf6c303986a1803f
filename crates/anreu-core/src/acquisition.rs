//! Text acquisition: a primary backend with a single fallback.

use tracing::{debug, warn};

use crate::error::{AcquisitionError, PdfError};
use crate::models::config::AcquisitionConfig;
use crate::pdf::{ContentStreamTextSource, LayoutTextSource, TextSource};

/// Text obtained from a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquiredText {
    /// Concatenated page text.
    pub text: String,
    /// Backend that produced the usable text.
    pub source: &'static str,
    /// Number of pages read.
    pub page_count: usize,
}

/// Runs the primary backend and, when it raises or comes back blank, the secondary.
pub struct FallbackAcquirer {
    primary: Box<dyn TextSource>,
    secondary: Option<Box<dyn TextSource>>,
    max_pages: usize,
}

impl FallbackAcquirer {
    /// Create an acquirer from explicit backends.
    pub fn new(primary: Box<dyn TextSource>, secondary: Box<dyn TextSource>) -> Self {
        Self {
            primary,
            secondary: Some(secondary),
            max_pages: 0,
        }
    }

    /// Build the default pdf-extract → lopdf pair from configuration.
    pub fn from_config(config: &AcquisitionConfig) -> Self {
        let secondary = ContentStreamTextSource::new().with_empty_password(config.try_empty_password);
        let mut acquirer = Self::new(Box::new(LayoutTextSource::new()), Box::new(secondary))
            .with_max_pages(config.max_pages);
        if !config.enable_fallback {
            acquirer.secondary = None;
        }
        acquirer
    }

    /// Limit the number of pages read (0 = unlimited).
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Disable the secondary backend.
    pub fn without_fallback(mut self) -> Self {
        self.secondary = None;
        self
    }

    /// Acquire the text of a document.
    pub fn acquire(&self, data: &[u8]) -> Result<AcquiredText, AcquisitionError> {
        let primary_name = self.primary.name();

        let (mut text, primary_failure) = match self.primary.page_texts(data) {
            Ok(pages) => {
                let page_count = self.limit(pages.len());
                let text = join_pages(&pages[..page_count]);
                if !text.trim().is_empty() {
                    debug!("{} produced {} chars from {} pages", primary_name, text.len(), page_count);
                    return Ok(AcquiredText {
                        text,
                        source: primary_name,
                        page_count,
                    });
                }
                debug!("{} produced no text, trying fallback", primary_name);
                (text, PrimaryFailure::Blank)
            }
            Err(e) => {
                warn!("{} failed: {}", primary_name, e);
                (String::new(), PrimaryFailure::Raised(e))
            }
        };

        let secondary = match &self.secondary {
            Some(secondary) => secondary,
            None => {
                return Err(match primary_failure {
                    PrimaryFailure::Raised(error) => AcquisitionError::PrimaryFailed {
                        source_name: primary_name,
                        error,
                    },
                    PrimaryFailure::Blank => AcquisitionError::Empty,
                });
            }
        };

        let pages = secondary.page_texts(data).map_err(|e| {
            warn!("{} failed: {}", secondary.name(), e);
            AcquisitionError::BothFailed {
                primary_name,
                primary: primary_failure.describe(),
                secondary_name: secondary.name(),
                secondary: e,
            }
        })?;

        let page_count = self.limit(pages.len());
        text.push_str(&join_pages(&pages[..page_count]));

        if text.trim().is_empty() {
            return Err(AcquisitionError::Empty);
        }

        debug!("{} produced {} chars from {} pages", secondary.name(), text.len(), page_count);
        Ok(AcquiredText {
            text,
            source: secondary.name(),
            page_count,
        })
    }

    fn limit(&self, page_count: usize) -> usize {
        if self.max_pages == 0 {
            page_count
        } else {
            page_count.min(self.max_pages)
        }
    }
}

impl Default for FallbackAcquirer {
    fn default() -> Self {
        Self::from_config(&AcquisitionConfig::default())
    }
}

enum PrimaryFailure {
    Raised(PdfError),
    Blank,
}

impl PrimaryFailure {
    fn describe(&self) -> String {
        match self {
            PrimaryFailure::Raised(e) => e.to_string(),
            PrimaryFailure::Blank => "no text".to_string(),
        }
    }
}

/// Concatenate page texts, each non-empty page followed by a newline.
fn join_pages(pages: &[String]) -> String {
    let mut text = String::new();
    for page in pages.iter().filter(|p| !p.is_empty()) {
        text.push_str(page);
        text.push('\n');
    }
    text
}

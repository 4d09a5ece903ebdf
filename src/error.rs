//! Error types for the bus-stop mapping library.
//!
//! Errors are categorized by their source (filesystem, PDF backend,
//! configuration, CSV output, map rendering) and keep enough context to
//! tell the user which input or output was involved.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for mapping operations.
pub type MapperResult<T> = Result<T, MapperError>;

/// Error type for all extraction, output and rendering operations.
#[derive(Debug, Error)]
pub enum MapperError {
    /// Error occurred while reading or writing files
    #[error("IO error for path '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The PDF backend could not produce text for a document
    #[error("Text extraction failed for '{}': {reason}", path.display())]
    TextExtraction { path: PathBuf, reason: String },

    /// Error while walking the pages of a PDF
    #[error("PDF processing error{}: {message}", page.map(|p| format!(" on page {p}")).unwrap_or_default())]
    PdfProcessing {
        message: String,
        page: Option<usize>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration file could not be parsed or failed validation
    #[error("Invalid configuration '{}': {reason}", path.display())]
    Config { path: PathBuf, reason: String },

    /// Invalid parameters
    #[error("Invalid input for '{parameter}': {reason}")]
    InvalidInput { parameter: String, reason: String },

    /// CSV serialization failed
    #[error("CSV error for '{}': {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Map page could not be assembled
    #[error("Map rendering failed: {message}")]
    Render { message: String },
}

impl MapperError {
    /// Wraps an IO error with the path it concerns.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns true when the error means the input file does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

impl From<toml::de::Error> for MapperError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config {
            path: PathBuf::from("<inline>"),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for MapperError {
    fn from(err: serde_json::Error) -> Self {
        Self::Render {
            message: format!("marker serialization failed: {err}"),
        }
    }
}

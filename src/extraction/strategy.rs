//! Text source trait and extraction result types.
//!
//! This module defines the seam between PDF text backends and the
//! pattern-matching pipeline, plus the statistics reported per document.

use crate::domain::BusStop;
use crate::error::{MapperError, MapperResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// How stops are located in the document text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMode {
    /// Split by service-line sections and keep only active ones
    #[default]
    Sections,

    /// Scan every line of every page, ignoring sections
    Lines,
}

impl fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sections => write!(f, "sections"),
            Self::Lines => write!(f, "lines"),
        }
    }
}

impl std::str::FromStr for ExtractionMode {
    type Err = MapperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sections" | "section" => Ok(Self::Sections),
            "lines" | "line" => Ok(Self::Lines),
            other => Err(MapperError::InvalidInput {
                parameter: "mode".to_string(),
                reason: format!("unknown extraction mode '{other}' (expected sections or lines)"),
            }),
        }
    }
}

/// Statistics and stops produced for one document.
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    /// Deduplicated stops in document order
    pub stops: Vec<BusStop>,

    /// Pages of text received from the backend
    pub pages: usize,

    /// Sections found (section mode only)
    pub sections_total: usize,

    /// Sections flagged `Ativo: Sim`
    pub sections_active: usize,

    /// Coordinate-like pairs seen in scanned text
    pub raw_matches: usize,

    /// Pairs rejected by the bounding box
    pub out_of_bounds: usize,

    /// Stops dropped as coordinate duplicates
    pub duplicates_removed: usize,
}

impl ExtractionReport {
    /// Creates a report for a document that yielded nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn sections_inactive(&self) -> usize {
        self.sections_total - self.sections_active
    }

    /// Returns true if any stop was recovered.
    pub fn has_stops(&self) -> bool {
        !self.stops.is_empty()
    }
}

/// Source of per-page text for a PDF document.
///
/// Implementations wrap a PDF-to-text library; the pipeline never looks
/// at PDF structure itself.
pub trait TextSource: Send + Sync {
    /// Extracts the text of every page, in page order.
    fn extract_pages(&self, input: &Path) -> MapperResult<Vec<String>>;

    /// Returns a human-readable name for this backend.
    fn name(&self) -> &str;
}

//! Stop extraction from operator PDF reports.
//!
//! This module pairs a [`TextSource`] backend with one of the text
//! scanning modes, giving a single entry point per document.

pub mod backends;
pub mod document;
pub mod inspect;
pub mod lines;
pub mod sections;
pub mod strategy;

pub use backends::{LopdfSource, PdfExtractSource, TextBackend};
pub use document::DocumentText;
pub use inspect::{inspect, PageInspection, PatternHits};
pub use strategy::{ExtractionMode, ExtractionReport, TextSource};

use crate::domain::BoundingBox;
use crate::error::{MapperError, MapperResult};
use std::path::Path;
use tracing::{debug, info, warn};

/// Extraction service coordinating a text backend and a scanning mode.
pub struct ExtractionService {
    source: Box<dyn TextSource>,
    mode: ExtractionMode,
    bounds: BoundingBox,
}

impl ExtractionService {
    /// Creates a new extraction service with the specified backend.
    pub fn new(source: Box<dyn TextSource>, mode: ExtractionMode, bounds: BoundingBox) -> Self {
        Self {
            source,
            mode,
            bounds,
        }
    }

    /// Creates a service with the `pdf-extract` backend, section mode and Maceió bounds.
    pub fn with_default_backend() -> Self {
        Self::new(
            Box::new(PdfExtractSource::new()),
            ExtractionMode::default(),
            BoundingBox::default(),
        )
    }

    pub fn mode(&self) -> ExtractionMode {
        self.mode
    }

    pub fn backend_name(&self) -> &str {
        self.source.name()
    }

    /// Extracts the stops of one operator's report.
    ///
    /// A document without any text yields an empty report rather than an
    /// error, since scanned PDFs are a layout problem, not a failure.
    pub fn extract(&self, input: &Path, operator: &str) -> MapperResult<ExtractionReport> {
        if !input.exists() {
            return Err(MapperError::io(
                input,
                std::io::Error::new(std::io::ErrorKind::NotFound, "Input file does not exist"),
            ));
        }

        let pages = self.source.extract_pages(input)?;
        let document = DocumentText::from_pages(&pages);
        debug!(
            backend = self.source.name(),
            pages = document.page_count(),
            "text extracted"
        );

        if document.is_blank() {
            warn!(path = %input.display(), "no text found in PDF");
            return Ok(ExtractionReport {
                pages: document.page_count(),
                ..ExtractionReport::empty()
            });
        }

        Ok(self.extract_from_text(&document, operator))
    }

    /// Runs the configured scanning mode over already extracted text.
    pub fn extract_from_text(&self, document: &DocumentText, operator: &str) -> ExtractionReport {
        let report = match self.mode {
            ExtractionMode::Sections => {
                sections::extract_sections(document, operator, &self.bounds)
            }
            ExtractionMode::Lines => lines::extract_lines(document, operator, &self.bounds),
        };

        if self.mode == ExtractionMode::Sections {
            info!(
                operator,
                total = report.sections_total,
                active = report.sections_active,
                inactive = report.sections_inactive(),
                "sections analysed"
            );
        }
        info!(
            operator,
            stops = report.stops.len(),
            out_of_bounds = report.out_of_bounds,
            duplicates = report.duplicates_removed,
            "stops extracted"
        );

        report
    }

    /// Extracts the raw page texts of a PDF for debugging.
    pub fn extract_pages(&self, input: &Path) -> MapperResult<Vec<String>> {
        self.source.extract_pages(input)
    }

    /// Extracts text from a PDF for analysis, pages separated by form feeds.
    pub fn extract_text(&self, input: &Path) -> MapperResult<String> {
        Ok(self.extract_pages(input)?.join("\x0c"))
    }
}

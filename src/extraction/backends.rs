//! PDF text backends.
//!
//! Both backends read the file into memory and hand it to a third-party
//! PDF library. `pdf-extract` gives the best reading order for the
//! operators' tabular reports; `lopdf` is kept as a fallback for files
//! that `pdf-extract` cannot decode.

use super::strategy::TextSource;
use crate::error::{MapperError, MapperResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

/// Selects which library turns PDF pages into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextBackend {
    #[default]
    #[serde(rename = "pdf-extract")]
    PdfExtract,

    #[serde(rename = "lopdf")]
    Lopdf,
}

impl TextBackend {
    /// Instantiates the selected backend.
    pub fn source(self) -> Box<dyn TextSource> {
        match self {
            Self::PdfExtract => Box::new(PdfExtractSource::new()),
            Self::Lopdf => Box::new(LopdfSource::new()),
        }
    }
}

impl fmt::Display for TextBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PdfExtract => write!(f, "pdf-extract"),
            Self::Lopdf => write!(f, "lopdf"),
        }
    }
}

impl std::str::FromStr for TextBackend {
    type Err = MapperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pdf-extract" | "pdf_extract" | "pdfextract" => Ok(Self::PdfExtract),
            "lopdf" => Ok(Self::Lopdf),
            other => Err(MapperError::InvalidInput {
                parameter: "backend".to_string(),
                reason: format!("unknown text backend '{other}' (expected pdf-extract or lopdf)"),
            }),
        }
    }
}

fn read_input(input: &Path) -> MapperResult<Vec<u8>> {
    std::fs::read(input).map_err(|e| MapperError::io(input, e))
}

fn panic_reason(payload: Box<dyn std::any::Any + Send>) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "backend panicked".to_string())
}

/// Text source backed by the `pdf-extract` crate.
#[derive(Debug, Clone, Default)]
pub struct PdfExtractSource;

impl PdfExtractSource {
    pub fn new() -> Self {
        Self
    }
}

impl TextSource for PdfExtractSource {
    fn extract_pages(&self, input: &Path) -> MapperResult<Vec<String>> {
        let bytes = read_input(input)?;

        // pdf-extract panics on some malformed font programs.
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(&bytes)
        }));

        match result {
            Ok(Ok(pages)) => Ok(pages),
            Ok(Err(e)) => Err(MapperError::TextExtraction {
                path: input.to_path_buf(),
                reason: e.to_string(),
            }),
            Err(payload) => Err(MapperError::TextExtraction {
                path: input.to_path_buf(),
                reason: panic_reason(payload),
            }),
        }
    }

    fn name(&self) -> &str {
        "pdf-extract"
    }
}

/// Text source backed by `lopdf`'s per-page text extraction.
#[derive(Debug, Clone, Default)]
pub struct LopdfSource;

impl LopdfSource {
    pub fn new() -> Self {
        Self
    }
}

impl TextSource for LopdfSource {
    fn extract_pages(&self, input: &Path) -> MapperResult<Vec<String>> {
        let bytes = read_input(input)?;

        let doc = lopdf::Document::load_mem(&bytes).map_err(|e| MapperError::TextExtraction {
            path: input.to_path_buf(),
            reason: e.to_string(),
        })?;

        doc.get_pages()
            .keys()
            .map(|&page_number| {
                doc.extract_text(&[page_number])
                    .map_err(|e| MapperError::PdfProcessing {
                        message: format!("text extraction failed: {e}"),
                        page: Some(page_number as usize),
                        source: None,
                    })
            })
            .collect()
    }

    fn name(&self) -> &str {
        "lopdf"
    }
}

//! Bus-stop extraction from transit operator PDF reports.
//!
//! This library reads the stop listings that operators publish as PDF
//! reports, recovers coordinate pairs, point codes and addresses with
//! regular-expression heuristics, and writes CSV files plus interactive
//! Leaflet maps per operator and for all operators together.
//!
//! # Features
//!
//! - **Section Mode**: Only stops inside sections flagged `Ativo: Sim`
//! - **Line Mode**: Every coordinate pair on every page, with real page numbers
//! - **Bounding Box**: Coordinates outside the service area are rejected
//! - **Deduplication**: Repeated coordinate pairs are kept once
//! - **Maps**: One page per operator and a consolidated page with toggleable layers
//!
//! # Architecture
//!
//! - [`domain`]: Pattern matching for coordinates, codes, addresses and sections
//! - [`extraction`]: PDF text backends and the scanning modes
//! - [`render`]: Leaflet map pages
//! - [`output`]: CSV and HTML files
//! - [`batch`]: Per-operator orchestration
//! - [`config`]: TOML configuration
//! - [`error`]: Error handling
//!
//! # Quick Start
//!
//! ```no_run
//! use stopmap::{BatchRunner, Config};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let runner = BatchRunner::new(Config::default());
//! let summary = runner.run()?;
//!
//! for file in &summary.files {
//!     println!("{file}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Examples
//!
//! ## Extract a Single Report
//!
//! ```no_run
//! use stopmap::ExtractionService;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let service = ExtractionService::with_default_backend();
//! let report = service.extract(Path::new("pontos_real.pdf"), "Real")?;
//! println!("{} stops in {} active sections", report.stops.len(), report.sections_active);
//! # Ok(())
//! # }
//! ```
//!
//! ## Pattern Matching
//!
//! ```
//! use stopmap::domain::{BoundingBox, CoordinateMatcher};
//!
//! let matcher = CoordinateMatcher::new();
//! let text = "PN987 Rua do Comercio -9,6650 -35,7350\nPP2 Recife -8,0500 -34,9000";
//! let (inside, rejected) = matcher.find_within(text, &BoundingBox::MACEIO);
//! assert_eq!(inside.len(), 1);
//! assert_eq!(rejected, 1);
//! ```

// Public API
pub mod batch;
pub mod config;
pub mod domain;
pub mod error;
pub mod extraction;
pub mod output;
pub mod render;

// Re-exports for convenient access
pub use batch::{BatchRunner, BatchSummary, OperatorOutcome, OperatorStatus};
pub use config::{Config, OperatorConfig};
pub use domain::{BoundingBox, BusStop, Coordinate};
pub use error::{MapperError, MapperResult};
pub use extraction::{
    ExtractionMode, ExtractionReport, ExtractionService, TextBackend, TextSource,
};
pub use output::GeneratedFile;
pub use render::MapStyle;

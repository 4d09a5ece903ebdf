//! Batch orchestration: every configured operator, then the combined map.
//!
//! Failures are contained per operator. A missing report or a PDF the
//! backend cannot read is logged and skipped, and the run carries on with
//! the next operator.

use std::fs;

use tracing::{error, info, warn};

use crate::config::{Config, OperatorConfig};
use crate::domain::BusStop;
use crate::error::{MapperError, MapperResult};
use crate::extraction::{ExtractionReport, ExtractionService};
use crate::output::{self, GeneratedFile, CONSOLIDATED_NAME};
use crate::render::{self, OperatorLayer};

/// What happened to one operator during a run.
#[derive(Debug, Clone, PartialEq)]
pub enum OperatorStatus {
    /// CSV and map written
    Mapped { stops: usize },
    /// Report read but no stop survived validation
    NoStops,
    /// Report file not found
    MissingPdf,
    /// Extraction or output failed
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct OperatorOutcome {
    pub operator: String,
    pub status: OperatorStatus,
}

/// Result of a whole run.
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    pub operators: Vec<OperatorOutcome>,
    /// Files written, in creation order
    pub files: Vec<GeneratedFile>,
    pub total_stops: usize,
}

impl BatchSummary {
    /// Operators that produced a map.
    pub fn mapped(&self) -> usize {
        self.operators
            .iter()
            .filter(|o| matches!(o.status, OperatorStatus::Mapped { .. }))
            .count()
    }
}

/// Runs extraction and output for every operator of a configuration.
pub struct BatchRunner {
    config: Config,
    service: ExtractionService,
}

impl BatchRunner {
    /// Creates a runner using the backend, mode and bounds of `config`.
    pub fn new(config: Config) -> Self {
        let service = ExtractionService::new(
            config.text_backend.source(),
            config.mode,
            config.bounds,
        );
        Self { config, service }
    }

    /// Creates a runner with an explicit extraction service.
    pub fn with_service(config: Config, service: ExtractionService) -> Self {
        Self { config, service }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Processes all operators and writes the consolidated outputs.
    ///
    /// An invalid configuration, a failure to prepare the output
    /// directory or to write the consolidated files aborts the run.
    pub fn run(&self) -> MapperResult<BatchSummary> {
        self.config.validate()?;

        let out_dir = &self.config.output_dir;
        fs::create_dir_all(out_dir).map_err(|e| MapperError::io(out_dir, e))?;

        let mut summary = BatchSummary::default();
        let mut collected: Vec<(&OperatorConfig, Vec<BusStop>)> = Vec::new();

        for operator in &self.config.operators {
            let status = match self.process_operator(operator, &mut summary.files) {
                Ok(Some(report)) => {
                    let stops = report.stops.len();
                    collected.push((operator, report.stops));
                    OperatorStatus::Mapped { stops }
                }
                Ok(None) => OperatorStatus::NoStops,
                Err(e) if e.is_not_found() => {
                    warn!(
                        operator = %operator.name,
                        path = %operator.pdf.display(),
                        "report not found, skipping"
                    );
                    OperatorStatus::MissingPdf
                }
                Err(e) => {
                    error!(operator = %operator.name, error = %e, "processing failed");
                    OperatorStatus::Failed {
                        reason: e.to_string(),
                    }
                }
            };
            summary.operators.push(OperatorOutcome {
                operator: operator.name.clone(),
                status,
            });
        }

        summary.total_stops = collected.iter().map(|(_, stops)| stops.len()).sum();
        if summary.total_stops == 0 {
            warn!("no stops extracted from any operator");
            return Ok(summary);
        }

        let all_stops: Vec<BusStop> = collected
            .iter()
            .flat_map(|(_, stops)| stops.iter().cloned())
            .collect();
        let csv = output::csv_path(out_dir, CONSOLIDATED_NAME);
        output::write_csv(&csv, &all_stops)?;
        summary.files.push(GeneratedFile::from_path(&csv)?);

        let layers: Vec<OperatorLayer<'_>> = collected
            .iter()
            .map(|(operator, stops)| OperatorLayer {
                name: &operator.name,
                color: operator.color(),
                stops,
            })
            .collect();
        if let Some(html) = render::render_consolidated_map(&layers, &self.config.map)? {
            let map = output::map_path(out_dir, CONSOLIDATED_NAME);
            output::write_html(&map, &html)?;
            summary.files.push(GeneratedFile::from_path(&map)?);
        }

        info!(
            operators = summary.mapped(),
            stops = summary.total_stops,
            "consolidated map written"
        );
        Ok(summary)
    }

    /// Extracts one operator and writes its CSV and map.
    ///
    /// Returns `Ok(None)` when the report yields no stops.
    fn process_operator(
        &self,
        operator: &OperatorConfig,
        files: &mut Vec<GeneratedFile>,
    ) -> MapperResult<Option<ExtractionReport>> {
        info!(operator = %operator.name, path = %operator.pdf.display(), "processing operator");

        let report = self.service.extract(&operator.pdf, &operator.name)?;
        if !report.has_stops() {
            warn!(operator = %operator.name, "no valid stops found");
            return Ok(None);
        }

        let out_dir = &self.config.output_dir;
        let csv = output::csv_path(out_dir, &operator.name);
        output::write_csv(&csv, &report.stops)?;
        files.push(GeneratedFile::from_path(&csv)?);

        let layer = OperatorLayer {
            name: &operator.name,
            color: operator.color(),
            stops: &report.stops,
        };
        if let Some(html) = render::render_operator_map(&layer, &self.config.map)? {
            let map = output::map_path(out_dir, &operator.name);
            output::write_html(&map, &html)?;
            files.push(GeneratedFile::from_path(&map)?);
        }

        info!(
            operator = %operator.name,
            stops = report.stops.len(),
            "operator outputs written"
        );
        Ok(Some(report))
    }
}

//! End-to-end tests for extraction, output files and batch runs.
//!
//! Most tests feed report text through an in-memory text source so the
//! expectations do not depend on a PDF library's layout decisions. The
//! PDF round-trip tests only check properties that hold for any faithful
//! text extraction.

use anyhow::Result;
use std::collections::HashMap;
use std::path::Path;
use stopmap::domain::code::UNKNOWN_CODE;
use stopmap::extraction::lines::extract_lines;
use stopmap::extraction::sections::extract_sections;
use stopmap::{
    BatchRunner, BoundingBox, Config, ExtractionMode, ExtractionService, MapperError,
    MapperResult, OperatorConfig, OperatorStatus, TextBackend, TextSource,
};
use tempfile::TempDir;

mod common;
use common::*;

const SAMPLE_REPORT: &[&str] = &[REPORT_PAGE_1, REPORT_PAGE_2];

/// Text source serving fixed pages per file name.
struct InMemorySource(HashMap<String, Vec<String>>);

impl InMemorySource {
    fn with(files: &[(&str, &[&str])]) -> Self {
        Self(
            files
                .iter()
                .map(|(name, pages)| {
                    (
                        name.to_string(),
                        pages.iter().map(|p| p.to_string()).collect(),
                    )
                })
                .collect(),
        )
    }
}

impl TextSource for InMemorySource {
    fn extract_pages(&self, input: &Path) -> MapperResult<Vec<String>> {
        let name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.0
            .get(&name)
            .cloned()
            .ok_or_else(|| MapperError::TextExtraction {
                path: input.to_path_buf(),
                reason: "no text registered".to_string(),
            })
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}

mod section_mode {
    use super::*;

    #[test]
    fn test_only_active_sections_contribute() {
        let report = extract_sections(&sample_document(), "Real", &BoundingBox::MACEIO);

        assert_eq!(report.pages, 2);
        assert_eq!(report.sections_total, 3);
        assert_eq!(report.sections_active, 2);
        assert_eq!(report.sections_inactive(), 1);
        assert_eq!(codes(&report.stops), vec!["PN987", "PN988", "PP52"]);
        assert!(!codes(&report.stops).contains(&"PN990"));
    }

    #[test]
    fn test_rejections_and_duplicates_are_counted() {
        let report = extract_sections(&sample_document(), "Real", &BoundingBox::MACEIO);

        assert_eq!(report.raw_matches, 5);
        assert_eq!(report.out_of_bounds, 1);
        assert_eq!(report.duplicates_removed, 1);
        assert_within(&report.stops, &BoundingBox::MACEIO);
    }

    #[test]
    fn test_stop_details() {
        let report = extract_sections(&sample_document(), "Real", &BoundingBox::MACEIO);

        let first = &report.stops[0];
        assert_eq!(first.operator, "Real");
        assert_eq!(first.latitude, -9.665);
        assert_eq!(first.longitude, -35.712);
        assert_eq!(first.address, "PN987 Av. Alvaro Otacilio, 3500");
        assert_eq!(first.page, 1);
        assert_eq!(first.section, Some(1));

        let last = &report.stops[2];
        assert_eq!(last.code, "PP52");
        assert_eq!(last.page, 2);
        assert_eq!(last.section, Some(3));
    }

    #[test]
    fn test_wider_bounds_keep_distant_stop() {
        let bounds = BoundingBox {
            lat_min: -10.0,
            ..BoundingBox::MACEIO
        };
        let report = extract_sections(&sample_document(), "Real", &bounds);

        assert_eq!(report.out_of_bounds, 0);
        assert_eq!(report.stops.len(), 4);
        // No code anywhere on its line: falls back to the one above it
        assert_eq!(report.stops[3].code, "PN987");
    }
}

mod line_mode {
    use super::*;

    #[test]
    fn test_all_lines_are_scanned() {
        let report = extract_lines(&sample_document(), "Real", &BoundingBox::MACEIO);

        assert_eq!(report.sections_total, 0);
        assert_eq!(codes(&report.stops), vec!["PN987", "PN988", "PN990", "PP52"]);
        assert!(report.stops.iter().all(|s| s.section.is_none()));
        assert_eq!(report.stops[3].page, 2);
        assert_eq!(report.duplicates_removed, 1);
    }

    #[test]
    fn test_address_is_whole_line() {
        let report = extract_lines(&sample_document(), "Real", &BoundingBox::MACEIO);
        assert_eq!(
            report.stops[1].address,
            "PN988 Rua Jangadeiros Alagoanos -9,6612 -35,7080"
        );
    }

    #[test]
    fn test_dotted_pair_after_distance() {
        let document = stopmap::extraction::DocumentText::from_pages([
            "PN987 Rua X km 1,5 -9.6650 -35.7120",
        ]);
        let report = extract_lines(&document, "Real", &BoundingBox::MACEIO);

        assert_eq!(report.stops.len(), 1);
        assert_eq!(report.stops[0].code, "PN987");
        assert_eq!(report.stops[0].latitude, -9.665);
        assert_eq!(report.stops[0].longitude, -35.712);
        assert_eq!(report.out_of_bounds, 1);
    }

    #[test]
    fn test_unknown_code_placeholder() {
        let document =
            stopmap::extraction::DocumentText::from_pages(["sem codigo\n-9,6000 -35,7000"]);
        let report = extract_lines(&document, "Real", &BoundingBox::MACEIO);
        assert_eq!(codes(&report.stops), vec![UNKNOWN_CODE]);
    }
}

mod service {
    use super::*;

    fn service(mode: ExtractionMode) -> ExtractionService {
        ExtractionService::new(
            Box::new(InMemorySource::with(&[("real.pdf", SAMPLE_REPORT)])),
            mode,
            BoundingBox::MACEIO,
        )
    }

    #[test]
    fn test_extract_with_injected_source() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let input = temp_dir.path().join("real.pdf");
        std::fs::write(&input, b"%PDF-1.4")?;

        let sections = service(ExtractionMode::Sections).extract(&input, "Real")?;
        let lines = service(ExtractionMode::Lines).extract(&input, "Real")?;

        assert_eq!(sections.stops.len(), 3);
        assert_eq!(lines.stops.len(), 4);
        Ok(())
    }

    #[test]
    fn test_source_errors_propagate() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let input = temp_dir.path().join("other.pdf");
        std::fs::write(&input, b"%PDF-1.4")?;

        let err = service(ExtractionMode::Sections)
            .extract(&input, "Real")
            .unwrap_err();
        assert!(matches!(err, MapperError::TextExtraction { .. }));
        Ok(())
    }
}

mod pdf_round_trip {
    use super::*;

    #[test]
    fn test_generated_report_extracts_known_stops() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let pdf = create_sample_report(&temp_dir.path().join("report.pdf"))?;

        let report = ExtractionService::with_default_backend().extract(&pdf, "Real")?;

        assert!(report.stops.len() <= 3);
        assert_within(&report.stops, &BoundingBox::MACEIO);
        for code in codes(&report.stops) {
            assert!(
                ["PN987", "PN988", "PP52"].iter().any(|c| code.contains(c))
                    || code.starts_with("Ponto_"),
                "unexpected code {code}"
            );
        }
        Ok(())
    }

    #[test]
    fn test_lopdf_backend_does_not_panic() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let pdf = create_sample_report(&temp_dir.path().join("report.pdf"))?;

        let service = ExtractionService::new(
            TextBackend::Lopdf.source(),
            ExtractionMode::Lines,
            BoundingBox::MACEIO,
        );
        if let Ok(report) = service.extract(&pdf, "Real") {
            assert_within(&report.stops, &BoundingBox::MACEIO);
        }
        Ok(())
    }

    #[test]
    fn test_garbage_file_is_an_error() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let input = temp_dir.path().join("garbage.pdf");
        std::fs::write(&input, b"this is not a PDF")?;

        let result = ExtractionService::with_default_backend().extract(&input, "Real");
        assert!(result.is_err());
        Ok(())
    }
}

mod batch {
    use super::*;

    fn runner(temp_dir: &TempDir) -> (Config, BatchRunner) {
        let second: &[&str] = &["Linha: 010\nAtivo: Sim\nPN5 Rua do Sol -9,6000 -35,7500"];
        let source = InMemorySource::with(&[
            ("real.pdf", SAMPLE_REPORT),
            ("sao.pdf", second),
        ]);

        let mut operators = Vec::new();
        for (name, file, color) in [
            ("Real", "real.pdf", Some("#FF0000")),
            ("SaoFrancisco", "sao.pdf", Some("#0000FF")),
            ("CidadeMaceio", "maceio.pdf", Some("#FFFF00")),
        ] {
            let path = temp_dir.path().join(file);
            if file != "maceio.pdf" {
                std::fs::write(&path, b"%PDF-1.4").unwrap();
            }
            operators.push(OperatorConfig::new(name, path, color));
        }

        let config = Config {
            output_dir: temp_dir.path().join("maps"),
            operators,
            ..Config::default()
        };
        let service =
            ExtractionService::new(Box::new(source), config.mode, config.bounds);
        (config.clone(), BatchRunner::with_service(config, service))
    }

    #[test]
    fn test_batch_outputs() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let (config, runner) = runner(&temp_dir);
        let summary = runner.run()?;

        assert_eq!(summary.total_stops, 4);
        assert_eq!(summary.mapped(), 2);
        assert_eq!(summary.operators[2].status, OperatorStatus::MissingPdf);
        assert_eq!(summary.files.len(), 6);

        let out = &config.output_dir;
        assert_map_markers(&out.join("map_Real.html"), 3);
        assert_map_markers(&out.join("map_SaoFrancisco.html"), 1);
        assert_map_markers(&out.join("map_all_operators.html"), 4);
        assert!(!out.join("map_CidadeMaceio.html").exists());
        Ok(())
    }

    #[test]
    fn test_csv_contents() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let (config, runner) = runner(&temp_dir);
        runner.run()?;

        let rows = read_csv_rows(&config.output_dir.join("stops_Real.csv"));
        assert_eq!(
            rows[0],
            vec!["operator", "code", "address", "latitude", "longitude", "page", "section"]
        );
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[1][1], "PN987");
        assert_eq!(rows[1][2], "PN987 Av. Alvaro Otacilio, 3500");
        assert_eq!(rows[3][5], "2");

        let all = read_csv_rows(&config.output_dir.join("stops_all_operators.csv"));
        assert_eq!(all.len(), 5);
        assert_eq!(all[4][0], "SaoFrancisco");
        Ok(())
    }

    #[test]
    fn test_colliding_file_names_are_rejected() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let (mut config, _) = runner(&temp_dir);
        config.operators[1].name = "Real!".to_string();
        config.operators[0].name = "Real?".to_string();

        let err = BatchRunner::new(config.clone()).run().unwrap_err();
        assert!(err.to_string().contains("Real_"));
        assert!(!config.output_dir.exists());
        Ok(())
    }

    #[test]
    fn test_consolidated_legend_lists_operators() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let (config, runner) = runner(&temp_dir);
        runner.run()?;

        let html = std::fs::read_to_string(config.output_dir.join("map_all_operators.html"))?;
        assert!(html.contains("<b>Total points:</b> 4"));
        assert!(html.contains(">SaoFrancisco<"));
        assert!(!html.contains("CidadeMaceio"));
        Ok(())
    }
}

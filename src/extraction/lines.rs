//! Line-mode extraction: every coordinate on every line, no section filter.
//!
//! Useful for reports that do not carry `Linha:`/`Ativo:` markers.

use super::document::DocumentText;
use super::strategy::ExtractionReport;
use crate::domain::address::{truncate_chars, MAX_ADDRESS_CHARS};
use crate::domain::{
    dedup_by_coordinates, BoundingBox, BusStop, CoordinateMatcher, StopCodeMatcher,
};

/// Extracts stops line by line, keeping the real page number of each.
pub fn extract_lines(
    document: &DocumentText,
    operator: &str,
    bounds: &BoundingBox,
) -> ExtractionReport {
    let coordinates = CoordinateMatcher::new();
    let codes = StopCodeMatcher::new();

    let mut report = ExtractionReport {
        pages: document.page_count(),
        ..Default::default()
    };
    let mut stops = Vec::new();

    for (page, text) in document.pages() {
        let lines: Vec<&str> = text.lines().collect();

        for (idx, raw_line) in lines.iter().enumerate() {
            let line = raw_line.trim();
            let (found, rejected) = coordinates.find_within(line, bounds);
            report.raw_matches += found.len() + rejected;
            report.out_of_bounds += rejected;

            let previous = idx.checked_sub(1).map(|i| lines[i]);
            for m in found {
                stops.push(BusStop {
                    operator: operator.to_string(),
                    code: codes.resolve_in_lines(line, previous),
                    address: truncate_chars(line, MAX_ADDRESS_CHARS),
                    latitude: m.coordinate.latitude,
                    longitude: m.coordinate.longitude,
                    page,
                    section: None,
                });
            }
        }
    }

    let before = stops.len();
    report.stops = dedup_by_coordinates(stops);
    report.duplicates_removed = before - report.stops.len();
    report
}

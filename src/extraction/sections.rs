//! Section-mode extraction: only stops listed under active sections.

use super::document::DocumentText;
use super::strategy::ExtractionReport;
use crate::domain::{
    dedup_by_coordinates, is_active, split_sections, AddressExtractor, BoundingBox, BusStop,
    CoordinateMatcher, StopCodeMatcher,
};
use tracing::debug;

/// Extracts stops from every section flagged `Ativo: Sim`.
pub fn extract_sections(
    document: &DocumentText,
    operator: &str,
    bounds: &BoundingBox,
) -> ExtractionReport {
    let coordinates = CoordinateMatcher::new();
    let codes = StopCodeMatcher::new();
    let addresses = AddressExtractor::new();

    let sections = split_sections(document.text());
    let mut report = ExtractionReport {
        pages: document.page_count(),
        sections_total: sections.len(),
        ..Default::default()
    };
    let mut stops = Vec::new();

    for section in &sections {
        if !is_active(section.text) {
            debug!(section = section.index, "inactive section skipped");
            continue;
        }
        report.sections_active += 1;

        let (found, rejected) = coordinates.find_within(section.text, bounds);
        report.raw_matches += found.len() + rejected;
        report.out_of_bounds += rejected;

        if found.is_empty() {
            debug!(section = section.index, "active section without valid points");
            continue;
        }
        debug!(section = section.index, points = found.len(), "active section");

        stops.extend(found.into_iter().map(|m| BusStop {
            operator: operator.to_string(),
            code: codes.resolve(section.text, m.start, &m.coordinate),
            address: addresses.before(section.text, m.start),
            latitude: m.coordinate.latitude,
            longitude: m.coordinate.longitude,
            page: document.page_at(section.offset + m.start),
            section: Some(section.index),
        }));
    }

    let before = stops.len();
    report.stops = dedup_by_coordinates(stops);
    report.duplicates_removed = before - report.stops.len();
    report
}

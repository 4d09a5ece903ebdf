//! Custom assertions for generated outputs.
//!
//! Provides domain-specific assertions that make tests more readable
//! and provide better error messages.

use std::path::Path;
use stopmap::domain::BoundingBox;
use stopmap::BusStop;

/// Reads a generated CSV file, checking and removing the UTF-8 BOM.
///
/// # Panics
/// Panics if the file is missing or does not start with a BOM.
pub fn read_csv_rows(path: &Path) -> Vec<Vec<String>> {
    let bytes = std::fs::read(path)
        .unwrap_or_else(|e| panic!("CSV should exist at '{}': {}", path.display(), e));
    assert!(
        bytes.starts_with(b"\xEF\xBB\xBF"),
        "CSV at '{}' should start with a UTF-8 BOM",
        path.display()
    );

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(&bytes[3..]);
    reader
        .records()
        .map(|r| {
            r.expect("Valid CSV record")
                .iter()
                .map(str::to_string)
                .collect()
        })
        .collect()
}

/// Asserts that a map page exists and draws `markers` stops.
///
/// # Panics
/// Panics if the page is missing or the marker count differs.
pub fn assert_map_markers(path: &Path, markers: usize) {
    let html = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Map should exist at '{}': {}", path.display(), e));
    assert!(
        html.contains("leaflet"),
        "Map at '{}' should load Leaflet",
        path.display()
    );

    let found = html.matches("\"fill_color\"").count();
    assert_eq!(
        found,
        markers,
        "Map at '{}' should have {} marker(s), found {}",
        path.display(),
        markers,
        found
    );
}

/// Asserts that every stop lies inside the bounding box.
///
/// # Panics
/// Panics on the first stop outside the box.
pub fn assert_within(stops: &[BusStop], bounds: &BoundingBox) {
    for stop in stops {
        assert!(
            bounds.contains(&stop.coordinate()),
            "Stop {} at ({}, {}) lies outside {:?}",
            stop.code,
            stop.latitude,
            stop.longitude,
            bounds
        );
    }
}

/// Returns the codes of the stops, in order.
pub fn codes(stops: &[BusStop]) -> Vec<&str> {
    stops.iter().map(|s| s.code.as_str()).collect()
}

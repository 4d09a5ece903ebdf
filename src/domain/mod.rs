//! Domain models and business logic for recovering bus stops from text.
//!
//! This module contains the pattern-matching rules applied to the text of
//! operator reports: coordinate pairs, point codes, addresses, and the
//! section markers that delimit each line's stop listing.

pub mod address;
pub mod code;
pub mod coordinates;
pub mod section;
pub mod stop;

pub use address::AddressExtractor;
pub use code::StopCodeMatcher;
pub use coordinates::{BoundingBox, Coordinate, CoordinateMatch, CoordinateMatcher};
pub use section::{is_active, split_sections, Section};
pub use stop::{dedup_by_coordinates, BusStop};

/// Returns the line containing byte offset `pos`, and the offset where it starts.
pub(crate) fn line_around(text: &str, pos: usize) -> (&str, usize) {
    let pos = pos.min(text.len());
    let start = text[..pos].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let end = text[pos..].find('\n').map(|i| pos + i).unwrap_or(text.len());
    (&text[start..end], start)
}

/// Returns the line preceding the one that starts at `line_start`, if any.
pub(crate) fn previous_line(text: &str, line_start: usize) -> Option<&str> {
    if line_start == 0 {
        return None;
    }
    let (line, _) = line_around(text, line_start - 1);
    Some(line)
}

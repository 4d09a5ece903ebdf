//! Point code recognition (`PN987`, `PP52`, `PONTO 123`, ...).

use super::coordinates::Coordinate;
use super::{line_around, previous_line};
use once_cell::sync::Lazy;
use regex::Regex;

/// Placeholder used in line mode when no code can be found near a stop.
pub const UNKNOWN_CODE: &str = "DESCONHECIDO";

/// Matcher for stop identifiers printed next to coordinates.
///
/// Patterns are tried in order; the first that matches anywhere in the
/// searched text wins:
/// 1. two or more capitals followed by digits (`PN987`, `BR6`)
/// 2. `PONTO` + digits, with optional space
/// 3. `PP` + digits, with optional space
/// 4. `PN` + digits, with optional space
#[derive(Debug, Clone, Default)]
pub struct StopCodeMatcher;

impl StopCodeMatcher {
    pub fn new() -> Self {
        Self
    }

    fn patterns() -> &'static [Regex] {
        static PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
            [r"[A-Z]{2,}\d+", r"PONTO\s*\d+", r"PP\s*\d+", r"PN\s*\d+"]
                .iter()
                .map(|p| Regex::new(p).expect("Valid code regex"))
                .collect()
        });
        &PATTERNS
    }

    fn compact(code: &str) -> String {
        code.chars().filter(|c| !c.is_whitespace()).collect()
    }

    /// Returns the first code found in `text`, with whitespace removed.
    pub fn find_in(&self, text: &str) -> Option<String> {
        Self::patterns()
            .iter()
            .find_map(|re| re.find(text))
            .map(|m| Self::compact(m.as_str()))
    }

    /// Returns the first compact code (`PN987`, `BR104`) in `text`.
    ///
    /// Spaced forms such as `PONTO 12` are not recognised.
    pub fn find_compact_in(&self, text: &str) -> Option<String> {
        Self::patterns()[0]
            .find(text)
            .map(|m| m.as_str().to_string())
    }

    /// Resolves the code for a coordinate found at `match_start` in `section`.
    ///
    /// Search order: the coordinate's line before the coordinate (leading
    /// code first), the whole line, the previous line, the whole section.
    /// Falls back to [`generated_code`].
    pub fn resolve(&self, section: &str, match_start: usize, coord: &Coordinate) -> String {
        let (line, line_start) = line_around(section, match_start);
        let prefix = &line[..match_start.saturating_sub(line_start).min(line.len())];

        self.find_in(prefix)
            .or_else(|| self.find_in(line))
            .or_else(|| previous_line(section, line_start).and_then(|l| self.find_in(l)))
            .or_else(|| self.find_in(section))
            .unwrap_or_else(|| generated_code(coord))
    }

    /// Line-oriented lookup: the line itself, then the previous line.
    ///
    /// Only compact codes count here, see [`Self::find_compact_in`].
    pub fn resolve_in_lines(&self, line: &str, previous: Option<&str>) -> String {
        self.find_compact_in(line)
            .or_else(|| previous.and_then(|l| self.find_compact_in(l)))
            .unwrap_or_else(|| UNKNOWN_CODE.to_string())
    }
}

/// Synthesizes a code from the coordinate, e.g. `Ponto_-95380_-357868`.
///
/// Scaled values are truncated toward zero.
pub fn generated_code(coord: &Coordinate) -> String {
    format!(
        "Ponto_{}_{}",
        (coord.latitude * 10000.0).trunc() as i64,
        (coord.longitude * 10000.0).trunc() as i64
    )
}

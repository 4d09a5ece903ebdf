//! Address recovery from the text printed before a coordinate pair.

use super::line_around;
use once_cell::sync::Lazy;
use regex::Regex;

/// Placeholder stored when no address text precedes a coordinate.
pub const UNKNOWN_ADDRESS: &str = "Endereço não identificado";

/// Maximum stored address length, in characters.
pub const MAX_ADDRESS_CHARS: usize = 100;

/// Extracts the street address that precedes a coordinate on its line.
#[derive(Debug, Clone, Default)]
pub struct AddressExtractor;

impl AddressExtractor {
    pub fn new() -> Self {
        Self
    }

    fn leading_noise() -> &'static Regex {
        static PATTERN: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"^[\d\s\-.]+").expect("Valid regex"));
        &PATTERN
    }

    /// Returns the address for a coordinate starting at byte `match_start`.
    ///
    /// Takes at most [`MAX_ADDRESS_CHARS`] characters of the same line
    /// right before the coordinate and strips a leading run of digits,
    /// whitespace, dashes and dots (row numbers, stray coordinates).
    pub fn before(&self, text: &str, match_start: usize) -> String {
        let (line, line_start) = line_around(text, match_start);
        let prefix = &line[..match_start.saturating_sub(line_start).min(line.len())];
        let context = last_chars(prefix, MAX_ADDRESS_CHARS).trim();
        let cleaned = Self::leading_noise().replace(context, "");

        if cleaned.is_empty() {
            UNKNOWN_ADDRESS.to_string()
        } else {
            truncate_chars(&cleaned, MAX_ADDRESS_CHARS)
        }
    }
}

/// Returns the first `max` characters of `s`.
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

fn last_chars(s: &str, max: usize) -> &str {
    let count = s.chars().count();
    if count <= max {
        return s;
    }
    let skip = s
        .char_indices()
        .nth(count - max)
        .map(|(i, _)| i)
        .unwrap_or(0);
    &s[skip..]
}

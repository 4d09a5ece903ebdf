//! Layout probe for new report formats.
//!
//! Shows the first lines of the first pages and how often the patterns
//! the extractor relies on occur, so a new operator's PDF can be checked
//! before running a batch.

use once_cell::sync::Lazy;
use regex::Regex;

/// Occurrences of one probe pattern on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternHits {
    pub label: &'static str,
    pub count: usize,
    /// First three matches, as printed
    pub examples: Vec<String>,
}

/// Probe result for a single page.
#[derive(Debug, Clone)]
pub struct PageInspection {
    pub page: usize,
    /// Numbered lines, 1-based
    pub lines: Vec<(usize, String)>,
    /// Total number of lines on the page
    pub total_lines: usize,
    /// Only patterns with at least one match
    pub hits: Vec<PatternHits>,
}

fn probes() -> &'static [(&'static str, Regex)] {
    static PROBES: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
        [
            ("coordinates", r"(-?\d{1,2}[,.]\d+)\s+(-?\d{1,2}[,.]\d+)"),
            ("point codes", r"[A-Z]{2}\d+"),
            ("table header", r"Endere[çc]o.*Latitude"),
        ]
        .into_iter()
        .map(|(label, pattern)| (label, Regex::new(pattern).expect("Valid probe regex")))
        .collect()
    });
    &PROBES
}

/// Inspects up to `max_pages` pages, listing up to `max_lines` lines of each.
pub fn inspect<S: AsRef<str>>(
    pages: &[S],
    max_pages: usize,
    max_lines: usize,
) -> Vec<PageInspection> {
    pages
        .iter()
        .take(max_pages)
        .enumerate()
        .map(|(idx, text)| {
            let text = text.as_ref();
            let all_lines: Vec<&str> = text.lines().collect();

            let hits = probes()
                .iter()
                .filter_map(|(label, re)| {
                    let matches: Vec<&str> = re.find_iter(text).map(|m| m.as_str()).collect();
                    (!matches.is_empty()).then(|| PatternHits {
                        label: *label,
                        count: matches.len(),
                        examples: matches.iter().take(3).map(|s| s.to_string()).collect(),
                    })
                })
                .collect();

            PageInspection {
                page: idx + 1,
                lines: all_lines
                    .iter()
                    .take(max_lines)
                    .enumerate()
                    .map(|(i, l)| (i + 1, l.to_string()))
                    .collect(),
                total_lines: all_lines.len(),
                hits,
            }
        })
        .collect()
}

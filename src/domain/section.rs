//! Section splitting and "active" validation.
//!
//! Reports list stops grouped per service line. Each group opens with
//! `Atendimento Principal:` or `Linha:` and carries an `Ativo:` flag;
//! only groups flagged `Sim` are current.

use once_cell::sync::Lazy;
use regex::Regex;

/// A block of report text between two section markers.
#[derive(Debug, Clone, PartialEq)]
pub struct Section<'a> {
    /// 1-based position among the sections of the document
    pub index: usize,
    /// Trimmed section text, marker excluded
    pub text: &'a str,
    /// Byte offset of `text` within the full document text
    pub offset: usize,
}

fn marker_pattern() -> &'static Regex {
    static PATTERN: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?:Atendimento Principal:|Linha:)").expect("Valid section marker regex")
    });
    &PATTERN
}

fn active_pattern() -> &'static Regex {
    static PATTERN: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?i)Ativo:\s*Sim").expect("Valid active flag regex"));
    &PATTERN
}

/// Splits document text into sections.
///
/// Text before the first marker (report header) is discarded. Sections
/// keep their 1-based index even when empty.
pub fn split_sections(text: &str) -> Vec<Section<'_>> {
    let markers: Vec<_> = marker_pattern().find_iter(text).collect();

    markers
        .iter()
        .enumerate()
        .map(|(i, marker)| {
            let body_start = marker.end();
            let body_end = markers.get(i + 1).map(|m| m.start()).unwrap_or(text.len());
            let raw = &text[body_start..body_end];
            let leading = raw.len() - raw.trim_start().len();
            Section {
                index: i + 1,
                text: raw.trim(),
                offset: body_start + leading,
            }
        })
        .collect()
}

/// Returns true when the section is flagged `Ativo: Sim` (any case).
pub fn is_active(section_text: &str) -> bool {
    active_pattern().is_match(section_text)
}

//! CSV and HTML output files.

use std::fmt;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::domain::BusStop;
use crate::error::{MapperError, MapperResult};

/// File-name stem of the consolidated outputs.
pub const CONSOLIDATED_NAME: &str = "all_operators";

/// Column order of every CSV file.
pub const CSV_HEADER: [&str; 7] = [
    "operator",
    "code",
    "address",
    "latitude",
    "longitude",
    "page",
    "section",
];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Reduces an operator name to `[A-Za-z0-9_-]` for use in file names.
pub fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.is_empty() {
        "operator".to_string()
    } else {
        cleaned
    }
}

pub fn csv_path(dir: &Path, operator: &str) -> PathBuf {
    dir.join(format!("stops_{}.csv", sanitize_name(operator)))
}

pub fn map_path(dir: &Path, operator: &str) -> PathBuf {
    dir.join(format!("map_{}.html", sanitize_name(operator)))
}

/// Writes stops as CSV, UTF-8 with a byte-order mark so spreadsheet
/// tools pick the right encoding for accented addresses.
pub fn write_csv(path: &Path, stops: &[BusStop]) -> MapperResult<()> {
    let csv_err = |source: csv::Error| MapperError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::create(path).map_err(|e| MapperError::io(path, e))?;
    file.write_all(UTF8_BOM)
        .map_err(|e| MapperError::io(path, e))?;

    let mut writer = csv::Writer::from_writer(file);
    if stops.is_empty() {
        writer.write_record(CSV_HEADER).map_err(csv_err)?;
    }
    for stop in stops {
        writer.serialize(stop).map_err(csv_err)?;
    }
    writer.flush().map_err(|e| MapperError::io(path, e))?;
    Ok(())
}

/// Writes a rendered map page.
pub fn write_html(path: &Path, html: &str) -> MapperResult<()> {
    fs::write(path, html).map_err(|e| MapperError::io(path, e))
}

/// A file produced by a run, for the final listing.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub size_kb: f64,
}

impl GeneratedFile {
    /// Reads the size of a file that has just been written.
    pub fn from_path(path: &Path) -> MapperResult<Self> {
        let metadata = fs::metadata(path).map_err(|e| MapperError::io(path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            size_kb: metadata.len() as f64 / 1024.0,
        })
    }
}

impl fmt::Display for GeneratedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| self.path.to_string_lossy());
        write!(f, "{} ({:.1} KB)", name, self.size_kb)
    }
}

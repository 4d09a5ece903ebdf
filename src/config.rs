//! Run configuration loaded from a TOML file.
//!
//! Every field is optional; the defaults reproduce the Maceió setup with
//! its three operators, so a run without a config file behaves like the
//! original batch script.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::BoundingBox;
use crate::error::{MapperError, MapperResult};
use crate::extraction::{ExtractionMode, TextBackend};
use crate::output::{sanitize_name, CONSOLIDATED_NAME};
use crate::render::{MapStyle, DEFAULT_COLOR};

/// One transit operator: its report and the colour of its markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorConfig {
    pub name: String,
    pub pdf: PathBuf,
    /// `#RRGGBB`; operators without one are drawn grey
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl OperatorConfig {
    pub fn new(name: impl Into<String>, pdf: impl Into<PathBuf>, color: Option<&str>) -> Self {
        Self {
            name: name.into(),
            pdf: pdf.into(),
            color: color.map(str::to_string),
        }
    }

    /// Marker colour, falling back to [`DEFAULT_COLOR`].
    pub fn color(&self) -> &str {
        self.color.as_deref().unwrap_or(DEFAULT_COLOR)
    }
}

impl std::str::FromStr for OperatorConfig {
    type Err = MapperError;

    /// Parses `NAME=PATH` or `NAME=PATH=COLOR`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| MapperError::InvalidInput {
            parameter: "pdf".to_string(),
            reason: format!("{reason} in '{s}' (expected NAME=PATH[=COLOR])"),
        };

        let mut parts = s.splitn(3, '=');
        let name = parts.next().unwrap_or_default().trim();
        let pdf = parts.next().ok_or_else(|| invalid("missing path"))?.trim();
        let color = parts.next().map(str::trim).filter(|c| !c.is_empty());

        if name.is_empty() {
            return Err(invalid("empty operator name"));
        }
        if pdf.is_empty() {
            return Err(invalid("empty path"));
        }
        Ok(Self::new(name, pdf, color))
    }
}

/// Complete configuration of a batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory receiving CSV and HTML files
    pub output_dir: PathBuf,
    pub mode: ExtractionMode,
    pub text_backend: TextBackend,
    pub bounds: BoundingBox,
    pub map: MapStyle,
    pub operators: Vec<OperatorConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            mode: ExtractionMode::default(),
            text_backend: TextBackend::default(),
            bounds: BoundingBox::MACEIO,
            map: MapStyle::default(),
            operators: default_operators(),
        }
    }
}

fn default_operators() -> Vec<OperatorConfig> {
    vec![
        OperatorConfig::new("Real", "pontos_real.pdf", Some("#FF0000")),
        OperatorConfig::new("SaoFrancisco", "empresa_saoFran.pdf", Some("#0000FF")),
        OperatorConfig::new("CidadeMaceio", "pontos_Maceio.pdf", Some("#FFFF00")),
    ]
}

fn is_hex_color(color: &str) -> bool {
    color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit())
}

impl Config {
    /// Parses a configuration from TOML text.
    pub fn from_toml(text: &str) -> MapperResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Loads and validates a configuration file.
    ///
    /// Relative PDF paths are taken relative to the file's directory.
    pub fn load(path: &Path) -> MapperResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| MapperError::io(path, e))?;
        let mut config: Config = toml::from_str(&content).map_err(|e| MapperError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        if let Some(base) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            for operator in &mut config.operators {
                if operator.pdf.is_relative() {
                    operator.pdf = base.join(&operator.pdf);
                }
            }
        }

        config.validate().map_err(|e| match e {
            MapperError::Config { reason, .. } => MapperError::Config {
                path: path.to_path_buf(),
                reason,
            },
            other => other,
        })?;
        Ok(config)
    }

    /// Checks operators, colours, bounds and zoom.
    pub fn validate(&self) -> MapperResult<()> {
        let invalid = |reason: String| MapperError::Config {
            path: PathBuf::from("<inline>"),
            reason,
        };

        if self.operators.is_empty() {
            return Err(invalid("no operators configured".to_string()));
        }

        // Output files are named after the sanitised name, so compare those
        let mut stems: HashMap<String, &str> = HashMap::new();
        for operator in &self.operators {
            if operator.name.trim().is_empty() {
                return Err(invalid("operator with an empty name".to_string()));
            }
            let stem = sanitize_name(&operator.name);
            if stem == CONSOLIDATED_NAME {
                return Err(invalid(format!(
                    "operator name '{}' is reserved for the consolidated output",
                    operator.name
                )));
            }
            if let Some(first) = stems.insert(stem.clone(), &operator.name) {
                return Err(invalid(format!(
                    "duplicate operator '{}': output file name '{stem}' already used by '{first}'",
                    operator.name
                )));
            }
            if let Some(color) = &operator.color {
                if !is_hex_color(color) {
                    return Err(invalid(format!(
                        "colour '{color}' of operator '{}' is not #RRGGBB",
                        operator.name
                    )));
                }
            }
        }

        if !self.bounds.is_valid() {
            return Err(invalid(format!(
                "empty bounding box (lat {}..{}, lon {}..{})",
                self.bounds.lat_min, self.bounds.lat_max, self.bounds.lon_min, self.bounds.lon_max
            )));
        }

        if !(1..=19).contains(&self.map.zoom) {
            return Err(invalid(format!("zoom {} outside 1..=19", self.map.zoom)));
        }

        Ok(())
    }

    /// Renders the effective configuration as TOML.
    pub fn to_toml(&self) -> MapperResult<String> {
        toml::to_string_pretty(self).map_err(|e| MapperError::Config {
            path: PathBuf::from("<inline>"),
            reason: e.to_string(),
        })
    }
}

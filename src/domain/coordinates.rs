//! Coordinate pair recognition and bounding-box validation.
//!
//! Operator reports print latitude and longitude side by side, either with
//! a decimal comma (`-9,53802 -35,78683`) or a decimal point
//! (`-9.53802 -35.78683`). Anything that merely looks like such a pair
//! (dates, prices, distances) is filtered out later by [`BoundingBox`].

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns the arithmetic mean of the given coordinates.
    pub fn mean<I>(coords: I) -> Option<Self>
    where
        I: IntoIterator<Item = Coordinate>,
    {
        let (count, lat_sum, lon_sum) = coords
            .into_iter()
            .fold((0usize, 0.0, 0.0), |(n, lat, lon), c| {
                (n + 1, lat + c.latitude, lon + c.longitude)
            });
        if count == 0 {
            return None;
        }
        Some(Self::new(lat_sum / count as f64, lon_sum / count as f64))
    }
}

/// Geographic rectangle used to reject coordinates outside the service area.
///
/// All four edges are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl BoundingBox {
    /// Municipality of Maceió, Alagoas.
    pub const MACEIO: BoundingBox = BoundingBox {
        lat_min: -9.8,
        lat_max: -9.4,
        lon_min: -35.9,
        lon_max: -35.6,
    };

    pub fn contains(&self, coord: &Coordinate) -> bool {
        self.lat_min < coord.latitude
            && coord.latitude < self.lat_max
            && self.lon_min < coord.longitude
            && coord.longitude < self.lon_max
    }

    /// Returns true when both ranges are non-empty.
    pub fn is_valid(&self) -> bool {
        self.lat_min < self.lat_max && self.lon_min < self.lon_max
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::MACEIO
    }
}

/// A coordinate pair found in text, with the raw strings as printed.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateMatch {
    pub coordinate: Coordinate,
    pub raw_latitude: String,
    pub raw_longitude: String,
    /// Byte offset of the match start in the searched text
    pub start: usize,
    /// Byte offset just past the match
    pub end: usize,
}

/// Parses a decimal number that may use a comma as decimal separator.
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().replace(',', ".").parse().ok()?;
    value.is_finite().then_some(value)
}

/// Matcher for latitude/longitude pairs separated by whitespace.
#[derive(Debug, Clone, Default)]
pub struct CoordinateMatcher;

impl CoordinateMatcher {
    pub fn new() -> Self {
        Self
    }

    /// Comma-or-dot pairs first, then dot-only pairs.
    ///
    /// The dot-only pass recovers pairs that the first pass consumed
    /// partially, as in `km 1,5 -9.6650 -35.7120`.
    fn patterns() -> &'static [Regex; 2] {
        static PATTERNS: Lazy<[Regex; 2]> = Lazy::new(|| {
            [
                Regex::new(r"(-?\d{1,2}[,.]\d+)\s+(-?\d{1,2}[,.]\d+)")
                    .expect("Valid coordinate regex"),
                Regex::new(r"(-?\d{1,2}\.\d+)\s+(-?\d{1,2}\.\d+)")
                    .expect("Valid dotted coordinate regex"),
            ]
        });
        &PATTERNS
    }

    fn captures(re: &Regex, text: &str) -> Vec<CoordinateMatch> {
        re.captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let lat = caps.get(1)?.as_str();
                let lon = caps.get(2)?.as_str();
                Some(CoordinateMatch {
                    coordinate: Coordinate::new(parse_decimal(lat)?, parse_decimal(lon)?),
                    raw_latitude: lat.to_string(),
                    raw_longitude: lon.to_string(),
                    start: whole.start(),
                    end: whole.end(),
                })
            })
            .collect()
    }

    /// Finds every coordinate pair in text order.
    ///
    /// Each pattern scans without overlaps. A dot-only match is kept
    /// unless the first pattern matched the exact same span, so pairs
    /// from the two passes may overlap. Pairs whose numbers cannot be
    /// parsed are skipped. No bounds check is applied here.
    pub fn find_all(&self, text: &str) -> Vec<CoordinateMatch> {
        let [mixed, dotted] = Self::patterns();
        let mut found = Self::captures(mixed, text);
        let extra: Vec<CoordinateMatch> = Self::captures(dotted, text)
            .into_iter()
            .filter(|d| !found.iter().any(|m| m.start == d.start && m.end == d.end))
            .collect();
        found.extend(extra);
        found.sort_by_key(|m| (m.start, m.end));
        found
    }

    /// Finds the pairs that fall inside `bounds`, also returning how many were rejected.
    pub fn find_within(&self, text: &str, bounds: &BoundingBox) -> (Vec<CoordinateMatch>, usize) {
        let (inside, outside): (Vec<_>, Vec<_>) = self
            .find_all(text)
            .into_iter()
            .partition(|m| bounds.contains(&m.coordinate));
        (inside, outside.len())
    }
}

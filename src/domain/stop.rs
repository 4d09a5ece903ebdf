//! The bus stop record written to CSV and plotted on maps.

use super::coordinates::Coordinate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One recovered stop.
///
/// Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusStop {
    pub operator: String,
    pub code: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    /// 1-based page the coordinate was printed on
    pub page: usize,
    /// 1-based section index; absent in line mode
    pub section: Option<usize>,
}

impl BusStop {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    fn key(&self) -> (u64, u64) {
        // -0.0 and 0.0 compare equal but differ in bits.
        let norm = |v: f64| if v == 0.0 { 0.0f64 } else { v };
        (norm(self.latitude).to_bits(), norm(self.longitude).to_bits())
    }
}

/// Removes stops whose exact (latitude, longitude) pair was already seen.
///
/// The first occurrence wins and relative order is preserved.
pub fn dedup_by_coordinates(stops: Vec<BusStop>) -> Vec<BusStop> {
    let mut seen = HashSet::new();
    stops.into_iter().filter(|s| seen.insert(s.key())).collect()
}

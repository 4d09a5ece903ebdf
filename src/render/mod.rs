//! Interactive map rendering.
//!
//! Maps are Leaflet pages: the crate only prepares marker data, popups
//! and legends, and leaves tiles, panning and layer toggling to the
//! browser-side library.

pub mod html;
pub mod leaflet;

pub use leaflet::{LayerControl, LeafletPage, Marker, MarkerLayer};

use crate::domain::{BusStop, Coordinate};
use crate::error::MapperResult;
use serde::{Deserialize, Serialize};

/// Fill colour for operators without a configured colour.
pub const DEFAULT_COLOR: &str = "#808080";

/// Title of the consolidated map legend.
pub const CONSOLIDATED_TITLE: &str = "Maceió - all operators";

/// Map presentation settings shared by every page of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapStyle {
    pub zoom: u8,
    /// Offer CartoDB light/dark base layers next to OpenStreetMap
    pub extra_tiles: bool,
    /// Fixed centre; `None` centres on the mean of the plotted stops.
    /// A `[map]` table without `center` means `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<Coordinate>,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            zoom: 12,
            extra_tiles: true,
            center: Some(Coordinate::new(-9.6498, -35.7089)),
        }
    }
}

impl MapStyle {
    fn resolve_center<'a, I>(&self, stops: I) -> Option<Coordinate>
    where
        I: IntoIterator<Item = &'a BusStop>,
    {
        self.center
            .or_else(|| Coordinate::mean(stops.into_iter().map(BusStop::coordinate)))
    }
}

/// The stops of one operator, with the colour they are drawn in.
#[derive(Debug, Clone, Copy)]
pub struct OperatorLayer<'a> {
    pub name: &'a str,
    pub color: &'a str,
    pub stops: &'a [BusStop],
}

fn markers(layer: &OperatorLayer<'_>, radius: f64, weight: f64) -> MarkerLayer {
    MarkerLayer {
        name: layer.name.to_string(),
        markers: layer
            .stops
            .iter()
            .map(|stop| Marker {
                lat: stop.latitude,
                lon: stop.longitude,
                radius,
                weight,
                fill_color: layer.color.to_string(),
                popup: html::popup(stop, layer.color),
                tooltip: html::tooltip(stop),
            })
            .collect(),
    }
}

/// Renders the map of a single operator.
///
/// Returns `Ok(None)` when the operator has no stops.
pub fn render_operator_map(
    layer: &OperatorLayer<'_>,
    style: &MapStyle,
) -> MapperResult<Option<String>> {
    if layer.stops.is_empty() {
        return Ok(None);
    }
    let Some(center) = style.resolve_center(layer.stops) else {
        return Ok(None);
    };

    let page = LeafletPage {
        title: format!("{} - bus stops", layer.name),
        center,
        zoom: style.zoom,
        extra_tiles: style.extra_tiles,
        layers: vec![markers(layer, 8.0, 2.0)],
        legend_html: html::operator_legend(layer.name, layer.color, layer.stops.len()),
        layer_control: if style.extra_tiles {
            LayerControl::Collapsed
        } else {
            LayerControl::None
        },
    };
    page.to_html().map(Some)
}

/// Renders one map with a toggleable layer per operator.
///
/// Operators without stops are left out; returns `Ok(None)` when no
/// operator has any.
pub fn render_consolidated_map(
    layers: &[OperatorLayer<'_>],
    style: &MapStyle,
) -> MapperResult<Option<String>> {
    let populated: Vec<&OperatorLayer<'_>> =
        layers.iter().filter(|l| !l.stops.is_empty()).collect();
    if populated.is_empty() {
        return Ok(None);
    }

    let Some(center) = style.resolve_center(populated.iter().flat_map(|l| l.stops.iter())) else {
        return Ok(None);
    };

    let mut rows: Vec<(String, String, usize)> = populated
        .iter()
        .map(|l| (l.name.to_string(), l.color.to_string(), l.stops.len()))
        .collect();
    rows.sort_by(|a, b| a.0.cmp(&b.0));

    let page = LeafletPage {
        title: CONSOLIDATED_TITLE.to_string(),
        center,
        zoom: style.zoom,
        extra_tiles: style.extra_tiles,
        layers: populated.iter().map(|l| markers(l, 7.0, 1.5)).collect(),
        legend_html: html::consolidated_legend(CONSOLIDATED_TITLE, &rows),
        layer_control: LayerControl::Expanded,
    };
    page.to_html().map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop(operator: &str, lat: f64, lon: f64) -> BusStop {
        BusStop {
            operator: operator.to_string(),
            code: "PN1".to_string(),
            address: "Rua A".to_string(),
            latitude: lat,
            longitude: lon,
            page: 1,
            section: Some(1),
        }
    }

    #[test]
    fn test_empty_operator_has_no_map() {
        let layer = OperatorLayer {
            name: "Real",
            color: "#FF0000",
            stops: &[],
        };
        assert!(render_operator_map(&layer, &MapStyle::default())
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_operator_map_markers() {
        let stops = vec![stop("Real", -9.6, -35.7), stop("Real", -9.5, -35.8)];
        let layer = OperatorLayer {
            name: "Real",
            color: "#FF0000",
            stops: &stops,
        };
        let html = render_operator_map(&layer, &MapStyle::default())
            .unwrap()
            .unwrap();
        assert_eq!(html.matches("\"fill_color\":\"#FF0000\"").count(), 2);
        assert!(html.contains("\"radius\":8.0"));
        assert!(html.contains("<b>Total points:</b> 2"));
    }

    #[test]
    fn test_mean_center_when_unset() {
        let stops = vec![stop("Real", -9.5, -35.75), stop("Real", -9.25, -35.625)];
        let layer = OperatorLayer {
            name: "Real",
            color: "#FF0000",
            stops: &stops,
        };
        let style = MapStyle {
            center: None,
            extra_tiles: false,
            ..MapStyle::default()
        };
        let html = render_operator_map(&layer, &style).unwrap().unwrap();
        assert!(html.contains("center: [-9.375, -35.6875]"));
    }

    #[test]
    fn test_consolidated_skips_empty_operators() {
        let real = vec![stop("Real", -9.6, -35.7)];
        let sao = vec![
            stop("SaoFrancisco", -9.5, -35.8),
            stop("SaoFrancisco", -9.55, -35.75),
        ];
        let layers = [
            OperatorLayer {
                name: "SaoFrancisco",
                color: "#0000FF",
                stops: &sao,
            },
            OperatorLayer {
                name: "CidadeMaceio",
                color: "#FFFF00",
                stops: &[],
            },
            OperatorLayer {
                name: "Real",
                color: "#FF0000",
                stops: &real,
            },
        ];
        let html = render_consolidated_map(&layers, &MapStyle::default())
            .unwrap()
            .unwrap();
        assert!(html.contains("<b>Total points:</b> 3"));
        assert!(!html.contains("CidadeMaceio"));
        assert!(html.contains("{ collapsed: false }"));
        assert!(html.find(">Real<").unwrap() < html.find(">SaoFrancisco<").unwrap());
    }

    #[test]
    fn test_consolidated_none_when_all_empty() {
        let layers = [OperatorLayer {
            name: "Real",
            color: "#FF0000",
            stops: &[],
        }];
        assert!(render_consolidated_map(&layers, &MapStyle::default())
            .unwrap()
            .is_none());
    }
}

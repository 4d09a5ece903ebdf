//! Leaflet page assembly.
//!
//! The generated file is self-contained apart from the Leaflet and
//! fullscreen-plugin assets loaded from public CDNs. Marker data is
//! embedded as JSON and turned into circle markers client-side.

use crate::domain::Coordinate;
use crate::error::MapperResult;
use serde::Serialize;
use std::fmt::Write as _;

use super::html::escape_html;

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";
const FULLSCREEN_CSS: &str =
    "https://cdn.jsdelivr.net/npm/leaflet.fullscreen@3.0.0/Control.FullScreen.css";
const FULLSCREEN_JS: &str =
    "https://cdn.jsdelivr.net/npm/leaflet.fullscreen@3.0.0/Control.FullScreen.min.js";

/// One circle marker, serialized for the page script.
#[derive(Debug, Clone, Serialize)]
pub struct Marker {
    pub lat: f64,
    pub lon: f64,
    pub radius: f64,
    pub weight: f64,
    pub fill_color: String,
    pub popup: String,
    pub tooltip: String,
}

/// A toggleable group of markers.
#[derive(Debug, Clone, Serialize)]
pub struct MarkerLayer {
    pub name: String,
    pub markers: Vec<Marker>,
}

/// Which layer control, if any, the page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerControl {
    None,
    Collapsed,
    Expanded,
}

/// A complete map page.
#[derive(Debug, Clone)]
pub struct LeafletPage {
    pub title: String,
    pub center: Coordinate,
    pub zoom: u8,
    pub extra_tiles: bool,
    pub layers: Vec<MarkerLayer>,
    pub legend_html: String,
    pub layer_control: LayerControl,
}

fn script_json<T: Serialize>(value: &T) -> MapperResult<String> {
    // Keep "</script>" inside strings from closing the script element.
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

impl LeafletPage {
    /// Renders the page to a standalone HTML document.
    pub fn to_html(&self) -> MapperResult<String> {
        let layers = script_json(&self.layers)?;
        let mut out = String::with_capacity(4096 + layers.len());

        let _ = write!(
            out,
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<link rel="stylesheet" href="{LEAFLET_CSS}">
<link rel="stylesheet" href="{FULLSCREEN_CSS}">
<script src="{LEAFLET_JS}"></script>
<script src="{FULLSCREEN_JS}"></script>
<style>
html, body {{ width: 100%; height: 100%; margin: 0; padding: 0; }}
#map {{ position: absolute; top: 0; bottom: 0; right: 0; left: 0; }}
</style>
</head>
<body>
<div id="map"></div>
{legend}
<script>
var map = L.map("map", {{ center: [{lat}, {lon}], zoom: {zoom} }});
var baseLayers = {{}};
baseLayers["OpenStreetMap"] = L.tileLayer("https://tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png", {{
  maxZoom: 19,
  attribution: "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors"
}}).addTo(map);
"#,
            title = escape_html(&self.title),
            legend = self.legend_html,
            lat = self.center.latitude,
            lon = self.center.longitude,
            zoom = self.zoom,
        );

        if self.extra_tiles {
            for (name, style) in [("CartoDB Light", "light_all"), ("CartoDB Dark", "dark_all")] {
                let _ = writeln!(
                    out,
                    r#"baseLayers["{name}"] = L.tileLayer("https://{{s}}.basemaps.cartocdn.com/{style}/{{z}}/{{x}}/{{y}}{{r}}.png", {{
  maxZoom: 20,
  attribution: "&copy; OpenStreetMap contributors &copy; CARTO"
}});"#
                );
            }
        }

        let _ = write!(
            out,
            r#"var layers = {layers};
var overlays = {{}};
layers.forEach(function (layer) {{
  var group = L.featureGroup();
  layer.markers.forEach(function (m) {{
    L.circleMarker([m.lat, m.lon], {{
      radius: m.radius,
      color: "white",
      weight: m.weight,
      fillColor: m.fill_color,
      fillOpacity: 0.8
    }}).bindPopup(m.popup, {{ maxWidth: 300 }}).bindTooltip(m.tooltip).addTo(group);
  }});
  group.addTo(map);
  overlays[layer.name] = group;
}});
L.control.scale().addTo(map);
L.control.fullscreen({{ position: "topleft" }}).addTo(map);
"#
        );

        let collapsed = match self.layer_control {
            LayerControl::None => None,
            LayerControl::Collapsed => Some(true),
            LayerControl::Expanded => Some(false),
        };
        if let Some(collapsed) = collapsed {
            let _ = writeln!(
                out,
                "L.control.layers(baseLayers, overlays, {{ collapsed: {collapsed} }}).addTo(map);"
            );
        }

        out.push_str("</script>\n</body>\n</html>\n");
        Ok(out)
    }
}

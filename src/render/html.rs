//! HTML fragments shared by the map pages: popups, tooltips and legends.

use crate::domain::BusStop;

/// Escape special HTML characters.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Popup body shown when a stop marker is clicked.
pub fn popup(stop: &BusStop, color: &str) -> String {
    let section = stop
        .section
        .map(|s| s.to_string())
        .unwrap_or_else(|| "-".to_string());

    format!(
        r#"<div style="font-family: Arial; width: 250px;">
<h4 style="color: {color}; margin: 5px 0;">{operator}</h4>
<hr style="margin: 5px 0;">
<b>Code:</b> {code}<br>
<b>Latitude:</b> {lat:.5}<br>
<b>Longitude:</b> {lon:.5}<br>
<b>Section:</b> {section}<br>
<b>Page:</b> {page}<br>
<hr style="margin: 5px 0;">
<small><b>Address:</b><br>{address}</small>
</div>"#,
        color = escape_html(color),
        operator = escape_html(&stop.operator),
        code = escape_html(&stop.code),
        lat = stop.latitude,
        lon = stop.longitude,
        section = section,
        page = stop.page,
        address = escape_html(&stop.address),
    )
}

/// Hover text of a stop marker.
pub fn tooltip(stop: &BusStop) -> String {
    escape_html(&format!("{} - {}", stop.code, stop.operator))
}

const LEGEND_BOX: &str = "position: fixed; bottom: 50px; left: 50px; height: auto; \
background-color: white; border: 2px solid grey; border-radius: 5px; padding: 10px; \
font-size: 14px; z-index: 9999; box-shadow: 0 0 10px rgba(0,0,0,0.5);";

/// Legend of a single-operator map.
pub fn operator_legend(operator: &str, color: &str, total: usize) -> String {
    format!(
        r#"<div class="legend" style="{LEGEND_BOX} width: 180px;">
<h4 style="margin-top: 0;">{operator}</h4>
<hr>
<b>Total points:</b> {total}<br>
<b>Colour:</b> <span style="color: {color}">&#9679;</span><br>
<small><i>Click a point for details</i></small>
</div>"#,
        operator = escape_html(operator),
        color = escape_html(color),
    )
}

/// Legend of the consolidated map: one row per operator with its count.
pub fn consolidated_legend(title: &str, rows: &[(String, String, usize)]) -> String {
    let total: usize = rows.iter().map(|(_, _, count)| count).sum();
    let table: String = rows
        .iter()
        .map(|(operator, color, count)| {
            format!(
                r#"<tr><td style="padding: 2px 5px;"><span style="color: {color}; font-size: 20px;">&#9679;</span></td><td style="padding: 2px 5px;">{operator}</td><td style="padding: 2px 5px; text-align: right;">{count}</td></tr>"#,
                color = escape_html(color),
                operator = escape_html(operator),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<div class="legend" style="{LEGEND_BOX} width: 220px;">
<h4 style="margin-top: 0;">{title}</h4>
<hr>
<b>Total points:</b> {total}<br>
<b>Points per operator:</b>
<table style="width: 100%; margin-top: 5px;">
{table}
</table>
<hr>
<small><i>Use the layer control (top right) to toggle operators</i></small>
</div>"#,
        title = escape_html(title),
    )
}

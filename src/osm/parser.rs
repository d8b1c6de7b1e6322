use crate::api::OverpassResponse;
use crate::api::overpass::Element;
use crate::domain::{OsmBar, UNNAMED_BAR};

/// Coordinates of a node, or the computed center of a way/relation
fn element_position(element: &Element) -> Option<(f64, f64)> {
    match (element.lat, element.lon) {
        (Some(lat), Some(lon)) => Some((lat, lon)),
        _ => element.center.as_ref().map(|c| (c.lat, c.lon)),
    }
}

fn element_name(element: &Element) -> Option<&str> {
    element
        .tags
        .as_ref()
        .and_then(|tags| tags.get("name"))
        .map(String::as_str)
        .filter(|name| !name.is_empty())
}

/// Parse an Overpass bar query response into bars
///
/// # Arguments
/// * `response` - Result of an `out center` query
/// * `require_name` - Drop unnamed elements instead of using a placeholder
pub fn parse_bars(response: &OverpassResponse, require_name: bool) -> Vec<OsmBar> {
    let mut bars = Vec::new();

    for element in &response.elements {
        let Some((lat, lng)) = element_position(element) else {
            continue;
        };

        let name = match element_name(element) {
            Some(name) => name,
            None if require_name => continue,
            None => UNNAMED_BAR,
        };

        bars.push(OsmBar::new(name, lat, lng));
    }

    bars
}

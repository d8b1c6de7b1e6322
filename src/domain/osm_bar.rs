use serde::{Deserialize, Serialize};

/// A bar found in OpenStreetMap data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OsmBar {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

impl OsmBar {
    pub fn new(name: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            name: name.into(),
            lat,
            lng,
        }
    }
}

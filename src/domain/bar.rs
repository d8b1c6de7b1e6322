use serde::{Deserialize, Serialize};

/// Name used when the upstream place carries none
pub const UNNAMED_BAR: &str = "Unnamed Bar";

/// Price level as reported upstream.
///
/// The Places API (New) reports an enum label such as `PRICE_LEVEL_MODERATE`,
/// the legacy API an integer from 0 to 4.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceLevel {
    Label(String),
    Level(u64),
}

/// A bar collected from Google Places, optionally enriched with place details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarRecord {
    pub name: String,
    pub place_id: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u64>,
    pub price_level: Option<PriceLevel>,
    #[serde(default)]
    pub types: Vec<String>,
    pub formatted_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default)]
    pub opening_hours: Vec<String>,
}

impl BarRecord {
    /// Create a record with only the required fields set
    pub fn new(name: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            name: name.into(),
            place_id: None,
            lat,
            lng,
            rating: None,
            user_ratings_total: None,
            price_level: None,
            types: Vec::new(),
            formatted_address: None,
            phone: None,
            website: None,
            opening_hours: Vec::new(),
        }
    }

    pub fn with_place_id(mut self, place_id: impl Into<String>) -> Self {
        self.place_id = Some(place_id.into());
        self
    }
}

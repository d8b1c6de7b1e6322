use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::time::Duration;

use super::error::{ApiError, read_success_body};
use crate::config::GoogleConfig;
use crate::domain::PriceLevel;

const USER_AGENT: &str = concat!("barscout/", env!("CARGO_PKG_VERSION"));

/// Upper bound the Places API accepts for `maxResultCount`
pub const MAX_RESULT_COUNT: u32 = 20;

/// Fields requested from the text-search endpoint
pub const SEARCH_FIELD_MASK: &str = "places.displayName,places.id,places.location,places.rating,places.userRatingCount,places.priceLevel,places.types,places.formattedAddress";

/// Fields requested from the place-details endpoint
pub const DETAILS_FIELD_MASK: &str = "displayName,formattedAddress,nationalPhoneNumber,internationalPhoneNumber,rating,userRatingCount,regularOpeningHours,websiteUri,priceLevel,types";

/// Body of a `places:searchText` request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchTextRequest {
    pub text_query: String,
    pub max_result_count: u32,
    pub location_bias: LocationBias,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocationBias {
    pub circle: Circle,
}

#[derive(Debug, Clone, Serialize)]
pub struct Circle {
    pub center: LatLng,
    pub radius: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

impl SearchTextRequest {
    /// Build a text search biased towards a circle around `center`
    ///
    /// # Arguments
    /// * `query` - Free text query, e.g. "bars in Washington DC"
    /// * `center` - (lat, lng) of the bias circle
    /// * `radius_m` - Bias radius in meters
    /// * `max_results` - Clamped to 1..=20
    pub fn new(query: &str, center: (f64, f64), radius_m: u32, max_results: u32) -> Self {
        let (latitude, longitude) = center;
        Self {
            text_query: query.to_string(),
            max_result_count: max_results.clamp(1, MAX_RESULT_COUNT),
            location_bias: LocationBias {
                circle: Circle {
                    center: LatLng {
                        latitude,
                        longitude,
                    },
                    radius: radius_m as f64,
                },
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchTextResponse {
    #[serde(default)]
    places: Vec<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocalizedText {
    #[serde(default)]
    pub text: Option<String>,
}

/// `null` and a missing key both read as an empty list
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningHours {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub weekday_descriptions: Vec<String>,
}

/// Place details as returned under [`DETAILS_FIELD_MASK`]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceDetails {
    #[serde(default)]
    pub display_name: Option<LocalizedText>,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub national_phone_number: Option<String>,
    #[serde(default)]
    pub international_phone_number: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub user_rating_count: Option<u64>,
    #[serde(default)]
    pub regular_opening_hours: Option<OpeningHours>,
    #[serde(default)]
    pub website_uri: Option<String>,
    #[serde(default)]
    pub price_level: Option<PriceLevel>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub types: Vec<String>,
}

impl PlaceDetails {
    /// International number if present, otherwise the national one
    pub fn phone(&self) -> Option<&str> {
        self.international_phone_number
            .as_deref()
            .or(self.national_phone_number.as_deref())
    }

    pub fn weekday_descriptions(&self) -> &[String] {
        self.regular_opening_hours
            .as_ref()
            .map(|h| h.weekday_descriptions.as_slice())
            .unwrap_or(&[])
    }
}

/// The two Places endpoints the pipeline talks to
pub trait PlacesApi {
    /// Run a text search and return the raw place summaries
    fn search_text(&self, request: &SearchTextRequest) -> Result<Vec<Value>, ApiError>;

    /// Fetch details for a single place
    ///
    /// `Ok(None)` means the endpoint answered with an empty object.
    fn place_details(&self, place_id: &str) -> Result<Option<PlaceDetails>, ApiError>;
}

/// Blocking client for the Google Places API (New)
pub struct PlacesClient {
    client: reqwest::blocking::Client,
    api_key: String,
    base_url: String,
}

impl PlacesClient {
    pub fn new(api_key: &str, config: &GoogleConfig) -> Result<Self, ApiError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(ApiError::Client)?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn search_url(&self) -> String {
        format!("{}/places:searchText", self.base_url)
    }

    fn details_url(&self, place_id: &str) -> String {
        format!("{}/places/{}", self.base_url, place_id)
    }
}

impl PlacesApi for PlacesClient {
    fn search_text(&self, request: &SearchTextRequest) -> Result<Vec<Value>, ApiError> {
        let url = self.search_url();

        let response = self
            .client
            .post(&url)
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", SEARCH_FIELD_MASK)
            .json(request)
            .send()
            .map_err(|e| ApiError::http(&url, e))?;

        let body = read_success_body(&url, response)?;
        let parsed: SearchTextResponse =
            serde_json::from_str(&body).map_err(|e| ApiError::decode(&url, e))?;

        Ok(parsed.places)
    }

    fn place_details(&self, place_id: &str) -> Result<Option<PlaceDetails>, ApiError> {
        let url = self.details_url(place_id);

        let response = self
            .client
            .get(&url)
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", DETAILS_FIELD_MASK)
            .send()
            .map_err(|e| ApiError::http(&url, e))?;

        let body = read_success_body(&url, response)?;
        let value: Value = serde_json::from_str(&body).map_err(|e| ApiError::decode(&url, e))?;
        decode_details(value).map_err(|e| ApiError::decode(&url, e))
    }
}

/// Decode a details body, treating an empty object as no details at all
pub fn decode_details(value: Value) -> Result<Option<PlaceDetails>, serde_json::Error> {
    if value.as_object().is_some_and(|fields| fields.is_empty()) {
        return Ok(None);
    }
    serde_json::from_value(value).map(Some)
}

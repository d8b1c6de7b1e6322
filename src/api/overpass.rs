use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use super::error::{ApiError, read_success_body};
use crate::config::OverpassConfig;

const USER_AGENT: &str = concat!("barscout/", env!("CARGO_PKG_VERSION"));

/// Raw Overpass API response
#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    pub elements: Vec<Element>,
}

/// A single element from Overpass (node, way or relation)
#[derive(Debug, Deserialize)]
pub struct Element {
    #[serde(rename = "type")]
    pub type_: String,
    pub id: u64,
    #[serde(default)]
    pub tags: Option<HashMap<String, String>>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    /// Present on ways and relations when queried with `out center`
    #[serde(default)]
    pub center: Option<Center>,
}

#[derive(Debug, Deserialize)]
pub struct Center {
    pub lat: f64,
    pub lon: f64,
}

/// Build the Overpass QL query for every `amenity=bar` inside an area
///
/// # Arguments
/// * `area_selector` - Tag filter identifying the area, e.g. `["ISO3166-2"="US-DC"]`
/// * `timeout_secs` - Server-side query timeout
pub fn build_bars_query(area_selector: &str, timeout_secs: u64) -> String {
    format!(
        r#"[out:json][timeout:{timeout}];
area{area}->.searchArea;
(
  node["amenity"="bar"](area.searchArea);
  way["amenity"="bar"](area.searchArea);
  relation["amenity"="bar"](area.searchArea);
);
out center;"#,
        timeout = timeout_secs,
        area = area_selector
    )
}

/// Fetch bars inside the configured area from the Overpass API
pub fn fetch_bars(config: &OverpassConfig) -> Result<OverpassResponse, ApiError> {
    let query = build_bars_query(&config.area, config.timeout_secs);
    execute_overpass_query(&config.url, &query, config.timeout_secs)
}

fn execute_overpass_query(
    url: &str,
    query: &str,
    timeout_secs: u64,
) -> Result<OverpassResponse, ApiError> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(timeout_secs + 20)) // outlast the server-side timeout
        .build()
        .map_err(ApiError::Client)?;

    // Overpass expects form-encoded POST data: data=<query>
    let response = client
        .post(url)
        .form(&[("data", query)])
        .send()
        .map_err(|e| ApiError::http(url, e))?;

    let body = read_success_body(url, response)?;
    serde_json::from_str(&body).map_err(|e| ApiError::decode(url, e))
}

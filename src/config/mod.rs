use clap::ValueEnum;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::api::places::MAX_RESULT_COUNT;

/// Placeholder shipped in sample configs; never a usable key
pub const PLACEHOLDER_API_KEY: &str = "YOUR_GOOGLE_PLACES_API_KEY_HERE";

pub const DEFAULT_LOCATION: &str = "Washington, DC";
pub const DEFAULT_CENTER: (f64, f64) = (38.9072, -77.0369);
pub const DEFAULT_RADIUS: u32 = 50000;
pub const DEFAULT_QUERY: &str = "bars in Washington DC";
pub const DEFAULT_DELAY_MS: u64 = 100;

/// Where bar data comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Google Places text search enriched with place details
    #[default]
    Google,
    /// OpenStreetMap via the Overpass API
    Osm,
}

impl Source {
    pub fn default_output(&self) -> PathBuf {
        match self {
            Source::Google => PathBuf::from("bars_google.json"),
            Source::Osm => PathBuf::from("bars.json"),
        }
    }
}

fn default_radius() -> u32 {
    DEFAULT_RADIUS
}
fn default_max_results() -> u32 {
    MAX_RESULT_COUNT
}
fn default_delay_ms() -> u64 {
    DEFAULT_DELAY_MS
}

#[derive(Debug, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub source: Option<Source>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default = "default_radius")]
    pub radius: u32,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default = "default_max_results")]
    pub max_results: u32,
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
    #[serde(default)]
    pub skip_details: bool,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub google: Option<GoogleConfig>,
    #[serde(default)]
    pub overpass: Option<OverpassConfig>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            source: None,
            api_key: None,
            location: None,
            lat: None,
            lon: None,
            radius: default_radius(),
            query: None,
            max_results: default_max_results(),
            output: None,
            delay_ms: default_delay_ms(),
            skip_details: false,
            verbose: false,
            google: None,
            overpass: None,
        }
    }
}

fn default_google_base_url() -> String {
    "https://places.googleapis.com/v1".to_string()
}

fn default_google_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct GoogleConfig {
    #[serde(default = "default_google_base_url")]
    pub base_url: String,
    #[serde(default = "default_google_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            base_url: default_google_base_url(),
            timeout_secs: default_google_timeout_secs(),
        }
    }
}

fn default_overpass_url() -> String {
    "https://overpass-api.de/api/interpreter".to_string()
}

fn default_overpass_area() -> String {
    r#"["ISO3166-2"="US-DC"]"#.to_string()
}

fn default_overpass_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Deserialize, Clone)]
pub struct OverpassConfig {
    #[serde(default = "default_overpass_url")]
    pub url: String,
    /// Overpass tag filter selecting the search area
    #[serde(default = "default_overpass_area")]
    pub area: String,
    #[serde(default = "default_overpass_timeout_secs")]
    pub timeout_secs: u64,
    /// Drop elements without a `name` tag instead of using a placeholder
    #[serde(default)]
    pub require_name: bool,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            url: default_overpass_url(),
            area: default_overpass_area(),
            timeout_secs: default_overpass_timeout_secs(),
            require_name: false,
        }
    }
}

/// Everything the Google Places pipeline needs for one run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub query: String,
    /// (lat, lng) of the location bias circle
    pub center: (f64, f64),
    pub radius_m: u32,
    pub max_results: u32,
    /// Pause after each record during enrichment
    pub delay: Duration,
    pub enrich: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            query: DEFAULT_QUERY.to_string(),
            center: DEFAULT_CENTER,
            radius_m: DEFAULT_RADIUS,
            max_results: MAX_RESULT_COUNT,
            delay: Duration::from_millis(DEFAULT_DELAY_MS),
            enrich: true,
        }
    }
}

/// True when `key` is something worth sending to Google
pub fn is_usable_api_key(key: &str) -> bool {
    let key = key.trim();
    !key.is_empty() && key != PLACEHOLDER_API_KEY
}

/// Outcome of config discovery, kept until logging is set up
#[derive(Debug, Default)]
pub struct LoadedConfig {
    pub config: Option<FileConfig>,
    pub path: Option<PathBuf>,
    /// Files that existed but could not be read or parsed
    pub warnings: Vec<String>,
}

impl FileConfig {
    /// Search the standard locations for a config file
    pub fn load() -> LoadedConfig {
        Self::load_from(&get_config_paths())
    }

    /// Use the first of `paths` that parses
    pub fn load_from(paths: &[PathBuf]) -> LoadedConfig {
        let mut loaded = LoadedConfig::default();

        for path in paths {
            if !path.exists() {
                continue;
            }
            let contents = match std::fs::read_to_string(path) {
                Ok(contents) => contents,
                Err(e) => {
                    loaded
                        .warnings
                        .push(format!("Failed to read config file {:?}: {}", path, e));
                    continue;
                }
            };
            match toml::from_str(&contents) {
                Ok(config) => {
                    loaded.config = Some(config);
                    loaded.path = Some(path.clone());
                    return loaded;
                }
                Err(e) => {
                    loaded
                        .warnings
                        .push(format!("Failed to parse config file {:?}: {}", path, e));
                }
            }
        }
        loaded
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("barscout.toml"));
    paths.push(PathBuf::from(".barscout.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("barscout").join("config.toml"));
        paths.push(config_dir.join("barscout.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".barscout.toml"));
        paths.push(home.join(".config").join("barscout").join("config.toml"));
    }

    paths
}

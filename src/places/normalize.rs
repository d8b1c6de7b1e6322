//! Mapping of raw place summaries into [`BarRecord`]s.
//!
//! Two upstream layouts are supported, selected by [`SchemaShape`]:
//!
//! ```text
//! field               NewApi                 Legacy
//! name                displayName.text       name
//! place_id            id                     place_id
//! lat                 location.latitude      geometry.location.lat
//! lng                 location.longitude     geometry.location.lng
//! rating              rating                 rating
//! user_ratings_total  userRatingCount        user_ratings_total
//! price_level         priceLevel             price_level
//! types               types                  types
//! formatted_address   formattedAddress       formatted_address
//! ```
//!
//! A missing key or a `null` anywhere along a path reads as absent, and so
//! does a leaf of the wrong JSON type. Only a path running through a
//! non-object, or a coordinate that is not a number, rejects the summary.

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::{BarRecord, PriceLevel, UNNAMED_BAR};

/// Upstream response layout of a place summary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaShape {
    /// Places API (New), `places:searchText`
    NewApi,
    /// Legacy Places API, `textsearch/json`
    Legacy,
}

#[derive(Debug, Error, PartialEq)]
pub enum NormalizeError {
    #[error("expected an object at `{path}`")]
    NotAnObject { path: String },

    #[error("expected {expected} at `{path}`")]
    WrongType {
        path: String,
        expected: &'static str,
    },
}

type FieldPath = &'static [&'static str];

struct FieldPaths {
    name: FieldPath,
    place_id: FieldPath,
    lat: FieldPath,
    lng: FieldPath,
    rating: FieldPath,
    user_ratings_total: FieldPath,
    price_level: FieldPath,
    types: FieldPath,
    formatted_address: FieldPath,
}

const NEW_API_PATHS: FieldPaths = FieldPaths {
    name: &["displayName", "text"],
    place_id: &["id"],
    lat: &["location", "latitude"],
    lng: &["location", "longitude"],
    rating: &["rating"],
    user_ratings_total: &["userRatingCount"],
    price_level: &["priceLevel"],
    types: &["types"],
    formatted_address: &["formattedAddress"],
};

const LEGACY_PATHS: FieldPaths = FieldPaths {
    name: &["name"],
    place_id: &["place_id"],
    lat: &["geometry", "location", "lat"],
    lng: &["geometry", "location", "lng"],
    rating: &["rating"],
    user_ratings_total: &["user_ratings_total"],
    price_level: &["price_level"],
    types: &["types"],
    formatted_address: &["formatted_address"],
};

impl SchemaShape {
    fn paths(self) -> &'static FieldPaths {
        match self {
            SchemaShape::NewApi => &NEW_API_PATHS,
            SchemaShape::Legacy => &LEGACY_PATHS,
        }
    }
}

fn display_path(path: &[&str]) -> String {
    if path.is_empty() {
        "<root>".to_string()
    } else {
        path.join(".")
    }
}

fn lookup<'a>(raw: &'a Value, path: FieldPath) -> Result<Option<&'a Value>, NormalizeError> {
    let mut current = raw;

    for (depth, key) in path.iter().enumerate() {
        let object = current
            .as_object()
            .ok_or_else(|| NormalizeError::NotAnObject {
                path: display_path(&path[..depth]),
            })?;

        match object.get(*key) {
            None | Some(Value::Null) => return Ok(None),
            Some(value) => current = value,
        }
    }

    Ok(Some(current))
}

fn wrong_type(path: FieldPath, expected: &'static str) -> NormalizeError {
    NormalizeError::WrongType {
        path: display_path(path),
        expected,
    }
}

/// Read an optional leaf, treating a value of the wrong type as absent
fn lenient_at<T>(
    raw: &Value,
    path: FieldPath,
    expected: &'static str,
    convert: impl Fn(&Value) -> Option<T>,
) -> Result<Option<T>, NormalizeError> {
    let Some(value) = lookup(raw, path)? else {
        return Ok(None);
    };

    let converted = convert(value);
    if converted.is_none() {
        debug!("Ignoring `{}`: expected {}, got {}", display_path(path), expected, value);
    }
    Ok(converted)
}

/// Non-negative integer, also accepting integral floats such as `2101.0`
fn as_count(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64)
            .map(|f| f as u64)
    })
}

fn string_at(raw: &Value, path: FieldPath) -> Result<Option<String>, NormalizeError> {
    lenient_at(raw, path, "a string", |v| v.as_str().map(str::to_string))
}

fn float_at(raw: &Value, path: FieldPath) -> Result<Option<f64>, NormalizeError> {
    lenient_at(raw, path, "a number", Value::as_f64)
}

fn count_at(raw: &Value, path: FieldPath) -> Result<Option<u64>, NormalizeError> {
    lenient_at(raw, path, "a non-negative integer", as_count)
}

fn price_level_at(raw: &Value, path: FieldPath) -> Result<Option<PriceLevel>, NormalizeError> {
    lenient_at(raw, path, "a price level", |v| match v {
        Value::String(label) => Some(PriceLevel::Label(label.clone())),
        Value::Number(_) => as_count(v).map(PriceLevel::Level),
        _ => None,
    })
}

/// Strings of an array leaf; other entries are skipped
fn strings_at(raw: &Value, path: FieldPath) -> Result<Vec<String>, NormalizeError> {
    let items = lenient_at(raw, path, "an array", |v| v.as_array().cloned())?;

    Ok(items
        .unwrap_or_default()
        .iter()
        .filter_map(|item| item.as_str().map(str::to_string))
        .collect())
}

/// Coordinates are the one leaf where a wrong type rejects the summary
fn coordinate_at(raw: &Value, path: FieldPath) -> Result<Option<f64>, NormalizeError> {
    lookup(raw, path)?
        .map(|v| v.as_f64().ok_or_else(|| wrong_type(path, "a number")))
        .transpose()
}

/// Zero counts as missing, so a bar exactly on the equator or prime meridian
/// is dropped.
fn valid_coordinate(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}

/// Map a raw summary to a record, distinguishing shape errors from rejections
///
/// # Returns
/// * `Ok(Some(record))` - Summary with usable coordinates
/// * `Ok(None)` - Latitude or longitude missing or zero
/// * `Err` - A path ran through a non-object, or a coordinate was not a number
pub fn try_normalize(raw: &Value, shape: SchemaShape) -> Result<Option<BarRecord>, NormalizeError> {
    let paths = shape.paths();

    let name = string_at(raw, paths.name)?.unwrap_or_else(|| UNNAMED_BAR.to_string());
    let place_id = string_at(raw, paths.place_id)?;
    let lat = coordinate_at(raw, paths.lat)?;
    let lng = coordinate_at(raw, paths.lng)?;
    let rating = float_at(raw, paths.rating)?;
    let user_ratings_total = count_at(raw, paths.user_ratings_total)?;
    let price_level = price_level_at(raw, paths.price_level)?;
    let types = strings_at(raw, paths.types)?;
    let formatted_address = string_at(raw, paths.formatted_address)?;

    let (Some(lat), Some(lng)) = (valid_coordinate(lat), valid_coordinate(lng)) else {
        return Ok(None);
    };

    Ok(Some(BarRecord {
        name,
        place_id,
        lat,
        lng,
        rating,
        user_ratings_total,
        price_level,
        types,
        formatted_address,
        phone: None,
        website: None,
        opening_hours: Vec::new(),
    }))
}

/// Map a raw summary to a record, or `None` if it cannot be used
pub fn normalize_place(raw: &Value, shape: SchemaShape) -> Option<BarRecord> {
    match try_normalize(raw, shape) {
        Ok(Some(bar)) => Some(bar),
        Ok(None) => {
            debug!("Skipping place without valid coordinates");
            None
        }
        Err(e) => {
            warn!("Error extracting bar info: {}", e);
            None
        }
    }
}

/// Normalize a batch of summaries, keeping their order
pub fn normalize_places(raw: &[Value], shape: SchemaShape) -> Vec<BarRecord> {
    raw.iter()
        .filter_map(|place| normalize_place(place, shape))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn new_api_place() -> Value {
        json!({
            "id": "ChIJ-tune-inn",
            "displayName": {"text": "Tune Inn", "languageCode": "en"},
            "location": {"latitude": 38.8849, "longitude": -76.9968},
            "rating": 4.5,
            "userRatingCount": 2101,
            "priceLevel": "PRICE_LEVEL_INEXPENSIVE",
            "types": ["bar", "restaurant", "food"],
            "formattedAddress": "331 Pennsylvania Ave SE, Washington, DC 20003, USA"
        })
    }

    #[test]
    fn test_normalize_new_api_place() {
        let bar = normalize_place(&new_api_place(), SchemaShape::NewApi).unwrap();

        assert_eq!(bar.name, "Tune Inn");
        assert_eq!(bar.place_id.as_deref(), Some("ChIJ-tune-inn"));
        assert_eq!((bar.lat, bar.lng), (38.8849, -76.9968));
        assert_eq!(bar.rating, Some(4.5));
        assert_eq!(bar.user_ratings_total, Some(2101));
        assert_eq!(
            bar.price_level,
            Some(PriceLevel::Label("PRICE_LEVEL_INEXPENSIVE".to_string()))
        );
        assert_eq!(bar.types, vec!["bar", "restaurant", "food"]);
        assert!(bar.formatted_address.unwrap().starts_with("331 Pennsylvania"));
        assert!(bar.phone.is_none());
        assert!(bar.opening_hours.is_empty());
    }

    #[test]
    fn test_normalize_legacy_place() {
        let raw = json!({
            "place_id": "legacy-1",
            "name": "Dan's Cafe",
            "geometry": {"location": {"lat": 38.92, "lng": -77.04}},
            "rating": 4.4,
            "user_ratings_total": 800,
            "price_level": 1,
            "types": ["bar"],
            "formatted_address": "2315 18th St NW"
        });

        let bar = normalize_place(&raw, SchemaShape::Legacy).unwrap();
        assert_eq!(bar.name, "Dan's Cafe");
        assert_eq!(bar.place_id.as_deref(), Some("legacy-1"));
        assert_eq!((bar.lat, bar.lng), (38.92, -77.04));
        assert_eq!(bar.price_level, Some(PriceLevel::Level(1)));
        assert_eq!(bar.user_ratings_total, Some(800));
        assert_eq!(bar.formatted_address.as_deref(), Some("2315 18th St NW"));
    }

    #[test]
    fn test_shapes_do_not_cross_read() {
        // A New API summary read with the legacy table has no coordinates
        assert!(normalize_place(&new_api_place(), SchemaShape::Legacy).is_none());
    }

    #[test]
    fn test_missing_coordinates_rejected() {
        let mut no_lat = new_api_place();
        no_lat["location"].as_object_mut().unwrap().remove("latitude");
        assert!(normalize_place(&no_lat, SchemaShape::NewApi).is_none());

        let mut no_location = new_api_place();
        no_location.as_object_mut().unwrap().remove("location");
        assert!(normalize_place(&no_location, SchemaShape::NewApi).is_none());

        let mut null_lng = new_api_place();
        null_lng["location"]["longitude"] = Value::Null;
        assert!(normalize_place(&null_lng, SchemaShape::NewApi).is_none());
    }

    #[test]
    fn test_zero_coordinates_rejected() {
        let mut zero_lat = new_api_place();
        zero_lat["location"]["latitude"] = json!(0);
        assert!(normalize_place(&zero_lat, SchemaShape::NewApi).is_none());

        let mut zero_lng = new_api_place();
        zero_lng["location"]["longitude"] = json!(0.0);
        assert!(normalize_place(&zero_lng, SchemaShape::NewApi).is_none());

        let legacy = json!({"geometry": {"location": {"lat": 0.0, "lng": 0.0}}});
        assert!(normalize_place(&legacy, SchemaShape::Legacy).is_none());
    }

    #[test]
    fn test_missing_name_gets_placeholder() {
        let raw = json!({"location": {"latitude": 1.0, "longitude": 1.0}});
        let bar = normalize_place(&raw, SchemaShape::NewApi).unwrap();
        assert_eq!(bar.name, UNNAMED_BAR);
        assert!(bar.place_id.is_none());
        assert!(bar.types.is_empty());

        let raw = json!({"displayName": {}, "location": {"latitude": 1.0, "longitude": 1.0}});
        assert_eq!(normalize_place(&raw, SchemaShape::NewApi).unwrap().name, UNNAMED_BAR);

        let legacy = json!({"geometry": {"location": {"lat": 1.0, "lng": 1.0}}});
        assert_eq!(normalize_place(&legacy, SchemaShape::Legacy).unwrap().name, UNNAMED_BAR);
    }

    #[test]
    fn test_malformed_shape_rejected() {
        let mut raw = new_api_place();
        raw["displayName"] = json!("Tune Inn");
        assert_eq!(
            try_normalize(&raw, SchemaShape::NewApi),
            Err(NormalizeError::NotAnObject {
                path: "displayName".to_string()
            })
        );
        assert!(normalize_place(&raw, SchemaShape::NewApi).is_none());

        let mut raw = new_api_place();
        raw["location"]["latitude"] = json!("38.88");
        assert!(matches!(
            try_normalize(&raw, SchemaShape::NewApi),
            Err(NormalizeError::WrongType { .. })
        ));

        let mut raw = new_api_place();
        raw["location"] = json!([38.88, -77.0]);
        assert!(normalize_place(&raw, SchemaShape::NewApi).is_none());

        assert_eq!(
            try_normalize(&json!([1, 2]), SchemaShape::NewApi),
            Err(NormalizeError::NotAnObject {
                path: "<root>".to_string()
            })
        );
    }

    #[test]
    fn test_integral_float_rating_count_is_kept() {
        let mut raw = new_api_place();
        raw["userRatingCount"] = json!(2101.0);

        let bar = normalize_place(&raw, SchemaShape::NewApi).unwrap();
        assert_eq!(bar.user_ratings_total, Some(2101));

        raw["userRatingCount"] = json!(12.5);
        let bar = normalize_place(&raw, SchemaShape::NewApi).unwrap();
        assert!(bar.user_ratings_total.is_none());
    }

    #[test]
    fn test_wrong_typed_optional_fields_read_as_absent() {
        let mut raw = new_api_place();
        raw["rating"] = json!("4.5");
        raw["priceLevel"] = json!({"level": 2});
        raw["formattedAddress"] = json!(331);
        raw["id"] = json!(42);
        raw["displayName"]["text"] = json!(["Tune Inn"]);

        let bar = normalize_place(&raw, SchemaShape::NewApi).unwrap();
        assert_eq!(bar.name, UNNAMED_BAR);
        assert!(bar.rating.is_none());
        assert!(bar.price_level.is_none());
        assert!(bar.formatted_address.is_none());
        assert!(bar.place_id.is_none());
        assert_eq!((bar.lat, bar.lng), (38.8849, -76.9968));
    }

    #[test]
    fn test_types_keep_only_strings() {
        let mut raw = new_api_place();
        raw["types"] = json!("bar");
        assert!(normalize_place(&raw, SchemaShape::NewApi).unwrap().types.is_empty());

        raw["types"] = json!(["bar", 7, null, "food"]);
        assert_eq!(
            normalize_place(&raw, SchemaShape::NewApi).unwrap().types,
            vec!["bar", "food"]
        );
    }

    #[test]
    fn test_legacy_integral_float_price_level() {
        let raw = json!({
            "geometry": {"location": {"lat": 38.92, "lng": -77.04}},
            "price_level": 2.0
        });
        let bar = normalize_place(&raw, SchemaShape::Legacy).unwrap();
        assert_eq!(bar.price_level, Some(PriceLevel::Level(2)));
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let raw = new_api_place();
        assert_eq!(
            normalize_place(&raw, SchemaShape::NewApi),
            normalize_place(&raw, SchemaShape::NewApi)
        );
    }

    #[test]
    fn test_normalize_places_filters_and_keeps_order() {
        let raw = vec![
            json!({"displayName": {"text": "Tune Inn"}, "location": {"latitude": 1.0, "longitude": 1.0}}),
            json!({"displayName": {"text": "Nowhere"}, "location": {"latitude": 0, "longitude": 1.0}}),
            json!({"displayName": {"text": "Dan's Cafe"}, "location": {"latitude": 2.0, "longitude": 2.0}}),
        ];

        let bars = normalize_places(&raw, SchemaShape::NewApi);
        let names: Vec<_> = bars.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Tune Inn", "Dan's Cafe"]);
    }
}

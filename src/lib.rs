//! barscout - Collect bars around a location from Google Places and OpenStreetMap

pub mod api;
pub mod config;
pub mod domain;
pub mod osm;
pub mod output;
pub mod pipeline;
pub mod places;

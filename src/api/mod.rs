pub mod error;
pub mod overpass;
pub mod places;

pub use error::ApiError;
pub use overpass::{OverpassResponse, fetch_bars};
pub use places::{PlaceDetails, PlacesApi, PlacesClient, SearchTextRequest};

use serde_json::Value;
use tracing::{error, info};

use crate::api::{ApiError, PlacesApi, SearchTextRequest};

/// Run the text search, logging the outcome
///
/// No retry and no pagination: whatever the first page holds is the result.
pub fn search_places<A: PlacesApi + ?Sized>(
    api: &A,
    request: &SearchTextRequest,
) -> Result<Vec<Value>, ApiError> {
    info!(
        "Searching for \"{}\" within {}m of ({:.4}, {:.4})",
        request.text_query,
        request.location_bias.circle.radius,
        request.location_bias.circle.center.latitude,
        request.location_bias.circle.center.longitude
    );

    match api.search_text(request) {
        Ok(places) => {
            info!("Search returned {} places", places.len());
            Ok(places)
        }
        Err(e) => {
            error!("API request failed: {}", e);
            Err(e)
        }
    }
}

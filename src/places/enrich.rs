use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

use crate::api::{PlaceDetails, PlacesApi};
use crate::domain::BarRecord;

/// Overwrite the detail-backed fields of `bar`.
///
/// Every merged field is replaced, even when the detail response lacks it.
/// Rating, rating count and address from the details are ignored.
pub fn merge_details(bar: &mut BarRecord, details: &PlaceDetails) {
    bar.phone = details.phone().map(str::to_string);
    bar.website = details.website_uri.clone();
    bar.opening_hours = details.weekday_descriptions().to_vec();
    bar.price_level = details.price_level.clone();
    bar.types = details.types.clone();
}

/// Fetch and merge details for a single bar
///
/// # Returns
/// * `true` if details were fetched and merged
pub fn enrich_bar<A: PlacesApi + ?Sized>(api: &A, bar: &mut BarRecord) -> bool {
    let Some(place_id) = bar.place_id.as_deref() else {
        debug!("No place id for {}, skipping details", bar.name);
        return false;
    };

    match api.place_details(place_id) {
        Ok(Some(details)) => {
            merge_details(bar, &details);
            true
        }
        Ok(None) => {
            debug!("Empty details for {}, keeping search data", bar.name);
            false
        }
        Err(e) => {
            warn!("Failed to fetch details for {}: {}", bar.name, e);
            false
        }
    }
}

/// Enrich every bar in order, pausing `delay` after each one
///
/// `on_record` is called with the index of each bar before it is enriched.
/// The output has the same length and order as the input.
pub fn enrich_bars<A, F>(
    api: &A,
    bars: Vec<BarRecord>,
    delay: Duration,
    mut on_record: F,
) -> Vec<BarRecord>
where
    A: PlacesApi + ?Sized,
    F: FnMut(usize, &BarRecord),
{
    let total = bars.len();
    let mut enriched = Vec::with_capacity(total);

    for (index, mut bar) in bars.into_iter().enumerate() {
        on_record(index, &bar);
        debug!("Enriching bar {}/{}: {}", index + 1, total, bar.name);

        enrich_bar(api, &mut bar);
        enriched.push(bar);

        // Rate limiting, applied whether or not a request went out
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }

    enriched
}

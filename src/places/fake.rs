//! In-memory [`PlacesApi`] for exercising the pipeline without a network.

use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use crate::api::places::decode_details;
use crate::api::{ApiError, PlaceDetails, PlacesApi, SearchTextRequest};

#[derive(Default)]
pub struct FakePlaces {
    summaries: Vec<Value>,
    search_status: Option<u16>,
    details: HashMap<String, Value>,
    pub search_calls: Cell<usize>,
    pub detail_calls: RefCell<Vec<String>>,
}

impl FakePlaces {
    pub fn with_summaries(summaries: Vec<Value>) -> Self {
        Self {
            summaries,
            ..Default::default()
        }
    }

    pub fn failing_search(status: u16) -> Self {
        Self {
            search_status: Some(status),
            ..Default::default()
        }
    }

    /// Serve `details` for `place_id`; unknown ids answer 404
    pub fn with_details(mut self, place_id: &str, details: Value) -> Self {
        self.details.insert(place_id.to_string(), details);
        self
    }

    fn status(status: u16) -> ApiError {
        ApiError::Status {
            endpoint: "fake".to_string(),
            status,
            body: String::new(),
        }
    }
}

impl PlacesApi for FakePlaces {
    fn search_text(&self, _request: &SearchTextRequest) -> Result<Vec<Value>, ApiError> {
        self.search_calls.set(self.search_calls.get() + 1);
        match self.search_status {
            Some(status) => Err(Self::status(status)),
            None => Ok(self.summaries.clone()),
        }
    }

    fn place_details(&self, place_id: &str) -> Result<Option<PlaceDetails>, ApiError> {
        self.detail_calls.borrow_mut().push(place_id.to_string());
        let details = self.details.get(place_id).ok_or_else(|| Self::status(404))?;
        decode_details(details.clone()).map_err(|e| ApiError::decode("fake", e))
    }
}

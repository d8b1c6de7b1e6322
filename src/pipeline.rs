//! Search, normalize and enrich, in that order.
//!
//! ```text
//! Idle -> Searching -> Normalizing -> Enriching(0..n) -> Done
//!             |
//!             +-> Failed
//! ```
//!
//! Only a failed search ends the run early. Detail failures are logged and
//! the affected bar is kept as-is. Serialization is left to the caller.

use indicatif::ProgressBar;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info};

use crate::api::{ApiError, PlacesApi, SearchTextRequest};
use crate::config::PipelineConfig;
use crate::domain::BarRecord;
use crate::places::{SchemaShape, enrich_bars, normalize_places, search_places};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Searching,
    Normalizing,
    Enriching { index: usize, total: usize },
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Idle => write!(f, "idle"),
            Stage::Searching => write!(f, "searching"),
            Stage::Normalizing => write!(f, "normalizing"),
            Stage::Enriching { index, total } => write!(f, "enriching {}/{}", index + 1, total),
            Stage::Done => write!(f, "done"),
            Stage::Failed => write!(f, "failed"),
        }
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("search failed: {0}")]
    Search(#[from] ApiError),
}

pub struct BarPipeline<A> {
    api: A,
    config: PipelineConfig,
    stage: Stage,
    history: Vec<Stage>,
}

impl<A: PlacesApi> BarPipeline<A> {
    pub fn new(api: A, config: PipelineConfig) -> Self {
        Self {
            api,
            config,
            stage: Stage::Idle,
            history: Vec::new(),
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Every stage entered so far, oldest first
    pub fn history(&self) -> &[Stage] {
        &self.history
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    fn enter(&mut self, stage: Stage) {
        debug!("Pipeline stage: {} -> {}", self.stage, stage);
        self.stage = stage;
        self.history.push(stage);
    }

    /// Run the whole pipeline once
    ///
    /// # Arguments
    /// * `progress` - Advanced once per enriched bar; pass `ProgressBar::hidden()` when unused
    ///
    /// # Returns
    /// * `Ok(bars)` - Possibly empty if no summary had valid coordinates
    /// * `Err` - The search request failed
    pub fn run(&mut self, progress: &ProgressBar) -> Result<Vec<BarRecord>, PipelineError> {
        self.enter(Stage::Searching);
        let request = SearchTextRequest::new(
            &self.config.query,
            self.config.center,
            self.config.radius_m,
            self.config.max_results,
        );
        let places = match search_places(&self.api, &request) {
            Ok(places) => places,
            Err(e) => {
                self.enter(Stage::Failed);
                return Err(e.into());
            }
        };

        self.enter(Stage::Normalizing);
        let bars = normalize_places(&places, SchemaShape::NewApi);
        info!("Found {} bars with valid coordinates", bars.len());

        let bars = if self.config.enrich && !bars.is_empty() {
            let total = bars.len();
            progress.set_length(total as u64);

            let stage = &mut self.stage;
            let history = &mut self.history;
            let enriched = enrich_bars(&self.api, bars, self.config.delay, |index, bar| {
                *stage = Stage::Enriching { index, total };
                history.push(*stage);
                progress.set_position(index as u64);
                progress.set_message(bar.name.clone());
            });
            progress.set_position(total as u64);
            enriched
        } else {
            bars
        };

        self.enter(Stage::Done);
        Ok(bars)
    }
}

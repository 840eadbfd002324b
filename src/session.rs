//! Per-view state of the train graph: cache, reference train and the latest diagram.
//!
//! A reconstruction is split in three steps so that no borrow of the session
//! is held across an await: `begin` snapshots the inputs, the returned
//! `PendingReconstruction` runs on its own, and `finish` applies the result
//! unless a newer reconstruction or a snapshot change superseded it.

use std::rc::Rc;
use chrono::NaiveDateTime;
use crate::api::TimetableSource;
use crate::diagram::{
    nearest_line, reconstruct, CancellationSource, CancellationToken, CoordinateMapper, GraphError,
    GraphRequest, PlotArea, RouteCache, StationCache,
};
use crate::logging::log;
use crate::models::{GraphData, GraphSettings, StationId, Stop};
use crate::theme::ColorResolver;
use crate::timetable::pick_reference_train;

#[derive(Debug)]
pub struct GraphSession {
    cache: StationCache,
    routes: RouteCache,
    cancellation: CancellationSource,
    snapshot_id: String,
    reference_train: Option<String>,
    zoom: f64,
    force_refresh: bool,
    settings: GraphSettings,
    latest: Option<GraphData>,
}

/// Inputs captured by `GraphSession::begin`, ready to run
#[derive(Debug, Clone)]
pub struct PendingReconstruction {
    station: StationId,
    reference_train: String,
    seed_timetable: Rc<Vec<Stop>>,
    snapshot_id: String,
    now: NaiveDateTime,
    zoom: f64,
    settings: GraphSettings,
    cache: StationCache,
    routes: RouteCache,
    token: CancellationToken,
}

impl PendingReconstruction {
    #[must_use]
    pub fn reference_train(&self) -> &str {
        &self.reference_train
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    #[must_use]
    pub fn settings(&self) -> &GraphSettings {
        &self.settings
    }

    /// # Errors
    ///
    /// See [`reconstruct`].
    pub async fn run<S, C>(&self, source: &S, colors: &C) -> Result<GraphData, GraphError>
    where
        S: TimetableSource,
        C: ColorResolver + ?Sized,
    {
        let request = GraphRequest {
            reference_station: self.station.clone(),
            reference_train: self.reference_train.clone(),
            seed_timetable: Rc::clone(&self.seed_timetable),
            snapshot_id: &self.snapshot_id,
            now: self.now,
            zoom: self.zoom,
            settings: &self.settings,
        };
        reconstruct(source, &self.cache, &self.routes, &request, colors, &self.token).await
    }
}

impl GraphSession {
    #[must_use]
    pub fn new(snapshot_id: impl Into<String>, settings: GraphSettings) -> Self {
        Self {
            cache: StationCache::new(),
            routes: RouteCache::new(),
            cancellation: CancellationSource::new(),
            snapshot_id: snapshot_id.into(),
            reference_train: None,
            zoom: 1.0,
            force_refresh: false,
            settings: settings.sanitized(),
            latest: None,
        }
    }

    #[must_use]
    pub fn snapshot_id(&self) -> &str {
        &self.snapshot_id
    }

    #[must_use]
    pub fn reference_train(&self) -> Option<&str> {
        self.reference_train.as_deref()
    }

    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    #[must_use]
    pub fn settings(&self) -> &GraphSettings {
        &self.settings
    }

    #[must_use]
    pub fn cache(&self) -> &StationCache {
        &self.cache
    }

    #[must_use]
    pub fn routes(&self) -> &RouteCache {
        &self.routes
    }

    #[must_use]
    pub fn latest(&self) -> Option<&GraphData> {
        self.latest.as_ref()
    }

    /// Switch to another server snapshot; returns whether it changed
    ///
    /// Cached timetables and routes belong to the old snapshot, and in-flight
    /// reconstructions are cancelled.
    pub fn set_snapshot(&mut self, snapshot_id: &str) -> bool {
        if self.snapshot_id == snapshot_id {
            return false;
        }
        log!("Snapshot changed from {} to {}", self.snapshot_id, snapshot_id);
        self.snapshot_id = snapshot_id.to_string();
        self.cache.clear();
        self.routes.clear();
        self.cancellation.cancel_all();
        true
    }

    /// Replace the settings used by the next reconstruction; returns whether
    /// anything changed
    pub fn set_settings(&mut self, settings: GraphSettings) -> bool {
        let settings = settings.sanitized();
        if settings == self.settings {
            return false;
        }
        self.settings = settings;
        true
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = if zoom > 0.0 { zoom } else { 1.0 };
    }

    pub fn select_reference_train(&mut self, train_number: impl Into<String>) {
        self.reference_train = Some(train_number.into());
    }

    /// Pick the reference train afresh on the next reconstruction
    pub fn request_refresh(&mut self) {
        self.force_refresh = true;
    }

    /// Capture the inputs of a reconstruction around `station`
    ///
    /// The current reference train is kept while it is still in the seed
    /// timetable; otherwise (or after `request_refresh`) the next train to
    /// depart after `now` takes over. Any reconstruction still running is
    /// cancelled.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::NoDepartures` if a new reference train is needed
    /// and no train departs from `station` after `now`.
    pub fn begin(
        &mut self,
        station: StationId,
        seed_timetable: Rc<Vec<Stop>>,
        now: NaiveDateTime,
    ) -> Result<PendingReconstruction, GraphError> {
        let keep = !self.force_refresh
            && self
                .reference_train
                .as_deref()
                .is_some_and(|train| seed_timetable.iter().any(|row| row.train_number == train));

        if !keep {
            let picked = pick_reference_train(&seed_timetable, now)
                .map(|row| row.train_number.clone())
                .ok_or_else(|| GraphError::NoDepartures {
                    station: station.clone(),
                })?;
            log!("Reference train set to {}", picked);
            self.reference_train = Some(picked);
        }
        self.force_refresh = false;

        let reference_train = self.reference_train.clone().unwrap_or_default();
        Ok(PendingReconstruction {
            station,
            reference_train,
            seed_timetable,
            snapshot_id: self.snapshot_id.clone(),
            now,
            zoom: self.zoom,
            settings: self.settings.clone(),
            cache: self.cache.clone(),
            routes: self.routes.clone(),
            token: self.cancellation.renew(),
        })
    }

    /// Apply the outcome of `pending`
    ///
    /// Returns `Ok(true)` when the diagram was replaced and `Ok(false)` when
    /// the result was stale and dropped.
    ///
    /// # Errors
    ///
    /// Passes through reconstruction errors other than cancellation. A missing
    /// reference train also clears the selection so the next attempt picks a
    /// new one.
    pub fn finish(
        &mut self,
        pending: &PendingReconstruction,
        result: Result<GraphData, GraphError>,
    ) -> Result<bool, GraphError> {
        if pending.is_cancelled() {
            log!("Dropping stale diagram for train {}", pending.reference_train);
            return Ok(false);
        }
        match result {
            Ok(graph) => {
                self.latest = Some(graph);
                Ok(true)
            }
            Err(GraphError::Cancelled) => Ok(false),
            Err(e) => {
                if matches!(e, GraphError::ReferenceTrainMissing { .. }) {
                    self.reference_train = None;
                }
                Err(e)
            }
        }
    }

    /// Make the line under `(x, y)` the reference train
    ///
    /// Returns the selected train number; clicks outside the plot or with no
    /// diagram select nothing.
    pub fn select_at(&mut self, x: f64, y: f64, plot: PlotArea) -> Option<String> {
        if !plot.contains(x, y) {
            return None;
        }
        let graph = self.latest.as_ref()?;
        let mapper = CoordinateMapper::new(graph, plot, self.settings.track_offset_px);
        let train = nearest_line(&graph.lines, &mapper, x, y)?.to_string();
        log!("Selected train {} at ({:.1}, {:.1})", train, x, y);
        self.reference_train = Some(train.clone());
        Some(train)
    }

    /// Instant under a canvas `x` of the latest diagram
    #[must_use]
    pub fn time_at(&self, x: f64, plot: PlotArea) -> Option<NaiveDateTime> {
        if x < plot.x || x > plot.x + plot.width {
            return None;
        }
        let graph = self.latest.as_ref()?;
        Some(CoordinateMapper::new(graph, plot, self.settings.track_offset_px).time_at(x))
    }
}

mod cache;
mod cancel;
mod distance;
mod lines;
mod mapper;
mod ordering;
mod walker;

pub use cache::{RouteCache, StationCache};
pub use cancel::{CancellationSource, CancellationToken};
pub use distance::{backfill, build_posts, estimate_distances};
pub use hit_test::{distance_to_line, nearest_line};
pub use lines::{build_lines, row_nodes};
pub use mapper::{map_station, map_time, track_offset, CoordinateMapper, PlotArea};
pub use ordering::{reorder, reorder_nodes};
pub use walker::{
    is_even_train_number, order_for_train, walk, ChainWalk, Direction, PostRecord, WalkRequest,
};

use std::fmt;
use std::rc::Rc;
use chrono::NaiveDateTime;
use crate::logging::log;
use crate::api::TimetableSource;
use crate::models::{GraphData, GraphSettings, StationId, Stop};
use crate::theme::ColorResolver;
use crate::time::TimeWindow;

/// Why a reconstruction produced no diagram
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// The reference train has no row in its own station's timetable
    ReferenceTrainMissing { train: String, station: StationId },
    /// No train departs from the reference station after the current instant
    NoDepartures { station: StationId },
    /// A newer reconstruction or a snapshot change superseded this one
    Cancelled,
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::ReferenceTrainMissing { train, station } => {
                write!(f, "No data available: train {train} is not in the timetable of station {station}")
            }
            GraphError::NoDepartures { station } => {
                write!(f, "No data available: no departures from station {station}")
            }
            GraphError::Cancelled => write!(f, "Reconstruction cancelled"),
        }
    }
}

impl std::error::Error for GraphError {}

/// Inputs of one reconstruction
#[derive(Debug, Clone)]
pub struct GraphRequest<'a> {
    pub reference_station: StationId,
    pub reference_train: String,
    pub seed_timetable: Rc<Vec<Stop>>,
    pub snapshot_id: &'a str,
    pub now: NaiveDateTime,
    pub zoom: f64,
    pub settings: &'a GraphSettings,
}

impl GraphRequest<'_> {
    /// Visible window around `now` for the requested zoom
    #[must_use]
    pub fn window(&self) -> TimeWindow {
        TimeWindow::with_span(
            self.now,
            self.zoom,
            self.settings.look_back_minutes,
            self.settings.look_ahead_minutes,
        )
    }
}

/// Assemble the diagram from walked records already in axis order
///
/// `route` is the reference train's full route, used for spacing only.
#[must_use]
pub fn build_graph<C: ColorResolver + ?Sized>(
    records: &[PostRecord],
    route: &[Stop],
    reference_train: &str,
    window: TimeWindow,
    slack_minutes: f64,
    colors: &C,
) -> GraphData {
    let posts = build_posts(records, route);
    let lines = build_lines(records, &window.widened(slack_minutes), colors)
        .into_iter()
        .map(reorder)
        .collect();
    let reference_index = records.iter().position(|r| r.offset == 0).unwrap_or(0);

    GraphData {
        time_window_start: window.start,
        time_window_end: window.end,
        posts,
        lines,
        reference_train: reference_train.to_string(),
        reference_index,
    }
}

#[cfg(all(target_arch = "wasm32", feature = "perf_timing"))]
fn now_ms() -> Option<f64> {
    web_sys::window()?.performance().map(|p| p.now())
}

/// Rebuild the diagram: walk the stations, fetch the reference route and
/// lay out every train seen at the walked stations
///
/// Station rows go through `cache` and the reference route through `routes`;
/// failed or empty route fetches are not cached.
///
/// # Errors
///
/// `GraphError::ReferenceTrainMissing` when the reference train is not in the
/// seed timetable, `GraphError::Cancelled` when `token` went stale during a
/// fetch. Every other failure degrades the diagram instead of failing it.
pub async fn reconstruct<S, C>(
    source: &S,
    cache: &StationCache,
    routes: &RouteCache,
    request: &GraphRequest<'_>,
    colors: &C,
    token: &CancellationToken,
) -> Result<GraphData, GraphError>
where
    S: TimetableSource,
    C: ColorResolver + ?Sized,
{
    #[cfg(all(target_arch = "wasm32", feature = "perf_timing"))]
    let started = now_ms();

    log!(
        "Reconstructing around station {} for train {}",
        request.reference_station,
        request.reference_train
    );

    let records = walk(
        source,
        cache,
        request.snapshot_id,
        &request.reference_station,
        &request.reference_train,
        Rc::clone(&request.seed_timetable),
        request.settings.target_stations,
        token,
    )
    .await?;

    let route = match routes.get(&request.reference_train) {
        Some(route) => route,
        None => {
            let fetched = source
                .train_timetable(&request.reference_train, request.snapshot_id)
                .await;
            if token.is_cancelled() {
                return Err(GraphError::Cancelled);
            }
            match fetched {
                Ok(route) if !route.is_empty() => routes.insert(&request.reference_train, route),
                Ok(_) => Rc::new(Vec::new()),
                Err(e) => {
                    leptos::logging::warn!("Failed to fetch route of train {}: {}", request.reference_train, e);
                    Rc::new(Vec::new())
                }
            }
        }
    };

    let records = order_for_train(records, &request.reference_train);
    let graph = build_graph(
        &records,
        &route,
        &request.reference_train,
        request.window(),
        request.settings.window_slack_minutes,
        colors,
    );

    #[cfg(all(target_arch = "wasm32", feature = "perf_timing"))]
    if let Some(elapsed) = started.and_then(|s| now_ms().map(|n| n - s)) {
        log!("Reconstruction finished in {:.2}ms: {} posts, {} lines", elapsed, graph.posts.len(), graph.lines.len());
    }

    Ok(graph)
}

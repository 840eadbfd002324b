use std::rc::Rc;
use chrono::NaiveDateTime;
use leptos::{
    create_effect, create_signal, spawn_local, store_value, ReadSignal, Signal, SignalGet,
    SignalGetUntracked, SignalSet, SignalUpdate, StoredValue, WriteSignal,
};
use crate::api::TimetableSource;
use crate::diagram::{GraphError, PlotArea};
use crate::models::{GraphData, GraphSettings, StationId, Stop};
use crate::session::GraphSession;
use crate::theme::TrainTypeColors;

/// Reactive handle returned by [`use_train_graph`]
#[derive(Clone, Copy)]
pub struct TrainGraphHandle {
    pub graph: ReadSignal<Option<GraphData>>,
    pub error: ReadSignal<Option<String>>,
    session: StoredValue<GraphSession>,
    set_revision: WriteSignal<u64>,
}

impl TrainGraphHandle {
    /// Hit-test a click and rebuild around the selected train
    pub fn select_at(&self, x: f64, y: f64, plot: PlotArea) -> Option<String> {
        let selected = self.session.try_update_value(|s| s.select_at(x, y, plot)).flatten();
        if selected.is_some() {
            self.set_revision.update(|r| *r += 1);
        }
        selected
    }

    /// Re-pick the reference train from the current instant and rebuild
    pub fn force_refresh(&self) {
        self.session.update_value(GraphSession::request_refresh);
        self.set_revision.update(|r| *r += 1);
    }

    /// Instant under a canvas `x`, for hover readouts
    #[must_use]
    pub fn time_at(&self, x: f64, plot: PlotArea) -> Option<NaiveDateTime> {
        self.session.try_with_value(|s| s.time_at(x, plot)).flatten()
    }

    /// Apply new settings, persist them and rebuild
    pub fn update_settings(&self, settings: GraphSettings) {
        let changed = self.session.try_update_value(|s| s.set_settings(settings)).unwrap_or(false);
        if !changed {
            return;
        }
        #[cfg(target_arch = "wasm32")]
        if let Some(Err(e)) = self.session.try_with_value(|s| s.settings().save()) {
            leptos::logging::warn!("Failed to save graph settings: {}", e);
        }
        self.set_revision.update(|r| *r += 1);
    }

    #[must_use]
    pub fn settings(&self) -> Option<GraphSettings> {
        self.session.try_with_value(|s| s.settings().clone())
    }

    #[must_use]
    pub fn reference_train(&self) -> Option<String> {
        self.session
            .try_with_value(|s| s.reference_train().map(str::to_string))
            .flatten()
    }
}

/// Keep a train graph in sync with the selected station, snapshot, clock and zoom
///
/// Every change of an input starts a new reconstruction; results of
/// superseded reconstructions are dropped.
pub fn use_train_graph<S: TimetableSource + 'static>(
    source: Rc<S>,
    station: Signal<StationId>,
    timetable: Signal<Vec<Stop>>,
    snapshot_id: Signal<String>,
    now: Signal<NaiveDateTime>,
    zoom: Signal<f64>,
    settings: GraphSettings,
) -> TrainGraphHandle {
    let session = store_value(GraphSession::new(snapshot_id.get_untracked(), settings));
    let (graph, set_graph) = create_signal(None::<GraphData>);
    let (error, set_error) = create_signal(None::<String>);
    let (revision, set_revision) = create_signal(0u64);

    create_effect(move |_| {
        let station = station.get();
        let seed = Rc::new(timetable.get());
        let snapshot = snapshot_id.get();
        let now = now.get();
        let zoom = zoom.get();
        revision.get();

        let pending = session.try_update_value(|s| {
            s.set_snapshot(&snapshot);
            s.set_zoom(zoom);
            s.begin(station, seed, now)
        });
        let pending = match pending {
            Some(Ok(pending)) => pending,
            Some(Err(e)) => {
                set_error.set(Some(e.to_string()));
                return;
            }
            None => return,
        };

        let source = Rc::clone(&source);
        spawn_local(async move {
            let colors = TrainTypeColors::new(pending.settings().theme);
            let result = pending.run(source.as_ref(), &colors).await;
            let applied = session.try_update_value(|s| {
                s.finish(&pending, result)
                    .map(|replaced| if replaced { s.latest().cloned() } else { None })
            });
            match applied {
                Some(Ok(Some(latest))) => {
                    set_graph.set(Some(latest));
                    set_error.set(None);
                }
                Some(Err(e @ GraphError::ReferenceTrainMissing { .. })) => {
                    leptos::logging::warn!("{}; picking a new reference train", e);
                    set_revision.update(|r| *r += 1);
                }
                Some(Err(e)) => {
                    leptos::logging::error!("Train graph failed: {}", e);
                    set_error.set(Some(e.to_string()));
                }
                Some(Ok(None)) | None => {}
            }
        });
    });

    TrainGraphHandle {
        graph,
        error,
        session,
        set_revision,
    }
}

/// [`use_train_graph`] with the settings last saved in this browser
pub fn use_stored_train_graph<S: TimetableSource + 'static>(
    source: Rc<S>,
    station: Signal<StationId>,
    timetable: Signal<Vec<Stop>>,
    snapshot_id: Signal<String>,
    now: Signal<NaiveDateTime>,
    zoom: Signal<f64>,
) -> TrainGraphHandle {
    use_train_graph(source, station, timetable, snapshot_id, now, zoom, GraphSettings::load_or_default())
}

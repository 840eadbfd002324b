use std::cell::Cell;
use std::collections::HashMap;
use super::TimetableSource;
use crate::models::{ServerTrain, StationId, Stop};
use crate::timetable::{station_timetable, train_route};

/// Timetable source over train lists held in memory, one list per snapshot
///
/// Used for offline snapshots and as the fake upstream in tests. Counts
/// station and route fetches so callers can check cache behaviour.
#[derive(Debug, Default)]
pub struct InMemoryTimetableSource {
    snapshots: HashMap<String, Vec<ServerTrain>>,
    station_fetches: Cell<usize>,
    train_fetches: Cell<usize>,
}

impl InMemoryTimetableSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_snapshot(mut self, snapshot_id: &str, trains: Vec<ServerTrain>) -> Self {
        self.snapshots.insert(snapshot_id.to_string(), trains);
        self
    }

    #[must_use]
    pub fn station_fetches(&self) -> usize {
        self.station_fetches.get()
    }

    #[must_use]
    pub fn train_fetches(&self) -> usize {
        self.train_fetches.get()
    }

    fn trains(&self, snapshot_id: &str) -> Result<&[ServerTrain], String> {
        self.snapshots
            .get(snapshot_id)
            .map(Vec::as_slice)
            .ok_or_else(|| format!("Unknown snapshot: {snapshot_id}"))
    }
}

impl TimetableSource for InMemoryTimetableSource {
    async fn station_timetable(&self, station: &StationId, snapshot_id: &str) -> Result<Vec<Stop>, String> {
        self.station_fetches.set(self.station_fetches.get() + 1);
        Ok(station_timetable(station, self.trains(snapshot_id)?))
    }

    async fn train_timetable(&self, train_number: &str, snapshot_id: &str) -> Result<Vec<Stop>, String> {
        self.train_fetches.set(self.train_fetches.get() + 1);
        self.trains(snapshot_id)?
            .iter()
            .find(|train| train.train_number == train_number)
            .map(train_route)
            .ok_or_else(|| format!("Unknown train: {train_number}"))
    }
}

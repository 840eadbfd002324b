//! Per-station timetables derived from a server's train list.

use chrono::NaiveDateTime;
use crate::models::{Checkpoint, ServerTrain, StationId, Stop};
use crate::time::is_route_end;

fn stop_from_checkpoint(
    train: &ServerTrain,
    checkpoint: &Checkpoint,
    previous: Option<&Checkpoint>,
    next: Option<&Checkpoint>,
) -> Stop {
    Stop {
        train_number: train.train_number.clone(),
        station_point_id: checkpoint.point_id.clone(),
        station_name: checkpoint.name_for_person.clone(),
        from_station_id: previous.map(|p| p.point_id.clone()),
        to_station_id: next.map(|n| n.point_id.clone()),
        scheduled_arrival: checkpoint.arrival_time,
        scheduled_departure: checkpoint.departure_time,
        stop_type: checkpoint.stop_type_number,
        track: checkpoint.track,
        platform: checkpoint.platform.clone(),
        mileage_km: checkpoint.mileage,
        line: checkpoint.line_code(),
        train_type: checkpoint
            .train_type
            .clone()
            .unwrap_or_else(|| train.train_type.clone()),
        max_speed: checkpoint.max_speed,
    }
}

/// Rows of every train calling at (or passing) `station`, sorted by arrival
///
/// Each row links to the neighbouring checkpoints of its train's route, so
/// the walker can follow a train from station to station.
#[must_use]
pub fn station_timetable(station: &StationId, trains: &[ServerTrain]) -> Vec<Stop> {
    let mut rows: Vec<Stop> = trains
        .iter()
        .filter_map(|train| {
            let index = train
                .timetable
                .iter()
                .position(|checkpoint| &checkpoint.point_id == station)?;
            let previous = index.checked_sub(1).and_then(|i| train.timetable.get(i));
            let next = train.timetable.get(index + 1);
            Some(stop_from_checkpoint(train, &train.timetable[index], previous, next))
        })
        .collect();

    rows.sort_by_key(|row| row.scheduled_arrival);
    rows
}

/// The full route of one train as timetable rows, in route order
#[must_use]
pub fn train_route(train: &ServerTrain) -> Vec<Stop> {
    let route = &train.timetable;
    route
        .iter()
        .enumerate()
        .map(|(i, checkpoint)| {
            let previous = i.checked_sub(1).and_then(|p| route.get(p));
            stop_from_checkpoint(train, checkpoint, previous, route.get(i + 1))
        })
        .collect()
}

/// First train departing strictly after `now`, by scheduled departure
///
/// Rows ending their route at this station never depart and are skipped.
#[must_use]
pub fn pick_reference_train(timetable: &[Stop], now: NaiveDateTime) -> Option<&Stop> {
    timetable
        .iter()
        .filter(|row| !is_route_end(row.scheduled_departure) && row.scheduled_departure > now)
        .min_by_key(|row| row.scheduled_departure)
}

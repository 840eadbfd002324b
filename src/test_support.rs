//! Fixtures shared by the unit tests.

use std::future::Future;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use crate::constants::{ROUTE_END, ROUTE_START};
use crate::models::{Checkpoint, ServerTrain, StationId, StopType};

pub const SNAPSHOT: &str = "pl1";

/// Run a future to completion on a fresh current-thread runtime
pub fn block_on<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("test runtime should build")
        .block_on(future)
}

pub fn at(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 1)
        .and_then(|d| d.and_hms_opt(h, m, 0))
        .expect("valid time")
}

/// A train calling at `stations` in order, 10 minutes per hop. Intermediate
/// stations at odd positions are required stops with a 1 minute dwell, the
/// others are passed. Mileage grows 5 km per station on line 133.
pub fn linear_train(number: &str, stations: &[&str], start_hour: u32, start_minute: u32) -> ServerTrain {
    let mut time = at(start_hour, start_minute);
    let last = stations.len().saturating_sub(1);
    let mut timetable = Vec::with_capacity(stations.len());

    for (i, id) in stations.iter().enumerate() {
        let endpoint = i == 0 || i == last;
        let stop_type = if endpoint || i % 2 == 1 { StopType::RequiredStop } else { StopType::Pass };
        let dwell = if !endpoint && stop_type == StopType::RequiredStop { 1 } else { 0 };

        let arrival = if i == 0 { ROUTE_START } else { time };
        time += Duration::minutes(dwell);
        let departure = if i == last { ROUTE_END } else { time };
        time += Duration::minutes(10);

        #[allow(clippy::cast_precision_loss)]
        let mileage = 5.0 * i as f64;
        timetable.push(Checkpoint {
            point_id: StationId::from(*id),
            name_for_person: Some(format!("Station {id}")),
            arrival_time: arrival,
            departure_time: departure,
            stop_type_number: stop_type,
            track: Some(1),
            platform: None,
            max_speed: None,
            line: Some(serde_json::json!(133)),
            mileage: Some(mileage),
            train_type: None,
        });
    }

    ServerTrain {
        train_number: number.to_string(),
        train_type: "RPJ".to_string(),
        timetable,
    }
}

/// Eight stations S1..S8 in a row with a handful of trains on them
pub fn corridor() -> Vec<ServerTrain> {
    let stations = ["S1", "S2", "S3", "S4", "S5", "S6", "S7", "S8"];
    let mut reversed = stations;
    reversed.reverse();
    vec![
        linear_train("4423", &stations, 10, 0),
        linear_train("4422", &stations, 10, 5),
        linear_train("1001", &reversed, 10, 0),
        linear_train("2002", &stations[2..6], 10, 30),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_on_resumes_suspended_futures() {
        let value = block_on(async {
            let mut total = 0;
            for step in 1..=3 {
                tokio::task::yield_now().await;
                total += step;
            }
            total
        });
        assert_eq!(value, 6);
    }
}

//! Timetable rows of the walked stations turned into per-train polylines.

use std::collections::HashMap;
use chrono::NaiveDateTime;
use indexmap::IndexMap;
use super::walker::PostRecord;
use crate::models::{GraphLine, GraphPoint, Stop, StopType};
use crate::theme::ColorResolver;
use crate::time::{is_route_end, is_route_start, TimeWindow};

/// Arrival and departure as drawn: a sentinel end collapses onto the other end
fn node_times(row: &Stop) -> (NaiveDateTime, NaiveDateTime) {
    let arrival = row.scheduled_arrival;
    let departure = row.scheduled_departure;
    match (is_route_start(arrival), is_route_end(departure)) {
        (true, false) => (departure, departure),
        (false, true) => (arrival, arrival),
        _ => (arrival, departure),
    }
}

fn is_visible(row: &Stop, window: &TimeWindow) -> bool {
    if is_route_start(row.scheduled_arrival) {
        return true;
    }
    let (arrival, departure) = node_times(row);
    window.intersects(arrival, departure)
}

/// Nodes one row contributes at `station_index`
#[must_use]
pub fn row_nodes(row: &Stop, station_index: usize) -> Vec<GraphPoint> {
    let (arrival, departure) = node_times(row);
    match row.stop_type {
        StopType::Pass => vec![GraphPoint {
            time: departure,
            station_index,
            track_index: 0,
            stop_type: None,
        }],
        StopType::RequiredStop | StopType::OptionalStop => {
            let track_index = row.track_index();
            vec![
                GraphPoint {
                    time: arrival,
                    station_index,
                    track_index,
                    stop_type: Some(row.stop_type),
                },
                GraphPoint {
                    time: departure,
                    station_index,
                    track_index,
                    stop_type: None,
                },
            ]
        }
    }
}

/// Latest line of a train plus the number of segments it has so far
struct TrainSegments {
    latest: usize,
    count: usize,
}

/// Build polylines from `records` in station-axis order
///
/// `window` is the already widened visibility window. A train's row extends
/// its latest line when that line ended at an adjacent station, otherwise a
/// new segment starts. Lines come back in creation order.
#[must_use]
pub fn build_lines<C: ColorResolver + ?Sized>(
    records: &[PostRecord],
    window: &TimeWindow,
    colors: &C,
) -> Vec<GraphLine> {
    let mut lines: IndexMap<String, GraphLine> = IndexMap::new();
    let mut segments: HashMap<&str, TrainSegments> = HashMap::new();

    for (station_index, record) in records.iter().enumerate() {
        for row in record.all_rows.iter().filter(|row| is_visible(row, window)) {
            let nodes = row_nodes(row, station_index);

            let continues = segments.get(row.train_number.as_str()).and_then(|train| {
                let line = lines.get_index(train.latest)?.1;
                let last = line.last_station_index()?;
                (last.abs_diff(station_index) == 1).then_some(train.latest)
            });

            if let Some(position) = continues {
                if let Some((_, line)) = lines.get_index_mut(position) {
                    line.nodes.extend(nodes);
                }
                continue;
            }

            let segment = segments.get(row.train_number.as_str()).map_or(0, |train| train.count);
            let id = GraphLine::segment_id(&row.train_number, segment);
            let (position, _) = lines.insert_full(
                id.clone(),
                GraphLine {
                    id,
                    train_number: row.train_number.clone(),
                    color: colors.color_for(&row.train_type),
                    nodes,
                },
            );
            segments.insert(
                row.train_number.as_str(),
                TrainSegments {
                    latest: position,
                    count: segment + 1,
                },
            );
        }
    }

    lines.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;
    use crate::constants::{ROUTE_END, ROUTE_START};
    use crate::test_support::at;
    use crate::theme::{Theme, TrainTypeColors};

    fn record(station: &str, rows: Vec<Stop>) -> PostRecord {
        let matched_row = rows.first().cloned().unwrap_or_else(|| Stop::new("0", station));
        PostRecord {
            offset: 0,
            station_id: station.into(),
            all_rows: Rc::new(rows),
            matched_row,
        }
    }

    fn window() -> TimeWindow {
        TimeWindow {
            start: at(9, 0),
            end: at(12, 0),
        }
    }

    fn stop(train: &str, station: &str, h: u32, m: u32) -> Stop {
        Stop::new(train, station)
            .with_times(at(h, m), at(h, m + 1))
            .with_stop_type(StopType::RequiredStop, Some(2))
            .with_train_type("EIP")
    }

    fn pass(train: &str, station: &str, h: u32, m: u32) -> Stop {
        Stop::new(train, station).with_times(at(h, m), at(h, m))
    }

    fn build(records: &[PostRecord]) -> Vec<GraphLine> {
        build_lines(records, &window(), &TrainTypeColors::new(Theme::Light))
    }

    #[test]
    fn test_stop_yields_arrival_and_departure() {
        let lines = build(&[record("A", vec![stop("1", "A", 10, 0)])]);
        assert_eq!(lines.len(), 1);
        let nodes = &lines[0].nodes;
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].stop_type, Some(StopType::RequiredStop));
        assert_eq!(nodes[1].stop_type, None);
        assert!(nodes[0].time <= nodes[1].time);
        assert_eq!(nodes[0].track_index, 2);
        assert_eq!(nodes[1].track_index, 2);
        assert_eq!(nodes[0].station_index, nodes[1].station_index);
        assert_eq!(lines[0].color, "#3b82f6");
    }

    #[test]
    fn test_pass_yields_one_node_on_track_zero() {
        let row = pass("1", "A", 10, 0).with_stop_type(StopType::Pass, Some(3));
        let lines = build(&[record("A", vec![row])]);
        assert_eq!(lines[0].nodes.len(), 1);
        assert_eq!(lines[0].nodes[0].track_index, 0);
        assert_eq!(lines[0].color, "purple");
    }

    #[test]
    fn test_adjacent_stations_share_a_segment() {
        let lines = build(&[
            record("A", vec![stop("1", "A", 10, 0)]),
            record("B", vec![pass("1", "B", 10, 10)]),
            record("C", vec![stop("1", "C", 10, 20)]),
        ]);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].id, "1_0");
        let indices: Vec<_> = lines[0].nodes.iter().map(|n| n.station_index).collect();
        assert_eq!(indices, vec![0, 0, 1, 2, 2]);
    }

    #[test]
    fn test_gap_starts_a_new_segment() {
        let lines = build(&[
            record("A", vec![stop("1", "A", 10, 0)]),
            record("B", vec![]),
            record("C", vec![stop("1", "C", 10, 20)]),
            record("D", vec![pass("1", "D", 10, 30)]),
        ]);
        let ids: Vec<_> = lines.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["1_0", "1_1"]);
        assert_eq!(lines[1].nodes.len(), 3);

        for line in &lines {
            assert!(line
                .nodes
                .windows(2)
                .all(|w| w[0].station_index.abs_diff(w[1].station_index) <= 1));
        }
    }

    #[test]
    fn test_rows_outside_the_window_are_skipped() {
        let lines = build(&[record("A", vec![stop("1", "A", 7, 0), stop("2", "A", 10, 0)])]);
        let trains: Vec<_> = lines.iter().map(|l| l.train_number.as_str()).collect();
        assert_eq!(trains, vec!["2"]);
    }

    #[test]
    fn test_route_start_rows_are_never_filtered() {
        let row = Stop::new("1", "A").with_times(ROUTE_START, at(20, 0));
        let lines = build(&[record("A", vec![row])]);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].nodes[0].time, at(20, 0));
    }

    #[test]
    fn test_route_end_collapses_onto_arrival() {
        let row = Stop::new("1", "A")
            .with_times(at(10, 0), ROUTE_END)
            .with_stop_type(StopType::OptionalStop, None);
        let lines = build(&[record("A", vec![row])]);
        let nodes = &lines[0].nodes;
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].stop_type, Some(StopType::OptionalStop));
        assert_eq!(nodes[1].time, at(10, 0));
        assert_eq!(nodes[0].track_index, 0);
    }

    #[test]
    fn test_decoded_terminating_row_stays_inside_the_window() {
        let row: Stop = serde_json::from_str(
            r#"{"trainNoLocal":"1","pointId":"A","scheduledArrivalObject":"2024-05-01T10:00:00.000Z","scheduledDepartureObject":"3001-01-31T00:00:00.000Z","stopTypeNumber":1}"#,
        )
        .expect("row should decode");
        let lines = build(&[record("A", vec![row])]);
        let times: Vec<_> = lines[0].nodes.iter().map(|n| n.time).collect();
        assert_eq!(times, vec![at(10, 0), at(10, 0)]);

        // Arrived before the window opened, so it is not drawn at all
        let early: Stop = serde_json::from_str(
            r#"{"trainNoLocal":"2","pointId":"A","scheduledArrivalObject":"2024-05-01T07:00:00Z","scheduledDepartureObject":"3001-01-30T23:00:00Z","stopTypeNumber":1}"#,
        )
        .expect("row should decode");
        assert!(build(&[record("A", vec![early])]).is_empty());
    }
}

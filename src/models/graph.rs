use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use super::StopType;
use crate::constants::UNRESOLVED_DISTANCE;
use crate::time::TimeWindow;

/// One station on the distance axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphPost {
    pub name: String,
    /// Spacing to the previous post; `UNRESOLVED_DISTANCE` until backfilled
    pub distance_from_previous: f64,
}

impl GraphPost {
    #[must_use]
    pub fn unresolved(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            distance_from_previous: UNRESOLVED_DISTANCE,
        }
    }
}

/// A polyline vertex: a train at a station at an instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphPoint {
    pub time: NaiveDateTime,
    pub station_index: usize,
    pub track_index: u32,
    /// Set on the arrival node of a stop; passes and departures carry none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_type: Option<StopType>,
}

/// One contiguous run of a train through the visible stations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphLine {
    pub id: String,
    pub train_number: String,
    pub color: String,
    pub nodes: Vec<GraphPoint>,
}

impl GraphLine {
    /// Line id of a train's `segment`-th run, e.g. `"4422_1"`
    #[must_use]
    pub fn segment_id(train_number: &str, segment: usize) -> String {
        format!("{train_number}_{segment}")
    }

    #[must_use]
    pub fn last_station_index(&self) -> Option<usize> {
        self.nodes.last().map(|node| node.station_index)
    }
}

/// Everything a renderer needs to draw the diagram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    pub time_window_start: NaiveDateTime,
    pub time_window_end: NaiveDateTime,
    pub posts: Vec<GraphPost>,
    pub lines: Vec<GraphLine>,
    pub reference_train: String,
    /// Post index of the reference station
    pub reference_index: usize,
}

impl GraphData {
    #[must_use]
    pub fn window(&self) -> TimeWindow {
        TimeWindow {
            start: self.time_window_start,
            end: self.time_window_end,
        }
    }

    /// Lines belonging to one train, in creation order
    pub fn lines_of<'a>(&'a self, train_number: &'a str) -> impl Iterator<Item = &'a GraphLine> + 'a {
        self.lines.iter().filter(move |line| line.train_number == train_number)
    }
}

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use crate::models::{GraphData, GraphPoint, GraphPost};
use crate::time::{millis_since, TimeWindow};

/// Drawing area of the diagram in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotArea {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

/// Pixel offset for a track: none for 0, one side for even, the other for odd
#[must_use]
pub fn track_offset(track_index: u32, offset_px: f64) -> f64 {
    match track_index {
        0 => 0.0,
        t if t % 2 == 0 => -offset_px,
        _ => offset_px,
    }
}

/// `x` for `time` inside `window`, linear over the plot width
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn map_time(time: NaiveDateTime, window: &TimeWindow, plot: &PlotArea) -> f64 {
    let span = window.span_ms();
    if span == 0 {
        return plot.x;
    }
    plot.x + plot.width * millis_since(window.start, time) as f64 / span as f64
}

/// Cumulative distance fraction of every post, first post at 0
fn cumulative_fractions(posts: &[GraphPost]) -> Vec<f64> {
    let total: f64 = posts.iter().map(|p| p.distance_from_previous).sum();
    let mut running = 0.0;
    posts
        .iter()
        .map(|post| {
            running += post.distance_from_previous;
            if total > 0.0 {
                running / total
            } else {
                0.5
            }
        })
        .collect()
}

fn fraction_at(fractions: &[f64], station_index: usize) -> f64 {
    fractions
        .get(station_index)
        .or_else(|| fractions.last())
        .copied()
        .unwrap_or(0.5)
}

/// `y` of a station on the axis described by `posts`
#[must_use]
pub fn map_station(station_index: usize, track_index: u32, posts: &[GraphPost], plot: &PlotArea, offset_px: f64) -> f64 {
    plot.y + plot.height * fraction_at(&cumulative_fractions(posts), station_index) + track_offset(track_index, offset_px)
}

/// Maps diagram coordinates (time, station, track) to canvas pixels
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateMapper {
    window: TimeWindow,
    plot: PlotArea,
    fractions: Vec<f64>,
    track_offset_px: f64,
}

impl CoordinateMapper {
    #[must_use]
    pub fn new(graph: &GraphData, plot: PlotArea, track_offset_px: f64) -> Self {
        Self {
            window: graph.window(),
            plot,
            fractions: cumulative_fractions(&graph.posts),
            track_offset_px,
        }
    }

    #[must_use]
    pub fn x(&self, time: NaiveDateTime) -> f64 {
        map_time(time, &self.window, &self.plot)
    }

    /// `y` of a station; indices past the last post clamp to it
    #[must_use]
    pub fn y(&self, station_index: usize, track_index: u32) -> f64 {
        self.plot.y
            + self.plot.height * fraction_at(&self.fractions, station_index)
            + track_offset(track_index, self.track_offset_px)
    }

    #[must_use]
    pub fn point(&self, node: &GraphPoint) -> (f64, f64) {
        (self.x(node.time), self.y(node.station_index, node.track_index))
    }

    /// Instant under a canvas `x`, the inverse of `x()`
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn time_at(&self, x: f64) -> NaiveDateTime {
        if self.plot.width == 0.0 {
            return self.window.start;
        }
        let fraction = (x - self.plot.x) / self.plot.width;
        let ms = (fraction * self.window.span_ms() as f64).round() as i64;
        self.window.start + chrono::Duration::milliseconds(ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::at;

    const PLOT: PlotArea = PlotArea {
        x: 100.0,
        y: 20.0,
        width: 600.0,
        height: 400.0,
    };

    fn graph(distances: &[f64]) -> GraphData {
        GraphData {
            time_window_start: at(10, 0),
            time_window_end: at(12, 0),
            posts: distances
                .iter()
                .enumerate()
                .map(|(i, d)| GraphPost {
                    name: format!("P{i}"),
                    distance_from_previous: *d,
                })
                .collect(),
            lines: Vec::new(),
            reference_train: "1".to_string(),
            reference_index: 0,
        }
    }

    #[test]
    fn test_time_maps_linearly() {
        let mapper = CoordinateMapper::new(&graph(&[0.0, 1.0]), PLOT, 4.0);
        assert_eq!(mapper.x(at(10, 0)), 100.0);
        assert_eq!(mapper.x(at(11, 0)), 400.0);
        assert_eq!(mapper.x(at(12, 0)), 700.0);
        assert_eq!(mapper.time_at(400.0), at(11, 0));
    }

    #[test]
    fn test_stations_follow_cumulative_distance() {
        let mapper = CoordinateMapper::new(&graph(&[0.0, 1.0, 3.0]), PLOT, 4.0);
        assert_eq!(mapper.y(0, 0), 20.0);
        assert_eq!(mapper.y(1, 0), 120.0);
        assert_eq!(mapper.y(2, 0), 420.0);
        assert_eq!(mapper.y(9, 0), 420.0);

        let posts = graph(&[0.0, 1.0, 3.0]).posts;
        assert_eq!(map_station(1, 2, &posts, &PLOT, 4.0), 116.0);
    }

    #[test]
    fn test_track_parity_offsets() {
        let mapper = CoordinateMapper::new(&graph(&[0.0, 1.0]), PLOT, 4.0);
        let base = mapper.y(1, 0);
        assert_eq!(mapper.y(1, 2), base - 4.0);
        assert_eq!(mapper.y(1, 1), base + 4.0);
        assert_eq!(mapper.y(1, 3), base + 4.0);
    }

    #[test]
    fn test_single_post_sits_in_the_middle() {
        let mapper = CoordinateMapper::new(&graph(&[0.0]), PLOT, 4.0);
        assert_eq!(mapper.y(0, 0), 220.0);
    }

    #[test]
    fn test_empty_window_maps_to_left_edge() {
        let window = TimeWindow {
            start: at(10, 0),
            end: at(10, 0),
        };
        assert_eq!(map_time(at(11, 0), &window, &PLOT), 100.0);
    }
}

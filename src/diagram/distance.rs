use super::walker::PostRecord;
use crate::constants::{FALLBACK_DISTANCE, UNRESOLVED_DISTANCE};
use crate::models::{GraphPost, Stop};

fn route_row<'a>(route: &'a [Stop], record: &PostRecord) -> Option<&'a Stop> {
    route.iter().find(|row| row.station_point_id == record.station_id)
}

/// Mileage difference between two route rows, when both sit on the same line
fn leg_distance(previous: &Stop, current: &Stop) -> Option<f64> {
    let line = previous.line.as_deref()?;
    if current.line.as_deref() != Some(line) {
        return None;
    }
    Some((current.mileage_km? - previous.mileage_km?).abs())
}

/// Spacing of each consecutive pair of `records`, aligned with `records[1..]`
///
/// Legs without usable mileage come back as `UNRESOLVED_DISTANCE`.
#[must_use]
pub fn estimate_distances(records: &[PostRecord], route: &[Stop]) -> Vec<f64> {
    records
        .windows(2)
        .map(|pair| {
            route_row(route, &pair[0])
                .zip(route_row(route, &pair[1]))
                .and_then(|(previous, current)| leg_distance(previous, current))
                .unwrap_or(UNRESOLVED_DISTANCE)
        })
        .collect()
}

/// Replace unresolved legs with the mean of the resolved ones
pub fn backfill(distances: &mut [f64]) {
    let resolved: Vec<f64> = distances
        .iter()
        .copied()
        .filter(|d| *d != UNRESOLVED_DISTANCE)
        .collect();

    #[allow(clippy::cast_precision_loss)]
    let fill = if resolved.is_empty() {
        FALLBACK_DISTANCE
    } else {
        resolved.iter().sum::<f64>() / resolved.len() as f64
    };

    for distance in distances.iter_mut().filter(|d| **d == UNRESOLVED_DISTANCE) {
        *distance = fill;
    }
}

/// Axis posts for ordered records; the first post anchors the axis at 0
#[must_use]
pub fn build_posts(records: &[PostRecord], route: &[Stop]) -> Vec<GraphPost> {
    let mut distances = estimate_distances(records, route);
    backfill(&mut distances);

    records
        .iter()
        .enumerate()
        .map(|(i, record)| GraphPost {
            name: record.name(),
            distance_from_previous: if i == 0 { 0.0 } else { distances[i - 1] },
        })
        .collect()
}

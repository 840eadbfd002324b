/// Euclidean distance between two points.
#[must_use]
pub fn point_distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    (dx * dx + dy * dy).sqrt()
}

/// Calculates the minimum distance from a point to a line segment.
///
/// The point is projected onto the infinite line through the segment, the
/// projection parameter is clamped to `[0, 1]`, and the distance to that
/// clamped point is returned. Degenerate segments fall back to the distance
/// to `seg_start`.
///
/// # Arguments
/// * `point` - The point to measure from
/// * `seg_start` - Starting point of the line segment
/// * `seg_end` - Ending point of the line segment
#[must_use]
pub fn point_to_line_segment_distance(point: (f64, f64), seg_start: (f64, f64), seg_end: (f64, f64)) -> f64 {
    let dx = seg_end.0 - seg_start.0;
    let dy = seg_end.1 - seg_start.1;
    let len_sq = dx * dx + dy * dy;

    if len_sq == 0.0 {
        return point_distance(point, seg_start);
    }

    let t = ((point.0 - seg_start.0) * dx + (point.1 - seg_start.1) * dy) / len_sq;
    let t = t.clamp(0.0, 1.0);

    point_distance(point, (seg_start.0 + t * dx, seg_start.1 + t * dy))
}

use std::cmp::Ordering;
use crate::models::{GraphLine, GraphPoint};

fn step(from: &GraphPoint, to: &GraphPoint) -> Ordering {
    to.station_index.cmp(&from.station_index)
}

fn contradicts(first: Ordering, second: Ordering) -> bool {
    first != Ordering::Equal && second != Ordering::Equal && first != second
}

/// One scan over consecutive triples; returns whether anything moved
fn scan(nodes: &mut [GraphPoint]) -> bool {
    let mut swapped = false;
    for i in 0..nodes.len().saturating_sub(2) {
        let (a, b, c) = (nodes[i], nodes[i + 1], nodes[i + 2]);
        if a.time == b.time && b.time != c.time && contradicts(step(&a, &b), step(&b, &c)) {
            nodes.swap(i, i + 1);
            swapped = true;
        } else if a.time != b.time && b.time == c.time && contradicts(step(&a, &b), step(&b, &c)) {
            nodes.swap(i + 1, i + 2);
            swapped = true;
        }
    }
    swapped
}

/// Sort nodes by time and untangle equal-time neighbours
///
/// Two nodes sharing a timestamp keep whichever order agrees with the step
/// before or after them. When the scans do not settle, the plain time order
/// is kept so the pass stays idempotent.
pub fn reorder_nodes(nodes: &mut [GraphPoint]) {
    nodes.sort_by_key(|node| node.time);

    let sorted = nodes.to_vec();
    for _ in 0..=nodes.len() {
        if !scan(nodes) {
            return;
        }
    }
    nodes.copy_from_slice(&sorted);
}

#[must_use]
pub fn reorder(mut line: GraphLine) -> GraphLine {
    reorder_nodes(&mut line.nodes);
    line
}

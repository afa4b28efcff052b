//! Coordinate assignment for ordered layers.

use crate::graph::Point;

/// Rounds `v` to the nearest multiple of `grid` (no-op for non-positive grids).
pub fn snap(v: f64, grid: f64) -> f64 {
    if grid > 0.0 {
        (v / grid).round() * grid
    } else {
        v
    }
}

/// Places each layer as a row centered on the widest layer.
///
/// Returns one point per node, indexed by node. Both axes are snapped to half the spacing.
pub fn assign_coordinates(
    layers: &[Vec<usize>],
    node_count: usize,
    spacing_x: f64,
    spacing_y: f64,
) -> Vec<Point> {
    let widest = layers.iter().map(Vec::len).max().unwrap_or(0);
    let mut points: Vec<Point> = vec![Point::ORIGIN; node_count];

    for (l, layer) in layers.iter().enumerate() {
        let offset = (widest - layer.len()) as f64 * spacing_x / 2.0;
        let y = snap(l as f64 * spacing_y, spacing_y / 2.0);
        for (i, &v) in layer.iter().enumerate() {
            let x = snap(offset + i as f64 * spacing_x, spacing_x / 2.0);
            points[v] = Point::new(x, y);
        }
    }

    points
}

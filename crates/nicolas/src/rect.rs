//! Community bounding rectangles.

use crate::graph::Point;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectOptions {
    pub card_width: f64,
    /// Estimated card height. Real heights depend on rendered field counts, which the engine never
    /// sees, so every card is assumed to be this tall.
    pub card_height: f64,
    pub padding: f64,
}

/// A community's local layout: size plus member positions relative to its top-left corner.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CommunityRect {
    pub width: f64,
    pub height: f64,
    /// `(node index, local position)`; every coordinate is at least the padding.
    pub positions: Vec<(usize, Point)>,
}

impl CommunityRect {
    pub fn members(&self) -> impl Iterator<Item = usize> + '_ {
        self.positions.iter().map(|&(v, _)| v)
    }
}

/// Tight bounding box of the member cards, padded on every side.
///
/// An empty input still yields a one-card rectangle so that packing never sees a degenerate box.
pub fn build_rect(positions: &[(usize, Point)], opts: &RectOptions) -> CommunityRect {
    let pad = opts.padding;
    if positions.is_empty() {
        return CommunityRect {
            width: opts.card_width + 2.0 * pad,
            height: opts.card_height + 2.0 * pad,
            positions: Vec::new(),
        };
    }

    let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
    let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for (_, p) in positions {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x + opts.card_width);
        max_y = max_y.max(p.y + opts.card_height);
    }

    CommunityRect {
        width: max_x - min_x + 2.0 * pad,
        height: max_y - min_y + 2.0 * pad,
        positions: positions
            .iter()
            .map(|&(v, p)| (v, Point::new(p.x - min_x + pad, p.y - min_y + pad)))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPTS: RectOptions = RectOptions {
        card_width: 100.0,
        card_height: 50.0,
        padding: 10.0,
    };

    #[test]
    fn empty_community_is_one_padded_card() {
        let r = build_rect(&[], &OPTS);
        assert_eq!((r.width, r.height), (120.0, 70.0));
        assert!(r.positions.is_empty());
    }

    #[test]
    fn positions_are_shifted_into_the_padding() {
        let r = build_rect(
            &[(0, Point::new(-40.0, 20.0)), (1, Point::new(60.0, 120.0))],
            &OPTS,
        );
        assert_eq!(r.width, 100.0 + 100.0 + 20.0);
        assert_eq!(r.height, 100.0 + 50.0 + 20.0);
        assert_eq!(r.positions[0].1, Point::new(10.0, 10.0));
        assert_eq!(r.positions[1].1, Point::new(110.0, 110.0));
    }
}

//! Greedy strip packing of community rectangles, on one or two hierarchy levels.
//!
//! [`pack`] is the single packing routine; [`pack_rects`] applies it to community rectangles and
//! [`pack_two_level`] applies it twice (inside each level-two group, then across groups).

use crate::graph::Point;
use crate::rect::CommunityRect;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// A rectangle with its assigned top-left offset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedRect {
    pub rect: CommunityRect,
    pub x: f64,
    pub y: f64,
}

impl PlacedRect {
    pub fn right(&self) -> f64 {
        self.x + self.rect.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.rect.height
    }

    /// True when the interiors intersect; touching edges do not count.
    pub fn overlaps(&self, other: &PlacedRect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Member positions translated by this rectangle's offset.
    pub fn absolute_positions(&self) -> impl Iterator<Item = (usize, Point)> + '_ {
        self.rect
            .positions
            .iter()
            .map(|&(v, p)| (v, p.offset(self.x, self.y)))
    }
}

/// Row-based strip packing. Returns one offset per input size, in input order.
///
/// Rectangles are placed tallest first (ties keep input order) into rows no wider than
/// `max(first_width + gap, mean_width * ceil(sqrt(n)))`. A rectangle that would overflow a
/// non-empty row starts the next one.
pub fn pack(sizes: &[Size], gap: f64) -> Vec<Point> {
    match sizes.len() {
        0 => return Vec::new(),
        1 => return vec![Point::ORIGIN],
        _ => {}
    }

    let n = sizes.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| sizes[b].height.total_cmp(&sizes[a].height));

    let mean_width = sizes.iter().map(|s| s.width).sum::<f64>() / n as f64;
    let row_width = (sizes[order[0]].width + gap).max(mean_width * (n as f64).sqrt().ceil());

    let mut offsets: Vec<Point> = vec![Point::ORIGIN; n];
    let (mut x, mut y, mut row_height) = (0.0_f64, 0.0_f64, 0.0_f64);
    for i in order {
        let s = sizes[i];
        if x > 0.0 && x + s.width > row_width {
            x = 0.0;
            y += row_height + gap;
            row_height = 0.0;
        }
        offsets[i] = Point::new(x, y);
        x += s.width + gap;
        row_height = row_height.max(s.height);
    }
    offsets
}

pub fn pack_rects(rects: Vec<CommunityRect>, gap: f64) -> Vec<PlacedRect> {
    let sizes: Vec<Size> = rects.iter().map(|r| Size::new(r.width, r.height)).collect();
    rects
        .into_iter()
        .zip(pack(&sizes, gap))
        .map(|(rect, p)| PlacedRect { rect, x: p.x, y: p.y })
        .collect()
}

/// Packs level-one rectangles inside their level-two group (with `gap / 2`), wraps every group
/// into one super-rectangle and packs those with the full `gap`.
///
/// `level_two[i]` is the group of `rects[i]`. Each returned rectangle is a whole group whose member
/// positions are already relative to the group's top-left corner.
pub fn pack_two_level(
    rects: Vec<CommunityRect>,
    level_two: &[usize],
    gap: f64,
) -> Vec<PlacedRect> {
    let half = gap / 2.0;
    let mut groups: BTreeMap<usize, Vec<CommunityRect>> = BTreeMap::new();
    for (rect, &group) in rects.into_iter().zip(level_two) {
        groups.entry(group).or_default().push(rect);
    }

    let supers: Vec<CommunityRect> = groups
        .into_values()
        .map(|members| flatten(pack_rects(members, half), half))
        .collect();
    pack_rects(supers, gap)
}

/// Wraps packed rectangles into one, with `margin` added on the right and bottom edges.
fn flatten(placed: Vec<PlacedRect>, margin: f64) -> CommunityRect {
    let width = placed.iter().map(PlacedRect::right).fold(0.0, f64::max) + margin;
    let height = placed.iter().map(PlacedRect::bottom).fold(0.0, f64::max) + margin;
    CommunityRect {
        width,
        height,
        positions: placed.iter().flat_map(PlacedRect::absolute_positions).collect(),
    }
}

//! Layered (Sugiyama) layout of a single community.
//!
//! Three passes over the community's induced directed subgraph: longest-path layering
//! ([`rank`]), barycenter crossing minimization ([`order`]) and row-centered coordinate assignment
//! ([`position`]). Coordinates are local; the community rectangle builder translates them.

pub mod order;
pub mod position;
pub mod rank;

use crate::graph::{AdjacencyGraph, Point};
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SugiyamaOptions {
    pub spacing_x: f64,
    pub spacing_y: f64,
    pub iterations: usize,
}

/// Local layout of one community, keyed by global node index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SugiyamaLayout {
    pub positions: Vec<(usize, Point)>,
    /// Final ordered layers, top to bottom.
    pub layers: Vec<Vec<usize>>,
}

impl SugiyamaLayout {
    /// Layer index of `node`, if it belongs to this layout.
    pub fn layer_of(&self, node: usize) -> Option<usize> {
        self.layers.iter().position(|l| l.contains(&node))
    }
}

/// Lays out `members` (global indices, sorted ascending) using the directed edges of `graph`
/// restricted to those members.
pub fn layout(
    graph: &AdjacencyGraph,
    members: &[usize],
    opts: &SugiyamaOptions,
) -> SugiyamaLayout {
    match members {
        [] => return SugiyamaLayout::default(),
        [only] => {
            return SugiyamaLayout {
                positions: vec![(*only, Point::ORIGIN)],
                layers: vec![vec![*only]],
            };
        }
        _ => {}
    }

    let local: FxHashMap<usize, usize> = members
        .iter()
        .enumerate()
        .map(|(ix, &v)| (v, ix))
        .collect();
    let restrict = |list: &[usize]| -> Vec<usize> {
        list.iter().filter_map(|v| local.get(v).copied()).collect()
    };
    let parents: Vec<Vec<usize>> = members.iter().map(|&v| restrict(graph.parents(v))).collect();
    let children: Vec<Vec<usize>> = members.iter().map(|&v| restrict(graph.children(v))).collect();

    let layer_of = rank::assign_layers(&parents);
    let mut layers = rank::build_layers(&layer_of);
    order::minimize_crossings(&mut layers, &parents, &children, opts.iterations);
    let points =
        position::assign_coordinates(&layers, members.len(), opts.spacing_x, opts.spacing_y);

    SugiyamaLayout {
        positions: members.iter().copied().zip(points).collect(),
        layers: layers
            .into_iter()
            .map(|l| l.into_iter().map(|ix| members[ix]).collect())
            .collect(),
    }
}

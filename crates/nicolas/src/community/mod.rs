//! Leiden-style community detection.
//!
//! A greedy modularity optimizer: local moving over the sorted node list, a refinement pass that
//! splits disconnected outliers into singletons, and an optional second level computed on the
//! contracted community graph. There is no randomness; ties always favor the node's current
//! community and otherwise the candidate seen first in neighbor-index order.

use crate::graph::WeightedGraph;
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Gains within this margin of the current best are treated as ties.
const GAIN_EPSILON: f64 = 1e-12;

/// How many community levels to compute ("max level" 0, 1 or 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HierarchyDepth {
    /// Every node is its own community.
    Flat,
    OneLevel,
    TwoLevel,
}

impl HierarchyDepth {
    pub fn for_node_count(
        node_count: usize,
        min_community_size: usize,
        large_threshold: usize,
    ) -> Self {
        if node_count < min_community_size {
            Self::Flat
        } else if node_count < large_threshold {
            Self::OneLevel
        } else {
            Self::TwoLevel
        }
    }

    pub fn max_level(self) -> u8 {
        match self {
            Self::Flat => 0,
            Self::OneLevel => 1,
            Self::TwoLevel => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityAssignment {
    pub level_one: usize,
    pub level_two: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeidenOptions {
    pub resolution: f64,
    pub max_iterations: usize,
}

impl Default for LeidenOptions {
    fn default() -> Self {
        Self {
            resolution: 1.0,
            max_iterations: 10,
        }
    }
}

/// Per-node assignments plus the number of distinct ids on each level.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Communities {
    pub assignments: Vec<CommunityAssignment>,
    pub level_one_count: usize,
    pub level_two_count: usize,
}

impl Communities {
    pub fn level_one(&self) -> Vec<usize> {
        self.assignments.iter().map(|a| a.level_one).collect()
    }
}

pub fn detect(graph: &WeightedGraph, depth: HierarchyDepth, opts: &LeidenOptions) -> Communities {
    let n = graph.node_count();
    if n == 0 {
        return Communities::default();
    }

    if depth == HierarchyDepth::Flat {
        return Communities {
            assignments: (0..n)
                .map(|v| CommunityAssignment {
                    level_one: v,
                    level_two: 0,
                })
                .collect(),
            level_one_count: n,
            level_two_count: 1,
        };
    }

    let (level_one, level_one_count) = leiden_level(graph, opts);

    let (level_two_of, level_two_count) =
        if depth == HierarchyDepth::TwoLevel && level_one_count > 2 {
            let contracted = contract(graph, &level_one, level_one_count);
            let mut coarse = local_moving(&contracted, opts);
            let count = renumber(&mut coarse);
            (coarse, count)
        } else {
            (vec![0; level_one_count], 1)
        };

    Communities {
        assignments: level_one
            .iter()
            .map(|&c| CommunityAssignment {
                level_one: c,
                level_two: level_two_of[c],
            })
            .collect(),
        level_one_count,
        level_two_count,
    }
}

/// One full level: local moving, refinement, dense renumbering.
///
/// Returns the per-node community id and the number of communities.
pub fn leiden_level(graph: &WeightedGraph, opts: &LeidenOptions) -> (Vec<usize>, usize) {
    let mut membership = local_moving(graph, opts);
    refine(graph, &mut membership);
    let count = renumber(&mut membership);
    (membership, count)
}

/// Greedy modularity local moving, starting from singletons.
///
/// The returned ids are raw (not dense). With no edges at all every node stays alone.
pub fn local_moving(graph: &WeightedGraph, opts: &LeidenOptions) -> Vec<usize> {
    let n = graph.node_count();
    let mut membership: Vec<usize> = (0..n).collect();
    let w = graph.total_weight();
    if w <= 0.0 {
        return membership;
    }

    let mut totals: Vec<f64> = (0..n).map(|v| graph.degree(v)).collect();
    let mut links: IndexMap<usize, f64> = IndexMap::new();

    for sweep in 0..opts.max_iterations {
        let mut moved = 0usize;
        for v in 0..n {
            let k = graph.degree(v);
            if k == 0.0 {
                continue;
            }
            let current = membership[v];
            totals[current] -= k;

            links.clear();
            links.insert(current, 0.0);
            for &(u, weight) in graph.neighbors(v) {
                *links.entry(membership[u]).or_insert(0.0) += weight;
            }

            let gain = |c: usize, k_in: f64| {
                k_in / w - opts.resolution * totals[c] * k / (2.0 * w * w)
            };
            let mut best = current;
            let mut best_gain = gain(current, links[&current]);
            for (&c, &k_in) in links.iter().skip(1) {
                let g = gain(c, k_in);
                if g > best_gain + GAIN_EPSILON {
                    best = c;
                    best_gain = g;
                }
            }

            totals[best] += k;
            if best != current {
                membership[v] = best;
                moved += 1;
            }
        }
        trace!(sweep, moved, "local moving sweep");
        if moved == 0 {
            break;
        }
    }

    membership
}

/// Splits members with no edge into their own community (but some edge out of it) into fresh
/// singletons. Only communities with more than two members are touched.
pub fn refine(graph: &WeightedGraph, membership: &mut [usize]) {
    let Some(&max_id) = membership.iter().max() else {
        return;
    };
    let mut sizes: Vec<usize> = vec![0; max_id + 1];
    for &c in membership.iter() {
        sizes[c] += 1;
    }

    let outliers: Vec<usize> = (0..membership.len())
        .filter(|&v| {
            let c = membership[v];
            if sizes[c] <= 2 {
                return false;
            }
            let (internal, external) = graph.neighbors(v).iter().fold(
                (0.0, 0.0),
                |(internal, external), &(u, weight)| {
                    if membership[u] == c {
                        (internal + weight, external)
                    } else {
                        (internal, external + weight)
                    }
                },
            );
            internal == 0.0 && external > 0.0
        })
        .collect();

    let mut next = max_id + 1;
    for v in outliers {
        trace!(node = v, community = membership[v], "splitting outlier");
        membership[v] = next;
        next += 1;
    }
}

/// Renumbers ids to `0..k` preserving their sorted order. Returns `k`.
pub fn renumber(membership: &mut [usize]) -> usize {
    let mut distinct: Vec<usize> = membership.to_vec();
    distinct.sort_unstable();
    distinct.dedup();
    let dense: FxHashMap<usize, usize> = distinct
        .iter()
        .enumerate()
        .map(|(ix, &c)| (c, ix))
        .collect();
    for c in membership.iter_mut() {
        *c = dense[&*c];
    }
    dense.len()
}

/// Collapses each community into a super-node. Inter-community weights are summed; intra-community
/// edges disappear.
pub fn contract(
    graph: &WeightedGraph,
    membership: &[usize],
    community_count: usize,
) -> WeightedGraph {
    let mut edges: Vec<(usize, usize, f64)> = Vec::new();
    for v in 0..graph.node_count() {
        for &(u, weight) in graph.neighbors(v) {
            if u <= v {
                continue;
            }
            let (a, b) = (membership[v], membership[u]);
            if a != b {
                edges.push((a, b, weight));
            }
        }
    }
    WeightedGraph::from_edges(community_count, edges)
}

/// Newman modularity `Q` of a partition, with the same resolution scaling as the local-moving gain.
pub fn modularity(graph: &WeightedGraph, membership: &[usize], resolution: f64) -> f64 {
    let w = graph.total_weight();
    if w <= 0.0 || membership.is_empty() {
        return 0.0;
    }
    let slots = membership.iter().max().map_or(0, |m| m + 1);
    let mut internal: Vec<f64> = vec![0.0; slots];
    let mut totals: Vec<f64> = vec![0.0; slots];

    for v in 0..graph.node_count() {
        totals[membership[v]] += graph.degree(v);
        for &(u, weight) in graph.neighbors(v) {
            if u > v && membership[u] == membership[v] {
                internal[membership[v]] += weight;
            }
        }
    }

    internal
        .iter()
        .zip(&totals)
        .map(|(&inside, &tot)| inside / w - resolution * (tot / (2.0 * w)).powi(2))
        .sum()
}

//! Schema graph model and the adjacency builder.
//!
//! Entities are identified by their logical name at the API boundary only. Everything past
//! [`AdjacencyGraph::build`] works on dense `usize` indices into a lexicographically sorted node
//! list, so no layout decision ever depends on hash-map iteration order.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationshipKind {
    ManyToOne,
    OneToMany,
    ManyToMany,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub from: String,
    pub to: String,
    pub kind: RelationshipKind,
}

impl Relationship {
    pub fn new(from: impl Into<String>, to: impl Into<String>, kind: RelationshipKind) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            kind,
        }
    }

    pub fn is_self_edge(&self) -> bool {
        self.from == self.to
    }

    /// Returns `(parent, child)` in drawing order, or `None` for many-to-many links.
    ///
    /// The "one" side owns the "many" side: for `contact --ManyToOne--> account`, `account` is
    /// drawn above `contact`.
    pub fn hierarchy(&self) -> Option<(&str, &str)> {
        match self.kind {
            RelationshipKind::ManyToOne => Some((self.to.as_str(), self.from.as_str())),
            RelationshipKind::OneToMany => Some((self.from.as_str(), self.to.as_str())),
            RelationshipKind::ManyToMany => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Final output: one absolute position per selected entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutResult {
    pub positions: BTreeMap<String, Point>,
}

impl LayoutResult {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<Point> {
        self.positions.get(id).copied()
    }
}

/// Symmetric weighted adjacency over dense node indices.
///
/// Neighbor lists are sorted by index and parallel edges are already merged into a single
/// accumulated weight. Self loops are never stored.
#[derive(Debug, Clone, Default)]
pub struct WeightedGraph {
    adjacency: Vec<Vec<(usize, f64)>>,
    degrees: Vec<f64>,
    total_weight: f64,
}

impl WeightedGraph {
    pub fn from_edges(
        node_count: usize,
        edges: impl IntoIterator<Item = (usize, usize, f64)>,
    ) -> Self {
        let mut acc: Vec<BTreeMap<usize, f64>> = vec![BTreeMap::new(); node_count];
        for (a, b, w) in edges {
            if a == b || a >= node_count || b >= node_count {
                continue;
            }
            *acc[a].entry(b).or_insert(0.0) += w;
            *acc[b].entry(a).or_insert(0.0) += w;
        }

        let adjacency: Vec<Vec<(usize, f64)>> = acc
            .into_iter()
            .map(|m| m.into_iter().collect())
            .collect();
        let degrees: Vec<f64> = adjacency
            .iter()
            .map(|ns| ns.iter().map(|&(_, w)| w).sum())
            .collect();
        let total_weight = degrees.iter().sum::<f64>() / 2.0;

        Self {
            adjacency,
            degrees,
            total_weight,
        }
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn neighbors(&self, v: usize) -> &[(usize, f64)] {
        &self.adjacency[v]
    }

    /// Sum of incident edge weights.
    pub fn degree(&self, v: usize) -> f64 {
        self.degrees[v]
    }

    /// Total undirected edge weight `W` (each edge counted once).
    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    pub fn weight(&self, a: usize, b: usize) -> f64 {
        self.adjacency
            .get(a)
            .and_then(|ns| {
                ns.binary_search_by_key(&b, |&(n, _)| n)
                    .ok()
                    .map(|pos| ns[pos].1)
            })
            .unwrap_or(0.0)
    }
}

/// Derived, immutable graph for one layout run.
#[derive(Debug, Clone, Default)]
pub struct AdjacencyGraph {
    ids: Vec<String>,
    index: FxHashMap<String, usize>,
    undirected: WeightedGraph,
    children: Vec<Vec<usize>>,
    parents: Vec<Vec<usize>>,
}

impl AdjacencyGraph {
    /// Builds the adjacency for the selected subset of `nodes`.
    ///
    /// Unselected nodes, unknown endpoints and self edges are dropped silently; duplicate node ids
    /// collapse into one.
    pub fn build<S: AsRef<str>>(
        nodes: &[S],
        edges: &[Relationship],
        selected: &BTreeSet<String>,
    ) -> Self {
        let ids: Vec<String> = nodes
            .iter()
            .map(|n| n.as_ref())
            .filter(|n| selected.contains(*n))
            .collect::<BTreeSet<&str>>()
            .into_iter()
            .map(str::to_string)
            .collect();
        let index: FxHashMap<String, usize> = ids
            .iter()
            .enumerate()
            .map(|(ix, id)| (id.clone(), ix))
            .collect();

        let mut undirected_edges: Vec<(usize, usize, f64)> = Vec::with_capacity(edges.len());
        let mut children: Vec<Vec<usize>> = vec![Vec::new(); ids.len()];
        let mut parents: Vec<Vec<usize>> = vec![Vec::new(); ids.len()];

        for e in edges {
            if e.is_self_edge() {
                continue;
            }
            let (Some(&a), Some(&b)) = (index.get(e.from.as_str()), index.get(e.to.as_str()))
            else {
                continue;
            };
            undirected_edges.push((a, b, 1.0));

            if let Some((parent, child)) = e.hierarchy() {
                let (p, c) = (index[parent], index[child]);
                children[p].push(c);
                parents[c].push(p);
            }
        }

        for list in children.iter_mut().chain(parents.iter_mut()) {
            list.sort_unstable();
            list.dedup();
        }

        let undirected = WeightedGraph::from_edges(ids.len(), undirected_edges);
        Self {
            ids,
            index,
            undirected,
            children,
            parents,
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Node ids in lexicographic order; position in this slice is the node index.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn id(&self, ix: usize) -> &str {
        &self.ids[ix]
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn undirected(&self) -> &WeightedGraph {
        &self.undirected
    }

    pub fn children(&self, ix: usize) -> &[usize] {
        &self.children[ix]
    }

    pub fn parents(&self, ix: usize) -> &[usize] {
        &self.parents[ix]
    }

    pub fn edge_weight(&self, a: &str, b: &str) -> f64 {
        match (self.index_of(a), self.index_of(b)) {
            (Some(a), Some(b)) => self.undirected.weight(a, b),
            _ => 0.0,
        }
    }
}

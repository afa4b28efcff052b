//! Pipeline orchestration: graph building, community detection, per-community layered layout,
//! rectangle packing and final composition.

use crate::community::{self, CommunityAssignment, HierarchyDepth, LeidenOptions};
use crate::config::LayoutConfig;
use crate::error::Result;
use crate::graph::{AdjacencyGraph, LayoutResult, Point, Relationship};
use crate::pack::{self, PlacedRect};
use crate::rect::{self, CommunityRect, RectOptions};
use crate::sugiyama::{self, SugiyamaOptions};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, debug_span};

/// Positions plus the intermediate pipeline results that produced them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutReport {
    pub depth: HierarchyDepth,
    pub positions: BTreeMap<String, Point>,
    pub communities: BTreeMap<String, CommunityAssignment>,
    /// Sugiyama layer of each node inside its level-one community.
    pub layers: BTreeMap<String, usize>,
    /// Top-level packed rectangles (level-two groups when two levels are used), in absolute
    /// coordinates.
    pub rectangles: Vec<PlacedBox>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub members: Vec<String>,
}

impl PlacedBox {
    pub fn overlaps(&self, other: &PlacedBox) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

impl LayoutReport {
    fn empty() -> Self {
        Self {
            depth: HierarchyDepth::Flat,
            positions: BTreeMap::new(),
            communities: BTreeMap::new(),
            layers: BTreeMap::new(),
            rectangles: Vec::new(),
        }
    }

    pub fn into_result(self) -> LayoutResult {
        LayoutResult {
            positions: self.positions,
        }
    }

    pub fn level_one_count(&self) -> usize {
        self.communities
            .values()
            .map(|a| a.level_one)
            .collect::<BTreeSet<_>>()
            .len()
    }

    pub fn level_two_count(&self) -> usize {
        self.communities
            .values()
            .map(|a| a.level_two)
            .collect::<BTreeSet<_>>()
            .len()
    }
}

/// Computes an absolute position for every selected node.
///
/// Pure and deterministic: identical arguments always produce identical positions.
pub fn compute_layout<S: AsRef<str>>(
    nodes: &[S],
    edges: &[Relationship],
    selected: &BTreeSet<String>,
    config: &LayoutConfig,
) -> LayoutResult {
    compute_layout_detailed(nodes, edges, selected, config).into_result()
}

pub fn compute_layout_detailed<S: AsRef<str>>(
    nodes: &[S],
    edges: &[Relationship],
    selected: &BTreeSet<String>,
    config: &LayoutConfig,
) -> LayoutReport {
    let _span = debug_span!("compute_layout", nodes = nodes.len(), edges = edges.len()).entered();

    let graph = AdjacencyGraph::build(nodes, edges, selected);
    let n = graph.len();
    let start = Point::new(config.start_x, config.start_y);

    match n {
        0 => return LayoutReport::empty(),
        1 => {
            let id = graph.id(0).to_string();
            let mut report = LayoutReport::empty();
            report.positions.insert(id.clone(), start);
            report
                .communities
                .insert(id.clone(), CommunityAssignment::default());
            report.layers.insert(id, 0);
            return report;
        }
        _ => {}
    }

    let depth = HierarchyDepth::for_node_count(
        n,
        config.min_community_size,
        config.large_graph_threshold,
    );
    let leiden = LeidenOptions {
        resolution: config.leiden_resolution,
        max_iterations: config.leiden_max_iterations,
    };
    let communities = community::detect(graph.undirected(), depth, &leiden);
    debug!(
        ?depth,
        max_level = depth.max_level(),
        level_one = communities.level_one_count,
        level_two = communities.level_two_count,
        modularity = community::modularity(
            graph.undirected(),
            &communities.level_one(),
            config.leiden_resolution
        ),
        "communities detected"
    );

    let mut members: Vec<Vec<usize>> = vec![Vec::new(); communities.level_one_count];
    for (v, a) in communities.assignments.iter().enumerate() {
        members[a.level_one].push(v);
    }

    let sugiyama_opts = SugiyamaOptions {
        spacing_x: config.intra_spacing_x,
        spacing_y: config.intra_spacing_y,
        iterations: config.sugiyama_iterations,
    };
    let rect_opts = RectOptions {
        card_width: config.card_width,
        card_height: config.estimated_card_height,
        padding: config.community_padding,
    };

    let mut layer_of: Vec<usize> = vec![0; n];
    let rects: Vec<CommunityRect> = members
        .iter()
        .map(|m| {
            let local = sugiyama::layout(&graph, m, &sugiyama_opts);
            for (l, layer) in local.layers.iter().enumerate() {
                for &v in layer {
                    layer_of[v] = l;
                }
            }
            rect::build_rect(&local.positions, &rect_opts)
        })
        .collect();

    let gap = config.inter_community_gap;
    let placed: Vec<PlacedRect> = if communities.level_two_count > 1 {
        let level_two: Vec<usize> = members
            .iter()
            .map(|m| communities.assignments[m[0]].level_two)
            .collect();
        pack::pack_two_level(rects, &level_two, gap)
    } else {
        pack::pack_rects(rects, gap)
    };

    let mut report = LayoutReport::empty();
    report.depth = depth;
    for p in &placed {
        for (v, local) in p.absolute_positions() {
            let abs = local.offset(start.x, start.y);
            debug_assert!(abs.is_finite(), "non-finite position for {}", graph.id(v));
            report.positions.insert(graph.id(v).to_string(), abs);
        }
        report.rectangles.push(PlacedBox {
            x: p.x + start.x,
            y: p.y + start.y,
            width: p.rect.width,
            height: p.rect.height,
            members: p.rect.members().map(|v| graph.id(v).to_string()).collect(),
        });
    }
    for (v, a) in communities.assignments.iter().enumerate() {
        report.communities.insert(graph.id(v).to_string(), *a);
        report.layers.insert(graph.id(v).to_string(), layer_of[v]);
    }

    debug!(
        rectangles = placed.len(),
        width = placed.iter().map(PlacedRect::right).fold(0.0, f64::max),
        height = placed.iter().map(PlacedRect::bottom).fold(0.0, f64::max),
        "layout packed"
    );
    report
}

/// A self-contained layout request, as exchanged with the surrounding application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutInput {
    pub nodes: Vec<String>,
    #[serde(default)]
    pub edges: Vec<Relationship>,
    /// Selected node ids; `None` selects every node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<Vec<String>>,
}

impl LayoutInput {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn selection(&self) -> BTreeSet<String> {
        match &self.selected {
            Some(ids) => ids.iter().cloned().collect(),
            None => self.nodes.iter().cloned().collect(),
        }
    }

    pub fn compute(&self, config: &LayoutConfig) -> LayoutResult {
        compute_layout(&self.nodes, &self.edges, &self.selection(), config)
    }

    pub fn compute_detailed(&self, config: &LayoutConfig) -> LayoutReport {
        compute_layout_detailed(&self.nodes, &self.edges, &self.selection(), config)
    }
}

//! Deterministic layered layout for diagram graphs.
//!
//! Sugiyama-style pipeline:
//!   1. Cycle breaking (flow diagrams may loop; back edges are reversed)
//!   2. Rank assignment (longest path from sources)
//!   3. Ordering within ranks (barycenter crossing reduction)
//!   4. Coordinate assignment (rank thickness + spacing, ranks centered)
//!
//! Identical nodes, edges and sizes always produce identical coordinates.
//! Callers re-run the layout after every structural edit.

pub mod order;
pub mod rank;
pub mod size;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub use size::{estimate_size, estimate_width, needs_relayout};

use crate::error::CoreError;
use crate::parse::types::{DiagramEdge, DiagramNode, DiagramVariant};
use rank::LayoutGraph;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "LR")]
    LeftToRight,
    #[serde(rename = "TB")]
    TopToBottom,
}

impl Direction {
    /// Mechanism diagrams read left to right; flow diagrams top to bottom.
    pub fn for_variant(variant: DiagramVariant) -> Self {
        match variant {
            DiagramVariant::Mechanism => Direction::LeftToRight,
            DiagramVariant::Flow => Direction::TopToBottom,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Gap between adjacent ranks.
    pub rank_spacing: f64,
    /// Gap between neighbouring nodes of one rank.
    pub node_spacing: f64,
    /// Offset of the whole drawing from the origin.
    pub margin: f64,
    pub min_width: f64,
    pub char_width: f64,
    pub padding: f64,
    pub node_height: f64,
    pub max_ordering_passes: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            rank_spacing: 80.0,
            node_spacing: 40.0,
            margin: 20.0,
            min_width: 160.0,
            char_width: 14.0,
            padding: 32.0,
            node_height: 56.0,
            max_ordering_passes: 24,
        }
    }
}

impl LayoutConfig {
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        serde_json::from_str(json)
            .map_err(|e| CoreError::layout("L001", format!("Invalid layout config: {}", e)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutNode {
    pub id: String,
    pub size: Size,
}

impl LayoutNode {
    pub fn new(id: impl Into<String>, width: f64, height: f64) -> Self {
        LayoutNode {
            id: id.into(),
            size: Size { width, height },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutEdge {
    pub from: String,
    pub to: String,
}

impl LayoutEdge {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        LayoutEdge {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Top-left corner plus size of one laid-out node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodePosition {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rank: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutResult {
    /// In input node order.
    pub nodes: Vec<NodePosition>,
    pub width: f64,
    pub height: f64,
    pub crossings: usize,
}

impl LayoutResult {
    pub fn position(&self, id: &str) -> Option<&NodePosition> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

/// Lay out sized nodes. Edges with unknown endpoints are ignored; on
/// duplicate ids the first node wins.
pub fn layout(
    nodes: &[LayoutNode],
    edges: &[LayoutEdge],
    direction: Direction,
    config: &LayoutConfig,
) -> LayoutResult {
    let mut unique: Vec<LayoutNode> = Vec::with_capacity(nodes.len());
    let mut index: HashMap<&str, usize> = HashMap::new();
    for node in nodes {
        if !index.contains_key(node.id.as_str()) {
            index.insert(node.id.as_str(), unique.len());
            unique.push(node.clone());
        }
    }

    let graph = LayoutGraph::build(&unique, edges, &index);
    let ranks = rank::assign_ranks(&graph);
    let mut rank_order = order::build_rank_buckets(&ranks);
    let crossings = order::minimize_crossings(&mut rank_order, &graph, config.max_ordering_passes);

    let result = assign_coordinates(&unique, &ranks, &rank_order, direction, config, crossings);
    log::debug!(
        nodes = result.nodes.len(),
        ranks = rank_order.len(),
        crossings = crossings;
        "layout computed"
    );
    result
}

/// Size diagram nodes (measured sizes win over estimates) and lay them out.
pub fn layout_diagram_nodes(
    nodes: &[DiagramNode],
    edges: &[DiagramEdge],
    direction: Direction,
    config: &LayoutConfig,
    measured: &HashMap<String, Size>,
) -> LayoutResult {
    let layout_nodes: Vec<LayoutNode> = nodes
        .iter()
        .map(|n| LayoutNode {
            id: n.id().to_string(),
            size: measured
                .get(n.id())
                .copied()
                .unwrap_or_else(|| estimate_size(n, config)),
        })
        .collect();
    let layout_edges: Vec<LayoutEdge> = edges
        .iter()
        .map(|e| LayoutEdge::new(e.from.as_str(), e.to.as_str()))
        .collect();
    layout(&layout_nodes, &layout_edges, direction, config)
}

fn assign_coordinates(
    nodes: &[LayoutNode],
    ranks: &[usize],
    rank_order: &[Vec<usize>],
    direction: Direction,
    config: &LayoutConfig,
    crossings: usize,
) -> LayoutResult {
    // (extent along the rank axis, extent across it)
    let extents: Vec<(f64, f64)> = nodes
        .iter()
        .map(|n| match direction {
            Direction::LeftToRight => (n.size.width, n.size.height),
            Direction::TopToBottom => (n.size.height, n.size.width),
        })
        .collect();

    let thickness: Vec<f64> = rank_order
        .iter()
        .map(|rank| rank.iter().map(|&v| extents[v].0).fold(0.0, f64::max))
        .collect();
    let lengths: Vec<f64> = rank_order
        .iter()
        .map(|rank| {
            let sum: f64 = rank.iter().map(|&v| extents[v].1).sum();
            sum + config.node_spacing * rank.len().saturating_sub(1) as f64
        })
        .collect();
    let max_length = lengths.iter().copied().fold(0.0, f64::max);

    let mut along = vec![0.0; nodes.len()];
    let mut across = vec![0.0; nodes.len()];
    let mut rank_offset = 0.0;
    for (r, rank) in rank_order.iter().enumerate() {
        let mut cursor = (max_length - lengths[r]) / 2.0;
        for &v in rank {
            along[v] = rank_offset + (thickness[r] - extents[v].0) / 2.0;
            across[v] = cursor;
            cursor += extents[v].1 + config.node_spacing;
        }
        rank_offset += thickness[r] + config.rank_spacing;
    }
    let total_along = (rank_offset - config.rank_spacing).max(0.0);

    let positioned = nodes
        .iter()
        .enumerate()
        .map(|(v, n)| {
            let (x, y) = match direction {
                Direction::LeftToRight => (along[v], across[v]),
                Direction::TopToBottom => (across[v], along[v]),
            };
            NodePosition {
                id: n.id.clone(),
                x: x + config.margin,
                y: y + config.margin,
                width: n.size.width,
                height: n.size.height,
                rank: ranks[v],
            }
        })
        .collect();

    let (width, height) = match direction {
        Direction::LeftToRight => (total_along, max_length),
        Direction::TopToBottom => (max_length, total_along),
    };
    LayoutResult {
        nodes: positioned,
        width: width + 2.0 * config.margin,
        height: height + 2.0 * config.margin,
        crossings,
    }
}

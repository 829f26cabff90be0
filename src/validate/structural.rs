//! Graph-shape rules (W001, W002, W004).

use std::collections::HashSet;

use petgraph::Direction;
use petgraph::graph::NodeIndex;
use petgraph::visit::{Bfs, Reversed};

use super::Warning;
use crate::parse::graph::DiagramGraph;
use crate::parse::types::{DiagramEdge, DiagramNode};

pub const ISOLATED_NODE: &str = "W001";
pub const NEVER_REACHES_TERMINAL: &str = "W002";
pub const DANGLING_REFERENCE: &str = "W004";

/// Run all shape rules. Returns all warnings found.
pub fn validate_structural(
    nodes: &[DiagramNode],
    edges: &[DiagramEdge],
    graph: &DiagramGraph<'_>,
) -> Vec<Warning> {
    let mut warnings = Vec::new();

    w001_no_isolated_nodes(nodes, edges, &mut warnings);
    w002_every_node_reaches_terminal(nodes, graph, &mut warnings);
    w004_edges_reference_existing_nodes(edges, graph, &mut warnings);

    warnings
}

fn w001_no_isolated_nodes(nodes: &[DiagramNode], edges: &[DiagramEdge], warnings: &mut Vec<Warning>) {
    let endpoints: HashSet<&str> = edges
        .iter()
        .flat_map(|e| [e.from.as_str(), e.to.as_str()])
        .collect();

    for node in nodes {
        if !endpoints.contains(node.id()) {
            warnings.push(Warning::node(
                ISOLATED_NODE,
                node.id(),
                format!("Node '{}' is isolated (no edges)", node.id()),
            ));
        }
    }
}

/// Terminals are nodes without outgoing edges. Walking every edge backwards
/// from them must cover the graph; whatever is left over circulates without
/// ever producing a result.
fn w002_every_node_reaches_terminal(
    nodes: &[DiagramNode],
    graph: &DiagramGraph<'_>,
    warnings: &mut Vec<Warning>,
) {
    let g = &graph.graph;
    let terminals: Vec<NodeIndex> = g
        .node_indices()
        .filter(|&idx| g.neighbors_directed(idx, Direction::Outgoing).next().is_none())
        .collect();

    let mut reached: HashSet<NodeIndex> = HashSet::new();
    let reversed = Reversed(g);
    for terminal in terminals {
        if reached.contains(&terminal) {
            continue;
        }
        let mut bfs = Bfs::new(reversed, terminal);
        while let Some(nx) = bfs.next(reversed) {
            reached.insert(nx);
        }
    }

    let mut seen = HashSet::new();
    for node in nodes {
        let Some(&idx) = graph.node_indices.get(node.id()) else {
            continue;
        };
        if !seen.insert(idx) || reached.contains(&idx) {
            continue;
        }
        warnings.push(Warning::node(
            NEVER_REACHES_TERMINAL,
            node.id(),
            format!(
                "Node '{}' never reaches a terminal node (disconnected dead-end sub-graph)",
                node.id()
            ),
        ));
    }
}

/// One warning per edge, naming every missing endpoint.
fn w004_edges_reference_existing_nodes(
    edges: &[DiagramEdge],
    graph: &DiagramGraph<'_>,
    warnings: &mut Vec<Warning>,
) {
    for edge in edges {
        let missing: Vec<String> = [("source", &edge.from), ("target", &edge.to)]
            .into_iter()
            .filter(|(_, id)| !graph.contains(id))
            .map(|(end, id)| format!("{} '{}'", end, id))
            .collect();
        if !missing.is_empty() {
            warnings.push(Warning::edge(
                DANGLING_REFERENCE,
                &edge.id,
                format!(
                    "Edge '{}' has a dangling reference to unknown {}",
                    edge.id,
                    missing.join(" and ")
                ),
            ));
        }
    }
}

//! petgraph-based directed graph view over one diagram variant.

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use super::types::{DiagramEdge, DiagramNode, EdgeRole};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeLabel {
    pub edge_id: String,
    pub role: Option<EdgeRole>,
}

/// Node weights borrow from the slice the graph was built from.
pub struct DiagramGraph<'a> {
    pub graph: DiGraph<&'a DiagramNode, EdgeLabel>,
    pub node_indices: HashMap<&'a str, NodeIndex>,
}

impl<'a> DiagramGraph<'a> {
    /// Build the graph. Edges with a missing endpoint are left out (the
    /// validator reports them); on duplicate ids the first node wins.
    pub fn build(nodes: &'a [DiagramNode], edges: &[DiagramEdge]) -> Self {
        let mut graph = DiGraph::new();
        let mut node_indices = HashMap::new();

        for node in nodes {
            if node_indices.contains_key(node.id()) {
                log::warn!(node_id = node.id(); "duplicate node id, keeping the first");
                continue;
            }
            let idx = graph.add_node(node);
            node_indices.insert(node.id(), idx);
        }

        for edge in edges {
            let source = node_indices.get(edge.from.as_str());
            let target = node_indices.get(edge.to.as_str());
            if let (Some(&s), Some(&t)) = (source, target) {
                graph.add_edge(
                    s,
                    t,
                    EdgeLabel {
                        edge_id: edge.id.clone(),
                        role: edge.role,
                    },
                );
            }
        }

        DiagramGraph {
            graph,
            node_indices,
        }
    }

    pub fn node(&self, node_id: &str) -> Option<&'a DiagramNode> {
        self.node_indices.get(node_id).map(|&idx| self.graph[idx])
    }

    pub fn contains(&self, node_id: &str) -> bool {
        self.node_indices.contains_key(node_id)
    }

    pub fn successors(&self, node_id: &str) -> Vec<&'a DiagramNode> {
        self.neighbors(node_id, Direction::Outgoing)
    }

    pub fn predecessors(&self, node_id: &str) -> Vec<&'a DiagramNode> {
        self.neighbors(node_id, Direction::Incoming)
    }

    fn neighbors(&self, node_id: &str, dir: Direction) -> Vec<&'a DiagramNode> {
        let Some(&idx) = self.node_indices.get(node_id) else {
            return vec![];
        };
        self.graph
            .edges_directed(idx, dir)
            .map(|e| {
                let other = match dir {
                    Direction::Outgoing => e.target(),
                    Direction::Incoming => e.source(),
                };
                self.graph[other]
            })
            .collect()
    }

    pub fn incoming_count(&self, node_id: &str) -> usize {
        self.degree(node_id, Direction::Incoming)
    }

    pub fn outgoing_count(&self, node_id: &str) -> usize {
        self.degree(node_id, Direction::Outgoing)
    }

    fn degree(&self, node_id: &str, dir: Direction) -> usize {
        self.node_indices
            .get(node_id)
            .map(|&idx| self.graph.edges_directed(idx, dir).count())
            .unwrap_or(0)
    }
}

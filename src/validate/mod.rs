//! Advisory validation of diagram graphs.
//!
//! Nothing here fails: an invalid graph is a normal state while a diagram is
//! being edited, so every rule contributes `Warning`s to one result. Only
//! dangling references (W004) should block persisting a graph.

pub mod cycle;
pub mod node_rules;
pub mod structural;

pub use cycle::{find_cycle, has_cycle};

use serde::Serialize;

use crate::parse::graph::DiagramGraph;
use crate::parse::types::{Diagram, DiagramEdge, DiagramNode, DiagramVariant};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    pub code: &'static str,
    pub message: String,
    /// The node the warning is about, if any.
    pub node_id: Option<String>,
    /// The edge the warning is about, if any.
    pub edge_id: Option<String>,
}

impl Warning {
    pub(crate) fn node(code: &'static str, node_id: &str, message: String) -> Self {
        Warning {
            code,
            message,
            node_id: Some(node_id.to_string()),
            edge_id: None,
        }
    }

    pub(crate) fn edge(code: &'static str, edge_id: &str, message: String) -> Self {
        Warning {
            code,
            message,
            node_id: None,
            edge_id: Some(edge_id.to_string()),
        }
    }
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub warnings: Vec<Warning>,
}

impl ValidationResult {
    fn from_warnings(warnings: Vec<Warning>) -> Self {
        ValidationResult {
            valid: warnings.is_empty(),
            warnings,
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.warnings.iter().map(ToString::to_string).collect()
    }

    pub fn has_code(&self, code: &str) -> bool {
        self.warnings.iter().any(|w| w.code == code)
    }

    /// Reference integrity is the only hard precondition for persistence.
    pub fn is_persistable(&self) -> bool {
        !self.has_code(structural::DANGLING_REFERENCE)
    }
}

/// Run every structural rule over one graph.
pub fn validate(nodes: &[DiagramNode], edges: &[DiagramEdge]) -> ValidationResult {
    let graph = DiagramGraph::build(nodes, edges);

    let mut warnings = structural::validate_structural(nodes, edges, &graph);
    warnings.extend(node_rules::validate_node_rules(nodes, edges, &graph));

    log::debug!(
        nodes = nodes.len(),
        edges = edges.len(),
        warnings = warnings.len();
        "validated diagram graph"
    );
    ValidationResult::from_warnings(warnings)
}

/// Loop-free check applied to mechanism diagrams only.
pub const CONTAINS_CYCLE: &str = "W009";

/// Validate one variant. Mechanism diagrams must also be acyclic; flow
/// diagrams may loop.
pub fn validate_variant(
    nodes: &[DiagramNode],
    edges: &[DiagramEdge],
    variant: DiagramVariant,
) -> ValidationResult {
    let mut result = validate(nodes, edges);
    if variant == DiagramVariant::Mechanism {
        if let Some(path) = find_cycle(nodes, edges) {
            result.warnings.push(Warning {
                code: CONTAINS_CYCLE,
                message: format!("Mechanism diagram contains a cycle: {}", path.join(" → ")),
                node_id: path.first().cloned(),
                edge_id: None,
            });
            result.valid = false;
        }
    }
    result
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagramReport {
    pub mechanism: Option<ValidationResult>,
    pub flow: Option<ValidationResult>,
}

impl DiagramReport {
    pub fn is_valid(&self) -> bool {
        [&self.mechanism, &self.flow]
            .into_iter()
            .flatten()
            .all(|r| r.valid)
    }
}

/// Validate whichever variants a diagram document carries.
pub fn validate_diagram(diagram: &Diagram) -> DiagramReport {
    let check = |variant| {
        diagram
            .graph(variant)
            .map(|g| validate_variant(g.nodes, g.edges, variant))
    };
    DiagramReport {
        mechanism: check(DiagramVariant::Mechanism),
        flow: check(DiagramVariant::Flow),
    }
}

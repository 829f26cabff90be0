//! Node-type aware rules (W003, W005–W008).
//!
//! Branching here goes through the `DiagramNode` predicates only.

use super::Warning;
use crate::parse::graph::DiagramGraph;
use crate::parse::types::{DiagramEdge, DiagramNode, EdgeRole, InformationNode};

pub const SCOPE_NOT_WIRED: &str = "W003";
pub const INFORMATION_TO_INFORMATION: &str = "W005";
pub const ROLE_MISMATCH: &str = "W006";
pub const MISSING_PROCESS_INPUT: &str = "W007";
pub const UNLABELED_BRANCH: &str = "W008";

/// Id suffixes marking a scope/applicability node.
const SCOPE_ID_SUFFIXES: [&str; 3] = ["_scope", "_applicability", "_applicable"];

/// Title/description keywords marking a scope/applicability node.
const SCOPE_KEYWORDS: [&str; 8] = [
    "適用対象",
    "適用範囲",
    "適用除外",
    "適用の有無",
    "対象該当",
    "applicability",
    "applies to",
    "scope",
];

/// Keywords marking the final determination itself.
const FINAL_RESULT_KEYWORDS: [&str; 6] = [
    "最終判定",
    "適合判定",
    "判定結果",
    "final determination",
    "final result",
    "compliance result",
];

/// Run all node-type rules. Returns all warnings found.
pub fn validate_node_rules(
    nodes: &[DiagramNode],
    edges: &[DiagramEdge],
    graph: &DiagramGraph<'_>,
) -> Vec<Warning> {
    let mut warnings = Vec::new();

    w003_scope_nodes_feed_determination(nodes, graph, &mut warnings);
    for edge in edges {
        let (Some(from), Some(to)) = (graph.node(&edge.from), graph.node(&edge.to)) else {
            continue;
        };
        w005_no_information_to_information(edge, from, to, &mut warnings);
        w006_edge_roles_match_endpoints(edge, from, to, &mut warnings);
        w008_decision_branches_labeled(edge, from, &mut warnings);
    }
    w007_derived_information_has_process_input(nodes, graph, &mut warnings);

    warnings
}

fn w003_scope_nodes_feed_determination(
    nodes: &[DiagramNode],
    graph: &DiagramGraph<'_>,
    warnings: &mut Vec<Warning>,
) {
    for node in nodes {
        let Some(info) = node.as_information() else {
            continue;
        };
        if graph.outgoing_count(&info.id) > 0 {
            continue;
        }
        if is_scope_node(info) && !is_final_result(info) {
            warnings.push(Warning::node(
                SCOPE_NOT_WIRED,
                &info.id,
                format!(
                    "Scope node '{}' is not wired into the final determination",
                    info.id
                ),
            ));
        }
    }
}

fn node_text(info: &InformationNode) -> String {
    let mut text = info.title.to_lowercase();
    if let Some(desc) = &info.description {
        text.push('\n');
        text.push_str(&desc.to_lowercase());
    }
    text
}

pub fn is_scope_node(info: &InformationNode) -> bool {
    let id = info.id.to_lowercase();
    if SCOPE_ID_SUFFIXES.iter().any(|s| id.ends_with(s)) {
        return true;
    }
    let text = node_text(info);
    SCOPE_KEYWORDS.iter().any(|k| text.contains(k))
}

pub fn is_final_result(info: &InformationNode) -> bool {
    let text = node_text(info);
    FINAL_RESULT_KEYWORDS.iter().any(|k| text.contains(k))
}

fn w005_no_information_to_information(
    edge: &DiagramEdge,
    from: &DiagramNode,
    to: &DiagramNode,
    warnings: &mut Vec<Warning>,
) {
    if from.is_information() && to.is_information() {
        warnings.push(Warning::edge(
            INFORMATION_TO_INFORMATION,
            &edge.id,
            format!(
                "Edge '{}' connects information node '{}' directly to information node '{}'",
                edge.id, edge.from, edge.to
            ),
        ));
    }
}

fn w006_edge_roles_match_endpoints(
    edge: &DiagramEdge,
    from: &DiagramNode,
    to: &DiagramNode,
    warnings: &mut Vec<Warning>,
) {
    let expected = if from.is_information() && to.is_process() {
        EdgeRole::Input
    } else if from.is_process() && to.is_information() {
        EdgeRole::Output
    } else {
        return;
    };
    if edge.role != Some(expected) {
        let actual = edge.role.map(|r| r.as_str()).unwrap_or("none");
        warnings.push(Warning::edge(
            ROLE_MISMATCH,
            &edge.id,
            format!(
                "Edge '{}' from {} '{}' to {} '{}' must have role '{}', found '{}'",
                edge.id,
                from.node_type(),
                edge.from,
                to.node_type(),
                edge.to,
                expected.as_str(),
                actual
            ),
        ));
    }
}

/// An information node fed by edges is derived data, and derived data must
/// come out of some process. Nodes with no incoming edges are raw inputs.
fn w007_derived_information_has_process_input(
    nodes: &[DiagramNode],
    graph: &DiagramGraph<'_>,
    warnings: &mut Vec<Warning>,
) {
    for node in nodes.iter().filter(|n| n.is_information()) {
        let preds = graph.predecessors(node.id());
        if preds.is_empty() || preds.iter().any(|p| p.is_process()) {
            continue;
        }
        warnings.push(Warning::node(
            MISSING_PROCESS_INPUT,
            node.id(),
            format!(
                "Information node '{}' has incoming edges but none from a process node (missing process-derived input)",
                node.id()
            ),
        ));
    }
}

fn w008_decision_branches_labeled(
    edge: &DiagramEdge,
    from: &DiagramNode,
    warnings: &mut Vec<Warning>,
) {
    if !from.is_decision() || edge.role.is_some_and(|r| r.is_branch()) {
        return;
    }
    warnings.push(Warning::edge(
        UNLABELED_BRANCH,
        &edge.id,
        format!(
            "Edge '{}' leaves decision node '{}' without a yes/no/option role",
            edge.id, edge.from
        ),
    ));
}

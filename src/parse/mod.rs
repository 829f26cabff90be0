//! Parse phase: diagram JSON → Rust types + graph construction.

pub mod graph;
pub mod types;

pub use graph::DiagramGraph;
pub use types::*;

use serde_json::Value;

use crate::error::CoreError;

/// Deserialize a diagram document from JSON text.
pub fn parse(json: &str) -> Result<Diagram, CoreError> {
    let value = serde_json::from_str::<Value>(json)
        .map_err(|e| CoreError::parse("P001", format!("Failed to parse diagram JSON: {}", e)))?;
    Ok(from_value(&value))
}

/// Map an already-decoded document. Non-object input yields an empty diagram.
pub fn from_value(value: &Value) -> Diagram {
    if !value.is_object() {
        log::warn!("diagram document is not an object");
        return Diagram::default();
    }
    match serde_json::from_value::<Diagram>(value.clone()) {
        Ok(diagram) => diagram,
        Err(e) => {
            log::warn!("diagram document could not be mapped: {e}");
            Diagram::default()
        }
    }
}

/// Parse a bare `{ nodes, edges }` graph, as sent by the editor after a
/// structural edit.
pub fn parse_graph(json: &str) -> Result<(Vec<DiagramNode>, Vec<DiagramEdge>), CoreError> {
    let value = serde_json::from_str::<Value>(json)
        .map_err(|e| CoreError::parse("P002", format!("Failed to parse graph JSON: {}", e)))?;
    let nodes = value.get("nodes").map(nodes_from_value).unwrap_or_default();
    let edges = value.get("edges").map(edges_from_value).unwrap_or_default();
    Ok((nodes, edges))
}

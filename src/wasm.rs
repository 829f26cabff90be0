//! WASM entry points for the browser editor.
//!
//! Every entry point takes JSON text and returns a plain JS value. Failures
//! to decode input come back as an error DTO, never as a thrown exception.

use std::collections::HashMap;

use wasm_bindgen::prelude::*;

use crate::error::CoreError;
use crate::layout::{self, Direction, LayoutConfig, LayoutResult, Size};
use crate::parse::{self, DiagramVariant};
use crate::statute::{self, LawNode};
use crate::validate::{self, DiagramReport, ValidationResult};

/// Validate a full diagram document (both variants).
#[wasm_bindgen]
pub fn validate_diagram_json(json: &str) -> JsValue {
    to_js(&validate_diagram_inner(json))
}

fn validate_diagram_inner(json: &str) -> Outcome<DiagramReport> {
    match parse::parse(json) {
        Ok(diagram) => Outcome::ok(validate::validate_diagram(&diagram)),
        Err(e) => Outcome::error(e),
    }
}

/// Validate a bare `{ nodes, edges }` graph of the given variant
/// (`"mechanism"` or `"flow"`).
#[wasm_bindgen]
pub fn validate_graph_json(json: &str, variant: &str) -> JsValue {
    to_js(&validate_graph_inner(json, variant))
}

fn validate_graph_inner(json: &str, variant: &str) -> Outcome<ValidationResult> {
    let (nodes, edges) = match parse::parse_graph(json) {
        Ok(g) => g,
        Err(e) => return Outcome::error(e),
    };
    let variant = parse_variant(variant);
    Outcome::ok(validate::validate_variant(&nodes, &edges, variant))
}

/// Loop check for a bare `{ nodes, edges }` graph. Undecodable input is a
/// `P002` error, not an acyclic graph.
#[wasm_bindgen]
pub fn has_cycle_json(json: &str) -> JsValue {
    to_js(&has_cycle_inner(json))
}

fn has_cycle_inner(json: &str) -> Outcome<bool> {
    match parse::parse_graph(json) {
        Ok((nodes, edges)) => Outcome::ok(validate::has_cycle(&nodes, &edges)),
        Err(e) => Outcome::error(e),
    }
}

/// Lay out one variant of a diagram document. `sizes_json` maps node ids to
/// measured `{ width, height }`; pass `""` to estimate every size.
#[wasm_bindgen]
pub fn layout_diagram_json(json: &str, variant: &str, config_json: &str, sizes_json: &str) -> JsValue {
    to_js(&layout_diagram_inner(json, variant, config_json, sizes_json))
}

fn layout_diagram_inner(
    json: &str,
    variant: &str,
    config_json: &str,
    sizes_json: &str,
) -> Outcome<LayoutResult> {
    let diagram = match parse::parse(json) {
        Ok(d) => d,
        Err(e) => return Outcome::error(e),
    };
    let config = if config_json.trim().is_empty() {
        LayoutConfig::default()
    } else {
        match LayoutConfig::from_json(config_json) {
            Ok(c) => c,
            Err(e) => return Outcome::error(e),
        }
    };
    let measured: HashMap<String, Size> = if sizes_json.trim().is_empty() {
        HashMap::new()
    } else {
        match serde_json::from_str(sizes_json) {
            Ok(m) => m,
            Err(e) => {
                return Outcome::error(CoreError::layout(
                    "L002",
                    format!("Invalid measured sizes: {}", e),
                ));
            }
        }
    };

    let variant = parse_variant(variant);
    let Some(graph) = diagram.graph(variant) else {
        return Outcome::ok(layout::layout(&[], &[], Direction::for_variant(variant), &config));
    };
    Outcome::ok(layout::layout_diagram_nodes(
        graph.nodes,
        graph.edges,
        Direction::for_variant(variant),
        &config,
        &measured,
    ))
}

/// Parse a statute tag tree into the annotated hierarchy.
#[wasm_bindgen]
pub fn parse_statute_json(json: &str) -> JsValue {
    to_js(&parse_statute_inner(json))
}

fn parse_statute_inner(json: &str) -> Outcome<Vec<LawNode>> {
    match statute::try_parse_law_json(json) {
        Ok(nodes) => Outcome::ok(nodes),
        Err(e) => Outcome::error(e),
    }
}

fn parse_variant(variant: &str) -> DiagramVariant {
    match variant {
        "flow" => DiagramVariant::Flow,
        _ => DiagramVariant::Mechanism,
    }
}

fn to_js<T: serde::Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL)
}

// ---------------------------------------------------------------------------
// DTOs for serialization to JS
// ---------------------------------------------------------------------------

#[derive(serde::Serialize)]
struct ErrorDto {
    code: String,
    phase: String,
    message: String,
    node_id: Option<String>,
}

impl From<CoreError> for ErrorDto {
    fn from(e: CoreError) -> Self {
        ErrorDto {
            code: e.code,
            phase: e.phase.to_string(),
            message: e.message,
            node_id: e.node_id,
        }
    }
}

#[derive(serde::Serialize)]
#[serde(tag = "status")]
enum Outcome<T> {
    #[serde(rename = "ok")]
    Ok { result: T },
    #[serde(rename = "errors")]
    Errors { errors: Vec<ErrorDto> },
}

impl<T> Outcome<T> {
    fn ok(result: T) -> Self {
        Outcome::Ok { result }
    }

    fn error(e: CoreError) -> Self {
        Outcome::Errors {
            errors: vec![ErrorDto::from(e)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    const SETBACK: &str = include_str!("../tests/fixtures/setback_diagram.json");

    const LOOP: &str = r#"{
        "nodes": [
            { "id": "a", "type": "process", "title": "確認" },
            { "id": "b", "type": "decision", "title": "適合か" }
        ],
        "edges": [
            { "id": "e1", "from": "a", "to": "b", "role": "flow" },
            { "id": "e2", "from": "b", "to": "a", "role": "no" }
        ]
    }"#;

    fn dto<T: serde::Serialize>(outcome: &Outcome<T>) -> Value {
        serde_json::to_value(outcome).unwrap()
    }

    fn assert_error(value: &Value, code: &str, phase: &str) {
        assert_eq!(value["status"], "errors", "{value}");
        assert_eq!(value["errors"][0]["code"], code);
        assert_eq!(value["errors"][0]["phase"], phase);
        assert!(value.get("result").is_none());
    }

    #[test]
    fn validate_diagram_reports_both_variants() {
        let value = dto(&validate_diagram_inner(SETBACK));
        assert_eq!(value["status"], "ok");
        assert_eq!(value["result"]["mechanism"]["valid"], true);
        assert_eq!(value["result"]["flow"]["valid"], true);

        assert_error(&dto(&validate_diagram_inner("{ broken")), "P001", "Parse");
    }

    #[test]
    fn validate_graph_honors_variant() {
        let as_flow = dto(&validate_graph_inner(LOOP, "flow"));
        assert_eq!(as_flow["status"], "ok");
        let warnings = as_flow["result"]["warnings"].as_array().unwrap();
        assert!(!warnings.iter().any(|w| w["code"] == "W009"));

        let as_mechanism = dto(&validate_graph_inner(LOOP, "mechanism"));
        let warnings = as_mechanism["result"]["warnings"].as_array().unwrap();
        assert!(warnings.iter().any(|w| w["code"] == "W009"));

        assert_error(&dto(&validate_graph_inner("[", "flow")), "P002", "Parse");
    }

    #[test]
    fn has_cycle_separates_loops_from_bad_input() {
        assert_eq!(dto(&has_cycle_inner(LOOP)), json!({ "status": "ok", "result": true }));
        assert_eq!(
            dto(&has_cycle_inner(r#"{ "nodes": [], "edges": [] }"#)),
            json!({ "status": "ok", "result": false })
        );
        assert_error(&dto(&has_cycle_inner("not json")), "P002", "Parse");
    }

    #[test]
    fn layout_uses_variant_direction_and_sizes() {
        let sizes = r#"{ "p_limit": { "width": 420, "height": 96 } }"#;
        let value = dto(&layout_diagram_inner(SETBACK, "mechanism", "", sizes));
        assert_eq!(value["status"], "ok");
        let nodes = value["result"]["nodes"].as_array().unwrap();
        assert_eq!(nodes.len(), 6);
        let limit = nodes.iter().find(|n| n["id"] == "p_limit").unwrap();
        assert_eq!(limit["width"], 420.0);
        assert_eq!(limit["height"], 96.0);

        let flow = dto(&layout_diagram_inner(SETBACK, "flow", r#"{ "margin": 10 }"#, ""));
        assert_eq!(flow["result"]["nodes"].as_array().unwrap().len(), 7);
    }

    #[test]
    fn layout_rejects_bad_config_and_sizes() {
        assert_error(&dto(&layout_diagram_inner(SETBACK, "flow", "[", "")), "L001", "Layout");
        assert_error(&dto(&layout_diagram_inner(SETBACK, "flow", "", "nope")), "L002", "Layout");
        assert_error(&dto(&layout_diagram_inner("{", "flow", "", "")), "P001", "Parse");
    }

    #[test]
    fn layout_of_missing_variant_is_empty() {
        let value = dto(&layout_diagram_inner("{}", "flow", "", ""));
        assert_eq!(value["status"], "ok");
        assert_eq!(value["result"]["nodes"], json!([]));
    }

    #[test]
    fn parse_statute_outcome() {
        let law = include_str!("../tests/fixtures/building_standards_law.json");
        let value = dto(&parse_statute_inner(law));
        assert_eq!(value["status"], "ok");
        assert_eq!(value["result"][1]["children"][0]["diagram_id"], "A20_3_P1");

        assert_error(&dto(&parse_statute_inner("<Law/>")), "S001", "Statute");
    }
}

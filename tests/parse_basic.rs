//! Integration tests for the Parse phase: diagram JSON parsing, lenient
//! defaults, graph building.

#[allow(dead_code)]
mod helpers;

use helpers::load_fixture;
use kijo_core::parse::{
    self, DiagramGraph, DiagramVariant, EdgeRole, Iteration, Plurality, ProcessType,
    PropertyType, TerminalResult,
};
use kijo_core::validate;

#[test]
fn parse_setback_diagram() {
    let diagram = load_fixture(include_str!("fixtures/setback_diagram.json"));
    assert_eq!(diagram.id, "325AC0000000201/A56_P1_I1");
    assert_eq!(diagram.version, "1.2.0");
    assert_eq!(diagram.page_title.title, "道路斜線制限");
    assert_eq!(diagram.labels, vec!["集団規定", "高さ制限"]);
    assert_eq!(diagram.related_laws.len(), 1);
    assert_eq!(diagram.related_laws[0].article.as_deref(), Some("135_6"));

    let mechanism = diagram.graph(DiagramVariant::Mechanism).expect("mechanism");
    assert_eq!(mechanism.nodes.len(), 6);
    assert_eq!(mechanism.edges.len(), 5);

    let flow = diagram.flow_diagram.as_ref().expect("flow");
    assert_eq!(flow.title, "道路斜線制限の確認手順");
    assert_eq!(flow.nodes.len(), 7);
    assert_eq!(flow.edges[6].label.as_deref(), Some("再確認"));
}

#[test]
fn parse_node_fields() {
    let diagram = load_fixture(include_str!("fixtures/setback_diagram.json"));
    let mechanism = diagram.graph(DiagramVariant::Mechanism).expect("mechanism");

    let limit = mechanism.nodes[2].as_information().expect("information node");
    assert_eq!(limit.symbol.as_deref(), Some("L"));
    assert_eq!(limit.property_type, PropertyType::Numeric);
    assert_eq!(limit.plurality, Plurality::Multiple);
    assert!(!limit.property_type.is_geometric());

    let parse::DiagramNode::Process(calc) = &mechanism.nodes[1] else {
        panic!("expected a process node");
    };
    assert_eq!(calc.process_type, ProcessType::Mechanical);
    assert_eq!(calc.iteration, Iteration::Iterative);
    assert_eq!(calc.logic_expression.as_deref(), Some("L = 1.25 * (W + D)"));

    let flow = diagram.graph(DiagramVariant::Flow).expect("flow");
    let parse::DiagramNode::Decision(ok) = &flow.nodes[3] else {
        panic!("expected a decision node");
    };
    let condition = ok.condition.as_ref().expect("condition");
    assert_eq!(condition.operator, "<=");
    assert_eq!(condition.left.node_id.as_deref(), Some("i_building_height"));

    let parse::DiagramNode::Terminal(pass) = &flow.nodes[5] else {
        panic!("expected a terminal node");
    };
    assert_eq!(pass.result, TerminalResult::Pass);
}

#[test]
fn node_predicates() {
    let diagram = load_fixture(include_str!("fixtures/setback_diagram.json"));
    let flow = diagram.graph(DiagramVariant::Flow).expect("flow");
    let types: Vec<&str> = flow.nodes.iter().map(|n| n.node_type()).collect();
    assert_eq!(
        types,
        vec!["terminal", "decision", "process", "decision", "process", "terminal", "terminal"]
    );
    assert!(flow.nodes[0].is_terminal());
    assert!(flow.nodes[1].is_decision());
    assert!(flow.nodes[2].is_process());
    assert!(!flow.nodes[2].is_information());
    assert_eq!(flow.nodes[1].title(), "適用対象の区域か");
}

#[test]
fn diagram_key_from_legal_ref() {
    let diagram = load_fixture(include_str!("fixtures/setback_diagram.json"));
    assert_eq!(diagram.diagram_id().to_string(), "A56_P1_I1");
    assert_eq!(diagram.key().to_string(), "325AC0000000201/A56_P1_I1");
}

#[test]
fn lenient_parse_skips_bad_entries() {
    let diagram = load_fixture(include_str!("fixtures/lenient_diagram.json"));
    let mechanism = diagram.graph(DiagramVariant::Mechanism).expect("mechanism");

    let ids: Vec<&str> = mechanism.nodes.iter().map(|n| n.id()).collect();
    assert_eq!(ids, vec!["i1", "p1", "t1"]);

    let edge_ids: Vec<&str> = mechanism.edges.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(edge_ids, vec!["e1", "e3"]);

    assert!(diagram.flow_diagram.is_none());
    assert!(diagram.graph(DiagramVariant::Flow).is_none());
}

#[test]
fn lenient_parse_defaults_unknown_values() {
    let diagram = load_fixture(include_str!("fixtures/lenient_diagram.json"));
    let mechanism = diagram.graph(DiagramVariant::Mechanism).expect("mechanism");

    let i1 = mechanism.nodes[0].as_information().expect("information node");
    assert_eq!(i1.property_type, PropertyType::Proposition);
    assert_eq!(i1.plurality, Plurality::Single);

    let parse::DiagramNode::Terminal(t1) = &mechanism.nodes[2] else {
        panic!("expected a terminal node");
    };
    assert_eq!(t1.result, TerminalResult::End);

    assert_eq!(mechanism.edges[0].role, None);
    assert!(diagram.labels.is_empty());
    assert_eq!(diagram.key().to_string(), "325AC0000000201/A20_3_P2");
}

#[test]
fn non_object_document_yields_empty_diagram() {
    for json in ["[]", "42", "\"text\"", "null"] {
        let diagram = parse::parse(json).expect("valid JSON never fails");
        assert!(diagram.id.is_empty());
        assert!(diagram.kijo_diagram.is_none());
        assert!(diagram.flow_diagram.is_none());
    }
}

#[test]
fn parse_invalid_json_returns_error() {
    let err = parse::parse("not valid json").unwrap_err();
    assert_eq!(err.code, "P001");
    assert!(err.to_string().contains("P001"));

    let err = parse::parse_graph("{ nodes: ").unwrap_err();
    assert_eq!(err.code, "P002");
}

#[test]
fn parse_bare_graph() {
    let json = r#"{
        "nodes": [
            { "id": "a", "type": "information", "title": "A" },
            { "id": "b", "type": "process", "title": "B" }
        ],
        "edges": [ { "id": "e1", "from": "a", "to": "b", "role": "input" } ]
    }"#;
    let (nodes, edges) = parse::parse_graph(json).expect("should parse");
    assert_eq!(nodes.len(), 2);
    assert_eq!(edges[0].role, Some(EdgeRole::Input));

    let (nodes, edges) = parse::parse_graph("{}").expect("should parse");
    assert!(nodes.is_empty());
    assert!(edges.is_empty());
}

#[test]
fn build_graph_from_fixture() {
    let diagram = load_fixture(include_str!("fixtures/setback_diagram.json"));
    let flow = diagram.graph(DiagramVariant::Flow).expect("flow");
    let graph = DiagramGraph::build(flow.nodes, flow.edges);

    assert_eq!(graph.node_indices.len(), 7);
    assert_eq!(graph.outgoing_count("d_applicable"), 2);
    assert_eq!(graph.incoming_count("p_check"), 2);
    assert_eq!(graph.outgoing_count("t_pass"), 0);
    let preds: Vec<&str> = graph.predecessors("p_check").iter().map(|n| n.id()).collect();
    assert!(preds.contains(&"d_applicable"));
    assert!(preds.contains(&"p_fix"));
    assert!(graph.successors("ghost").is_empty());
}

#[test]
fn graph_skips_dangling_edges_and_duplicate_ids() {
    let nodes = vec![helpers::info("a", "first"), helpers::info("a", "second")];
    let edges = vec![helpers::input("e1", "a", "ghost")];
    let graph = DiagramGraph::build(&nodes, &edges);
    assert_eq!(graph.node_indices.len(), 1);
    assert_eq!(graph.node("a").map(|n| n.title()), Some("first"));
    assert_eq!(graph.outgoing_count("a"), 0);
    assert!(!graph.contains("ghost"));
}

#[test]
fn serialize_keeps_type_tag() {
    let diagram = load_fixture(include_str!("fixtures/lenient_diagram.json"));
    let value = serde_json::to_value(&diagram).expect("serializes");
    let nodes = &value["kijo_diagram"]["nodes"];
    assert_eq!(nodes[0]["type"], "information");
    assert_eq!(nodes[0]["property_type"], "proposition");
    assert_eq!(nodes[2]["result"], "end");
}

#[test]
fn wrongly_shaped_scalar_fields_keep_the_node() {
    let json = r#"{
        "nodes": [
            { "id": "i1", "type": "information", "title": null, "unit": 5 },
            { "id": "p1", "type": "process", "title": "算定", "description": 42, "target_subject": [] },
            { "id": "o1", "type": "information", "title": "判定", "remarks": { "note": "x" } }
        ],
        "edges": [
            { "id": "e1", "from": "i1", "to": "p1", "role": "input" },
            { "id": "e2", "from": "p1", "to": "o1", "role": "output" }
        ]
    }"#;
    let (nodes, edges) = parse::parse_graph(json).expect("should parse");
    let ids: Vec<&str> = nodes.iter().map(|n| n.id()).collect();
    assert_eq!(ids, vec!["i1", "p1", "o1"]);

    let i1 = nodes[0].as_information().expect("information node");
    assert_eq!(i1.title, "");
    assert_eq!(i1.unit, None);
    assert_eq!(nodes[1].description(), None);
    assert_eq!(nodes[2].as_information().and_then(|n| n.remarks.clone()), None);

    let result = validate::validate(&nodes, &edges);
    assert!(!result.has_code("W004"), "{:?}", result.warnings);
    assert!(!result.has_code("W005"), "{:?}", result.warnings);
}

use kijo_core::parse::*;
use kijo_core::validate::{ValidationResult, Warning};

// =============================================================================
// Node builders
// =============================================================================

pub fn info(id: &str, title: &str) -> DiagramNode {
    DiagramNode::Information(InformationNode {
        id: id.into(),
        title: title.into(),
        ..Default::default()
    })
}

pub fn info_with_description(id: &str, title: &str, description: &str) -> DiagramNode {
    DiagramNode::Information(InformationNode {
        id: id.into(),
        title: title.into(),
        description: Some(description.into()),
        ..Default::default()
    })
}

pub fn process(id: &str, title: &str) -> DiagramNode {
    DiagramNode::Process(ProcessNode {
        id: id.into(),
        title: title.into(),
        target_subject: "建築物".into(),
        ..Default::default()
    })
}

pub fn decision(id: &str, title: &str) -> DiagramNode {
    DiagramNode::Decision(DecisionNode {
        id: id.into(),
        title: title.into(),
        ..Default::default()
    })
}

pub fn terminal(id: &str, result: TerminalResult) -> DiagramNode {
    DiagramNode::Terminal(TerminalNode {
        id: id.into(),
        title: id.into(),
        result,
        description: None,
    })
}

// =============================================================================
// Edge builders
// =============================================================================

pub fn edge(id: &str, from: &str, to: &str, role: Option<EdgeRole>) -> DiagramEdge {
    DiagramEdge {
        id: id.into(),
        from: from.into(),
        to: to.into(),
        role,
        label: None,
    }
}

pub fn input(id: &str, from: &str, to: &str) -> DiagramEdge {
    edge(id, from, to, Some(EdgeRole::Input))
}

pub fn output(id: &str, from: &str, to: &str) -> DiagramEdge {
    edge(id, from, to, Some(EdgeRole::Output))
}

pub fn flow(id: &str, from: &str, to: &str) -> DiagramEdge {
    edge(id, from, to, Some(EdgeRole::Flow))
}

// =============================================================================
// Graph fixtures
// =============================================================================

/// raw → calc → derived → check → result, every rule satisfied.
pub fn well_formed_mechanism() -> (Vec<DiagramNode>, Vec<DiagramEdge>) {
    let nodes = vec![
        info("raw", "前面道路の幅員"),
        process("calc", "高さの限度の算定"),
        info("derived", "高さの限度"),
        info("measured", "建築物の高さ"),
        process("check", "高さの比較"),
        info("result", "最終判定"),
    ];
    let edges = vec![
        input("e1", "raw", "calc"),
        output("e2", "calc", "derived"),
        input("e3", "derived", "check"),
        input("e4", "measured", "check"),
        output("e5", "check", "result"),
    ];
    (nodes, edges)
}

pub fn load_fixture(json: &str) -> Diagram {
    parse(json).expect("fixture should parse")
}

// =============================================================================
// Assertions
// =============================================================================

pub fn assert_has_warning(result: &ValidationResult, code: &str) {
    assert!(
        result.warnings.iter().any(|w| w.code == code),
        "Expected warning {}, got: {:?}",
        code,
        result.warnings
    );
}

pub fn assert_no_warning(result: &ValidationResult, code: &str) {
    assert!(
        !result.warnings.iter().any(|w| w.code == code),
        "Did not expect warning {}, but got: {:?}",
        code,
        result.warnings
    );
}

pub fn warnings_with<'a>(result: &'a ValidationResult, code: &str) -> Vec<&'a Warning> {
    result.warnings.iter().filter(|w| w.code == code).collect()
}

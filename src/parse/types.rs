//! Rust types for the diagram document JSON.
//!
//! These types are the serde target for diagrams produced by the editor or
//! authored by hand. Everything except node/edge identity is optional on the
//! wire. A missing or wrongly shaped field (a `null` title, an unknown enum
//! string) falls back to its default instead of dropping the node.

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::statute::id::{DiagramId, DiagramKey};

// =============================================================================
// TOP-LEVEL DIAGRAM
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Diagram {
    #[serde(deserialize_with = "lenient")]
    pub id: String,
    #[serde(deserialize_with = "lenient")]
    pub version: String,
    #[serde(deserialize_with = "lenient")]
    pub page_title: PageTitle,
    #[serde(deserialize_with = "lenient")]
    pub legal_ref: LegalRef,
    #[serde(deserialize_with = "lenient")]
    pub labels: Vec<String>,
    #[serde(deserialize_with = "lenient")]
    pub text_raw: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub compliance_logic: Option<Value>,
    #[serde(deserialize_with = "lenient")]
    pub kijo_diagram: Option<MechanismDiagram>,
    #[serde(deserialize_with = "lenient")]
    pub flow_diagram: Option<FlowDiagram>,
    #[serde(deserialize_with = "lenient")]
    pub related_laws: Vec<RelatedLaw>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PageTitle {
    #[serde(deserialize_with = "lenient")]
    pub title: String,
    #[serde(deserialize_with = "lenient")]
    pub target_subject: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LegalRef {
    #[serde(deserialize_with = "lenient")]
    pub law_id: String,
    #[serde(deserialize_with = "lenient")]
    pub law_type: String,
    #[serde(deserialize_with = "lenient")]
    pub law_name: String,
    #[serde(deserialize_with = "lenient")]
    pub law_abbrev: String,
    #[serde(deserialize_with = "lenient")]
    pub article: String,
    #[serde(deserialize_with = "lenient")]
    pub paragraph: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub item: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RelatedLaw {
    #[serde(deserialize_with = "lenient")]
    pub law_id: String,
    #[serde(deserialize_with = "lenient")]
    pub law_name: String,
    #[serde(deserialize_with = "lenient")]
    pub article: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub relation: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub description: Option<String>,
}

/// Argument/evidence structure behind one determination. Must be loop-free.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MechanismDiagram {
    #[serde(deserialize_with = "lenient_nodes")]
    pub nodes: Vec<DiagramNode>,
    #[serde(deserialize_with = "lenient_edges")]
    pub edges: Vec<DiagramEdge>,
}

/// Procedural yes/no decision tree. Loops are permitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowDiagram {
    #[serde(deserialize_with = "lenient")]
    pub title: String,
    #[serde(deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient_nodes")]
    pub nodes: Vec<DiagramNode>,
    #[serde(deserialize_with = "lenient_edges")]
    pub edges: Vec<DiagramEdge>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagramVariant {
    Mechanism,
    Flow,
}

/// Borrowed node/edge lists of one diagram variant.
#[derive(Debug, Clone, Copy)]
pub struct GraphRef<'a> {
    pub nodes: &'a [DiagramNode],
    pub edges: &'a [DiagramEdge],
}

impl Diagram {
    pub fn graph(&self, variant: DiagramVariant) -> Option<GraphRef<'_>> {
        match variant {
            DiagramVariant::Mechanism => self.kijo_diagram.as_ref().map(|d| GraphRef {
                nodes: &d.nodes,
                edges: &d.edges,
            }),
            DiagramVariant::Flow => self.flow_diagram.as_ref().map(|d| GraphRef {
                nodes: &d.nodes,
                edges: &d.edges,
            }),
        }
    }

    /// Diagram id derived from the legal reference (`A20_3_P2`, ...).
    pub fn diagram_id(&self) -> DiagramId {
        DiagramId::new(
            &self.legal_ref.article,
            self.legal_ref.paragraph.as_deref(),
            self.legal_ref.item.as_deref(),
        )
    }

    /// `{lawId}/{articleId}` address of this diagram.
    pub fn key(&self) -> DiagramKey {
        DiagramKey::new(&self.legal_ref.law_id, self.diagram_id())
    }
}

// =============================================================================
// EDGES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramEdge {
    pub id: String,
    pub from: String,
    pub to: String,
    #[serde(default, deserialize_with = "lenient")]
    pub role: Option<EdgeRole>,
    #[serde(default, deserialize_with = "lenient")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeRole {
    Input,
    Output,
    Primary,
    Supporting,
    Flow,
    Yes,
    No,
    Option,
}

impl EdgeRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeRole::Input => "input",
            EdgeRole::Output => "output",
            EdgeRole::Primary => "primary",
            EdgeRole::Supporting => "supporting",
            EdgeRole::Flow => "flow",
            EdgeRole::Yes => "yes",
            EdgeRole::No => "no",
            EdgeRole::Option => "option",
        }
    }

    /// Roles that label a decision branch.
    pub fn is_branch(&self) -> bool {
        matches!(self, EdgeRole::Yes | EdgeRole::No | EdgeRole::Option)
    }
}

// =============================================================================
// DIAGRAM NODE: tagged union over the 4 node types
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiagramNode {
    Information(InformationNode),
    Process(ProcessNode),
    Decision(DecisionNode),
    Terminal(TerminalNode),
}

impl DiagramNode {
    pub fn id(&self) -> &str {
        match self {
            DiagramNode::Information(n) => &n.id,
            DiagramNode::Process(n) => &n.id,
            DiagramNode::Decision(n) => &n.id,
            DiagramNode::Terminal(n) => &n.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            DiagramNode::Information(n) => &n.title,
            DiagramNode::Process(n) => &n.title,
            DiagramNode::Decision(n) => &n.title,
            DiagramNode::Terminal(n) => &n.title,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            DiagramNode::Information(n) => n.description.as_deref(),
            DiagramNode::Process(n) => n.description.as_deref(),
            DiagramNode::Decision(n) => n.description.as_deref(),
            DiagramNode::Terminal(n) => n.description.as_deref(),
        }
    }

    pub fn node_type(&self) -> &'static str {
        match self {
            DiagramNode::Information(_) => "information",
            DiagramNode::Process(_) => "process",
            DiagramNode::Decision(_) => "decision",
            DiagramNode::Terminal(_) => "terminal",
        }
    }

    pub fn is_information(&self) -> bool {
        matches!(self, DiagramNode::Information(_))
    }

    pub fn is_process(&self) -> bool {
        matches!(self, DiagramNode::Process(_))
    }

    pub fn is_decision(&self) -> bool {
        matches!(self, DiagramNode::Decision(_))
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, DiagramNode::Terminal(_))
    }

    pub fn as_information(&self) -> Option<&InformationNode> {
        match self {
            DiagramNode::Information(n) => Some(n),
            _ => None,
        }
    }
}

// =============================================================================
// INFORMATION
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InformationNode {
    pub id: String,
    #[serde(deserialize_with = "lenient")]
    pub title: String,
    #[serde(deserialize_with = "lenient")]
    pub symbol: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub subject: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub property: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub property_type: PropertyType,
    #[serde(deserialize_with = "lenient")]
    pub plurality: Plurality,
    #[serde(deserialize_with = "lenient")]
    pub unit: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub related_articles: Vec<String>,
    #[serde(deserialize_with = "lenient")]
    pub delegated_requirements: Vec<DelegatedRequirement>,
    #[serde(deserialize_with = "lenient")]
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    #[default]
    Proposition,
    Classification,
    Numeric,
    GeometricPoint,
    GeometricLine,
    GeometricArea,
    GeometricSolid,
    GeometricDirection,
    SetDefinition,
    Visual,
}

impl PropertyType {
    pub fn is_geometric(&self) -> bool {
        matches!(
            self,
            PropertyType::GeometricPoint
                | PropertyType::GeometricLine
                | PropertyType::GeometricArea
                | PropertyType::GeometricSolid
                | PropertyType::GeometricDirection
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Plurality {
    #[default]
    Single,
    Multiple,
}

/// A requirement the statute delegates to another instrument (cabinet order etc.).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DelegatedRequirement {
    #[serde(deserialize_with = "lenient")]
    pub law_id: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub law_name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub article: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub description: Option<String>,
}

// =============================================================================
// PROCESS
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessNode {
    pub id: String,
    #[serde(deserialize_with = "lenient")]
    pub title: String,
    #[serde(deserialize_with = "lenient")]
    pub process_type: ProcessType,
    #[serde(deserialize_with = "lenient")]
    pub target_subject: String,
    #[serde(deserialize_with = "lenient")]
    pub iteration: Iteration,
    #[serde(deserialize_with = "lenient")]
    pub logic_expression: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub software_functions: Vec<String>,
    #[serde(deserialize_with = "lenient")]
    pub related_articles: Vec<String>,
    #[serde(deserialize_with = "lenient")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessType {
    #[default]
    Mechanical,
    HumanJudgment,
    ConsistencyCheck,
    SubDiagramReference,
    UndefinedInput,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Iteration {
    #[default]
    Single,
    Iterative,
}

// =============================================================================
// DECISION
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionNode {
    pub id: String,
    #[serde(deserialize_with = "lenient")]
    pub title: String,
    #[serde(deserialize_with = "lenient")]
    pub decision_type: DecisionType,
    #[serde(deserialize_with = "lenient")]
    pub condition: Option<Condition>,
    #[serde(deserialize_with = "lenient")]
    pub options: Vec<DecisionOption>,
    #[serde(deserialize_with = "lenient")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionType {
    #[default]
    Binary,
    Multi,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Condition {
    #[serde(deserialize_with = "lenient")]
    pub operator: String,
    #[serde(deserialize_with = "lenient")]
    pub left: Operand,
    #[serde(deserialize_with = "lenient")]
    pub right: Operand,
}

/// One side of a decision condition: a reference to another node's value
/// and/or a literal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Operand {
    #[serde(deserialize_with = "lenient")]
    pub node_id: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub property: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub value: Option<Value>,
    #[serde(deserialize_with = "lenient")]
    pub unit: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionOption {
    #[serde(deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub label: String,
    #[serde(deserialize_with = "lenient")]
    pub value: Option<String>,
}

// =============================================================================
// TERMINAL
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalNode {
    pub id: String,
    #[serde(deserialize_with = "lenient")]
    pub title: String,
    #[serde(deserialize_with = "lenient")]
    pub result: TerminalResult,
    #[serde(deserialize_with = "lenient")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalResult {
    Start,
    #[default]
    End,
    Pass,
    Fail,
}

// =============================================================================
// LENIENT DESERIALIZERS
// =============================================================================

/// Decode a field, falling back to `T::default()` when its shape is wrong.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

fn lenient_nodes<'de, D>(deserializer: D) -> Result<Vec<DiagramNode>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(nodes_from_value(&value))
}

fn lenient_edges<'de, D>(deserializer: D) -> Result<Vec<DiagramEdge>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(edges_from_value(&value))
}

/// Decode a node list, skipping entries without an id or with an unknown type.
pub fn nodes_from_value(value: &Value) -> Vec<DiagramNode> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| {
            let id = item.get("id").and_then(Value::as_str).unwrap_or_default();
            if id.is_empty() {
                log::warn!("skipping diagram node without an id");
                return None;
            }
            match serde_json::from_value::<DiagramNode>(item.clone()) {
                Ok(node) => Some(node),
                Err(e) => {
                    log::warn!(node_id = id; "skipping undecodable diagram node: {e}");
                    None
                }
            }
        })
        .collect()
}

/// Decode an edge list, skipping entries missing `id`, `from` or `to`.
pub fn edges_from_value(value: &Value) -> Vec<DiagramEdge> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match serde_json::from_value::<DiagramEdge>(item.clone()) {
            Ok(edge) => Some(edge),
            Err(e) => {
                log::warn!("skipping undecodable diagram edge: {e}");
                None
            }
        })
        .collect()
}

//! Generic statute tag-tree → `LawNode` hierarchy.
//!
//! The input is the JSON conversion of government statute markup:
//! `{ tag, attr?, children?: (Node | string)[] }`. Only the structure below
//! `LawBody/MainProvision` is walked; supplementary provisions and tables are
//! ignored.

use std::collections::BTreeMap;

use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::MAX_DEPTH;
use super::id::DiagramId;
use super::text::{extract_text, is_regulation_sentence};
use crate::error::CoreError;
use crate::parse::types::lenient;

/// One element of the tag tree. A malformed `attr` decodes as empty;
/// malformed children are dropped individually.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagNode {
    pub tag: String,
    #[serde(default, deserialize_with = "lenient")]
    pub attr: BTreeMap<String, Value>,
    #[serde(default, deserialize_with = "lenient_children")]
    pub children: Vec<TagChild>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagChild {
    Node(TagNode),
    Text(String),
}

fn lenient_children<'de, D>(deserializer: D) -> Result<Vec<TagChild>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(text) => Some(TagChild::Text(text)),
            Value::Object(_) => match serde_json::from_value::<TagNode>(item) {
                Ok(node) => Some(TagChild::Node(node)),
                Err(e) => {
                    log::warn!("skipping undecodable statute element: {e}");
                    None
                }
            },
            other => {
                log::warn!("skipping non-element statute child: {other}");
                None
            }
        })
        .collect())
}

impl TagNode {
    pub fn child_nodes(&self) -> impl Iterator<Item = &TagNode> {
        self.children.iter().filter_map(|c| match c {
            TagChild::Node(n) => Some(n),
            TagChild::Text(_) => None,
        })
    }

    pub fn child(&self, tag: &str) -> Option<&TagNode> {
        self.child_nodes().find(|n| n.tag == tag)
    }

    pub fn num(&self) -> Option<&str> {
        self.attr
            .get("Num")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Text of the direct children, skipping child elements tagged `skip`.
    pub fn own_text(&self, skip: &[&str]) -> String {
        let mut out = String::new();
        for child in &self.children {
            match child {
                TagChild::Text(text) => out.push_str(text),
                TagChild::Node(n) if !skip.contains(&n.tag.as_str()) => {
                    out.push_str(&extract_text(n))
                }
                TagChild::Node(_) => {}
            }
        }
        out
    }

    /// Depth-first search for the first descendant (or self) with `tag`.
    pub fn find(&self, tag: &str) -> Option<&TagNode> {
        self.find_bounded(tag, 0)
    }

    fn find_bounded(&self, tag: &str, depth: usize) -> Option<&TagNode> {
        if self.tag == tag {
            return Some(self);
        }
        if depth >= MAX_DEPTH {
            return None;
        }
        self.child_nodes().find_map(|n| n.find_bounded(tag, depth + 1))
    }
}

// =============================================================================
// LAW NODE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LawNodeKind {
    Part,
    Chapter,
    Section,
    Subsection,
    Division,
    Article,
    Paragraph,
    Item,
}

impl LawNodeKind {
    fn container(tag: &str) -> Option<Self> {
        match tag {
            "Part" => Some(LawNodeKind::Part),
            "Chapter" => Some(LawNodeKind::Chapter),
            "Section" => Some(LawNodeKind::Section),
            "Subsection" => Some(LawNodeKind::Subsection),
            "Division" => Some(LawNodeKind::Division),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LawNodeKind::Part => "Part",
            LawNodeKind::Chapter => "Chapter",
            LawNodeKind::Section => "Section",
            LawNodeKind::Subsection => "Subsection",
            LawNodeKind::Division => "Division",
            LawNodeKind::Article => "Article",
            LawNodeKind::Paragraph => "Paragraph",
            LawNodeKind::Item => "Item",
        }
    }
}

/// One level of the statutory hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LawNode {
    #[serde(rename = "type")]
    pub kind: LawNodeKind,
    pub title: String,
    pub caption: Option<String>,
    pub article_num: Option<String>,
    pub paragraph_num: Option<String>,
    pub item_num: Option<String>,
    /// Concatenated sentence text. Empty for containers.
    pub text: String,
    pub is_regulation: bool,
    pub diagram_id: Option<DiagramId>,
    pub children: Vec<LawNode>,
}

impl LawNode {
    fn container(kind: LawNodeKind, title: String) -> Self {
        LawNode {
            kind,
            title,
            caption: None,
            article_num: None,
            paragraph_num: None,
            item_num: None,
            text: String::new(),
            is_regulation: false,
            diagram_id: None,
            children: Vec::new(),
        }
    }

    /// All nodes of this subtree in document order (self first).
    pub fn walk(&self) -> Vec<&LawNode> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.walk());
        }
        out
    }
}

// =============================================================================
// PARSING
// =============================================================================

/// Parse a statute tag tree given as JSON text. Undecodable text yields an
/// empty hierarchy.
pub fn parse_law_json(json: &str) -> Vec<LawNode> {
    try_parse_law_json(json).unwrap_or_else(|e| {
        log::warn!("{e}");
        Vec::new()
    })
}

/// Like `parse_law_json`, but undecodable text is an `S001` error.
pub fn try_parse_law_json(json: &str) -> Result<Vec<LawNode>, CoreError> {
    let value = serde_json::from_str::<Value>(json)
        .map_err(|e| CoreError::statute("S001", format!("Failed to parse statute JSON: {}", e)))?;
    Ok(parse_law_value(&value))
}

/// Parse a statute tag tree. Non-object input, or a tree lacking the
/// `LawBody`/`MainProvision` containers, yields an empty list.
pub fn parse_law_value(value: &Value) -> Vec<LawNode> {
    if !value.is_object() {
        log::warn!("statute input is not an object");
        return Vec::new();
    }
    match serde_json::from_value::<TagNode>(value.clone()) {
        Ok(root) => parse_law_tree(&root),
        Err(e) => {
            log::warn!("statute input is not a tag tree: {e}");
            Vec::new()
        }
    }
}

pub fn parse_law_tree(root: &TagNode) -> Vec<LawNode> {
    let Some(main) = root.find("LawBody").and_then(|body| body.find("MainProvision")) else {
        log::debug!(root = root.tag.as_str(); "no LawBody/MainProvision found");
        return Vec::new();
    };
    let nodes = parse_containers(main, 0);
    log::debug!(top_level = nodes.len(); "parsed statute hierarchy");
    nodes
}

fn parse_containers(parent: &TagNode, depth: usize) -> Vec<LawNode> {
    if depth > MAX_DEPTH {
        log::warn!(tag = parent.tag.as_str(); "statute nesting depth limit reached");
        return Vec::new();
    }
    parent
        .child_nodes()
        .filter_map(|child| {
            if child.tag == "Article" {
                return Some(parse_article(child));
            }
            let kind = LawNodeKind::container(&child.tag)?;
            let title = child
                .child(&format!("{}Title", child.tag))
                .map(extract_text)
                .unwrap_or_default();
            let mut node = LawNode::container(kind, title);
            node.children = parse_containers(child, depth + 1);
            Some(node)
        })
        .collect()
}

fn parse_article(article: &TagNode) -> LawNode {
    let article_num = article.num().unwrap_or_default().to_string();
    let title = article
        .child("ArticleTitle")
        .map(extract_text)
        .unwrap_or_default();

    let mut node = LawNode::container(LawNodeKind::Article, title);
    node.caption = article
        .child("ArticleCaption")
        .map(extract_text)
        .filter(|c| !c.is_empty());
    node.children = article
        .child_nodes()
        .filter(|n| n.tag == "Paragraph")
        .enumerate()
        .map(|(index, p)| parse_paragraph(p, &article_num, index))
        .collect();
    node.article_num = Some(article_num);
    node
}

fn parse_paragraph(paragraph: &TagNode, article_num: &str, index: usize) -> LawNode {
    let num = paragraph
        .num()
        .map(str::to_string)
        .unwrap_or_else(|| (index + 1).to_string());
    let text = paragraph
        .child("ParagraphSentence")
        .map(extract_text)
        .unwrap_or_else(|| paragraph.own_text(&["ParagraphNum", "ParagraphCaption", "Item"]));
    let title = paragraph
        .child("ParagraphNum")
        .map(extract_text)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| num.clone());

    let items = paragraph
        .child_nodes()
        .filter(|n| n.tag == "Item")
        .map(|i| parse_item(i, article_num, &num))
        .collect();

    LawNode {
        kind: LawNodeKind::Paragraph,
        title,
        caption: None,
        article_num: Some(article_num.to_string()),
        paragraph_num: Some(num.clone()),
        item_num: None,
        is_regulation: is_regulation_sentence(&text),
        text,
        diagram_id: Some(DiagramId::new(article_num, Some(&num), None)),
        children: items,
    }
}

fn parse_item(item: &TagNode, article_num: &str, paragraph_num: &str) -> LawNode {
    let num = item.num().unwrap_or_default().to_string();
    let text = item
        .child("ItemSentence")
        .map(extract_text)
        .unwrap_or_else(|| item.own_text(&["ItemTitle"]));
    let title = item
        .child("ItemTitle")
        .map(extract_text)
        .unwrap_or_else(|| num.clone());
    let diagram_id =
        (!num.is_empty()).then(|| DiagramId::new(article_num, Some(paragraph_num), Some(&num)));

    LawNode {
        kind: LawNodeKind::Item,
        title,
        caption: None,
        article_num: Some(article_num.to_string()),
        paragraph_num: Some(paragraph_num.to_string()),
        item_num: Some(num),
        is_regulation: is_regulation_sentence(&text),
        text,
        diagram_id,
        children: Vec::new(),
    }
}

/// Every regulation Paragraph/Item in document order.
pub fn regulation_nodes(nodes: &[LawNode]) -> Vec<&LawNode> {
    nodes
        .iter()
        .flat_map(LawNode::walk)
        .filter(|n| n.is_regulation)
        .collect()
}

pub fn find_by_diagram_id<'a>(nodes: &'a [LawNode], id: &DiagramId) -> Option<&'a LawNode> {
    nodes
        .iter()
        .flat_map(LawNode::walk)
        .find(|n| n.diagram_id.as_ref() == Some(id))
}

//! Error types shared across the core.
//!
//! Structural problems in a diagram are never errors (see `validate::Warning`).
//! `CoreError` only covers input that cannot be decoded at all.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Phase {
    Parse,
    Statute,
    Layout,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Parse => write!(f, "Parse"),
            Phase::Statute => write!(f, "Statute"),
            Phase::Layout => write!(f, "Layout"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CoreError {
    pub code: String,
    pub phase: Phase,
    pub message: String,
    pub node_id: Option<String>,
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.node_id {
            Some(id) => write!(
                f,
                "[{}:{}] {} (node '{}')",
                self.phase, self.code, self.message, id
            ),
            None => write!(f, "[{}:{}] {}", self.phase, self.code, self.message),
        }
    }
}

impl std::error::Error for CoreError {}

impl CoreError {
    pub fn parse(code: &str, message: impl Into<String>) -> Self {
        CoreError {
            code: code.into(),
            phase: Phase::Parse,
            message: message.into(),
            node_id: None,
        }
    }

    pub fn statute(code: &str, message: impl Into<String>) -> Self {
        CoreError {
            code: code.into(),
            phase: Phase::Statute,
            message: message.into(),
            node_id: None,
        }
    }

    pub fn layout(code: &str, message: impl Into<String>) -> Self {
        CoreError {
            code: code.into(),
            phase: Phase::Layout,
            message: message.into(),
            node_id: None,
        }
    }
}

/// Malformed diagram identifiers and diagram keys.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    #[error("diagram id must start with 'A', got '{0}'")]
    MissingArticlePrefix(String),
    #[error("diagram id '{0}' has an empty article number")]
    EmptyArticle(String),
    #[error("diagram id '{id}' has an empty {segment} segment")]
    EmptySegment { id: String, segment: &'static str },
    #[error("diagram key must look like '<lawId>/<articleId>', got '{0}'")]
    MalformedKey(String),
}

impl From<IdError> for CoreError {
    fn from(e: IdError) -> Self {
        CoreError::parse("P003", e.to_string())
    }
}

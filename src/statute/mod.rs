//! Statute phase: tag tree → annotated `LawNode` hierarchy.

pub mod cache;
pub mod id;
pub mod text;
pub mod tree;

pub use cache::{RevisionCache, RevisionKey};
pub use id::{DiagramId, DiagramKey};
pub use text::{extract_text, is_regulation_sentence};
pub use tree::*;

/// Nesting bound for tag-tree recursion. Real statutes stay under 10 levels.
pub const MAX_DEPTH: usize = 32;

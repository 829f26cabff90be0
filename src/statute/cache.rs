//! Explicit, caller-owned cache of parsed statute revisions.

use std::collections::HashMap;

use serde_json::Value;

use super::tree::{LawNode, parse_law_value};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RevisionKey {
    pub law_id: String,
    pub revision_id: String,
}

impl RevisionKey {
    pub fn new(law_id: impl Into<String>, revision_id: impl Into<String>) -> Self {
        RevisionKey {
            law_id: law_id.into(),
            revision_id: revision_id.into(),
        }
    }
}

/// Parsed hierarchies keyed by statute revision. A hierarchy is built once
/// per fetch and replaced, never mutated, when the revision is refetched.
#[derive(Debug, Default)]
pub struct RevisionCache {
    entries: HashMap<RevisionKey, Vec<LawNode>>,
}

impl RevisionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &RevisionKey) -> Option<&[LawNode]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// Return the cached hierarchy, parsing `tree` on a miss.
    pub fn get_or_parse(&mut self, key: RevisionKey, tree: &Value) -> &[LawNode] {
        self.entries
            .entry(key)
            .or_insert_with_key(|key| {
                log::debug!(
                    law_id = key.law_id.as_str(),
                    revision_id = key.revision_id.as_str();
                    "statute revision cache miss"
                );
                parse_law_value(tree)
            })
            .as_slice()
    }

    pub fn insert(&mut self, key: RevisionKey, nodes: Vec<LawNode>) -> Option<Vec<LawNode>> {
        self.entries.insert(key, nodes)
    }

    pub fn invalidate(&mut self, key: &RevisionKey) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Drop every cached revision of one law. Returns how many were dropped.
    pub fn invalidate_law(&mut self, law_id: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| key.law_id != law_id);
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

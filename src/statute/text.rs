//! Sentence text extraction and regulation classification.

use super::tree::{TagChild, TagNode};

/// Trailing phrases marking an obligation or prohibition:
/// "must", "must not", "cannot", "shall be deemed to".
const REGULATION_ENDINGS: [&str; 4] = ["なければならない", "てはならない", "ことができない", "ものとみなす"];

/// Closing marks allowed (at most one) after a regulation ending.
const CLOSING_MARKS: [char; 4] = ['。', '.', '」', '）'];

/// Concatenate every descendant text leaf in document order, no separators.
pub fn extract_text(node: &TagNode) -> String {
    let mut out = String::new();
    push_text(node, 0, &mut out);
    out
}

fn push_text(node: &TagNode, depth: usize, out: &mut String) {
    if depth > super::MAX_DEPTH {
        log::warn!(tag = node.tag.as_str(); "text extraction depth limit reached");
        return;
    }
    for child in &node.children {
        match child {
            TagChild::Text(s) => out.push_str(s),
            TagChild::Node(n) => push_text(n, depth + 1, out),
        }
    }
}

/// True when the trimmed sentence ends with a regulation phrase, optionally
/// followed by a single closing mark.
pub fn is_regulation_sentence(sentence: &str) -> bool {
    let trimmed = sentence.trim();
    let body = match trimmed.chars().last() {
        Some(c) if CLOSING_MARKS.contains(&c) => &trimmed[..trimmed.len() - c.len_utf8()],
        _ => trimmed,
    };
    REGULATION_ENDINGS.iter().any(|ending| body.ends_with(ending))
}

//! Node size estimation for nodes the renderer has not measured yet.

use super::{LayoutConfig, Size};
use crate::parse::types::DiagramNode;

/// Characters wrapped around an information node's symbol, e.g. `（x）`.
const SYMBOL_AFFIX_CHARS: usize = 2;

/// `max(min_width, title chars × char_width + padding)`, where information
/// nodes also count their symbol and its brackets as title characters.
pub fn estimate_width(node: &DiagramNode, config: &LayoutConfig) -> f64 {
    let mut chars = node.title().chars().count();
    if let Some(symbol) = node
        .as_information()
        .and_then(|info| info.symbol.as_deref())
        .filter(|s| !s.is_empty())
    {
        chars += symbol.chars().count() + SYMBOL_AFFIX_CHARS;
    }
    (chars as f64 * config.char_width + config.padding).max(config.min_width)
}

pub fn estimate_size(node: &DiagramNode, config: &LayoutConfig) -> Size {
    Size {
        width: estimate_width(node, config),
        height: config.node_height,
    }
}

/// Attribute-only edits need a new layout only when they change the width.
pub fn needs_relayout(before: &DiagramNode, after: &DiagramNode, config: &LayoutConfig) -> bool {
    before.id() != after.id()
        || before.node_type() != after.node_type()
        || estimate_width(before, config) != estimate_width(after, config)
}

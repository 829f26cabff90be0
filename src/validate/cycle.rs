//! Three-color DFS cycle detection.
//!
//! Mechanism diagrams must be loop-free. Flow diagrams are never checked:
//! remediation loops ("fix and re-submit") are legitimate there.

use std::collections::HashMap;

use crate::parse::types::{DiagramEdge, DiagramNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

pub fn has_cycle(nodes: &[DiagramNode], edges: &[DiagramEdge]) -> bool {
    find_cycle(nodes, edges).is_some()
}

/// Node ids along the first cycle found, starting and ending at the node the
/// back-edge points to. Roots are tried in node order and successors in edge
/// order, so the answer is stable for a given input. Edges with an unknown
/// endpoint are ignored.
pub fn find_cycle(nodes: &[DiagramNode], edges: &[DiagramEdge]) -> Option<Vec<String>> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    for node in nodes {
        let next = index.len();
        index.entry(node.id()).or_insert(next);
    }
    let ids: Vec<&str> = {
        let mut ids = vec![""; index.len()];
        for (&id, &i) in &index {
            ids[i] = id;
        }
        ids
    };

    let mut adj: Vec<Vec<usize>> = vec![Vec::new(); ids.len()];
    for edge in edges {
        if let (Some(&s), Some(&t)) = (index.get(edge.from.as_str()), index.get(edge.to.as_str())) {
            adj[s].push(t);
        }
    }

    let mut color = vec![Color::White; ids.len()];
    for root in 0..ids.len() {
        if color[root] != Color::White {
            continue;
        }
        // Each frame is (node, next successor position); the stack doubles as
        // the current DFS path.
        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
        color[root] = Color::Gray;

        while let Some(frame) = stack.last_mut() {
            let (u, pos) = *frame;
            if pos < adj[u].len() {
                frame.1 += 1;
                let v = adj[u][pos];
                match color[v] {
                    Color::White => {
                        color[v] = Color::Gray;
                        stack.push((v, 0));
                    }
                    Color::Gray => {
                        let start = stack.iter().position(|&(n, _)| n == v).unwrap_or(0);
                        let mut path: Vec<String> =
                            stack[start..].iter().map(|&(n, _)| ids[n].to_string()).collect();
                        path.push(ids[v].to_string());
                        log::debug!(length = path.len() - 1; "cycle detected");
                        return Some(path);
                    }
                    Color::Black => {}
                }
            } else {
                color[u] = Color::Black;
                stack.pop();
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::types::{DiagramNode, TerminalNode};

    fn node(id: &str) -> DiagramNode {
        DiagramNode::Terminal(TerminalNode {
            id: id.into(),
            ..Default::default()
        })
    }

    fn edge(from: &str, to: &str) -> DiagramEdge {
        DiagramEdge {
            id: format!("{from}-{to}"),
            from: from.into(),
            to: to.into(),
            role: None,
            label: None,
        }
    }

    #[test]
    fn reports_the_cycle_path() {
        let nodes = vec![node("a"), node("b"), node("c"), node("d")];
        let edges = vec![edge("d", "a"), edge("a", "b"), edge("b", "c"), edge("c", "a")];
        assert_eq!(
            find_cycle(&nodes, &edges),
            Some(vec!["a".into(), "b".into(), "c".into(), "a".into()])
        );
    }

    #[test]
    fn self_loop_is_a_cycle() {
        let nodes = vec![node("a")];
        assert!(has_cycle(&nodes, &[edge("a", "a")]));
    }

    #[test]
    fn diamond_is_not_a_cycle() {
        let nodes = vec![node("a"), node("b"), node("c"), node("d")];
        let edges = vec![edge("a", "b"), edge("a", "c"), edge("b", "d"), edge("c", "d")];
        assert!(!has_cycle(&nodes, &edges));
    }

    #[test]
    fn dangling_edges_are_ignored() {
        let nodes = vec![node("a")];
        assert!(!has_cycle(&nodes, &[edge("a", "ghost"), edge("ghost", "a")]));
    }
}

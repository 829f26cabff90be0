//! Layer assignment: cycle breaking + longest-path ranking.

use std::collections::HashMap;

use super::{LayoutEdge, LayoutNode};

/// Index-based adjacency over the nodes being laid out. Edges are oriented so
/// the graph is acyclic; parallel edges and self-loops are dropped.
pub(crate) struct LayoutGraph {
    pub n: usize,
    pub adj: Vec<Vec<usize>>,
    pub rev: Vec<Vec<usize>>,
}

impl LayoutGraph {
    pub fn build(nodes: &[LayoutNode], edges: &[LayoutEdge], index: &HashMap<&str, usize>) -> Self {
        let n = nodes.len();
        let mut raw: Vec<Vec<usize>> = vec![Vec::new(); n];
        for edge in edges {
            let (Some(&s), Some(&t)) = (index.get(edge.from.as_str()), index.get(edge.to.as_str()))
            else {
                continue;
            };
            if s != t && !raw[s].contains(&t) {
                raw[s].push(t);
            }
        }

        let back_edges = find_back_edges(&raw);
        let mut adj: Vec<Vec<usize>> = vec![Vec::new(); n];
        for (s, targets) in raw.iter().enumerate() {
            for &t in targets {
                let (a, b) = if back_edges.contains(&(s, t)) { (t, s) } else { (s, t) };
                if !adj[a].contains(&b) {
                    adj[a].push(b);
                }
            }
        }
        if !back_edges.is_empty() {
            log::debug!(reversed = back_edges.len(); "reversed back edges for ranking");
        }

        let mut rev: Vec<Vec<usize>> = vec![Vec::new(); n];
        for (s, targets) in adj.iter().enumerate() {
            for &t in targets {
                rev[t].push(s);
            }
        }
        LayoutGraph { n, adj, rev }
    }
}

/// DFS in input order; an edge into a node still on the stack closes a loop.
fn find_back_edges(adj: &[Vec<usize>]) -> Vec<(usize, usize)> {
    let n = adj.len();
    let mut on_stack = vec![false; n];
    let mut visited = vec![false; n];
    let mut back = Vec::new();

    for root in 0..n {
        if visited[root] {
            continue;
        }
        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
        visited[root] = true;
        on_stack[root] = true;
        while let Some(frame) = stack.last_mut() {
            let (u, pos) = *frame;
            if pos < adj[u].len() {
                frame.1 += 1;
                let v = adj[u][pos];
                if on_stack[v] {
                    back.push((u, v));
                } else if !visited[v] {
                    visited[v] = true;
                    on_stack[v] = true;
                    stack.push((v, 0));
                }
            } else {
                on_stack[u] = false;
                stack.pop();
            }
        }
    }
    back
}

/// Longest path from sources: sources get rank 0, every other node one more
/// than its highest-ranked predecessor. Kahn order keeps it deterministic.
pub(crate) fn assign_ranks(graph: &LayoutGraph) -> Vec<usize> {
    let n = graph.n;
    let mut in_degree: Vec<usize> = graph.rev.iter().map(Vec::len).collect();
    let mut queue: Vec<usize> = (0..n).filter(|&v| in_degree[v] == 0).collect();
    let mut ranks = vec![0usize; n];

    let mut head = 0;
    while head < queue.len() {
        let u = queue[head];
        head += 1;
        for &v in &graph.adj[u] {
            ranks[v] = ranks[v].max(ranks[u] + 1);
            in_degree[v] -= 1;
            if in_degree[v] == 0 {
                queue.push(v);
            }
        }
    }
    ranks
}

//! Ordering within ranks: iterated barycenter crossing reduction.

use std::cmp::Ordering;

use super::rank::LayoutGraph;

/// `buckets[r]` lists node indices of rank `r` in input order.
pub(crate) fn build_rank_buckets(ranks: &[usize]) -> Vec<Vec<usize>> {
    let Some(&max_rank) = ranks.iter().max() else {
        return vec![];
    };
    let mut buckets = vec![vec![]; max_rank + 1];
    for (v, &r) in ranks.iter().enumerate() {
        buckets[r].push(v);
    }
    buckets
}

fn positions(n: usize, order: &[usize]) -> Vec<Option<usize>> {
    let mut pos = vec![None; n];
    for (i, &v) in order.iter().enumerate() {
        pos[v] = Some(i);
    }
    pos
}

/// Mean position of `neighbors` within the fixed rank; nodes without
/// neighbors there keep their current slot.
fn barycenter(current: usize, fixed_pos: &[Option<usize>], neighbors: &[usize]) -> f64 {
    let placed: Vec<usize> = neighbors.iter().filter_map(|&nb| fixed_pos[nb]).collect();
    if placed.is_empty() {
        current as f64
    } else {
        placed.iter().sum::<usize>() as f64 / placed.len() as f64
    }
}

fn reorder(rank: &mut Vec<usize>, fixed: &[usize], n: usize, neighbors: &[Vec<usize>]) {
    let fixed_pos = positions(n, fixed);
    let mut scored: Vec<(usize, f64, usize)> = rank
        .iter()
        .enumerate()
        .map(|(slot, &v)| (v, barycenter(slot, &fixed_pos, &neighbors[v]), slot))
        .collect();
    scored.sort_by(|a, b| {
        a.1.partial_cmp(&b.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.2.cmp(&b.2))
    });
    *rank = scored.into_iter().map(|(v, _, _)| v).collect();
}

/// Crossings between two adjacent ranks, counting only edges between them.
fn count_crossings(upper: &[usize], lower: &[usize], graph: &LayoutGraph) -> usize {
    let lower_pos = positions(graph.n, lower);
    let mut pairs: Vec<(usize, usize)> = Vec::new();
    for (i, &u) in upper.iter().enumerate() {
        for &v in &graph.adj[u] {
            if let Some(j) = lower_pos[v] {
                pairs.push((i, j));
            }
        }
    }
    let mut crossings = 0;
    for (k, &(a1, b1)) in pairs.iter().enumerate() {
        for &(a2, b2) in &pairs[k + 1..] {
            if (a1 < a2 && b1 > b2) || (a1 > a2 && b1 < b2) {
                crossings += 1;
            }
        }
    }
    crossings
}

pub(crate) fn total_crossings(rank_order: &[Vec<usize>], graph: &LayoutGraph) -> usize {
    rank_order
        .windows(2)
        .map(|pair| count_crossings(&pair[0], &pair[1], graph))
        .sum()
}

/// Alternate forward (by predecessors) and backward (by successors) sweeps,
/// keeping the best ordering seen. Stops at the first pass that does not
/// improve, or after `max_passes`. Returns the final crossing count.
pub(crate) fn minimize_crossings(
    rank_order: &mut Vec<Vec<usize>>,
    graph: &LayoutGraph,
    max_passes: usize,
) -> usize {
    let mut best = total_crossings(rank_order, graph);
    if rank_order.len() <= 1 || best == 0 {
        return best;
    }
    let mut best_order = rank_order.clone();

    for _ in 0..max_passes {
        for r in 1..rank_order.len() {
            let fixed = rank_order[r - 1].clone();
            reorder(&mut rank_order[r], &fixed, graph.n, &graph.rev);
        }
        for r in (0..rank_order.len() - 1).rev() {
            let fixed = rank_order[r + 1].clone();
            reorder(&mut rank_order[r], &fixed, graph.n, &graph.adj);
        }

        let crossings = total_crossings(rank_order, graph);
        if crossings < best {
            best = crossings;
            best_order = rank_order.clone();
            if best == 0 {
                break;
            }
        } else {
            break;
        }
    }

    *rank_order = best_order;
    best
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::layout::rank::assign_ranks;
    use crate::layout::{LayoutEdge, LayoutNode};

    #[test]
    fn untangles_a_simple_crossing() {
        // a → d, b → c with c listed before d: one crossing in input order.
        let nodes: Vec<LayoutNode> = ["a", "b", "c", "d"]
            .iter()
            .map(|id| LayoutNode::new(*id, 100.0, 40.0))
            .collect();
        let edges = vec![LayoutEdge::new("a", "d"), LayoutEdge::new("b", "c")];
        let index: HashMap<&str, usize> = nodes.iter().enumerate().map(|(i, n)| (n.id.as_str(), i)).collect();
        let graph = LayoutGraph::build(&nodes, &edges, &index);
        let mut order = build_rank_buckets(&assign_ranks(&graph));
        assert_eq!(total_crossings(&order, &graph), 1);

        let crossings = minimize_crossings(&mut order, &graph, 8);
        assert_eq!(crossings, 0);
        assert_eq!(order[1], vec![3, 2]);
    }
}

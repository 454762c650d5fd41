//! Column assignment over forward edges.

use std::collections::VecDeque;

use log::debug;

use crate::ir::{EdgeBehavior, ProcessIR};

/// Result of the layering phase, indexed like `ProcessIR::nodes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Columns {
    pub column: Vec<usize>,
    /// True when the column came from the cycle fallback rather than from
    /// its predecessors.
    pub fallback: Vec<bool>,
    /// Visitation order: Kahn order, then unreached nodes in declaration order.
    pub order: Vec<usize>,
}

impl Columns {
    pub fn max_column(&self) -> usize {
        self.column.iter().copied().max().unwrap_or(0)
    }
}

/// Assign every node a column so that each forward edge increases the column.
///
/// Loop-back edges are ignored entirely. Nodes stuck in forward cycles get a
/// column from their position in the visitation order.
pub fn assign_columns(ir: &ProcessIR) -> Columns {
    let n = ir.nodes.len();
    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut in_degree: Vec<usize> = vec![0; n];

    for edge in ir
        .edges
        .iter()
        .filter(|e| e.behavior == EdgeBehavior::Forward)
    {
        successors[edge.source].push(edge.target);
        predecessors[edge.target].push(edge.source);
        in_degree[edge.target] += 1;
    }

    // Seeds in declaration order; that order is the tie-break throughout.
    let mut queue: VecDeque<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
    let mut visited = vec![false; n];
    let mut order: Vec<usize> = Vec::with_capacity(n);

    while let Some(current) = queue.pop_front() {
        visited[current] = true;
        order.push(current);
        for &next in &successors[current] {
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                queue.push_back(next);
            }
        }
    }

    let reached = order.len();
    order.extend((0..n).filter(|&i| !visited[i]));
    if reached < n {
        debug!(unreached = n - reached; "Forward edges contain a cycle, using fallback columns");
    }

    let mut column: Vec<Option<usize>> = vec![None; n];
    let mut fallback = vec![false; n];
    for (position, &node) in order.iter().enumerate() {
        if column[node].is_some() {
            continue;
        }
        let preds = &predecessors[node];
        let assigned = if preds.is_empty() {
            0
        } else {
            let known: Option<Vec<usize>> = preds.iter().map(|&p| column[p]).collect();
            match known {
                Some(cols) => cols.into_iter().max().unwrap_or(0) + 1,
                None => {
                    fallback[node] = true;
                    position
                }
            }
        };
        column[node] = Some(assigned);
    }

    Columns {
        column: column.into_iter().map(|c| c.unwrap_or(0)).collect(),
        fallback,
        order,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::description::Description;
    use proptest::prelude::*;

    fn columns_of(desc: Description) -> (ProcessIR, Columns) {
        let ir = ProcessIR::from_description(&desc);
        let cols = assign_columns(&ir);
        (ir, cols)
    }

    #[test]
    fn test_linear_chain() {
        let (_, cols) = columns_of(
            Description::new()
                .band("a", "A")
                .node("start", "startEvent", "a")
                .node("task1", "task", "a")
                .node("end", "endEvent", "a")
                .edge("start", "task1")
                .edge("task1", "end"),
        );
        assert_eq!(cols.column, vec![0, 1, 2]);
        assert!(cols.fallback.iter().all(|f| !f));
    }

    #[test]
    fn test_longest_path_wins() {
        // a -> b -> c and a -> c: c must sit right of b
        let (_, cols) = columns_of(
            Description::new()
                .band("x", "X")
                .node("a", "task", "x")
                .node("b", "task", "x")
                .node("c", "task", "x")
                .edge("a", "c")
                .edge("a", "b")
                .edge("b", "c"),
        );
        assert_eq!(cols.column, vec![0, 1, 2]);
    }

    #[test]
    fn test_loop_edges_ignored() {
        let (_, cols) = columns_of(
            Description::new()
                .band("x", "X")
                .node("draft", "task", "x")
                .node("review", "task", "x")
                .node("rework", "task", "x")
                .edge("draft", "review")
                .edge("review", "rework")
                .loop_edge("rework", "draft"),
        );
        assert_eq!(cols.column, vec![0, 1, 2]);
        assert!(cols.fallback.iter().all(|f| !f));
    }

    #[test]
    fn test_forward_cycle_terminates() {
        let (_, cols) = columns_of(
            Description::new()
                .band("x", "X")
                .node("a", "task", "x")
                .node("b", "task", "x")
                .node("c", "task", "x")
                .edge("a", "b")
                .edge("b", "c")
                .edge("c", "a"),
        );
        assert_eq!(cols.order, vec![0, 1, 2]);
        assert_eq!(cols.column, vec![0, 1, 2]);
        assert_eq!(cols.fallback, vec![true, false, false]);
    }

    #[test]
    fn test_cycle_behind_entry() {
        // s -> x, x <-> y
        let (_, cols) = columns_of(
            Description::new()
                .band("b", "B")
                .node("s", "startEvent", "b")
                .node("x", "task", "b")
                .node("y", "task", "b")
                .edge("s", "x")
                .edge("x", "y")
                .edge("y", "x"),
        );
        assert_eq!(cols.order, vec![0, 1, 2]);
        assert_eq!(cols.column[0], 0);
        assert!(cols.fallback[1]);
        assert!(cols.column[1] > cols.column[0]);
        assert!(cols.column[2] > cols.column[1]);
    }

    #[test]
    fn test_disconnected_nodes_start_at_zero() {
        let (_, cols) = columns_of(
            Description::new()
                .band("b", "B")
                .node("a", "task", "b")
                .node("lonely", "task", "b")
                .node("c", "task", "b")
                .edge("a", "c"),
        );
        assert_eq!(cols.column, vec![0, 0, 1]);
        assert_eq!(cols.max_column(), 1);
    }

    #[test]
    fn test_seed_order_is_declaration_order() {
        let (_, cols) = columns_of(
            Description::new()
                .band("b", "B")
                .node("z", "task", "b")
                .node("y", "task", "b")
                .node("x", "task", "b")
                .edge("z", "x"),
        );
        assert_eq!(cols.order, vec![0, 1, 2]);
    }

    #[test]
    fn test_self_loop_forward_edge() {
        let (_, cols) = columns_of(
            Description::new()
                .band("b", "B")
                .node("a", "task", "b")
                .node("b", "task", "b")
                .edge("a", "a")
                .edge("a", "b"),
        );
        // "a" never reaches in-degree zero, "b" waits on it
        assert_eq!(cols.order, vec![0, 1]);
        assert!(cols.fallback[0]);
        assert_eq!(cols.column, vec![0, 1]);
    }

    // ── Arbitrary forward graphs ────────────────────────────────────────

    fn forward_graph() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
        (1usize..10).prop_flat_map(|n| (Just(n), prop::collection::vec((0..n, 0..n), 0..24)))
    }

    proptest! {
        #[test]
        fn test_forward_edges_increase_column((n, edges) in forward_graph()) {
            let mut desc = Description::new().band("b", "B");
            for i in 0..n {
                desc = desc.node(&format!("n{i}"), "task", "b");
            }
            for &(from, to) in &edges {
                desc = desc.edge(&format!("n{from}"), &format!("n{to}"));
            }
            let (ir, cols) = columns_of(desc);

            prop_assert_eq!(cols.column.len(), n);
            let mut seen = cols.order.clone();
            seen.sort_unstable();
            prop_assert_eq!(seen, (0..n).collect::<Vec<_>>());

            for edge in &ir.edges {
                let (s, t) = (edge.source, edge.target);
                if !cols.fallback[s] && !cols.fallback[t] {
                    prop_assert!(
                        cols.column[t] > cols.column[s],
                        "{} -> {}: column {} not right of {}",
                        s, t, cols.column[t], cols.column[s]
                    );
                }
            }
        }
    }
}

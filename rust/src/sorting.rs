//! Topological ordering of the task graph (Kahn's algorithm).

use std::collections::VecDeque;

use crate::graph::TaskGraph;
use crate::models::TaskId;

/// Order task positions so every task follows all of its dependencies.
///
/// In-degree is the number of prerequisites. The queue is FIFO and seeded in
/// input order, so tasks that become ready together keep insertion order.
/// Returns `None` when fewer tasks come out than went in, which happens
/// exactly when the graph has a cycle.
pub fn topological_sort(graph: &TaskGraph) -> Option<Vec<usize>> {
    topological_sort_or_cycle(graph).ok()
}

/// [`topological_sort`], reporting a cycle among the unsorted tasks on failure.
///
/// The cycle has the same shape as [`find_cycle`](crate::cycle::find_cycle)
/// results: each id depends on the next, first id repeated at the end.
pub fn topological_sort_or_cycle(graph: &TaskGraph) -> Result<Vec<usize>, Vec<TaskId>> {
    let n = graph.len();
    let mut in_degree: Vec<usize> = graph.deps.iter().map(Vec::len).collect();

    let mut queue: VecDeque<usize> = (0..n).filter(|&idx| in_degree[idx] == 0).collect();
    let mut result: Vec<usize> = Vec::with_capacity(n);

    while let Some(idx) = queue.pop_front() {
        result.push(idx);

        for &dependent in &graph.dependents[idx] {
            in_degree[dependent] -= 1;
            if in_degree[dependent] == 0 {
                queue.push_back(dependent);
            }
        }
    }

    if result.len() < n {
        return Err(stuck_cycle(graph, &in_degree));
    }
    Ok(result)
}

/// Walk unsorted prerequisites until a task repeats.
///
/// Every task left with a nonzero in-degree still has an unsorted
/// prerequisite, so the walk never dead-ends and must close a loop.
fn stuck_cycle(graph: &TaskGraph, in_degree: &[usize]) -> Vec<TaskId> {
    let mut step_of: Vec<Option<usize>> = vec![None; graph.len()];
    let mut walk: Vec<usize> = Vec::new();
    let mut current = in_degree.iter().position(|&d| d > 0);

    while let Some(idx) = current {
        if let Some(step) = step_of[idx] {
            let mut cycle: Vec<TaskId> =
                walk[step..].iter().map(|&i| graph.index.id(i)).collect();
            cycle.push(graph.index.id(idx));
            return cycle;
        }
        step_of[idx] = Some(walk.len());
        walk.push(idx);
        current = graph.deps[idx].iter().copied().find(|&dep| in_degree[dep] > 0);
    }

    walk.into_iter().map(|i| graph.index.id(i)).collect()
}

/// [`topological_sort`] resolved back to task ids.
pub fn topological_order(graph: &TaskGraph) -> Option<Vec<TaskId>> {
    topological_sort(graph).map(|order| order.into_iter().map(|idx| graph.index.id(idx)).collect())
}

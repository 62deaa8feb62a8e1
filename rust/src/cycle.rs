//! Circular dependency detection.
//!
//! Depth-first search over [`AdjacencyMap`] with an explicit frame stack, so
//! deep dependency chains cannot overflow the call stack. The frame stack
//! doubles as the current DFS path: a dependency found on it closes a cycle.

use rustc_hash::FxHashSet;

use crate::graph::AdjacencyMap;
use crate::models::TaskId;

/// Find a cycle in the graph.
///
/// Nodes are visited in input order and only the first cycle found is
/// returned, as the path from the repeated node through the back edge with
/// that node at both ends (e.g. `[1, 2, 3, 1]`).
pub fn find_cycle(adjacency: &AdjacencyMap) -> Option<Vec<TaskId>> {
    let mut visited: FxHashSet<TaskId> =
        FxHashSet::with_capacity_and_hasher(adjacency.len(), Default::default());
    let mut on_stack: FxHashSet<TaskId> = FxHashSet::default();

    for &start in adjacency.nodes() {
        if visited.contains(&start) {
            continue;
        }
        if let Some(cycle) = dfs_from(adjacency, start, &mut visited, &mut on_stack) {
            return Some(cycle);
        }
    }
    None
}

/// Check whether making `from` depend on `to` would close a cycle.
///
/// A self-dependency is reported as the one-element cycle `[from]`.
pub fn would_create_cycle(
    adjacency: &AdjacencyMap,
    from: TaskId,
    to: TaskId,
) -> Option<Vec<TaskId>> {
    if from == to {
        return Some(vec![from]);
    }
    let mut proposed = adjacency.clone();
    proposed.add_edge(from, to);
    find_cycle(&proposed)
}

fn dfs_from(
    adjacency: &AdjacencyMap,
    start: TaskId,
    visited: &mut FxHashSet<TaskId>,
    on_stack: &mut FxHashSet<TaskId>,
) -> Option<Vec<TaskId>> {
    // (node, index of the next dependency to explore)
    let mut path: Vec<(TaskId, usize)> = vec![(start, 0)];
    visited.insert(start);
    on_stack.insert(start);

    while let Some(frame) = path.last_mut() {
        let (node, next) = *frame;
        let deps = adjacency.dependencies(node);

        if next == deps.len() {
            path.pop();
            on_stack.remove(&node);
            continue;
        }
        frame.1 += 1;

        let dep = deps[next];
        if on_stack.contains(&dep) {
            let first = path.iter().position(|&(id, _)| id == dep)?;
            let mut cycle: Vec<TaskId> = path[first..].iter().map(|&(id, _)| id).collect();
            cycle.push(dep);
            return Some(cycle);
        }
        if visited.insert(dep) {
            on_stack.insert(dep);
            path.push((dep, 0));
        }
    }

    None
}

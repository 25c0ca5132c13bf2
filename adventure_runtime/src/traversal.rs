//! Graph searches shared by the transition and graph validators.
//!
//! All searches use an explicit stack and a visited set, so they terminate
//! on cyclic graphs and never recurse.

use adventure_model::{AdventureGraph, Connection, NodeId};
use std::collections::{HashMap, HashSet, VecDeque};

/// Adjacency list built from a set of connections.
pub fn adjacency<'a, I>(connections: I) -> HashMap<&'a NodeId, Vec<&'a NodeId>>
where
    I: IntoIterator<Item = &'a Connection>,
{
    let mut adjacency: HashMap<&NodeId, Vec<&NodeId>> = HashMap::new();
    for connection in connections {
        adjacency
            .entry(&connection.source_node_id)
            .or_default()
            .push(&connection.target_node_id);
    }
    adjacency
}

/// Whether `to` can be reached from `from` by following edges.
pub fn path_exists(adjacency: &HashMap<&NodeId, Vec<&NodeId>>, from: &NodeId, to: &NodeId) -> bool {
    let mut visited: HashSet<&NodeId> = HashSet::new();
    let mut stack = vec![from];

    while let Some(node) = stack.pop() {
        if node == to {
            return true;
        }
        if !visited.insert(node) {
            continue;
        }
        if let Some(next) = adjacency.get(node) {
            stack.extend(next.iter().copied().filter(|n| !visited.contains(n)));
        }
    }
    false
}

/// Every node reachable from any of `starts`, the starts included.
pub fn reachable_from<'a>(graph: &'a AdventureGraph, starts: &[&'a NodeId]) -> HashSet<&'a NodeId> {
    let adjacency = graph.adjacency();
    let mut visited: HashSet<&NodeId> = HashSet::new();
    let mut queue: VecDeque<&NodeId> = starts.iter().copied().collect();

    while let Some(node) = queue.pop_front() {
        if !visited.insert(node) {
            continue;
        }
        if let Some(next) = adjacency.get(node) {
            queue.extend(next.iter().copied().filter(|n| !visited.contains(n)));
        }
    }
    visited
}

/// Node expansions allowed when searching simple paths through a cycle.
pub const PATH_SEARCH_BUDGET: usize = 50_000;

/// Length, in nodes, of the longest simple path from any of `starts`.
///
/// Acyclic graphs are measured in one memoised pass. When a cycle is reachable
/// from the starts, each branch keeps its own visited set instead, so a node may
/// appear on several branches but never twice on one; that search stops after
/// [`PATH_SEARCH_BUDGET`] expansions. Once a path longer than `limit` is found,
/// `limit + 1` is returned.
pub fn max_path_depth(graph: &AdventureGraph, starts: &[&NodeId], limit: usize) -> usize {
    let adjacency = graph.adjacency();
    match longest_acyclic_depth(&adjacency, starts) {
        Some(depth) => depth.min(limit + 1),
        None => longest_simple_depth(&adjacency, starts, limit),
    }
}

/// Longest path by postorder DFS, with depth = 1 + deepest successor.
///
/// Returns `None` as soon as a back edge shows a cycle.
fn longest_acyclic_depth(adjacency: &HashMap<&NodeId, Vec<&NodeId>>, starts: &[&NodeId]) -> Option<usize> {
    let mut depth: HashMap<&NodeId, usize> = HashMap::new();
    let mut on_path: HashSet<&NodeId> = HashSet::new();

    for &start in starts {
        let mut stack = vec![(start, false)];
        while let Some((node, expanded)) = stack.pop() {
            let next = adjacency.get(node).map(Vec::as_slice).unwrap_or_default();
            if expanded {
                on_path.remove(node);
                let deepest = next.iter().filter_map(|n| depth.get(n)).max().copied().unwrap_or(0);
                depth.insert(node, deepest + 1);
                continue;
            }
            if depth.contains_key(node) {
                continue;
            }
            if !on_path.insert(node) {
                return None;
            }
            stack.push((node, true));
            for &target in next {
                if on_path.contains(target) {
                    return None;
                }
                if !depth.contains_key(target) {
                    stack.push((target, false));
                }
            }
        }
    }
    Some(starts.iter().filter_map(|s| depth.get(s)).max().copied().unwrap_or(0))
}

fn longest_simple_depth(adjacency: &HashMap<&NodeId, Vec<&NodeId>>, starts: &[&NodeId], limit: usize) -> usize {
    let mut deepest = 0;
    let mut expanded = 0;

    for &start in starts {
        let mut stack: Vec<(&NodeId, HashSet<&NodeId>)> = vec![(start, HashSet::from([start]))];

        while let Some((node, path)) = stack.pop() {
            deepest = deepest.max(path.len());
            if deepest > limit {
                return limit + 1;
            }
            expanded += 1;
            if expanded > PATH_SEARCH_BUDGET {
                tracing::debug!("Path depth search stopped after {} expansions", PATH_SEARCH_BUDGET);
                return deepest;
            }
            let Some(next) = adjacency.get(node) else {
                continue;
            };
            for &target in next {
                if path.contains(target) {
                    continue;
                }
                let mut branch = path.clone();
                branch.insert(target);
                stack.push((target, branch));
            }
        }
    }
    deepest
}

#[cfg(test)]
mod tests {
    use super::*;
    use adventure_model::{Node, StoryProperties};

    fn graph(ids: &[&str], edges: &[(&str, &str)]) -> AdventureGraph {
        let nodes = ids
            .iter()
            .map(|id| Node::story(*id, StoryProperties::default()))
            .collect();
        let connections = edges
            .iter()
            .enumerate()
            .map(|(i, (from, to))| Connection::new(format!("c{}", i), *from, "output", *to, "input"))
            .collect();
        AdventureGraph::new(nodes, connections)
    }

    #[test]
    fn test_path_exists_through_cycles() {
        let g = graph(&["a", "b", "c", "d"], &[("a", "b"), ("b", "c"), ("c", "a")]);
        let adj = adjacency(&g.connections);

        assert!(path_exists(&adj, &NodeId::new("a"), &NodeId::new("c")));
        assert!(path_exists(&adj, &NodeId::new("c"), &NodeId::new("b")));
        assert!(!path_exists(&adj, &NodeId::new("a"), &NodeId::new("d")));
    }

    #[test]
    fn test_reachable_from() {
        let g = graph(&["a", "b", "c"], &[("a", "b"), ("b", "a")]);
        let a = NodeId::new("a");
        let reached = reachable_from(&g, &[&a]);

        assert_eq!(reached.len(), 2);
        assert!(!reached.contains(&NodeId::new("c")));
    }

    #[test]
    fn test_max_path_depth() {
        let g = graph(
            &["a", "b", "c", "d", "e"],
            &[("a", "b"), ("b", "c"), ("c", "d"), ("a", "e"), ("e", "d"), ("d", "b")],
        );
        let a = NodeId::new("a");

        // a -> e -> d -> b -> c is the longest simple path.
        assert_eq!(max_path_depth(&g, &[&a], 20), 5);
        assert_eq!(max_path_depth(&g, &[&a], 3), 4);
    }

    /// A root followed by `layers` layers of `width` nodes, each linked to every
    /// node of the next layer.
    fn layered(layers: usize, width: usize, close_loop: bool) -> AdventureGraph {
        let mut ids = vec!["root".to_string()];
        let mut edges = Vec::new();
        let mut previous = vec!["root".to_string()];
        for layer in 0..layers {
            let current: Vec<String> = (0..width).map(|i| format!("l{}n{}", layer, i)).collect();
            for from in &previous {
                for to in &current {
                    edges.push((from.clone(), to.clone()));
                }
            }
            ids.extend(current.iter().cloned());
            previous = current;
        }
        if close_loop {
            edges.push((previous[0].clone(), "root".to_string()));
        }

        let ids: Vec<&str> = ids.iter().map(String::as_str).collect();
        let edges: Vec<(&str, &str)> = edges.iter().map(|(a, b)| (a.as_str(), b.as_str())).collect();
        graph(&ids, &edges)
    }

    #[test]
    fn test_max_path_depth_wide_layers() {
        let g = layered(15, 3, false);
        let root = NodeId::new("root");

        assert_eq!(g.nodes.len(), 46);
        assert_eq!(max_path_depth(&g, &[&root], 20), 16);
        assert_eq!(max_path_depth(&g, &[&root], 10), 11);
    }

    #[test]
    fn test_max_path_depth_wide_layers_with_cycle() {
        let g = layered(15, 3, true);
        let root = NodeId::new("root");

        // The loop back to the root forces the bounded per-branch search.
        assert_eq!(max_path_depth(&g, &[&root], 20), 16);
    }

    #[test]
    fn test_max_path_depth_shared_tail() {
        // b is reached from both a and c; memoised depths must still count the longer route.
        let g = graph(&["a", "b", "c", "d"], &[("a", "b"), ("a", "c"), ("c", "b"), ("b", "d")]);
        let a = NodeId::new("a");

        assert_eq!(max_path_depth(&g, &[&a], 20), 4);
    }
}

//! Circular dependency detection for candidate connections.

use adventure_model::{Connection, NodeId};

use crate::traversal::{adjacency, path_exists};

/// Whether adding `source -> target` to `connections` closes a cycle.
///
/// The new edge closes a cycle exactly when `source` is already reachable from
/// `target`, however many existing edges that takes.
pub fn would_create_circular_dependency<'a, I>(connections: I, source: &NodeId, target: &NodeId) -> bool
where
    I: IntoIterator<Item = &'a Connection>,
{
    if source == target {
        return true;
    }
    path_exists(&adjacency(connections), target, source)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(id: &str, from: &str, to: &str) -> Connection {
        Connection::new(id, from, "output", to, "input")
    }

    #[test]
    fn test_direct_reverse_edge() {
        let existing = vec![edge("c1", "a", "b")];
        assert!(would_create_circular_dependency(&existing, &NodeId::new("b"), &NodeId::new("a")));
    }

    #[test]
    fn test_transitive_cycle() {
        let existing = vec![edge("c1", "a", "b"), edge("c2", "b", "c"), edge("c3", "c", "d")];
        assert!(would_create_circular_dependency(&existing, &NodeId::new("d"), &NodeId::new("a")));
        assert!(would_create_circular_dependency(&existing, &NodeId::new("c"), &NodeId::new("b")));
    }

    #[test]
    fn test_forward_edges_are_fine() {
        let existing = vec![edge("c1", "a", "b"), edge("c2", "b", "c")];
        assert!(!would_create_circular_dependency(&existing, &NodeId::new("a"), &NodeId::new("c")));
        assert!(!would_create_circular_dependency(&existing, &NodeId::new("x"), &NodeId::new("a")));
    }
}

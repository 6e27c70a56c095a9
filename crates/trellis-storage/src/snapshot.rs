//! JSON snapshot persistence for policy graphs

use crate::error::StorageResult;
use crate::memory::MemoryGraph;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use trellis_core::{Node, NodeId};

/// Serializable capture of a whole policy graph
///
/// Nodes are ordered by identifier and assignments are (child, parent) pairs
/// in store order, so snapshots of the same graph are byte-for-byte stable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<Node>,
    pub assignments: Vec<(NodeId, NodeId)>,
}

impl GraphSnapshot {
    /// Write the snapshot to `path` as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> StorageResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json)?;
        tracing::debug!(
            "Saved snapshot of {} nodes, {} assignments to {}",
            self.nodes.len(),
            self.assignments.len(),
            path.as_ref().display()
        );
        Ok(())
    }

    /// Read a snapshot back from `path`.
    pub fn load(path: impl AsRef<Path>) -> StorageResult<Self> {
        let json = fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&json)?)
    }
}

impl MemoryGraph {
    /// Export the full graph.
    pub fn snapshot(&self) -> StorageResult<GraphSnapshot> {
        Ok(GraphSnapshot {
            nodes: self.nodes()?,
            assignments: self.assignments()?,
        })
    }

    /// Rebuild a store from a snapshot.
    ///
    /// The id allocator is re-seeded past the highest imported id, so nodes
    /// created afterwards never collide. Snapshots naming unknown or
    /// duplicate ids are rejected.
    pub fn from_snapshot(snapshot: &GraphSnapshot) -> StorageResult<Self> {
        let graph = Self::new();
        for node in &snapshot.nodes {
            graph.insert_node(node.clone())?;
        }
        for (child, parent) in &snapshot.assignments {
            graph.assign(*child, *parent)?;
        }
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use trellis_core::{NodeType, PolicyGraph};

    fn sample_graph() -> MemoryGraph {
        let graph = MemoryGraph::new();
        let pc = graph.create_node("corp", NodeType::PolicyClass).unwrap();
        let eng = graph.create_node("eng", NodeType::UserAttribute).unwrap();
        let alice = graph
            .create_node("alice", NodeType::User)
            .unwrap();
        graph.assign(eng.id, pc.id).unwrap();
        graph.assign(alice.id, eng.id).unwrap();
        graph
    }

    #[test]
    fn test_snapshot_round_trip_through_file() {
        let graph = sample_graph();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.json");

        graph.snapshot().unwrap().save(&path).unwrap();
        let restored = MemoryGraph::from_snapshot(&GraphSnapshot::load(&path).unwrap()).unwrap();

        assert_eq!(restored.node_count().unwrap(), 3);
        assert_eq!(restored.assignment_count().unwrap(), 2);
        assert_eq!(
            restored.parents_of(NodeId::new(3)).unwrap(),
            vec![NodeId::new(2)]
        );
        assert_eq!(restored.node(NodeId::new(1)).unwrap().name, "corp");
    }

    #[test]
    fn test_restored_store_allocates_past_imported_ids() {
        let restored = MemoryGraph::from_snapshot(&sample_graph().snapshot().unwrap()).unwrap();
        let fresh = restored.create_node("bob", NodeType::User).unwrap();
        assert_eq!(fresh.id, NodeId::new(4));
    }

    #[test]
    fn test_snapshot_with_dangling_assignment_rejected() {
        let snapshot = GraphSnapshot {
            nodes: vec![Node::new(NodeId::new(1), "corp", NodeType::PolicyClass)],
            assignments: vec![(NodeId::new(1), NodeId::new(2))],
        };

        let err = MemoryGraph::from_snapshot(&snapshot).unwrap_err();
        assert!(matches!(err, StorageError::Graph(_)));
    }

    #[test]
    fn test_snapshot_with_duplicate_node_rejected() {
        let snapshot = GraphSnapshot {
            nodes: vec![
                Node::new(NodeId::new(1), "corp", NodeType::PolicyClass),
                Node::new(NodeId::new(1), "shadow", NodeType::ObjectAttribute),
            ],
            assignments: vec![],
        };

        let err = MemoryGraph::from_snapshot(&snapshot).unwrap_err();
        assert!(matches!(err, StorageError::DuplicateNode(_)));
    }
}

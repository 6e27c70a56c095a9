//! In-memory policy graph store

use crate::error::{StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use trellis_core::{Error, Node, NodeId, NodeType, PolicyGraph};

/// In-memory policy graph
///
/// Reference implementation of the graph query contract. Nodes are stored by
/// identifier, assignments as child -> parents adjacency lists that preserve
/// insertion order, so traversals over this store are deterministic.
#[derive(Debug)]
pub struct MemoryGraph {
    nodes: RwLock<HashMap<NodeId, Node>>,
    parents: RwLock<HashMap<NodeId, Vec<NodeId>>>,
    next_id: AtomicU64,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self {
            nodes: RwLock::new(HashMap::new()),
            parents: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Create a node, allocating the next free identifier.
    pub fn create_node(
        &self,
        name: impl Into<String>,
        node_type: NodeType,
    ) -> StorageResult<Node> {
        let id = NodeId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let node = Node::new(id, name, node_type);

        let mut nodes = self
            .nodes
            .write()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        nodes.insert(id, node.clone());

        tracing::debug!("Created {} node {} (id {})", node.node_type, node.name, id);
        Ok(node)
    }

    /// Store a caller-built node, keeping the id allocator ahead of it.
    ///
    /// Used by the snapshot load path; rejects the unset id 0 and ids that
    /// are already taken.
    pub fn insert_node(&self, node: Node) -> StorageResult<()> {
        if node.id.as_u64() == 0 {
            return Err(StorageError::InvalidNodeId(node.id));
        }

        let mut nodes = self
            .nodes
            .write()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        if nodes.contains_key(&node.id) {
            return Err(StorageError::DuplicateNode(node.id));
        }

        self.next_id.fetch_max(node.id.as_u64() + 1, Ordering::Relaxed);
        nodes.insert(node.id, node);
        Ok(())
    }

    /// Record a child -> parent assignment.
    ///
    /// Both endpoints must exist; assigning a node to itself is rejected.
    /// Re-recording an existing assignment is a no-op, so parent lists never
    /// hold duplicates.
    pub fn assign(&self, child: NodeId, parent: NodeId) -> StorageResult<()> {
        if child == parent {
            return Err(StorageError::SelfAssignment(child));
        }

        let nodes = self
            .nodes
            .read()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        for id in [child, parent] {
            if !nodes.contains_key(&id) {
                return Err(Error::NodeNotFound(id).into());
            }
        }

        let mut parents = self
            .parents
            .write()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        let list = parents.entry(child).or_default();
        if !list.contains(&parent) {
            list.push(parent);
            tracing::debug!("Assigned {} -> {}", child, parent);
        }
        Ok(())
    }

    /// Remove one child -> parent assignment.
    pub fn deassign(&self, child: NodeId, parent: NodeId) -> StorageResult<()> {
        let mut parents = self
            .parents
            .write()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        let list = parents
            .get_mut(&child)
            .ok_or(StorageError::AssignmentNotFound { child, parent })?;
        let index = list
            .iter()
            .position(|p| *p == parent)
            .ok_or(StorageError::AssignmentNotFound { child, parent })?;
        list.remove(index);
        tracing::debug!("Deassigned {} -> {}", child, parent);
        Ok(())
    }

    /// All nodes, ordered by identifier.
    pub fn nodes(&self) -> StorageResult<Vec<Node>> {
        let nodes = self
            .nodes
            .read()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        let mut all: Vec<Node> = nodes.values().cloned().collect();
        all.sort_by_key(|node| node.id);
        Ok(all)
    }

    /// All assignments as (child, parent) pairs, children ordered by
    /// identifier and each child's parents in insertion order.
    pub fn assignments(&self) -> StorageResult<Vec<(NodeId, NodeId)>> {
        let parents = self
            .parents
            .read()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        let mut children: Vec<NodeId> = parents.keys().copied().collect();
        children.sort();

        let mut all = Vec::new();
        for child in children {
            if let Some(list) = parents.get(&child) {
                all.extend(list.iter().map(|parent| (child, *parent)));
            }
        }
        Ok(all)
    }

    pub fn node_count(&self) -> StorageResult<usize> {
        let nodes = self
            .nodes
            .read()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        Ok(nodes.len())
    }

    pub fn assignment_count(&self) -> StorageResult<usize> {
        let parents = self
            .parents
            .read()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        Ok(parents.values().map(Vec::len).sum())
    }
}

impl Default for MemoryGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl PolicyGraph for MemoryGraph {
    fn parents_of(&self, id: NodeId) -> trellis_core::Result<Vec<NodeId>> {
        let nodes = self
            .nodes
            .read()
            .map_err(|e| Error::Storage(format!("Lock error: {}", e)))?;
        if !nodes.contains_key(&id) {
            return Err(Error::NodeNotFound(id));
        }

        let parents = self
            .parents
            .read()
            .map_err(|e| Error::Storage(format!("Lock error: {}", e)))?;
        Ok(parents.get(&id).cloned().unwrap_or_default())
    }

    fn node(&self, id: NodeId) -> trellis_core::Result<Node> {
        let nodes = self
            .nodes
            .read()
            .map_err(|e| Error::Storage(format!("Lock error: {}", e)))?;
        nodes.get(&id).cloned().ok_or(Error::NodeNotFound(id))
    }
}

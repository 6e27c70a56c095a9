//! Graph query contract consumed by the search engine

use crate::error::Result;
use crate::node::{Node, NodeId};

/// Read-only window onto a policy graph's parent relations
///
/// The search engine is agnostic to how the graph is stored; a backing store
/// only has to answer two questions: who are a node's direct parents, and
/// which node does an identifier refer to. Both operations fail with
/// `Error::NodeNotFound` when the identifier is unknown to the store, and the
/// engine surfaces that failure to its caller unchanged.
pub trait PolicyGraph {
    /// Direct parent identifiers of `id`; empty for a root node.
    ///
    /// The returned order is the order the engine processes edges in, so
    /// deterministic stores yield deterministic traversals. Implementations
    /// must not return duplicates.
    fn parents_of(&self, id: NodeId) -> Result<Vec<NodeId>>;

    /// Resolve an identifier to its node.
    fn node(&self, id: NodeId) -> Result<Node>;
}

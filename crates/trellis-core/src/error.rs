//! Error types for Trellis Core

use crate::node::NodeId;
use thiserror::Error;

/// Result type alias using Trellis's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Trellis error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Cycle detected at node {0}: the ancestor graph is not acyclic")]
    CycleDetected(NodeId),

    #[error("Invalid node type: {0}")]
    InvalidNodeType(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

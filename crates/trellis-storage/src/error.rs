//! Storage error types

use thiserror::Error;
use trellis_core::NodeId;

/// Result type alias for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Storage-specific error types
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Graph error: {0}")]
    Graph(#[from] trellis_core::Error),

    #[error("Duplicate node: {0}")]
    DuplicateNode(NodeId),

    #[error("Invalid node id: {0}")]
    InvalidNodeId(NodeId),

    #[error("Self-assignment is not allowed: {0}")]
    SelfAssignment(NodeId),

    #[error("Assignment not found: {child} -> {parent}")]
    AssignmentNotFound { child: NodeId, parent: NodeId },

    #[error("Lock error: {0}")]
    Lock(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

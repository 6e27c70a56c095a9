//! Trellis Storage - Policy graph stores
//!
//! This crate provides the in-memory policy graph store implementing the
//! core graph query contract, plus JSON snapshot persistence for saving and
//! restoring whole graphs.

pub mod error;
pub mod memory;
pub mod snapshot;

pub use error::{StorageError, StorageResult};
pub use memory::MemoryGraph;
pub use snapshot::GraphSnapshot;

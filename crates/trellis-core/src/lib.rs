//! Trellis Core - Graph-search engine for policy evaluation
//!
//! This crate provides the node model, the graph query contract, and the
//! depth-first search engine that drives pluggable propagation and
//! visitation strategies over an attribute graph.

pub mod error;
pub mod graph;
pub mod node;
pub mod obligation;
pub mod search;

pub use error::{Error, Result};
pub use graph::PolicyGraph;
pub use node::{Node, NodeId, NodeType};
pub use obligation::{EvrArg, EvrFunction, EvrNode, EvrProcess, EvrValue};
pub use search::{DepthFirstSearcher, Propagator, Visitor};

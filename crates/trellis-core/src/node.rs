//! Policy node (entity) types

use crate::error::Error;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// Unique identifier for a policy node
///
/// Identifiers are allocated by the backing store, starting at 1. The value
/// 0 is reserved to mean "not yet assigned".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl NodeId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<u64> for NodeId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Policy node classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    /// Root under which attributes and entities are organized
    PolicyClass,
    /// Attribute assigned to users
    UserAttribute,
    /// A user
    User,
    /// Attribute assigned to objects
    ObjectAttribute,
    /// A protected object
    Object,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PolicyClass => "policy_class",
            Self::UserAttribute => "user_attribute",
            Self::User => "user",
            Self::ObjectAttribute => "object_attribute",
            Self::Object => "object",
        }
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "policy_class" => Ok(Self::PolicyClass),
            "user_attribute" => Ok(Self::UserAttribute),
            "user" => Ok(Self::User),
            "object_attribute" => Ok(Self::ObjectAttribute),
            "object" => Ok(Self::Object),
            other => Err(Error::InvalidNodeType(other.to_string())),
        }
    }
}

/// A policy entity in the attribute graph (a node)
///
/// The search engine only ever reads `id`; everything else is payload owned
/// by the store and passed through to traversal strategies untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier
    pub id: NodeId,

    /// Node name (unique within its type in well-formed graphs)
    pub name: String,

    /// Node classification
    pub node_type: NodeType,

    /// Arbitrary key/value properties
    #[serde(default)]
    pub properties: HashMap<String, String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Node {
    /// Create a new node
    pub fn new(id: NodeId, name: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            id,
            name: name.into(),
            node_type,
            properties: HashMap::new(),
            created_at: Utc::now(),
        }
    }

    /// Attach a property
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Look up a property value
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}

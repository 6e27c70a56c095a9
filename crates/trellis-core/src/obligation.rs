//! Event-response rule node model
//!
//! Obligations are built from event/response rules whose operands are the
//! rule nodes defined here: a named and typed attribute record, a predicate
//! function call, or a reference to a sub-process. The search engine treats
//! these as opaque payload; they matter to the obligation machinery layered
//! on top of it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Argument to an event-response function call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EvrArg {
    /// A literal value
    Value(String),
    /// A nested function call evaluated first
    Function(EvrFunction),
}

/// A function (predicate) reference inside an event-response rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvrFunction {
    pub name: String,
    pub args: Vec<EvrArg>,
}

impl EvrFunction {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn with_arg(mut self, arg: EvrArg) -> Self {
        self.args.push(arg);
        self
    }
}

/// A sub-process reference inside an event-response rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvrProcess(pub u64);

/// Payload of an event-response rule node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EvrValue {
    /// A named, typed attribute record
    Attribute {
        name: String,
        node_type: String,
        properties: HashMap<String, String>,
    },
    /// A predicate evaluated when the rule fires
    Function(EvrFunction),
    /// A reference to a sub-process
    Process(EvrProcess),
}

/// A node in an event-response rule definition
///
/// An id of 0 means the node has not been assigned an identifier yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvrNode {
    pub id: u64,
    pub value: EvrValue,
}

impl EvrNode {
    /// Rule node wrapping an attribute record
    pub fn attribute(
        name: impl Into<String>,
        node_type: impl Into<String>,
        properties: HashMap<String, String>,
    ) -> Self {
        Self {
            id: 0,
            value: EvrValue::Attribute {
                name: name.into(),
                node_type: node_type.into(),
                properties,
            },
        }
    }

    /// Rule node wrapping a function call
    pub fn function(function: EvrFunction) -> Self {
        Self {
            id: 0,
            value: EvrValue::Function(function),
        }
    }

    /// Rule node wrapping a sub-process reference
    pub fn process(process: EvrProcess) -> Self {
        Self {
            id: 0,
            value: EvrValue::Process(process),
        }
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }
}

/// Rule nodes with assigned identifiers compare by identifier alone; while
/// either side is unassigned, attribute records compare structurally by
/// name, type and properties. Function and process nodes carry no identity
/// of their own and never compare equal structurally.
impl PartialEq for EvrNode {
    fn eq(&self, other: &Self) -> bool {
        if self.id != 0 && other.id != 0 {
            return self.id == other.id;
        }

        match (&self.value, &other.value) {
            (
                EvrValue::Attribute {
                    name,
                    node_type,
                    properties,
                },
                EvrValue::Attribute {
                    name: other_name,
                    node_type: other_type,
                    properties: other_properties,
                },
            ) => name == other_name && node_type == other_type && properties == other_properties,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attribute(name: &str) -> EvrNode {
        EvrNode::attribute(name, "user_attribute", HashMap::new())
    }

    #[test]
    fn test_assigned_ids_compare_by_id() {
        let first = attribute("staff").with_id(7);
        let second = attribute("something_else").with_id(7);
        let third = attribute("staff").with_id(8);

        assert_eq!(first, second, "matching ids win over differing payloads");
        assert_ne!(first, third);
    }

    #[test]
    fn test_unassigned_attribute_compares_structurally() {
        let mut properties = HashMap::new();
        properties.insert("site".to_string(), "hq".to_string());

        let first = EvrNode::attribute("staff", "user_attribute", properties.clone());
        let second = EvrNode::attribute("staff", "user_attribute", properties);
        let different = attribute("staff");

        assert_eq!(first, second);
        assert_ne!(first, different, "property maps differ");
    }

    #[test]
    fn test_single_assigned_id_falls_back_to_structure() {
        let assigned = attribute("staff").with_id(5);
        let unassigned = attribute("staff");

        assert_eq!(assigned, unassigned);
    }

    #[test]
    fn test_function_nodes_never_equal_structurally() {
        let first = EvrNode::function(EvrFunction::new("current_user"));
        let second = EvrNode::function(EvrFunction::new("current_user"));

        assert_ne!(first, second);
        assert_ne!(first, attribute("current_user"));

        // With assigned ids they behave like any other rule node.
        let first = first.with_id(3);
        let second = second.with_id(3);
        assert_eq!(first, second);
    }

    #[test]
    fn test_nested_function_args() {
        let inner = EvrFunction::new("get_children").with_arg(EvrArg::Value("ou=eng".to_string()));
        let outer = EvrFunction::new("is_member")
            .with_arg(EvrArg::Function(inner))
            .with_arg(EvrArg::Value("alice".to_string()));

        assert_eq!(outer.args.len(), 2);
        assert!(matches!(outer.args[0], EvrArg::Function(_)));
    }
}

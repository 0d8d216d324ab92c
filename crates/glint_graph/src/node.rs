// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions for the shader graph.

use crate::property::PropertyId;
use crate::slot::{Slot, SlotId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// A node instance in the graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique instance ID
    pub id: NodeId,
    /// Behavior kind key, resolved by the codegen layer
    pub kind: String,
    /// Display name
    pub name: String,
    /// Input slots, in declared order
    pub inputs: Vec<Slot>,
    /// Output slots, in declared order
    pub outputs: Vec<Slot>,
    /// Whether this node may be placed inside a reusable sub-graph
    pub allowed_in_subgraph: bool,
    /// Declared graph property this node binds to, if any
    pub property: Option<PropertyId>,
}

impl Node {
    /// Create a new node
    pub fn new(
        kind: impl Into<String>,
        name: impl Into<String>,
        inputs: Vec<Slot>,
        outputs: Vec<Slot>,
    ) -> Self {
        Self {
            id: NodeId::new(),
            kind: kind.into(),
            name: name.into(),
            inputs,
            outputs,
            allowed_in_subgraph: true,
            property: None,
        }
    }

    /// Set whether this node may appear inside a sub-graph
    pub fn with_subgraph_allowed(mut self, allowed: bool) -> Self {
        self.allowed_in_subgraph = allowed;
        self
    }

    /// Bind this node to a declared graph property
    pub fn with_property(mut self, property: PropertyId) -> Self {
        self.property = Some(property);
        self
    }

    /// Get an input slot by index
    pub fn input(&self, index: usize) -> Option<&Slot> {
        self.inputs.get(index)
    }

    /// Get an output slot by index
    pub fn output(&self, index: usize) -> Option<&Slot> {
        self.outputs.get(index)
    }

    /// Get a slot by ID
    pub fn slot(&self, slot_id: SlotId) -> Option<&Slot> {
        self.slots().find(|s| s.id == slot_id)
    }

    /// Get an input slot by name
    pub fn input_named(&self, name: &str) -> Option<&Slot> {
        self.inputs.iter().find(|s| s.name == name)
    }

    /// Get an output slot by name
    pub fn output_named(&self, name: &str) -> Option<&Slot> {
        self.outputs.iter().find(|s| s.name == name)
    }

    /// Get all slots
    pub fn slots(&self) -> impl Iterator<Item = &Slot> {
        self.inputs.iter().chain(self.outputs.iter())
    }

    /// Variable name used in generated code for a value computed at a slot.
    ///
    /// Stable for a given node id, so repeated generation passes over the
    /// same graph produce identical text.
    pub fn variable_name_for_slot(&self, slot: &Slot) -> String {
        let id = self.id.0.simple().to_string();
        format!("{}_{}_{}", self.kind, &id[..8], slot.shader_output_name)
    }

    /// True when the slot belongs to this node's inputs
    pub fn owns_input(&self, slot_id: SlotId) -> bool {
        self.inputs.iter().any(|s| s.id == slot_id)
    }

    /// True when the slot belongs to this node's outputs
    pub fn owns_output(&self, slot_id: SlotId) -> bool {
        self.outputs.iter().any(|s| s.id == slot_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slot::{ConcreteValueType, SlotDirection};

    #[test]
    fn slot_lookup_spans_inputs_and_outputs() {
        let node = Node::new(
            "add_float",
            "Add",
            vec![Slot::input("A", ConcreteValueType::Float)],
            vec![Slot::output("Result", ConcreteValueType::Float)],
        );
        let input_id = node.inputs[0].id;
        let output_id = node.outputs[0].id;
        assert!(node.slot(input_id).is_some());
        assert!(node.slot(output_id).is_some());
        assert!(node.owns_input(input_id));
        assert!(!node.owns_output(input_id));
        assert_eq!(node.slot(SlotId::new()).map(|s| &s.name), None);
    }

    #[test]
    fn variable_names_are_stable_per_node() {
        let node = Node::new(
            "add_float",
            "Add",
            vec![],
            vec![Slot::output("Result", ConcreteValueType::Float)],
        );
        let a = node.variable_name_for_slot(&node.outputs[0]);
        let b = node.variable_name_for_slot(&node.outputs[0]);
        assert_eq!(a, b);
        assert!(a.starts_with("add_float_"));
        assert!(a.ends_with("_Result"));
    }

    #[test]
    fn direction_is_preserved_on_template_slots() {
        let slot = Slot::input("UV", ConcreteValueType::Vector2);
        assert_eq!(slot.direction, SlotDirection::Input);
    }
}

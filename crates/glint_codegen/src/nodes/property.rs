// SPDX-License-Identifier: MIT OR Apache-2.0
//! Property reference node.

use crate::behavior::{
    validate_node_slots, CollectsProperties, GeneratesBodyCode, NodeBehavior, NodeValidationError,
};
use crate::builder::ShaderStringBuilder;
use crate::collector::PropertyCollector;
use crate::context::{GenerationMode, GraphContext};
use crate::generator::CodegenError;
use glint_graph::{ConcreteValueType, Node, ShaderGraph, ShaderProperty, Slot};

/// Behavior kind key of property reference nodes
pub const PROPERTY_KIND: &str = "property";

/// Exposes one declared graph property as a value in the graph.
///
/// The node binds a [`ShaderProperty`] by id; its single output slot carries
/// the property's value type. Body code binds a local variable to the
/// property's reference name, and the property is collected so it appears in
/// the generated argument list.
pub struct PropertyNode;

impl PropertyNode {
    /// Create a node bound to a declared property
    pub fn create(property: &ShaderProperty) -> Node {
        Node::new(
            PROPERTY_KIND,
            property.name.clone(),
            vec![],
            vec![Slot::output(property.name.clone(), property.value_type)],
        )
        .with_property(property.id)
    }

    fn bound_property<'a>(
        node: &Node,
        graph: &'a ShaderGraph,
    ) -> Result<&'a ShaderProperty, CodegenError> {
        let id = node
            .property
            .ok_or_else(|| NodeValidationError::MissingProperty {
                node: node.id,
                node_name: node.name.clone(),
            })?;
        graph
            .property(id)
            .ok_or_else(|| CodegenError::UnknownProperty {
                node: node.id,
                node_name: node.name.clone(),
                property: id,
            })
    }
}

impl NodeBehavior for PropertyNode {
    fn kind(&self) -> &str {
        PROPERTY_KIND
    }

    fn display_name(&self) -> &str {
        "Property"
    }

    fn build_slots(&self) -> (Vec<Slot>, Vec<Slot>) {
        // the output slot is retyped when the node is bound via `create`
        (vec![], vec![Slot::output("Value", ConcreteValueType::Vector4)])
    }

    fn validate(&self, node: &Node, graph: &ShaderGraph) -> Result<(), NodeValidationError> {
        let id = node
            .property
            .ok_or_else(|| NodeValidationError::MissingProperty {
                node: node.id,
                node_name: node.name.clone(),
            })?;
        let property = graph
            .property(id)
            .ok_or_else(|| NodeValidationError::MissingProperty {
                node: node.id,
                node_name: node.name.clone(),
            })?;
        if let Some(slot) = node.outputs.first() {
            if slot.value_type != property.value_type {
                return Err(NodeValidationError::SlotTypeMismatch {
                    node: node.id,
                    node_name: node.name.clone(),
                    slot: slot.name.clone(),
                    expected: property.value_type.shader_name(),
                    actual: slot.value_type.shader_name(),
                });
            }
        }
        validate_node_slots(node, graph)
    }

    fn as_body_code(&self) -> Option<&dyn GeneratesBodyCode> {
        Some(self)
    }

    fn as_properties(&self) -> Option<&dyn CollectsProperties> {
        Some(self)
    }
}

impl GeneratesBodyCode for PropertyNode {
    fn generate_body_code(
        &self,
        node: &Node,
        graph: &ShaderGraph,
        builder: &mut ShaderStringBuilder,
        _ctx: &GraphContext,
        _mode: GenerationMode,
    ) -> Result<(), CodegenError> {
        let property = Self::bound_property(node, graph)?;
        let slot = node
            .outputs
            .first()
            .ok_or_else(|| NodeValidationError::MissingSlot {
                node: node.id,
                node_name: node.name.clone(),
                slot: "Value",
            })?;
        builder.append_line(format!(
            "{} {} = {};",
            property.value_type.shader_name(),
            node.variable_name_for_slot(slot),
            property.reference_name
        ));
        Ok(())
    }
}

impl CollectsProperties for PropertyNode {
    fn collect_properties(
        &self,
        node: &Node,
        graph: &ShaderGraph,
        collector: &mut PropertyCollector,
        _mode: GenerationMode,
    ) {
        if let Ok(property) = Self::bound_property(node, graph) {
            collector.add_property(property.clone());
        }
    }
}

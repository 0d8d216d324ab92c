// SPDX-License-Identifier: MIT OR Apache-2.0
//! Constant value nodes.

use crate::behavior::{GeneratesBodyCode, NodeBehavior};
use crate::builder::ShaderStringBuilder;
use crate::context::{GenerationMode, GraphContext};
use crate::generator::{required_output, CodegenError};
use glint_graph::{ConcreteValueType, Node, ShaderGraph, Slot};

/// Emits a literal of its value type.
///
/// The constant's value is stored as the output slot's default on the node
/// instance, so editing a node does not touch the shared behavior.
pub struct ConstantNode {
    kind: String,
    display_name: &'static str,
    value_type: ConcreteValueType,
}

impl ConstantNode {
    fn new(display_name: &'static str, value_type: ConcreteValueType) -> Self {
        Self {
            kind: format!("{}_constant", value_type.shader_name()),
            display_name,
            value_type,
        }
    }

    /// Float constant
    pub fn float() -> Self {
        Self::new("Float", ConcreteValueType::Float)
    }

    /// 2-component vector constant
    pub fn vector2() -> Self {
        Self::new("Vector2", ConcreteValueType::Vector2)
    }

    /// 3-component vector constant
    pub fn vector3() -> Self {
        Self::new("Vector3", ConcreteValueType::Vector3)
    }

    /// 4-component vector constant
    pub fn vector4() -> Self {
        Self::new("Vector4", ConcreteValueType::Vector4)
    }
}

impl NodeBehavior for ConstantNode {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn display_name(&self) -> &str {
        self.display_name
    }

    fn build_slots(&self) -> (Vec<Slot>, Vec<Slot>) {
        (
            vec![],
            vec![Slot::output("Value", self.value_type).with_zero_default()],
        )
    }

    fn as_body_code(&self) -> Option<&dyn GeneratesBodyCode> {
        Some(self)
    }
}

impl GeneratesBodyCode for ConstantNode {
    fn generate_body_code(
        &self,
        node: &Node,
        _graph: &ShaderGraph,
        builder: &mut ShaderStringBuilder,
        _ctx: &GraphContext,
        _mode: GenerationMode,
    ) -> Result<(), CodegenError> {
        let slot = required_output(node, "Value")?;
        let literal = slot
            .default_value
            .clone()
            .or_else(|| self.value_type.zero_value())
            .map(|v| v.shader_literal())
            .unwrap_or_else(|| "0.0".to_string());
        builder.append_line(format!(
            "{} {} = {};",
            self.value_type.shader_name(),
            node.variable_name_for_slot(slot),
            literal
        ));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_graph::SlotValue;

    #[test]
    fn emits_the_slot_default_as_literal() {
        let behavior = ConstantNode::vector3();
        let mut graph = ShaderGraph::new("test");
        let node = Node::new(
            behavior.kind(),
            "Vector3",
            vec![],
            vec![Slot::output("Value", ConcreteValueType::Vector3)
                .with_default(SlotValue::Vector3([0.1, 0.2, 0.3]))],
        );
        let id = graph.add_node(node);
        let node = graph.node(id).unwrap();

        let mut builder = ShaderStringBuilder::new();
        behavior
            .generate_body_code(
                node,
                &graph,
                &mut builder,
                &GraphContext::default(),
                GenerationMode::Final,
            )
            .unwrap();
        assert!(builder
            .shader_string(0)
            .ends_with("= float3(0.1, 0.2, 0.3);\n"));
    }

    #[test]
    fn kind_keys_follow_the_type_token() {
        assert_eq!(ConstantNode::float().kind(), "float_constant");
        assert_eq!(ConstantNode::vector4().kind(), "float4_constant");
    }
}

// SPDX-License-Identifier: MIT OR Apache-2.0
//! Ambient input nodes reading the per-invocation input struct.

use crate::behavior::{GeneratesBodyCode, NodeBehavior};
use crate::builder::ShaderStringBuilder;
use crate::context::{GenerationMode, GraphContext, GraphRequirements, AMBIENT_PARAM};
use crate::generator::{required_output, CodegenError};
use glint_graph::{ConcreteValueType, Node, ShaderGraph, Slot};

/// Reads one field of the ambient input struct (`IN.uv0`, `IN.position_ws`,
/// ...) and declares the matching interpolant requirement.
pub struct AmbientInputNode {
    kind: &'static str,
    display_name: &'static str,
    output_name: &'static str,
    struct_field: &'static str,
    value_type: ConcreteValueType,
    requires: GraphRequirements,
}

impl AmbientInputNode {
    /// Mesh UV coordinates
    pub fn uv() -> Self {
        Self {
            kind: "uv",
            display_name: "UV",
            output_name: "UV",
            struct_field: "uv0",
            value_type: ConcreteValueType::Vector2,
            requires: GraphRequirements {
                needs_uv: true,
                ..GraphRequirements::none()
            },
        }
    }

    /// World-space fragment position
    pub fn world_position() -> Self {
        Self {
            kind: "world_position",
            display_name: "World Position",
            output_name: "Position",
            struct_field: "position_ws",
            value_type: ConcreteValueType::Vector3,
            requires: GraphRequirements {
                needs_world_position: true,
                ..GraphRequirements::none()
            },
        }
    }

    /// World-space fragment normal
    pub fn world_normal() -> Self {
        Self {
            kind: "world_normal",
            display_name: "World Normal",
            output_name: "Normal",
            struct_field: "normal_ws",
            value_type: ConcreteValueType::Vector3,
            requires: GraphRequirements {
                needs_world_normal: true,
                ..GraphRequirements::none()
            },
        }
    }

    /// Direction from fragment to camera
    pub fn view_direction() -> Self {
        Self {
            kind: "view_direction",
            display_name: "View Direction",
            output_name: "Direction",
            struct_field: "view_direction_ws",
            value_type: ConcreteValueType::Vector3,
            requires: GraphRequirements {
                needs_view_direction: true,
                ..GraphRequirements::none()
            },
        }
    }

    /// Shader time in seconds
    pub fn time() -> Self {
        Self {
            kind: "time",
            display_name: "Time",
            output_name: "Time",
            struct_field: "time",
            value_type: ConcreteValueType::Float,
            requires: GraphRequirements {
                needs_time: true,
                ..GraphRequirements::none()
            },
        }
    }
}

impl NodeBehavior for AmbientInputNode {
    fn kind(&self) -> &str {
        self.kind
    }

    fn display_name(&self) -> &str {
        self.display_name
    }

    fn build_slots(&self) -> (Vec<Slot>, Vec<Slot>) {
        (vec![], vec![Slot::output(self.output_name, self.value_type)])
    }

    fn requirements(&self, _node: &Node, _graph: &ShaderGraph) -> GraphRequirements {
        self.requires
    }

    fn as_body_code(&self) -> Option<&dyn GeneratesBodyCode> {
        Some(self)
    }
}

impl GeneratesBodyCode for AmbientInputNode {
    fn generate_body_code(
        &self,
        node: &Node,
        _graph: &ShaderGraph,
        builder: &mut ShaderStringBuilder,
        _ctx: &GraphContext,
        _mode: GenerationMode,
    ) -> Result<(), CodegenError> {
        let slot = required_output(node, self.output_name)?;
        builder.append_line(format!(
            "{} {} = {}.{};",
            self.value_type.shader_name(),
            node.variable_name_for_slot(slot),
            AMBIENT_PARAM,
            self.struct_field
        ));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_the_ambient_struct_field() {
        let behavior = AmbientInputNode::uv();
        let mut graph = ShaderGraph::new("test");
        let (inputs, outputs) = behavior.build_slots();
        let id = graph.add_node(Node::new("uv", "UV", inputs, outputs));
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
        let line = builder.shader_string(0);
        assert!(line.starts_with("float2 uv_"));
        assert!(line.ends_with("= IN.uv0;\n"));
    }

    #[test]
    fn each_ambient_node_declares_its_requirement() {
        let graph = ShaderGraph::new("test");
        let node = Node::new("time", "Time", vec![], vec![]);
        assert!(AmbientInputNode::time().requirements(&node, &graph).needs_time);
        assert!(
            AmbientInputNode::view_direction()
                .requirements(&node, &graph)
                .needs_view_direction
        );
    }
}

// SPDX-License-Identifier: MIT OR Apache-2.0
//! Texture sampling node.

use crate::behavior::{GeneratesBodyCode, NodeBehavior};
use crate::builder::ShaderStringBuilder;
use crate::context::{GenerationMode, GraphContext, GraphRequirements, AMBIENT_PARAM};
use crate::generator::{input_expression, required_input, required_output, CodegenError};
use glint_graph::{ConcreteValueType, Node, ShaderGraph, Slot};

/// Samples a 2D texture at a UV coordinate.
///
/// The texture input must be fed by an edge (usually from a bound property
/// node). When the UV input is unconnected the node reads the ambient UV
/// interpolant and reports the requirement.
pub struct TextureSampleNode;

impl TextureSampleNode {
    fn uv_expression(node: &Node, graph: &ShaderGraph) -> Result<String, CodegenError> {
        let uv = required_input(node, "UV")?;
        if graph.edge_into_slot(node.id, uv.id).is_some() {
            input_expression(graph, node, uv)
        } else {
            Ok(format!("{AMBIENT_PARAM}.uv0"))
        }
    }
}

impl NodeBehavior for TextureSampleNode {
    fn kind(&self) -> &str {
        "texture_sample"
    }

    fn display_name(&self) -> &str {
        "Texture Sample"
    }

    fn build_slots(&self) -> (Vec<Slot>, Vec<Slot>) {
        (
            vec![
                Slot::input("Texture", ConcreteValueType::Texture2D).required(),
                Slot::input("UV", ConcreteValueType::Vector2),
            ],
            vec![Slot::output("RGBA", ConcreteValueType::Vector4)],
        )
    }

    fn requirements(&self, node: &Node, graph: &ShaderGraph) -> GraphRequirements {
        let uv_connected = node
            .input_named("UV")
            .and_then(|uv| graph.edge_into_slot(node.id, uv.id))
            .is_some();
        GraphRequirements {
            needs_uv: !uv_connected,
            ..GraphRequirements::none()
        }
    }

    fn as_body_code(&self) -> Option<&dyn GeneratesBodyCode> {
        Some(self)
    }
}

impl GeneratesBodyCode for TextureSampleNode {
    fn generate_body_code(
        &self,
        node: &Node,
        graph: &ShaderGraph,
        builder: &mut ShaderStringBuilder,
        ctx: &GraphContext,
        _mode: GenerationMode,
    ) -> Result<(), CodegenError> {
        let texture = input_expression(graph, node, required_input(node, "Texture")?)?;
        let uv = Self::uv_expression(node, graph)?;
        let rgba = node.variable_name_for_slot(required_output(node, "RGBA")?);
        builder.append_line(format!(
            "float4 {} = {}.Sample({}, {});",
            rgba, texture, ctx.sampler_name, uv
        ));
        Ok(())
    }
}

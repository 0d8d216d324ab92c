// SPDX-License-Identifier: MIT OR Apache-2.0
//! Output nodes: the sub-graph output and the top-level surface master.

use crate::behavior::NodeBehavior;
use crate::builder::ShaderStringBuilder;
use crate::generator::{input_expression, CodegenError};
use glint_graph::{ConcreteValueType, Node, ShaderGraph, Slot, SlotValue};

/// Behavior kind key of the designated sub-graph output node
pub const SUBGRAPH_OUTPUT_KIND: &str = "subgraph_output";

/// The designated output of a reusable sub-graph.
///
/// Its input slots define the sub-graph's outputs: each becomes an `out`
/// parameter of the assembled function, and the remap step copies the
/// computed intermediate feeding each slot into that parameter.
pub struct SubGraphOutputNode;

impl SubGraphOutputNode {
    /// Create an output node whose declared outputs are the given
    /// name/type pairs
    pub fn create(outputs: &[(&str, ConcreteValueType)]) -> Node {
        let inputs = outputs
            .iter()
            .map(|(name, value_type)| Slot::input(*name, *value_type).with_zero_default())
            .collect();
        Node::new(SUBGRAPH_OUTPUT_KIND, "Output", inputs, vec![])
    }

    /// Copy computed intermediates into the declared output parameters
    pub fn remap_outputs(
        node: &Node,
        graph: &ShaderGraph,
        builder: &mut ShaderStringBuilder,
    ) -> Result<(), CodegenError> {
        for slot in &node.inputs {
            let value = input_expression(graph, node, slot)?;
            builder.append_line(format!("{} = {};", slot.shader_output_name, value));
        }
        Ok(())
    }
}

impl NodeBehavior for SubGraphOutputNode {
    fn kind(&self) -> &str {
        SUBGRAPH_OUTPUT_KIND
    }

    fn display_name(&self) -> &str {
        "Output"
    }

    fn build_slots(&self) -> (Vec<Slot>, Vec<Slot>) {
        // outputs are declared per node via `create`
        (vec![], vec![])
    }
}

/// Final surface output of a top-level material graph.
///
/// Not a code generator itself; the material exporter consumes its inputs.
/// Master nodes may not be nested inside reusable sub-graphs.
pub struct SurfaceMasterNode;

impl NodeBehavior for SurfaceMasterNode {
    fn kind(&self) -> &str {
        "surface_master"
    }

    fn display_name(&self) -> &str {
        "Surface Master"
    }

    fn build_slots(&self) -> (Vec<Slot>, Vec<Slot>) {
        (
            vec![
                Slot::input("Base Color", ConcreteValueType::Vector3)
                    .with_default(SlotValue::Vector3([0.8, 0.8, 0.8])),
                Slot::input("Alpha", ConcreteValueType::Float)
                    .with_default(SlotValue::Float(1.0)),
            ],
            vec![],
        )
    }

    fn allowed_in_subgraph(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_outputs_become_defaulted_input_slots() {
        let node = SubGraphOutputNode::create(&[
            ("Result", ConcreteValueType::Vector3),
            ("Mask", ConcreteValueType::Float),
        ]);
        assert_eq!(node.inputs.len(), 2);
        assert_eq!(node.outputs.len(), 0);
        assert_eq!(
            node.inputs[0].default_value,
            Some(SlotValue::Vector3([0.0; 3]))
        );
        assert_eq!(node.kind, SUBGRAPH_OUTPUT_KIND);
    }

    #[test]
    fn remap_copies_defaults_when_unconnected() {
        let mut graph = ShaderGraph::new("test");
        let id = graph.add_node(SubGraphOutputNode::create(&[(
            "Result",
            ConcreteValueType::Float,
        )]));
        let node = graph.node(id).unwrap();

        let mut builder = ShaderStringBuilder::new();
        SubGraphOutputNode::remap_outputs(node, &graph, &mut builder).unwrap();
        assert_eq!(builder.shader_string(0), "Result = 0.0;\n");
    }

    #[test]
    fn master_node_is_not_allowed_in_subgraphs() {
        assert!(!SurfaceMasterNode.allowed_in_subgraph());
    }
}

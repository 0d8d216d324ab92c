// SPDX-License-Identifier: MIT OR Apache-2.0
//! Reusable sub-graphs and their assembly into callable functions.

use crate::behavior::BehaviorRegistry;
use crate::builder::ShaderStringBuilder;
use crate::collector::PropertyCollector;
use crate::context::{GenerationMode, GraphContext, GraphRequirements, AMBIENT_PARAM};
use crate::generator::{
    collect_node_properties, collect_requirements, emit_node_bodies, emit_node_functions,
    CodegenError,
};
use crate::nodes::{SubGraphOutputNode, SUBGRAPH_OUTPUT_KIND};
use crate::registry::FunctionRegistry;
use glint_graph::{
    collect_active_nodes, CycleError, EdgeError, EdgeId, InputDescriptor, Node, NodeId,
    PropertyId, ShaderGraph, ShaderProperty, Slot, SlotId, SlotValue,
};
use serde::{Deserialize, Serialize};
use std::cell::Cell;

/// A reusable sub-graph: a shader graph with declared inputs and a
/// designated output node, compilable into a single callable function.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubGraph {
    graph: ShaderGraph,
    /// Current externally exposed inputs, in display order
    inputs: Vec<InputDescriptor>,
    /// Inputs added since the last reconciliation
    #[serde(skip)]
    added_inputs: Vec<InputDescriptor>,
    /// Ids of inputs removed since the last reconciliation
    #[serde(skip)]
    removed_inputs: Vec<PropertyId>,
    /// Inputs reordered since the last reconciliation
    #[serde(skip)]
    moved_inputs: Vec<InputDescriptor>,
    /// Memoized output node id; recomputed on demand, cleared on reload
    #[serde(skip)]
    output_node: Cell<Option<NodeId>>,
}

impl SubGraph {
    /// Create a new empty sub-graph
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            graph: ShaderGraph::new(name),
            inputs: Vec::new(),
            added_inputs: Vec::new(),
            removed_inputs: Vec::new(),
            moved_inputs: Vec::new(),
            output_node: Cell::new(None),
        }
    }

    /// The underlying graph
    pub fn graph(&self) -> &ShaderGraph {
        &self.graph
    }

    /// Add a node. Kinds not allowed inside sub-graphs are rejected with a
    /// warning and the graph is left unchanged.
    pub fn add_node(&mut self, node: Node) -> Option<NodeId> {
        if !node.allowed_in_subgraph {
            tracing::warn!(
                kind = %node.kind,
                name = %node.name,
                "node kind is not allowed inside a sub-graph"
            );
            return None;
        }
        Some(self.graph.add_node(node))
    }

    /// Remove a node and its incident edges
    pub fn remove_node(&mut self, node_id: NodeId) -> Option<Node> {
        if self.output_node.get() == Some(node_id) {
            self.output_node.set(None);
        }
        self.graph.remove_node(node_id)
    }

    /// Get a mutable node, e.g. to edit slot defaults
    pub fn node_mut(&mut self, node_id: NodeId) -> Option<&mut Node> {
        self.graph.node_mut(node_id)
    }

    /// Connect an output slot to an input slot
    pub fn connect(
        &mut self,
        from_node: NodeId,
        from_slot: SlotId,
        to_node: NodeId,
        to_slot: SlotId,
    ) -> Result<EdgeId, EdgeError> {
        self.graph.connect(from_node, from_slot, to_node, to_slot)
    }

    /// Remove an edge
    pub fn disconnect(&mut self, edge_id: EdgeId) {
        self.graph.disconnect(edge_id);
    }

    /// Declare a new externally exposed input
    pub fn add_input(&mut self, descriptor: InputDescriptor) -> PropertyId {
        let id = descriptor.id;
        self.graph.add_property(descriptor.as_property());
        self.inputs.push(descriptor.clone());
        self.added_inputs.push(descriptor);
        id
    }

    /// Remove a declared input by id
    pub fn remove_input(&mut self, id: PropertyId) {
        self.inputs.retain(|d| d.id != id);
        self.added_inputs.retain(|d| d.id != id);
        self.moved_inputs.retain(|d| d.id != id);
        self.graph.remove_property(id);
        self.removed_inputs.push(id);
    }

    /// Move a declared input to a new position in display order
    pub fn move_input(&mut self, id: PropertyId, to_index: usize) {
        let Some(from_index) = self.inputs.iter().position(|d| d.id == id) else {
            return;
        };
        let descriptor = self.inputs.remove(from_index);
        let to_index = to_index.min(self.inputs.len());
        self.inputs.insert(to_index, descriptor.clone());
        if !self.moved_inputs.iter().any(|d| d.id == id) {
            self.moved_inputs.push(descriptor);
        }
    }

    /// Current declared inputs, in display order
    pub fn inputs(&self) -> &[InputDescriptor] {
        &self.inputs
    }

    /// Inputs added since the last reconciliation
    pub fn added_inputs(&self) -> &[InputDescriptor] {
        &self.added_inputs
    }

    /// Ids of inputs removed since the last reconciliation
    pub fn removed_inputs(&self) -> &[PropertyId] {
        &self.removed_inputs
    }

    /// Inputs reordered since the last reconciliation
    pub fn moved_inputs(&self) -> &[InputDescriptor] {
        &self.moved_inputs
    }

    /// Forget tracked input changes once a consumer has reconciled
    pub fn clear_input_deltas(&mut self) {
        self.added_inputs.clear();
        self.removed_inputs.clear();
        self.moved_inputs.clear();
    }

    /// Rebuild derived state after deserialization: the graph's edge index
    /// and the memoized output node
    pub fn after_deserialize(&mut self) {
        self.graph.after_deserialize();
        self.output_node.set(None);
    }

    /// The designated output node, memoized across calls.
    ///
    /// Found lazily by kind; `None` while the graph has no output node,
    /// which is a valid mid-edit state.
    pub fn output_node(&self) -> Option<NodeId> {
        if let Some(id) = self.output_node.get() {
            if self.graph.node(id).is_some() {
                return Some(id);
            }
            self.output_node.set(None);
        }
        let found = self
            .graph
            .nodes()
            .find(|n| n.kind == SUBGRAPH_OUTPUT_KIND)
            .map(|n| n.id);
        if found.is_some() {
            self.output_node.set(found);
        }
        found
    }

    /// Nodes reachable from the output node, dependencies first
    pub fn active_nodes(&self) -> Result<Vec<NodeId>, CycleError> {
        collect_active_nodes(&self.graph, self.output_node())
    }

    /// Declared properties in stable-id order: the argument order of the
    /// assembled function
    pub fn graph_inputs(&self) -> Vec<&ShaderProperty> {
        let mut properties: Vec<&ShaderProperty> = self.graph.properties().collect();
        properties.sort_by_key(|p| p.id);
        properties
    }

    /// The output node's declared outputs; empty when no output node exists
    pub fn graph_outputs(&self) -> Vec<&Slot> {
        match self.output_node().and_then(|id| self.graph.node(id)) {
            Some(node) => node.inputs.iter().collect(),
            None => Vec::new(),
        }
    }

    /// Collect the properties this sub-graph exposes.
    ///
    /// Preview mode includes every declared property so a preview GUI can
    /// bind to all of them; Final mode includes only properties collected
    /// from active nodes.
    pub fn collect_properties(
        &self,
        collector: &mut PropertyCollector,
        behaviors: &BehaviorRegistry,
        mode: GenerationMode,
    ) -> Result<(), CodegenError> {
        if mode.is_preview() {
            for property in self.graph.properties() {
                collector.add_property(property.clone());
            }
        }
        let active = self.active_nodes()?;
        collect_node_properties(&self.graph, &active, behaviors, collector, mode)
    }

    /// Ambient interpolants required by the active nodes
    pub fn requirements(
        &self,
        behaviors: &BehaviorRegistry,
    ) -> Result<GraphRequirements, CodegenError> {
        let active = self.active_nodes()?;
        collect_requirements(&self.graph, &active, behaviors)
    }

    /// Name/value pairs for every declared property, for preview binding
    pub fn preview_properties(&self) -> Vec<PreviewProperty> {
        self.graph
            .properties()
            .map(|p| PreviewProperty {
                name: p.name.clone(),
                reference_name: p.reference_name.clone(),
                value: p.default_value.clone(),
            })
            .collect()
    }

    /// Append the body statements of all active nodes
    pub fn generate_node_code(
        &self,
        builder: &mut ShaderStringBuilder,
        behaviors: &BehaviorRegistry,
        ctx: &GraphContext,
        mode: GenerationMode,
    ) -> Result<(), CodegenError> {
        let active = self.active_nodes()?;
        emit_node_bodies(&self.graph, &active, behaviors, builder, ctx, mode)
    }

    /// Validate all active nodes and register their subroutines
    pub fn generate_node_functions(
        &self,
        registry: &mut FunctionRegistry,
        behaviors: &BehaviorRegistry,
        ctx: &GraphContext,
        mode: GenerationMode,
    ) -> Result<(), CodegenError> {
        let active = self.active_nodes()?;
        emit_node_functions(&self.graph, &active, behaviors, registry, ctx, mode)
    }

    /// Assemble this sub-graph into a single callable function registered
    /// under `name`.
    ///
    /// The signature is deterministic: declared inputs in stable-id order,
    /// then the ambient input struct, then one `out` parameter per declared
    /// output. With no output node the function has an empty body and no
    /// `out` parameters. Repeated generation over identical graph state
    /// produces byte-identical text.
    pub fn generate_function(
        &self,
        name: &str,
        registry: &mut FunctionRegistry,
        behaviors: &BehaviorRegistry,
        ctx: &GraphContext,
        _requirements: &GraphRequirements,
        mode: GenerationMode,
    ) -> Result<(), CodegenError> {
        let active = self.active_nodes()?;
        emit_node_functions(&self.graph, &active, behaviors, registry, ctx, mode)?;

        let mut arguments: Vec<String> = self
            .graph_inputs()
            .iter()
            .map(|p| p.argument_string())
            .collect();
        arguments.push(format!("{} {}", ctx.input_struct_name, AMBIENT_PARAM));
        for slot in self.graph_outputs() {
            arguments.push(format!(
                "out {} {}",
                slot.value_type.shader_name(),
                slot.shader_output_name
            ));
        }

        let mut body = ShaderStringBuilder::new();
        emit_node_bodies(&self.graph, &active, behaviors, &mut body, ctx, mode)?;
        if let Some(output_id) = self.output_node() {
            if let Some(output) = self.graph.node(output_id) {
                SubGraphOutputNode::remap_outputs(output, &self.graph, &mut body)?;
            }
        }

        registry.provide_function(name, |s| {
            s.append_line(format!("void {}({})", name, arguments.join(", ")));
            s.block(|s| s.append_builder(&body));
            Ok(())
        })
    }
}

impl Default for SubGraph {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

/// One declared property paired with its default, for preview GUI binding
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewProperty {
    /// Display name
    pub name: String,
    /// Identifier in generated code
    pub reference_name: String,
    /// Default value; `None` for resource types
    pub value: Option<SlotValue>,
}

/// Result of compiling a sub-graph
#[derive(Debug, Clone)]
pub struct GeneratedSubGraph {
    /// Name of the generated entry function
    pub function_name: String,
    /// Generated source: helper subroutines followed by the entry function
    pub source: String,
    /// Exposed properties in stable-id order
    pub properties: Vec<ShaderProperty>,
    /// Ambient interpolants the generated code reads
    pub requirements: GraphRequirements,
}

/// Compile a sub-graph into source text and an ordered property list.
///
/// Each call is one generation pass with fresh registries, so repeated
/// compiles never interfere with each other.
pub fn compile_sub_graph(
    sub_graph: &SubGraph,
    function_name: &str,
    behaviors: &BehaviorRegistry,
    ctx: &GraphContext,
    mode: GenerationMode,
) -> Result<GeneratedSubGraph, CodegenError> {
    let mut functions = FunctionRegistry::new();
    let mut collector = PropertyCollector::new();

    let requirements = sub_graph.requirements(behaviors)?;
    sub_graph.collect_properties(&mut collector, behaviors, mode)?;
    sub_graph.generate_function(
        function_name,
        &mut functions,
        behaviors,
        ctx,
        &requirements,
        mode,
    )?;

    Ok(GeneratedSubGraph {
        function_name: function_name.to_string(),
        source: functions.concatenated_sources(),
        properties: collector.into_properties(),
        requirements,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::NodeBehavior;
    use crate::nodes::{standard_registry, PropertyNode, SurfaceMasterNode};
    use glint_graph::ConcreteValueType;
    use uuid::Uuid;

    fn descriptor(id: u128, name: &str, value_type: ConcreteValueType) -> InputDescriptor {
        InputDescriptor::new(name, value_type).with_id(PropertyId(Uuid::from_u128(id)))
    }

    /// Sub-graph computing `Result = Color * Amount` from two declared
    /// inputs, with output node and wiring in place.
    fn tinted_sub_graph() -> (SubGraph, BehaviorRegistry) {
        let behaviors = standard_registry();
        let mut sub = SubGraph::new("Tint");

        let amount_id = sub.add_input(descriptor(1, "Amount", ConcreteValueType::Float));
        let color_id = sub.add_input(descriptor(2, "Color", ConcreteValueType::Vector3));

        let amount_prop = sub.graph().property(amount_id).unwrap().clone();
        let color_prop = sub.graph().property(color_id).unwrap().clone();
        let amount_node = sub.add_node(PropertyNode::create(&amount_prop)).unwrap();
        let color_node = sub.add_node(PropertyNode::create(&color_prop)).unwrap();

        let multiply = sub
            .add_node(behaviors.instantiate("multiply_float3").unwrap())
            .unwrap();
        let output = sub
            .add_node(SubGraphOutputNode::create(&[(
                "Result",
                ConcreteValueType::Vector3,
            )]))
            .unwrap();

        let color_out = sub.graph().node(color_node).unwrap().outputs[0].id;
        let amount_out = sub.graph().node(amount_node).unwrap().outputs[0].id;
        let a = sub.graph().node(multiply).unwrap().input_named("A").unwrap().id;
        let b = sub.graph().node(multiply).unwrap().input_named("B").unwrap().id;
        let result_out = sub.graph().node(multiply).unwrap().outputs[0].id;
        let result_in = sub.graph().node(output).unwrap().inputs[0].id;

        sub.connect(color_node, color_out, multiply, a).unwrap();
        sub.connect(amount_node, amount_out, multiply, b).unwrap();
        sub.connect(multiply, result_out, output, result_in).unwrap();

        (sub, behaviors)
    }

    #[test]
    fn signature_orders_inputs_ambient_then_outputs() {
        let (sub, behaviors) = tinted_sub_graph();
        let generated = compile_sub_graph(
            &sub,
            "Tint_Fn",
            &behaviors,
            &GraphContext::default(),
            GenerationMode::Final,
        )
        .unwrap();

        assert!(generated.source.contains(
            "void Tint_Fn(float Amount, float3 Color, SurfaceInputs IN, out float3 Result)"
        ));
        // helper registered before the entry function
        let helper = generated.source.find("Glint_Multiply_float3").unwrap();
        let entry = generated.source.find("void Tint_Fn").unwrap();
        assert!(helper < entry);
    }

    #[test]
    fn repeated_compilation_is_byte_identical() {
        let (sub, behaviors) = tinted_sub_graph();
        let ctx = GraphContext::default();
        let first =
            compile_sub_graph(&sub, "Tint_Fn", &behaviors, &ctx, GenerationMode::Final).unwrap();
        let second =
            compile_sub_graph(&sub, "Tint_Fn", &behaviors, &ctx, GenerationMode::Final).unwrap();

        assert_eq!(first.source, second.source);
        assert_eq!(first.properties, second.properties);
    }

    #[test]
    fn property_order_follows_stable_ids_not_insertion() {
        let behaviors = standard_registry();
        let mut sub = SubGraph::new("Props");
        sub.add_input(descriptor(3, "Albedo", ConcreteValueType::Vector3));
        sub.add_input(descriptor(1, "Smoothness", ConcreteValueType::Float));
        sub.add_input(descriptor(2, "Normal", ConcreteValueType::Vector3));

        let generated = compile_sub_graph(
            &sub,
            "Props_Fn",
            &behaviors,
            &GraphContext::default(),
            GenerationMode::Preview,
        )
        .unwrap();
        let names: Vec<&str> = generated.properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Smoothness", "Normal", "Albedo"]);
        assert!(generated.source.contains(
            "void Props_Fn(float Smoothness, float3 Normal, float3 Albedo, SurfaceInputs IN)"
        ));
    }

    #[test]
    fn missing_output_node_compiles_to_an_empty_function() {
        let behaviors = standard_registry();
        let sub = SubGraph::new("Empty");
        let generated = compile_sub_graph(
            &sub,
            "Empty_Fn",
            &behaviors,
            &GraphContext::default(),
            GenerationMode::Final,
        )
        .unwrap();

        assert_eq!(generated.source, "void Empty_Fn(SurfaceInputs IN)\n{\n}\n");
        assert!(generated.properties.is_empty());
        assert!(sub.output_node().is_none());
        assert!(sub.graph_outputs().is_empty());
    }

    #[test]
    fn unreachable_nodes_contribute_nothing() {
        let (mut sub, behaviors) = tinted_sub_graph();
        let ctx = GraphContext::default();
        let before =
            compile_sub_graph(&sub, "Tint_Fn", &behaviors, &ctx, GenerationMode::Final).unwrap();

        // an orphan constant and an orphan ambient read
        sub.add_node(behaviors.instantiate("float_constant").unwrap())
            .unwrap();
        sub.add_node(behaviors.instantiate("time").unwrap()).unwrap();

        let after =
            compile_sub_graph(&sub, "Tint_Fn", &behaviors, &ctx, GenerationMode::Final).unwrap();
        assert_eq!(before.source, after.source);
        assert_eq!(before.properties, after.properties);
        assert!(!after.requirements.needs_time);
    }

    #[test]
    fn preview_exposes_declared_but_unread_properties() {
        let (mut sub, behaviors) = tinted_sub_graph();
        sub.add_input(descriptor(9, "Unused", ConcreteValueType::Float));

        let mut preview = PropertyCollector::new();
        sub.collect_properties(&mut preview, &behaviors, GenerationMode::Preview)
            .unwrap();
        let mut final_pass = PropertyCollector::new();
        sub.collect_properties(&mut final_pass, &behaviors, GenerationMode::Final)
            .unwrap();

        assert!(preview.contains(PropertyId(Uuid::from_u128(9))));
        assert!(!final_pass.contains(PropertyId(Uuid::from_u128(9))));
        assert_eq!(final_pass.len(), 2);
    }

    #[test]
    fn disallowed_node_is_rejected_without_mutation() {
        let behaviors = standard_registry();
        let mut sub = SubGraph::new("Guarded");
        let master = behaviors.instantiate("surface_master").unwrap();

        assert!(!SurfaceMasterNode.allowed_in_subgraph());
        assert!(sub.add_node(master).is_none());
        assert_eq!(sub.graph().node_count(), 0);
    }

    #[test]
    fn cycle_is_reported_as_a_compile_error() {
        let behaviors = standard_registry();
        let mut sub = SubGraph::new("Cyclic");
        let first = sub
            .add_node(behaviors.instantiate("add_float").unwrap())
            .unwrap();
        let second = sub
            .add_node(behaviors.instantiate("add_float").unwrap())
            .unwrap();
        let output = sub
            .add_node(SubGraphOutputNode::create(&[(
                "Result",
                ConcreteValueType::Float,
            )]))
            .unwrap();

        let first_out = sub.graph().node(first).unwrap().outputs[0].id;
        let first_a = sub.graph().node(first).unwrap().inputs[0].id;
        let second_out = sub.graph().node(second).unwrap().outputs[0].id;
        let second_a = sub.graph().node(second).unwrap().inputs[0].id;
        let result_in = sub.graph().node(output).unwrap().inputs[0].id;

        sub.connect(first, first_out, second, second_a).unwrap();
        sub.connect(second, second_out, first, first_a).unwrap();
        sub.connect(second, second_out, output, result_in).unwrap();

        let err = compile_sub_graph(
            &sub,
            "Cyclic_Fn",
            &behaviors,
            &GraphContext::default(),
            GenerationMode::Final,
        );
        assert!(matches!(err, Err(CodegenError::Cycle(_))));
    }

    #[test]
    fn invalid_wiring_names_the_offending_node() {
        let behaviors = standard_registry();
        let mut sub = SubGraph::new("Invalid");
        let sample = sub
            .add_node(behaviors.instantiate("texture_sample").unwrap())
            .unwrap();
        let output = sub
            .add_node(SubGraphOutputNode::create(&[(
                "Result",
                ConcreteValueType::Vector4,
            )]))
            .unwrap();
        let rgba = sub.graph().node(sample).unwrap().outputs[0].id;
        let result_in = sub.graph().node(output).unwrap().inputs[0].id;
        sub.connect(sample, rgba, output, result_in).unwrap();

        // texture input left unconnected: required input missing
        let err = compile_sub_graph(
            &sub,
            "Invalid_Fn",
            &behaviors,
            &GraphContext::default(),
            GenerationMode::Final,
        );
        match err {
            Err(CodegenError::InvalidNode(e)) => {
                assert!(e.to_string().contains("Texture Sample"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn serialization_round_trip_preserves_generated_output() {
        let (sub, behaviors) = tinted_sub_graph();
        let ctx = GraphContext::default();
        let before =
            compile_sub_graph(&sub, "Tint_Fn", &behaviors, &ctx, GenerationMode::Final).unwrap();

        let ron_str = ron::to_string(&sub).unwrap();
        let mut loaded: SubGraph = ron::from_str(&ron_str).unwrap();
        loaded.after_deserialize();

        let after =
            compile_sub_graph(&loaded, "Tint_Fn", &behaviors, &ctx, GenerationMode::Final).unwrap();
        assert_eq!(before.source, after.source);
        assert_eq!(before.properties, after.properties);
    }

    #[test]
    fn input_deltas_track_add_remove_move() {
        let mut sub = SubGraph::new("Deltas");
        let a = sub.add_input(descriptor(1, "A", ConcreteValueType::Float));
        let b = sub.add_input(descriptor(2, "B", ConcreteValueType::Float));
        sub.add_input(descriptor(3, "C", ConcreteValueType::Float));
        assert_eq!(sub.added_inputs().len(), 3);

        sub.clear_input_deltas();
        sub.remove_input(b);
        sub.move_input(a, 1);

        assert_eq!(sub.inputs().len(), 2);
        assert_eq!(sub.inputs()[0].name, "C");
        assert_eq!(sub.inputs()[1].name, "A");
        assert!(sub.added_inputs().is_empty());
        assert_eq!(sub.removed_inputs(), &[b]);
        assert_eq!(sub.moved_inputs().len(), 1);
        assert_eq!(sub.moved_inputs()[0].id, a);

        sub.clear_input_deltas();
        assert!(sub.removed_inputs().is_empty());
        assert!(sub.moved_inputs().is_empty());
    }

    #[test]
    fn output_node_lookup_is_memoized_and_survives_removal() {
        let mut sub = SubGraph::new("Cache");
        assert!(sub.output_node().is_none());

        let output = sub
            .add_node(SubGraphOutputNode::create(&[(
                "Result",
                ConcreteValueType::Float,
            )]))
            .unwrap();
        assert_eq!(sub.output_node(), Some(output));
        assert_eq!(sub.output_node(), Some(output));

        sub.remove_node(output);
        assert!(sub.output_node().is_none());
    }

    #[test]
    fn requirements_reflect_active_ambient_nodes() {
        let behaviors = standard_registry();
        let mut sub = SubGraph::new("Reqs");
        let uv = sub.add_node(behaviors.instantiate("uv").unwrap()).unwrap();
        let output = sub
            .add_node(SubGraphOutputNode::create(&[(
                "Result",
                ConcreteValueType::Vector2,
            )]))
            .unwrap();
        let uv_out = sub.graph().node(uv).unwrap().outputs[0].id;
        let result_in = sub.graph().node(output).unwrap().inputs[0].id;
        sub.connect(uv, uv_out, output, result_in).unwrap();

        let requirements = sub.requirements(&behaviors).unwrap();
        assert!(requirements.needs_uv);
        assert!(!requirements.needs_world_position);
    }
}

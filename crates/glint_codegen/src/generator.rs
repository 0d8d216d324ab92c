// SPDX-License-Identifier: MIT OR Apache-2.0
//! Generation orchestration over the active node set.

use crate::behavior::{BehaviorRegistry, NodeBehavior, NodeValidationError};
use crate::builder::ShaderStringBuilder;
use crate::collector::PropertyCollector;
use crate::context::{GenerationMode, GraphContext, GraphRequirements};
use crate::registry::FunctionRegistry;
use glint_graph::{ConcreteValueType, CycleError, Node, NodeId, PropertyId, ShaderGraph, Slot};

/// Error produced during a generation pass
#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    /// The graph contains a cycle through input edges
    #[error(transparent)]
    Cycle(#[from] CycleError),

    /// A node failed pre-generation validation
    #[error(transparent)]
    InvalidNode(#[from] NodeValidationError),

    /// A node references a behavior kind that is not registered
    #[error("node {node:?} has unregistered behavior kind '{kind}'")]
    UnknownBehavior {
        /// Node carrying the unknown kind
        node: NodeId,
        /// The unregistered kind key
        kind: String,
    },

    /// An active node id is no longer present in the graph
    #[error("node {0:?} is not in the graph")]
    MissingNode(NodeId),

    /// A node binds a property that is not declared on the graph
    #[error("node '{node_name}' ({node:?}) references undeclared property {property:?}")]
    UnknownProperty {
        /// Referencing node
        node: NodeId,
        /// Referencing node's display name
        node_name: String,
        /// The undeclared property id
        property: PropertyId,
    },

    /// An input slot has neither an incoming edge nor a default value
    #[error("node '{node_name}' ({node:?}): input '{slot}' has no connection and no default")]
    UnresolvedInput {
        /// Node with the unresolved input
        node: NodeId,
        /// Node's display name
        node_name: String,
        /// Unresolved slot name
        slot: String,
    },
}

fn behavior_for<'a>(
    behaviors: &'a BehaviorRegistry,
    node: &Node,
) -> Result<&'a dyn NodeBehavior, CodegenError> {
    behaviors
        .get(&node.kind)
        .ok_or_else(|| CodegenError::UnknownBehavior {
            node: node.id,
            kind: node.kind.clone(),
        })
}

fn node_for(graph: &ShaderGraph, id: NodeId) -> Result<&Node, CodegenError> {
    graph.node(id).ok_or(CodegenError::MissingNode(id))
}

/// Walk the active set in traversal order and let body-code providers
/// append their statements.
pub fn emit_node_bodies(
    graph: &ShaderGraph,
    active: &[NodeId],
    behaviors: &BehaviorRegistry,
    builder: &mut ShaderStringBuilder,
    ctx: &GraphContext,
    mode: GenerationMode,
) -> Result<(), CodegenError> {
    for id in active {
        let node = node_for(graph, *id)?;
        let behavior = behavior_for(behaviors, node)?;
        if let Some(body) = behavior.as_body_code() {
            body.generate_body_code(node, graph, builder, ctx, mode)?;
        }
    }
    Ok(())
}

/// Walk the active set, validating each node, and let function providers
/// register their subroutines.
///
/// Validation runs for every active node, capability or not, and fails fast
/// on the first offender.
pub fn emit_node_functions(
    graph: &ShaderGraph,
    active: &[NodeId],
    behaviors: &BehaviorRegistry,
    registry: &mut FunctionRegistry,
    ctx: &GraphContext,
    mode: GenerationMode,
) -> Result<(), CodegenError> {
    for id in active {
        let node = node_for(graph, *id)?;
        let behavior = behavior_for(behaviors, node)?;
        behavior.validate(node, graph)?;
        if let Some(function) = behavior.as_function() {
            function.generate_function(node, graph, registry, ctx, mode)?;
        }
    }
    Ok(())
}

/// Walk the active set and let property providers contribute to the
/// collector.
pub fn collect_node_properties(
    graph: &ShaderGraph,
    active: &[NodeId],
    behaviors: &BehaviorRegistry,
    collector: &mut PropertyCollector,
    mode: GenerationMode,
) -> Result<(), CodegenError> {
    for id in active {
        let node = node_for(graph, *id)?;
        let behavior = behavior_for(behaviors, node)?;
        if let Some(properties) = behavior.as_properties() {
            properties.collect_properties(node, graph, collector, mode);
        }
    }
    Ok(())
}

/// Union of ambient interpolant requirements over the active set
pub fn collect_requirements(
    graph: &ShaderGraph,
    active: &[NodeId],
    behaviors: &BehaviorRegistry,
) -> Result<GraphRequirements, CodegenError> {
    let mut requirements = GraphRequirements::none();
    for id in active {
        let node = node_for(graph, *id)?;
        let behavior = behavior_for(behaviors, node)?;
        requirements = requirements.union(behavior.requirements(node, graph));
    }
    Ok(requirements)
}

/// Resolve the shader expression feeding an input slot: the upstream
/// output's variable when connected, otherwise the slot's default literal.
/// The expression is adapted to the slot's value type.
pub fn input_expression(
    graph: &ShaderGraph,
    node: &Node,
    slot: &Slot,
) -> Result<String, CodegenError> {
    if let Some(edge) = graph.edge_into_slot(node.id, slot.id) {
        let source = node_for(graph, edge.from_node)?;
        let source_slot =
            source
                .slot(edge.from_slot)
                .ok_or_else(|| NodeValidationError::DanglingEdge {
                    node: node.id,
                    node_name: node.name.clone(),
                    slot: slot.name.clone(),
                })?;
        let expr = source.variable_name_for_slot(source_slot);
        return Ok(adapt_expression(
            &expr,
            source_slot.value_type,
            slot.value_type,
        ));
    }
    match &slot.default_value {
        Some(default) => Ok(default.shader_literal()),
        None => Err(CodegenError::UnresolvedInput {
            node: node.id,
            node_name: node.name.clone(),
            slot: slot.name.clone(),
        }),
    }
}

/// Adapt an expression of one value type to another, following the same
/// implicit conversions the edge validator accepts.
pub fn adapt_expression(expr: &str, from: ConcreteValueType, to: ConcreteValueType) -> String {
    use ConcreteValueType::*;
    if from == to {
        return expr.to_string();
    }
    match (from, to) {
        // scalar splat
        (Float, Vector2 | Vector3 | Vector4) => format!("({})({})", to.shader_name(), expr),
        // vector widening, zero-padded
        (Vector2, Vector3) => format!("float3({expr}, 0.0)"),
        (Vector2, Vector4) => format!("float4({expr}, 0.0, 0.0)"),
        (Vector3, Vector4) => format!("float4({expr}, 0.0)"),
        // anything else was rejected at connect time; pass through untouched
        _ => expr.to_string(),
    }
}

/// Look up an input slot a behavior's template guarantees
pub fn required_input<'a>(node: &'a Node, name: &'static str) -> Result<&'a Slot, CodegenError> {
    node.input_named(name)
        .ok_or_else(|| missing_slot(node, name))
}

/// Look up an output slot a behavior's template guarantees
pub fn required_output<'a>(node: &'a Node, name: &'static str) -> Result<&'a Slot, CodegenError> {
    node.output_named(name)
        .ok_or_else(|| missing_slot(node, name))
}

fn missing_slot(node: &Node, name: &'static str) -> CodegenError {
    CodegenError::InvalidNode(NodeValidationError::MissingSlot {
        node: node.id,
        node_name: node.name.clone(),
        slot: name,
    })
}

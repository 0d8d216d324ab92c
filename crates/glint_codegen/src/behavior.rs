// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node behaviors and generation capabilities.
//!
//! Nodes in the graph are plain data keyed by a behavior kind. A
//! [`NodeBehavior`] supplies everything kind-specific: the slot template,
//! placement rules, validation, and the generation capabilities the node
//! opts into. The orchestrator never inspects node types; it asks each
//! behavior which capabilities it exposes.

use crate::builder::ShaderStringBuilder;
use crate::collector::PropertyCollector;
use crate::context::{GenerationMode, GraphContext, GraphRequirements};
use crate::generator::CodegenError;
use crate::registry::FunctionRegistry;
use glint_graph::{Node, NodeId, ShaderGraph, Slot};
use indexmap::IndexMap;

/// Capability: the node contributes statements to the function body
pub trait GeneratesBodyCode {
    /// Append this node's statements to the body under construction
    fn generate_body_code(
        &self,
        node: &Node,
        graph: &ShaderGraph,
        builder: &mut ShaderStringBuilder,
        ctx: &GraphContext,
        mode: GenerationMode,
    ) -> Result<(), CodegenError>;
}

/// Capability: the node registers shared subroutines
pub trait GeneratesFunction {
    /// Register this node's subroutines with the function registry
    fn generate_function(
        &self,
        node: &Node,
        graph: &ShaderGraph,
        registry: &mut FunctionRegistry,
        ctx: &GraphContext,
        mode: GenerationMode,
    ) -> Result<(), CodegenError>;
}

/// Capability: the node contributes externally exposed properties
pub trait CollectsProperties {
    /// Add this node's properties to the collector
    fn collect_properties(
        &self,
        node: &Node,
        graph: &ShaderGraph,
        collector: &mut PropertyCollector,
        mode: GenerationMode,
    );
}

/// Kind-specific behavior of a node.
///
/// Implementations are stateless with respect to any particular node
/// instance; per-node data lives on the [`Node`] itself (slot defaults, the
/// bound property id).
pub trait NodeBehavior {
    /// Kind key this behavior registers under
    fn kind(&self) -> &str;

    /// Display name for newly created nodes
    fn display_name(&self) -> &str;

    /// Slot template for newly created nodes: `(inputs, outputs)`
    fn build_slots(&self) -> (Vec<Slot>, Vec<Slot>);

    /// Whether nodes of this kind may be placed inside a reusable sub-graph
    fn allowed_in_subgraph(&self) -> bool {
        true
    }

    /// Ambient interpolants a node of this kind reads
    fn requirements(&self, _node: &Node, _graph: &ShaderGraph) -> GraphRequirements {
        GraphRequirements::none()
    }

    /// Validate a node's wiring before function generation
    fn validate(&self, node: &Node, graph: &ShaderGraph) -> Result<(), NodeValidationError> {
        validate_node_slots(node, graph)
    }

    /// Body-code capability, when implemented
    fn as_body_code(&self) -> Option<&dyn GeneratesBodyCode> {
        None
    }

    /// Function-generation capability, when implemented
    fn as_function(&self) -> Option<&dyn GeneratesFunction> {
        None
    }

    /// Property-collection capability, when implemented
    fn as_properties(&self) -> Option<&dyn CollectsProperties> {
        None
    }
}

/// Baseline wiring validation shared by all behaviors: required inputs are
/// connected, and every incoming edge carries a convertible value type.
pub fn validate_node_slots(node: &Node, graph: &ShaderGraph) -> Result<(), NodeValidationError> {
    for slot in &node.inputs {
        match graph.edge_into_slot(node.id, slot.id) {
            Some(edge) => {
                let source = graph
                    .node(edge.from_node)
                    .and_then(|n| n.slot(edge.from_slot))
                    .ok_or_else(|| NodeValidationError::DanglingEdge {
                        node: node.id,
                        node_name: node.name.clone(),
                        slot: slot.name.clone(),
                    })?;
                if !source.value_type.can_convert_to(&slot.value_type) {
                    return Err(NodeValidationError::SlotTypeMismatch {
                        node: node.id,
                        node_name: node.name.clone(),
                        slot: slot.name.clone(),
                        expected: slot.value_type.shader_name(),
                        actual: source.value_type.shader_name(),
                    });
                }
            }
            None => {
                if slot.required {
                    return Err(NodeValidationError::MissingRequiredInput {
                        node: node.id,
                        node_name: node.name.clone(),
                        slot: slot.name.clone(),
                    });
                }
            }
        }
    }
    Ok(())
}

/// Node-scoped validation failure, reported just before function generation
#[derive(Debug, thiserror::Error)]
pub enum NodeValidationError {
    /// A required input slot has no incoming edge
    #[error("node '{node_name}' ({node:?}): required input '{slot}' is not connected")]
    MissingRequiredInput {
        /// Offending node
        node: NodeId,
        /// Offending node's display name
        node_name: String,
        /// Unconnected slot name
        slot: String,
    },

    /// An incoming edge carries a value the slot cannot accept
    #[error("node '{node_name}' ({node:?}): input '{slot}' expects {expected} but is fed {actual}")]
    SlotTypeMismatch {
        /// Offending node
        node: NodeId,
        /// Offending node's display name
        node_name: String,
        /// Mismatched slot name
        slot: String,
        /// Slot's declared type token
        expected: &'static str,
        /// Upstream value type token
        actual: &'static str,
    },

    /// An incoming edge references a node or slot that no longer exists
    #[error("node '{node_name}' ({node:?}): input '{slot}' is fed by a missing upstream slot")]
    DanglingEdge {
        /// Offending node
        node: NodeId,
        /// Offending node's display name
        node_name: String,
        /// Slot fed by the dangling edge
        slot: String,
    },

    /// A template slot the behavior relies on is missing from the node
    #[error("node '{node_name}' ({node:?}): expected slot '{slot}' is missing")]
    MissingSlot {
        /// Offending node
        node: NodeId,
        /// Offending node's display name
        node_name: String,
        /// Missing slot name
        slot: &'static str,
    },

    /// The node binds a property that is not declared on the graph
    #[error("node '{node_name}' ({node:?}): bound property is missing or undeclared")]
    MissingProperty {
        /// Offending node
        node: NodeId,
        /// Offending node's display name
        node_name: String,
    },
}

/// Registry of node behaviors, keyed by kind
#[derive(Default)]
pub struct BehaviorRegistry {
    behaviors: IndexMap<String, Box<dyn NodeBehavior>>,
}

impl BehaviorRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a behavior under its kind key
    pub fn register(&mut self, behavior: Box<dyn NodeBehavior>) {
        self.behaviors.insert(behavior.kind().to_string(), behavior);
    }

    /// Get a behavior by kind
    pub fn get(&self, kind: &str) -> Option<&dyn NodeBehavior> {
        self.behaviors.get(kind).map(Box::as_ref)
    }

    /// Registered kinds, in registration order
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.behaviors.keys().map(String::as_str)
    }

    /// Create a node from a registered behavior's template
    pub fn instantiate(&self, kind: &str) -> Option<Node> {
        let behavior = self.get(kind)?;
        let (inputs, outputs) = behavior.build_slots();
        Some(
            Node::new(behavior.kind(), behavior.display_name(), inputs, outputs)
                .with_subgraph_allowed(behavior.allowed_in_subgraph()),
        )
    }
}

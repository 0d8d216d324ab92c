// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph container for nodes, edges, and declared properties.

use crate::edge::{Edge, EdgeId};
use crate::node::{Node, NodeId};
use crate::property::{PropertyId, ShaderProperty};
use crate::slot::SlotId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A shader graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShaderGraph {
    /// Graph name
    pub name: String,
    /// Nodes in the graph
    nodes: IndexMap<NodeId, Node>,
    /// Edges between slots
    edges: IndexMap<EdgeId, Edge>,
    /// Externally exposed properties declared on the graph
    properties: IndexMap<PropertyId, ShaderProperty>,
    /// Reverse index from node to incident edges, rebuilt after deserialization
    #[serde(skip)]
    node_edges: HashMap<NodeId, Vec<EdgeId>>,
}

impl ShaderGraph {
    /// Create a new empty graph
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: IndexMap::new(),
            edges: IndexMap::new(),
            properties: IndexMap::new(),
            node_edges: HashMap::new(),
        }
    }

    /// Add a node to the graph
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = node.id;
        self.nodes.insert(id, node);
        id
    }

    /// Remove a node and its incident edges
    pub fn remove_node(&mut self, node_id: NodeId) -> Option<Node> {
        if let Some(edge_ids) = self.node_edges.remove(&node_id) {
            for edge_id in edge_ids {
                if let Some(edge) = self.edges.swap_remove(&edge_id) {
                    let other = if edge.from_node == node_id {
                        edge.to_node
                    } else {
                        edge.from_node
                    };
                    if let Some(list) = self.node_edges.get_mut(&other) {
                        list.retain(|e| *e != edge_id);
                    }
                }
            }
        }
        self.nodes.swap_remove(&node_id)
    }

    /// Get a node by ID
    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    /// Get a mutable node by ID
    pub fn node_mut(&mut self, node_id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&node_id)
    }

    /// Get all nodes
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Get all node IDs
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Add an edge from an output slot to an input slot
    pub fn connect(
        &mut self,
        from_node: NodeId,
        from_slot: SlotId,
        to_node: NodeId,
        to_slot: SlotId,
    ) -> Result<EdgeId, EdgeError> {
        let source_node = self
            .nodes
            .get(&from_node)
            .ok_or(EdgeError::NodeNotFound(from_node))?;
        let target_node = self
            .nodes
            .get(&to_node)
            .ok_or(EdgeError::NodeNotFound(to_node))?;

        let source_slot = source_node
            .slot(from_slot)
            .ok_or(EdgeError::SlotNotFound(from_slot))?;
        let target_slot = target_node
            .slot(to_slot)
            .ok_or(EdgeError::SlotNotFound(to_slot))?;

        if !source_node.owns_output(from_slot) || !target_node.owns_input(to_slot) {
            return Err(EdgeError::DirectionMismatch);
        }

        if !source_slot.value_type.can_convert_to(&target_slot.value_type) {
            return Err(EdgeError::IncompatibleTypes {
                from: source_slot.value_type.shader_name(),
                to: target_slot.value_type.shader_name(),
            });
        }

        // At most one edge may terminate at an input slot
        if self.edges.values().any(|e| e.to_slot == to_slot) {
            return Err(EdgeError::SlotAlreadyConnected(to_slot));
        }

        if from_node == to_node {
            return Err(EdgeError::SelfLoop);
        }

        let edge = Edge::new(from_node, from_slot, to_node, to_slot);
        let id = edge.id;
        self.edges.insert(id, edge);
        self.node_edges.entry(from_node).or_default().push(id);
        self.node_edges.entry(to_node).or_default().push(id);
        Ok(id)
    }

    /// Remove an edge
    pub fn disconnect(&mut self, edge_id: EdgeId) -> Option<Edge> {
        let edge = self.edges.swap_remove(&edge_id)?;
        for node in [edge.from_node, edge.to_node] {
            if let Some(list) = self.node_edges.get_mut(&node) {
                list.retain(|e| *e != edge_id);
            }
        }
        Some(edge)
    }

    /// Get an edge by ID
    pub fn edge(&self, edge_id: EdgeId) -> Option<&Edge> {
        self.edges.get(&edge_id)
    }

    /// Get all edges
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    /// Get the number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Get edges incident to a node, via the reverse index
    pub fn edges_for_node(&self, node_id: NodeId) -> impl Iterator<Item = &Edge> {
        self.node_edges
            .get(&node_id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.edges.get(id))
    }

    /// Get edges terminating at a node's input slots
    pub fn incoming_edges(&self, node_id: NodeId) -> impl Iterator<Item = &Edge> {
        self.edges_for_node(node_id)
            .filter(move |e| e.to_node == node_id)
    }

    /// Get edges originating at a node's output slots
    pub fn outgoing_edges(&self, node_id: NodeId) -> impl Iterator<Item = &Edge> {
        self.edges_for_node(node_id)
            .filter(move |e| e.from_node == node_id)
    }

    /// Get the single edge feeding an input slot, if any
    pub fn edge_into_slot(&self, node_id: NodeId, slot_id: SlotId) -> Option<&Edge> {
        self.incoming_edges(node_id).find(|e| e.to_slot == slot_id)
    }

    /// Declare an externally exposed property on the graph
    pub fn add_property(&mut self, property: ShaderProperty) -> PropertyId {
        let id = property.id;
        self.properties.insert(id, property);
        id
    }

    /// Remove a declared property
    pub fn remove_property(&mut self, property_id: PropertyId) -> Option<ShaderProperty> {
        self.properties.swap_remove(&property_id)
    }

    /// Get a declared property by ID
    pub fn property(&self, property_id: PropertyId) -> Option<&ShaderProperty> {
        self.properties.get(&property_id)
    }

    /// Get all declared properties, in declaration order
    pub fn properties(&self) -> impl Iterator<Item = &ShaderProperty> {
        self.properties.values()
    }

    /// Rebuild derived state after the graph was reconstructed from
    /// serialized form. The reverse edge index is not serialized.
    pub fn after_deserialize(&mut self) {
        self.node_edges.clear();
        for (id, edge) in &self.edges {
            self.node_edges.entry(edge.from_node).or_default().push(*id);
            self.node_edges.entry(edge.to_node).or_default().push(*id);
        }
    }
}

impl Default for ShaderGraph {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

/// Error when creating an edge
#[derive(Debug, thiserror::Error)]
pub enum EdgeError {
    /// Node not found
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Slot not found
    #[error("Slot not found: {0:?}")]
    SlotNotFound(SlotId),

    /// Edge must run from an output slot to an input slot
    #[error("Edges run from an output slot to an input slot")]
    DirectionMismatch,

    /// Incompatible slot value types
    #[error("Cannot feed {from} into {to}")]
    IncompatibleTypes {
        /// Source slot type token
        from: &'static str,
        /// Target slot type token
        to: &'static str,
    },

    /// Input slot already has an incoming edge
    #[error("Input slot already connected: {0:?}")]
    SlotAlreadyConnected(SlotId),

    /// Self-loop not allowed
    #[error("Self-loop not allowed")]
    SelfLoop,
}

// SPDX-License-Identifier: MIT OR Apache-2.0
//! Edge definitions for the shader graph.

use crate::node::NodeId;
use crate::slot::SlotId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeId(pub Uuid);

impl EdgeId {
    /// Create a new random edge ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EdgeId {
    fn default() -> Self {
        Self::new()
    }
}

/// A directed connection from an output slot to an input slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    /// Unique edge ID
    pub id: EdgeId,
    /// Source node ID
    pub from_node: NodeId,
    /// Source output slot ID
    pub from_slot: SlotId,
    /// Target node ID
    pub to_node: NodeId,
    /// Target input slot ID
    pub to_slot: SlotId,
}

impl Edge {
    /// Create a new edge
    pub fn new(from_node: NodeId, from_slot: SlotId, to_node: NodeId, to_slot: SlotId) -> Self {
        Self {
            id: EdgeId::new(),
            from_node,
            from_slot,
            to_node,
            to_slot,
        }
    }

    /// Check if this edge touches a specific node
    pub fn involves_node(&self, node_id: NodeId) -> bool {
        self.from_node == node_id || self.to_node == node_id
    }

    /// Check if this edge touches a specific slot
    pub fn involves_slot(&self, slot_id: SlotId) -> bool {
        self.from_slot == slot_id || self.to_slot == slot_id
    }
}

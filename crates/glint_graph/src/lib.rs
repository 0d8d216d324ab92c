// SPDX-License-Identifier: MIT OR Apache-2.0
//! Shader graph data model for Glint.
//!
//! This crate provides the graph half of the Glint shader compiler:
//! - Typed nodes with named input/output slots
//! - Validated directed edges between slots
//! - A graph container with a per-node edge index
//! - Dependency-ordered traversal with cycle detection
//! - Externally exposed shader properties and input descriptors
//!
//! ## Architecture
//!
//! Nodes are plain data: identity, a behavior kind key, and slots. What a
//! node *does* during code generation lives in the companion codegen crate,
//! keyed by the node's kind, so the model stays serializable and the set of
//! node variants stays open.

pub mod edge;
pub mod graph;
pub mod input;
pub mod node;
pub mod property;
pub mod slot;
pub mod traversal;

pub use edge::{Edge, EdgeId};
pub use graph::{EdgeError, ShaderGraph};
pub use input::InputDescriptor;
pub use node::{Node, NodeId};
pub use property::{PropertyId, ShaderProperty};
pub use slot::{ConcreteValueType, Slot, SlotDirection, SlotId, SlotValue};
pub use traversal::{collect_active_nodes, CycleError};

// SPDX-License-Identifier: MIT OR Apache-2.0
//! Shader code generation for Glint.
//!
//! This crate turns a [`glint_graph`] shader graph into source text:
//! - A line-oriented shader string builder with scoped blocks
//! - Per-pass function and property registries
//! - Capability-based node behaviors and a behavior registry
//! - The generation orchestrator over the active node set
//! - Reusable sub-graphs assembled into callable functions
//! - A standard node library (constants, properties, ambient inputs,
//!   math, texture sampling)
//!
//! ## Architecture
//!
//! Registries live for exactly one generation pass and are threaded through
//! the generation calls as explicit parameters. Compiling the same graph
//! state twice yields byte-identical output; callers may memoize compiled
//! sub-graphs by a content hash of their inputs.

pub mod behavior;
pub mod builder;
pub mod collector;
pub mod context;
pub mod generator;
pub mod nodes;
pub mod registry;
pub mod subgraph;

pub use behavior::{
    BehaviorRegistry, CollectsProperties, GeneratesBodyCode, GeneratesFunction, NodeBehavior,
    NodeValidationError,
};
pub use builder::ShaderStringBuilder;
pub use collector::PropertyCollector;
pub use context::{GenerationMode, GraphContext, GraphRequirements};
pub use generator::CodegenError;
pub use registry::FunctionRegistry;
pub use subgraph::{compile_sub_graph, GeneratedSubGraph, PreviewProperty, SubGraph};

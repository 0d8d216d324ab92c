// SPDX-License-Identifier: MIT OR Apache-2.0
//! Property collection for a generation pass.

use glint_graph::{PropertyId, ShaderProperty};
use indexmap::IndexMap;

/// Accumulates the externally exposed properties needed by a generation
/// pass, de-duplicated by stable id.
///
/// Like the function registry, a collector lives for one pass only.
#[derive(Debug, Default)]
pub struct PropertyCollector {
    properties: IndexMap<PropertyId, ShaderProperty>,
}

impl PropertyCollector {
    /// Create a new empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a property. Re-adding the same id is idempotent; mutable fields
    /// take the last writer.
    pub fn add_property(&mut self, property: ShaderProperty) {
        self.properties.insert(property.id, property);
    }

    /// True when a property with this id has been collected
    pub fn contains(&self, id: PropertyId) -> bool {
        self.properties.contains_key(&id)
    }

    /// Number of collected properties
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// True when nothing has been collected
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Collected properties sorted by stable id.
    ///
    /// This ordering is the argument order of generated sub-graph functions;
    /// it must not depend on insertion order.
    pub fn properties(&self) -> Vec<&ShaderProperty> {
        let mut props: Vec<&ShaderProperty> = self.properties.values().collect();
        props.sort_by_key(|p| p.id);
        props
    }

    /// Collected properties sorted by stable id, by value
    pub fn into_properties(self) -> Vec<ShaderProperty> {
        let mut props: Vec<ShaderProperty> = self.properties.into_values().collect();
        props.sort_by_key(|p| p.id);
        props
    }
}

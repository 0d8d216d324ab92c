// SPDX-License-Identifier: MIT OR Apache-2.0
//! Externally exposed shader properties.

use crate::slot::{sanitize_identifier, ConcreteValueType, SlotValue};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique, stable identifier for a property.
///
/// Properties are ordered by this id wherever ordering is visible in
/// generated output.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct PropertyId(pub Uuid);

impl PropertyId {
    /// Create a new random property ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PropertyId {
    fn default() -> Self {
        Self::new()
    }
}

/// A named, typed external input of a graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShaderProperty {
    /// Stable identity
    pub id: PropertyId,
    /// Display name
    pub name: String,
    /// Identifier used in generated code
    pub reference_name: String,
    /// Value type
    pub value_type: ConcreteValueType,
    /// Default value; `None` for resource types
    pub default_value: Option<SlotValue>,
}

impl ShaderProperty {
    /// Create a new property; the reference name is derived from the
    /// display name
    pub fn new(name: impl Into<String>, value_type: ConcreteValueType) -> Self {
        let name = name.into();
        let reference_name = sanitize_identifier(&name);
        Self {
            id: PropertyId::new(),
            name,
            reference_name,
            value_type,
            default_value: value_type.zero_value(),
        }
    }

    /// Override the stable id (e.g. when reconstructing a known property)
    pub fn with_id(mut self, id: PropertyId) -> Self {
        self.id = id;
        self
    }

    /// Override the default value
    pub fn with_default(mut self, value: SlotValue) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Render this property as a function argument declaration,
    /// e.g. `float3 Tint`
    pub fn argument_string(&self) -> String {
        format!("{} {}", self.value_type.shader_name(), self.reference_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argument_string_pairs_type_and_reference() {
        let prop = ShaderProperty::new("Base Color", ConcreteValueType::Vector3);
        assert_eq!(prop.argument_string(), "float3 Base_Color");
    }

    #[test]
    fn ids_order_like_their_uuids() {
        let low = PropertyId(Uuid::from_u128(1));
        let high = PropertyId(Uuid::from_u128(2));
        assert!(low < high);
    }

    #[test]
    fn texture_properties_have_no_default() {
        let prop = ShaderProperty::new("Albedo Map", ConcreteValueType::Texture2D);
        assert_eq!(prop.default_value, None);
    }
}

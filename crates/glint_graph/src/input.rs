// SPDX-License-Identifier: MIT OR Apache-2.0
//! Input descriptors for externally exposed sub-graph parameters.

use crate::property::{PropertyId, ShaderProperty};
use crate::slot::{ConcreteValueType, SlotValue};
use serde::{Deserialize, Serialize};

/// Describes one externally exposed parameter of a reusable sub-graph.
///
/// Descriptors are the edit-facing record of a sub-graph's interface; each
/// one maps to a [`ShaderProperty`] declared on the underlying graph. The
/// sub-graph tracks added/removed/moved descriptors across edits so that
/// consumers embedding the sub-graph can reconcile their own copies
/// incrementally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputDescriptor {
    /// Stable identity, shared with the declared property
    pub id: PropertyId,
    /// Display name
    pub name: String,
    /// Value type
    pub value_type: ConcreteValueType,
    /// Default value; `None` for resource types
    pub default_value: Option<SlotValue>,
}

impl InputDescriptor {
    /// Create a new descriptor with a fresh id
    pub fn new(name: impl Into<String>, value_type: ConcreteValueType) -> Self {
        Self {
            id: PropertyId::new(),
            name: name.into(),
            value_type,
            default_value: value_type.zero_value(),
        }
    }

    /// Override the stable id
    pub fn with_id(mut self, id: PropertyId) -> Self {
        self.id = id;
        self
    }

    /// Override the default value
    pub fn with_default(mut self, value: SlotValue) -> Self {
        self.default_value = Some(value);
        self
    }

    /// The property this descriptor declares on the graph
    pub fn as_property(&self) -> ShaderProperty {
        let mut property =
            ShaderProperty::new(self.name.clone(), self.value_type).with_id(self.id);
        property.default_value = self.default_value.clone();
        property
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_and_property_share_identity() {
        let desc = InputDescriptor::new("Amount", ConcreteValueType::Float)
            .with_default(SlotValue::Float(0.5));
        let prop = desc.as_property();
        assert_eq!(prop.id, desc.id);
        assert_eq!(prop.default_value, Some(SlotValue::Float(0.5)));
        assert_eq!(prop.argument_string(), "float Amount");
    }
}

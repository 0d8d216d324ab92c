// SPDX-License-Identifier: MIT OR Apache-2.0
//! Slot definitions for node inputs/outputs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotId(pub Uuid);

impl SlotId {
    /// Create a new random slot ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SlotId {
    fn default() -> Self {
        Self::new()
    }
}

/// Slot direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotDirection {
    /// Input slot
    Input,
    /// Output slot
    Output,
}

/// Concrete value type carried by a slot, a property, or a generated variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConcreteValueType {
    /// Boolean value
    Boolean,
    /// Scalar float
    Float,
    /// 2-component vector
    Vector2,
    /// 3-component vector
    Vector3,
    /// 4-component vector
    Vector4,
    /// 2x2 matrix
    Matrix2,
    /// 3x3 matrix
    Matrix3,
    /// 4x4 matrix
    Matrix4,
    /// 2D texture
    Texture2D,
}

impl ConcreteValueType {
    /// Type token used in generated shader code
    pub fn shader_name(&self) -> &'static str {
        match self {
            Self::Boolean => "bool",
            Self::Float => "float",
            Self::Vector2 => "float2",
            Self::Vector3 => "float3",
            Self::Vector4 => "float4",
            Self::Matrix2 => "float2x2",
            Self::Matrix3 => "float3x3",
            Self::Matrix4 => "float4x4",
            Self::Texture2D => "Texture2D",
        }
    }

    /// Component count for scalar and vector types
    pub fn component_count(&self) -> Option<usize> {
        match self {
            Self::Float => Some(1),
            Self::Vector2 => Some(2),
            Self::Vector3 => Some(3),
            Self::Vector4 => Some(4),
            _ => None,
        }
    }

    /// Check if a value of this type can feed a slot of another type
    pub fn can_convert_to(&self, other: &Self) -> bool {
        if self == other {
            return true;
        }

        // Implicit conversions: scalar promotion and vector widening
        match (self, other) {
            (Self::Float, Self::Vector2 | Self::Vector3 | Self::Vector4) => true,
            (Self::Vector2, Self::Vector3 | Self::Vector4) => true,
            (Self::Vector3, Self::Vector4) => true,
            _ => false,
        }
    }

    /// All-zero default for value-typed slots; `None` for resource types
    pub fn zero_value(&self) -> Option<SlotValue> {
        match self {
            Self::Boolean => Some(SlotValue::Boolean(false)),
            Self::Float => Some(SlotValue::Float(0.0)),
            Self::Vector2 => Some(SlotValue::Vector2([0.0; 2])),
            Self::Vector3 => Some(SlotValue::Vector3([0.0; 3])),
            Self::Vector4 => Some(SlotValue::Vector4([0.0; 4])),
            Self::Matrix2 => Some(SlotValue::Matrix2([[0.0; 2]; 2])),
            Self::Matrix3 => Some(SlotValue::Matrix3([[0.0; 3]; 3])),
            Self::Matrix4 => Some(SlotValue::Matrix4([[0.0; 4]; 4])),
            Self::Texture2D => None,
        }
    }
}

/// Value that can be stored in a slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SlotValue {
    /// Boolean
    Boolean(bool),
    /// Float
    Float(f32),
    /// 2D vector
    Vector2([f32; 2]),
    /// 3D vector
    Vector3([f32; 3]),
    /// 4D vector
    Vector4([f32; 4]),
    /// 2x2 matrix, row-major rows
    Matrix2([[f32; 2]; 2]),
    /// 3x3 matrix, row-major rows
    Matrix3([[f32; 3]; 3]),
    /// 4x4 matrix, row-major rows
    Matrix4([[f32; 4]; 4]),
}

impl SlotValue {
    /// Get the value type for this value
    pub fn value_type(&self) -> ConcreteValueType {
        match self {
            Self::Boolean(_) => ConcreteValueType::Boolean,
            Self::Float(_) => ConcreteValueType::Float,
            Self::Vector2(_) => ConcreteValueType::Vector2,
            Self::Vector3(_) => ConcreteValueType::Vector3,
            Self::Vector4(_) => ConcreteValueType::Vector4,
            Self::Matrix2(_) => ConcreteValueType::Matrix2,
            Self::Matrix3(_) => ConcreteValueType::Matrix3,
            Self::Matrix4(_) => ConcreteValueType::Matrix4,
        }
    }

    /// Render this value as a shader source literal
    pub fn shader_literal(&self) -> String {
        match self {
            Self::Boolean(v) => v.to_string(),
            Self::Float(v) => float_literal(*v),
            Self::Vector2(v) => vector_literal("float2", v),
            Self::Vector3(v) => vector_literal("float3", v),
            Self::Vector4(v) => vector_literal("float4", v),
            Self::Matrix2(m) => matrix_literal("float2x2", m.iter().flatten()),
            Self::Matrix3(m) => matrix_literal("float3x3", m.iter().flatten()),
            Self::Matrix4(m) => matrix_literal("float4x4", m.iter().flatten()),
        }
    }
}

fn float_literal(v: f32) -> String {
    // {:?} keeps the decimal point on round values ("1.0", not "1")
    format!("{v:?}")
}

fn vector_literal(type_name: &str, components: &[f32]) -> String {
    let body: Vec<String> = components.iter().map(|c| float_literal(*c)).collect();
    format!("{}({})", type_name, body.join(", "))
}

fn matrix_literal<'a>(type_name: &str, components: impl Iterator<Item = &'a f32>) -> String {
    let body: Vec<String> = components.map(|c| float_literal(*c)).collect();
    format!("{}({})", type_name, body.join(", "))
}

/// Make a string safe to use as a shader identifier
pub fn sanitize_identifier(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            out.push(c);
        } else {
            out.push('_');
        }
    }
    if out.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// A slot on a node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slot {
    /// Unique slot ID
    pub id: SlotId,
    /// Slot name
    pub name: String,
    /// Slot direction
    pub direction: SlotDirection,
    /// Value type
    pub value_type: ConcreteValueType,
    /// Default value, used when an input slot has no incoming edge
    pub default_value: Option<SlotValue>,
    /// Whether this input must be connected or defaulted
    pub required: bool,
    /// Identifier used when this slot is referenced from generated code
    pub shader_output_name: String,
}

impl Slot {
    /// Create a new input slot
    pub fn input(name: impl Into<String>, value_type: ConcreteValueType) -> Self {
        let name = name.into();
        let shader_output_name = sanitize_identifier(&name);
        Self {
            id: SlotId::new(),
            name,
            direction: SlotDirection::Input,
            value_type,
            default_value: None,
            required: false,
            shader_output_name,
        }
    }

    /// Create a new output slot
    pub fn output(name: impl Into<String>, value_type: ConcreteValueType) -> Self {
        let name = name.into();
        let shader_output_name = sanitize_identifier(&name);
        Self {
            id: SlotId::new(),
            name,
            direction: SlotDirection::Output,
            value_type,
            default_value: None,
            required: false,
            shader_output_name,
        }
    }

    /// Set the default value
    pub fn with_default(mut self, value: SlotValue) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Set the zero default for this slot's value type, when one exists
    pub fn with_zero_default(mut self) -> Self {
        self.default_value = self.value_type.zero_value();
        self
    }

    /// Mark as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Check if a connection from this slot into another slot is valid
    pub fn can_connect(&self, other: &Slot) -> bool {
        if self.direction == other.direction {
            return false;
        }
        self.value_type.can_convert_to(&other.value_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shader_literals_keep_decimal_points() {
        assert_eq!(SlotValue::Float(1.0).shader_literal(), "1.0");
        assert_eq!(
            SlotValue::Vector3([0.0, 1.0, 0.5]).shader_literal(),
            "float3(0.0, 1.0, 0.5)"
        );
    }

    #[test]
    fn matrix_literal_flattens_rows() {
        let m = SlotValue::Matrix2([[1.0, 0.0], [0.0, 1.0]]);
        assert_eq!(m.shader_literal(), "float2x2(1.0, 0.0, 0.0, 1.0)");
    }

    #[test]
    fn scalar_promotes_vector_widens() {
        use ConcreteValueType::*;
        assert!(Float.can_convert_to(&Vector4));
        assert!(Vector2.can_convert_to(&Vector3));
        assert!(!Vector4.can_convert_to(&Vector3));
        assert!(!Texture2D.can_convert_to(&Vector4));
        assert!(Matrix4.can_convert_to(&Matrix4));
    }

    #[test]
    fn sanitize_rewrites_invalid_characters() {
        assert_eq!(sanitize_identifier("Base Color"), "Base_Color");
        assert_eq!(sanitize_identifier("2side"), "_2side");
    }

    #[test]
    fn opposite_directions_and_compatible_types_connect() {
        let out = Slot::output("A", ConcreteValueType::Float);
        let inp = Slot::input("B", ConcreteValueType::Vector3);
        assert!(out.can_connect(&inp));
        assert!(!out.can_connect(&Slot::output("C", ConcreteValueType::Float)));
    }
}

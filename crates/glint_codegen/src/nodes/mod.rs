// SPDX-License-Identifier: MIT OR Apache-2.0
//! Standard node behaviors for material sub-graphs.

pub mod ambient;
pub mod constant;
pub mod math;
pub mod output;
pub mod property;
pub mod texture;

pub use ambient::AmbientInputNode;
pub use constant::ConstantNode;
pub use math::{BinaryMathNode, LerpNode, UnaryMathNode};
pub use output::{SubGraphOutputNode, SurfaceMasterNode, SUBGRAPH_OUTPUT_KIND};
pub use property::{PropertyNode, PROPERTY_KIND};
pub use texture::TextureSampleNode;

use crate::behavior::BehaviorRegistry;
use glint_graph::ConcreteValueType;

/// Create the standard behavior registry with all built-in node kinds
pub fn standard_registry() -> BehaviorRegistry {
    let mut registry = BehaviorRegistry::new();

    // Output
    registry.register(Box::new(SubGraphOutputNode));
    registry.register(Box::new(SurfaceMasterNode));

    // Inputs
    registry.register(Box::new(PropertyNode));
    registry.register(Box::new(ConstantNode::float()));
    registry.register(Box::new(ConstantNode::vector2()));
    registry.register(Box::new(ConstantNode::vector3()));
    registry.register(Box::new(ConstantNode::vector4()));
    registry.register(Box::new(AmbientInputNode::uv()));
    registry.register(Box::new(AmbientInputNode::world_position()));
    registry.register(Box::new(AmbientInputNode::world_normal()));
    registry.register(Box::new(AmbientInputNode::view_direction()));
    registry.register(Box::new(AmbientInputNode::time()));

    // Math, per value type
    for value_type in [
        ConcreteValueType::Float,
        ConcreteValueType::Vector2,
        ConcreteValueType::Vector3,
        ConcreteValueType::Vector4,
    ] {
        registry.register(Box::new(BinaryMathNode::add(value_type)));
        registry.register(Box::new(BinaryMathNode::subtract(value_type)));
        registry.register(Box::new(BinaryMathNode::multiply(value_type)));
        registry.register(Box::new(BinaryMathNode::divide(value_type)));
        registry.register(Box::new(BinaryMathNode::minimum(value_type)));
        registry.register(Box::new(BinaryMathNode::maximum(value_type)));
        registry.register(Box::new(LerpNode::new(value_type)));
        registry.register(Box::new(UnaryMathNode::saturate(value_type)));
        registry.register(Box::new(UnaryMathNode::one_minus(value_type)));
    }
    registry.register(Box::new(BinaryMathNode::dot()));

    // Texture
    registry.register(Box::new(TextureSampleNode));

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_registry_covers_the_builtin_kinds() {
        let registry = standard_registry();
        for kind in [
            SUBGRAPH_OUTPUT_KIND,
            PROPERTY_KIND,
            "float_constant",
            "uv",
            "add_float4",
            "lerp_float3",
            "dot_float3",
            "texture_sample",
            "surface_master",
        ] {
            assert!(registry.get(kind).is_some(), "missing kind {kind}");
        }
    }
}

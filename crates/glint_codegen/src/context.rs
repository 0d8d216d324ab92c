// SPDX-License-Identifier: MIT OR Apache-2.0
//! Generation mode, ambient context, and interpolant requirements.

/// Name of the ambient input struct parameter in generated functions
pub const AMBIENT_PARAM: &str = "IN";

/// How generated output is going to be consumed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    /// Live preview: expose every declared property so a GUI can bind to
    /// them, whether or not the graph currently reads them
    Preview,
    /// Compiled asset: expose only properties actually read by active nodes
    Final,
}

impl GenerationMode {
    /// True for [`GenerationMode::Preview`]
    pub fn is_preview(self) -> bool {
        self == Self::Preview
    }
}

/// Ambient configuration threaded through a generation pass
#[derive(Debug, Clone)]
pub struct GraphContext {
    /// Type name of the ambient per-invocation input struct
    pub input_struct_name: String,
    /// Sampler identifier used by texture sampling nodes
    pub sampler_name: String,
}

impl GraphContext {
    /// Create a context with the given input struct type name
    pub fn new(input_struct_name: impl Into<String>) -> Self {
        Self {
            input_struct_name: input_struct_name.into(),
            sampler_name: "default_sampler".to_string(),
        }
    }

    /// Override the sampler identifier
    pub fn with_sampler_name(mut self, name: impl Into<String>) -> Self {
        self.sampler_name = name.into();
        self
    }
}

impl Default for GraphContext {
    fn default() -> Self {
        Self::new("SurfaceInputs")
    }
}

/// Ambient interpolants the active nodes read from the input struct
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphRequirements {
    /// Mesh UV coordinates
    pub needs_uv: bool,
    /// World-space fragment position
    pub needs_world_position: bool,
    /// World-space fragment normal
    pub needs_world_normal: bool,
    /// Direction from fragment to camera
    pub needs_view_direction: bool,
    /// Shader time
    pub needs_time: bool,
}

impl GraphRequirements {
    /// No requirements
    pub fn none() -> Self {
        Self::default()
    }

    /// Combine two requirement sets
    pub fn union(self, other: Self) -> Self {
        Self {
            needs_uv: self.needs_uv || other.needs_uv,
            needs_world_position: self.needs_world_position || other.needs_world_position,
            needs_world_normal: self.needs_world_normal || other.needs_world_normal,
            needs_view_direction: self.needs_view_direction || other.needs_view_direction,
            needs_time: self.needs_time || other.needs_time,
        }
    }

    /// True when any interpolant is required
    pub fn any(self) -> bool {
        self != Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_is_fieldwise_or() {
        let uv = GraphRequirements {
            needs_uv: true,
            ..Default::default()
        };
        let time = GraphRequirements {
            needs_time: true,
            ..Default::default()
        };
        let both = uv.union(time);
        assert!(both.needs_uv && both.needs_time);
        assert!(!both.needs_world_normal);
        assert!(both.any());
        assert!(!GraphRequirements::none().any());
    }
}

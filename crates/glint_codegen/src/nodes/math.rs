// SPDX-License-Identifier: MIT OR Apache-2.0
//! Math nodes built on shared generated subroutines.
//!
//! Each math node registers its subroutine through the function registry
//! under a name derived from the operation and value type, so any number of
//! nodes of the same kind share one emitted function.

use crate::behavior::{GeneratesBodyCode, GeneratesFunction, NodeBehavior};
use crate::builder::ShaderStringBuilder;
use crate::context::{GenerationMode, GraphContext};
use crate::generator::{input_expression, required_input, required_output, CodegenError};
use crate::registry::FunctionRegistry;
use glint_graph::{ConcreteValueType, Node, ShaderGraph, Slot, SlotValue};

/// Two-input math node calling a shared subroutine
pub struct BinaryMathNode {
    kind: String,
    display_name: &'static str,
    function_stem: &'static str,
    expression: &'static str,
    input_type: ConcreteValueType,
    output_type: ConcreteValueType,
}

impl BinaryMathNode {
    fn new(
        function_stem: &'static str,
        display_name: &'static str,
        expression: &'static str,
        input_type: ConcreteValueType,
        output_type: ConcreteValueType,
    ) -> Self {
        Self {
            kind: format!(
                "{}_{}",
                function_stem.to_lowercase(),
                input_type.shader_name()
            ),
            display_name,
            function_stem,
            expression,
            input_type,
            output_type,
        }
    }

    /// A + B
    pub fn add(value_type: ConcreteValueType) -> Self {
        Self::new("Add", "Add", "result = a + b;", value_type, value_type)
    }

    /// A - B
    pub fn subtract(value_type: ConcreteValueType) -> Self {
        Self::new(
            "Subtract",
            "Subtract",
            "result = a - b;",
            value_type,
            value_type,
        )
    }

    /// A * B
    pub fn multiply(value_type: ConcreteValueType) -> Self {
        Self::new(
            "Multiply",
            "Multiply",
            "result = a * b;",
            value_type,
            value_type,
        )
    }

    /// A / B
    pub fn divide(value_type: ConcreteValueType) -> Self {
        Self::new("Divide", "Divide", "result = a / b;", value_type, value_type)
    }

    /// min(A, B)
    pub fn minimum(value_type: ConcreteValueType) -> Self {
        Self::new(
            "Minimum",
            "Minimum",
            "result = min(a, b);",
            value_type,
            value_type,
        )
    }

    /// max(A, B)
    pub fn maximum(value_type: ConcreteValueType) -> Self {
        Self::new(
            "Maximum",
            "Maximum",
            "result = max(a, b);",
            value_type,
            value_type,
        )
    }

    /// dot(A, B) over 3-component vectors
    pub fn dot() -> Self {
        Self::new(
            "Dot",
            "Dot Product",
            "result = dot(a, b);",
            ConcreteValueType::Vector3,
            ConcreteValueType::Float,
        )
    }

    fn function_name(&self) -> String {
        format!(
            "Glint_{}_{}",
            self.function_stem,
            self.input_type.shader_name()
        )
    }
}

impl NodeBehavior for BinaryMathNode {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn display_name(&self) -> &str {
        self.display_name
    }

    fn build_slots(&self) -> (Vec<Slot>, Vec<Slot>) {
        (
            vec![
                Slot::input("A", self.input_type).with_zero_default(),
                Slot::input("B", self.input_type).with_zero_default(),
            ],
            vec![Slot::output("Result", self.output_type)],
        )
    }

    fn as_body_code(&self) -> Option<&dyn GeneratesBodyCode> {
        Some(self)
    }

    fn as_function(&self) -> Option<&dyn GeneratesFunction> {
        Some(self)
    }
}

impl GeneratesFunction for BinaryMathNode {
    fn generate_function(
        &self,
        _node: &Node,
        _graph: &ShaderGraph,
        registry: &mut FunctionRegistry,
        _ctx: &GraphContext,
        _mode: GenerationMode,
    ) -> Result<(), CodegenError> {
        let name = self.function_name();
        let input = self.input_type.shader_name();
        let output = self.output_type.shader_name();
        registry.provide_function(&name, |s| {
            s.append_line(format!("void {name}({input} a, {input} b, out {output} result)"));
            s.block(|s| s.append_line(self.expression));
            Ok(())
        })
    }
}

impl GeneratesBodyCode for BinaryMathNode {
    fn generate_body_code(
        &self,
        node: &Node,
        graph: &ShaderGraph,
        builder: &mut ShaderStringBuilder,
        _ctx: &GraphContext,
        _mode: GenerationMode,
    ) -> Result<(), CodegenError> {
        let a = input_expression(graph, node, required_input(node, "A")?)?;
        let b = input_expression(graph, node, required_input(node, "B")?)?;
        let result = node.variable_name_for_slot(required_output(node, "Result")?);
        builder.append_line(format!("{} {};", self.output_type.shader_name(), result));
        builder.append_line(format!("{}({}, {}, {});", self.function_name(), a, b, result));
        Ok(())
    }
}

/// One-input math node calling a shared subroutine
pub struct UnaryMathNode {
    kind: String,
    display_name: &'static str,
    function_stem: &'static str,
    expression: &'static str,
    value_type: ConcreteValueType,
}

impl UnaryMathNode {
    fn new(
        function_stem: &'static str,
        display_name: &'static str,
        expression: &'static str,
        value_type: ConcreteValueType,
    ) -> Self {
        Self {
            kind: format!(
                "{}_{}",
                function_stem.to_lowercase(),
                value_type.shader_name()
            ),
            display_name,
            function_stem,
            expression,
            value_type,
        }
    }

    /// clamp(v, 0, 1)
    pub fn saturate(value_type: ConcreteValueType) -> Self {
        Self::new("Saturate", "Saturate", "result = saturate(v);", value_type)
    }

    /// 1 - v
    pub fn one_minus(value_type: ConcreteValueType) -> Self {
        Self::new("OneMinus", "One Minus", "result = 1.0 - v;", value_type)
    }

    fn function_name(&self) -> String {
        format!(
            "Glint_{}_{}",
            self.function_stem,
            self.value_type.shader_name()
        )
    }
}

impl NodeBehavior for UnaryMathNode {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn display_name(&self) -> &str {
        self.display_name
    }

    fn build_slots(&self) -> (Vec<Slot>, Vec<Slot>) {
        (
            vec![Slot::input("In", self.value_type).with_zero_default()],
            vec![Slot::output("Result", self.value_type)],
        )
    }

    fn as_body_code(&self) -> Option<&dyn GeneratesBodyCode> {
        Some(self)
    }

    fn as_function(&self) -> Option<&dyn GeneratesFunction> {
        Some(self)
    }
}

impl GeneratesFunction for UnaryMathNode {
    fn generate_function(
        &self,
        _node: &Node,
        _graph: &ShaderGraph,
        registry: &mut FunctionRegistry,
        _ctx: &GraphContext,
        _mode: GenerationMode,
    ) -> Result<(), CodegenError> {
        let name = self.function_name();
        let value = self.value_type.shader_name();
        registry.provide_function(&name, |s| {
            s.append_line(format!("void {name}({value} v, out {value} result)"));
            s.block(|s| s.append_line(self.expression));
            Ok(())
        })
    }
}

impl GeneratesBodyCode for UnaryMathNode {
    fn generate_body_code(
        &self,
        node: &Node,
        graph: &ShaderGraph,
        builder: &mut ShaderStringBuilder,
        _ctx: &GraphContext,
        _mode: GenerationMode,
    ) -> Result<(), CodegenError> {
        let v = input_expression(graph, node, required_input(node, "In")?)?;
        let result = node.variable_name_for_slot(required_output(node, "Result")?);
        builder.append_line(format!("{} {};", self.value_type.shader_name(), result));
        builder.append_line(format!("{}({}, {});", self.function_name(), v, result));
        Ok(())
    }
}

/// Linear interpolation between A and B by a scalar T
pub struct LerpNode {
    kind: String,
    value_type: ConcreteValueType,
}

impl LerpNode {
    /// Lerp over the given value type
    pub fn new(value_type: ConcreteValueType) -> Self {
        Self {
            kind: format!("lerp_{}", value_type.shader_name()),
            value_type,
        }
    }

    fn function_name(&self) -> String {
        format!("Glint_Lerp_{}", self.value_type.shader_name())
    }
}

impl NodeBehavior for LerpNode {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn display_name(&self) -> &str {
        "Lerp"
    }

    fn build_slots(&self) -> (Vec<Slot>, Vec<Slot>) {
        (
            vec![
                Slot::input("A", self.value_type).with_zero_default(),
                Slot::input("B", self.value_type).with_zero_default(),
                Slot::input("T", ConcreteValueType::Float)
                    .with_default(SlotValue::Float(0.5)),
            ],
            vec![Slot::output("Result", self.value_type)],
        )
    }

    fn as_body_code(&self) -> Option<&dyn GeneratesBodyCode> {
        Some(self)
    }

    fn as_function(&self) -> Option<&dyn GeneratesFunction> {
        Some(self)
    }
}

impl GeneratesFunction for LerpNode {
    fn generate_function(
        &self,
        _node: &Node,
        _graph: &ShaderGraph,
        registry: &mut FunctionRegistry,
        _ctx: &GraphContext,
        _mode: GenerationMode,
    ) -> Result<(), CodegenError> {
        let name = self.function_name();
        let value = self.value_type.shader_name();
        registry.provide_function(&name, |s| {
            s.append_line(format!(
                "void {name}({value} a, {value} b, float t, out {value} result)"
            ));
            s.block(|s| s.append_line("result = lerp(a, b, t);"));
            Ok(())
        })
    }
}

impl GeneratesBodyCode for LerpNode {
    fn generate_body_code(
        &self,
        node: &Node,
        graph: &ShaderGraph,
        builder: &mut ShaderStringBuilder,
        _ctx: &GraphContext,
        _mode: GenerationMode,
    ) -> Result<(), CodegenError> {
        let a = input_expression(graph, node, required_input(node, "A")?)?;
        let b = input_expression(graph, node, required_input(node, "B")?)?;
        let t = input_expression(graph, node, required_input(node, "T")?)?;
        let result = node.variable_name_for_slot(required_output(node, "Result")?);
        builder.append_line(format!("{} {};", self.value_type.shader_name(), result));
        builder.append_line(format!(
            "{}({}, {}, {}, {});",
            self.function_name(),
            a,
            b,
            t,
            result
        ));
        Ok(())
    }
}

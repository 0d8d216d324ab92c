// SPDX-License-Identifier: MIT OR Apache-2.0
//! Line-oriented shader source accumulator.

/// Accumulates generated shader source with explicit indent tracking.
///
/// Builders are cheap, single-pass, and deterministic: the same sequence of
/// calls always renders the same text.
#[derive(Debug, Default, Clone)]
pub struct ShaderStringBuilder {
    lines: Vec<Line>,
    indent: usize,
}

#[derive(Debug, Clone)]
struct Line {
    indent: usize,
    text: String,
}

const INDENT: &str = "    ";

impl ShaderStringBuilder {
    /// Create a new empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one line at the current indent
    pub fn append_line(&mut self, line: impl Into<String>) {
        self.lines.push(Line {
            indent: self.indent,
            text: line.into(),
        });
    }

    /// Append an empty line
    pub fn append_newline(&mut self) {
        self.append_line("");
    }

    /// Append every line of another builder, nested at the current indent
    pub fn append_builder(&mut self, other: &ShaderStringBuilder) {
        for line in &other.lines {
            self.lines.push(Line {
                indent: self.indent + line.indent,
                text: line.text.clone(),
            });
        }
    }

    /// Increase the indent level
    pub fn indent(&mut self) {
        self.indent += 1;
    }

    /// Decrease the indent level
    pub fn deindent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    /// Emit a brace-delimited block, running `f` at one deeper indent
    pub fn block<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.append_line("{");
        self.indent();
        let result = f(self);
        self.deindent();
        self.append_line("}");
        result
    }

    /// True when nothing has been appended
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of appended lines
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Render the accumulated source at a base indent level
    pub fn shader_string(&self, base_indent: usize) -> String {
        let mut out = String::new();
        for line in &self.lines {
            if line.text.is_empty() {
                out.push('\n');
                continue;
            }
            for _ in 0..(base_indent + line.indent) {
                out.push_str(INDENT);
            }
            out.push_str(&line.text);
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_nests_indentation() {
        let mut s = ShaderStringBuilder::new();
        s.append_line("void f()");
        s.block(|s| {
            s.append_line("x = 1.0;");
            s.block(|s| s.append_line("y = 2.0;"));
        });
        assert_eq!(
            s.shader_string(0),
            "void f()\n{\n    x = 1.0;\n    {\n        y = 2.0;\n    }\n}\n"
        );
    }

    #[test]
    fn base_indent_shifts_every_line() {
        let mut s = ShaderStringBuilder::new();
        s.append_line("a;");
        assert_eq!(s.shader_string(2), "        a;\n");
    }

    #[test]
    fn append_builder_offsets_nested_lines() {
        let mut inner = ShaderStringBuilder::new();
        inner.append_line("inner;");

        let mut outer = ShaderStringBuilder::new();
        outer.block(|s| s.append_builder(&inner));
        assert_eq!(outer.shader_string(0), "{\n    inner;\n}\n");
    }

    #[test]
    fn empty_lines_carry_no_trailing_spaces() {
        let mut s = ShaderStringBuilder::new();
        s.indent();
        s.append_newline();
        assert_eq!(s.shader_string(0), "\n");
    }
}

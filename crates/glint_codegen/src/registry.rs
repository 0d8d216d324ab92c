// SPDX-License-Identifier: MIT OR Apache-2.0
//! De-duplicating registry of generated subroutine bodies.

use crate::builder::ShaderStringBuilder;
use crate::generator::CodegenError;
use indexmap::IndexMap;

/// Collects unique generated functions keyed by name.
///
/// A registry lives for one generation pass; construct a fresh one per
/// top-level compile request.
#[derive(Debug, Default)]
pub struct FunctionRegistry {
    sources: IndexMap<String, String>,
}

impl FunctionRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a function at most once per unique name.
    ///
    /// The first request for `name` runs `generator` against a fresh builder
    /// and stores the rendered body; later requests for the same name return
    /// without invoking their generator. The name is reserved before the
    /// generator runs, so a generator that (transitively) requests its own
    /// name short-circuits instead of recursing.
    ///
    /// Two call sites requesting the same name with semantically different
    /// generators is a caller error; names must be derived from content or
    /// fully-qualified identity upstream. This registry keeps the first body.
    pub fn provide_function<F>(&mut self, name: &str, generator: F) -> Result<(), CodegenError>
    where
        F: FnOnce(&mut ShaderStringBuilder) -> Result<(), CodegenError>,
    {
        if self.sources.contains_key(name) {
            return Ok(());
        }
        self.sources.insert(name.to_string(), String::new());

        let mut builder = ShaderStringBuilder::new();
        match generator(&mut builder) {
            Ok(()) => {
                self.sources
                    .insert(name.to_string(), builder.shader_string(0));
                Ok(())
            }
            Err(e) => {
                self.sources.shift_remove(name);
                Err(e)
            }
        }
    }

    /// True when a function with this name has been generated
    pub fn contains(&self, name: &str) -> bool {
        self.sources.contains_key(name)
    }

    /// Registered names, in first-registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }

    /// Source of one registered function
    pub fn source(&self, name: &str) -> Option<&str> {
        self.sources.get(name).map(String::as_str)
    }

    /// Number of registered functions
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// True when nothing has been registered
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// All registered sources concatenated in first-registration order,
    /// separated by blank lines
    pub fn concatenated_sources(&self) -> String {
        let mut out = String::new();
        for (i, source) in self.sources.values().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(source);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_request_keeps_first_body() {
        let mut registry = FunctionRegistry::new();
        registry
            .provide_function("Glint_Helper", |s| {
                s.append_line("first");
                Ok(())
            })
            .unwrap();

        let mut second_ran = false;
        registry
            .provide_function("Glint_Helper", |s| {
                second_ran = true;
                s.append_line("second");
                Ok(())
            })
            .unwrap();

        assert!(!second_ran);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.source("Glint_Helper"), Some("first\n"));
    }

    #[test]
    fn generator_runs_exactly_once_across_repeated_requests() {
        let mut registry = FunctionRegistry::new();
        let mut runs = 0;
        for _ in 0..3 {
            registry
                .provide_function("Counted", |s| {
                    runs += 1;
                    s.append_line("body");
                    Ok(())
                })
                .unwrap();
        }
        assert_eq!(runs, 1);
    }

    #[test]
    fn failed_generation_releases_the_name() {
        use glint_graph::NodeId;

        let mut registry = FunctionRegistry::new();
        let err = registry.provide_function("Broken", |_| {
            Err(CodegenError::MissingNode(NodeId::new()))
        });
        assert!(err.is_err());
        assert!(!registry.contains("Broken"));
    }

    #[test]
    fn concatenation_preserves_registration_order() {
        let mut registry = FunctionRegistry::new();
        registry
            .provide_function("B", |s| {
                s.append_line("b");
                Ok(())
            })
            .unwrap();
        registry
            .provide_function("A", |s| {
                s.append_line("a");
                Ok(())
            })
            .unwrap();
        assert_eq!(registry.concatenated_sources(), "b\n\na\n");
    }
}

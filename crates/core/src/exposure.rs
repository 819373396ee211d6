//! Page scripts for plain Markdown documents.
//!
//! Markdown pages have no module scope of their own, so imported components
//! are copied onto a rendering scope that template expressions read bare
//! names from. The host runs the script once per rendered page. Default
//! component overrides are not available in this mode.

use crate::fragment::ImportFragment;

/// Scope object the page script assigns to unless told otherwise.
pub const DEFAULT_RENDER_SCOPE: &str = "globalThis";

/// Imports plus scope assignments for every exposed identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalExposure {
    imports: String,
    names: Vec<String>,
    scope: String,
}

impl GlobalExposure {
    /// Exposes every identifier bound by `imports` on [`DEFAULT_RENDER_SCOPE`].
    pub fn new(imports: &ImportFragment) -> Self {
        Self {
            imports: imports.fragment.text.clone(),
            names: imports.exposed.clone(),
            scope: DEFAULT_RENDER_SCOPE.to_string(),
        }
    }

    /// Assigns onto `scope` instead of the default.
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    /// Names copied onto the scope, in declaration order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// One `scope.Name = Name;` statement per exposed identifier.
    pub fn statements(&self) -> Vec<String> {
        self.names
            .iter()
            .map(|name| format!("{}.{name} = {name};", self.scope))
            .collect()
    }

    /// The complete script, or `None` when nothing is imported.
    pub fn script(&self) -> Option<String> {
        if self.names.is_empty() {
            return None;
        }
        let mut lines = vec![self.imports.clone()];
        lines.extend(self.statements());
        Some(lines.join("\n"))
    }
}

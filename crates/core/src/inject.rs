//! Per-document injection of the generated module code.

use crate::config::AutoImportConfig;
use crate::error::AutoImportError;
use crate::esm::{SyntaxNode, has_top_level_export, parse_fragment, parse_fragments};
use crate::fragment::{
    COMPONENTS_EXPORT, ComponentsFragment, FragmentKind, ImportFragment, build_default_components,
    build_imports,
};
use markdown::mdast::Node;

/// What happened to the default-components export for one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ComponentsOutcome {
    /// No default components are configured.
    #[default]
    NotConfigured,
    /// The export was prepended.
    Injected,
    /// The document already exports `components`; the author's export wins.
    AuthorDefined,
}

/// Report of what was prepended to a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Injection {
    /// Whether the import node was prepended.
    pub imports: bool,
    /// Fate of the default-components export.
    pub components: ComponentsOutcome,
}

impl Injection {
    /// Number of nodes now sitting at the front of the document.
    pub fn nodes_prepended(&self) -> usize {
        usize::from(self.imports) + usize::from(self.components == ComponentsOutcome::Injected)
    }
}

/// Generated fragments and their parsed nodes, built once per build and
/// shared by every document transform.
#[derive(Debug, Clone)]
pub struct TreeInjector {
    imports: ImportFragment,
    components: ComponentsFragment,
    imports_node: Option<SyntaxNode>,
    components_node: Option<SyntaxNode>,
}

impl TreeInjector {
    /// Generates and parses every fragment for `config`.
    pub fn new(config: &AutoImportConfig) -> Result<Self, AutoImportError> {
        let imports = build_imports(config)?;
        let components = build_default_components(config);

        let imports_node = if imports.fragment.is_empty() && components.imports.is_empty() {
            None
        } else {
            Some(parse_fragments(
                FragmentKind::ImportBlock,
                &[&imports.fragment, &components.imports],
            )?)
        };
        let components_node = if components.export.is_empty() {
            None
        } else {
            Some(parse_fragment(&components.export)?)
        };

        Ok(Self {
            imports,
            components,
            imports_node,
            components_node,
        })
    }

    /// Import statements and exposed names for the `imports` option.
    pub fn imports(&self) -> &ImportFragment {
        &self.imports
    }

    /// Fragments for the `defaultComponents` option.
    pub fn components(&self) -> &ComponentsFragment {
        &self.components
    }

    /// Parsed import node, if anything is imported.
    pub fn imports_node(&self) -> Option<&SyntaxNode> {
        self.imports_node.as_ref()
    }

    /// Parsed `components` export node, if overrides are configured.
    pub fn components_node(&self) -> Option<&SyntaxNode> {
        self.components_node.as_ref()
    }

    /// True when no document would ever be modified.
    pub fn is_noop(&self) -> bool {
        self.imports_node.is_none() && self.components_node.is_none()
    }

    /// Prepends the import node and, unless the document already exports
    /// `components`, the default-components node. Existing children keep their
    /// order. Non-root nodes are left untouched.
    pub fn inject(&self, tree: &mut Node) -> Injection {
        let author_defined = self.components_node.is_some()
            && has_top_level_export(tree, COMPONENTS_EXPORT);

        let Node::Root(root) = tree else {
            log::warn!("Auto-import injection expects a root node; document left unchanged");
            return Injection::default();
        };

        let mut injection = Injection::default();
        let mut nodes = Vec::with_capacity(2);
        if let Some(node) = &self.imports_node {
            nodes.push(node.to_node());
            injection.imports = true;
        }
        if let Some(node) = &self.components_node {
            if author_defined {
                log::debug!("Document exports `{COMPONENTS_EXPORT}`; skipping default components");
                injection.components = ComponentsOutcome::AuthorDefined;
            } else {
                nodes.push(node.to_node());
                injection.components = ComponentsOutcome::Injected;
            }
        }

        root.children.splice(0..0, nodes);
        injection
    }
}

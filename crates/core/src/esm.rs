//! ESM parsing for generated fragments and author module code.
//!
//! Generated fragments become `mdxjsEsm` nodes, the same node type markdown-rs
//! produces for `import`/`export` blocks written in an MDX document.

use crate::error::AutoImportError;
use crate::fragment::{FragmentKind, GeneratedFragment};
use markdown::MdxSignal;
use markdown::mdast::{MdxjsEsm, Node};
use oxc_allocator::Allocator;
use oxc_ast::ast::{
    BindingPattern, Declaration, ImportDeclarationSpecifier, ModuleExportName, Statement,
};
use oxc_parser::Parser;
use oxc_span::SourceType;

/// A parsed fragment, ready to be handed to a document tree.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxNode {
    kind: FragmentKind,
    bindings: Vec<String>,
    node: Node,
}

impl SyntaxNode {
    /// Fragment category this node was parsed from.
    pub fn kind(&self) -> FragmentKind {
        self.kind
    }

    /// Local names bound by the node's import declarations.
    pub fn bindings(&self) -> &[String] {
        &self.bindings
    }

    /// Statement text carried by the node.
    pub fn source(&self) -> &str {
        match &self.node {
            Node::MdxjsEsm(esm) => &esm.value,
            _ => "",
        }
    }

    /// A fresh copy of the node for insertion into one document tree.
    pub fn to_node(&self) -> Node {
        self.node.clone()
    }

    /// Gives up the wrapped node.
    pub fn into_node(self) -> Node {
        self.node
    }
}

fn source_type() -> SourceType {
    SourceType::default().with_module(true).with_jsx(true)
}

/// Parses one or more generated fragments into a single module-code node.
///
/// Fragments are produced by this crate, so a parse failure is an internal
/// defect and is reported with the full fragment text.
pub fn parse_fragments(
    kind: FragmentKind,
    fragments: &[&GeneratedFragment],
) -> Result<SyntaxNode, AutoImportError> {
    let text = fragments
        .iter()
        .filter(|fragment| !fragment.is_empty())
        .map(|fragment| fragment.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    let bindings = match import_bindings(&text) {
        Ok(bindings) => bindings,
        Err(message) => {
            return Err(AutoImportError::FragmentParse {
                kind,
                message,
                fragment: text,
            });
        }
    };

    Ok(SyntaxNode {
        kind,
        bindings,
        node: Node::MdxjsEsm(MdxjsEsm {
            value: text,
            position: None,
            stops: Vec::new(),
        }),
    })
}

/// Parses `code` as a module, returning the local names its imports bind or
/// the joined parser diagnostics.
fn import_bindings(code: &str) -> Result<Vec<String>, String> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, code, source_type()).parse();
    if ret.panicked || !ret.errors.is_empty() {
        return Err(ret
            .errors
            .iter()
            .map(|err| err.to_string())
            .collect::<Vec<_>>()
            .join("; "));
    }

    let mut bindings = Vec::new();
    for stmt in &ret.program.body {
        if let Statement::ImportDeclaration(import_decl) = stmt
            && let Some(specifiers) = &import_decl.specifiers
        {
            for specifier in specifiers {
                let local = match specifier {
                    ImportDeclarationSpecifier::ImportSpecifier(s) => &s.local,
                    ImportDeclarationSpecifier::ImportDefaultSpecifier(s) => &s.local,
                    ImportDeclarationSpecifier::ImportNamespaceSpecifier(s) => &s.local,
                };
                bindings.push(local.name.to_string());
            }
        }
    }
    Ok(bindings)
}

/// Parses a single fragment.
pub fn parse_fragment(fragment: &GeneratedFragment) -> Result<SyntaxNode, AutoImportError> {
    parse_fragments(fragment.kind, &[fragment])
}

/// ESM hook for markdown-rs.
///
/// A block that stops parsing at its last byte is reported as incomplete, so
/// markdown-rs keeps reading past blank lines until the statement closes.
pub(crate) fn esm_signal(value: &str) -> MdxSignal {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, value, source_type()).parse();
    let Some(error) = ret.errors.first() else {
        return MdxSignal::Ok;
    };

    let (start, end) = error
        .labels
        .as_ref()
        .and_then(|labels| labels.first())
        .map_or((value.len(), value.len()), |label| {
            (label.offset(), label.offset() + label.len())
        });
    let reason = format!("Could not parse import/exports: {error}");
    let source = Box::new("autoimport".to_string());
    let rule_id = Box::new("esm".to_string());

    if end >= value.trim_end().len() {
        MdxSignal::Eof(reason, source, rule_id)
    } else {
        MdxSignal::Error(reason, start, source, rule_id)
    }
}

/// Returns true when the top-level module code of `root` exports `name`.
///
/// Only direct children of the root are inspected; they are the only place
/// module code can appear in an MDX document. When no single node exports
/// `name`, the nodes are also scanned together, since a tree built without
/// the ESM hook can split one statement over several nodes.
pub fn has_top_level_export(root: &Node, name: &str) -> bool {
    let Some(children) = root.children() else {
        return false;
    };
    let values: Vec<&str> = children
        .iter()
        .filter_map(|child| match child {
            Node::MdxjsEsm(esm) => Some(esm.value.as_str()),
            _ => None,
        })
        .collect();

    values.iter().any(|value| source_exports(value, name))
        || (values.len() > 1 && source_exports(&values.join("\n\n"), name))
}

/// Returns true when the module source `code` exports a binding called `name`.
pub fn source_exports(code: &str, name: &str) -> bool {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, code, source_type()).parse();
    if ret.panicked || !ret.errors.is_empty() {
        log::debug!("Skipping unparsable module code while scanning for `{name}` export");
        return false;
    }

    ret.program.body.iter().any(|stmt| match stmt {
        Statement::ExportNamedDeclaration(export) => {
            let declared = export
                .declaration
                .as_ref()
                .is_some_and(|decl| declaration_binds(decl, name));
            declared
                || export
                    .specifiers
                    .iter()
                    .any(|specifier| export_name(&specifier.exported) == name)
        }
        Statement::ExportAllDeclaration(export) => export
            .exported
            .as_ref()
            .is_some_and(|exported| export_name(exported) == name),
        _ => false,
    })
}

fn declaration_binds(decl: &Declaration, name: &str) -> bool {
    match decl {
        Declaration::VariableDeclaration(var) => var
            .declarations
            .iter()
            .any(|declarator| pattern_binds(&declarator.id, name)),
        Declaration::FunctionDeclaration(func) => {
            func.id.as_ref().is_some_and(|id| id.name.as_str() == name)
        }
        Declaration::ClassDeclaration(class) => {
            class.id.as_ref().is_some_and(|id| id.name.as_str() == name)
        }
        _ => false,
    }
}

fn pattern_binds(pattern: &BindingPattern, name: &str) -> bool {
    match pattern {
        BindingPattern::BindingIdentifier(id) => id.name.as_str() == name,
        BindingPattern::ObjectPattern(obj) => {
            obj.properties
                .iter()
                .any(|prop| pattern_binds(&prop.value, name))
                || obj
                    .rest
                    .as_ref()
                    .is_some_and(|rest| pattern_binds(&rest.argument, name))
        }
        BindingPattern::ArrayPattern(arr) => {
            arr.elements
                .iter()
                .flatten()
                .any(|elem| pattern_binds(elem, name))
                || arr
                    .rest
                    .as_ref()
                    .is_some_and(|rest| pattern_binds(&rest.argument, name))
        }
        _ => false,
    }
}

fn export_name(name: &ModuleExportName) -> String {
    match name {
        ModuleExportName::IdentifierName(id) => id.name.to_string(),
        ModuleExportName::IdentifierReference(id) => id.name.to_string(),
        ModuleExportName::StringLiteral(s) => s.value.to_string(),
    }
}

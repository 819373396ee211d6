//! Generation of import/export statement text from configuration.

use crate::config::{AutoImportConfig, ComponentOverride, ComponentRef, ImportEntry, NamedBinding};
use crate::error::AutoImportError;
use crate::naming::{derive_name, is_identifier, sanitize_identifier};
use crate::specifier::resolve_module_path;
use std::fmt;
use std::path::Path;

/// Binding name of the default-components export.
pub const COMPONENTS_EXPORT: &str = "components";

/// Prefix reserved for default-component locals.
pub const COMPONENT_LOCAL_PREFIX: &str = "__AutoImportComponent";

/// What a generated fragment contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FragmentKind {
    /// Import declarations only.
    ImportBlock,
    /// The `export const components = { ... }` declaration.
    ExportBlock,
}

impl fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImportBlock => f.write_str("import block"),
            Self::ExportBlock => f.write_str("export block"),
        }
    }
}

/// Statement text produced from configuration. Never varies per document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFragment {
    /// Newline-joined statements.
    pub text: String,
    /// Fragment category.
    pub kind: FragmentKind,
}

impl GeneratedFragment {
    fn from_statements(statements: Vec<String>, kind: FragmentKind) -> Self {
        Self {
            text: statements.join("\n"),
            kind,
        }
    }

    /// True when the fragment holds no statements.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Import statements for the `imports` option plus the names they bind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportFragment {
    /// One statement per configured import.
    pub fragment: GeneratedFragment,
    /// Every local binding, in declaration order.
    pub exposed: Vec<String>,
}

/// Fragments for the `defaultComponents` option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentsFragment {
    /// Imports of every override component. Always safe to inject.
    pub imports: GeneratedFragment,
    /// The `components` export. Withheld from documents that define their own.
    pub export: GeneratedFragment,
}

/// Builds the import statement for one entry, returning it with its bindings.
pub fn import_statement(
    entry: &ImportEntry,
    root: &Path,
) -> Result<(String, Vec<String>), AutoImportError> {
    let source = quote(&resolve_module_path(entry.path(), root));
    match entry {
        ImportEntry::Default { path } => {
            let name = derive_name(path)?;
            Ok((format!("import {name} from {source};"), vec![name]))
        }
        ImportEntry::Named { path, bindings } => {
            if bindings.is_empty() {
                return Err(AutoImportError::EmptyNamedImports { path: path.clone() });
            }
            let specifiers = bindings
                .iter()
                .map(named_specifier)
                .collect::<Vec<_>>()
                .join(", ");
            let exposed = bindings.iter().map(|b| b.local.clone()).collect();
            Ok((format!("import {{ {specifiers} }} from {source};"), exposed))
        }
        ImportEntry::Namespace { alias, .. } => Ok((
            format!("import * as {alias} from {source};"),
            vec![alias.clone()],
        )),
    }
}

/// Concatenates the imports of every entry, in declaration order.
pub fn build_imports(config: &AutoImportConfig) -> Result<ImportFragment, AutoImportError> {
    let mut statements = Vec::with_capacity(config.imports.len());
    let mut exposed = Vec::new();
    for entry in &config.imports {
        let (statement, names) = import_statement(entry, &config.root)?;
        statements.push(statement);
        exposed.extend(names);
    }

    Ok(ImportFragment {
        fragment: GeneratedFragment::from_statements(statements, FragmentKind::ImportBlock),
        exposed,
    })
}

/// Builds the override imports and the `components` export.
pub fn build_default_components(config: &AutoImportConfig) -> ComponentsFragment {
    let mut imports = Vec::with_capacity(config.default_components.len());
    let mut properties = Vec::with_capacity(config.default_components.len());

    for (index, entry) in config.default_components.iter().enumerate() {
        let local = component_local(index, entry);
        let source = quote(&resolve_module_path(entry.component.path(), &config.root));
        imports.push(match &entry.component {
            ComponentRef::Default { .. } => format!("import {local} from {source};"),
            ComponentRef::Named { name, .. } => {
                format!("import {{ {} as {local} }} from {source};", export_name(name))
            }
        });
        properties.push(format!("{}: {local}", property_key(&entry.element)));
    }

    let export = if properties.is_empty() {
        Vec::new()
    } else {
        vec![format!(
            "export const {COMPONENTS_EXPORT} = {{ {} }};",
            properties.join(", ")
        )]
    };

    ComponentsFragment {
        imports: GeneratedFragment::from_statements(imports, FragmentKind::ImportBlock),
        export: GeneratedFragment::from_statements(export, FragmentKind::ExportBlock),
    }
}

fn named_specifier(binding: &NamedBinding) -> String {
    if binding.exported == binding.local {
        binding.local.clone()
    } else {
        format!("{} as {}", export_name(&binding.exported), binding.local)
    }
}

fn component_local(index: usize, entry: &ComponentOverride) -> String {
    format!(
        "{COMPONENT_LOCAL_PREFIX}{index}_{}",
        sanitize_identifier(&entry.element)
    )
}

/// Module export names may be arbitrary strings; quote the ones that are not identifiers.
fn export_name(name: &str) -> String {
    if name == "default" || is_identifier(name) {
        name.to_string()
    } else {
        quote(name)
    }
}

fn property_key(element: &str) -> String {
    if is_identifier(element) {
        element.to_string()
    } else {
        quote(element)
    }
}

fn quote(value: &str) -> String {
    serde_json::Value::from(value).to_string()
}

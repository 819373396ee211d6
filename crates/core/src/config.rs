//! Configuration loading and validation.
//!
//! Raw options mirror what users write in their Astro config. They are turned
//! into [`ImportEntry`] and [`ComponentOverride`] values exactly once, so the
//! rest of the crate never has to guess what shape an entry had.

use crate::error::AutoImportError;
use crate::naming::{derive_name, ensure_identifier};
use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};
use std::path::{Path, PathBuf};

/// Options as written by the user (`imports` / `defaultComponents`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoImportOptions {
    /// Ordered list of bare paths and `{ path: specifiers }` mappings.
    #[serde(default)]
    pub imports: Vec<JsonValue>,
    /// Element name to component reference.
    #[serde(default)]
    pub default_components: Map<String, JsonValue>,
}

/// A single named import binding: `exported as local`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedBinding {
    /// Name exported by the module.
    pub exported: String,
    /// Local binding; equal to `exported` when no alias was given.
    pub local: String,
}

/// One import declared by configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportEntry {
    /// Import the module's default export under a name derived from its path.
    Default {
        /// Declared module path.
        path: String,
    },
    /// Import specific named exports, optionally aliased.
    Named {
        /// Declared module path.
        path: String,
        /// Non-empty, ordered list of bindings.
        bindings: Vec<NamedBinding>,
    },
    /// Import the whole module under one identifier.
    Namespace {
        /// Declared module path.
        path: String,
        /// Namespace binding.
        alias: String,
    },
}

impl ImportEntry {
    /// Declared module path.
    pub fn path(&self) -> &str {
        match self {
            Self::Default { path } | Self::Named { path, .. } | Self::Namespace { path, .. } => {
                path
            }
        }
    }
}

/// Which export of a module replaces a markup element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentRef {
    /// The module's default export.
    Default {
        /// Declared module path.
        path: String,
    },
    /// A specific named export.
    Named {
        /// Exported name.
        name: String,
        /// Declared module path.
        path: String,
    },
}

impl ComponentRef {
    /// Declared module path.
    pub fn path(&self) -> &str {
        match self {
            Self::Default { path } | Self::Named { path, .. } => path,
        }
    }
}

/// Replacement component for one markup element (e.g. `p`, `h1`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentOverride {
    /// Element or tag name used as the key of the `components` export.
    pub element: String,
    /// Component that replaces it.
    pub component: ComponentRef,
}

/// Validated configuration, ready for fragment generation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutoImportConfig {
    /// Imports in declaration order.
    pub imports: Vec<ImportEntry>,
    /// Default component overrides in declaration order.
    pub default_components: Vec<ComponentOverride>,
    /// Directory relative module paths are resolved against.
    pub root: PathBuf,
}

impl AutoImportConfig {
    /// Validates raw options, resolving relative paths against `root` later on.
    pub fn from_options(
        options: AutoImportOptions,
        root: impl Into<PathBuf>,
    ) -> Result<Self, AutoImportError> {
        let mut imports = Vec::new();
        for entry in options.imports {
            parse_import_entry(entry, &mut imports)?;
        }

        let default_components = options
            .default_components
            .into_iter()
            .map(|(element, value)| parse_component_override(element, value))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            imports,
            default_components,
            root: root.into(),
        })
    }

    /// Parses JSON options.
    pub fn from_json_str(source: &str, root: impl Into<PathBuf>) -> Result<Self, AutoImportError> {
        let options: AutoImportOptions = serde_json::from_str(source)?;
        Self::from_options(options, root)
    }

    /// Parses YAML options.
    pub fn from_yaml_str(source: &str, root: impl Into<PathBuf>) -> Result<Self, AutoImportError> {
        let yaml_value: serde_yaml::Value = serde_yaml::from_str(source)?;
        let json_value = serde_json::to_value(yaml_value)?;
        if json_value.is_null() {
            return Ok(Self {
                root: root.into(),
                ..Self::default()
            });
        }
        let options: AutoImportOptions = serde_json::from_value(json_value)?;
        Self::from_options(options, root)
    }

    /// Loads a `.json`, `.yaml` or `.yml` file. Relative module paths resolve
    /// against the file's directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AutoImportError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let root = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&source, root),
            Some("yaml" | "yml") => Self::from_yaml_str(&source, root),
            other => Err(AutoImportError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }

    /// True when nothing would ever be injected.
    pub fn is_empty(&self) -> bool {
        self.imports.is_empty() && self.default_components.is_empty()
    }
}

fn parse_import_entry(
    entry: JsonValue,
    out: &mut Vec<ImportEntry>,
) -> Result<(), AutoImportError> {
    match entry {
        JsonValue::String(path) => {
            derive_name(&path)?;
            out.push(ImportEntry::Default { path });
            Ok(())
        }
        JsonValue::Object(map) => {
            for (path, specifiers) in map {
                out.push(parse_specifiers(path, specifiers)?);
            }
            Ok(())
        }
        other => Err(AutoImportError::invalid_entry(
            other.to_string(),
            "expected a module path or a mapping of module paths to imports",
        )),
    }
}

fn parse_specifiers(path: String, specifiers: JsonValue) -> Result<ImportEntry, AutoImportError> {
    match specifiers {
        JsonValue::String(alias) => {
            ensure_identifier(&alias, &path)?;
            Ok(ImportEntry::Namespace { path, alias })
        }
        JsonValue::Array(items) => {
            if items.is_empty() {
                return Err(AutoImportError::EmptyNamedImports { path });
            }
            let bindings = items
                .into_iter()
                .map(|item| parse_binding(&path, item))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(ImportEntry::Named { path, bindings })
        }
        other => Err(AutoImportError::invalid_entry(
            path,
            format!("expected a namespace name or a list of named imports, found {other}"),
        )),
    }
}

fn parse_binding(path: &str, item: JsonValue) -> Result<NamedBinding, AutoImportError> {
    let (exported, local) = match item {
        JsonValue::String(name) => (name.clone(), name),
        JsonValue::Array(pair) => match <[JsonValue; 2]>::try_from(pair) {
            Ok([JsonValue::String(exported), JsonValue::String(local)]) => (exported, local),
            Ok(pair) => {
                return Err(AutoImportError::invalid_entry(
                    path,
                    format!("binding pair must contain two strings, found {}", JsonValue::from(pair.to_vec())),
                ));
            }
            Err(pair) => {
                return Err(AutoImportError::invalid_entry(
                    path,
                    format!("binding pair must have exactly two entries, found {}", pair.len()),
                ));
            }
        },
        other => {
            return Err(AutoImportError::invalid_entry(
                path,
                format!("expected a name or a [from, as] pair, found {other}"),
            ));
        }
    };

    if exported.is_empty() {
        return Err(AutoImportError::invalid_entry(path, "imported name is empty"));
    }
    ensure_identifier(&local, path)?;
    Ok(NamedBinding { exported, local })
}

fn parse_component_override(
    element: String,
    value: JsonValue,
) -> Result<ComponentOverride, AutoImportError> {
    if element.is_empty() {
        return Err(AutoImportError::invalid_override(element, "element name is empty"));
    }

    let component = match value {
        JsonValue::String(path) => ComponentRef::Default { path },
        JsonValue::Object(mut map) => {
            let name = map.remove("name");
            let from = map.remove("from");
            match (name, from) {
                (Some(JsonValue::String(name)), Some(JsonValue::String(path))) if !name.is_empty() => {
                    ComponentRef::Named { name, path }
                }
                _ => {
                    return Err(AutoImportError::invalid_override(
                        element,
                        "expected { name, from } with string values",
                    ));
                }
            }
        }
        other => {
            return Err(AutoImportError::invalid_override(
                element,
                format!("expected a module path or {{ name, from }}, found {other}"),
            ));
        }
    };

    Ok(ComponentOverride { element, component })
}

//! NAPI-exposed data structures.

use napi_derive::napi;
use serde_json::Value as JsonValue;

/// Options passed to the `AutoImport` constructor.
#[napi(object)]
#[derive(Debug, Clone, Default)]
pub struct AutoImportOptions {
    /// Ordered list of module paths and `{ path: specifiers }` mappings.
    pub imports: Option<JsonValue>,
    /// Element name to component path or `{ name, from }`.
    pub default_components: Option<JsonValue>,
    /// Directory relative module paths resolve against. Defaults to the
    /// process working directory.
    pub root: Option<String>,
}

/// MDX support detected from the integration order.
#[napi(string_enum)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MdxSupportKind {
    /// MDX is registered after auto-import.
    Enabled,
    /// MDX is registered before auto-import.
    Misordered,
    /// MDX is not registered.
    Missing,
}

impl From<autoimport_core::MdxSupport> for MdxSupportKind {
    fn from(support: autoimport_core::MdxSupport) -> Self {
        match support {
            autoimport_core::MdxSupport::Enabled => Self::Enabled,
            autoimport_core::MdxSupport::Misordered => Self::Misordered,
            autoimport_core::MdxSupport::Missing => Self::Missing,
        }
    }
}

/// Result of the setup hook.
#[napi(object)]
#[derive(Debug, Clone)]
pub struct SetupResult {
    /// MDX support detected from the integration order.
    pub mdx: MdxSupportKind,
    /// Whether MDX documents will be transformed.
    pub transform_enabled: bool,
    /// Stage the page script must be injected at.
    pub script_stage: String,
    /// Script exposing imports to plain Markdown pages, if any.
    pub page_script: Option<String>,
}

/// What happened to the default-components export for a document.
#[napi(string_enum)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentsStatus {
    /// No default components configured.
    NotConfigured,
    /// The export was injected.
    Injected,
    /// The document exports its own `components`.
    AuthorDefined,
}

impl From<autoimport_core::ComponentsOutcome> for ComponentsStatus {
    fn from(outcome: autoimport_core::ComponentsOutcome) -> Self {
        match outcome {
            autoimport_core::ComponentsOutcome::NotConfigured => Self::NotConfigured,
            autoimport_core::ComponentsOutcome::Injected => Self::Injected,
            autoimport_core::ComponentsOutcome::AuthorDefined => Self::AuthorDefined,
        }
    }
}

/// Document source after injection.
#[napi(object)]
#[derive(Debug, Clone)]
pub struct TransformResult {
    /// Source with generated module code spliced in.
    pub code: String,
    /// Whether the import block was injected.
    pub injected_imports: bool,
    /// Fate of the default-components export.
    pub components: ComponentsStatus,
}

/// Options for compiling an MDX document.
#[napi(object)]
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    /// Overrides the module used for JSX runtime helpers.
    pub jsx_import_source: Option<String>,
    /// Emit JSX instead of function calls.
    pub jsx: Option<bool>,
}

/// Result of compiling an injected MDX document.
#[napi(object)]
#[derive(Debug, Clone)]
pub struct CompileResult {
    /// Compiled JavaScript module text.
    pub code: String,
    /// Raw YAML or TOML frontmatter, if present.
    pub frontmatter: Option<String>,
    /// Whether the import block was injected.
    pub injected_imports: bool,
    /// Fate of the default-components export.
    pub components: ComponentsStatus,
}

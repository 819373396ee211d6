#![deny(missing_docs)]
//! Auto-import core: generates import/export module code from configuration
//! and splices it into Markdown/MDX documents before they are compiled.

/// MDX compilation of injected documents.
pub mod compile;
/// Configuration loading and validation.
pub mod config;
/// Document classification, parsing and source-level injection.
pub mod document;
/// Core error types.
pub mod error;
/// ESM parsing and export scanning.
pub mod esm;
/// Page scripts for plain Markdown documents.
pub mod exposure;
/// Import/export fragment generation.
pub mod fragment;
/// Per-document tree injection.
pub mod inject;
/// Host integration hooks and order validation.
pub mod integration;
/// Identifier derivation and validation.
pub mod naming;
/// Module specifier classification.
pub mod specifier;

pub use compile::{MdxCompileOptions, MdxOutput, compile_mdx};
pub use config::{
    AutoImportConfig, AutoImportOptions, ComponentOverride, ComponentRef, ImportEntry, NamedBinding,
};
pub use document::{DocumentMeta, FileKind, InjectedSource, inject_source, parse_document};
pub use error::{AutoImportError, SourceLocation};
pub use esm::{SyntaxNode, has_top_level_export, parse_fragment, parse_fragments};
pub use exposure::GlobalExposure;
pub use fragment::{
    COMPONENTS_EXPORT, ComponentsFragment, FragmentKind, GeneratedFragment, ImportFragment,
    build_default_components, build_imports,
};
pub use inject::{ComponentsOutcome, Injection, TreeInjector};
pub use integration::{
    AutoImport, DocumentTransform, INTEGRATION_NAME, IntegrationHost, MDX_INTEGRATION_NAME,
    MdxSupport, ScriptStage, SetupReport, check_integration_order,
};
pub use naming::derive_name;
pub use specifier::{ModuleSpecifier, resolve_module_path};

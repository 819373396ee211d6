#![deny(missing_docs)]
//! Node.js bindings for the auto-import engine.

use autoimport_core::AutoImportError;
use napi_derive::napi;
use std::path::Path;

/// Batch processing types and functions.
pub mod batch;
/// The stateful integration and its configuration.
pub mod integration;
/// NAPI-exposed data structures.
pub mod types;
pub use batch::*;
pub use integration::AutoImport;
pub use types::*;

/// Maps core errors onto JavaScript exceptions.
pub(crate) fn to_napi_error(err: AutoImportError) -> napi::Error {
    napi::Error::from_reason(err.to_string())
}

/// Derives the identifier a bare module path is imported under.
#[napi]
pub fn derive_name(path: String) -> napi::Result<String> {
    autoimport_core::derive_name(&path).map_err(to_napi_error)
}

/// Resolves a configured module path into the specifier emitted in imports.
#[napi]
pub fn resolve_module_path(path: String, root: String) -> String {
    autoimport_core::resolve_module_path(&path, Path::new(&root))
}

/// Reports whether MDX documents can receive injected imports given the
/// host's integration names, in registration order.
#[napi]
pub fn check_integration_order(integrations: Vec<String>) -> MdxSupportKind {
    autoimport_core::check_integration_order(&integrations).into()
}

//! Module specifier classification.

use std::path::{Component, Path, PathBuf};

/// A module path as declared in configuration, classified once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleSpecifier {
    /// A `./` or `../` path, resolved against the declaring directory.
    Local(PathBuf),
    /// A package name or any other specifier, left untouched.
    Package(String),
}

impl ModuleSpecifier {
    /// Classifies `path`, resolving relative paths against `root`.
    pub fn classify(path: &str, root: &Path) -> Self {
        if path.starts_with('.') {
            Self::Local(normalize(&root.join(path)))
        } else {
            Self::Package(path.to_string())
        }
    }

    /// The text embedded in generated import statements.
    pub fn as_import_source(&self) -> String {
        match self {
            Self::Local(path) => path.to_string_lossy().into_owned(),
            Self::Package(name) => name.clone(),
        }
    }
}

/// Resolves a declared module path into the form embedded in generated code.
pub fn resolve_module_path(path: &str, root: &Path) -> String {
    ModuleSpecifier::classify(path, root).as_import_source()
}

/// Lexically removes `.` and `..` components without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

//! Identifier derivation and validation.
//!
//! Two distinct paths may derive the same identifier (for example
//! `./a/Card.astro` and `./b/Card.astro`). That is not detected here: the
//! later import shadows the earlier one, and avoiding it is the caller's job.

use crate::error::AutoImportError;
use std::path::Path;

/// Words that cannot be used as a local binding in module code.
const RESERVED_WORDS: &[&str] = &[
    "arguments", "await", "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "enum", "eval", "export", "extends", "false", "finally",
    "for", "function", "if", "implements", "import", "in", "instanceof", "interface", "let",
    "new", "null", "package", "private", "protected", "public", "return", "static", "super",
    "switch", "this", "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
];

/// Strips every character outside `[A-Za-z0-9_]`.
pub fn sanitize_identifier(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

/// Derives a binding name from a module path: the final segment without its
/// extension, sanitized.
///
/// ```
/// use autoimport_core::naming::derive_name;
///
/// assert_eq!(derive_name("./src/components/A.astro").unwrap(), "A");
/// assert_eq!(derive_name("astro-embed").unwrap(), "astroembed");
/// ```
pub fn derive_name(path: &str) -> Result<String, AutoImportError> {
    let stem = Path::new(path)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = sanitize_identifier(&stem);

    if !is_identifier(&name) {
        return Err(AutoImportError::InvalidIdentifier {
            path: path.to_string(),
            identifier: name,
        });
    }
    Ok(name)
}

/// Returns true when `name` can be used as a local binding.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_alphabetic() || first == '_' || first == '$') {
        return false;
    }
    if !chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$') {
        return false;
    }
    !RESERVED_WORDS.contains(&name)
}

/// Checks that `name` is a legal local binding, reporting `path` on failure.
pub(crate) fn ensure_identifier(name: &str, path: &str) -> Result<(), AutoImportError> {
    if is_identifier(name) {
        Ok(())
    } else {
        Err(AutoImportError::InvalidIdentifier {
            path: path.to_string(),
            identifier: name.to_string(),
        })
    }
}

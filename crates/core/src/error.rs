use crate::fragment::FragmentKind;
use thiserror::Error;

/// Source location information for error reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Optional file path
    pub file: Option<String>,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

impl SourceLocation {
    /// Create a new source location
    pub fn new(line: usize, column: usize) -> Self {
        Self {
            file: None,
            line,
            column,
        }
    }

    /// Create a source location with file information
    pub fn with_file(file: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            file: Some(file.into()),
            line,
            column,
        }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "{}:{}:{}", file, self.line, self.column)
        } else {
            write!(f, "{}:{}", self.line, self.column)
        }
    }
}

/// Errors raised while configuring auto-imports or injecting them into documents.
#[derive(Debug, Error)]
pub enum AutoImportError {
    /// A named-import entry listed no bindings.
    #[error("Named import of \"{path}\" must list at least one binding")]
    EmptyNamedImports {
        /// Module path of the offending entry.
        path: String,
    },
    /// An `imports` entry did not match any supported shape.
    #[error("Invalid import entry for \"{path}\": {message}")]
    InvalidImportEntry {
        /// Module path (or the raw entry when no path is available).
        path: String,
        /// What was wrong with the entry.
        message: String,
    },
    /// A local binding is not a legal JavaScript identifier.
    #[error("\"{identifier}\" (from \"{path}\") is not a valid identifier")]
    InvalidIdentifier {
        /// Module path the identifier was declared for or derived from.
        path: String,
        /// The rejected identifier.
        identifier: String,
    },
    /// A `defaultComponents` value did not match any supported shape.
    #[error("Invalid default component override for <{element}>: {message}")]
    InvalidComponentOverride {
        /// Element name used as the override key.
        element: String,
        /// What was wrong with the override.
        message: String,
    },
    /// A generated fragment failed to parse. Always an internal defect.
    #[error("Internal error: generated {kind} failed to parse: {message}\n--- fragment ---\n{fragment}")]
    FragmentParse {
        /// Which fragment failed.
        kind: FragmentKind,
        /// Parser diagnostics, joined.
        message: String,
        /// Full text of the fragment that failed.
        fragment: String,
    },
    /// markdown-rs could not parse a document.
    #[error("Parse error at {location}: {message}")]
    MarkdownParse {
        /// Error message
        message: String,
        /// Source location
        location: SourceLocation,
    },
    /// mdxjs-rs failed to compile an injected document.
    #[error("MDX compilation error: {0}")]
    Compile(String),
    /// Configuration file had an unsupported extension.
    #[error("Unsupported configuration format: {0}")]
    UnsupportedFormat(String),
    /// JSON configuration failed to deserialize.
    #[error("Configuration error: {0}")]
    Json(#[from] serde_json::Error),
    /// YAML configuration failed to deserialize.
    #[error("Configuration error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// IO error while reading configuration.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AutoImportError {
    pub(crate) fn invalid_entry(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidImportEntry {
            path: path.into(),
            message: message.into(),
        }
    }

    pub(crate) fn invalid_override(element: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidComponentOverride {
            element: element.into(),
            message: message.into(),
        }
    }

    /// Whether the error points at user configuration rather than an internal fault.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyNamedImports { .. }
                | Self::InvalidImportEntry { .. }
                | Self::InvalidIdentifier { .. }
                | Self::InvalidComponentOverride { .. }
                | Self::UnsupportedFormat(_)
                | Self::Json(_)
                | Self::Yaml(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_display_includes_file_when_present() {
        assert_eq!(SourceLocation::new(3, 7).to_string(), "3:7");
        assert_eq!(
            SourceLocation::with_file("docs/a.mdx", 3, 7).to_string(),
            "docs/a.mdx:3:7"
        );
    }

    #[test]
    fn fragment_parse_error_carries_fragment_text() {
        let err = AutoImportError::FragmentParse {
            kind: FragmentKind::ImportBlock,
            message: "Unexpected token".into(),
            fragment: "import { from \"x\";".into(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("import { from \"x\";"), "{rendered}");
        assert!(!err.is_config_error());
    }

    #[test]
    fn empty_named_imports_is_config_error() {
        let err = AutoImportError::EmptyNamedImports {
            path: "astro-embed".into(),
        };
        assert!(err.is_config_error());
        assert!(err.to_string().contains("astro-embed"));
    }
}

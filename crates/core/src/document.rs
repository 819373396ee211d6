//! Document classification, parsing and source-level injection.

use crate::error::{AutoImportError, SourceLocation};
use crate::esm::esm_signal;
use crate::inject::{Injection, TreeInjector};
use markdown::mdast::Node;
use markdown::message::{Message, Place};
use markdown::{Constructs, ParseOptions};
use std::path::{Path, PathBuf};

/// Document categories the host compiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// Plain Markdown, rendered without a module scope.
    Markdown,
    /// MDX, compiled to a module with its own imports and exports.
    Mdx,
}

impl FileKind {
    /// Detects the kind from a file extension (case-insensitive).
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "mdx" => Some(Self::Mdx),
            "md" | "markdown" | "mdown" | "mkd" | "mkdn" | "mdwn" => Some(Self::Markdown),
            _ => None,
        }
    }

    /// Detects the kind from a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Whether documents of this kind carry their own module code.
    pub fn is_module_bearing(self) -> bool {
        matches!(self, Self::Mdx)
    }

    fn parse_options(self) -> ParseOptions {
        match self {
            Self::Mdx => ParseOptions {
                constructs: Constructs {
                    frontmatter: true,
                    ..Constructs::mdx()
                },
                mdx_esm_parse: Some(Box::new(esm_signal)),
                ..ParseOptions::mdx()
            },
            Self::Markdown => ParseOptions {
                constructs: Constructs {
                    frontmatter: true,
                    ..Constructs::gfm()
                },
                ..ParseOptions::gfm()
            },
        }
    }
}

/// Minimal file metadata handed to per-document transforms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentMeta {
    /// Path of the document being compiled.
    pub path: PathBuf,
    /// Document category.
    pub kind: FileKind,
}

impl DocumentMeta {
    /// Builds metadata for `path`, or `None` for unsupported extensions.
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let kind = FileKind::from_path(&path)?;
        Some(Self { path, kind })
    }
}

/// Parses a document into an mdast root.
pub fn parse_document(source: &str, kind: FileKind) -> Result<Node, AutoImportError> {
    markdown::to_mdast(source, &kind.parse_options()).map_err(|err| {
        AutoImportError::MarkdownParse {
            message: err.reason.clone(),
            location: message_location(&err),
        }
    })
}

fn message_location(message: &Message) -> SourceLocation {
    match message.place.as_deref() {
        Some(Place::Point(point)) => SourceLocation::new(point.line, point.column),
        Some(Place::Position(position)) => {
            SourceLocation::new(position.start.line, position.start.column)
        }
        None => SourceLocation::new(1, 1),
    }
}

/// A document's source with the generated module code spliced in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectedSource {
    /// Full source: frontmatter, generated code, then author content.
    pub code: String,
    /// Byte offset in `code` where content after the frontmatter begins.
    pub body_start: usize,
    /// Raw YAML or TOML frontmatter, without fences.
    pub frontmatter: Option<String>,
    /// What was injected.
    pub injection: Injection,
}

impl InjectedSource {
    /// `code` without the frontmatter block.
    pub fn body(&self) -> &str {
        &self.code[self.body_start..]
    }
}

/// Parses `source`, runs the injector on the tree and splices the prepended
/// module code into the text after any frontmatter.
///
/// Plain Markdown documents come back unchanged; their imports reach the
/// page through [`crate::exposure::GlobalExposure`] instead.
pub fn inject_source(
    source: &str,
    meta: &DocumentMeta,
    injector: &TreeInjector,
) -> Result<InjectedSource, AutoImportError> {
    let mut tree = parse_document(source, meta.kind)?;
    let (frontmatter, frontmatter_end) = frontmatter_span(&tree);

    if !meta.kind.is_module_bearing() {
        return Ok(InjectedSource {
            code: source.to_string(),
            body_start: frontmatter_end,
            frontmatter,
            injection: Injection::default(),
        });
    }

    let injection = injector.inject(&mut tree);
    let prelude = tree
        .children()
        .map(|children| {
            children
                .iter()
                .take(injection.nodes_prepended())
                .filter_map(|node| match node {
                    Node::MdxjsEsm(esm) => Some(esm.value.as_str()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join("\n\n")
        })
        .unwrap_or_default();

    let (head, tail) = source.split_at(frontmatter_end);
    let separator = if head.is_empty() { "" } else { "\n" };
    let body_start = head.len() + separator.len();

    let code = if prelude.is_empty() {
        source.to_string()
    } else {
        format!("{head}{separator}{prelude}\n\n{tail}")
    };

    Ok(InjectedSource {
        code,
        body_start: if prelude.is_empty() { frontmatter_end } else { body_start },
        frontmatter,
        injection,
    })
}

fn frontmatter_span(tree: &Node) -> (Option<String>, usize) {
    let matter = tree.children().and_then(|children| {
        children.iter().find_map(|child| match child {
            Node::Yaml(yaml) => Some((&yaml.value, &yaml.position)),
            Node::Toml(toml) => Some((&toml.value, &toml.position)),
            _ => None,
        })
    });
    match matter {
        Some((value, position)) => (
            Some(value.clone()),
            position.as_ref().map_or(0, |pos| pos.end.offset),
        ),
        None => (None, 0),
    }
}

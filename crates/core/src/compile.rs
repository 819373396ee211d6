//! MDX compilation of injected documents using mdxjs-rs.

use crate::document::{DocumentMeta, inject_source};
use crate::error::AutoImportError;
use crate::inject::{Injection, TreeInjector};
use mdxjs::{JsxRuntime, MdxParseOptions, Options, compile};

/// Configuration options for MDX compilation.
#[derive(Debug, Clone, Default)]
pub struct MdxCompileOptions {
    /// The JSX import source (e.g., "astro" for Astro projects).
    pub jsx_import_source: Option<String>,
    /// Whether to output JSX instead of function calls.
    pub jsx: bool,
}

/// Output from compiling an injected MDX document.
#[derive(Debug, Clone)]
pub struct MdxOutput {
    /// The compiled JavaScript code.
    pub code: String,
    /// Raw YAML or TOML frontmatter, if the document had any.
    pub frontmatter: Option<String>,
    /// What was injected before compilation.
    pub injection: Injection,
}

/// Injects the configured module code into an MDX document and compiles it.
///
/// Frontmatter is split off before compilation since mdxjs-rs does not
/// process frontmatter blocks.
pub fn compile_mdx(
    source: &str,
    meta: &DocumentMeta,
    injector: &TreeInjector,
    options: Option<MdxCompileOptions>,
) -> Result<MdxOutput, AutoImportError> {
    let opts = options.unwrap_or_default();
    let injected = inject_source(source, meta, injector)?;

    let mdx_options = Options {
        filepath: Some(meta.path.to_string_lossy().into_owned()),
        jsx_runtime: Some(JsxRuntime::Automatic),
        jsx_import_source: opts.jsx_import_source,
        jsx: opts.jsx,
        parse: MdxParseOptions::gfm(),
        ..Default::default()
    };

    let code = compile(injected.body(), &mdx_options)
        .map_err(|e| AutoImportError::Compile(e.to_string()))?;

    Ok(MdxOutput {
        code,
        frontmatter: injected.frontmatter,
        injection: injected.injection,
    })
}

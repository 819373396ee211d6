//! Batch types and parallel document injection.

use crate::types::{ComponentsStatus, TransformResult};
use autoimport_core::{AutoImportError, DocumentMeta, TreeInjector, inject_source};
use napi_derive::napi;
use rayon::prelude::*;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Instant;

/// A single document to transform.
#[napi(object)]
#[derive(Debug, Clone)]
pub struct BatchInput {
    /// Document identifier (typically the file path).
    pub id: String,
    /// Markdown/MDX source content.
    pub source: String,
    /// Optional filepath override for file type detection.
    pub filepath: Option<String>,
}

/// Result for a single document in a batch.
#[napi(object)]
#[derive(Debug, Clone)]
pub struct BatchResult {
    /// Document identifier matching the input.
    pub id: String,
    /// Transform result (present on success).
    pub result: Option<TransformResult>,
    /// Error message (present on failure).
    pub error: Option<String>,
}

/// Statistics for batch processing.
#[napi(object)]
#[derive(Debug, Clone)]
pub struct BatchStats {
    /// Total number of documents processed.
    pub total: u32,
    /// Number of documents transformed successfully.
    pub succeeded: u32,
    /// Number of failed documents.
    pub failed: u32,
    /// Total processing time in milliseconds.
    pub processing_time_ms: f64,
}

/// Options for batch processing.
#[napi(object)]
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Maximum number of threads to use. Defaults to number of CPU cores.
    pub max_threads: Option<u32>,
}

/// Results and statistics for a batch.
#[napi(object)]
#[derive(Debug, Clone)]
pub struct BatchProcessingResult {
    /// Individual results, in input order.
    pub results: Vec<BatchResult>,
    /// Processing statistics.
    pub stats: BatchStats,
}

/// Transforms one document. Unsupported extensions pass through untouched.
pub(crate) fn transform_document(
    injector: &TreeInjector,
    source: String,
    filepath: &str,
    module_injection: bool,
) -> Result<TransformResult, AutoImportError> {
    let meta = match DocumentMeta::from_path(filepath) {
        Some(meta) if module_injection || !meta.kind.is_module_bearing() => meta,
        _ => {
            return Ok(TransformResult {
                code: source,
                injected_imports: false,
                components: ComponentsStatus::NotConfigured,
            });
        }
    };

    let injected = inject_source(&source, &meta, injector)?;
    Ok(TransformResult {
        code: injected.code,
        injected_imports: injected.injection.imports,
        components: injected.injection.components.into(),
    })
}

/// Transforms every input in parallel. Documents share the injector
/// read-only; each one only touches its own tree.
pub(crate) fn transform_batch(
    injector: &TreeInjector,
    module_injection: bool,
    inputs: Vec<BatchInput>,
    options: Option<BatchOptions>,
) -> BatchProcessingResult {
    let start = Instant::now();
    let opts = options.unwrap_or_default();

    // Configure thread pool if max_threads is specified
    let pool = if let Some(max_threads) = opts.max_threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(max_threads as usize)
            .build()
            .ok()
    } else {
        None
    };

    let total = inputs.len() as u32;
    let succeeded = AtomicU32::new(0);
    let failed = AtomicU32::new(0);

    let process_input = |input: BatchInput| -> BatchResult {
        let filepath = input.filepath.clone().unwrap_or_else(|| input.id.clone());
        match transform_document(injector, input.source, &filepath, module_injection) {
            Ok(result) => {
                succeeded.fetch_add(1, Ordering::Relaxed);
                BatchResult {
                    id: input.id,
                    result: Some(result),
                    error: None,
                }
            }
            Err(e) => {
                failed.fetch_add(1, Ordering::Relaxed);
                BatchResult {
                    id: input.id,
                    result: None,
                    error: Some(e.to_string()),
                }
            }
        }
    };

    let results: Vec<BatchResult> = if let Some(pool) = pool {
        pool.install(|| inputs.into_par_iter().map(process_input).collect())
    } else {
        inputs.into_par_iter().map(process_input).collect()
    };

    BatchProcessingResult {
        results,
        stats: BatchStats {
            total,
            succeeded: succeeded.load(Ordering::Relaxed),
            failed: failed.load(Ordering::Relaxed),
            processing_time_ms: start.elapsed().as_secs_f64() * 1000.0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autoimport_core::AutoImportConfig;

    fn injector() -> TreeInjector {
        let config = AutoImportConfig::from_json_str(
            r#"{ "imports": ["./A.astro"], "defaultComponents": { "p": "./P.astro" } }"#,
            "/site",
        )
        .unwrap();
        TreeInjector::new(&config).unwrap()
    }

    fn input(id: &str, source: &str) -> BatchInput {
        BatchInput {
            id: id.to_string(),
            source: source.to_string(),
            filepath: None,
        }
    }

    #[test]
    fn batch_keeps_input_order_and_counts_failures() {
        let injector = injector();
        let inputs = vec![
            input("a.mdx", "# A\n"),
            input("b.md", "# B\n"),
            input("c.mdx", "<Broken>\n"),
            input("d.mdx", "export const components = {};\n\n# D\n"),
        ];

        let result = transform_batch(&injector, true, inputs, Some(BatchOptions { max_threads: Some(2) }));
        assert_eq!(result.stats.total, 4);
        assert_eq!(result.stats.succeeded, 3);
        assert_eq!(result.stats.failed, 1);

        let ids: Vec<_> = result.results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["a.mdx", "b.md", "c.mdx", "d.mdx"]);

        let a = result.results[0].result.as_ref().unwrap();
        assert!(a.injected_imports);
        assert_eq!(a.components, ComponentsStatus::Injected);

        let b = result.results[1].result.as_ref().unwrap();
        assert_eq!(b.code, "# B\n");
        assert!(!b.injected_imports);

        assert!(result.results[2].error.is_some());

        let d = result.results[3].result.as_ref().unwrap();
        assert_eq!(d.components, ComponentsStatus::AuthorDefined);
    }

    #[test]
    fn disabled_module_injection_passes_mdx_through() {
        let injector = injector();
        let result = transform_document(&injector, "# A\n".to_string(), "a.mdx", false).unwrap();
        assert_eq!(result.code, "# A\n");
        assert!(!result.injected_imports);
    }

    #[test]
    fn unknown_extensions_pass_through() {
        let injector = injector();
        let result = transform_document(&injector, "---\n---\n".to_string(), "page.astro", true).unwrap();
        assert_eq!(result.code, "---\n---\n");
    }
}

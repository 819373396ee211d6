//! The stateful integration and its configuration.

use crate::batch::{BatchInput, BatchOptions, BatchProcessingResult, transform_batch, transform_document};
use crate::to_napi_error;
use crate::types::*;
use autoimport_core::{
    AutoImportConfig, DocumentMeta, DocumentTransform, IntegrationHost, MdxCompileOptions,
    ScriptStage, TreeInjector, compile_mdx,
};
use napi::bindgen_prelude::*;
use napi_derive::napi;
use serde_json::{Map, Value as JsonValue};
use std::path::PathBuf;
use std::sync::Arc;

/// Collects what the core setup hook asks the host to do.
#[derive(Debug, Default)]
pub(crate) struct SetupCollector {
    integrations: Vec<String>,
    transform_registered: bool,
    script: Option<(ScriptStage, String)>,
}

impl SetupCollector {
    pub(crate) fn new(integrations: Vec<String>) -> Self {
        Self {
            integrations,
            ..Self::default()
        }
    }
}

impl IntegrationHost for SetupCollector {
    fn integrations(&self) -> Vec<String> {
        self.integrations.clone()
    }

    fn register_document_transform(&mut self, _transform: Arc<dyn DocumentTransform>) {
        // Only the registration is recorded; `AutoImport.transform` runs the
        // shared injector directly.
        self.transform_registered = true;
    }

    fn inject_script(&mut self, stage: ScriptStage, script: String) {
        self.script = Some((stage, script));
    }
}

/// Converts binding options into the core options shape.
pub(crate) fn core_options(options: AutoImportOptions) -> Result<autoimport_core::AutoImportOptions> {
    let mut object = Map::new();
    if let Some(imports) = options.imports {
        object.insert("imports".into(), imports);
    }
    if let Some(components) = options.default_components {
        object.insert("defaultComponents".into(), components);
    }
    serde_json::from_value(JsonValue::Object(object))
        .map_err(|e| Error::from_reason(format!("Invalid auto-import options: {e}")))
}

/// Auto-import integration. Fragments are generated once in the constructor
/// and reused for every document.
#[napi]
pub struct AutoImport {
    inner: autoimport_core::AutoImport,
    /// Injects nothing; used for MDX once setup disables module injection.
    passthrough: TreeInjector,
    module_injection: bool,
}

#[napi]
impl AutoImport {
    /// Validates `options` and builds every fragment. Throws on invalid
    /// entries.
    #[napi(constructor)]
    pub fn new(options: Option<AutoImportOptions>) -> Result<Self> {
        let options = options.unwrap_or_default();
        let root = match options.root.clone() {
            Some(root) => PathBuf::from(root),
            None => std::env::current_dir()
                .map_err(|e| Error::from_reason(format!("Failed to read working directory: {e}")))?,
        };
        let config =
            AutoImportConfig::from_options(core_options(options)?, root).map_err(to_napi_error)?;
        let inner = autoimport_core::AutoImport::new(&config).map_err(to_napi_error)?;
        let passthrough =
            TreeInjector::new(&AutoImportConfig::default()).map_err(to_napi_error)?;
        Ok(Self {
            inner,
            passthrough,
            module_injection: true,
        })
    }

    /// Runs the setup hook against the host's integration names, in
    /// registration order.
    #[napi]
    pub fn setup(&mut self, integrations: Vec<String>) -> SetupResult {
        let mut host = SetupCollector::new(integrations);
        let report = self.inner.setup(&mut host);
        self.module_injection = report.mdx.injects_module_documents();

        let (stage, page_script) = match host.script {
            Some((stage, script)) => (stage, Some(script)),
            None => (ScriptStage::PageSsr, None),
        };
        SetupResult {
            mdx: report.mdx.into(),
            transform_enabled: host.transform_registered,
            script_stage: stage.as_str().to_string(),
            page_script,
        }
    }

    /// Splices the generated module code into one document's source.
    #[napi]
    pub fn transform(&self, source: String, filepath: String) -> Result<TransformResult> {
        transform_document(self.inner.injector(), source, &filepath, self.module_injection)
            .map_err(to_napi_error)
    }

    /// Transforms many documents in parallel.
    #[napi]
    pub fn transform_batch(
        &self,
        inputs: Vec<BatchInput>,
        options: Option<BatchOptions>,
    ) -> BatchProcessingResult {
        transform_batch(self.inner.injector(), self.module_injection, inputs, options)
    }

    /// Injects into an MDX document and compiles it to a JavaScript module.
    /// After a setup that disabled module injection the document is compiled
    /// as written.
    #[napi]
    pub fn compile(
        &self,
        source: String,
        filepath: String,
        options: Option<CompileOptions>,
    ) -> Result<CompileResult> {
        let meta = DocumentMeta::from_path(&filepath)
            .ok_or_else(|| Error::from_reason(format!("Unsupported document type: {filepath}")))?;
        let opts = options.unwrap_or_default();
        let injector = if self.module_injection {
            self.inner.injector().as_ref()
        } else {
            &self.passthrough
        };
        let output = compile_mdx(
            &source,
            &meta,
            injector,
            Some(MdxCompileOptions {
                jsx_import_source: opts.jsx_import_source,
                jsx: opts.jsx.unwrap_or(false),
            }),
        )
        .map_err(to_napi_error)?;

        Ok(CompileResult {
            code: output.code,
            frontmatter: output.frontmatter,
            injected_imports: output.injection.imports,
            components: output.injection.components.into(),
        })
    }

    /// Script exposing imports to plain Markdown pages, if anything is imported.
    #[napi]
    pub fn page_script(&self) -> Option<String> {
        self.inner.exposure().script()
    }

    /// Identifiers bound by the configured imports, in declaration order.
    #[napi]
    pub fn exposed_names(&self) -> Vec<String> {
        self.inner.exposure().names().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autoimport_core::{INTEGRATION_NAME, MDX_INTEGRATION_NAME};
    use serde_json::json;

    fn options() -> AutoImportOptions {
        AutoImportOptions {
            imports: Some(json!(["./components/A.astro", { "astro-embed": ["Tweet"] }])),
            default_components: Some(json!({ "p": "./components/P.astro" })),
            root: Some("/site".into()),
        }
    }

    #[test]
    fn converts_options_for_core() {
        let core = core_options(options()).unwrap();
        assert_eq!(core.imports.len(), 2);
        assert!(core.default_components.contains_key("p"));

        let empty = core_options(AutoImportOptions::default()).unwrap();
        assert!(empty.imports.is_empty());
    }

    #[test]
    fn rejects_malformed_options() {
        let bad = AutoImportOptions {
            imports: Some(json!("./A.astro")),
            ..AutoImportOptions::default()
        };
        assert!(core_options(bad).is_err());
    }

    #[test]
    fn setup_reports_stage_and_script() {
        let mut integration = AutoImport::new(Some(options())).unwrap();
        let result = integration.setup(vec![
            INTEGRATION_NAME.to_string(),
            MDX_INTEGRATION_NAME.to_string(),
        ]);
        assert_eq!(result.mdx, MdxSupportKind::Enabled);
        assert!(result.transform_enabled);
        assert_eq!(result.script_stage, "page-ssr");
        let script = result.page_script.unwrap();
        assert!(script.contains("globalThis.Tweet = Tweet;"));
        assert_eq!(integration.exposed_names(), ["A", "Tweet"]);
    }

    #[test]
    fn misordered_setup_stops_mdx_transforms() {
        let mut integration = AutoImport::new(Some(options())).unwrap();
        let result = integration.setup(vec![
            MDX_INTEGRATION_NAME.to_string(),
            INTEGRATION_NAME.to_string(),
        ]);
        assert_eq!(result.mdx, MdxSupportKind::Misordered);
        assert!(!result.transform_enabled);

        let output = integration
            .transform("# Hi\n".to_string(), "page.mdx".to_string())
            .unwrap();
        assert_eq!(output.code, "# Hi\n");

        let compiled = integration
            .compile("# Hi\n".to_string(), "page.mdx".to_string(), None)
            .unwrap();
        assert!(!compiled.injected_imports);
        assert_eq!(compiled.components, ComponentsStatus::NotConfigured);
        assert!(!compiled.code.contains("/site/components/A.astro"));
    }

    #[test]
    fn compile_injects_after_ordered_setup() {
        let mut integration = AutoImport::new(Some(options())).unwrap();
        integration.setup(vec![
            INTEGRATION_NAME.to_string(),
            MDX_INTEGRATION_NAME.to_string(),
        ]);
        let compiled = integration
            .compile("# Hi\n".to_string(), "page.mdx".to_string(), None)
            .unwrap();
        assert!(compiled.injected_imports);
        assert!(compiled.code.contains("/site/components/A.astro"));
    }

    #[test]
    fn transform_injects_into_mdx() {
        let integration = AutoImport::new(Some(options())).unwrap();
        let output = integration
            .transform("# Hi\n".to_string(), "page.mdx".to_string())
            .unwrap();
        assert!(output.code.starts_with("import A from \"/site/components/A.astro\";"));
        assert!(output.injected_imports);
        assert_eq!(output.components, ComponentsStatus::Injected);
    }
}

//! Setup-time wiring into the host build pipeline.

use crate::config::AutoImportConfig;
use crate::document::DocumentMeta;
use crate::error::AutoImportError;
use crate::exposure::GlobalExposure;
use crate::inject::{Injection, TreeInjector};
use markdown::mdast::Node;
use std::sync::Arc;

/// Name this integration registers under.
pub const INTEGRATION_NAME: &str = "astro-auto-import";

/// Name of the MDX integration that compiles module-bearing documents.
pub const MDX_INTEGRATION_NAME: &str = "@astrojs/mdx";

/// Whether module-bearing documents can receive injected nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MdxSupport {
    /// The MDX integration is registered after this one.
    Enabled,
    /// The MDX integration was registered first and will not see our transform.
    Misordered,
    /// No MDX integration is registered.
    Missing,
}

impl MdxSupport {
    /// True when the document transform should be registered.
    pub fn injects_module_documents(self) -> bool {
        matches!(self, Self::Enabled)
    }
}

/// Checks where the MDX integration sits relative to this one.
///
/// Misordering is not fatal: a warning is logged and only plain Markdown
/// pages keep their imports.
pub fn check_integration_order<S: AsRef<str>>(integrations: &[S]) -> MdxSupport {
    let position = |name: &str| integrations.iter().position(|i| i.as_ref() == name);

    let Some(mdx) = position(MDX_INTEGRATION_NAME) else {
        log::debug!("{MDX_INTEGRATION_NAME} not registered; MDX injection disabled");
        return MdxSupport::Missing;
    };

    match position(INTEGRATION_NAME) {
        Some(own) if mdx < own => {
            log::warn!(
                "{INTEGRATION_NAME} is registered after {MDX_INTEGRATION_NAME}; auto-imports will \
                 not be injected into MDX files. Move {INTEGRATION_NAME} before \
                 {MDX_INTEGRATION_NAME} in your integrations list."
            );
            MdxSupport::Misordered
        }
        _ => MdxSupport::Enabled,
    }
}

/// Render stage a page script runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptStage {
    /// Runs on the server once per rendered page.
    PageSsr,
}

impl ScriptStage {
    /// Stage identifier understood by the host.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PageSsr => "page-ssr",
        }
    }
}

/// Per-document hook run by the Markdown/MDX compiler pipeline.
pub trait DocumentTransform: Send + Sync {
    /// Mutates the document's top-level nodes in place.
    fn transform(&self, root: &mut Node, meta: &DocumentMeta) -> Injection;
}

impl DocumentTransform for TreeInjector {
    fn transform(&self, root: &mut Node, meta: &DocumentMeta) -> Injection {
        if meta.kind.is_module_bearing() {
            self.inject(root)
        } else {
            Injection::default()
        }
    }
}

impl<F> DocumentTransform for F
where
    F: Fn(&mut Node, &DocumentMeta) -> Injection + Send + Sync,
{
    fn transform(&self, root: &mut Node, meta: &DocumentMeta) -> Injection {
        (self)(root, meta)
    }
}

/// Setup-time view of the host build.
pub trait IntegrationHost {
    /// Names of every registered integration, in registration order.
    fn integrations(&self) -> Vec<String>;

    /// Registers a transform for the Markdown/MDX compiler pipeline.
    fn register_document_transform(&mut self, transform: Arc<dyn DocumentTransform>);

    /// Injects a script the host runs at `stage`.
    fn inject_script(&mut self, stage: ScriptStage, script: String);
}

/// Outcome of [`AutoImport::setup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetupReport {
    /// MDX support detected from the integration order.
    pub mdx: MdxSupport,
    /// Whether a document transform was registered.
    pub transform_registered: bool,
    /// Whether a page script was injected.
    pub script_injected: bool,
}

/// The auto-import integration: fragments are generated and parsed once,
/// then shared read-only by every document transform.
#[derive(Debug, Clone)]
pub struct AutoImport {
    injector: Arc<TreeInjector>,
    exposure: GlobalExposure,
}

impl AutoImport {
    /// Builds every fragment for `config`, failing fast on invalid entries.
    pub fn new(config: &AutoImportConfig) -> Result<Self, AutoImportError> {
        let injector = TreeInjector::new(config)?;
        let exposure = GlobalExposure::new(injector.imports());
        Ok(Self {
            injector: Arc::new(injector),
            exposure,
        })
    }

    /// Shared injector for module-bearing documents.
    pub fn injector(&self) -> &Arc<TreeInjector> {
        &self.injector
    }

    /// Page-scope exposure for plain Markdown documents.
    pub fn exposure(&self) -> &GlobalExposure {
        &self.exposure
    }

    /// Runs the setup hook: checks integration order, registers the document
    /// transform when MDX support is available and injects the page script.
    pub fn setup(&self, host: &mut dyn IntegrationHost) -> SetupReport {
        let mdx = check_integration_order(&host.integrations());

        let transform_registered = mdx.injects_module_documents() && !self.injector.is_noop();
        if transform_registered {
            let transform: Arc<dyn DocumentTransform> = self.injector.clone();
            host.register_document_transform(transform);
        }

        let script = self.exposure.script();
        let script_injected = script.is_some();
        if let Some(script) = script {
            host.inject_script(ScriptStage::PageSsr, script);
        }

        SetupReport {
            mdx,
            transform_registered,
            script_injected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inject::ComponentsOutcome;
    use markdown::mdast::Root;

    #[derive(Default)]
    struct RecordingHost {
        integrations: Vec<String>,
        transforms: Vec<Arc<dyn DocumentTransform>>,
        scripts: Vec<(ScriptStage, String)>,
    }

    impl RecordingHost {
        fn with(names: &[&str]) -> Self {
            Self {
                integrations: names.iter().map(|n| n.to_string()).collect(),
                ..Self::default()
            }
        }
    }

    impl IntegrationHost for RecordingHost {
        fn integrations(&self) -> Vec<String> {
            self.integrations.clone()
        }

        fn register_document_transform(&mut self, transform: Arc<dyn DocumentTransform>) {
            self.transforms.push(transform);
        }

        fn inject_script(&mut self, stage: ScriptStage, script: String) {
            self.scripts.push((stage, script));
        }
    }

    fn auto_import(json: &str) -> AutoImport {
        AutoImport::new(&AutoImportConfig::from_json_str(json, "/site").unwrap()).unwrap()
    }

    fn empty_root() -> Node {
        Node::Root(Root {
            children: Vec::new(),
            position: None,
        })
    }

    const CONFIG: &str = r#"{
        "imports": ["./components/A.astro"],
        "defaultComponents": { "p": "./components/P.astro" }
    }"#;

    #[test]
    fn order_detection() {
        assert_eq!(
            check_integration_order(&[INTEGRATION_NAME, MDX_INTEGRATION_NAME]),
            MdxSupport::Enabled
        );
        assert_eq!(
            check_integration_order(&[MDX_INTEGRATION_NAME, "@astrojs/sitemap", INTEGRATION_NAME]),
            MdxSupport::Misordered
        );
        assert_eq!(
            check_integration_order(&[INTEGRATION_NAME, "@astrojs/sitemap"]),
            MdxSupport::Missing
        );
        let none: [&str; 0] = [];
        assert_eq!(check_integration_order(&none), MdxSupport::Missing);
    }

    #[test]
    fn setup_registers_transform_and_script() {
        let integration = auto_import(CONFIG);
        let mut host = RecordingHost::with(&[INTEGRATION_NAME, MDX_INTEGRATION_NAME]);

        let report = integration.setup(&mut host);
        assert_eq!(
            report,
            SetupReport {
                mdx: MdxSupport::Enabled,
                transform_registered: true,
                script_injected: true,
            }
        );
        assert_eq!(host.transforms.len(), 1);
        assert_eq!(host.scripts.len(), 1);
        assert_eq!(host.scripts[0].0.as_str(), "page-ssr");
        assert!(host.scripts[0].1.ends_with("globalThis.A = A;"));

        let mut tree = empty_root();
        let meta = DocumentMeta::from_path("page.mdx").unwrap();
        let injection = host.transforms[0].transform(&mut tree, &meta);
        assert_eq!(injection.components, ComponentsOutcome::Injected);
        assert_eq!(tree.children().unwrap().len(), 2);
    }

    #[test]
    fn registered_transform_skips_plain_markdown() {
        let integration = auto_import(CONFIG);
        let mut host = RecordingHost::with(&[INTEGRATION_NAME, MDX_INTEGRATION_NAME]);
        integration.setup(&mut host);

        let mut tree = empty_root();
        let meta = DocumentMeta::from_path("page.md").unwrap();
        assert_eq!(host.transforms[0].transform(&mut tree, &meta), Injection::default());
        assert!(tree.children().unwrap().is_empty());
    }

    #[test]
    fn misordered_setup_keeps_markdown_script_only() {
        let integration = auto_import(CONFIG);
        let mut host = RecordingHost::with(&[MDX_INTEGRATION_NAME, INTEGRATION_NAME]);

        let report = integration.setup(&mut host);
        assert_eq!(report.mdx, MdxSupport::Misordered);
        assert!(!report.transform_registered);
        assert!(host.transforms.is_empty());
        assert_eq!(host.scripts.len(), 1);
    }

    #[test]
    fn missing_mdx_keeps_markdown_script_only() {
        let integration = auto_import(CONFIG);
        let mut host = RecordingHost::with(&[INTEGRATION_NAME]);

        let report = integration.setup(&mut host);
        assert_eq!(report.mdx, MdxSupport::Missing);
        assert!(host.transforms.is_empty());
        assert!(report.script_injected);
    }

    #[test]
    fn components_only_config_injects_no_script() {
        let integration = auto_import(r#"{ "defaultComponents": { "p": "./P.astro" } }"#);
        let mut host = RecordingHost::with(&[INTEGRATION_NAME, MDX_INTEGRATION_NAME]);

        let report = integration.setup(&mut host);
        assert!(report.transform_registered);
        assert!(!report.script_injected);
        assert!(host.scripts.is_empty());
    }

    #[test]
    fn closures_are_transforms() {
        let transform = |root: &mut Node, _meta: &DocumentMeta| {
            if let Node::Root(root) = root {
                root.children.clear();
            }
            Injection::default()
        };
        let mut tree = empty_root();
        let meta = DocumentMeta::from_path("a.mdx").unwrap();
        assert_eq!(
            DocumentTransform::transform(&transform, &mut tree, &meta),
            Injection::default()
        );
    }
}

use autoimport_core::{
    AutoImport, AutoImportConfig, ComponentsOutcome, DocumentMeta, FileKind, MdxCompileOptions,
    TreeInjector, compile_mdx, inject_source, parse_document,
};
use markdown::mdast::Node;

const DEMO_CONFIG: &str = r#"{
    "imports": [
        "./src/components/A.astro",
        {
            "./src/components/B.astro": [["default", "B"]],
            "astro-embed": ["Tweet"]
        }
    ],
    "defaultComponents": {
        "p": "./src/components/CustomParagraph.astro"
    }
}"#;

fn injector() -> TreeInjector {
    let config = AutoImportConfig::from_json_str(DEMO_CONFIG, "/demo").expect("config");
    TreeInjector::new(&config).expect("injector")
}

fn meta(path: &str) -> DocumentMeta {
    DocumentMeta::from_path(path).expect("supported extension")
}

#[test]
fn scenario_a_default_import() {
    let config =
        AutoImportConfig::from_json_str(r#"{ "imports": ["./components/A.ext"] }"#, "/project")
            .unwrap();
    let integration = AutoImport::new(&config).unwrap();
    let imports = integration.injector().imports();
    assert_eq!(
        imports.fragment.text,
        "import A from \"/project/components/A.ext\";"
    );
    assert_eq!(imports.exposed, vec!["A"]);
}

#[test]
fn scenario_b_aliased_default_import() {
    let config = AutoImportConfig::from_json_str(
        r#"{ "imports": [{ "./components/B.ext": [["default", "B"]] }] }"#,
        "/project",
    )
    .unwrap();
    let integration = AutoImport::new(&config).unwrap();
    let imports = integration.injector().imports();
    assert_eq!(
        imports.fragment.text,
        "import { default as B } from \"/project/components/B.ext\";"
    );
    assert_eq!(imports.exposed, vec!["B"]);
}

#[test]
fn scenario_c_default_components_respect_author_export() {
    let injector = injector();

    let plain = inject_source("Some *prose*.\n", &meta("plain.mdx"), &injector).unwrap();
    assert_eq!(plain.injection.components, ComponentsOutcome::Injected);
    assert!(plain.code.contains(
        "export const components = { p: __AutoImportComponent0_p };"
    ));

    let authored = inject_source(
        "import Mine from \"./Mine.astro\";\nexport const components = { p: Mine };\n\nSome *prose*.\n",
        &meta("authored.mdx"),
        &injector,
    )
    .unwrap();
    assert_eq!(authored.injection.components, ComponentsOutcome::AuthorDefined);
    assert!(!authored.code.contains("__AutoImportComponent0_p }"));
    assert!(authored.code.contains("import __AutoImportComponent0_p from"));
}

#[test]
fn injected_nodes_lead_the_document_in_order() {
    let injector = injector();
    let source = "import Local from \"./Local.astro\";\n\n# Heading\n\n<A />\n";
    let mut tree = parse_document(source, FileKind::Mdx).unwrap();
    let original = tree.children().unwrap().clone();

    let injection = injector.inject(&mut tree);
    assert_eq!(injection.nodes_prepended(), 2);

    let children = tree.children().unwrap();
    match (&children[0], &children[1]) {
        (Node::MdxjsEsm(imports), Node::MdxjsEsm(export)) => {
            assert!(imports.value.starts_with("import A from \"/demo/src/components/A.astro\";"));
            assert!(imports.value.contains("import { default as B } from"));
            assert!(imports.value.contains("import { Tweet } from \"astro-embed\";"));
            assert!(export.value.starts_with("export const components"));
        }
        other => panic!("unexpected leading nodes: {other:?}"),
    }
    assert_eq!(&children[2..], &original[..]);
}

#[test]
fn injected_source_reparses_cleanly() {
    let injector = injector();
    let source = "---\ntitle: Demo\n---\n\n# Demo\n\n<A />\n<B />\n";
    let injected = inject_source(source, &meta("index.mdx"), &injector).unwrap();
    let tree = parse_document(&injected.code, FileKind::Mdx).unwrap();
    let esm_count = tree
        .children()
        .unwrap()
        .iter()
        .filter(|node| matches!(node, Node::MdxjsEsm(_)))
        .count();
    assert_eq!(esm_count, 2);
}

#[test]
fn compiles_injected_mdx() {
    let injector = injector();
    let source = "---\ntitle: Demo\n---\n\n# Demo\n\n<A />\n\n<Tweet id=\"1\" />\n";
    let output = compile_mdx(
        source,
        &meta("src/pages/mdx.mdx"),
        &injector,
        Some(MdxCompileOptions {
            jsx_import_source: Some("astro".to_string()),
            ..Default::default()
        }),
    )
    .expect("injected document should compile");

    assert_eq!(output.frontmatter.as_deref(), Some("title: Demo"));
    assert!(output.code.contains("/demo/src/components/A.astro"));
    assert!(output.code.contains("astro-embed"));
    assert!(output.code.contains("export const components"));
    assert_eq!(output.injection.components, ComponentsOutcome::Injected);
}

#[test]
fn compile_reports_author_syntax_errors() {
    let injector = injector();
    let err = compile_mdx("<A>\n", &meta("broken.mdx"), &injector, None).unwrap_err();
    assert!(!err.is_config_error());
    assert!(err.to_string().contains("closing tag"), "{err}");
}

#[test]
fn author_export_spanning_blank_lines_is_respected() {
    let injector = injector();
    let source = "import Mine from \"./Mine.astro\";\n\nexport const components = {\n  p: Mine,\n\n  h1: Mine,\n};\n\n# Title\n";

    let mut tree = parse_document(source, FileKind::Mdx).unwrap();
    let injection = injector.inject(&mut tree);
    assert_eq!(injection.components, ComponentsOutcome::AuthorDefined);

    let exports = tree
        .children()
        .unwrap()
        .iter()
        .filter(|child| matches!(child, Node::MdxjsEsm(esm) if esm.value.contains("export const components")))
        .count();
    assert_eq!(exports, 1);

    let output = compile_mdx(source, &meta("page.mdx"), &injector, None).unwrap();
    assert_eq!(output.injection.components, ComponentsOutcome::AuthorDefined);
    assert_eq!(output.code.matches("const components =").count(), 1);
}

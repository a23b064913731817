use std::fs;

use reflgraph_core::{ModelSpec, ObjectGraphBuilder, map_document};
use reflgraph_dot::{GraphvizRenderer, OutputFormat, Renderer, SourceRenderer, to_dot};
use reflgraph_error::ErrorKind;
use tempfile::tempdir;

const MODEL: &str = r#"
    [[modules]]
    name = "shapes"
    functions = ["area"]
    values = [{ name = "unit", kind = "number" }]

    [[modules.classes]]
    name = "Shape"
    functions = ["draw"]

    [[modules.classes]]
    name = "Square"
    bases = ["Shape"]

    [[modules.instances]]
    name = "square"
    class = "Square"
"#;

fn object_map() -> reflgraph_core::GraphDocument {
    let model = ModelSpec::from_toml_str(MODEL).unwrap().build().unwrap();
    let root = model.lookup("shapes").unwrap();
    ObjectGraphBuilder::new(&model, root).build()
}

#[test]
fn object_map_source_addresses_rows_by_port() {
    let dot = to_dot(&object_map());
    assert!(dot.starts_with("digraph \"structs\" {\n"), "{dot}");
    assert!(dot.contains("\"root.module\" [label=<<table border=\"0\""), "{dot}");
    assert!(dot.contains("<td port=\"Square\" align=\"left\">Square</td>"), "{dot}");
    assert!(dot.contains("\"classes\":\"Shape\" -> \"Shape.functions\" [color=\"#bebada\"];"), "{dot}");
    assert!(
        dot.contains("\"classes\":\"Square\" -> \"instances\":\"square\" [color=\"SandyBrown\", style=\"dashed\"];"),
        "{dot}"
    );
    assert!(dot.contains("\"root.module\" -> \"numbers\" [color=\"Gainsboro\"];"), "{dot}");
}

#[test]
fn source_renderer_writes_only_the_source() {
    let dir = tempdir().expect("tempdir");
    let output = dir.path().join("nested").join("map.gv");

    let files = SourceRenderer
        .render(&object_map(), &output, OutputFormat::Png)
        .expect("render source");
    assert_eq!(files, vec![output.clone()]);
    let written = fs::read_to_string(&output).expect("read source");
    assert_eq!(written, to_dot(&object_map()));
}

#[test]
fn graphviz_renderer_stops_after_source_for_gv() {
    let dir = tempdir().expect("tempdir");
    let output = dir.path().join("map.gv");
    let model = ModelSpec::from_toml_str(MODEL).unwrap().build().unwrap();
    let square = model.lookup("shapes.Square").unwrap();
    let doc = map_document(&model, &square, true).unwrap();

    // never spawned for source formats
    let renderer = GraphvizRenderer::new(dir.path().join("no-such-dot"));
    let files = renderer.render(&doc, &output, OutputFormat::Gv).expect("render gv");
    assert_eq!(files, vec![output.clone()]);
    let written = fs::read_to_string(&output).unwrap();
    assert!(written.starts_with("// Class Square inherit relationship map\n"));
}

#[test]
fn missing_graphviz_is_a_render_error() {
    let dir = tempdir().expect("tempdir");
    let output = dir.path().join("map.gv");

    let renderer = GraphvizRenderer::new(dir.path().join("no-such-dot"));
    let err = renderer
        .render(&object_map(), &output, OutputFormat::Svg)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RenderFailed);
    assert!(output.exists(), "source is written before layout runs");
}

mod common;

use pretty_assertions::assert_eq;
use reflgraph_core::{
    Category, ColorAssigner, EdgeAttrs, Endpoint, GraphDocument, Label, LineStyle, ModelSpec,
    ObjectGraphBuilder, ObjectGraphOptions, ObjectModel, Policy, RankDir, Shape, TableLabel,
    stack_document, subclasses_document,
};

use common::{SAMPLE_MODEL, load, lookup};

fn table<'d>(doc: &'d GraphDocument, id: &str) -> &'d TableLabel {
    match doc.node(id).map(|node| &node.label) {
        Some(Some(Label::Table(label))) => label,
        other => panic!("'{id}' is not a table node: {other:?}"),
    }
}

fn rows<'a>(doc: &'a GraphDocument, id: &str) -> Vec<&'a str> {
    table(doc, id).rows.iter().map(String::as_str).collect()
}

fn sample_map() -> GraphDocument {
    let model = load(SAMPLE_MODEL);
    let sample = lookup(&model, "sample");
    ObjectGraphBuilder::new(&model, sample).build()
}

#[test]
fn sample_module_blocks() {
    let doc = sample_map();

    assert_eq!(doc.name(), "structs");
    assert_eq!(doc.node_shape, Some(Shape::Record));
    assert!(doc.layout.compound);

    let root = table(&doc, "root.module");
    assert_eq!(root.title, "module");
    assert_eq!(root.rows, vec!["sample".to_string()]);

    assert_eq!(rows(&doc, "classes"), vec!["A", "B"]);
    assert_eq!(rows(&doc, "instances"), vec!["obj_a", "obj_b"]);
    assert_eq!(rows(&doc, "functions"), vec!["sample_func", "test"]);
    assert_eq!(rows(&doc, "strings"), vec!["sample_str"]);
    assert_eq!(rows(&doc, "numbers"), vec!["sample"]);
    assert_eq!(rows(&doc, "tuples"), vec!["sample_tuple"]);
    assert_eq!(rows(&doc, "lists"), vec!["sample_list"]);
    assert_eq!(rows(&doc, "dicts"), vec!["sample_dict"]);
    for absent in ["methods", "abstracts", "generators", "tracebacks", "others"] {
        assert!(doc.node(absent).is_none(), "unexpected block {absent}");
    }
}

#[test]
fn sample_module_nested_blocks() {
    let doc = sample_map();

    assert_eq!(rows(&doc, "A.functions"), vec!["__init__"]);
    assert_eq!(rows(&doc, "A.descriptors"), vec!["get_name"]);
    assert_eq!(rows(&doc, "B.functions"), vec!["__init__", "cls_func", "get_name"]);
    assert!(doc.node("B.descriptors").is_none());
    assert_eq!(rows(&doc, "obj_a.functions"), vec!["dynamicfunc"]);
    assert!(doc.node("obj_a.methods").is_none());

    let nested = doc.node("A.descriptors").unwrap();
    assert_eq!(nested.category, Category::Descriptor);
    assert_eq!(nested.parent.as_deref(), Some("classes"));
    assert_eq!(table(&doc, "A.descriptors").title, "A.descriptors");
    assert_eq!(table(&doc, "A.descriptors").color, "YellowGreen");

    assert!(doc.has_edge(&Endpoint::port("classes", "A"), &Endpoint::node("A.functions")));
    assert!(doc.has_edge(
        &Endpoint::port("instances", "obj_a"),
        &Endpoint::node("obj_a.functions")
    ));
}

#[test]
fn sample_module_edges() {
    let doc = sample_map();

    let from_root: Vec<String> = doc
        .edges()
        .iter()
        .filter(|edge| edge.from == Endpoint::node("root.module"))
        .map(|edge| edge.to.to_string())
        .collect();
    assert_eq!(
        from_root,
        vec!["classes", "instances", "functions", "strings", "numbers", "tuples", "lists", "dicts"]
    );

    let dashed = EdgeAttrs::colored("SandyBrown").with_style(LineStyle::Dashed);
    let relations: Vec<(String, String)> = doc
        .edges()
        .iter()
        .filter(|edge| edge.attrs == dashed)
        .map(|edge| (edge.from.to_string(), edge.to.to_string()))
        .collect();
    assert_eq!(
        relations,
        vec![
            ("classes:A".to_string(), "instances:obj_a".to_string()),
            ("classes:A".to_string(), "instances:obj_b".to_string()),
            ("classes:B".to_string(), "instances:obj_b".to_string()),
        ]
    );

    assert_eq!(doc.edges().len(), 4 + 8 + 3);
    assert!(doc.dangling_endpoints().is_empty());
}

#[test]
fn object_without_members_has_only_the_root_block() {
    common::init_tracing();
    let mut model = ObjectModel::new();
    let bare = model.add_module("bare");

    let doc = ObjectGraphBuilder::new(&model, bare).build();
    assert_eq!(doc.nodes().len(), 1);
    assert!(doc.edges().is_empty());
    assert_eq!(doc.nodes()[0].category, Category::Root);
}

#[test]
fn instance_root_is_named_after_its_type() {
    let model = load(SAMPLE_MODEL);
    let obj_b = lookup(&model, "sample.obj_b");

    let options = ObjectGraphOptions {
        rankdir: RankDir::LeftRight,
        ..Default::default()
    };
    let doc = ObjectGraphBuilder::new(&model, obj_b).with_options(options).build();
    assert_eq!(table(&doc, "root.sample.B").title, "sample.B");
    assert_eq!(rows(&doc, "root.sample.B"), vec!["sample.sample.B.instance"]);
    assert_eq!(rows(&doc, "numbers"), vec!["A_var"]);
    assert_eq!(rows(&doc, "methods"), vec!["__init__", "cls_func", "get_name"]);
    assert_eq!(doc.layout.rankdir, Some(RankDir::LeftRight));
}

#[test]
fn recolor_shares_one_assigner_across_documents() {
    let model = load(SAMPLE_MODEL);
    let sample = lookup(&model, "sample");
    let options = ObjectGraphOptions {
        recolor: Some(Policy::Order),
        ..Default::default()
    };
    let builder = ObjectGraphBuilder::new(&model, sample).with_options(options);

    let mut assigner = ColorAssigner::new();
    let first = builder.build_with(&mut assigner);
    let second = builder.build_with(&mut assigner);
    assert_ne!(table(&first, "classes").color, table(&second, "classes").color);

    let fresh = builder.build_with(&mut ColorAssigner::new());
    assert_eq!(table(&first, "classes").color, table(&fresh, "classes").color);
}

#[test]
fn sample_registry_and_stack() {
    let model = load(SAMPLE_MODEL);
    let a = lookup(&model, "sample.A");

    let doc = subclasses_document(&model, &a, &mut ColorAssigner::new()).unwrap();
    assert!(doc.has_edge(&Endpoint::node("B"), &Endpoint::node("A")));

    let spec = ModelSpec::from_toml_str(SAMPLE_MODEL).unwrap();
    let stack = stack_document(&spec.stack, "stack", RankDir::TopBottom).unwrap();
    let Some(Label::Grid(grid)) = &stack.node("stack").unwrap().label else {
        panic!("stack node has no grid label");
    };
    assert_eq!(grid.rows.len(), 2);
    assert_eq!(grid.rows[1][1], "objmap.py");
    assert_eq!(grid.rows[1][3], "module");
}

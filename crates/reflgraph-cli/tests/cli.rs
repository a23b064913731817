use std::fs;
use std::path::PathBuf;

use pretty_assertions::assert_eq;
use reflgraph::{Config, DrawCommand, EdgeKind, ReflgraphOptions, RenderArgs, run_main};
use reflgraph_core::{Policy, RankDir};
use reflgraph_dot::OutputFormat;
use reflgraph_error::ErrorKind;
use tempfile::tempdir;

fn fixture_model() -> &'static str {
    r#"
        [[modules]]
        name = "h"
        functions = ["helper"]

        [[modules.classes]]
        name = "A"

        [[modules.classes]]
        name = "B"
        bases = ["A"]

        [[modules.classes]]
        name = "C"
        bases = ["B"]

        [[modules.classes]]
        name = "D"
        bases = ["A", "B"]
        mro = ["B", "A", "object"]

        [[modules]]
        name = "empty"

        [[stack]]
        file = "./h.py"
        lineno = 10
        function = "<module>"
    "#
}

fn write_fixture() -> (tempfile::TempDir, PathBuf) {
    let dir = tempdir().expect("tempdir");
    let model_path = dir.path().join("model.toml");
    fs::write(&model_path, fixture_model()).expect("write fixture");
    (dir, model_path)
}

fn source_config(dir: &tempfile::TempDir) -> Config {
    Config {
        format: "gv".to_string(),
        output_dir: dir.path().to_path_buf(),
        ..Config::default()
    }
}

fn options(model: &PathBuf, config: &Config, command: DrawCommand) -> ReflgraphOptions {
    ReflgraphOptions::resolve(model, command, RenderArgs::new(), config).expect("resolve options")
}

#[test]
fn map_writes_source_to_default_output() {
    let (dir, model) = write_fixture();
    let opts = options(
        &model,
        &source_config(&dir),
        DrawCommand::Map {
            class: "h.D".to_string(),
            with_mro: true,
        },
    );

    let listing = run_main(&opts).expect("map run").expect("map output");
    let expected = dir.path().join("map.gv");
    assert_eq!(listing, expected.display().to_string());

    let dot = fs::read_to_string(&expected).expect("read map source");
    assert!(dot.contains("Class D inherit relationship map"), "{dot}");
    assert!(dot.contains("\"D\" -> \"A\""), "{dot}");
    assert!(dot.contains("\"B\" -> \"A\""), "{dot}");
}

#[test]
fn print_dot_skips_rendering() {
    let (dir, model) = write_fixture();
    let args = RenderArgs::new().with_print_dot(true);
    let opts = ReflgraphOptions::resolve(
        &model,
        DrawCommand::Mro {
            class: "h.C".to_string(),
        },
        args,
        &source_config(&dir),
    )
    .unwrap();

    let dot = run_main(&opts).unwrap().expect("dot text");
    assert!(dot.starts_with("// Class C MRO map"), "{dot}");
    assert!(dot.contains("\"C\" -> \"B\""), "{dot}");
    assert!(!dir.path().join("mro.gv").exists());
}

#[test]
fn empty_object_map_is_not_rendered() {
    let (dir, model) = write_fixture();
    let opts = options(
        &model,
        &source_config(&dir),
        DrawCommand::Object {
            path: "empty".to_string(),
        },
    );

    assert_eq!(run_main(&opts).unwrap(), None);
    assert!(!dir.path().join("obj.gv").exists());
}

#[test]
fn object_map_of_module_is_rendered() {
    let (dir, model) = write_fixture();
    let output = dir.path().join("nested").join("h.gv");
    let args = RenderArgs::new()
        .with_output(output.display().to_string())
        .with_format(OutputFormat::Dot)
        .with_recolor(Policy::Rotate);
    let opts = ReflgraphOptions::resolve(
        &model,
        DrawCommand::Object {
            path: "h".to_string(),
        },
        args,
        &Config::default(),
    )
    .unwrap();

    run_main(&opts).unwrap().expect("object map listing");
    let dot = fs::read_to_string(&output).expect("read object map");
    assert!(dot.contains("\"root.module\""), "{dot}");
    assert!(dot.contains("<td port=\"helper\""), "{dot}");
}

#[test]
fn leaf_class_has_no_subclass_tree() {
    let (dir, model) = write_fixture();
    let opts = options(
        &model,
        &source_config(&dir),
        DrawCommand::Subclasses {
            class: "h.C".to_string(),
        },
    );
    assert_eq!(run_main(&opts).unwrap(), None);

    let opts = options(
        &model,
        &source_config(&dir),
        DrawCommand::Subclasses {
            class: "h.A".to_string(),
        },
    );
    run_main(&opts).unwrap().expect("subclass tree");
    let dot = fs::read_to_string(dir.path().join("subclasses.gv")).unwrap();
    assert!(dot.contains("Class A subclasses tree"), "{dot}");
}

#[test]
fn stack_table_is_drawn() {
    let (dir, model) = write_fixture();
    let opts = options(
        &model,
        &source_config(&dir),
        DrawCommand::Stack {
            name: "stack".to_string(),
        },
    );
    run_main(&opts).unwrap().expect("stack listing");
    let dot = fs::read_to_string(dir.path().join("stack.gv")).unwrap();
    assert!(dot.contains(">module<"), "{dot}");
    assert!(dot.contains(">h.py<"), "{dot}");
}

#[test]
fn edges_are_listed_as_text_and_json() {
    let (dir, model) = write_fixture();
    let config = source_config(&dir);

    let inherit = options(
        &model,
        &config,
        DrawCommand::Edges {
            class: "h.D".to_string(),
            kind: EdgeKind::Inherit,
            json: false,
        },
    );
    assert_eq!(
        run_main(&inherit).unwrap().unwrap(),
        "D -> A\nA -> object\nD -> B\nB -> A"
    );

    let mro = options(
        &model,
        &config,
        DrawCommand::Edges {
            class: "h.D".to_string(),
            kind: EdgeKind::Mro,
            json: true,
        },
    );
    let text = run_main(&mro).unwrap().unwrap();
    let pairs: Vec<(String, String)> = serde_json::from_str(&text).expect("edge json");
    assert_eq!(
        pairs,
        vec![
            ("D".to_string(), "B".to_string()),
            ("B".to_string(), "A".to_string()),
            ("A".to_string(), "object".to_string()),
        ]
    );
}

#[test]
fn lookup_failures_are_reported() {
    let (dir, model) = write_fixture();
    let config = source_config(&dir);

    let missing = options(
        &model,
        &config,
        DrawCommand::Map {
            class: "h.Missing".to_string(),
            with_mro: false,
        },
    );
    assert_eq!(run_main(&missing).unwrap_err().kind(), ErrorKind::SymbolNotFound);

    let no_model = options(
        &dir.path().join("absent.toml"),
        &config,
        DrawCommand::Stack {
            name: "stack".to_string(),
        },
    );
    assert_eq!(run_main(&no_model).unwrap_err().kind(), ErrorKind::FileNotFound);
}

#[test]
fn non_class_symbol_draws_nothing() {
    let (dir, model) = write_fixture();
    let config = source_config(&dir);

    for command in [
        DrawCommand::Map {
            class: "h.helper".to_string(),
            with_mro: true,
        },
        DrawCommand::Mro {
            class: "h.helper".to_string(),
        },
        DrawCommand::Subclasses {
            class: "h.helper".to_string(),
        },
        DrawCommand::Edges {
            class: "h.helper".to_string(),
            kind: EdgeKind::Inherit,
            json: true,
        },
    ] {
        let opts = options(&model, &config, command);
        assert_eq!(run_main(&opts).unwrap(), None, "{:?}", opts.command);
    }
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn flags_override_config() {
    let config = Config::from_toml_str(
        r#"
            format = "svg"
            rankdir = "LR"
            recolor = "green"
            output_dir = "out"
        "#,
    )
    .unwrap();

    let from_config = ReflgraphOptions::resolve(
        "m.toml",
        DrawCommand::Object {
            path: "m".to_string(),
        },
        RenderArgs::new(),
        &config,
    )
    .unwrap();
    assert_eq!(from_config.format, OutputFormat::Svg);
    assert_eq!(from_config.rankdir, RankDir::LeftRight);
    assert_eq!(from_config.recolor, Some(Policy::Single("green".to_string())));
    assert_eq!(from_config.output, PathBuf::from("out").join("obj.gv"));

    let args = RenderArgs::new()
        .with_format(OutputFormat::Pdf)
        .with_rankdir(RankDir::BottomTop)
        .with_output("x.gv");
    let from_flags = ReflgraphOptions::resolve(
        "m.toml",
        DrawCommand::Object {
            path: "m".to_string(),
        },
        args,
        &config,
    )
    .unwrap();
    assert_eq!(from_flags.format, OutputFormat::Pdf);
    assert_eq!(from_flags.rankdir, RankDir::BottomTop);
    assert_eq!(from_flags.output, PathBuf::from("x.gv"));
}

//! reflgraph command-line interface.
//!
pub mod config;
pub mod options;
pub mod output;

use std::path::{Path, PathBuf};

use reflgraph_core::{
    ColorAssigner, EdgePair, ModelSpec, ObjRef, ObjectGraphBuilder, ObjectGraphOptions,
    ObjectModel, Policy, RankDir, Splines, inherit_edges, map_document, mro_edges,
    mro_document, stack_document, subclass_edges, subclasses_document,
};
use reflgraph_dot::OutputFormat;
use reflgraph_error::{Error, Result};

pub use config::Config;
pub use options::{DrawCommand, EdgeKind, RenderArgs};

/// Options for running reflgraph, after merging flags over the config file.
#[derive(Debug, Clone)]
pub struct ReflgraphOptions {
    pub model: PathBuf,
    pub command: DrawCommand,
    /// DOT source path. Rendered images are written next to it.
    pub output: PathBuf,
    pub format: OutputFormat,
    pub rankdir: RankDir,
    pub splines: Splines,
    pub recolor: Option<Policy>,
    pub dot_binary: PathBuf,
    pub print_dot: bool,
}

impl ReflgraphOptions {
    pub fn resolve(
        model: impl Into<PathBuf>,
        command: DrawCommand,
        args: RenderArgs,
        config: &Config,
    ) -> Result<Self> {
        let output = match (&args.output, command.default_output()) {
            (Some(output), _) => PathBuf::from(output),
            (None, Some(name)) => config.output_dir.join(name),
            (None, None) => PathBuf::new(),
        };
        Ok(Self {
            model: model.into(),
            command,
            output,
            format: args.format.map_or_else(|| config.output_format(), Ok)?,
            rankdir: args.rankdir.map_or_else(|| config.rank_dir(), Ok)?,
            splines: args.splines.map_or_else(|| config.splines(), Ok)?,
            recolor: args
                .recolor
                .map_or_else(|| config.recolor_policy(), |policy| Ok(Some(policy)))?,
            dot_binary: args
                .dot_binary
                .map_or_else(|| config.dot_binary.clone(), PathBuf::from),
            print_dot: args.print_dot,
        })
    }
}

/// Main entry point. Returns the text to print, or `None` when there was
/// nothing to draw.
pub fn run_main(opts: &ReflgraphOptions) -> Result<Option<String>> {
    let spec = load_spec(&opts.model)?;
    let model = spec.build()?;

    match &opts.command {
        DrawCommand::Map { class, with_mro } => {
            let class = symbol_ref(&model, class)?;
            output::emit(opts, map_document(&model, &class, *with_mro))
        }
        DrawCommand::Mro { class } => {
            let class = symbol_ref(&model, class)?;
            output::emit(opts, mro_document(&model, &class))
        }
        DrawCommand::Subclasses { class } => {
            let class = symbol_ref(&model, class)?;
            let mut assigner = ColorAssigner::new();
            output::emit(opts, subclasses_document(&model, &class, &mut assigner))
        }
        DrawCommand::Object { path } => {
            let root = symbol_ref(&model, path)?;
            let doc = ObjectGraphBuilder::new(&model, root)
                .with_options(ObjectGraphOptions {
                    rankdir: opts.rankdir,
                    splines: opts.splines,
                    recolor: opts.recolor.clone(),
                })
                .build();
            let doc = (!doc.edges().is_empty()).then_some(doc);
            output::emit(opts, doc)
        }
        DrawCommand::Stack { name } => {
            output::emit(opts, stack_document(&spec.stack, name, opts.rankdir))
        }
        DrawCommand::Edges { class, kind, json } => {
            let class = symbol_ref(&model, class)?;
            let edges = match kind {
                EdgeKind::Inherit => inherit_edges(&model, &class),
                EdgeKind::Mro => mro_edges(&model, &class),
                EdgeKind::Subclasses => subclass_edges(&model, &class),
            };
            if edges.is_empty() {
                return Ok(None);
            }
            format_edges(&edges, *json).map(Some)
        }
    }
}

fn load_spec(path: &Path) -> Result<ModelSpec> {
    if !path.is_file() {
        return Err(
            Error::file_not_found(path.display().to_string()).with_operation("cli::load_model")
        );
    }
    ModelSpec::load(path)
}

/// Class commands take any symbol; a non-class one draws nothing.
fn symbol_ref(model: &ObjectModel, path: &str) -> Result<ObjRef> {
    model
        .lookup(path)
        .ok_or_else(|| Error::symbol_not_found(path).with_operation("cli::lookup"))
}

/// One `child -> parent` line per edge, or a JSON array of pairs.
pub fn format_edges(edges: &[EdgePair], json: bool) -> Result<String> {
    if json {
        return serde_json::to_string_pretty(edges).map_err(|err| {
            Error::unexpected(format!("cannot encode edges: {err}")).set_source(err)
        });
    }
    Ok(edges
        .iter()
        .map(|(child, parent)| format!("{child} -> {parent}"))
        .collect::<Vec<_>>()
        .join("\n"))
}

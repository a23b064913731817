use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;

use reflgraph::{Config, DrawCommand, ReflgraphOptions, RenderArgs, run_main};

#[derive(Parser, Debug)]
#[command(
    name = "reflgraph",
    about = "reflgraph: draw class hierarchies, resolution orders and object maps",
    version
)]
pub struct Cli {
    /// Object model to draw from (TOML, or JSON by extension)
    #[arg(short = 'm', long = "model", value_name = "FILE")]
    model: PathBuf,

    /// Config file (defaults to ./reflgraph.toml when present)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(flatten)]
    render: RenderArgs,

    #[command(subcommand)]
    command: DrawCommand,
}

pub fn run(args: Cli) -> anyhow::Result<()> {
    let total_start = Instant::now();

    // Initialize tracing subscriber for logging
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }

    let cwd = std::env::current_dir().context("cannot read the working directory")?;
    let config = Config::discover(args.config.as_deref(), &cwd).context("loading config")?;
    let opts = ReflgraphOptions::resolve(args.model, args.command, args.render, &config)
        .context("invalid options")?;

    let output = run_main(&opts)
        .with_context(|| format!("drawing from model {}", opts.model.display()))?;
    match output {
        Some(output) => println!("{output}"),
        None => eprintln!("nothing to draw"),
    }

    let total_secs = total_start.elapsed().as_secs_f64();
    tracing::info!(total_secs, "complete");
    Ok(())
}

pub fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    run(args)
}

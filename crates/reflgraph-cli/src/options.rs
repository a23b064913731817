//! Command-line options shared by the `reflgraph` binary and its tests.

use clap::{Args, Subcommand, ValueEnum};

use reflgraph_core::{Policy, RankDir, Splines};
use reflgraph_dot::OutputFormat;

/// What to draw.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum DrawCommand {
    /// Inheritance map of a class, optionally marking its resolution order.
    Map {
        /// Dotted path of the class, e.g. `sample.B`.
        class: String,
        /// Draw resolution-order steps in red.
        #[arg(long)]
        with_mro: bool,
    },
    /// Resolution order of a class as a chain.
    Mro { class: String },
    /// Tree of every registered descendant of a class.
    Subclasses { class: String },
    /// Member map of a module, class or instance.
    Object { path: String },
    /// Table of the call stack stored in the model.
    Stack {
        /// Node name of the table.
        #[arg(long, default_value = "stack")]
        name: String,
    },
    /// Print the raw edge pairs of a class instead of drawing them.
    Edges {
        class: String,
        #[arg(long, value_enum, default_value_t = EdgeKind::Inherit)]
        kind: EdgeKind,
        /// Print a JSON array of `[child, parent]` pairs.
        #[arg(long)]
        json: bool,
    },
}

impl DrawCommand {
    /// Output file used when none is given, `None` for text-only commands.
    pub fn default_output(&self) -> Option<&'static str> {
        match self {
            DrawCommand::Map { .. } => Some("map.gv"),
            DrawCommand::Mro { .. } => Some("mro.gv"),
            DrawCommand::Subclasses { .. } => Some("subclasses.gv"),
            DrawCommand::Object { .. } => Some("obj.gv"),
            DrawCommand::Stack { .. } => Some("stack.gv"),
            DrawCommand::Edges { .. } => None,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeKind {
    /// Declared bases, walked depth first.
    #[default]
    Inherit,
    /// Consecutive steps of the resolution order.
    Mro,
    /// Registered descendants.
    Subclasses,
}

/// Rendering options. Unset values fall back to the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct RenderArgs {
    /// Output file of the DOT source; the rendered image gets the format appended.
    #[arg(short = 'o', long = "output", value_name = "FILE", global = true)]
    pub output: Option<String>,

    /// Graphviz output format (png, svg, pdf, gv, ...).
    #[arg(short = 'T', long = "format", value_name = "FORMAT", global = true)]
    pub format: Option<OutputFormat>,

    /// Rank direction: TB, LR, BT or RL.
    #[arg(long, value_name = "DIR", global = true)]
    pub rankdir: Option<RankDir>,

    /// Edge routing: spline, ortho, polyline, curved or line.
    #[arg(long, value_name = "SPLINES", global = true)]
    pub splines: Option<Splines>,

    /// Recolor object map blocks with a palette name, `rotate` or `order`.
    #[arg(long, value_name = "POLICY", global = true)]
    pub recolor: Option<Policy>,

    /// Graphviz executable.
    #[arg(long = "dot-bin", value_name = "PATH", global = true)]
    pub dot_binary: Option<String>,

    /// Print the DOT source to stdout instead of rendering.
    #[arg(long = "print-dot", global = true)]
    pub print_dot: bool,
}

impl RenderArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_rankdir(mut self, rankdir: RankDir) -> Self {
        self.rankdir = Some(rankdir);
        self
    }

    pub fn with_recolor(mut self, policy: Policy) -> Self {
        self.recolor = Some(policy);
        self
    }

    pub fn with_print_dot(mut self, print_dot: bool) -> Self {
        self.print_dot = print_dot;
        self
    }
}

//! DOT output for reflgraph documents.
//!
//! - [`to_dot`]: document to DOT text
//! - [`Renderer`]: writes a document to disk, either as source only
//!   ([`SourceRenderer`]) or through the Graphviz `dot` program
//!   ([`GraphvizRenderer`])

mod dot;
mod render;
mod table;

pub use dot::{DotBuilder, escape_label, quote_id};
pub use render::{GraphvizRenderer, OutputFormat, Renderer, SourceRenderer, to_dot};
pub use table::{escape_html, grid_label, table_label};

//! Rendering of finished documents.

use std::time::Instant;

use tracing::info;

use reflgraph_core::GraphDocument;
use reflgraph_dot::{GraphvizRenderer, Renderer, SourceRenderer, to_dot};
use reflgraph_error::Result;

use crate::ReflgraphOptions;

/// Render `doc`, or print its DOT source with `print_dot`. Returns the text
/// to show the user: the DOT source or the written paths, one per line.
/// A missing document renders nothing.
pub fn emit(opts: &ReflgraphOptions, doc: Option<GraphDocument>) -> Result<Option<String>> {
    let Some(doc) = doc else {
        info!("nothing to draw, skipping render");
        return Ok(None);
    };

    if opts.print_dot {
        return Ok(Some(to_dot(&doc)));
    }

    let render_start = Instant::now();
    let renderer: Box<dyn Renderer> = if opts.format.is_source() {
        Box::new(SourceRenderer)
    } else {
        Box::new(GraphvizRenderer::new(&opts.dot_binary))
    };
    let written = renderer.render(&doc, &opts.output, opts.format)?;

    info!(
        "Rendering '{}': {:.2}s",
        doc.name(),
        render_start.elapsed().as_secs_f64()
    );

    let listing = written
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join("\n");
    Ok(Some(listing))
}

//! Turning a [`GraphDocument`] into DOT text and image files.

use std::path::{Path, PathBuf};
use std::process::Command;

use reflgraph_core::{GraphDocument, Label, Node};
use reflgraph_error::{Error, Result};
use strum_macros::{Display, EnumString};

use crate::dot::DotBuilder;
use crate::table::{grid_label, table_label};

/// Output formats understood by the renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum OutputFormat {
    #[default]
    Png,
    Svg,
    Pdf,
    Jpg,
    Gif,
    Ps,
    Json,
    Plain,
    /// DOT source only
    Gv,
    /// DOT source only
    Dot,
}

impl OutputFormat {
    pub fn parse(name: &str) -> Result<Self> {
        name.parse()
            .map_err(|_| Error::unsupported_format(name).with_operation("render::parse_format"))
    }

    /// True when the DOT source itself is the requested output.
    pub fn is_source(self) -> bool {
        matches!(self, OutputFormat::Gv | OutputFormat::Dot)
    }
}

/// Emit `doc` as DOT text.
pub fn to_dot(doc: &GraphDocument) -> String {
    let mut dot = DotBuilder::with_comment(doc.name(), doc.comment());

    if let Some(rankdir) = doc.layout.rankdir {
        dot.attr("rankdir", &rankdir.to_string());
    }
    if let Some(splines) = doc.layout.splines {
        dot.attr("splines", &splines.to_string());
    }
    if doc.layout.compound {
        dot.attr("compound", "true");
    }
    if let Some(shape) = doc.node_shape {
        dot.node_style(&[("shape", shape.to_string())]);
    }
    if let Some(color) = &doc.edge_color {
        dot.edge_style(&[("color", color.clone())]);
    }

    for node in doc.nodes() {
        dot.node_full(&node.id, &node_attrs(node));
    }
    for edge in doc.edges() {
        let mut attrs = Vec::new();
        if let Some(color) = &edge.attrs.color {
            attrs.push(("color", color.clone()));
        }
        if let Some(style) = edge.attrs.style {
            attrs.push(("style", style.to_string()));
        }
        dot.edge_with_attrs(&edge.from, &edge.to, &attrs);
    }
    dot.build()
}

fn node_attrs(node: &Node) -> Vec<(&'static str, String)> {
    let mut attrs = Vec::new();
    match &node.label {
        Some(Label::Table(table)) => attrs.push(("label", table_label(table))),
        Some(Label::Grid(grid)) => attrs.push(("label", grid_label(grid))),
        None => {}
    }
    if let Some(shape) = node.shape {
        attrs.push(("shape", shape.to_string()));
    }
    if node.filled {
        attrs.push(("style", "filled".to_string()));
    }
    if let Some(fill) = &node.fill {
        attrs.push(("fillcolor", fill.clone()));
    }
    attrs
}

/// Writes a document somewhere. Returns the files produced.
pub trait Renderer {
    fn render(&self, doc: &GraphDocument, output: &Path, format: OutputFormat)
    -> Result<Vec<PathBuf>>;
}

fn write_source(doc: &GraphDocument, output: &Path) -> Result<PathBuf> {
    if let Some(parent) = output.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|err| {
            Error::from(err)
                .with_operation("render::write_source")
                .with_context("dir", parent.display().to_string())
        })?;
    }
    std::fs::write(output, to_dot(doc)).map_err(|err| {
        Error::from(err)
            .with_operation("render::write_source")
            .with_context("path", output.display().to_string())
    })?;
    tracing::debug!("wrote DOT source to {}", output.display());
    Ok(output.to_path_buf())
}

/// Writes the DOT source and nothing else, whatever the format.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceRenderer;

impl Renderer for SourceRenderer {
    fn render(
        &self,
        doc: &GraphDocument,
        output: &Path,
        _format: OutputFormat,
    ) -> Result<Vec<PathBuf>> {
        Ok(vec![write_source(doc, output)?])
    }
}

/// Writes the DOT source to `output`, then runs Graphviz to produce
/// `<output>.<format>` next to it.
#[derive(Debug, Clone)]
pub struct GraphvizRenderer {
    program: PathBuf,
}

impl Default for GraphvizRenderer {
    fn default() -> Self {
        Self::new("dot")
    }
}

impl GraphvizRenderer {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Path of the image rendered from `output`.
    pub fn rendered_path(output: &Path, format: OutputFormat) -> PathBuf {
        let mut name = output.as_os_str().to_os_string();
        name.push(format!(".{format}"));
        PathBuf::from(name)
    }
}

impl Renderer for GraphvizRenderer {
    #[tracing::instrument(skip_all, fields(format = %format))]
    fn render(
        &self,
        doc: &GraphDocument,
        output: &Path,
        format: OutputFormat,
    ) -> Result<Vec<PathBuf>> {
        let source = write_source(doc, output)?;
        if format.is_source() {
            return Ok(vec![source]);
        }

        let rendered = Self::rendered_path(output, format);
        let result = Command::new(&self.program)
            .arg(format!("-T{format}"))
            .arg("-o")
            .arg(&rendered)
            .arg(&source)
            .output()
            .map_err(|err| {
                Error::render_failed(format!("cannot run '{}'", self.program.display()))
                    .with_operation("render::graphviz")
                    .set_source(err)
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(Error::render_failed(stderr.trim().to_string())
                .with_operation("render::graphviz")
                .with_context("status", result.status.to_string())
                .with_context("source", source.display().to_string()));
        }

        tracing::info!("rendered {}", rendered.display());
        Ok(vec![source, rendered])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use reflgraph_core::{Category, EdgeAttrs, Endpoint, LineStyle, RankDir, Shape};
    use reflgraph_error::ErrorKind;

    #[test]
    fn test_formats() {
        assert_eq!(OutputFormat::parse("SVG").unwrap(), OutputFormat::Svg);
        assert!(OutputFormat::parse("gv").unwrap().is_source());
        let err = OutputFormat::parse("bmpx").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
    }

    #[test]
    fn test_to_dot_emits_layout_nodes_and_edges() {
        let mut doc = GraphDocument::new("structs").with_comment("demo");
        doc.layout.rankdir = Some(RankDir::LeftRight);
        doc.layout.compound = true;
        doc.node_shape = Some(Shape::Record);
        doc.add_node(Node::new("A", Category::Class).with_fill("#8dd3c7"));
        doc.add_edge(
            Endpoint::port("classes", "A"),
            Endpoint::port("instances", "obj"),
            EdgeAttrs::colored("SandyBrown").with_style(LineStyle::Dashed),
        );

        assert_eq!(
            to_dot(&doc),
            "// demo\n\
             digraph \"structs\" {\n  \
             rankdir=\"LR\";\n  \
             compound=\"true\";\n  \
             node [shape=\"record\"];\n  \
             \"A\" [style=\"filled\", fillcolor=\"#8dd3c7\"];\n  \
             \"classes\":\"A\" -> \"instances\":\"obj\" [color=\"SandyBrown\", style=\"dashed\"];\n\
             }\n"
        );
    }

    #[test]
    fn test_rendered_path_appends_format() {
        let path = GraphvizRenderer::rendered_path(Path::new("out/map.gv"), OutputFormat::Png);
        assert_eq!(path, PathBuf::from("out/map.gv.png"));
    }
}

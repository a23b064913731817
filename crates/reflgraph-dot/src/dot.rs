//! DOT format utilities for graph rendering.

use std::fmt::Write;

use reflgraph_core::Endpoint;

/// Escape special characters for quoted DOT strings.
pub fn escape_label(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

/// Quote an identifier, so dotted names like `sample.A` stay one id.
pub fn quote_id(id: &str) -> String {
    format!("\"{}\"", escape_label(id))
}

/// Attribute value: HTML-like labels (`<...>`) go out raw, everything else
/// quoted.
pub fn attr_value(value: &str) -> String {
    if value.starts_with('<') && value.ends_with('>') {
        value.to_string()
    } else {
        quote_id(value)
    }
}

/// `"node"` or `"node":"port"`.
pub fn endpoint_id(endpoint: &Endpoint) -> String {
    match &endpoint.port {
        Some(port) => format!("{}:{}", quote_id(&endpoint.node), quote_id(port)),
        None => quote_id(&endpoint.node),
    }
}

/// Write indentation to output.
pub fn write_indent(output: &mut String, level: usize) {
    for _ in 0..level {
        output.push_str("  ");
    }
}

fn write_attrs(output: &mut String, attrs: &[(&str, String)]) {
    output.push('[');
    for (i, (key, value)) in attrs.iter().enumerate() {
        if i > 0 {
            output.push_str(", ");
        }
        let _ = write!(output, "{}={}", key, attr_value(value));
    }
    output.push(']');
}

/// A DOT graph builder for constructing valid DOT output.
pub struct DotBuilder {
    output: String,
    indent: usize,
}

impl DotBuilder {
    /// Create a graph preceded by a `//` comment line.
    pub fn with_comment(name: &str, comment: Option<&str>) -> Self {
        let mut output = String::with_capacity(4096);
        if let Some(comment) = comment {
            for line in comment.lines() {
                let _ = writeln!(output, "// {line}");
            }
        }
        let _ = writeln!(output, "digraph {} {{", quote_id(name));
        Self { output, indent: 1 }
    }

    /// Add a graph attribute.
    pub fn attr(&mut self, key: &str, value: &str) -> &mut Self {
        write_indent(&mut self.output, self.indent);
        let _ = writeln!(self.output, "{}={};", key, attr_value(value));
        self
    }

    /// Add a node style default.
    pub fn node_style(&mut self, attrs: &[(&str, String)]) -> &mut Self {
        self.defaults("node", attrs)
    }

    /// Add an edge style default.
    pub fn edge_style(&mut self, attrs: &[(&str, String)]) -> &mut Self {
        self.defaults("edge", attrs)
    }

    fn defaults(&mut self, target: &str, attrs: &[(&str, String)]) -> &mut Self {
        if attrs.is_empty() {
            return self;
        }
        write_indent(&mut self.output, self.indent);
        let _ = write!(self.output, "{target} ");
        write_attrs(&mut self.output, attrs);
        self.output.push_str(";\n");
        self
    }

    /// Add a node with full attributes.
    pub fn node_full(&mut self, id: &str, attrs: &[(&str, String)]) -> &mut Self {
        write_indent(&mut self.output, self.indent);
        self.output.push_str(&quote_id(id));
        if !attrs.is_empty() {
            self.output.push(' ');
            write_attrs(&mut self.output, attrs);
        }
        self.output.push_str(";\n");
        self
    }

    /// Add an edge with attributes.
    pub fn edge_with_attrs(
        &mut self,
        from: &Endpoint,
        to: &Endpoint,
        attrs: &[(&str, String)],
    ) -> &mut Self {
        write_indent(&mut self.output, self.indent);
        let _ = write!(self.output, "{} -> {}", endpoint_id(from), endpoint_id(to));
        if !attrs.is_empty() {
            self.output.push(' ');
            write_attrs(&mut self.output, attrs);
        }
        self.output.push_str(";\n");
        self
    }

    /// Finish building and return the DOT string.
    pub fn build(mut self) -> String {
        self.output.push_str("}\n");
        self.output
    }
}

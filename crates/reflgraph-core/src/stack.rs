//! Call stack snapshots drawn as a single table.

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::document::{Align, GraphDocument, GridLabel, Label, Layout, Node, RankDir, Shape};

pub const STACK_COLUMNS: [&str; 5] = ["no", "file", "lineno", "function", "index"];
const STACK_COLOR: &str = "SandyBrown";

/// One frame of a captured call stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StackFrame {
    pub file: String,
    pub lineno: u32,
    pub function: String,
    /// Index of the current line within the captured source context.
    #[serde(default)]
    pub index: Option<u32>,
}

impl StackFrame {
    pub fn new(file: impl Into<String>, lineno: u32, function: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            lineno,
            function: function.into(),
            index: None,
        }
    }

    /// File name without a leading `./`.
    pub fn display_file(&self) -> &str {
        self.file.strip_prefix("./").unwrap_or(&self.file)
    }

    /// Function name without surrounding angle brackets, so `<module>` reads
    /// as `module`.
    pub fn display_function(&self) -> &str {
        self.function.trim_matches(|c| c == '<' || c == '>')
    }

    fn row(&self, number: usize) -> Vec<String> {
        vec![
            number.to_string(),
            self.display_file().to_string(),
            self.lineno.to_string(),
            self.display_function().to_string(),
            self.index.map_or_else(|| "None".to_string(), |index| index.to_string()),
        ]
    }
}

/// One plaintext node named `name` holding the frames, innermost first.
/// `None` when there are no frames.
pub fn stack_document(
    frames: &[StackFrame],
    name: &str,
    rankdir: RankDir,
) -> Option<GraphDocument> {
    if frames.is_empty() {
        tracing::warn!("empty call stack, nothing to draw");
        return None;
    }

    let label = GridLabel {
        header: STACK_COLUMNS.iter().map(|column| column.to_string()).collect(),
        rows: frames
            .iter()
            .enumerate()
            .map(|(number, frame)| frame.row(number))
            .collect(),
        color: STACK_COLOR.to_string(),
        align: Align::Left,
    };

    let mut doc = GraphDocument::new("structs");
    doc.layout = Layout {
        rankdir: Some(rankdir),
        ..Layout::default()
    };
    doc.node_shape = Some(Shape::Record);
    doc.add_node(
        Node::new(name, Category::Other)
            .with_label(Label::Grid(label))
            .with_shape(Shape::Plaintext),
    );
    Some(doc)
}

//! Render-ready graph description handed to a renderer.
//!
//! A [`GraphDocument`] owns its nodes and edges. Nodes are unique by id and
//! the first definition wins; edges are unique by (source, target) endpoint
//! pair and the first occurrence keeps its styling.

use std::collections::{HashMap, HashSet};

use strum_macros::{Display, EnumString};

use crate::category::Category;

/// Rank direction of the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum RankDir {
    #[default]
    #[strum(to_string = "TB", serialize = "top-bottom")]
    TopBottom,
    #[strum(to_string = "LR", serialize = "left-right")]
    LeftRight,
    #[strum(to_string = "BT", serialize = "bottom-top")]
    BottomTop,
    #[strum(to_string = "RL", serialize = "right-left")]
    RightLeft,
}

/// Edge routing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Splines {
    #[default]
    Spline,
    Ortho,
    Polyline,
    Curved,
    Line,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Shape {
    Plaintext,
    Record,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum LineStyle {
    Dashed,
}

/// One-column table: a colored title row, then one row per member. Each
/// member row is addressable as a port named after the member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLabel {
    pub title: String,
    pub color: String,
    pub align: Align,
    pub rows: Vec<String>,
}

/// Multi-column table with a colored header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridLabel {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub color: String,
    pub align: Align,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Label {
    Table(TableLabel),
    Grid(GridLabel),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: String,
    pub category: Category,
    pub label: Option<Label>,
    pub shape: Option<Shape>,
    pub filled: bool,
    pub fill: Option<String>,
    /// Id of the block this node hangs off, for nested blocks.
    pub parent: Option<String>,
}

impl Node {
    pub fn new(id: impl Into<String>, category: Category) -> Self {
        Self {
            id: id.into(),
            category,
            label: None,
            shape: None,
            filled: false,
            fill: None,
            parent: None,
        }
    }

    pub fn with_label(mut self, label: Label) -> Self {
        self.label = Some(label);
        self
    }

    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shape = Some(shape);
        self
    }

    pub fn filled(mut self) -> Self {
        self.filled = true;
        self
    }

    pub fn with_fill(mut self, color: impl Into<String>) -> Self {
        self.filled = true;
        self.fill = Some(color.into());
        self
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }
}

/// Edge end: a node, optionally narrowed to one table row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Endpoint {
    pub node: String,
    pub port: Option<String>,
}

impl Endpoint {
    pub fn node(node: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            port: None,
        }
    }

    pub fn port(node: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            port: Some(port.into()),
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.port {
            Some(port) => write!(f, "{}:{}", self.node, port),
            None => write!(f, "{}", self.node),
        }
    }
}

impl From<&str> for Endpoint {
    fn from(node: &str) -> Self {
        Endpoint::node(node)
    }
}

impl From<String> for Endpoint {
    fn from(node: String) -> Self {
        Endpoint::node(node)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeAttrs {
    pub color: Option<String>,
    pub style: Option<LineStyle>,
}

impl EdgeAttrs {
    pub fn colored(color: impl Into<String>) -> Self {
        Self {
            color: Some(color.into()),
            style: None,
        }
    }

    pub fn with_style(mut self, style: LineStyle) -> Self {
        self.style = Some(style);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub from: Endpoint,
    pub to: Endpoint,
    pub attrs: EdgeAttrs,
}

/// Graph-level layout hints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layout {
    pub rankdir: Option<RankDir>,
    pub splines: Option<Splines>,
    pub compound: bool,
}

#[derive(Debug, Clone, Default)]
pub struct GraphDocument {
    name: String,
    comment: Option<String>,
    pub layout: Layout,
    /// Default shape for nodes without their own.
    pub node_shape: Option<Shape>,
    /// Default color for edges without their own.
    pub edge_color: Option<String>,
    nodes: Vec<Node>,
    node_index: HashMap<String, usize>,
    edges: Vec<Edge>,
    edge_index: HashSet<(Endpoint, Endpoint)>,
}

impl GraphDocument {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Add a node unless one with the same id exists. Returns whether it was added.
    pub fn add_node(&mut self, node: Node) -> bool {
        if self.node_index.contains_key(&node.id) {
            tracing::trace!("node '{}' already defined", node.id);
            return false;
        }
        self.node_index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
        true
    }

    /// Make sure a node with `id` exists, creating a bare one tagged `category`.
    pub fn ensure_node(&mut self, id: &str, category: Category) {
        if !self.node_index.contains_key(id) {
            self.add_node(Node::new(id, category));
        }
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.node_index.get(id).map(|index| &self.nodes[*index])
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Add an edge unless the (from, to) pair is already present. Returns
    /// whether it was added.
    pub fn add_edge(
        &mut self,
        from: impl Into<Endpoint>,
        to: impl Into<Endpoint>,
        attrs: EdgeAttrs,
    ) -> bool {
        let from = from.into();
        let to = to.into();
        if !self.edge_index.insert((from.clone(), to.clone())) {
            tracing::trace!("dropping duplicate edge {} -> {}", from, to);
            return false;
        }
        self.edges.push(Edge { from, to, attrs });
        true
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn has_edge(&self, from: &Endpoint, to: &Endpoint) -> bool {
        self.edge_index.contains(&(from.clone(), to.clone()))
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Edge endpoints that name a node this document never defined.
    pub fn dangling_endpoints(&self) -> Vec<&Endpoint> {
        self.edges
            .iter()
            .flat_map(|edge| [&edge.from, &edge.to])
            .filter(|endpoint| !self.node_index.contains_key(&endpoint.node))
            .collect()
    }
}

//! Class-level drawings: ancestry map, resolution order and descendant tree.
//!
//! Each drawing returns `None` when there is nothing to render, so callers
//! never hand an empty document to a renderer.

use crate::category::Category;
use crate::document::{EdgeAttrs, GraphDocument, Layout, Node, RankDir, Splines};
use crate::edges::{
    EdgePair, edges_in_same_module, inherit_edges, mro_edges, node_module_name,
    strip_module_names, subclass_edges,
};
use crate::palette::{ColorAssigner, ColorPlate, Policy};
use crate::reflect::{MISSING_NAME, Reflect};

/// Stand-in parent of a class whose ancestry yields no edge.
pub const NUL_NODE: &str = "NUL";

const MRO_COLOR: &str = "red";

fn class_name<R: Reflect>(reflect: &R, class: &R::Handle) -> String {
    reflect.name(class).unwrap_or_else(|| {
        tracing::warn!("class has no name, using {}", MISSING_NAME);
        MISSING_NAME.to_string()
    })
}

fn class_like<R: Reflect>(reflect: &R, class: &R::Handle) -> bool {
    let ok = reflect.is_class_like(class);
    if !ok {
        tracing::warn!("'{}' is not class-like", reflect.qualified_name(class));
    }
    ok
}

/// The linearized resolution order as a left-to-right chain.
pub fn mro_document<R: Reflect>(reflect: &R, class: &R::Handle) -> Option<GraphDocument> {
    if !class_like(reflect, class) {
        return None;
    }
    let edges = mro_edges(reflect, class);
    let (first, _) = edges.first()?;

    let mut doc = GraphDocument::new("mro")
        .with_comment(format!("Class {} MRO map", class_name(reflect, class)));
    doc.layout = Layout {
        rankdir: Some(RankDir::LeftRight),
        ..Layout::default()
    };
    doc.edge_color = Some(MRO_COLOR.to_string());
    doc.add_node(Node::new(first.as_str(), Category::Class).filled());
    add_class_edges(&mut doc, &edges, EdgeAttrs::default());
    Some(doc)
}

/// Ancestry map. With `with_mro`, ancestry edges that are also steps of the
/// resolution order are drawn red, and the remaining steps are added red.
pub fn map_document<R: Reflect>(
    reflect: &R,
    class: &R::Handle,
    with_mro: bool,
) -> Option<GraphDocument> {
    if !class_like(reflect, class) {
        return None;
    }
    let name = class_name(reflect, class);
    let mut edges = inherit_edges(reflect, class);
    if edges.is_empty() {
        edges.push((name.clone(), NUL_NODE.to_string()));
    }

    let mut doc = GraphDocument::new("map")
        .with_comment(format!("Class {name} inherit relationship map"));
    doc.add_node(Node::new(edges[0].0.as_str(), Category::Class).filled());

    if !with_mro {
        add_class_edges(&mut doc, &edges, EdgeAttrs::default());
        return Some(doc);
    }

    let mut chain = mro_edges(reflect, class);
    for edge in &edges {
        let attrs = match chain.iter().position(|step| step == edge) {
            Some(index) => {
                chain.remove(index);
                EdgeAttrs::colored(MRO_COLOR)
            }
            None => EdgeAttrs::default(),
        };
        add_class_edge(&mut doc, edge, attrs);
    }
    add_class_edges(&mut doc, &chain, EdgeAttrs::colored(MRO_COLOR));
    Some(doc)
}

/// Descendant tree rooted at `class`. Single-module trees use bare names;
/// otherwise every node is filled with a color picked once per module.
pub fn subclasses_document<R: Reflect>(
    reflect: &R,
    class: &R::Handle,
    assigner: &mut ColorAssigner,
) -> Option<GraphDocument> {
    if !class_like(reflect, class) {
        return None;
    }
    let mut edges = subclass_edges(reflect, class);
    if edges.is_empty() {
        return None;
    }

    let multiple_modules = !edges_in_same_module(&edges);
    if !multiple_modules {
        edges = strip_module_names(&edges);
    }

    let mut doc = GraphDocument::new("subclasses")
        .with_comment(format!("Class {} subclasses tree", class_name(reflect, class)));
    doc.layout = Layout {
        rankdir: Some(RankDir::LeftRight),
        splines: Some(Splines::Polyline),
        compound: false,
    };

    if multiple_modules {
        let mut plate = ColorPlate::new(Policy::default());
        for (child, parent) in &edges {
            for node in [child, parent] {
                let color = plate.color_for(node_module_name(node), assigner);
                doc.add_node(Node::new(node.as_str(), Category::Class).with_fill(color));
            }
        }
    } else {
        doc.add_node(Node::new(edges[0].1.as_str(), Category::Class).filled());
    }

    add_class_edges(&mut doc, &edges, EdgeAttrs::default());
    Some(doc)
}

fn add_class_edge(doc: &mut GraphDocument, (child, parent): &EdgePair, attrs: EdgeAttrs) {
    doc.ensure_node(child, Category::Class);
    doc.ensure_node(parent, Category::Class);
    doc.add_edge(child.as_str(), parent.as_str(), attrs);
}

fn add_class_edges(doc: &mut GraphDocument, edges: &[EdgePair], attrs: EdgeAttrs) {
    for edge in edges {
        add_class_edge(doc, edge, attrs.clone());
    }
}

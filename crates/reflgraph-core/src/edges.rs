//! Ancestry, resolution-order and descendant-registry edges.
//!
//! Every extractor returns `(child, parent)` pairs in first discovery order
//! with duplicates removed. Walks over live structures go through an explicit
//! work list and a visited set keyed by qualified name, so a registry that
//! lists a class under itself, or a cycle between registries, terminates.

use std::collections::HashSet;

use crate::reflect::{MISSING_NAME, Reflect};

/// A `(child, parent)` pair.
pub type EdgePair = (String, String);

fn name_or_missing<R: Reflect>(reflect: &R, value: &R::Handle) -> String {
    reflect.name(value).unwrap_or_else(|| {
        tracing::warn!("value has no name, using {}", MISSING_NAME);
        MISSING_NAME.to_string()
    })
}

fn require_class_like<R: Reflect>(reflect: &R, class: &R::Handle, operation: &str) -> bool {
    if reflect.is_class_like(class) {
        return true;
    }
    tracing::warn!(
        "{}: '{}' is not class-like, nothing to extract",
        operation,
        reflect.qualified_name(class)
    );
    false
}

/// One edge per (class, direct base) at every depth, using unqualified names.
/// The walk does not descend into the universal base.
pub fn inherit_edges<R: Reflect>(reflect: &R, class: &R::Handle) -> Vec<EdgePair> {
    if !require_class_like(reflect, class, "inherit_edges") {
        return Vec::new();
    }

    let mut edges = Vec::new();
    let mut visited = HashSet::new();
    visited.insert(reflect.qualified_name(class));

    let mut stack: Vec<(R::Handle, R::Handle)> = Vec::new();
    push_bases(reflect, class, &mut stack);

    while let Some((child, base)) = stack.pop() {
        edges.push((name_or_missing(reflect, &child), name_or_missing(reflect, &base)));

        if reflect.is_universal_base(&base) {
            continue;
        }
        if visited.insert(reflect.qualified_name(&base)) {
            push_bases(reflect, &base, &mut stack);
        } else {
            tracing::debug!("bases of '{}' already walked", reflect.qualified_name(&base));
        }
    }

    dedup_edges(edges)
}

// Pushed in reverse so the first declared base is expanded first.
fn push_bases<R: Reflect>(reflect: &R, class: &R::Handle, stack: &mut Vec<(R::Handle, R::Handle)>) {
    let bases = reflect.bases(class).unwrap_or_default();
    for base in bases.into_iter().rev() {
        stack.push((class.clone(), base));
    }
}

/// Consecutive pairs of the precomputed resolution order: N entries give
/// N - 1 edges.
pub fn mro_edges<R: Reflect>(reflect: &R, class: &R::Handle) -> Vec<EdgePair> {
    if !require_class_like(reflect, class, "mro_edges") {
        return Vec::new();
    }
    let names: Vec<String> = reflect
        .mro(class)
        .unwrap_or_default()
        .iter()
        .map(|entry| name_or_missing(reflect, entry))
        .collect();

    names
        .windows(2)
        .map(|pair| (pair[0].clone(), pair[1].clone()))
        .collect()
}

/// Edges from each registered descendant to its ancestor, depth first, both
/// ends module-qualified. A class registered under itself is skipped.
///
/// Identity is the qualified name: a descendant sharing its ancestor's name
/// and module, such as a redefinition of `A` deriving from the old `A`, is
/// indistinguishable from self-registration and is skipped the same way.
pub fn subclass_edges<R: Reflect>(reflect: &R, class: &R::Handle) -> Vec<EdgePair> {
    if !require_class_like(reflect, class, "subclass_edges") {
        return Vec::new();
    }

    let mut edges = Vec::new();
    let mut visited = HashSet::new();
    visited.insert(reflect.qualified_name(class));

    let mut stack: Vec<(R::Handle, R::Handle)> = Vec::new();
    push_descendants(reflect, class, &mut stack);

    while let Some((child, parent)) = stack.pop() {
        let child_name = reflect.qualified_name(&child);
        let parent_name = reflect.qualified_name(&parent);
        if child_name == parent_name {
            tracing::warn!("'{}' is registered as its own descendant, skipped", child_name);
            continue;
        }
        edges.push((child_name.clone(), parent_name));

        if visited.insert(child_name.clone()) {
            push_descendants(reflect, &child, &mut stack);
        } else {
            tracing::debug!("descendants of '{}' already walked", child_name);
        }
    }

    dedup_edges(edges)
}

fn push_descendants<R: Reflect>(
    reflect: &R,
    parent: &R::Handle,
    stack: &mut Vec<(R::Handle, R::Handle)>,
) {
    let descendants = reflect.subclasses(parent).unwrap_or_default();
    for child in descendants.into_iter().rev() {
        stack.push((child, parent.clone()));
    }
}

/// Drop repeated pairs, keeping the first occurrence and the original order.
pub fn dedup_edges(edges: Vec<EdgePair>) -> Vec<EdgePair> {
    let mut seen = HashSet::new();
    edges
        .into_iter()
        .filter(|edge| seen.insert(edge.clone()))
        .collect()
}

/// The part of a qualified node name before the last `.`, empty when there
/// is none.
pub fn node_module_name(node: &str) -> &str {
    node.rfind('.').map_or("", |index| &node[..index])
}

/// The part of a qualified node name after the last `.`.
pub fn node_last_name(node: &str) -> &str {
    node.rfind('.').map_or(node, |index| &node[index + 1..])
}

/// True when both ends of every edge live in the same module.
pub fn edges_in_same_module(edges: &[EdgePair]) -> bool {
    edges
        .iter()
        .all(|(child, parent)| node_module_name(child) == node_module_name(parent))
}

pub fn strip_module_names(edges: &[EdgePair]) -> Vec<EdgePair> {
    edges
        .iter()
        .map(|(child, parent)| {
            (
                node_last_name(child).to_string(),
                node_last_name(parent).to_string(),
            )
        })
        .collect()
}

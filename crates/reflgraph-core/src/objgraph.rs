//! Member map of a single object: one table block per category.

use std::collections::HashSet;

use crate::category::Test;
use crate::document::{
    EdgeAttrs, Endpoint, GraphDocument, Label, Layout, LineStyle, Node, RankDir, Shape, Splines,
    TableLabel,
};
use crate::palette::{ColorAssigner, ColorPlate, Policy};
use crate::reflect::{Probe, Reflect};
use crate::style::{BLOCK_STYLES, BlockStyle, CLASSES, INSTANCES, ROOT_STYLE, Selector};

/// Graph name of object maps.
pub const OBJECT_GRAPH_NAME: &str = "structs";

const ROOT_PREFIX: &str = "root.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectGraphOptions {
    pub rankdir: RankDir,
    pub splines: Splines,
    /// Pick block colors from this policy instead of the fixed styles.
    pub recolor: Option<Policy>,
}

struct BlockColors<'c> {
    plate: Option<ColorPlate>,
    assigner: &'c mut ColorAssigner,
}

impl BlockColors<'_> {
    fn color(&mut self, style: &BlockStyle) -> String {
        match &mut self.plate {
            Some(plate) => plate.color_for(style.title, self.assigner).to_string(),
            None => style.color.to_string(),
        }
    }
}

/// Builds the member map of `root`.
pub struct ObjectGraphBuilder<'r, R: Reflect> {
    reflect: &'r R,
    root: R::Handle,
    root_module: Option<String>,
    root_name: String,
    root_type: String,
    options: ObjectGraphOptions,
}

impl<'r, R: Reflect> ObjectGraphBuilder<'r, R> {
    pub fn new(reflect: &'r R, root: R::Handle) -> Self {
        let root_type = match reflect.type_name(&root).as_str() {
            "type" => "class".to_string(),
            other => other.to_string(),
        };
        let root_name = reflect
            .name(&root)
            .unwrap_or_else(|| format!("{root_type}.instance"));
        let root_module = reflect.module(&root).filter(|module| !module.is_empty());
        Self {
            reflect,
            root,
            root_module,
            root_name,
            root_type,
            options: ObjectGraphOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ObjectGraphOptions) -> Self {
        self.options = options;
        self
    }

    /// Node id of the root block, `root.<type>`.
    pub fn root_id(&self) -> String {
        format!("{ROOT_PREFIX}{}", self.root_type)
    }

    /// The single row of the root block.
    pub fn root_row(&self) -> String {
        match &self.root_module {
            Some(module) if !self.reflect.check(&self.root, Probe::Module) => {
                format!("{module}.{}", self.root_name)
            }
            _ => self.root_name.clone(),
        }
    }

    /// Build with a fresh color assigner.
    pub fn build(&self) -> GraphDocument {
        self.build_with(&mut ColorAssigner::new())
    }

    #[tracing::instrument(skip_all)]
    pub fn build_with(&self, assigner: &mut ColorAssigner) -> GraphDocument {
        let mut doc = GraphDocument::new(OBJECT_GRAPH_NAME);
        doc.layout = Layout {
            rankdir: Some(self.options.rankdir),
            splines: Some(self.options.splines),
            compound: true,
        };
        doc.node_shape = Some(Shape::Record);

        let mut colors = BlockColors {
            plate: self.options.recolor.clone().map(ColorPlate::new),
            assigner,
        };

        let root_id = self.root_id();
        self.add_block(&mut doc, &self.root, &ROOT_STYLE, &root_id, None, &mut colors);

        let drawn: Vec<&BlockStyle> = BLOCK_STYLES
            .iter()
            .filter(|style| {
                self.add_block(&mut doc, &self.root, style, style.title, None, &mut colors)
            })
            .collect();
        for style in &drawn {
            let color = colors.color(style);
            doc.add_edge(root_id.as_str(), style.title, EdgeAttrs::colored(color));
        }

        self.add_relationship_edges(&mut doc, &mut colors);

        tracing::debug!(
            "object map of '{}': {} nodes, {} edges",
            self.root_row(),
            doc.nodes().len(),
            doc.edges().len()
        );
        doc
    }

    /// Add the block for `style` over `value` and its nested blocks. Returns
    /// false, adding nothing, when no row qualifies.
    fn add_block(
        &self,
        doc: &mut GraphDocument,
        value: &R::Handle,
        style: &BlockStyle,
        id: &str,
        parent: Option<&str>,
        colors: &mut BlockColors<'_>,
    ) -> bool {
        let rows = self.select(value, style.selector);
        if rows.is_empty() {
            return false;
        }

        let label = TableLabel {
            title: id.strip_prefix(ROOT_PREFIX).unwrap_or(id).to_string(),
            color: colors.color(style),
            align: style.align,
            rows: rows.iter().map(|(name, _)| name.clone()).collect(),
        };
        let mut node = Node::new(id, style.category)
            .with_label(Label::Table(label))
            .with_shape(Shape::Plaintext);
        if let Some(parent) = parent {
            node = node.with_parent(parent);
        }
        doc.add_node(node);

        for child in style.children {
            for (name, member) in &rows {
                let child_id = format!("{name}.{}", child.title);
                if self.add_block(doc, member, child, &child_id, Some(id), colors) {
                    let color = colors.color(child);
                    let from = Endpoint::port(id, name.as_str());
                    doc.add_edge(from, child_id, EdgeAttrs::colored(color));
                }
            }
        }
        true
    }

    /// Dashed `classes:<class>` to `instances:<instance>` edges.
    fn add_relationship_edges(&self, doc: &mut GraphDocument, colors: &mut BlockColors<'_>) {
        let instances = self.select(&self.root, INSTANCES.selector);
        let classes = self.select(&self.root, CLASSES.selector);
        if instances.is_empty() || classes.is_empty() {
            return;
        }

        let attrs = EdgeAttrs::colored(colors.color(&INSTANCES)).with_style(LineStyle::Dashed);
        for (instance_name, instance) in &instances {
            for (class_name, class) in &classes {
                if self.reflect.is_instance(instance, class) {
                    doc.add_edge(
                        Endpoint::port(CLASSES.title, class_name.as_str()),
                        Endpoint::port(INSTANCES.title, instance_name.as_str()),
                        attrs.clone(),
                    );
                }
            }
        }
    }

    /// Members without module information, or any member when the root has
    /// none, pass.
    fn in_root_module(&self, member: &R::Handle) -> bool {
        match (&self.root_module, self.reflect.module(member)) {
            (Some(root), Some(module)) => *root == module,
            _ => true,
        }
    }

    fn select(&self, value: &R::Handle, selector: Selector) -> Vec<(String, R::Handle)> {
        let reflect = self.reflect;
        match selector {
            Selector::Root => vec![(self.root_row(), value.clone())],
            Selector::Matching(test) => reflect
                .members_where(value, &|member| test.holds(reflect, member))
                .into_iter()
                .filter(|(_, member)| self.in_root_module(member))
                .collect(),
            Selector::Descriptors => reflect
                .members_where(value, &|member| Test::Descriptor.holds(reflect, member))
                .into_iter()
                .filter(|(name, _)| !is_private(name))
                .collect(),
            Selector::Methods => {
                reflect.members_where(value, &|member| reflect.check(member, Probe::Method))
            }
            Selector::InstanceMethods => {
                let class_functions: HashSet<String> = reflect
                    .class_of(value)
                    .map(|class| {
                        reflect
                            .members_where(&class, &|member| reflect.check(member, Probe::Function))
                            .into_iter()
                            .map(|(name, _)| name)
                            .collect()
                    })
                    .unwrap_or_default();
                reflect
                    .members_where(value, &|member| reflect.check(member, Probe::Method))
                    .into_iter()
                    .filter(|(name, _)| !class_functions.contains(name))
                    .collect()
            }
            Selector::Instances => {
                let classes = self.classes_of(value);
                reflect
                    .members(value)
                    .into_iter()
                    .filter(|(name, member)| {
                        !is_private(name) && self.instance_of_any(member, &classes)
                    })
                    .collect()
            }
            Selector::Others => {
                let classes = self.classes_of(value);
                reflect
                    .members_where(value, &|member| Test::Other.holds(reflect, member))
                    .into_iter()
                    .filter(|(name, member)| {
                        !is_private(name) && !self.instance_of_any(member, &classes)
                    })
                    .collect()
            }
        }
    }

    fn classes_of(&self, value: &R::Handle) -> Vec<R::Handle> {
        self.select(value, CLASSES.selector)
            .into_iter()
            .map(|(_, class)| class)
            .collect()
    }

    fn instance_of_any(&self, value: &R::Handle, classes: &[R::Handle]) -> bool {
        classes
            .iter()
            .any(|class| self.reflect.is_instance(value, class))
    }
}

fn is_private(name: &str) -> bool {
    name.starts_with("__")
}

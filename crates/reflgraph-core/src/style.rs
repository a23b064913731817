//! Static description of the blocks an object graph is made of.

use crate::category::{Category, Test};
use crate::document::Align;
use crate::reflect::Probe;

/// How the rows of a block are chosen from the members of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    /// The single row naming the root object.
    Root,
    /// Members passing the test and the module affinity filter.
    Matching(Test),
    /// Public members that are instances of one of the value's classes.
    Instances,
    /// Public `other` members that are not such instances.
    Others,
    /// Public descriptors, from any module.
    Descriptors,
    /// Bound methods, from any module.
    Methods,
    /// Bound methods not defined as plain functions on the receiver's class.
    InstanceMethods,
}

#[derive(Debug, Clone, Copy)]
pub struct BlockStyle {
    pub category: Category,
    pub title: &'static str,
    pub align: Align,
    pub color: &'static str,
    pub selector: Selector,
    /// Blocks drawn for every row of this one.
    pub children: &'static [BlockStyle],
}

const fn block(
    category: Category,
    title: &'static str,
    color: &'static str,
    selector: Selector,
) -> BlockStyle {
    BlockStyle {
        category,
        title,
        align: Align::Left,
        color,
        selector,
        children: &[],
    }
}

const fn matching(probe: Probe) -> Selector {
    Selector::Matching(Test::Probe(probe))
}

pub const ROOT_STYLE: BlockStyle = BlockStyle {
    category: Category::Root,
    title: "*",
    align: Align::Center,
    color: "#8dd3c7",
    selector: Selector::Root,
    children: &[],
};

pub const CLASS_FUNCTIONS: BlockStyle =
    block(Category::ClassFunction, "functions", "#bebada", matching(Probe::Function));
pub const DESCRIPTORS: BlockStyle =
    block(Category::Descriptor, "descriptors", "YellowGreen", Selector::Descriptors);
pub const FUNCTIONS: BlockStyle =
    block(Category::Function, "functions", "#bebada", matching(Probe::Function));
pub const METHODS: BlockStyle = block(Category::Method, "methods", "#bebada", Selector::Methods);
pub const INSTANCE_METHODS: BlockStyle =
    block(Category::Method, "methods", "#bebada", Selector::InstanceMethods);

pub const CLASSES: BlockStyle = BlockStyle {
    children: &[CLASS_FUNCTIONS, DESCRIPTORS],
    ..block(Category::Class, "classes", "SandyBrown", matching(Probe::Class))
};

pub const INSTANCES: BlockStyle = BlockStyle {
    children: &[FUNCTIONS, INSTANCE_METHODS],
    ..block(Category::Instance, "instances", "SandyBrown", Selector::Instances)
};

/// Top-level blocks in drawing order.
pub static BLOCK_STYLES: [BlockStyle; 13] = [
    CLASSES,
    INSTANCES,
    METHODS,
    FUNCTIONS,
    block(Category::Str, "strings", "Gainsboro", matching(Probe::Str)),
    block(Category::Number, "numbers", "Gainsboro", matching(Probe::Number)),
    block(Category::Tuple, "tuples", "BurlyWood", matching(Probe::Tuple)),
    block(Category::List, "lists", "BurlyWood", matching(Probe::List)),
    block(Category::Dict, "dicts", "BurlyWood", matching(Probe::Dict)),
    block(Category::Abstract, "abstracts", "Salmon", matching(Probe::Abstract)),
    block(Category::Generator, "generators", "Salmon", matching(Probe::Generator)),
    block(Category::Traceback, "tracebacks", "red", matching(Probe::Traceback)),
    block(Category::Other, "others", "Gainsboro", Selector::Others),
];

/// The top-level style drawn for `category`, if any.
pub fn style_for(category: Category) -> Option<&'static BlockStyle> {
    if category == Category::Root {
        return Some(&ROOT_STYLE);
    }
    BLOCK_STYLES.iter().find(|style| style.category == category)
}

pub mod category;
pub mod clsgraph;
pub mod document;
pub mod edges;
pub mod model;
pub mod objgraph;
pub mod palette;
pub mod reflect;
pub mod stack;
pub mod style;

pub use category::{CLASSIFY_ORDER, Category, Test, classify};
pub use clsgraph::{NUL_NODE, map_document, mro_document, subclasses_document};
pub use document::{
    Align, Edge, EdgeAttrs, Endpoint, GraphDocument, GridLabel, Label, Layout, LineStyle, Node,
    RankDir, Shape, Splines, TableLabel,
};
pub use edges::{
    EdgePair, dedup_edges, edges_in_same_module, inherit_edges, mro_edges, strip_module_names,
    subclass_edges,
};
pub use model::{ModelSpec, ObjId, ObjRef, ObjectModel, ValueKind};
pub use objgraph::{ObjectGraphBuilder, ObjectGraphOptions};
pub use palette::{ColorAssigner, ColorPlate, Policy};
pub use reflect::{MISSING_NAME, Probe, Reflect};
pub use stack::{StackFrame, stack_document};
pub use style::{BLOCK_STYLES, BlockStyle, ROOT_STYLE, Selector};

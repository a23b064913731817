//! Category tags and the ordered classifier.

use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::reflect::{Probe, Reflect};

/// Mutually exclusive classification of a reflected value.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    EnumString,
    Display,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Category {
    Root,
    Class,
    Instance,
    Function,
    Str,
    Number,
    Tuple,
    List,
    Dict,
    ClassFunction,
    Method,
    Abstract,
    Generator,
    Traceback,
    Descriptor,
    Other,
}

/// A value predicate, interpreted against a [`Reflect`] provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Test {
    Probe(Probe),
    /// Method descriptor or data descriptor.
    Descriptor,
    /// Complement of every named predicate, excluding built-ins and modules.
    Other,
}

impl Test {
    pub fn holds<R: Reflect>(self, reflect: &R, value: &R::Handle) -> bool {
        match self {
            Test::Probe(probe) => reflect.check(value, probe),
            Test::Descriptor => {
                reflect.check(value, Probe::MethodDescriptor)
                    || reflect.check(value, Probe::DataDescriptor)
            }
            Test::Other => is_other(reflect, value),
        }
    }
}

/// Evaluation order of [`classify`]. Function precedes ClassFunction and both
/// share one predicate, so ClassFunction never wins here.
pub const CLASSIFY_ORDER: [Category; 14] = [
    Category::Class,
    Category::Function,
    Category::Str,
    Category::Number,
    Category::Tuple,
    Category::List,
    Category::Dict,
    Category::ClassFunction,
    Category::Method,
    Category::Abstract,
    Category::Generator,
    Category::Traceback,
    Category::Descriptor,
    Category::Other,
];

impl Category {
    /// The value predicate behind this category. Root and Instance depend on
    /// the surrounding object, not on the value alone.
    pub fn test(self) -> Option<Test> {
        let test = match self {
            Category::Root | Category::Instance => return None,
            Category::Class => Test::Probe(Probe::Class),
            Category::Function | Category::ClassFunction => Test::Probe(Probe::Function),
            Category::Str => Test::Probe(Probe::Str),
            Category::Number => Test::Probe(Probe::Number),
            Category::Tuple => Test::Probe(Probe::Tuple),
            Category::List => Test::Probe(Probe::List),
            Category::Dict => Test::Probe(Probe::Dict),
            Category::Method => Test::Probe(Probe::Method),
            Category::Abstract => Test::Probe(Probe::Abstract),
            Category::Generator => Test::Probe(Probe::Generator),
            Category::Traceback => Test::Probe(Probe::Traceback),
            Category::Descriptor => Test::Descriptor,
            Category::Other => Test::Other,
        };
        Some(test)
    }

    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }
}

fn is_other<R: Reflect>(reflect: &R, value: &R::Handle) -> bool {
    let named = CLASSIFY_ORDER
        .iter()
        .filter_map(|category| category.test())
        .filter(|test| *test != Test::Other)
        .any(|test| test.holds(reflect, value));

    !named && !reflect.check(value, Probe::Builtin) && !reflect.check(value, Probe::Module)
}

/// Classify `value` by the first predicate in [`CLASSIFY_ORDER`] that holds.
///
/// Built-in routines and modules match nothing and yield `None`.
pub fn classify<R: Reflect>(reflect: &R, value: &R::Handle) -> Option<Category> {
    CLASSIFY_ORDER.iter().copied().find(|category| {
        category
            .test()
            .is_some_and(|test| test.holds(reflect, value))
    })
}

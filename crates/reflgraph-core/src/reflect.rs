//! The reflection capability every extraction entry point receives.
//!
//! The core never inspects values on its own. It asks a [`Reflect`]
//! implementation for ancestry, resolution order, registered descendants and
//! members, which keeps every algorithm testable against a synthetic model
//! (see [`crate::model::ObjectModel`]).

use strum_macros::{Display, EnumIter, IntoStaticStr};

/// Name substituted when a value cannot report its own name.
pub const MISSING_NAME: &str = "NoN";

/// Yes/no questions a provider answers about a single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Probe {
    Class,
    Function,
    Str,
    /// int, float, bool or complex
    Number,
    Tuple,
    List,
    Dict,
    /// Bound method
    Method,
    Abstract,
    Generator,
    Traceback,
    MethodDescriptor,
    DataDescriptor,
    /// Built-in (native) routine
    Builtin,
    Module,
}

/// Read-only view over a live object model.
///
/// Methods returning `Option` use `None` for "cannot answer"; callers treat
/// that permissively (a failed probe is `false`, a missing module passes the
/// module filter, a missing name becomes [`MISSING_NAME`]).
pub trait Reflect {
    /// Cheap handle to one value of the model.
    type Handle: Clone;

    /// Answer one predicate about `value`.
    fn probe(&self, value: &Self::Handle, probe: Probe) -> Option<bool>;

    /// The value's own name (`__name__` style), if it has one.
    fn name(&self, value: &Self::Handle) -> Option<String>;

    /// Name of the module the value was defined in.
    fn module(&self, value: &Self::Handle) -> Option<String>;

    /// Runtime type name, e.g. `module`, `int`, `type` or `sample.A`.
    fn type_name(&self, value: &Self::Handle) -> String;

    /// Direct bases, in declaration order. `None` when `value` is not class-like.
    fn bases(&self, class: &Self::Handle) -> Option<Vec<Self::Handle>>;

    /// Precomputed linear resolution order, starting with `class` itself.
    fn mro(&self, class: &Self::Handle) -> Option<Vec<Self::Handle>>;

    /// Classes currently registered as direct descendants of `class`.
    fn subclasses(&self, class: &Self::Handle) -> Option<Vec<Self::Handle>>;

    /// True for the base every class ultimately derives from.
    fn is_universal_base(&self, class: &Self::Handle) -> bool;

    /// Every attribute reachable on `value`, sorted by name.
    fn members(&self, value: &Self::Handle) -> Vec<(String, Self::Handle)>;

    /// The class `value` is an instance of.
    fn class_of(&self, value: &Self::Handle) -> Option<Self::Handle>;

    /// `isinstance(value, class)` semantics, including inherited classes.
    fn is_instance(&self, value: &Self::Handle, class: &Self::Handle) -> bool;

    /// Members for which `predicate` holds, in enumeration order.
    fn members_where(
        &self,
        value: &Self::Handle,
        predicate: &dyn Fn(&Self::Handle) -> bool,
    ) -> Vec<(String, Self::Handle)> {
        self.members(value)
            .into_iter()
            .filter(|(_, member)| predicate(member))
            .collect()
    }

    /// Probe with the fail-safe default applied.
    fn check(&self, value: &Self::Handle, probe: Probe) -> bool {
        self.probe(value, probe).unwrap_or(false)
    }

    /// True when `value` is something the edge extractors can walk.
    fn is_class_like(&self, value: &Self::Handle) -> bool {
        self.check(value, Probe::Class) && self.bases(value).is_some()
    }

    /// `module.name`, or the bare name when the module is unknown or empty.
    fn qualified_name(&self, value: &Self::Handle) -> String {
        let name = self
            .name(value)
            .unwrap_or_else(|| MISSING_NAME.to_string());
        match self.module(value) {
            Some(module) if !module.is_empty() => format!("{module}.{name}"),
            _ => name,
        }
    }
}

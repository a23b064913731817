//! In-memory object model implementing [`Reflect`].
//!
//! Objects live in one arena and are addressed by [`ObjId`]. Handles are
//! [`ObjRef`]s: either an arena object or a method bound to a receiver, which
//! is produced on the fly when an instance's members are enumerated.
//!
//! Semantics follow a dynamic class system with multiple inheritance:
//! every class derives from the universal base `builtins.object`, resolution
//! orders are C3 linearizations (or given explicitly), and each class keeps a
//! live registry of its direct descendants in registration order.

mod c3;
pub mod spec;

use std::collections::{BTreeMap, HashMap};

use reflgraph_error::{Error, Result};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::reflect::{Probe, Reflect};

pub use spec::{ClassSpec, InstanceSpec, ModelSpec, ModuleSpec, ValueSpec};

/// Name of the module holding the universal base.
pub const BUILTINS_MODULE: &str = "builtins";
/// Name of the universal base class.
pub const UNIVERSAL_BASE: &str = "object";

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct ObjId(pub u32);

impl ObjId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for ObjId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle to a value of an [`ObjectModel`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum ObjRef {
    Obj(ObjId),
    /// `func` looked up through the instance `receiver`.
    Bound { func: ObjId, receiver: ObjId },
}

impl ObjRef {
    pub fn id(&self) -> ObjId {
        match self {
            ObjRef::Obj(id) => *id,
            ObjRef::Bound { func, .. } => *func,
        }
    }
}

/// Kinds of plain values a model can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ValueKind {
    Str,
    Number,
    Tuple,
    List,
    Dict,
    Generator,
    Traceback,
    /// Native routine
    Builtin,
    MethodDescriptor,
    /// Property-like attribute; skipped when enumerating through an instance
    DataDescriptor,
    /// Anything else
    Opaque,
}

impl ValueKind {
    fn probe(self) -> Option<Probe> {
        let probe = match self {
            ValueKind::Str => Probe::Str,
            ValueKind::Number => Probe::Number,
            ValueKind::Tuple => Probe::Tuple,
            ValueKind::List => Probe::List,
            ValueKind::Dict => Probe::Dict,
            ValueKind::Generator => Probe::Generator,
            ValueKind::Traceback => Probe::Traceback,
            ValueKind::Builtin => Probe::Builtin,
            ValueKind::MethodDescriptor => Probe::MethodDescriptor,
            ValueKind::DataDescriptor => Probe::DataDescriptor,
            ValueKind::Opaque => return None,
        };
        Some(probe)
    }

    fn type_name(self) -> &'static str {
        match self {
            ValueKind::Str => "str",
            ValueKind::Number => "int",
            ValueKind::Tuple => "tuple",
            ValueKind::List => "list",
            ValueKind::Dict => "dict",
            ValueKind::Generator => "generator",
            ValueKind::Traceback => "traceback",
            ValueKind::Builtin => "builtin_function_or_method",
            ValueKind::MethodDescriptor => "method_descriptor",
            ValueKind::DataDescriptor => "property",
            ValueKind::Opaque => "object",
        }
    }
}

#[derive(Debug, Clone, Default)]
struct ClassData {
    bases: Vec<ObjId>,
    mro: Vec<ObjId>,
    subclasses: Vec<ObjId>,
    is_abstract: bool,
}

#[derive(Debug, Clone)]
enum ObjectKind {
    Module,
    Class(ClassData),
    Function,
    Instance(ObjId),
    Value(ValueKind),
}

#[derive(Debug, Clone)]
struct Object {
    name: Option<String>,
    module: Option<ObjId>,
    kind: ObjectKind,
    attrs: Vec<(String, ObjRef)>,
}

/// Arena of modules, classes, functions, instances and plain values.
#[derive(Debug, Clone)]
pub struct ObjectModel {
    objects: Vec<Object>,
    modules: HashMap<String, ObjId>,
    universal: ObjId,
}

impl Default for ObjectModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectModel {
    /// A model holding only the `builtins` module and the universal base.
    pub fn new() -> Self {
        let mut model = Self {
            objects: Vec::new(),
            modules: HashMap::new(),
            universal: ObjId(0),
        };
        let builtins = model.add_module(BUILTINS_MODULE);
        let universal = model.alloc(Object {
            name: Some(UNIVERSAL_BASE.to_string()),
            module: Some(builtins.id()),
            kind: ObjectKind::Class(ClassData::default()),
            attrs: Vec::new(),
        });
        if let ObjectKind::Class(data) = &mut model.objects[universal.index()].kind {
            data.mro = vec![universal];
        }
        model.universal = universal;
        model.set_attr(&builtins, UNIVERSAL_BASE, ObjRef::Obj(universal));
        model
    }

    fn alloc(&mut self, object: Object) -> ObjId {
        let id = ObjId(self.objects.len() as u32);
        self.objects.push(object);
        id
    }

    fn object(&self, id: ObjId) -> Option<&Object> {
        self.objects.get(id.index())
    }

    fn class_data(&self, id: ObjId) -> Option<&ClassData> {
        match &self.object(id)?.kind {
            ObjectKind::Class(data) => Some(data),
            _ => None,
        }
    }

    fn class_data_mut(&mut self, id: ObjId) -> Option<&mut ClassData> {
        match &mut self.objects.get_mut(id.index())?.kind {
            ObjectKind::Class(data) => Some(data),
            _ => None,
        }
    }

    /// Module an attribute of `owner` would be defined in.
    fn defining_module(&self, owner: &ObjRef) -> Option<ObjId> {
        let object = self.object(owner.id())?;
        match object.kind {
            ObjectKind::Module => Some(owner.id()),
            ObjectKind::Instance(class) => self.object(class)?.module,
            _ => object.module,
        }
    }

    /// The universal base class.
    pub fn universal_base(&self) -> ObjRef {
        ObjRef::Obj(self.universal)
    }

    /// Create a module, or return the existing one with that name.
    pub fn add_module(&mut self, name: &str) -> ObjRef {
        if let Some(id) = self.modules.get(name) {
            return ObjRef::Obj(*id);
        }
        let id = self.alloc(Object {
            name: Some(name.to_string()),
            module: None,
            kind: ObjectKind::Module,
            attrs: Vec::new(),
        });
        self.modules.insert(name.to_string(), id);
        ObjRef::Obj(id)
    }

    /// Look up a module by name.
    pub fn module_named(&self, name: &str) -> Option<ObjRef> {
        self.modules.get(name).map(|id| ObjRef::Obj(*id))
    }

    /// Bind `value` as attribute `name` of `owner`, replacing a previous binding.
    pub fn set_attr(&mut self, owner: &ObjRef, name: &str, value: ObjRef) {
        let Some(object) = self.objects.get_mut(owner.id().index()) else {
            return;
        };
        if let Some(slot) = object.attrs.iter_mut().find(|(key, _)| key == name) {
            slot.1 = value;
        } else {
            object.attrs.push((name.to_string(), value));
        }
    }

    /// Define a function named `name` on a module, class or instance.
    pub fn add_function(&mut self, owner: ObjRef, name: &str) -> ObjRef {
        let module = self.defining_module(&owner);
        let id = self.alloc(Object {
            name: Some(name.to_string()),
            module,
            kind: ObjectKind::Function,
            attrs: Vec::new(),
        });
        self.set_attr(&owner, name, ObjRef::Obj(id));
        ObjRef::Obj(id)
    }

    /// Define a plain value. Plain values carry no name and no module of their
    /// own, except native routines which report both.
    pub fn add_value(&mut self, owner: ObjRef, name: &str, kind: ValueKind) -> ObjRef {
        let (own_name, module) = match kind {
            ValueKind::Builtin => {
                let builtins = self.modules.get(BUILTINS_MODULE).copied();
                (Some(name.to_string()), builtins)
            }
            _ => (None, None),
        };
        let id = self.alloc(Object {
            name: own_name,
            module,
            kind: ObjectKind::Value(kind),
            attrs: Vec::new(),
        });
        self.set_attr(&owner, name, ObjRef::Obj(id));
        ObjRef::Obj(id)
    }

    /// Define a class whose resolution order is the C3 linearization of `bases`.
    /// An empty `bases` means the universal base.
    pub fn add_class(&mut self, module: ObjRef, name: &str, bases: &[ObjRef]) -> Result<ObjRef> {
        self.define_class(module, name, bases, None)
    }

    /// Define a class with an explicit resolution order (`mro` excludes the
    /// class itself). The order is taken verbatim, consistent or not.
    pub fn add_class_with_mro(
        &mut self,
        module: ObjRef,
        name: &str,
        bases: &[ObjRef],
        mro: &[ObjRef],
    ) -> Result<ObjRef> {
        self.define_class(module, name, bases, Some(mro))
    }

    fn define_class(
        &mut self,
        module: ObjRef,
        name: &str,
        bases: &[ObjRef],
        mro: Option<&[ObjRef]>,
    ) -> Result<ObjRef> {
        let qualified = match self.object(module.id()).and_then(|m| m.name.clone()) {
            Some(module_name) => format!("{module_name}.{name}"),
            None => name.to_string(),
        };

        let mut base_ids = Vec::with_capacity(bases.len().max(1));
        for base in bases {
            if self.class_data(base.id()).is_none() {
                return Err(Error::not_class_like(format!("{base:?}"))
                    .with_operation("model::add_class")
                    .with_context("class", qualified.clone()));
            }
            if base_ids.contains(&base.id()) {
                return Err(Error::model_invalid("duplicate base class")
                    .with_operation("model::add_class")
                    .with_context("class", qualified.clone()));
            }
            base_ids.push(base.id());
        }
        if base_ids.is_empty() {
            base_ids.push(self.universal);
        }

        let id = ObjId(self.objects.len() as u32);
        let order = match mro {
            Some(explicit) => {
                let mut order = vec![id];
                order.extend(explicit.iter().map(ObjRef::id));
                order
            }
            None => c3::linearize(id, &base_ids, |base| {
                self.class_data(base)
                    .map(|data| data.mro.clone())
                    .unwrap_or_default()
            })
            .ok_or_else(|| {
                Error::inconsistent_hierarchy(qualified.clone()).with_operation("model::add_class")
            })?,
        };

        let module_id = self.defining_module(&module);
        self.alloc(Object {
            name: Some(name.to_string()),
            module: module_id,
            kind: ObjectKind::Class(ClassData {
                bases: base_ids.clone(),
                mro: order,
                subclasses: Vec::new(),
                is_abstract: false,
            }),
            attrs: Vec::new(),
        });
        for base in base_ids {
            if let Some(data) = self.class_data_mut(base) {
                data.subclasses.push(id);
            }
        }
        self.set_attr(&module, name, ObjRef::Obj(id));
        tracing::trace!("defined class '{}' as {}", qualified, id);
        Ok(ObjRef::Obj(id))
    }

    /// Mark a class abstract.
    pub fn set_abstract(&mut self, class: &ObjRef, is_abstract: bool) {
        if let Some(data) = self.class_data_mut(class.id()) {
            data.is_abstract = is_abstract;
        }
    }

    /// Append `sub` to the descendant registry of `base` without any checks.
    /// Registries may end up listing a class under itself.
    pub fn register_subclass(&mut self, base: &ObjRef, sub: &ObjRef) {
        if let Some(data) = self.class_data_mut(base.id()) {
            data.subclasses.push(sub.id());
        }
    }

    /// Create an instance of `class` bound as `name` on `owner`.
    pub fn add_instance(&mut self, owner: ObjRef, name: &str, class: &ObjRef) -> Result<ObjRef> {
        if self.class_data(class.id()).is_none() {
            return Err(Error::not_class_like(format!("{class:?}"))
                .with_operation("model::add_instance")
                .with_context("instance", name));
        }
        let id = self.alloc(Object {
            name: None,
            module: None,
            kind: ObjectKind::Instance(class.id()),
            attrs: Vec::new(),
        });
        self.set_attr(&owner, name, ObjRef::Obj(id));
        Ok(ObjRef::Obj(id))
    }

    /// Resolve a dotted path such as `sample`, `sample.A` or `pkg.mod.A.f`.
    /// The longest module name prefix wins, the rest walks members.
    pub fn lookup(&self, path: &str) -> Option<ObjRef> {
        let mut split = path.len();
        loop {
            let (head, tail) = path.split_at(split);
            if let Some(module) = self.module_named(head) {
                let mut current = module;
                for part in tail.split('.').filter(|part| !part.is_empty()) {
                    current = self
                        .members(&current)
                        .into_iter()
                        .find(|(name, _)| name == part)
                        .map(|(_, value)| value)?;
                }
                return Some(current);
            }
            split = head.rfind('.')?;
        }
    }

    fn module_name(&self, id: Option<ObjId>) -> Option<String> {
        self.object(id?)?.name.clone()
    }
}

impl Reflect for ObjectModel {
    type Handle = ObjRef;

    fn probe(&self, value: &ObjRef, probe: Probe) -> Option<bool> {
        let object = self.object(value.id())?;
        if let ObjRef::Bound { .. } = value {
            return Some(probe == Probe::Method);
        }
        let answer = match (&object.kind, probe) {
            (ObjectKind::Class(_), Probe::Class) => true,
            (ObjectKind::Class(data), Probe::Abstract) => data.is_abstract,
            (ObjectKind::Function, Probe::Function) => true,
            (ObjectKind::Module, Probe::Module) => true,
            (ObjectKind::Value(kind), probe) => kind.probe() == Some(probe),
            _ => false,
        };
        Some(answer)
    }

    fn name(&self, value: &ObjRef) -> Option<String> {
        self.object(value.id())?.name.clone()
    }

    fn module(&self, value: &ObjRef) -> Option<String> {
        let object = self.object(value.id())?;
        match object.kind {
            ObjectKind::Module => object.name.clone(),
            ObjectKind::Instance(class) => self.module_name(self.object(class)?.module),
            _ => self.module_name(object.module),
        }
    }

    fn type_name(&self, value: &ObjRef) -> String {
        if let ObjRef::Bound { .. } = value {
            return "method".to_string();
        }
        let Some(object) = self.object(value.id()) else {
            return "object".to_string();
        };
        match &object.kind {
            ObjectKind::Module => "module".to_string(),
            ObjectKind::Class(_) => "type".to_string(),
            ObjectKind::Function => "function".to_string(),
            ObjectKind::Instance(class) => self.qualified_name(&ObjRef::Obj(*class)),
            ObjectKind::Value(kind) => kind.type_name().to_string(),
        }
    }

    fn bases(&self, class: &ObjRef) -> Option<Vec<ObjRef>> {
        let data = self.class_data(class.id())?;
        Some(data.bases.iter().map(|id| ObjRef::Obj(*id)).collect())
    }

    fn mro(&self, class: &ObjRef) -> Option<Vec<ObjRef>> {
        let data = self.class_data(class.id())?;
        Some(data.mro.iter().map(|id| ObjRef::Obj(*id)).collect())
    }

    fn subclasses(&self, class: &ObjRef) -> Option<Vec<ObjRef>> {
        let data = self.class_data(class.id())?;
        Some(data.subclasses.iter().map(|id| ObjRef::Obj(*id)).collect())
    }

    fn is_universal_base(&self, class: &ObjRef) -> bool {
        *class == ObjRef::Obj(self.universal)
    }

    fn members(&self, value: &ObjRef) -> Vec<(String, ObjRef)> {
        let ObjRef::Obj(id) = value else {
            return Vec::new();
        };
        let Some(object) = self.object(*id) else {
            return Vec::new();
        };

        let mut members: BTreeMap<String, ObjRef> = BTreeMap::new();
        match &object.kind {
            ObjectKind::Class(data) => {
                for class in &data.mro {
                    let Some(class_object) = self.object(*class) else {
                        continue;
                    };
                    for (name, attr) in &class_object.attrs {
                        members.entry(name.clone()).or_insert(*attr);
                    }
                }
            }
            ObjectKind::Instance(class) => {
                for (name, attr) in &object.attrs {
                    members.insert(name.clone(), *attr);
                }
                for (name, attr) in self.members(&ObjRef::Obj(*class)) {
                    if members.contains_key(&name) {
                        continue;
                    }
                    match self.object(attr.id()).map(|o| &o.kind) {
                        Some(ObjectKind::Function) => {
                            let bound = ObjRef::Bound {
                                func: attr.id(),
                                receiver: *id,
                            };
                            members.insert(name, bound);
                        }
                        Some(ObjectKind::Value(ValueKind::DataDescriptor)) => {}
                        _ => {
                            members.insert(name, attr);
                        }
                    }
                }
            }
            _ => {
                for (name, attr) in &object.attrs {
                    members.insert(name.clone(), *attr);
                }
            }
        }
        members.into_iter().collect()
    }

    fn class_of(&self, value: &ObjRef) -> Option<ObjRef> {
        if let ObjRef::Bound { .. } = value {
            return None;
        }
        match self.object(value.id())?.kind {
            ObjectKind::Instance(class) => Some(ObjRef::Obj(class)),
            _ => None,
        }
    }

    fn is_instance(&self, value: &ObjRef, class: &ObjRef) -> bool {
        let Some(own_class) = self.class_of(value) else {
            return false;
        };
        self.class_data(own_class.id())
            .is_some_and(|data| data.mro.contains(&class.id()))
    }
}

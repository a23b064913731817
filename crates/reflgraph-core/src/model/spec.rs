//! Declarative model files (TOML or JSON) and their loading into an
//! [`ObjectModel`].
//!
//! ```toml
//! [[modules]]
//! name = "sample"
//! functions = ["sample_func", "test"]
//! values = [{ name = "sample_str", kind = "str" }]
//!
//! [[modules.classes]]
//! name = "A"
//! functions = ["__init__"]
//! properties = ["get_name"]
//!
//! [[modules.classes]]
//! name = "B"
//! bases = ["A"]
//!
//! [[modules.instances]]
//! name = "obj_a"
//! class = "A"
//! attach = { dynamicfunc = "test" }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use reflgraph_error::{Error, Result};
use serde::{Deserialize, Serialize};

use super::{ObjRef, ObjectModel, UNIVERSAL_BASE, ValueKind};
use crate::reflect::Reflect;
use crate::stack::StackFrame;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelSpec {
    #[serde(default)]
    pub modules: Vec<ModuleSpec>,
    /// Call stack snapshot for stack tables, innermost frame first.
    #[serde(default)]
    pub stack: Vec<StackFrame>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleSpec {
    pub name: String,
    /// Other modules bound as attributes of this one.
    #[serde(default)]
    pub imports: Vec<String>,
    #[serde(default)]
    pub functions: Vec<String>,
    #[serde(default)]
    pub values: Vec<ValueSpec>,
    #[serde(default)]
    pub classes: Vec<ClassSpec>,
    #[serde(default)]
    pub instances: Vec<InstanceSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValueSpec {
    pub name: String,
    pub kind: ValueKind,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassSpec {
    pub name: String,
    /// Local class names, qualified names, or `object`. Empty means `object`.
    #[serde(default)]
    pub bases: Vec<String>,
    /// Explicit resolution order after the class itself; C3 when absent.
    #[serde(default)]
    pub mro: Option<Vec<String>>,
    #[serde(default)]
    pub functions: Vec<String>,
    #[serde(default)]
    pub properties: Vec<String>,
    #[serde(default)]
    pub values: Vec<ValueSpec>,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    /// Extra entries appended to this class's descendant registry.
    #[serde(default)]
    pub registers: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstanceSpec {
    pub name: String,
    pub class: String,
    /// Attribute name to module function name.
    #[serde(default)]
    pub attach: BTreeMap<String, String>,
    #[serde(default)]
    pub values: Vec<ValueSpec>,
}

impl ModelSpec {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|err| {
            Error::deserialization_failed(err.to_string()).with_operation("model::from_toml_str")
        })
    }

    pub fn from_json_str(source: &str) -> Result<Self> {
        serde_json::from_str(source).map_err(|err| {
            Error::deserialization_failed(err.to_string())
                .with_operation("model::from_json_str")
                .set_source(err)
        })
    }

    /// Read a model file, picking the format from the extension (`.json`,
    /// anything else is TOML).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|err| Error::from(err).with_context("path", path.display().to_string()))?;
        let spec = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&source),
            _ => Self::from_toml_str(&source),
        };
        spec.map_err(|err| err.with_context("path", path.display().to_string()))
    }

    /// Build the object model. Classes may name bases declared later in the
    /// file or in later modules; definition proceeds in passes until every
    /// class is placed.
    #[tracing::instrument(skip_all)]
    pub fn build(&self) -> Result<ObjectModel> {
        let mut model = ObjectModel::new();

        let mut seen = std::collections::HashSet::new();
        for module in &self.modules {
            if module.name.is_empty() || !seen.insert(module.name.as_str()) {
                return Err(Error::model_invalid("module names must be unique and non-empty")
                    .with_operation("model::build")
                    .with_context("module", module.name.clone()));
            }
            let handle = model.add_module(&module.name);
            for function in &module.functions {
                model.add_function(handle, function);
            }
            for value in &module.values {
                model.add_value(handle, &value.name, value.kind);
            }
        }

        for module in &self.modules {
            let handle = model.add_module(&module.name);
            for import in &module.imports {
                let target = model.add_module(import);
                model.set_attr(&handle, import, target);
            }
        }

        self.define_classes(&mut model)?;

        for module in &self.modules {
            let handle = model.add_module(&module.name);
            for class in &module.classes {
                let owner = resolve_class(&model, &module.name, &class.name)?;
                for base in &class.registers {
                    let sub = resolve_class(&model, &module.name, base)?;
                    model.register_subclass(&owner, &sub);
                }
            }
            for instance in &module.instances {
                let class = resolve_class(&model, &module.name, &instance.class)?;
                let object = model.add_instance(handle, &instance.name, &class)?;
                for (attr, function) in &instance.attach {
                    let target = model
                        .lookup(&format!("{}.{}", module.name, function))
                        .ok_or_else(|| {
                            Error::unknown_reference(format!("{}.{}", module.name, function))
                                .with_operation("model::build")
                                .with_context("instance", instance.name.clone())
                        })?;
                    model.set_attr(&object, attr, target);
                }
                for value in &instance.values {
                    model.add_value(object, &value.name, value.kind);
                }
            }
        }

        tracing::debug!("built model with {} modules", self.modules.len());
        Ok(model)
    }

    fn define_classes(&self, model: &mut ObjectModel) -> Result<()> {
        let mut pending: Vec<(&str, &ClassSpec)> = self
            .modules
            .iter()
            .flat_map(|module| {
                let owner = module.name.as_str();
                module.classes.iter().map(move |class| (owner, class))
            })
            .collect();

        while !pending.is_empty() {
            let mut deferred = Vec::new();
            let before = pending.len();

            for (module_name, class) in pending {
                let bases: Option<Vec<ObjRef>> = class
                    .bases
                    .iter()
                    .map(|base| try_resolve_class(model, module_name, base))
                    .collect();
                // outer None: some name is not defined yet; inner None: use C3
                let mro: Option<Option<Vec<ObjRef>>> = match &class.mro {
                    None => Some(None),
                    Some(names) => names
                        .iter()
                        .map(|name| try_resolve_class(model, module_name, name))
                        .collect::<Option<Vec<_>>>()
                        .map(Some),
                };

                let (Some(bases), Some(mro)) = (bases, mro) else {
                    deferred.push((module_name, class));
                    continue;
                };

                let module = model.add_module(module_name);
                let handle = match mro {
                    Some(order) => model.add_class_with_mro(module, &class.name, &bases, &order),
                    None => model.add_class(module, &class.name, &bases),
                }
                .map_err(|err| err.with_operation("model::build"))?;

                model.set_abstract(&handle, class.is_abstract);
                for function in &class.functions {
                    model.add_function(handle, function);
                }
                for property in &class.properties {
                    model.add_value(handle, property, ValueKind::DataDescriptor);
                }
                for value in &class.values {
                    model.add_value(handle, &value.name, value.kind);
                }
            }

            if deferred.len() == before {
                return Err(unresolved_bases(&self.modules, &deferred));
            }
            pending = deferred;
        }
        Ok(())
    }
}

/// Base names that match nothing anywhere are unknown references; otherwise
/// the stuck classes depend on each other.
fn unresolved_bases(modules: &[ModuleSpec], stuck: &[(&str, &ClassSpec)]) -> Error {
    let declared = |module_name: &str, name: &str| {
        name == UNIVERSAL_BASE
            || modules.iter().any(|module| {
                module.classes.iter().any(|class| {
                    (module.name == module_name && class.name == name)
                        || format!("{}.{}", module.name, class.name) == name
                })
            })
    };

    for (module_name, class) in stuck {
        let names = class.bases.iter().chain(class.mro.iter().flatten());
        for name in names {
            if !declared(module_name, name) {
                return Error::unknown_reference(name.clone())
                    .with_operation("model::build")
                    .with_context("class", format!("{}.{}", module_name, class.name));
            }
        }
    }

    let (module_name, class) = stuck[0];
    Error::inconsistent_hierarchy(format!("{}.{}", module_name, class.name))
        .with_operation("model::build")
        .with_context("reason", "cyclic bases")
}

fn try_resolve_class(model: &ObjectModel, module_name: &str, name: &str) -> Option<ObjRef> {
    if name == UNIVERSAL_BASE {
        return Some(model.universal_base());
    }
    model
        .lookup(&format!("{module_name}.{name}"))
        .or_else(|| model.lookup(name))
        .filter(|handle| model.is_class_like(handle))
}

fn resolve_class(model: &ObjectModel, module_name: &str, name: &str) -> Result<ObjRef> {
    try_resolve_class(model, module_name, name).ok_or_else(|| {
        Error::unknown_reference(name)
            .with_operation("model::resolve_class")
            .with_context("module", module_name)
    })
}

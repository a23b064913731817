use reflgraph_core::{ModelSpec, ObjRef, ObjectModel, Probe, Reflect};
use tracing_subscriber::EnvFilter;

pub const SAMPLE_MODEL: &str = include_str!("../../../../demos/sample.toml");

/// A, B(A), C(B) and D(A, B). D's resolution order is given explicitly
/// since no C3 order exists for those bases.
pub const HIERARCHY_MODEL: &str = r#"
    [[modules]]
    name = "h"

    [[modules.classes]]
    name = "A"

    [[modules.classes]]
    name = "B"
    bases = ["A"]

    [[modules.classes]]
    name = "C"
    bases = ["B"]

    [[modules.classes]]
    name = "D"
    bases = ["A", "B"]
    mro = ["B", "A", "object"]
"#;

#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()))
        .with_test_writer()
        .try_init();
}

#[allow(dead_code)]
pub fn load(source: &str) -> ObjectModel {
    init_tracing();
    ModelSpec::from_toml_str(source)
        .expect("parse model")
        .build()
        .expect("build model")
}

#[allow(dead_code)]
pub fn lookup(model: &ObjectModel, path: &str) -> ObjRef {
    model
        .lookup(path)
        .unwrap_or_else(|| panic!("'{path}' is not in the model"))
}

#[allow(dead_code)]
pub fn pairs(edges: &[(&str, &str)]) -> Vec<(String, String)> {
    edges
        .iter()
        .map(|(child, parent)| (child.to_string(), parent.to_string()))
        .collect()
}

/// Bare class table for providers that answer less than `ObjectModel`:
/// classes may lack a name, and same-named classes may coexist. Index 0 is
/// the universal base.
#[allow(dead_code)]
pub struct BareClasses {
    classes: Vec<BareClass>,
}

#[allow(dead_code)]
struct BareClass {
    name: Option<String>,
    bases: Vec<usize>,
    mro: Vec<usize>,
    subclasses: Vec<usize>,
}

#[allow(dead_code)]
impl BareClasses {
    pub const MODULE: &'static str = "bare";

    pub fn new() -> Self {
        Self {
            classes: vec![BareClass {
                name: Some("object".to_string()),
                bases: Vec::new(),
                mro: vec![0],
                subclasses: Vec::new(),
            }],
        }
    }

    /// Add a class over single-inheritance `bases`; the order is the class
    /// followed by its first base's order.
    pub fn add(&mut self, name: Option<&str>, bases: &[usize]) -> usize {
        let id = self.classes.len();
        let mut mro = vec![id];
        if let Some(first) = bases.first() {
            mro.extend(self.classes[*first].mro.iter().copied());
        }
        self.classes.push(BareClass {
            name: name.map(str::to_string),
            bases: bases.to_vec(),
            mro,
            subclasses: Vec::new(),
        });
        for base in bases {
            self.register(*base, id);
        }
        id
    }

    pub fn register(&mut self, base: usize, sub: usize) {
        self.classes[base].subclasses.push(sub);
    }
}

impl Reflect for BareClasses {
    type Handle = usize;

    fn probe(&self, _value: &usize, probe: Probe) -> Option<bool> {
        Some(probe == Probe::Class)
    }

    fn name(&self, value: &usize) -> Option<String> {
        self.classes[*value].name.clone()
    }

    fn module(&self, value: &usize) -> Option<String> {
        let module = if *value == 0 { "builtins" } else { Self::MODULE };
        Some(module.to_string())
    }

    fn type_name(&self, _value: &usize) -> String {
        "type".to_string()
    }

    fn bases(&self, class: &usize) -> Option<Vec<usize>> {
        Some(self.classes[*class].bases.clone())
    }

    fn mro(&self, class: &usize) -> Option<Vec<usize>> {
        Some(self.classes[*class].mro.clone())
    }

    fn subclasses(&self, class: &usize) -> Option<Vec<usize>> {
        Some(self.classes[*class].subclasses.clone())
    }

    fn is_universal_base(&self, class: &usize) -> bool {
        *class == 0
    }

    fn members(&self, _value: &usize) -> Vec<(String, usize)> {
        Vec::new()
    }

    fn class_of(&self, _value: &usize) -> Option<usize> {
        None
    }

    fn is_instance(&self, _value: &usize, _class: &usize) -> bool {
        false
    }
}

//! Module graph built from descriptor units

use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleInfo {
    pub name: String,
    pub requires: Vec<String>,
    pub exports: Vec<String>,
    /// Descriptor unit that declared the module
    pub unit_name: String,
}

#[derive(Debug, Default)]
pub struct ModuleGraph {
    modules: BTreeMap<String, ModuleInfo>,
}

impl ModuleGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a module; returns `false` if the name is already taken
    pub fn declare(&mut self, info: ModuleInfo) -> bool {
        if self.modules.contains_key(&info.name) {
            return false;
        }
        self.modules.insert(info.name.clone(), info);
        true
    }

    pub fn get(&self, name: &str) -> Option<&ModuleInfo> {
        self.modules.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Module owning `package`: the longest module name equal to it or prefixing it
    pub fn owner_of(&self, package: &str) -> Option<&str> {
        self.modules
            .keys()
            .filter(|module| {
                package == module.as_str()
                    || (package.starts_with(module.as_str())
                        && package[module.len()..].starts_with('.'))
            })
            .max_by_key(|module| module.len())
            .map(String::as_str)
    }

    pub fn reads(&self, from: &str, to: &str) -> bool {
        from == to
            || self
                .modules
                .get(from)
                .is_some_and(|m| m.requires.iter().any(|r| r == to))
    }

    pub fn exports(&self, module: &str, package: &str) -> bool {
        self.modules
            .get(module)
            .is_some_and(|m| m.exports.iter().any(|e| e == package))
    }

    /// Whether code in module `from` may use a type of `package` owned by module `to`
    ///
    /// The unnamed module (`None`) on either side imposes no restriction.
    pub fn can_access(&self, from: Option<&str>, to: Option<&str>, package: &str) -> bool {
        match (from, to) {
            (Some(from), Some(to)) if from != to => self.reads(from, to) && self.exports(to, package),
            _ => true,
        }
    }
}

//! Batch-wide symbol table and processing list

use super::binding::{FieldBinding, MethodBinding, ProblemReporter, TypeBinding};
use super::error::EnvironmentError;
use super::modules::{ModuleGraph, ModuleInfo};
use super::provider::UnitProvider;
use super::verifier::MethodVerifier;
use crate::compiler::ast::{Ty, TypeRef};
use crate::compiler::lexer::Coordinate;
use crate::compiler::parser::Parser;
use crate::compiler::result::{Category, CompilationResult, Diagnostic};
use crate::compiler::tree::{DeclarationTree, TreeState, UnitScope};
use crate::compiler::unit::SourceUnit;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use strata_config::{CompilerConfig, Phase};
use strata_log::{debug, info, Logger};

/// Shared lookup context for one batch run
///
/// Owns the live processing list the driver walks. The list only ever grows:
/// registering a batch appends to it, and so does resolving a name that
/// the [`UnitProvider`] can supply.
pub struct LookupEnvironment {
    pub(super) max_problems: usize,
    pub(super) parser: Parser,
    pub(super) units: Vec<Option<DeclarationTree>>,
    pub(super) types: HashMap<String, TypeBinding>,
    pub(super) modules: ModuleGraph,
    provider: Option<Box<dyn UnitProvider>>,
    /// Names already asked of the provider
    requested: HashSet<String>,
    unit_names: HashSet<String>,
    pub(super) logger: Arc<Logger>,
}

impl LookupEnvironment {
    pub fn new(config: &CompilerConfig, logger: Arc<Logger>) -> Self {
        Self {
            max_problems: config.max_problems_per_unit,
            parser: Parser::with_logger(logger.clone()),
            units: Vec::new(),
            types: HashMap::new(),
            modules: ModuleGraph::new(),
            provider: None,
            requested: HashSet::new(),
            unit_names: HashSet::new(),
            logger,
        }
    }

    pub fn with_provider(mut self, provider: impl UnitProvider + 'static) -> Self {
        self.provider = Some(Box::new(provider));
        self
    }

    pub fn parser(&self) -> &Parser {
        &self.parser
    }

    pub fn parser_mut(&mut self) -> &mut Parser {
        &mut self.parser
    }

    pub fn modules(&self) -> &ModuleGraph {
        &self.modules
    }

    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }

    // ==================== Registration ====================

    /// Diet-parse each unit, register its declarations and append it to the processing list
    pub fn register_units(&mut self, units: Vec<SourceUnit>) {
        let total = self.units.len() + units.len();
        let count = units.len();

        for unit in units {
            let index = self.units.len();
            let result = CompilationResult::new(unit.name(), index, total, self.max_problems);
            let tree = self.parser.parse(&unit, result);
            self.bind(tree);
        }

        debug!(
            self.logger,
            target: Phase::Bind.target(),
            "registered {} units: {} types, {} modules",
            count,
            self.types.len(),
            self.modules.len()
        );
    }

    fn bind(&mut self, mut tree: DeclarationTree) {
        if tree.is_module_descriptor() {
            self.bind_descriptor(&mut tree);
        } else {
            self.bind_types(&mut tree);
        }
        tree.advance(TreeState::Bound);
        self.unit_names.insert(tree.file_name().to_string());
        self.units.push(Some(tree));
    }

    fn bind_descriptor(&mut self, tree: &mut DeclarationTree) {
        let Some(module) = tree.module.as_ref() else {
            return;
        };
        let name = module.name.name.clone();
        let declared = self.modules.declare(ModuleInfo {
            name: name.clone(),
            requires: module.requires.iter().map(|r| r.name.clone()).collect(),
            exports: module.exports.iter().map(|e| e.name.clone()).collect(),
            unit_name: tree.unit.name().to_string(),
        });

        if !declared {
            let at = module.name.coordinate;
            tree.result.error(Category::Binding, format!("Duplicate module {name}"), at);
            return;
        }
        tree.scope = Some(UnitScope {
            package: String::new(),
            module: Some(name),
            imports: Vec::new(),
        });
    }

    fn bind_types(&mut self, tree: &mut DeclarationTree) {
        if tree.package_malformed {
            debug!(
                self.logger,
                target: Phase::Bind.target(),
                "{} has a malformed package clause and gets no scope",
                tree.file_name()
            );
            return;
        }

        let package = tree.package_name().to_string();
        let scope = UnitScope {
            module: self.modules.owner_of(&package).map(str::to_string),
            package,
            imports: tree.imports.iter().map(|i| i.name.clone()).collect(),
        };
        let unit_name = tree.unit.name().to_string();

        for decl in &tree.types {
            let qualified = scope.qualify(&decl.name);
            if self.types.contains_key(&qualified) {
                tree.result.error(
                    Category::Binding,
                    format!("The type {qualified} is already defined"),
                    decl.coordinate,
                );
                continue;
            }
            let binding = TypeBinding::new(qualified.clone(), decl, &unit_name, &scope);
            self.types.insert(qualified, binding);
        }

        tree.scope = Some(scope);
    }

    // ==================== Processing list ====================

    /// Current length; re-read it, units can be appended at any time
    pub fn processing_len(&self) -> usize {
        self.units.len()
    }

    pub fn unit_at(&self, index: usize) -> Option<&DeclarationTree> {
        self.units.get(index).and_then(Option::as_ref)
    }

    /// Lend the tree at `index` to the caller until [`restore_unit`](Self::restore_unit)
    pub fn take_unit(&mut self, index: usize) -> Result<DeclarationTree, EnvironmentError> {
        self.units
            .get_mut(index)
            .and_then(Option::take)
            .ok_or(EnvironmentError::CorruptProcessingList {
                index,
                reason: "no unit to take",
            })
    }

    pub fn restore_unit(&mut self, index: usize, tree: DeclarationTree) -> Result<(), EnvironmentError> {
        let slot = self
            .units
            .get_mut(index)
            .ok_or(EnvironmentError::CorruptProcessingList {
                index,
                reason: "position out of range",
            })?;
        if slot.is_some() {
            return Err(EnvironmentError::CorruptProcessingList {
                index,
                reason: "slot already occupied",
            });
        }
        *slot = Some(tree);
        Ok(())
    }

    /// Move every tree out of the processing list, keeping list order
    pub fn take_trees(&mut self) -> Vec<DeclarationTree> {
        self.units.iter_mut().filter_map(Option::take).collect()
    }

    // ==================== Type lookup ====================

    pub fn binding(&self, qualified: &str) -> Option<&TypeBinding> {
        self.types.get(qualified)
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// Whether `qualified` names a known type, asking the provider once if it does not
    pub fn find_type(&mut self, qualified: &str) -> Result<bool, EnvironmentError> {
        if self.types.contains_key(qualified) {
            return Ok(true);
        }
        let Some(provider) = self.provider.as_mut() else {
            return Ok(false);
        };
        if !self.requested.insert(qualified.to_string()) {
            return Ok(false);
        }

        let found = provider
            .find_unit(qualified)
            .map_err(|source| EnvironmentError::Provider {
                name: qualified.to_string(),
                source,
            })?;

        if let Some(unit) = found {
            if self.unit_names.contains(unit.name()) {
                debug!(
                    self.logger,
                    target: Phase::Bind.target(),
                    "{} is already registered; not adding it again",
                    unit.name()
                );
            } else {
                info!(
                    self.logger,
                    target: Phase::Bind.target(),
                    "{} pulled in to resolve {}",
                    unit.name(),
                    qualified
                );
                let index = self.units.len();
                let result = CompilationResult::new(unit.name(), index, index + 1, self.max_problems);
                let tree = self.parser.parse(&unit, result);
                self.bind(tree);
            }
        }

        Ok(self.types.contains_key(qualified))
    }

    /// Qualified name `name` refers to from `scope`
    ///
    /// Dotted names are taken as qualified. Simple names are looked up through
    /// single-type imports first, then in the unit's own package.
    pub fn resolve_type_name(&mut self, scope: &UnitScope, name: &str) -> Result<Option<String>, EnvironmentError> {
        if name.contains('.') {
            return Ok(self.find_type(name)?.then(|| name.to_string()));
        }

        let suffix = format!(".{name}");
        if let Some(import) = scope.imports.iter().find(|i| i.ends_with(&suffix)) {
            return Ok(self.find_type(import)?.then(|| import.clone()));
        }

        let own = scope.qualify(name);
        Ok(self.find_type(&own)?.then_some(own))
    }

    /// Resolve a written type, reporting unknown or inaccessible types
    pub fn resolve_type_ref(
        &mut self,
        scope: &UnitScope,
        type_ref: &TypeRef,
        category: Category,
        problems: &mut dyn ProblemReporter,
    ) -> Result<Ty, EnvironmentError> {
        if let Some(primitive) = type_ref.primitive() {
            return Ok(primitive);
        }

        match self.resolve_type_name(scope, &type_ref.name)? {
            Some(qualified) => {
                if let Some(problem) = self.access_problem(scope, &qualified, type_ref.coordinate, category) {
                    problems.report(problem);
                }
                Ok(Ty::Class(qualified))
            }
            None => {
                problems.report(Diagnostic::error(
                    category,
                    format!("{} cannot be resolved to a type", type_ref.name),
                    type_ref.coordinate,
                ));
                Ok(Ty::Unknown)
            }
        }
    }

    pub fn is_accessible(&self, from_module: Option<&str>, qualified: &str) -> bool {
        let Some(binding) = self.types.get(qualified) else {
            return true;
        };
        self.modules.can_access(
            from_module,
            binding.scope.module.as_deref(),
            &binding.scope.package,
        )
    }

    pub fn access_problem(
        &self,
        scope: &UnitScope,
        qualified: &str,
        at: Coordinate,
        category: Category,
    ) -> Option<Diagnostic> {
        let from = scope.module.as_deref()?;
        if self.is_accessible(Some(from), qualified) {
            return None;
        }
        Some(Diagnostic::error(
            category,
            format!("The type {qualified} is not accessible from module {from}"),
            at,
        ))
    }

    // ==================== Hierarchy queries ====================

    /// All supertypes of `qualified`, nearest first, each once
    pub fn ancestors(&self, qualified: &str) -> Vec<String> {
        let mut out = Vec::new();
        let mut seen = HashSet::from([qualified.to_string()]);
        let mut queue: VecDeque<String> = self
            .types
            .get(qualified)
            .map(|b| b.supertypes().cloned().collect())
            .unwrap_or_default();

        while let Some(next) = queue.pop_front() {
            if !seen.insert(next.clone()) {
                continue;
            }
            if let Some(binding) = self.types.get(&next) {
                queue.extend(binding.supertypes().cloned());
            }
            out.push(next);
        }
        out
    }

    pub fn is_subtype(&self, sub: &str, sup: &str) -> bool {
        sub == sup || self.ancestors(sub).iter().any(|a| a == sup)
    }

    /// Field `name` declared in `qualified` or inherited by it
    pub fn find_field(&self, qualified: &str, name: &str) -> Option<&FieldBinding> {
        std::iter::once(qualified.to_string())
            .chain(self.ancestors(qualified))
            .filter_map(|t| self.types.get(&t))
            .find_map(|b| b.fields.iter().find(|f| f.name == name))
    }

    /// Methods called `name` visible in `qualified`, own declarations first
    pub fn find_methods(&self, qualified: &str, name: &str) -> Vec<&MethodBinding> {
        std::iter::once(qualified.to_string())
            .chain(self.ancestors(qualified))
            .filter_map(|t| self.types.get(&t))
            .flat_map(|b| b.methods.iter().filter(|m| m.name == name))
            .collect()
    }

    pub fn method_verifier(&self) -> MethodVerifier<'_> {
        MethodVerifier::new(self)
    }
}

impl std::fmt::Debug for LookupEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupEnvironment")
            .field("units", &self.units.len())
            .field("types", &self.types.len())
            .field("modules", &self.modules.len())
            .field("has_provider", &self.provider.is_some())
            .finish()
    }
}

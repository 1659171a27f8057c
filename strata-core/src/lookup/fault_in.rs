//! On-demand completion of type bindings
//!
//! Bindings start as skeletons. Their supertypes and members are resolved the
//! first time something needs them, which may be a different unit than the
//! one declaring the type. Problems found on the way wait on the binding until
//! the declaring unit collects them.

use super::binding::{FaultState, FieldBinding, MethodBinding, TypeBinding};
use super::environment::LookupEnvironment;
use super::error::EnvironmentError;
use crate::compiler::ast::{ModuleDecl, Ty, TypeRef};
use crate::compiler::result::{Category, CompilationResult, Diagnostic};
use crate::compiler::tree::{DeclarationTree, TreeState, UnitScope};
use std::collections::HashSet;
use strata_config::Phase;
use strata_log::debug;

impl LookupEnvironment {
    /// Complete `qualified` and every type above it
    pub fn fault_in_closure(&mut self, qualified: &str) -> Result<(), EnvironmentError> {
        let mut pending = vec![qualified.to_string()];
        let mut seen = HashSet::new();

        while let Some(next) = pending.pop() {
            if !seen.insert(next.clone()) {
                continue;
            }
            self.fault_in_supertypes(&next)?;
            self.fault_in_members(&next)?;
            if let Some(binding) = self.types.get(&next) {
                pending.extend(binding.supertypes().cloned());
            }
        }
        Ok(())
    }

    /// Problems recorded against `qualified` since the last call
    pub fn take_problems(&mut self, qualified: &str) -> Vec<Diagnostic> {
        self.types
            .get_mut(qualified)
            .map(|b| std::mem::take(&mut b.problems))
            .unwrap_or_default()
    }

    fn fault_in_supertypes(&mut self, qualified: &str) -> Result<(), EnvironmentError> {
        let Some(binding) = self.types.get_mut(qualified) else {
            return Ok(());
        };
        if binding.hierarchy != FaultState::Pending {
            return Ok(());
        }
        binding.hierarchy = FaultState::InProgress;
        let decl = binding.decl.clone();
        let scope = binding.scope.clone();
        let this = binding.simple_name().to_string();

        let mut problems = Vec::new();
        let mut superclass = None;
        let mut interfaces: Vec<String> = Vec::new();

        if let Some(written) = &decl.superclass {
            if let Some(found) = self.resolve_supertype(&scope, written, &mut problems)? {
                if self.types.get(&found).is_some_and(TypeBinding::is_class) {
                    superclass = Some(found);
                } else {
                    problems.push(Diagnostic::error(
                        Category::Binding,
                        format!(
                            "The type {} cannot be the superclass of {this}; a superclass must be a class",
                            written.name
                        ),
                        written.coordinate,
                    ));
                }
            }
        }

        for written in &decl.interfaces {
            let Some(found) = self.resolve_supertype(&scope, written, &mut problems)? else {
                continue;
            };
            if !self.types.get(&found).is_some_and(TypeBinding::is_interface) {
                problems.push(Diagnostic::error(
                    Category::Binding,
                    format!(
                        "The type {} cannot be a superinterface of {this}; a superinterface must be an interface",
                        written.name
                    ),
                    written.coordinate,
                ));
            } else if interfaces.contains(&found) {
                problems.push(Diagnostic::error(
                    Category::Binding,
                    format!("Duplicate interface {} for the type {this}", written.name),
                    written.coordinate,
                ));
            } else {
                interfaces.push(found);
            }
        }

        if let Some(binding) = self.types.get_mut(qualified) {
            binding.superclass = superclass;
            binding.interfaces = interfaces;
            binding.hierarchy = FaultState::Done;
            binding.problems.extend(problems);
        }

        if self.inherits_from_itself(qualified)? {
            debug!(
                self.logger,
                target: Phase::FaultIn.target(),
                "cycle through {}; supertypes dropped",
                qualified
            );
            if let Some(binding) = self.types.get_mut(qualified) {
                binding.superclass = None;
                binding.interfaces.clear();
                binding.problems.push(Diagnostic::error(
                    Category::Binding,
                    format!("The hierarchy of the type {this} is inconsistent"),
                    decl.coordinate,
                ));
            }
        }
        Ok(())
    }

    fn resolve_supertype(
        &mut self,
        scope: &UnitScope,
        written: &TypeRef,
        problems: &mut Vec<Diagnostic>,
    ) -> Result<Option<String>, EnvironmentError> {
        if written.primitive().is_some() {
            problems.push(Diagnostic::error(
                Category::Binding,
                format!("The primitive type {} cannot be a supertype", written.name),
                written.coordinate,
            ));
            return Ok(None);
        }

        let Some(found) = self.resolve_type_name(scope, &written.name)? else {
            problems.push(Diagnostic::error(
                Category::Binding,
                format!("{} cannot be resolved to a type", written.name),
                written.coordinate,
            ));
            return Ok(None);
        };

        if let Some(problem) = self.access_problem(scope, &found, written.coordinate, Category::Binding) {
            problems.push(problem);
            return Ok(None);
        }
        Ok(Some(found))
    }

    fn inherits_from_itself(&mut self, start: &str) -> Result<bool, EnvironmentError> {
        let mut stack: Vec<String> = match self.types.get(start) {
            Some(binding) => binding.supertypes().cloned().collect(),
            None => return Ok(false),
        };
        let mut seen = HashSet::new();

        while let Some(next) = stack.pop() {
            if next == start {
                return Ok(true);
            }
            if !seen.insert(next.clone()) {
                continue;
            }
            self.fault_in_supertypes(&next)?;
            if let Some(binding) = self.types.get(&next) {
                stack.extend(binding.supertypes().cloned());
            }
        }
        Ok(false)
    }

    fn fault_in_members(&mut self, qualified: &str) -> Result<(), EnvironmentError> {
        let Some(binding) = self.types.get_mut(qualified) else {
            return Ok(());
        };
        if binding.members != FaultState::Pending {
            return Ok(());
        }
        binding.members = FaultState::InProgress;
        let decl = binding.decl.clone();
        let scope = binding.scope.clone();
        let this = binding.simple_name().to_string();

        let mut problems: Vec<Diagnostic> = Vec::new();
        let mut fields: Vec<FieldBinding> = Vec::new();
        let mut methods: Vec<MethodBinding> = Vec::new();

        for field in &decl.fields {
            let mut ty = self.resolve_type_ref(&scope, &field.ty, Category::Binding, &mut problems)?;
            if ty == Ty::Void {
                problems.push(Diagnostic::error(
                    Category::Binding,
                    format!("void is an invalid type for the field {}", field.name),
                    field.ty.coordinate,
                ));
                ty = Ty::Unknown;
            }
            if fields.iter().any(|f| f.name == field.name) {
                problems.push(Diagnostic::error(
                    Category::Binding,
                    format!("Duplicate field {this}.{}", field.name),
                    field.coordinate,
                ));
                continue;
            }
            fields.push(FieldBinding {
                name: field.name.clone(),
                ty,
                declaring_type: qualified.to_string(),
            });
        }

        for method in &decl.methods {
            let return_type =
                self.resolve_type_ref(&scope, &method.return_type, Category::Binding, &mut problems)?;

            let mut params = Vec::with_capacity(method.params.len());
            let mut names: Vec<&str> = Vec::new();
            for param in &method.params {
                let mut ty = self.resolve_type_ref(&scope, &param.ty, Category::Binding, &mut problems)?;
                if ty == Ty::Void {
                    problems.push(Diagnostic::error(
                        Category::Binding,
                        format!("void is an invalid type for the parameter {}", param.name),
                        param.ty.coordinate,
                    ));
                    ty = Ty::Unknown;
                }
                if names.contains(&param.name.as_str()) {
                    problems.push(Diagnostic::error(
                        Category::Binding,
                        format!("Duplicate parameter {}", param.name),
                        param.coordinate,
                    ));
                }
                names.push(&param.name);
                params.push(ty);
            }

            let binding = MethodBinding {
                name: method.name.clone(),
                params,
                return_type,
                is_abstract: method.is_abstract,
                declaring_type: qualified.to_string(),
                coordinate: method.coordinate,
            };
            if methods.iter().any(|m| m.same_parameters(&binding)) {
                problems.push(Diagnostic::error(
                    Category::Binding,
                    format!("Duplicate method {binding} in type {this}"),
                    method.coordinate,
                ));
            }
            methods.push(binding);
        }

        if let Some(binding) = self.types.get_mut(qualified) {
            binding.fields = fields;
            binding.methods = methods;
            binding.members = FaultState::Done;
            binding.problems.extend(problems);
        }
        Ok(())
    }
}

/// Complete everything a unit declares and check its imports
///
/// Units without a scope are left untouched apart from the state change.
pub fn fault_in_unit(env: &mut LookupEnvironment, tree: &mut DeclarationTree) -> Result<(), EnvironmentError> {
    if let Some(scope) = tree.scope.clone() {
        match tree.module.clone() {
            Some(module) => check_descriptor(env, &module, &mut tree.result),
            None => {
                check_imports(env, &scope, tree)?;
                fault_in_declared_types(env, &scope, tree)?;
            }
        }
    }
    tree.advance(TreeState::FaultedIn);
    Ok(())
}

fn check_descriptor(env: &LookupEnvironment, module: &ModuleDecl, result: &mut CompilationResult) {
    let name = &module.name.name;

    for required in &module.requires {
        if &required.name == name {
            result.error(
                Category::Binding,
                format!("Cycle detected: the module {name} requires itself"),
                required.coordinate,
            );
        } else if !env.modules().contains(&required.name) {
            result.error(
                Category::Binding,
                format!("{} cannot be resolved to a module", required.name),
                required.coordinate,
            );
        }
    }

    for exported in &module.exports {
        if env.modules().owner_of(&exported.name) != Some(name.as_str()) {
            result.error(
                Category::Binding,
                format!("The package {} is not owned by module {name}", exported.name),
                exported.coordinate,
            );
        }
    }
}

fn check_imports(
    env: &mut LookupEnvironment,
    scope: &UnitScope,
    tree: &mut DeclarationTree,
) -> Result<(), EnvironmentError> {
    let mut seen = HashSet::new();

    for import in &tree.imports {
        if !seen.insert(import.name.as_str()) {
            tree.result.warning(
                Category::Binding,
                format!("The import {} is repeated", import.name),
                import.coordinate,
            );
            continue;
        }
        if !env.find_type(&import.name)? {
            tree.result.error(
                Category::Binding,
                format!("The import {} cannot be resolved", import.name),
                import.coordinate,
            );
            continue;
        }
        if let Some(problem) = env.access_problem(scope, &import.name, import.coordinate, Category::Binding) {
            tree.result.record(problem);
        }
    }
    Ok(())
}

fn fault_in_declared_types(
    env: &mut LookupEnvironment,
    scope: &UnitScope,
    tree: &mut DeclarationTree,
) -> Result<(), EnvironmentError> {
    let unit_name = tree.unit.name().to_string();

    for decl in &tree.types {
        let qualified = scope.qualify(&decl.name);
        // Duplicates were bound to the first unit declaring them
        if !env.binding(&qualified).is_some_and(|b| b.unit_name == unit_name) {
            continue;
        }
        env.fault_in_closure(&qualified)?;
        for problem in env.take_problems(&qualified) {
            tree.result.record(problem);
        }
    }

    debug!(
        env.logger(),
        target: Phase::FaultIn.target(),
        "{}: {} types completed",
        unit_name,
        tree.types.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::SourceUnit;
    use strata_config::CompilerConfig;
    use strata_log::Logger;

    fn fault_in(sources: &[(&str, &str)]) -> (LookupEnvironment, Vec<DeclarationTree>) {
        let mut env = LookupEnvironment::new(&CompilerConfig::default(), Logger::noop());
        env.register_units(
            sources
                .iter()
                .map(|(name, text)| SourceUnit::new(*name, *text))
                .collect(),
        );
        let mut trees = Vec::new();
        for i in 0..env.processing_len() {
            let mut tree = env.take_unit(i).unwrap();
            fault_in_unit(&mut env, &mut tree).unwrap();
            trees.push(tree);
        }
        (env, trees)
    }

    fn messages(tree: &DeclarationTree) -> Vec<String> {
        tree.result.diagnostics().iter().map(|d| d.message.clone()).collect()
    }

    #[test]
    fn test_hierarchy_completed_across_units() {
        let (env, trees) = fault_in(&[
            ("Square.strata", "class Square extends Shape implements Named {}"),
            ("Shape.strata", "abstract class Shape { int sides; abstract int area(); }"),
            ("Named.strata", "interface Named { int name(); }"),
        ]);

        assert!(trees.iter().all(|t| !t.has_errors()));
        let square = env.binding("Square").unwrap();
        assert_eq!(square.superclass.as_deref(), Some("Shape"));
        assert_eq!(square.interfaces, vec!["Named".to_string()]);
        assert_eq!(env.ancestors("Square"), vec!["Shape".to_string(), "Named".to_string()]);
        assert_eq!(env.binding("Shape").unwrap().members, FaultState::Done);
        assert!(env.find_field("Square", "sides").is_some());
        assert_eq!(env.find_methods("Square", "area").len(), 1);
        assert_eq!(trees[0].state(), TreeState::FaultedIn);
    }

    #[test]
    fn test_problems_land_in_declaring_unit() {
        let (_, trees) = fault_in(&[
            ("User.strata", "class User extends Base {}"),
            ("Base.strata", "class Base { void broken; }"),
        ]);

        assert!(!trees[0].has_errors());
        assert_eq!(messages(&trees[1]), vec!["void is an invalid type for the field broken"]);
    }

    #[test]
    fn test_superclass_must_be_class() {
        let (env, trees) = fault_in(&[
            ("A.strata", "class A extends I implements B {}"),
            ("I.strata", "interface I {}"),
            ("B.strata", "class B {}"),
        ]);

        assert_eq!(
            messages(&trees[0]),
            vec![
                "The type I cannot be the superclass of A; a superclass must be a class",
                "The type B cannot be a superinterface of A; a superinterface must be an interface",
            ]
        );
        assert!(env.binding("A").unwrap().superclass.is_none());
    }

    #[test]
    fn test_cycle_is_reported_and_broken() {
        let (env, trees) = fault_in(&[
            ("A.strata", "class A extends B {}"),
            ("B.strata", "class B extends A {}"),
        ]);

        // A is completed first and pulls in B, which closes the loop
        assert!(!trees[0].has_errors());
        assert_eq!(messages(&trees[1]), vec!["The hierarchy of the type B is inconsistent"]);
        assert_eq!(env.ancestors("A"), vec!["B".to_string()]);
        assert!(env.ancestors("B").is_empty());
    }

    #[test]
    fn test_duplicate_members() {
        let (_, trees) = fault_in(&[(
            "C.strata",
            "class C { int x; int x; int m(int a) { return a; } int m(int b) { return b; } }",
        )]);

        assert_eq!(
            messages(&trees[0]),
            vec!["Duplicate field C.x", "Duplicate method C.m(int) in type C"]
        );
    }

    #[test]
    fn test_imports() {
        let (_, trees) = fault_in(&[
            (
                "app/Main.strata",
                "package app; import lib.Tool; import lib.Tool; import lib.Ghost; class Main {}",
            ),
            ("lib/Tool.strata", "package lib; class Tool {}"),
        ]);

        let main = &trees[0];
        assert_eq!(
            messages(main),
            vec!["The import lib.Tool is repeated", "The import lib.Ghost cannot be resolved"]
        );
        assert_eq!(main.result.errors().count(), 1);
    }

    #[test]
    fn test_module_access() {
        let (_, trees) = fault_in(&[
            ("core/module-info.strata", "module core { exports core.api; }"),
            ("app/module-info.strata", "module app { requires core; requires ghost; }"),
            ("core/api/Api.strata", "package core.api; class Api {}"),
            ("core/impl/Secret.strata", "package core.impl; class Secret {}"),
            (
                "app/Main.strata",
                "package app; import core.api.Api; import core.impl.Secret; class Main {}",
            ),
        ]);

        assert!(!trees[0].has_errors());
        assert_eq!(messages(&trees[1]), vec!["ghost cannot be resolved to a module"]);
        assert_eq!(
            messages(&trees[4]),
            vec!["The type core.impl.Secret is not accessible from module app"]
        );
    }

    #[test]
    fn test_unscoped_unit_only_advances() {
        let (_, trees) = fault_in(&[("A.strata", "package ; import x.Y; class A extends Z {}")]);
        assert_eq!(trees[0].state(), TreeState::FaultedIn);
        assert!(!trees[0].result.has_errors_in(Category::Binding));
    }
}

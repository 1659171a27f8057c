//! Method checks that need the completed hierarchy

use super::binding::{FaultState, MethodBinding, TypeBinding};
use super::environment::LookupEnvironment;
use crate::compiler::ast::{Body, TypeDecl, TypeKind};
use crate::compiler::result::{Category, CompilationResult};
use crate::compiler::tree::{DeclarationTree, TreeState};

/// Checks bodies, overrides and abstract method implementation
pub struct MethodVerifier<'a> {
    env: &'a LookupEnvironment,
}

impl<'a> MethodVerifier<'a> {
    pub fn new(env: &'a LookupEnvironment) -> Self {
        Self { env }
    }

    /// Verify every type the unit declares
    pub fn verify(&self, tree: &mut DeclarationTree) {
        if let Some(scope) = tree.scope.as_ref() {
            let unit_name = tree.unit.name();
            for decl in &tree.types {
                let qualified = scope.qualify(&decl.name);
                let Some(binding) = self.env.binding(&qualified) else {
                    continue;
                };
                if binding.unit_name != unit_name || binding.members != FaultState::Done {
                    continue;
                }
                self.verify_type(binding, decl, &mut tree.result);
            }
        }
        tree.advance(TreeState::Verified);
    }

    fn verify_type(&self, binding: &TypeBinding, decl: &TypeDecl, result: &mut CompilationResult) {
        self.check_bodies(binding, decl, result);
        self.check_overrides(binding, result);
        if binding.is_class() && !binding.is_abstract {
            self.check_implemented(binding, decl, result);
        }
    }

    fn check_bodies(&self, binding: &TypeBinding, decl: &TypeDecl, result: &mut CompilationResult) {
        for method in &decl.methods {
            let has_body = !matches!(method.body, Body::Missing);
            match (binding.kind, method.is_abstract, has_body) {
                (TypeKind::Interface, _, true) | (TypeKind::Class, true, true) => result.error(
                    Category::Verification,
                    "Abstract methods do not specify a body",
                    method.coordinate,
                ),
                (TypeKind::Class, false, false) => result.error(
                    Category::Verification,
                    "This method requires a body instead of a semicolon",
                    method.coordinate,
                ),
                _ => {}
            }

            if binding.is_class() && method.is_abstract && !binding.is_abstract {
                result.error(
                    Category::Verification,
                    format!(
                        "The abstract method {} in type {} can only be defined by an abstract class",
                        method.name,
                        binding.simple_name()
                    ),
                    method.coordinate,
                );
            }
        }
    }

    fn check_overrides(&self, binding: &TypeBinding, result: &mut CompilationResult) {
        let ancestors = self.env.ancestors(&binding.qualified_name);

        for own in &binding.methods {
            if own.return_type.is_unknown() {
                continue;
            }
            let overridden = ancestors
                .iter()
                .filter_map(|a| self.env.binding(a))
                .flat_map(|a| a.methods.iter())
                .find(|inherited| {
                    inherited.same_parameters(own)
                        && !inherited.return_type.is_unknown()
                        && inherited.return_type != own.return_type
                });
            if let Some(inherited) = overridden {
                result.error(
                    Category::Verification,
                    format!("The return type is incompatible with {inherited}"),
                    own.coordinate,
                );
            }
        }
    }

    fn check_implemented(&self, binding: &TypeBinding, decl: &TypeDecl, result: &mut CompilationResult) {
        let mut reported: Vec<&MethodBinding> = Vec::new();

        for ancestor in self.env.ancestors(&binding.qualified_name) {
            let Some(ancestor) = self.env.binding(&ancestor) else {
                continue;
            };
            for inherited in ancestor.methods.iter().filter(|m| m.is_abstract) {
                if reported.iter().any(|r| r.same_parameters(inherited)) {
                    continue;
                }
                if !self.has_implementation(binding, inherited) {
                    result.error(
                        Category::Verification,
                        format!(
                            "The type {} must implement the inherited abstract method {inherited}",
                            binding.simple_name()
                        ),
                        decl.coordinate,
                    );
                    reported.push(inherited);
                }
            }
        }
    }

    /// A concrete method matching `abstract_method` in `binding` or its superclass chain
    fn has_implementation(&self, binding: &TypeBinding, abstract_method: &MethodBinding) -> bool {
        let mut current = Some(binding);
        let mut steps = 0;

        while let Some(class) = current {
            if class
                .methods
                .iter()
                .any(|m| !m.is_abstract && m.same_parameters(abstract_method))
            {
                return true;
            }
            steps += 1;
            if steps > self.env.type_count() {
                break;
            }
            current = class.superclass.as_deref().and_then(|s| self.env.binding(s));
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use crate::compiler::{DeclarationTree, SourceUnit, TreeState};
    use crate::lookup::{fault_in_unit, LookupEnvironment};
    use strata_config::CompilerConfig;
    use strata_log::Logger;

    fn verify(sources: &[(&str, &str)]) -> Vec<DeclarationTree> {
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
            env.method_verifier().verify(&mut tree);
            trees.push(tree);
        }
        trees
    }

    fn messages(tree: &DeclarationTree) -> Vec<String> {
        tree.result.diagnostics().iter().map(|d| d.message.clone()).collect()
    }

    #[test]
    fn test_clean_hierarchy() {
        let trees = verify(&[
            ("Shape.strata", "abstract class Shape { abstract int area(); }"),
            ("Square.strata", "class Square extends Shape { int side; int area() { return side * side; } }"),
        ]);
        assert!(trees.iter().all(|t| !t.has_errors()));
        assert!(trees.iter().all(|t| t.state() == TreeState::Verified));
    }

    #[test]
    fn test_body_rules() {
        let trees = verify(&[(
            "C.strata",
            "abstract class C { int a(); abstract int b() { return 1; } }",
        )]);
        assert_eq!(
            messages(&trees[0]),
            vec![
                "This method requires a body instead of a semicolon",
                "Abstract methods do not specify a body",
            ]
        );
    }

    #[test]
    fn test_abstract_method_in_concrete_class() {
        let trees = verify(&[("C.strata", "class C { abstract void run(); }")]);
        assert_eq!(
            messages(&trees[0]),
            vec!["The abstract method run in type C can only be defined by an abstract class"]
        );
    }

    #[test]
    fn test_missing_implementation() {
        let trees = verify(&[
            ("Runnable.strata", "interface Runnable { void run(int times); }"),
            ("Task.strata", "class Task implements Runnable { void run() {} }"),
        ]);
        assert_eq!(
            messages(&trees[1]),
            vec!["The type Task must implement the inherited abstract method Runnable.run(int)"]
        );
    }

    #[test]
    fn test_implementation_inherited_from_superclass() {
        let trees = verify(&[
            ("Runnable.strata", "interface Runnable { void run(); }"),
            ("Base.strata", "class Base { void run() {} }"),
            ("Task.strata", "class Task extends Base implements Runnable {}"),
        ]);
        assert!(trees.iter().all(|t| !t.has_errors()));
    }

    #[test]
    fn test_incompatible_return_type() {
        let trees = verify(&[
            ("Base.strata", "class Base { int size() { return 0; } }"),
            ("Derived.strata", "class Derived extends Base { boolean size() { return true; } }"),
        ]);
        assert_eq!(
            messages(&trees[1]),
            vec!["The return type is incompatible with Base.size()"]
        );
    }
}

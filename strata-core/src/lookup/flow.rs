//! Reachability and definite assignment

use crate::compiler::ast::{Block, Body, Expr, ExprKind, MethodDecl, Stmt, StmtKind};
use crate::compiler::result::{Category, CompilationResult};
use crate::compiler::tree::{DeclarationTree, TreeState};
use std::collections::HashSet;

/// State flowing out of a statement
#[derive(Debug, Clone, PartialEq)]
struct FlowInfo {
    reachable: bool,
    assigned: HashSet<String>,
}

impl FlowInfo {
    fn start() -> Self {
        Self {
            reachable: true,
            assigned: HashSet::new(),
        }
    }

    fn dead(&self) -> Self {
        Self {
            reachable: false,
            assigned: self.assigned.clone(),
        }
    }

    /// Join point of two paths; a dead path places no constraint on the other
    fn merge(self, other: FlowInfo) -> FlowInfo {
        match (self.reachable, other.reachable) {
            (false, _) => other,
            (_, false) => self,
            _ => FlowInfo {
                reachable: true,
                assigned: self.assigned.intersection(&other.assigned).cloned().collect(),
            },
        }
    }
}

/// Flow checks over resolved bodies
#[derive(Debug, Default)]
pub struct FlowAnalyzer {
    locals: Vec<Vec<String>>,
}

impl FlowAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn analyze(&mut self, tree: &mut DeclarationTree) {
        if tree.has_scope() && tree.module.is_none() {
            for decl in &tree.types {
                for method in &decl.methods {
                    if let Body::Parsed(block) = &method.body {
                        self.method(method, block, &mut tree.result);
                    }
                }
            }
        }
        tree.advance(TreeState::Analyzed);
    }

    fn method(&mut self, method: &MethodDecl, body: &Block, result: &mut CompilationResult) {
        self.locals = vec![method.params.iter().map(|p| p.name.clone()).collect()];
        let mut flow = FlowInfo::start();
        flow.assigned.extend(method.params.iter().map(|p| p.name.clone()));

        let out = self.block(body, flow, result);
        if out.reachable && !method.return_type.is_void() {
            result.error(
                Category::Flow,
                format!("This method must return a result of type {}", method.return_type.name),
                method.coordinate,
            );
        }
        self.locals.clear();
    }

    fn block(&mut self, block: &Block, mut flow: FlowInfo, result: &mut CompilationResult) -> FlowInfo {
        self.locals.push(Vec::new());
        let mut reported = false;

        for stmt in &block.stmts {
            if !flow.reachable && !matches!(stmt.kind, StmtKind::Empty) {
                if !reported {
                    result.error(Category::Flow, "Unreachable code", stmt.coordinate);
                    reported = true;
                }
                flow.reachable = true;
            }
            flow = self.statement(stmt, flow, result);
        }

        if reported {
            flow.reachable = false;
        }
        self.locals.pop();
        flow
    }

    fn nested(&mut self, stmt: &Stmt, flow: FlowInfo, result: &mut CompilationResult) -> FlowInfo {
        self.locals.push(Vec::new());
        let out = self.statement(stmt, flow, result);
        self.locals.pop();
        out
    }

    fn statement(&mut self, stmt: &Stmt, mut flow: FlowInfo, result: &mut CompilationResult) -> FlowInfo {
        match &stmt.kind {
            StmtKind::Block(block) => self.block(block, flow, result),
            StmtKind::Local { name, init, .. } => {
                if let Some(init) = init {
                    self.reads(init, &flow, result);
                }
                if let Some(frame) = self.locals.last_mut() {
                    frame.push(name.clone());
                }
                if init.is_some() {
                    flow.assigned.insert(name.clone());
                } else {
                    flow.assigned.remove(name);
                }
                flow
            }
            StmtKind::Assign { target, value } => {
                self.reads(value, &flow, result);
                match &target.kind {
                    ExprKind::Name(name) if self.is_local(name) => {
                        flow.assigned.insert(name.clone());
                    }
                    _ => self.reads(target, &flow, result),
                }
                flow
            }
            StmtKind::Expr(expr) => {
                self.reads(expr, &flow, result);
                flow
            }
            StmtKind::Return(value) => {
                if let Some(value) = value {
                    self.reads(value, &flow, result);
                }
                flow.dead()
            }
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.reads(condition, &flow, result);
                let then_out = self.nested(then_branch, flow.clone(), result);
                let else_out = match else_branch {
                    Some(else_branch) => self.nested(else_branch, flow, result),
                    None => flow,
                };
                then_out.merge(else_out)
            }
            StmtKind::While { condition, body } => {
                self.reads(condition, &flow, result);
                self.nested(body, flow.clone(), result);
                if condition.is_true_literal() {
                    flow.dead()
                } else {
                    flow
                }
            }
            StmtKind::Empty => flow,
        }
    }

    fn is_local(&self, name: &str) -> bool {
        self.locals.iter().any(|frame| frame.iter().any(|n| n == name))
    }

    fn reads(&self, expr: &Expr, flow: &FlowInfo, result: &mut CompilationResult) {
        match &expr.kind {
            ExprKind::Name(name) => {
                if self.is_local(name) && !flow.assigned.contains(name) {
                    result.error(
                        Category::Flow,
                        format!("The local variable {name} may not have been initialized"),
                        expr.coordinate,
                    );
                }
            }
            ExprKind::Call { receiver, args, .. } => {
                if let Some(receiver) = receiver {
                    self.reads(receiver, flow, result);
                }
                for arg in args {
                    self.reads(arg, flow, result);
                }
            }
            ExprKind::Field { receiver, .. } => self.reads(receiver, flow, result),
            ExprKind::Unary { operand, .. } => self.reads(operand, flow, result),
            ExprKind::Binary { left, right, .. } => {
                self.reads(left, flow, result);
                self.reads(right, flow, result);
            }
            ExprKind::Int(_)
            | ExprKind::True
            | ExprKind::False
            | ExprKind::Null
            | ExprKind::This
            | ExprKind::New(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::parser::Parser;
    use crate::compiler::{CompilationResult, SourceUnit, UnitScope};

    fn analyze(source: &str) -> Vec<String> {
        let unit = SourceUnit::new("A.strata", source);
        let mut tree = Parser::new().parse_standalone(&unit, CompilationResult::new("A.strata", 0, 1, 100));
        tree.scope = Some(UnitScope::default());
        FlowAnalyzer::new().analyze(&mut tree);
        assert_eq!(tree.state(), TreeState::Analyzed);
        tree.result.diagnostics().iter().map(|d| d.message.clone()).collect()
    }

    #[test]
    fn test_clean_method() {
        let messages = analyze(
            "class A { int f(int n) { int x; if (n > 0) { x = 1; } else { x = 2; } return x; } }",
        );
        assert!(messages.is_empty(), "{messages:?}");
    }

    #[test]
    fn test_uninitialized_local() {
        assert_eq!(
            analyze("class A { int f(int n) { int x; if (n > 0) { x = 1; } return x; } }"),
            vec!["The local variable x may not have been initialized"]
        );
    }

    #[test]
    fn test_unreachable_reported_once() {
        assert_eq!(
            analyze("class A { int f() { return 1; g(); g(); } void g() {} }"),
            vec!["Unreachable code"]
        );
    }

    #[test]
    fn test_missing_return() {
        assert_eq!(
            analyze("class A { int f(boolean b) { if (b) { return 1; } } }"),
            vec!["This method must return a result of type int"]
        );
    }

    #[test]
    fn test_infinite_loop_needs_no_return() {
        assert!(analyze("class A { int f() { while (true) { g(); } } void g() {} }").is_empty());
        assert_eq!(
            analyze("class A { int f() { while (true) { } return 1; } }"),
            vec!["Unreachable code"]
        );
    }

    #[test]
    fn test_fields_are_not_tracked() {
        assert!(analyze("class A { int size; int f() { return size; } }").is_empty());
    }

    #[test]
    fn test_unscoped_unit_is_skipped() {
        let unit = SourceUnit::new("A.strata", "class A { int f() { } }");
        let mut tree = Parser::new().parse_standalone(&unit, CompilationResult::new("A.strata", 0, 1, 100));
        FlowAnalyzer::new().analyze(&mut tree);
        assert!(tree.result.diagnostics().is_empty());
        assert_eq!(tree.state(), TreeState::Analyzed);
    }
}

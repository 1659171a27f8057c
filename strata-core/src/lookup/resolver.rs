//! Name and type resolution inside method bodies

use super::environment::LookupEnvironment;
use super::error::EnvironmentError;
use crate::compiler::ast::{BinaryOp, Block, Body, Expr, ExprKind, Stmt, StmtKind, Ty, UnaryOp};
use crate::compiler::lexer::Coordinate;
use crate::compiler::result::{Category, CompilationResult};
use crate::compiler::tree::{DeclarationTree, TreeState, UnitScope};
use strata_config::Phase;
use strata_log::debug;

/// What a body can see while it is being resolved
struct BodyContext<'s> {
    this_type: String,
    scope: &'s UnitScope,
    return_type: Ty,
    frames: Vec<Vec<(String, Ty)>>,
}

impl<'s> BodyContext<'s> {
    fn new(this_type: String, scope: &'s UnitScope, return_type: Ty) -> Self {
        Self {
            this_type,
            scope,
            return_type,
            frames: vec![Vec::new()],
        }
    }

    fn enter(&mut self) {
        self.frames.push(Vec::new());
    }

    fn exit(&mut self) {
        self.frames.pop();
    }

    fn declare(&mut self, name: String, ty: Ty) {
        if let Some(frame) = self.frames.last_mut() {
            frame.push((name, ty));
        }
    }

    fn lookup(&self, name: &str) -> Option<&Ty> {
        self.frames
            .iter()
            .rev()
            .flat_map(|frame| frame.iter().rev())
            .find(|(n, _)| n == name)
            .map(|(_, ty)| ty)
    }

    fn this(&self) -> Ty {
        Ty::Class(self.this_type.clone())
    }
}

/// Resolves names, members and expression types in materialized bodies
///
/// Types met along the way are faulted in on demand, which may pull new units
/// into the environment through its provider.
pub struct Resolver<'e> {
    env: &'e mut LookupEnvironment,
}

impl<'e> Resolver<'e> {
    pub fn new(env: &'e mut LookupEnvironment) -> Self {
        Self { env }
    }

    pub fn resolve_unit(&mut self, tree: &mut DeclarationTree) -> Result<(), EnvironmentError> {
        if let (Some(scope), None) = (tree.scope.clone(), tree.module.as_ref()) {
            let unit_name = tree.unit.name().to_string();
            let mut bodies = 0;

            for decl in tree.types.iter_mut() {
                let this_type = scope.qualify(&decl.name);
                let signatures = match self.env.binding(&this_type) {
                    Some(binding) if binding.unit_name == unit_name => binding.methods.clone(),
                    _ => continue,
                };

                for (method, signature) in decl.methods.iter_mut().zip(signatures) {
                    let Body::Parsed(block) = &mut method.body else {
                        continue;
                    };
                    let mut ctx = BodyContext::new(this_type.clone(), &scope, signature.return_type);
                    for (param, ty) in method.params.iter().zip(signature.params) {
                        ctx.declare(param.name.clone(), ty);
                    }
                    self.block(&mut ctx, block, &mut tree.result)?;
                    bodies += 1;
                }
            }

            debug!(
                self.env.logger(),
                target: Phase::Resolve.target(),
                "{}: {} bodies resolved",
                unit_name,
                bodies
            );
        }
        tree.advance(TreeState::Resolved);
        Ok(())
    }

    // ==================== Statements ====================

    fn block(&mut self, ctx: &mut BodyContext<'_>, block: &mut Block, result: &mut CompilationResult) -> Result<(), EnvironmentError> {
        ctx.enter();
        for stmt in block.stmts.iter_mut() {
            self.statement(ctx, stmt, result)?;
        }
        ctx.exit();
        Ok(())
    }

    /// A branch or loop body gets its own frame
    fn nested(&mut self, ctx: &mut BodyContext<'_>, stmt: &mut Stmt, result: &mut CompilationResult) -> Result<(), EnvironmentError> {
        ctx.enter();
        self.statement(ctx, stmt, result)?;
        ctx.exit();
        Ok(())
    }

    fn statement(&mut self, ctx: &mut BodyContext<'_>, stmt: &mut Stmt, result: &mut CompilationResult) -> Result<(), EnvironmentError> {
        let at = stmt.coordinate;

        match &mut stmt.kind {
            StmtKind::Block(block) => self.block(ctx, block, result)?,
            StmtKind::Local { ty, name, init } => {
                let mut declared = self.env.resolve_type_ref(ctx.scope, ty, Category::Resolution, result)?;
                if declared == Ty::Void {
                    result.error(
                        Category::Resolution,
                        format!("void is an invalid type for the variable {name}"),
                        ty.coordinate,
                    );
                    declared = Ty::Unknown;
                }
                if let Some(init) = init {
                    let found = self.expression(ctx, init, result)?;
                    self.check_assignable(&found, &declared, init.coordinate, result)?;
                }
                if ctx.lookup(name).is_some() {
                    result.error(Category::Resolution, format!("Duplicate local variable {name}"), at);
                } else {
                    ctx.declare(name.clone(), declared);
                }
            }
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.condition(ctx, condition, result)?;
                self.nested(ctx, then_branch, result)?;
                if let Some(else_branch) = else_branch {
                    self.nested(ctx, else_branch, result)?;
                }
            }
            StmtKind::While { condition, body } => {
                self.condition(ctx, condition, result)?;
                self.nested(ctx, body, result)?;
            }
            StmtKind::Return(value) => self.return_statement(ctx, value.as_mut(), at, result)?,
            StmtKind::Assign { target, value } => {
                let target_ty = self.expression(ctx, target, result)?;
                let value_ty = self.expression(ctx, value, result)?;
                self.check_assignable(&value_ty, &target_ty, value.coordinate, result)?;
            }
            StmtKind::Expr(expr) => {
                self.expression(ctx, expr, result)?;
            }
            StmtKind::Empty => {}
        }
        Ok(())
    }

    fn return_statement(
        &mut self,
        ctx: &mut BodyContext<'_>,
        value: Option<&mut Expr>,
        at: Coordinate,
        result: &mut CompilationResult,
    ) -> Result<(), EnvironmentError> {
        let expected = ctx.return_type.clone();
        match value {
            Some(value) => {
                let found = self.expression(ctx, value, result)?;
                if expected == Ty::Void {
                    result.error(Category::Resolution, "Void methods cannot return a value", at);
                } else {
                    self.check_assignable(&found, &expected, value.coordinate, result)?;
                }
            }
            None if expected != Ty::Void && !expected.is_unknown() => {
                result.error(Category::Resolution, "Missing return value", at);
            }
            None => {}
        }
        Ok(())
    }

    fn condition(&mut self, ctx: &mut BodyContext<'_>, condition: &mut Expr, result: &mut CompilationResult) -> Result<(), EnvironmentError> {
        let found = self.expression(ctx, condition, result)?;
        if found != Ty::Boolean && !found.is_unknown() {
            result.error(
                Category::Resolution,
                format!("Type mismatch: cannot convert from {found} to boolean"),
                condition.coordinate,
            );
        }
        Ok(())
    }

    // ==================== Expressions ====================

    fn expression(&mut self, ctx: &mut BodyContext<'_>, expr: &mut Expr, result: &mut CompilationResult) -> Result<Ty, EnvironmentError> {
        let at = expr.coordinate;

        let ty = match &mut expr.kind {
            ExprKind::Int(_) => Ty::Int,
            ExprKind::True | ExprKind::False => Ty::Boolean,
            ExprKind::Null => Ty::Null,
            ExprKind::This => ctx.this(),
            ExprKind::Name(name) => match ctx.lookup(name) {
                Some(ty) => ty.clone(),
                None => match self.field_type(&ctx.this_type, name)? {
                    Some(ty) => ty,
                    None => {
                        result.error(
                            Category::Resolution,
                            format!("{name} cannot be resolved to a variable"),
                            at,
                        );
                        Ty::Unknown
                    }
                },
            },
            ExprKind::New(type_ref) => {
                let ty = self.env.resolve_type_ref(ctx.scope, type_ref, Category::Resolution, result)?;
                if let Ty::Class(qualified) = &ty {
                    if self.env.binding(qualified).is_some_and(|b| b.is_abstract) {
                        result.error(
                            Category::Resolution,
                            format!("Cannot instantiate the type {}", type_ref.name),
                            at,
                        );
                    }
                }
                ty
            }
            ExprKind::Field { receiver, name } => {
                let receiver_ty = self.expression(ctx, receiver, result)?;
                self.field_access(&receiver_ty, name, at, result)?
            }
            ExprKind::Call { receiver, name, args } => {
                let receiver_ty = match receiver {
                    Some(receiver) => self.expression(ctx, receiver, result)?,
                    None => ctx.this(),
                };
                let mut arg_types = Vec::with_capacity(args.len());
                for arg in args.iter_mut() {
                    arg_types.push(self.expression(ctx, arg, result)?);
                }
                self.method_call(&receiver_ty, name, &arg_types, at, result)?
            }
            ExprKind::Unary { op, operand } => {
                let operand_ty = self.expression(ctx, operand, result)?;
                match (*op, &operand_ty) {
                    (_, Ty::Unknown) => Ty::Unknown,
                    (UnaryOp::Not, Ty::Boolean) => Ty::Boolean,
                    (UnaryOp::Neg, Ty::Int) => Ty::Int,
                    _ => {
                        result.error(
                            Category::Resolution,
                            format!(
                                "The operator {} is undefined for the argument type(s) {operand_ty}",
                                op.as_str()
                            ),
                            at,
                        );
                        Ty::Unknown
                    }
                }
            }
            ExprKind::Binary { op, left, right } => {
                let left_ty = self.expression(ctx, left, result)?;
                let right_ty = self.expression(ctx, right, result)?;
                self.binary(*op, &left_ty, &right_ty, at, result)?
            }
        };

        expr.ty = Some(ty.clone());
        Ok(ty)
    }

    fn field_type(&mut self, owner: &str, name: &str) -> Result<Option<Ty>, EnvironmentError> {
        self.env.fault_in_closure(owner)?;
        Ok(self.env.find_field(owner, name).map(|f| f.ty.clone()))
    }

    fn field_access(&mut self, receiver: &Ty, name: &str, at: Coordinate, result: &mut CompilationResult) -> Result<Ty, EnvironmentError> {
        let ty = match receiver {
            Ty::Unknown => Ty::Unknown,
            Ty::Class(owner) => match self.field_type(owner, name)? {
                Some(ty) => ty,
                None => {
                    result.error(
                        Category::Resolution,
                        format!("{name} cannot be resolved or is not a field"),
                        at,
                    );
                    Ty::Unknown
                }
            },
            Ty::Int | Ty::Boolean => {
                result.error(
                    Category::Resolution,
                    format!("The primitive type {receiver} does not have a field {name}"),
                    at,
                );
                Ty::Unknown
            }
            Ty::Void | Ty::Null => {
                result.error(
                    Category::Resolution,
                    format!("{name} cannot be resolved or is not a field"),
                    at,
                );
                Ty::Unknown
            }
        };
        Ok(ty)
    }

    fn method_call(
        &mut self,
        receiver: &Ty,
        name: &str,
        args: &[Ty],
        at: Coordinate,
        result: &mut CompilationResult,
    ) -> Result<Ty, EnvironmentError> {
        let rendered = || args.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");

        let owner = match receiver {
            Ty::Unknown => return Ok(Ty::Unknown),
            Ty::Class(owner) => owner,
            other => {
                result.error(
                    Category::Resolution,
                    format!("Cannot invoke {name}({}) on the primitive type {other}", rendered()),
                    at,
                );
                return Ok(Ty::Unknown);
            }
        };

        self.env.fault_in_closure(owner)?;
        for arg in args {
            self.complete(arg)?;
        }

        let candidates = self.env.find_methods(owner, name);
        let chosen = candidates.iter().find(|m| {
            m.params.len() == args.len() && m.params.iter().zip(args).all(|(p, a)| self.is_assignable(a, p))
        });
        if let Some(method) = chosen {
            return Ok(method.return_type.clone());
        }

        let arity_matches = candidates.iter().any(|m| m.params.len() == args.len());
        if !(arity_matches && args.iter().any(Ty::is_unknown)) {
            result.error(
                Category::Resolution,
                format!("The method {name}({}) is undefined for the type {receiver}", rendered()),
                at,
            );
        }
        Ok(Ty::Unknown)
    }

    fn binary(&mut self, op: BinaryOp, left: &Ty, right: &Ty, at: Coordinate, result: &mut CompilationResult) -> Result<Ty, EnvironmentError> {
        let produces = match op {
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => Ty::Int,
            _ => Ty::Boolean,
        };
        if left.is_unknown() || right.is_unknown() {
            return Ok(produces);
        }

        let operand = match op {
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => Some(Ty::Int),
            BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Le | BinaryOp::Ge => Some(Ty::Int),
            BinaryOp::And | BinaryOp::Or => Some(Ty::Boolean),
            BinaryOp::Eq | BinaryOp::Ne => None,
        };

        match operand {
            Some(expected) => {
                if *left != expected || *right != expected {
                    result.error(
                        Category::Resolution,
                        format!(
                            "The operator {} is undefined for the argument type(s) {left}, {right}",
                            op.as_str()
                        ),
                        at,
                    );
                    return Ok(Ty::Unknown);
                }
            }
            None => {
                self.complete(left)?;
                self.complete(right)?;
                if !self.is_comparable(left, right) {
                    result.error(
                        Category::Resolution,
                        format!("Incompatible operand types {left} and {right}"),
                        at,
                    );
                }
            }
        }
        Ok(produces)
    }

    // ==================== Types ====================

    fn complete(&mut self, ty: &Ty) -> Result<(), EnvironmentError> {
        if let Ty::Class(qualified) = ty {
            self.env.fault_in_closure(qualified)?;
        }
        Ok(())
    }

    fn is_assignable(&self, from: &Ty, to: &Ty) -> bool {
        match (from, to) {
            (Ty::Unknown, _) | (_, Ty::Unknown) => true,
            (Ty::Null, Ty::Class(_)) => true,
            (Ty::Class(from), Ty::Class(to)) => self.env.is_subtype(from, to),
            (from, to) => from == to,
        }
    }

    fn is_comparable(&self, left: &Ty, right: &Ty) -> bool {
        match (left, right) {
            (Ty::Null, r) => r.is_reference(),
            (l, Ty::Null) => l.is_reference(),
            (Ty::Class(l), Ty::Class(r)) => self.env.is_subtype(l, r) || self.env.is_subtype(r, l),
            (l, r) => l == r && *l != Ty::Void,
        }
    }

    fn check_assignable(&mut self, from: &Ty, to: &Ty, at: Coordinate, result: &mut CompilationResult) -> Result<(), EnvironmentError> {
        self.complete(from)?;
        if !self.is_assignable(from, to) {
            result.error(
                Category::Resolution,
                format!("Type mismatch: cannot convert from {from} to {to}"),
                at,
            );
        }
        Ok(())
    }
}

//! Declaration and body syntax trees

use crate::compiler::lexer::{Coordinate, TokenKind};
use std::fmt;
use std::ops::Range;

/// Resolved type of an expression, variable or signature element
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Ty {
    Int,
    Boolean,
    Void,
    Null,
    /// Fully qualified class or interface name
    Class(String),
    /// Could not be resolved; already reported, compatible with everything
    Unknown,
}

impl Ty {
    pub fn is_reference(&self) -> bool {
        matches!(self, Ty::Class(_) | Ty::Null)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Ty::Unknown)
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Int => f.write_str("int"),
            Ty::Boolean => f.write_str("boolean"),
            Ty::Void => f.write_str("void"),
            Ty::Null => f.write_str("null"),
            Ty::Class(name) => f.write_str(simple_name(name)),
            Ty::Unknown => f.write_str("<unknown>"),
        }
    }
}

/// Last segment of a dotted name
pub fn simple_name(qualified: &str) -> &str {
    qualified.rsplit('.').next().unwrap_or(qualified)
}

/// A dotted name as written, e.g. in `package`, `import`, `requires`
#[derive(Debug, Clone, PartialEq)]
pub struct QualifiedName {
    pub name: String,
    pub coordinate: Coordinate,
}

/// A type as written in source
#[derive(Debug, Clone, PartialEq)]
pub struct TypeRef {
    pub name: String,
    pub coordinate: Coordinate,
}

impl TypeRef {
    pub fn primitive(&self) -> Option<Ty> {
        match self.name.as_str() {
            "int" => Some(Ty::Int),
            "boolean" => Some(Ty::Boolean),
            "void" => Some(Ty::Void),
            _ => None,
        }
    }

    pub fn is_void(&self) -> bool {
        self.name == "void"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Class,
    Interface,
}

impl TypeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Interface => "interface",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    pub name: String,
    pub kind: TypeKind,
    pub is_abstract: bool,
    /// `extends` of a class
    pub superclass: Option<TypeRef>,
    /// `implements` of a class, `extends` of an interface
    pub interfaces: Vec<TypeRef>,
    pub fields: Vec<FieldDecl>,
    pub methods: Vec<MethodDecl>,
    pub coordinate: Coordinate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub ty: TypeRef,
    pub name: String,
    pub coordinate: Coordinate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub ty: TypeRef,
    pub name: String,
    pub coordinate: Coordinate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    pub name: String,
    pub return_type: TypeRef,
    pub params: Vec<Param>,
    pub is_abstract: bool,
    pub body: Body,
    pub coordinate: Coordinate,
}

/// Method body in one of its parse stages
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// Declared with `;`
    Missing,
    /// Skipped by the diet parse: byte range of `{ ... }` and where it starts
    Deferred { range: Range<usize>, start: Coordinate },
    Parsed(Block),
}

impl Body {
    pub fn is_deferred(&self) -> bool {
        matches!(self, Body::Deferred { .. })
    }

    pub fn block(&self) -> Option<&Block> {
        match self {
            Body::Parsed(block) => Some(block),
            _ => None,
        }
    }
}

/// `module a.b { requires c.d; exports a.b.api; }`
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleDecl {
    pub name: QualifiedName,
    pub requires: Vec<QualifiedName>,
    pub exports: Vec<QualifiedName>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub coordinate: Coordinate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub coordinate: Coordinate,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    Block(Block),
    Local {
        ty: TypeRef,
        name: String,
        init: Option<Expr>,
    },
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    While {
        condition: Expr,
        body: Box<Stmt>,
    },
    Return(Option<Expr>),
    Assign {
        target: Expr,
        value: Expr,
    },
    Expr(Expr),
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub coordinate: Coordinate,
    /// Filled in by the resolver
    pub ty: Option<Ty>,
    depth: usize,
}

impl Expr {
    pub fn new(kind: ExprKind, coordinate: Coordinate) -> Self {
        let below = match &kind {
            ExprKind::Call { receiver, args, .. } => receiver
                .iter()
                .map(|r| r.depth)
                .chain(args.iter().map(|a| a.depth))
                .max()
                .unwrap_or(0),
            ExprKind::Field { receiver, .. } => receiver.depth,
            ExprKind::Unary { operand, .. } => operand.depth,
            ExprKind::Binary { left, right, .. } => left.depth.max(right.depth),
            _ => 0,
        };
        Self {
            kind,
            coordinate,
            ty: None,
            depth: below + 1,
        }
    }

    /// Height of the expression tree; a literal or name is 1
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Literal `true`; parentheses are not kept in the tree
    pub fn is_true_literal(&self) -> bool {
        matches!(self.kind, ExprKind::True)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Int(i64),
    True,
    False,
    Null,
    This,
    Name(String),
    New(TypeRef),
    Call {
        receiver: Option<Box<Expr>>,
        name: String,
        args: Vec<Expr>,
    },
    Field {
        receiver: Box<Expr>,
        name: String,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Neg => "-",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        let op = match kind {
            TokenKind::DoublePipe => BinaryOp::Or,
            TokenKind::DoubleAmpersand => BinaryOp::And,
            TokenKind::DoubleEqual => BinaryOp::Eq,
            TokenKind::ExclamationEqual => BinaryOp::Ne,
            TokenKind::LessThan => BinaryOp::Lt,
            TokenKind::GreaterThan => BinaryOp::Gt,
            TokenKind::LessThanEqual => BinaryOp::Le,
            TokenKind::GreaterThanEqual => BinaryOp::Ge,
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Sub,
            TokenKind::Asterisk => BinaryOp::Mul,
            TokenKind::Slash => BinaryOp::Div,
            _ => return None,
        };
        Some(op)
    }

    /// Binding strength; all binary operators are left-associative
    pub fn precedence(&self) -> u8 {
        match self {
            BinaryOp::Or => 10,
            BinaryOp::And => 20,
            BinaryOp::Eq | BinaryOp::Ne => 30,
            BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Le | BinaryOp::Ge => 40,
            BinaryOp::Add | BinaryOp::Sub => 50,
            BinaryOp::Mul | BinaryOp::Div => 60,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
        }
    }
}

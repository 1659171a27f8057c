//! Type table entries

use crate::compiler::ast::{simple_name, Ty, TypeDecl, TypeKind};
use crate::compiler::lexer::Coordinate;
use crate::compiler::result::{CompilationResult, Diagnostic};
use crate::compiler::tree::UnitScope;
use std::fmt;

/// Progress of an on-demand fault-in step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultState {
    Pending,
    InProgress,
    Done,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldBinding {
    pub name: String,
    pub ty: Ty,
    pub declaring_type: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodBinding {
    pub name: String,
    pub params: Vec<Ty>,
    pub return_type: Ty,
    pub is_abstract: bool,
    pub declaring_type: String,
    pub coordinate: Coordinate,
}

impl MethodBinding {
    pub fn same_parameters(&self, other: &MethodBinding) -> bool {
        self.name == other.name && self.params == other.params
    }
}

impl fmt::Display for MethodBinding {
    /// `Type.name(int, boolean)`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}(", simple_name(&self.declaring_type), self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{param}")?;
        }
        f.write_str(")")
    }
}

/// A class or interface known to the environment
///
/// Registered as a skeleton when its unit is bound; supertypes and members
/// are filled in by fault-in, possibly long before the unit itself is processed.
#[derive(Debug, Clone)]
pub struct TypeBinding {
    pub qualified_name: String,
    pub kind: TypeKind,
    pub is_abstract: bool,
    pub unit_name: String,
    pub scope: UnitScope,
    /// Header as parsed
    pub decl: TypeDecl,
    pub superclass: Option<String>,
    pub interfaces: Vec<String>,
    pub fields: Vec<FieldBinding>,
    /// Aligned with `decl.methods`
    pub methods: Vec<MethodBinding>,
    pub hierarchy: FaultState,
    pub members: FaultState,
    /// Problems found while faulting in, waiting to be moved to the unit's result
    pub problems: Vec<Diagnostic>,
}

impl TypeBinding {
    pub fn new(qualified_name: String, decl: &TypeDecl, unit_name: &str, scope: &UnitScope) -> Self {
        Self {
            qualified_name,
            kind: decl.kind,
            is_abstract: decl.is_abstract,
            unit_name: unit_name.to_string(),
            scope: scope.clone(),
            decl: decl.clone(),
            superclass: None,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            hierarchy: FaultState::Pending,
            members: FaultState::Pending,
            problems: Vec::new(),
        }
    }

    pub fn is_class(&self) -> bool {
        self.kind == TypeKind::Class
    }

    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    pub fn simple_name(&self) -> &str {
        simple_name(&self.qualified_name)
    }

    /// Direct supertypes, superclass first
    pub fn supertypes(&self) -> impl Iterator<Item = &String> {
        self.superclass.iter().chain(self.interfaces.iter())
    }
}

/// Destination for problems found while resolving
pub trait ProblemReporter {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl ProblemReporter for CompilationResult {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.record(diagnostic);
    }
}

impl ProblemReporter for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

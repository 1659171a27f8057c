//! Declaration trees and their lifecycle

use crate::compiler::ast::{Body, ModuleDecl, QualifiedName, TypeDecl};
use crate::compiler::result::CompilationResult;
use crate::compiler::unit::SourceUnit;

/// Lifecycle of a tree; each phase only ever moves it forward
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TreeState {
    /// Syntax only
    Parsed,
    /// Type skeletons registered with the environment
    Bound,
    /// Member signatures resolved
    FaultedIn,
    /// Inheritance and override consistency checked
    Verified,
    /// Bodies resolved
    Resolved,
    /// Flow analysis complete (terminal)
    Analyzed,
}

impl TreeState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TreeState::Parsed => "parsed",
            TreeState::Bound => "bound",
            TreeState::FaultedIn => "faulted-in",
            TreeState::Verified => "verified",
            TreeState::Resolved => "resolved",
            TreeState::Analyzed => "analyzed",
        }
    }
}

/// Lookup context of a unit: its package, owning module and imports
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UnitScope {
    /// Empty for the default package
    pub package: String,
    /// `None` for the unnamed module
    pub module: Option<String>,
    /// Single-type imports, fully qualified
    pub imports: Vec<String>,
}

impl UnitScope {
    /// Qualified name a type declared in this unit gets
    pub fn qualify(&self, simple: &str) -> String {
        if self.package.is_empty() {
            simple.to_string()
        } else {
            format!("{}.{}", self.package, simple)
        }
    }
}

/// Structured, mutable form of one unit
#[derive(Debug, Clone)]
pub struct DeclarationTree {
    pub unit: SourceUnit,
    pub result: CompilationResult,
    state: TreeState,
    /// Set while the unit still has pipeline work pending
    pub needs_investigation: bool,
    pub package: Option<QualifiedName>,
    /// The `package` clause was present but could not be parsed
    pub package_malformed: bool,
    pub imports: Vec<QualifiedName>,
    pub types: Vec<TypeDecl>,
    /// Only for module descriptors
    pub module: Option<ModuleDecl>,
    /// Assigned when the unit is bound; stays `None` when the unit cannot be placed
    pub scope: Option<UnitScope>,
}

impl DeclarationTree {
    pub fn new(unit: SourceUnit, result: CompilationResult) -> Self {
        Self {
            unit,
            result,
            state: TreeState::Parsed,
            needs_investigation: true,
            package: None,
            package_malformed: false,
            imports: Vec::new(),
            types: Vec::new(),
            module: None,
            scope: None,
        }
    }

    pub fn state(&self) -> TreeState {
        self.state
    }

    /// Move to `state` unless the tree is already past it
    pub fn advance(&mut self, state: TreeState) {
        if state > self.state {
            self.state = state;
        }
    }

    pub fn file_name(&self) -> &str {
        self.unit.name()
    }

    pub fn has_errors(&self) -> bool {
        self.result.has_errors()
    }

    pub fn has_scope(&self) -> bool {
        self.scope.is_some()
    }

    pub fn is_module_descriptor(&self) -> bool {
        self.unit.is_module_descriptor()
    }

    /// Package name as declared, empty for the default package
    pub fn package_name(&self) -> &str {
        self.package.as_ref().map(|p| p.name.as_str()).unwrap_or("")
    }

    pub fn deferred_body_count(&self) -> usize {
        self.types
            .iter()
            .flat_map(|t| t.methods.iter())
            .filter(|m| m.body.is_deferred())
            .count()
    }

    pub fn parsed_bodies(&self) -> impl Iterator<Item = &Body> {
        self.types
            .iter()
            .flat_map(|t| t.methods.iter())
            .map(|m| &m.body)
            .filter(|b| matches!(b, Body::Parsed(_)))
    }
}

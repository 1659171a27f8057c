//! Lookup environment and the semantic passes that run against it

pub mod binding;
pub mod environment;
pub mod error;
pub mod fault_in;
pub mod flow;
pub mod modules;
pub mod provider;
pub mod resolver;
pub mod verifier;

pub use binding::{FaultState, FieldBinding, MethodBinding, ProblemReporter, TypeBinding};
pub use environment::LookupEnvironment;
pub use error::{EnvironmentError, ProviderError};
pub use fault_in::fault_in_unit;
pub use flow::FlowAnalyzer;
pub use modules::{ModuleGraph, ModuleInfo};
pub use provider::UnitProvider;
pub use resolver::Resolver;
pub use verifier::MethodVerifier;

//! Source units

use std::fmt;
use std::sync::Arc;

/// File name of a module descriptor in source form
pub const DESCRIPTOR_SOURCE_NAME: &str = "module-info.strata";
/// File name of a module descriptor in compiled form
pub const DESCRIPTOR_COMPILED_NAME: &str = "module-info.stratac";

/// One input to the compiler: a path-like name and its text
///
/// Immutable once created; clones share the underlying buffers.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SourceUnit {
    name: Arc<str>,
    content: Arc<str>,
}

impl SourceUnit {
    pub fn new(name: impl Into<Arc<str>>, content: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Whether this unit declares module metadata (`module-info.strata` or `module-info.stratac`)
    pub fn is_module_descriptor(&self) -> bool {
        self.name.ends_with(DESCRIPTOR_SOURCE_NAME) || self.name.ends_with(DESCRIPTOR_COMPILED_NAME)
    }
}

impl fmt::Debug for SourceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceUnit")
            .field("name", &self.name)
            .field("len", &self.content.len())
            .finish()
    }
}

impl fmt::Display for SourceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

//! Strata - batch compilation driver
//!
//! # Architecture
//!
//! ```text
//! strata-config/  - Compiler flags, log levels, pipeline phases, project manifest
//! strata-log/     - Explicitly passed logger, sinks, ring buffer
//! strata-vfs/     - Memory and native file systems
//! strata-core/    - Front end, lookup environment, phase driver
//! strata-api/     - Batch entry point, sourcepath lookup, unified errors
//! strata-cli/     - `strata` binary
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use strata_workspace::{compile_batch, MemoryFileSystem, RunConfig};
//!
//! let fs = MemoryFileSystem::new();
//! fs.insert("src/A.strata", "class A { int f() { return 1; } }");
//! let output = compile_batch(Arc::new(fs), &["src/A.strata"], &RunConfig::default())?;
//! assert!(!output.has_errors());
//! ```

pub use strata_api::*;

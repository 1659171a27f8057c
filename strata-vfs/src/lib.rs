//! Strata Virtual File System
//!
//! Read-only file access for the compiler: batch sources are loaded through
//! it, and the sourcepath lookup asks it for units discovered on demand.
//!
//! # Usage
//! ```rust,ignore
//! use strata_vfs::{VirtualFileSystem, MemoryFileSystem};
//! use std::path::Path;
//!
//! let fs = MemoryFileSystem::with_files([("/src/a/A.strata", b"class A {}".to_vec())]);
//! let text = fs.read_to_string(Path::new("/src/a/A.strata")).unwrap();
//! let units = fs.list_files(Path::new("/src"), "strata").unwrap();
//! ```

mod error;
mod memory;
mod native;
mod r#trait;

pub use error::{VfsError, VfsResult};
pub use memory::MemoryFileSystem;
pub use native::NativeFileSystem;
pub use r#trait::VirtualFileSystem;

/// Create a new memory-based file system.
pub fn memory_fs() -> MemoryFileSystem {
    MemoryFileSystem::new()
}

/// Create a new native file system.
pub fn native_fs() -> NativeFileSystem {
    NativeFileSystem::new()
}

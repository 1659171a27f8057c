//! API error types

use strata_core::EnvironmentError;
use strata_vfs::VfsError;
use thiserror::Error;

/// Everything that can stop a batch run as a whole
///
/// Problems inside units are not errors; they are reported per unit.
#[derive(Error, Debug)]
pub enum StrataError {
    /// A batch source could not be read
    #[error("{0}")]
    Vfs(#[from] VfsError),

    /// The environment failed in a way the run cannot recover from
    #[error("Compilation aborted: {0}")]
    Environment(#[from] EnvironmentError),
}

impl StrataError {
    /// Short name of the stage that failed
    pub fn stage(&self) -> &'static str {
        match self {
            StrataError::Vfs(_) => "loading",
            StrataError::Environment(_) => "compilation",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vfs_error_display() {
        let err = StrataError::from(VfsError::NotFound {
            path: "/src/A.strata".to_string(),
        });
        assert_eq!(err.to_string(), "Path not found: /src/A.strata");
        assert_eq!(err.stage(), "loading");
    }

    #[test]
    fn test_environment_error_display() {
        let err = StrataError::from(EnvironmentError::CorruptProcessingList {
            index: 3,
            reason: "no unit to take",
        });
        assert!(err.to_string().starts_with("Compilation aborted: "));
        assert_eq!(err.stage(), "compilation");
    }
}

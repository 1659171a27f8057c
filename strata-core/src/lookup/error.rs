use thiserror::Error;

/// Failure of an on-demand unit lookup
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    #[error("cannot read {path}: {message}")]
    Io { path: String, message: String },

    #[error("{path} is not valid UTF-8")]
    InvalidUtf8 { path: String },
}

/// Unrecoverable environment failure; aborts the whole batch run
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EnvironmentError {
    #[error("processing list corrupted at position {index}: {reason}")]
    CorruptProcessingList { index: usize, reason: &'static str },

    #[error("lookup of {name} failed: {source}")]
    Provider {
        name: String,
        #[source]
        source: ProviderError,
    },
}

//! Domain error types.

/// Top-level error type for holderscan.
#[derive(Debug, thiserror::Error)]
pub enum HolderscanError {
    #[error("provider error: {reason}")]
    Provider { reason: String },

    #[error("{context}: giving up after {attempts} attempts: {reason}")]
    RetriesExhausted {
        context: String,
        attempts: u32,
        reason: String,
    },

    #[error("store error: {reason}")]
    Store { reason: String },

    #[error("no collected dataset found under {dir}")]
    NoDataset { dir: String },

    #[error("invalid predicate: {reason}")]
    InvalidPredicate { reason: String },

    #[error("invalid security code {code:?}: {reason}")]
    InvalidCode { code: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&HolderscanError> for std::process::ExitCode {
    fn from(err: &HolderscanError) -> Self {
        let code: u8 = match err {
            HolderscanError::Io(_) => 1,
            HolderscanError::ConfigParse { .. } | HolderscanError::ConfigMissing { .. } => 2,
            HolderscanError::Store { .. } => 3,
            HolderscanError::InvalidPredicate { .. } | HolderscanError::InvalidCode { .. } => 4,
            HolderscanError::NoDataset { .. } => 5,
            HolderscanError::Provider { .. } | HolderscanError::RetriesExhausted { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}

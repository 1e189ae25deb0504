use thiserror::Error;

use crate::context::XessContextHandle;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Module not loaded: {0}")]
    ModuleNotFound(String),

    #[error("Pattern '{pattern}' not found in {module}")]
    PatternNotFound { module: String, pattern: String },

    #[error("Address {address:#x} is outside module range {base:#x}+{size:#x}")]
    OutOfBounds { address: usize, base: usize, size: usize },

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("Unknown context handle: {0}")]
    UnknownHandle(XessContextHandle),

    #[error("Context handle already registered: {0}")]
    DuplicateRegistration(XessContextHandle),

    #[error("Invalid config: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Scanner failures that callers handle by disabling the matching hook.
    ///
    /// An out-of-bounds result is reported the same way as a missing match.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::ModuleNotFound(_) | Error::PatternNotFound { .. } | Error::OutOfBounds { .. }
        )
    }

    /// Store failures caused by the hook layer passing a handle it does not own.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Error::UnknownHandle(_) | Error::DuplicateRegistration(_)
        )
    }
}

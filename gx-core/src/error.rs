// gx-core/src/error.rs

use crate::domain::error::DomainError;
use crate::infrastructure::error::{ConnectionError, InfrastructureError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GxError {
    // --- DOMAIN ERRORS (names, duplicates, rejected SQL) ---
    #[error(transparent)]
    Domain(#[from] DomainError),

    // --- INFRASTRUCTURE ERRORS (IO, parsing, engines) ---
    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),

    // --- INTERACTIVE ERRORS ---
    /// The answer source ran dry while a prompt was waiting.
    #[error("No more input while waiting for an answer")]
    InputExhausted,

    #[error("Internal Error: {0}")]
    InternalError(String),
}

// Manual implementation to avoid duplicate enum variant but keep ergonomics
impl From<std::io::Error> for GxError {
    fn from(err: std::io::Error) -> Self {
        GxError::Infrastructure(InfrastructureError::Io(err))
    }
}

impl From<ConnectionError> for GxError {
    fn from(err: ConnectionError) -> Self {
        GxError::Infrastructure(InfrastructureError::Connection(err))
    }
}

impl GxError {
    /// True when the error comes from the database connection layer.
    pub fn is_connection_failure(&self) -> bool {
        matches!(
            self,
            GxError::Infrastructure(InfrastructureError::Connection(_))
                | GxError::Infrastructure(InfrastructureError::Database(_))
        )
    }
}

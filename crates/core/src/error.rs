//! Error types for the core library

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: u64 },

    #[error("Invalid {kind} data: {}", .details.join("; "))]
    Validation {
        kind: &'static str,
        details: Vec<String>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl Error {
    pub fn not_found(kind: &'static str, id: u64) -> Self {
        Self::NotFound { kind, id }
    }

    /// Single-message validation failure
    pub fn invalid(kind: &'static str, detail: impl Into<String>) -> Self {
        Self::Validation {
            kind,
            details: vec![detail.into()],
        }
    }
}

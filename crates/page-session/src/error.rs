// FILE: crates/page-session/src/error.rs

use crate::backend::AudioHandle;
use mushaf_core::AppError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("Audio asset not found: {0}")]
    NotFound(String),

    #[error("Decode error: {0}")]
    DecodeError(String),

    #[error("Unknown handle: {0}")]
    UnknownHandle(AudioHandle),

    #[error("Transport rejected: {0}")]
    Rejected(String),
}

impl BackendError {
    /// Maps a failed load of `key` onto the domain error taxonomy
    pub fn into_load_error(self, key: &str) -> AppError {
        AppError::AudioUnavailable {
            key: key.to_string(),
            reason: self.to_string(),
        }
    }

    /// Maps a rejected transport call onto the domain error taxonomy
    pub fn into_transport_error(self, operation: &str) -> AppError {
        AppError::TransportFailed {
            operation: operation.to_string(),
            reason: self.to_string(),
        }
    }
}

pub type BackendResult<T> = Result<T, BackendError>;

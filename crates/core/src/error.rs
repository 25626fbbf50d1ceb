//! Error types and recovery strategies for the Mushaf reader
//!
//! Errors are classified into three severity tiers:
//! - **Recoverable**: the operation can simply be tried again (a transport call was rejected)
//! - **Degraded**: a feature is unavailable but reading continues (no audio for a page)
//! - **Fatal**: the reader cannot continue without user intervention (no page images at all)
//!
//! Each error includes a recovery action to guide the caller.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Recovery actions that can be taken when an error occurs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Retry the operation immediately
    RetryImmediate,
    /// Keep reading with the failing feature disabled (e.g., audio for one page)
    DisableFeature,
    /// Ignore the request and keep the current state
    Ignore,
    /// Fall back to built-in defaults
    UseDefaults,
    /// No automatic recovery - user intervention required
    UserIntervention,
}

impl fmt::Display for RecoveryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RetryImmediate => write!(f, "Retrying immediately"),
            Self::DisableFeature => write!(f, "Disabling feature"),
            Self::Ignore => write!(f, "Ignoring request"),
            Self::UseDefaults => write!(f, "Using defaults"),
            Self::UserIntervention => write!(f, "User intervention required"),
        }
    }
}

/// Error severity classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Error can be automatically recovered from
    Recoverable,
    /// Feature degraded but the reader can continue
    Degraded,
    /// Critical error requiring user action
    Fatal,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recoverable => write!(f, "Recoverable"),
            Self::Degraded => write!(f, "Degraded"),
            Self::Fatal => write!(f, "Fatal"),
        }
    }
}

/// Main error type for the reader's domain layer
#[derive(Error, Debug)]
pub enum AppError {
    // ===== Navigation Errors =====
    /// Page number outside the Mushaf
    #[error("Page {page} is out of range ({min}-{max})")]
    PageOutOfRange { page: i64, min: u16, max: u16 },

    // ===== Asset Errors =====
    /// Asset file missing from the bundle
    #[error("Asset not found: {path}")]
    AssetNotFound { path: PathBuf },

    /// Audio could not be loaded or decoded
    #[error("Audio unavailable for {key}: {reason}")]
    AudioUnavailable { key: String, reason: String },

    /// Audio transport call (play/pause/seek) rejected by the backend
    #[error("Audio transport '{operation}' failed: {reason}")]
    TransportFailed { operation: String, reason: String },

    // ===== Chapter Index Errors =====
    /// Chapter index could not be parsed
    #[error("Chapter index parse error: {reason}")]
    ChapterIndexParse {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Chapter index parsed but is inconsistent
    #[error("Invalid chapter index: chapter {chapter} - {reason}")]
    InvalidChapterIndex { chapter: u16, reason: String },

    // ===== File System Errors =====
    /// General I/O error
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: io::Error,
    },
}

impl AppError {
    /// Returns the severity level of this error
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::TransportFailed { .. } => ErrorSeverity::Recoverable,

            Self::PageOutOfRange { .. }
            | Self::AudioUnavailable { .. }
            | Self::ChapterIndexParse { .. }
            | Self::InvalidChapterIndex { .. } => ErrorSeverity::Degraded,

            Self::AssetNotFound { .. } | Self::IoError { .. } => ErrorSeverity::Fatal,
        }
    }

    /// Returns the recommended recovery action for this error
    pub fn recovery_action(&self) -> RecoveryAction {
        match self {
            Self::TransportFailed { .. } => RecoveryAction::RetryImmediate,
            Self::AudioUnavailable { .. } => RecoveryAction::DisableFeature,
            Self::PageOutOfRange { .. } => RecoveryAction::Ignore,
            Self::ChapterIndexParse { .. } | Self::InvalidChapterIndex { .. } => {
                RecoveryAction::DisableFeature
            }
            Self::AssetNotFound { .. } | Self::IoError { .. } => RecoveryAction::UserIntervention,
        }
    }

    /// Returns a user-friendly error message suitable for display in the UI
    pub fn user_message(&self) -> String {
        match self {
            Self::PageOutOfRange { min, max, .. } => {
                format!("Pages run from {} to {}.", min, max)
            }
            Self::AssetNotFound { .. } => {
                "A page file is missing from the app bundle. Please reinstall.".to_string()
            }
            Self::AudioUnavailable { .. } => {
                "Recitation is not available for this page.".to_string()
            }
            Self::TransportFailed { .. } => "Audio control failed. Please try again.".to_string(),
            Self::ChapterIndexParse { .. } | Self::InvalidChapterIndex { .. } => {
                "The chapter list could not be loaded.".to_string()
            }
            Self::IoError { .. } => "A file operation failed. Please try again.".to_string(),
        }
    }

    /// Returns true if this error should be logged at ERROR level
    pub fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Fatal
    }

    /// Returns true if this error can be automatically retried
    pub fn is_retryable(&self) -> bool {
        self.recovery_action() == RecoveryAction::RetryImmediate
    }

    /// Helper to create a chapter index parse error from any error type
    pub fn chapter_index<E: std::error::Error + Send + Sync + 'static>(
        reason: impl Into<String>,
        source: E,
    ) -> Self {
        Self::ChapterIndexParse {
            reason: reason.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Convenience type alias for Results using AppError
pub type Result<T> = std::result::Result<T, AppError>;

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        Self::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

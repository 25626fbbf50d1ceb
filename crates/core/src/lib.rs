pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{AppError, ErrorSeverity, RecoveryAction, Result};
pub use types::{
    AssetCatalog, AssetKey, AssetKind, Chapter, ChapterIndex, Duration, NavigationBounds,
    PageNumber, Validator,
};

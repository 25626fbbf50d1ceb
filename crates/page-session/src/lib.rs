//! Page session - keeps the displayed Mushaf page and its recitation in step

pub mod backend;
mod error;
mod gesture;
mod reader;
mod session;
mod state;

pub use backend::{
    AudioBackend, AudioHandle, BackendEvent, Generation, LoadTicket, LoadedTrack, ProbeBackend,
    StatusUpdate,
};
pub use error::{BackendError, BackendResult};
pub use gesture::{PanEnd, PanOutcome, PageTurn, SwipeThresholds, ZoomLimits, ZoomState};
pub use mushaf_core::{AssetCatalog, PageNumber};
pub use reader::{ControlsState, PageReader, ReaderSettings};
pub use session::PageSession;
pub use state::PlaybackState;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_exports_accessible() {
        let _ = PlaybackState::Idle;
        let _ = SwipeThresholds::default();
        let _ = ZoomState::default();
    }

    #[test]
    fn test_error_display() {
        let error = BackendError::DecodeError("truncated header".to_string());
        assert!(format!("{}", error).contains("truncated header"));
    }
}

//! Playback state machine for a page's recitation track

use crate::backend::StatusUpdate;
use mushaf_core::Duration;

/// Playback state of the current page's audio
///
/// Legal transitions:
///
/// ```text
/// Idle ──open──▶ Loading ──loaded──▶ Ready ◀──toggle──▶ Playing
///                   │                  ▲                   │
///                   └──failed──▶ Error └────finished───────┘
/// ```
///
/// Any state moves back to `Loading` when another page is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Loading,
    Ready { position_ms: u64, duration_ms: u64 },
    Playing { position_ms: u64, duration_ms: u64 },
    Error,
}

impl PlaybackState {
    /// State right after a track finished loading
    pub fn loaded(duration_ms: u64) -> Self {
        Self::Ready {
            position_ms: 0,
            duration_ms,
        }
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing { .. })
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }

    /// True when transport controls have a track to act on
    pub fn has_track(&self) -> bool {
        matches!(self, Self::Ready { .. } | Self::Playing { .. })
    }

    pub fn position_ms(&self) -> u64 {
        match self {
            Self::Ready { position_ms, .. } | Self::Playing { position_ms, .. } => *position_ms,
            _ => 0,
        }
    }

    pub fn duration_ms(&self) -> u64 {
        match self {
            Self::Ready { duration_ms, .. } | Self::Playing { duration_ms, .. } => *duration_ms,
            _ => 0,
        }
    }

    pub fn position(&self) -> Duration {
        Duration::from_millis(self.position_ms())
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms())
    }

    pub fn progress_percentage(&self) -> f32 {
        let duration = self.duration_ms();
        if duration == 0 {
            return 0.0;
        }
        ((self.position_ms() as f64 / duration as f64) * 100.0) as f32
    }

    /// Play/pause counterpart of a loaded state, `None` when there is no track
    pub fn toggled(self) -> Option<Self> {
        match self {
            Self::Ready {
                position_ms,
                duration_ms,
            } => Some(Self::Playing {
                position_ms,
                duration_ms,
            }),
            Self::Playing {
                position_ms,
                duration_ms,
            } => Some(Self::Ready {
                position_ms,
                duration_ms,
            }),
            _ => None,
        }
    }

    /// Same state with the position moved, clamped to the track length
    pub fn with_position(self, position_ms: u64) -> Self {
        match self {
            Self::Ready { duration_ms, .. } => Self::Ready {
                position_ms: position_ms.min(duration_ms),
                duration_ms,
            },
            Self::Playing { duration_ms, .. } => Self::Playing {
                position_ms: position_ms.min(duration_ms),
                duration_ms,
            },
            other => other,
        }
    }

    /// Applies a status push from the backend
    ///
    /// Only loaded states react. A natural end of track rewinds to the start
    /// and stops; it never turns the page.
    pub fn on_status(self, update: &StatusUpdate) -> Self {
        if !self.has_track() {
            return self;
        }

        let duration_ms = if update.duration_ms > 0 {
            update.duration_ms
        } else {
            self.duration_ms()
        };

        if update.did_finish {
            return Self::loaded(duration_ms);
        }

        let position_ms = update.position_ms.min(duration_ms);
        if update.is_playing {
            Self::Playing {
                position_ms,
                duration_ms,
            }
        } else {
            Self::Ready {
                position_ms,
                duration_ms,
            }
        }
    }
}

//! Audio backend contract
//!
//! The backend owns decoding and output. Loads are asynchronous: `load`
//! only starts the work, and the outcome is handed back to the session later
//! as a [`BackendEvent::LoadCompleted`] carrying the [`LoadTicket`] it was
//! started with. Status pushes arrive the same way, tagged with the handle
//! they describe.

mod probe;

pub use probe::{probe_duration_ms, ProbeBackend};

use crate::error::{BackendError, BackendResult};
use mushaf_core::{AssetKey, PageNumber};
use std::fmt;

/// Opaque reference to a loaded, backend-owned audio resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AudioHandle(u64);

impl AudioHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for AudioHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic counter identifying one `open` of a page session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Identifies the load a completion belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket {
    generation: Generation,
    page: PageNumber,
}

impl LoadTicket {
    pub fn new(generation: Generation, page: PageNumber) -> Self {
        Self { generation, page }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn page(&self) -> PageNumber {
        self.page
    }
}

/// A successfully loaded track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadedTrack {
    pub handle: AudioHandle,
    pub duration_ms: u64,
}

/// Playback status pushed by the backend at its own cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusUpdate {
    pub position_ms: u64,
    pub duration_ms: u64,
    pub is_playing: bool,
    /// Natural end of the track (never set for looping playback)
    pub did_finish: bool,
}

/// Asynchronous callbacks from the backend to the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendEvent {
    LoadCompleted {
        ticket: LoadTicket,
        result: BackendResult<LoadedTrack>,
    },
    Status {
        handle: AudioHandle,
        update: StatusUpdate,
    },
}

/// Audio playback collaborator injected into a [`PageSession`](crate::PageSession)
///
/// Every call must return promptly. An `Err` from `load` means the request
/// was refused outright; failures discovered later are reported through
/// [`BackendEvent::LoadCompleted`].
pub trait AudioBackend {
    fn load(&mut self, key: &AssetKey, ticket: LoadTicket) -> BackendResult<()>;

    fn play(&mut self, handle: AudioHandle) -> BackendResult<()>;

    fn pause(&mut self, handle: AudioHandle) -> BackendResult<()>;

    fn seek(&mut self, handle: AudioHandle, position_ms: u64) -> BackendResult<()>;

    fn unload(&mut self, handle: AudioHandle) -> BackendResult<()>;
}

impl<B: AudioBackend + ?Sized> AudioBackend for Box<B> {
    fn load(&mut self, key: &AssetKey, ticket: LoadTicket) -> BackendResult<()> {
        (**self).load(key, ticket)
    }

    fn play(&mut self, handle: AudioHandle) -> BackendResult<()> {
        (**self).play(handle)
    }

    fn pause(&mut self, handle: AudioHandle) -> BackendResult<()> {
        (**self).pause(handle)
    }

    fn seek(&mut self, handle: AudioHandle, position_ms: u64) -> BackendResult<()> {
        (**self).seek(handle, position_ms)
    }

    fn unload(&mut self, handle: AudioHandle) -> BackendResult<()> {
        (**self).unload(handle)
    }
}

pub(crate) fn unknown(handle: AudioHandle) -> BackendError {
    BackendError::UnknownHandle(handle)
}

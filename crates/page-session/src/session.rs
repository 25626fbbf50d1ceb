//! Page/audio synchronization controller

use crate::backend::{
    AudioBackend, AudioHandle, BackendEvent, Generation, LoadTicket, LoadedTrack, StatusUpdate,
};
use crate::error::BackendResult;
use crate::state::PlaybackState;
use mushaf_core::{AppError, AssetCatalog, AssetKey, PageNumber};

/// Keeps the displayed page, its recitation track and the playback state
/// consistent with each other
///
/// At most one audio handle is held at any time. Every page change releases
/// it before the next load starts, and dropping the session releases it too.
pub struct PageSession<B: AudioBackend> {
    page: PageNumber,
    catalog: AssetCatalog,
    backend: B,
    state: PlaybackState,
    handle: Option<AudioHandle>,
    generation: Generation,
    pending: Option<LoadTicket>,
    last_error: Option<AppError>,
}

impl<B: AudioBackend> PageSession<B> {
    /// Creates an idle session positioned on `page`; no audio is requested yet
    pub fn new(page: PageNumber, catalog: AssetCatalog, backend: B) -> Self {
        Self {
            page,
            catalog,
            backend,
            state: PlaybackState::Idle,
            handle: None,
            generation: Generation::default(),
            pending: None,
            last_error: None,
        }
    }

    /// Creates a session and starts loading the audio of `page`
    pub fn mount(page: PageNumber, catalog: AssetCatalog, backend: B) -> Self {
        let mut session = Self::new(page, catalog, backend);
        session.open(page);
        session
    }

    /// Switches to `page` and requests its audio
    ///
    /// Supersedes any outstanding load: its completion will be discarded.
    pub fn open(&mut self, page: PageNumber) {
        self.release();

        self.generation = self.generation.next();
        let ticket = LoadTicket::new(self.generation, page);
        let key = self.catalog.audio_key(page);

        self.page = page;
        self.last_error = None;
        self.state = PlaybackState::Loading;
        self.pending = Some(ticket);

        log::debug!(
            "Opening page {} (generation {}), loading {}",
            page,
            self.generation.value(),
            key
        );

        if let Err(e) = self.backend.load(&key, ticket) {
            self.pending = None;
            self.fail_load(&key, e.into_load_error(key.as_str()));
        }
    }

    /// Advances one page; returns false on the last page
    pub fn next(&mut self) -> bool {
        match self.page.next() {
            Some(page) => {
                self.open(page);
                true
            }
            None => false,
        }
    }

    /// Goes back one page; returns false on the first page
    pub fn previous(&mut self) -> bool {
        match self.page.previous() {
            Some(page) => {
                self.open(page);
                true
            }
            None => false,
        }
    }

    /// Plays a paused track or pauses a playing one
    ///
    /// Does nothing while loading, after a load failure, or without a track.
    /// A rejected call leaves the state as it was.
    pub fn toggle_playback(&mut self) {
        let Some(handle) = self.handle else {
            return;
        };
        let Some(target) = self.state.toggled() else {
            return;
        };

        let (operation, result) = if target.is_playing() {
            ("play", self.backend.play(handle))
        } else {
            ("pause", self.backend.pause(handle))
        };

        self.commit_transport(operation, result, target);
    }

    /// Moves the playhead, clamping to the track bounds
    pub fn seek(&mut self, position_ms: i64) {
        let Some(handle) = self.handle else {
            return;
        };
        if !self.state.has_track() {
            return;
        }

        let duration = self.state.duration_ms();
        let target = position_ms.clamp(0, duration as i64) as u64;
        let result = self.backend.seek(handle, target);
        let next = self.state.with_position(target);
        self.commit_transport("seek", result, next);
    }

    /// Completion callback for a load started by [`open`](Self::open)
    pub fn on_load_complete(&mut self, ticket: LoadTicket, result: BackendResult<LoadedTrack>) {
        if self.pending != Some(ticket) {
            log::debug!(
                "Discarding stale load for page {} (generation {}, current {})",
                ticket.page(),
                ticket.generation().value(),
                self.generation.value()
            );
            if let Ok(track) = result {
                self.unload(track.handle);
            }
            return;
        }

        self.pending = None;
        match result {
            Ok(track) => {
                log::debug!(
                    "Audio for page {} ready: {} ({} ms)",
                    self.page,
                    track.handle,
                    track.duration_ms
                );
                self.handle = Some(track.handle);
                self.state = PlaybackState::loaded(track.duration_ms);
            }
            Err(e) => {
                let key = self.audio_key();
                let error = e.into_load_error(key.as_str());
                self.fail_load(&key, error);
            }
        }
    }

    /// Status push from the backend for `handle`
    ///
    /// Updates for any handle other than the one currently held are ignored.
    pub fn on_backend_status(&mut self, handle: AudioHandle, update: StatusUpdate) {
        if self.handle != Some(handle) {
            log::trace!("Ignoring status for released handle {}", handle);
            return;
        }
        if update.did_finish {
            log::debug!("Recitation of page {} finished", self.page);
        }
        self.state = self.state.on_status(&update);
    }

    /// Routes a backend event to the matching callback
    pub fn dispatch(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::LoadCompleted { ticket, result } => self.on_load_complete(ticket, result),
            BackendEvent::Status { handle, update } => self.on_backend_status(handle, update),
        }
    }

    pub fn page(&self) -> PageNumber {
        self.page
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn can_go_next(&self) -> bool {
        self.page.next().is_some()
    }

    pub fn can_go_previous(&self) -> bool {
        self.page.previous().is_some()
    }

    /// Image shown for the current page, independent of the audio outcome
    pub fn image_key(&self) -> AssetKey {
        self.catalog.image_key(self.page)
    }

    pub fn audio_key(&self) -> AssetKey {
        self.catalog.audio_key(self.page)
    }

    pub fn handle(&self) -> Option<AudioHandle> {
        self.handle
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Why the current page has no audio, if it failed to load
    pub fn last_error(&self) -> Option<&AppError> {
        self.last_error.as_ref()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    fn release(&mut self) {
        self.pending = None;
        if let Some(handle) = self.handle.take() {
            self.unload(handle);
        }
    }

    fn unload(&mut self, handle: AudioHandle) {
        if let Err(e) = self.backend.unload(handle) {
            log::warn!("Failed to unload audio {}: {}", handle, e);
        }
    }

    fn fail_load(&mut self, key: &AssetKey, error: AppError) {
        log::warn!("No audio for page {} ({}): {}", self.page, key, error);
        self.state = PlaybackState::Error;
        self.last_error = Some(error);
    }

    fn commit_transport(&mut self, operation: &str, result: BackendResult<()>, next: PlaybackState) {
        match result {
            Ok(()) => self.state = next,
            Err(e) => {
                let error = e.into_transport_error(operation);
                log::warn!("{} on page {}; keeping {:?}", error, self.page, self.state);
            }
        }
    }
}

impl<B: AudioBackend> Drop for PageSession<B> {
    fn drop(&mut self) {
        self.release();
    }
}

//! Headless backend that probes bundled tracks and simulates a playback clock
//!
//! No audio is output. Durations come from the container headers, and the
//! position only moves when the host calls [`ProbeBackend::advance`].

use super::{
    unknown, AudioBackend, AudioHandle, BackendEvent, LoadTicket, LoadedTrack, StatusUpdate,
};
use crate::error::{BackendError, BackendResult};
use mushaf_core::AssetKey;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::time::Duration;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

#[derive(Debug, Clone, Copy)]
struct Track {
    duration_ms: u64,
    position_ms: u64,
    playing: bool,
}

impl Track {
    fn status(&self, did_finish: bool) -> StatusUpdate {
        StatusUpdate {
            position_ms: self.position_ms,
            duration_ms: self.duration_ms,
            is_playing: self.playing,
            did_finish,
        }
    }
}

pub struct ProbeBackend {
    root: PathBuf,
    next_handle: u64,
    tracks: HashMap<AudioHandle, Track>,
    events: VecDeque<BackendEvent>,
}

impl ProbeBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            next_handle: 1,
            tracks: HashMap::new(),
            events: VecDeque::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of tracks currently held
    pub fn loaded_count(&self) -> usize {
        self.tracks.len()
    }

    /// Takes every event queued since the last call
    pub fn drain_events(&mut self) -> Vec<BackendEvent> {
        self.events.drain(..).collect()
    }

    /// Moves the clock of every playing track forward by `elapsed`
    pub fn advance(&mut self, elapsed: Duration) {
        let step = elapsed.as_millis() as u64;
        let mut handles: Vec<_> = self.tracks.keys().copied().collect();
        handles.sort_by_key(|h| h.id());

        for handle in handles {
            let Some(track) = self.tracks.get_mut(&handle) else {
                continue;
            };
            if !track.playing {
                continue;
            }

            track.position_ms = track.position_ms.saturating_add(step);
            let update = if track.position_ms >= track.duration_ms {
                track.position_ms = track.duration_ms;
                track.playing = false;
                let update = track.status(true);
                track.position_ms = 0;
                update
            } else {
                track.status(false)
            };
            self.events.push_back(BackendEvent::Status { handle, update });
        }
    }

    fn track_mut(&mut self, handle: AudioHandle) -> BackendResult<&mut Track> {
        self.tracks.get_mut(&handle).ok_or_else(|| unknown(handle))
    }

    fn push_status(&mut self, handle: AudioHandle) {
        if let Some(track) = self.tracks.get(&handle) {
            let update = track.status(false);
            self.events.push_back(BackendEvent::Status { handle, update });
        }
    }
}

impl AudioBackend for ProbeBackend {
    fn load(&mut self, key: &AssetKey, ticket: LoadTicket) -> BackendResult<()> {
        let path = key.resolve(&self.root);
        let result = probe_duration_ms(&path).map(|duration_ms| {
            let handle = AudioHandle::new(self.next_handle);
            self.next_handle += 1;
            self.tracks.insert(
                handle,
                Track {
                    duration_ms,
                    position_ms: 0,
                    playing: false,
                },
            );
            log::debug!("Probed {} ({} ms) as {}", key, duration_ms, handle);
            LoadedTrack {
                handle,
                duration_ms,
            }
        });
        self.events
            .push_back(BackendEvent::LoadCompleted { ticket, result });
        Ok(())
    }

    fn play(&mut self, handle: AudioHandle) -> BackendResult<()> {
        self.track_mut(handle)?.playing = true;
        self.push_status(handle);
        Ok(())
    }

    fn pause(&mut self, handle: AudioHandle) -> BackendResult<()> {
        self.track_mut(handle)?.playing = false;
        self.push_status(handle);
        Ok(())
    }

    fn seek(&mut self, handle: AudioHandle, position_ms: u64) -> BackendResult<()> {
        let track = self.track_mut(handle)?;
        track.position_ms = position_ms.min(track.duration_ms);
        self.push_status(handle);
        Ok(())
    }

    fn unload(&mut self, handle: AudioHandle) -> BackendResult<()> {
        self.tracks
            .remove(&handle)
            .map(|_| ())
            .ok_or_else(|| unknown(handle))
    }
}

/// Reads the track duration from the container without decoding audio
pub fn probe_duration_ms(path: &Path) -> BackendResult<u64> {
    let file = std::fs::File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => BackendError::NotFound(path.display().to_string()),
        _ => BackendError::DecodeError(format!("Failed to open file: {}", e)),
    })?;

    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(extension) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(extension);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| BackendError::DecodeError(format!("Failed to probe format: {}", e)))?;

    let track = probed
        .format
        .default_track()
        .ok_or_else(|| BackendError::DecodeError("No audio track found".to_string()))?;

    let params = &track.codec_params;
    match (params.n_frames, params.sample_rate) {
        (Some(frames), Some(rate)) if rate > 0 => Ok(frames * 1000 / u64::from(rate)),
        _ => Err(BackendError::DecodeError(
            "Track does not declare its length".to_string(),
        )),
    }
}

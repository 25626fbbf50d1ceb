//! Integration tests for page/audio synchronization
//!
//! A scripted backend records every call in a shared log so tests can
//! inspect it after the session has been dropped.

use mushaf_core::AssetKey;
use page_session::{
    AssetCatalog, AudioBackend, AudioHandle, BackendError, BackendEvent, BackendResult,
    LoadTicket, LoadedTrack, PageNumber, PageReader, PageSession, PanEnd, PlaybackState,
    ReaderSettings, StatusUpdate,
};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Load(String),
    Play(AudioHandle),
    Pause(AudioHandle),
    Seek(AudioHandle, u64),
    Unload(AudioHandle),
}

#[derive(Default)]
struct Log {
    calls: Vec<Call>,
    tickets: Vec<LoadTicket>,
}

#[derive(Clone, Default)]
struct Scripted {
    log: Rc<RefCell<Log>>,
}

impl Scripted {
    fn calls(&self) -> Vec<Call> {
        self.log.borrow().calls.clone()
    }

    fn loads(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Load(_)))
            .count()
    }

    fn ticket(&self, index: usize) -> LoadTicket {
        self.log.borrow().tickets[index]
    }

    fn last_ticket(&self) -> LoadTicket {
        *self.log.borrow().tickets.last().expect("no load requested")
    }
}

impl AudioBackend for Scripted {
    fn load(&mut self, key: &AssetKey, ticket: LoadTicket) -> BackendResult<()> {
        let mut log = self.log.borrow_mut();
        log.calls.push(Call::Load(key.to_string()));
        log.tickets.push(ticket);
        Ok(())
    }

    fn play(&mut self, handle: AudioHandle) -> BackendResult<()> {
        self.log.borrow_mut().calls.push(Call::Play(handle));
        Ok(())
    }

    fn pause(&mut self, handle: AudioHandle) -> BackendResult<()> {
        self.log.borrow_mut().calls.push(Call::Pause(handle));
        Ok(())
    }

    fn seek(&mut self, handle: AudioHandle, position_ms: u64) -> BackendResult<()> {
        self.log.borrow_mut().calls.push(Call::Seek(handle, position_ms));
        Ok(())
    }

    fn unload(&mut self, handle: AudioHandle) -> BackendResult<()> {
        self.log.borrow_mut().calls.push(Call::Unload(handle));
        Ok(())
    }
}

fn page(n: i64) -> PageNumber {
    PageNumber::new(n).expect("valid page")
}

fn session_on(n: i64) -> (PageSession<Scripted>, Scripted) {
    let backend = Scripted::default();
    let session = PageSession::mount(page(n), AssetCatalog::default(), backend.clone());
    (session, backend)
}

fn track(handle: u64, duration_ms: u64) -> BackendResult<LoadedTrack> {
    Ok(LoadedTrack {
        handle: AudioHandle::new(handle),
        duration_ms,
    })
}

#[test]
fn test_superseded_load_never_wins() {
    for p in 1..604 {
        let (mut session, backend) = session_on(p);
        session.open(page(p + 1));

        let stale = backend.ticket(0);
        let current = backend.ticket(1);

        // late completion of the abandoned page arrives first
        session.on_load_complete(stale, track(1, 11_111));
        assert_eq!(session.state(), PlaybackState::Loading);
        assert_eq!(session.handle(), None);

        session.on_load_complete(current, track(2, 22_222));
        assert_eq!(session.page(), page(p + 1));
        assert_eq!(session.state(), PlaybackState::loaded(22_222));
        assert_eq!(session.handle(), Some(AudioHandle::new(2)));
        assert!(backend.calls().contains(&Call::Unload(AudioHandle::new(1))));
    }
}

#[test]
fn test_stale_completion_after_current_is_discarded() {
    let (mut session, backend) = session_on(20);
    session.open(page(21));
    session.on_load_complete(backend.ticket(1), track(2, 5000));
    session.on_load_complete(backend.ticket(0), track(1, 9000));

    assert_eq!(session.state(), PlaybackState::loaded(5000));
    assert_eq!(session.handle(), Some(AudioHandle::new(2)));
}

#[test]
fn test_stale_failure_does_not_set_error() {
    let (mut session, backend) = session_on(20);
    session.open(page(21));
    session.on_load_complete(
        backend.ticket(0),
        Err(BackendError::DecodeError("truncated".to_string())),
    );
    assert_eq!(session.state(), PlaybackState::Loading);
    assert!(session.last_error().is_none());
}

#[test]
fn test_navigation_bounds() {
    let (mut last, backend) = session_on(604);
    assert!(!last.next());
    assert_eq!(last.page(), page(604));
    assert_eq!(backend.loads(), 1);

    let (mut first, backend) = session_on(1);
    assert!(!first.previous());
    assert_eq!(first.page(), page(1));
    assert_eq!(backend.loads(), 1);
}

#[test]
fn test_seek_clamps_to_track() {
    let (mut session, backend) = session_on(3);
    session.on_load_complete(backend.last_ticket(), track(7, 120_000));

    session.seek(500_000);
    assert_eq!(session.state().position_ms(), 120_000);

    session.seek(-20);
    assert_eq!(session.state().position_ms(), 0);

    let seeks: Vec<_> = backend
        .calls()
        .into_iter()
        .filter(|c| matches!(c, Call::Seek(..)))
        .collect();
    assert_eq!(
        seeks,
        vec![
            Call::Seek(AudioHandle::new(7), 120_000),
            Call::Seek(AudioHandle::new(7), 0)
        ]
    );
}

#[test]
fn test_seek_ignored_without_track() {
    let (mut session, backend) = session_on(3);
    session.seek(1000);
    assert_eq!(session.state(), PlaybackState::Loading);
    assert!(!backend.calls().iter().any(|c| matches!(c, Call::Seek(..))));
}

#[test]
fn test_swipe_thresholds_drive_navigation() {
    let backend = Scripted::default();
    let mut reader = PageReader::open(
        page(50),
        AssetCatalog::default(),
        backend.clone(),
        ReaderSettings::default(),
    );

    reader.on_pan_end(PanEnd {
        translation_x: -50.0,
        translation_y: 0.0,
        velocity_x: -600.0,
    });
    assert_eq!(backend.loads(), 1);
    assert_eq!(reader.page(), page(50));

    reader.on_pan_end(PanEnd {
        translation_x: -150.0,
        translation_y: 0.0,
        velocity_x: -600.0,
    });
    assert_eq!(backend.loads(), 2);
    assert_eq!(reader.page(), page(51));
}

#[test]
fn test_finish_rewinds_and_stays_on_page() {
    let (mut session, backend) = session_on(8);
    session.on_load_complete(backend.last_ticket(), track(1, 40_000));
    session.toggle_playback();

    session.dispatch(BackendEvent::Status {
        handle: AudioHandle::new(1),
        update: StatusUpdate {
            position_ms: 40_000,
            duration_ms: 40_000,
            is_playing: false,
            did_finish: true,
        },
    });

    assert_eq!(session.state(), PlaybackState::loaded(40_000));
    assert_eq!(session.page(), page(8));
    assert_eq!(backend.loads(), 1);
}

#[test]
fn test_play_then_turn_page_scenario() {
    let (mut session, backend) = session_on(1);
    session.on_load_complete(backend.last_ticket(), track(1, 120_000));

    session.toggle_playback();
    assert!(session.state().is_playing());

    session.on_backend_status(
        AudioHandle::new(1),
        StatusUpdate {
            position_ms: 60_000,
            duration_ms: 120_000,
            is_playing: true,
            did_finish: false,
        },
    );
    assert_eq!(session.state().position_ms(), 60_000);

    assert!(session.next());
    assert_eq!(session.state(), PlaybackState::Loading);
    assert_eq!(session.handle(), None);
    assert_eq!(
        backend.calls(),
        vec![
            Call::Load("audio/001.ogg".to_string()),
            Call::Play(AudioHandle::new(1)),
            Call::Unload(AudioHandle::new(1)),
            Call::Load("audio/002.ogg".to_string()),
        ]
    );
}

#[test]
fn test_toggle_pauses_playing_track() {
    let (mut session, backend) = session_on(2);
    session.on_load_complete(backend.last_ticket(), track(4, 10_000));
    session.toggle_playback();
    session.toggle_playback();

    assert_eq!(session.state(), PlaybackState::loaded(10_000));
    assert!(backend.calls().contains(&Call::Pause(AudioHandle::new(4))));
}

#[test]
fn test_toggle_ignored_while_loading_or_failed() {
    let (mut session, backend) = session_on(2);
    session.toggle_playback();
    assert_eq!(session.state(), PlaybackState::Loading);

    session.on_load_complete(
        backend.last_ticket(),
        Err(BackendError::NotFound("audio/002.ogg".to_string())),
    );
    session.toggle_playback();
    assert_eq!(session.state(), PlaybackState::Error);
    assert!(!backend.calls().iter().any(|c| matches!(c, Call::Play(_))));
}

#[test]
fn test_load_failure_keeps_navigation_working() {
    let (mut session, backend) = session_on(30);
    session.on_load_complete(
        backend.last_ticket(),
        Err(BackendError::NotFound("audio/030.ogg".to_string())),
    );
    assert!(session.state().is_error());
    assert_eq!(session.image_key().as_str(), "pages/030.webp");
    let message = session.last_error().map(|e| e.user_message());
    assert_eq!(message.as_deref(), Some("Recitation is not available for this page."));

    assert!(session.next());
    assert_eq!(session.state(), PlaybackState::Loading);
    assert!(session.last_error().is_none());
}

#[test]
fn test_drop_unloads_held_track() {
    let (mut session, backend) = session_on(12);
    session.on_load_complete(backend.last_ticket(), track(3, 1000));
    drop(session);
    assert_eq!(backend.calls().last(), Some(&Call::Unload(AudioHandle::new(3))));
}

#[test]
fn test_previous_handle_released_before_each_load() {
    let (mut session, backend) = session_on(100);
    for handle in 1..=5 {
        session.on_load_complete(backend.last_ticket(), track(handle, 1000));
        session.next();
    }

    let calls = backend.calls();
    let loads: Vec<usize> = calls
        .iter()
        .enumerate()
        .filter(|(_, c)| matches!(c, Call::Load(_)))
        .map(|(i, _)| i)
        .collect();
    assert_eq!(loads.len(), 6);

    for pair in loads.windows(2) {
        let between = &calls[pair[0] + 1..pair[1]];
        let unloads = between
            .iter()
            .filter(|c| matches!(c, Call::Unload(_)))
            .count();
        assert_eq!(unloads, 1);
    }
}

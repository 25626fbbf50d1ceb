//! View model of a mounted page: session, zoom state and the controls bar

use crate::backend::{AudioBackend, BackendEvent};
use crate::gesture::{PanEnd, PanOutcome, PageTurn, SwipeThresholds, ZoomLimits, ZoomState};
use crate::session::PageSession;
use mushaf_core::{AssetCatalog, AssetKey, PageNumber};

/// Tunables of the reader view
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ReaderSettings {
    pub swipe: SwipeThresholds,
    pub zoom: ZoomLimits,
    pub hide_controls: bool,
}

/// What the controls bar shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlsState {
    pub page: PageNumber,
    pub can_go_previous: bool,
    pub can_go_next: bool,
    pub previous_enabled: bool,
    pub next_enabled: bool,
    pub play_enabled: bool,
    pub is_playing: bool,
    pub position_label: String,
    pub duration_label: String,
}

pub struct PageReader<B: AudioBackend> {
    session: PageSession<B>,
    zoom: ZoomState,
    swipe: SwipeThresholds,
    controls_visible: bool,
}

impl<B: AudioBackend> PageReader<B> {
    /// Mounts the reader on `page` and starts loading its audio
    pub fn open(page: PageNumber, catalog: AssetCatalog, backend: B, settings: ReaderSettings) -> Self {
        Self {
            session: PageSession::mount(page, catalog, backend),
            zoom: ZoomState::new(settings.zoom),
            swipe: settings.swipe,
            controls_visible: !settings.hide_controls,
        }
    }

    pub fn session(&self) -> &PageSession<B> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut PageSession<B> {
        &mut self.session
    }

    pub fn zoom(&self) -> &ZoomState {
        &self.zoom
    }

    pub fn page(&self) -> PageNumber {
        self.session.page()
    }

    pub fn page_image(&self) -> AssetKey {
        self.session.image_key()
    }

    pub fn controls_visible(&self) -> bool {
        self.controls_visible
    }

    /// Single tap on the page shows or hides the header and controls
    pub fn on_tap(&mut self) {
        self.controls_visible = !self.controls_visible;
    }

    pub fn on_double_tap(&mut self) {
        self.zoom.double_tap();
    }

    pub fn on_pinch_update(&mut self, factor: f32) {
        self.zoom.pinch_update(factor);
    }

    pub fn on_pinch_end(&mut self) {
        self.zoom.pinch_end();
    }

    pub fn on_pan_update(&mut self, translation_x: f32, translation_y: f32) {
        self.zoom.pan_update(translation_x, translation_y);
    }

    /// Finishes a pan, turning the page when the swipe qualifies
    ///
    /// Returns the turn only if the page actually changed.
    pub fn on_pan_end(&mut self, pan: PanEnd) -> Option<PageTurn> {
        match self.zoom.pan_end(pan, &self.swipe) {
            PanOutcome::Turn(turn) => self.turn(turn).then_some(turn),
            PanOutcome::Panned | PanOutcome::SnapBack => None,
        }
    }

    /// Skip-forward button; disabled while the current audio is loading
    pub fn press_next(&mut self) -> bool {
        self.controls().next_enabled && self.turn(PageTurn::Next)
    }

    /// Skip-back button; disabled while the current audio is loading
    pub fn press_previous(&mut self) -> bool {
        self.controls().previous_enabled && self.turn(PageTurn::Previous)
    }

    pub fn press_play(&mut self) {
        self.session.toggle_playback();
    }

    /// Slider released at `position_ms`
    pub fn release_slider(&mut self, position_ms: i64) {
        self.session.seek(position_ms);
    }

    pub fn dispatch(&mut self, event: BackendEvent) {
        self.session.dispatch(event);
    }

    pub fn controls(&self) -> ControlsState {
        let state = self.session.state();
        let loading = state.is_loading();
        let can_go_previous = self.session.can_go_previous();
        let can_go_next = self.session.can_go_next();

        ControlsState {
            page: self.session.page(),
            can_go_previous,
            can_go_next,
            previous_enabled: can_go_previous && !loading,
            next_enabled: can_go_next && !loading,
            play_enabled: !loading,
            is_playing: state.is_playing(),
            position_label: state.position().as_clock(),
            duration_label: state.duration().as_clock(),
        }
    }

    fn turn(&mut self, turn: PageTurn) -> bool {
        let moved = match turn {
            PageTurn::Next => self.session.next(),
            PageTurn::Previous => self.session.previous(),
        };
        if moved {
            // a fresh page is mounted unzoomed
            self.zoom.reset();
        }
        moved
    }
}

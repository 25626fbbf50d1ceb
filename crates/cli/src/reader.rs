//! Interactive terminal reader
//!
//! Keys are read on a dedicated thread and forwarded over a channel; the
//! main task interleaves them with a ticker that moves the playback clock and
//! pumps backend events into the reader.

use crate::settings;
use anyhow::{Context, Result};
use console::{style, Key, Term};
use mushaf_config::Config;
use mushaf_core::{ChapterIndex, PageNumber};
use page_session::{PageReader, PlaybackState, ProbeBackend};
use std::time::Duration as StdDuration;
use tokio::sync::mpsc;
use tokio::time::{interval, Instant, MissedTickBehavior};

const TICK: StdDuration = StdDuration::from_millis(100);
const SEEK_STEP_MS: i64 = 10_000;
const BAR_WIDTH: usize = 40;

/// What a key press asks the reader to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    Next,
    Previous,
    TogglePlayback,
    SeekBack,
    SeekForward,
    ToggleControls,
    ToggleZoom,
    Quit,
}

impl Action {
    pub(crate) fn from_key(key: &Key) -> Option<Self> {
        match key {
            Key::ArrowRight | Key::Char('n') => Some(Action::Next),
            Key::ArrowLeft | Key::Char('p') => Some(Action::Previous),
            Key::Char(' ') => Some(Action::TogglePlayback),
            Key::Char('[') => Some(Action::SeekBack),
            Key::Char(']') => Some(Action::SeekForward),
            Key::Char('c') => Some(Action::ToggleControls),
            Key::Char('z') => Some(Action::ToggleZoom),
            Key::Char('q') | Key::Escape => Some(Action::Quit),
            _ => None,
        }
    }
}

/// Runs the reader on `page` until the user quits
pub async fn run(config: &Config, page: PageNumber) -> Result<()> {
    let root = config.assets.root.clone();
    if !root.is_dir() {
        log::warn!("Asset root {} does not exist", root.display());
    }

    let chapters = crate::commands::optional_chapter_index(config);
    let mut reader = PageReader::open(
        page,
        settings::asset_catalog(config),
        ProbeBackend::new(root),
        settings::reader_settings(config),
    );

    let term = Term::stdout();
    if term.hide_cursor().is_err() {
        eprintln!("Warning: Failed to hide cursor");
    }

    let result = reader_loop(&term, &mut reader, chapters.as_ref()).await;

    let _ = term.show_cursor();
    result
}

async fn reader_loop(
    term: &Term,
    reader: &mut PageReader<ProbeBackend>,
    chapters: Option<&ChapterIndex>,
) -> Result<()> {
    let (tx, mut keys) = mpsc::unbounded_channel();
    let key_term = term.clone();
    std::thread::spawn(move || {
        while let Ok(key) = key_term.read_key() {
            if tx.send(key).is_err() {
                break;
            }
        }
    });

    let mut ticker = interval(TICK);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last_tick = Instant::now();

    loop {
        pump(reader);
        draw(term, reader, chapters)?;

        tokio::select! {
            _ = ticker.tick() => {
                let now = Instant::now();
                reader.session_mut().backend_mut().advance(now - last_tick);
                last_tick = now;
            }
            key = keys.recv() => {
                let Some(key) = key else {
                    break;
                };
                if let Some(action) = Action::from_key(&key) {
                    if !apply(reader, action) {
                        break;
                    }
                }
            }
        }
    }

    Ok(())
}

/// Delivers queued backend events to the reader
pub(crate) fn pump(reader: &mut PageReader<ProbeBackend>) {
    let events = reader.session_mut().backend_mut().drain_events();
    for event in events {
        reader.dispatch(event);
    }
}

/// Applies one action; returns false when the reader should close
pub(crate) fn apply(reader: &mut PageReader<ProbeBackend>, action: Action) -> bool {
    match action {
        Action::Next => {
            reader.press_next();
        }
        Action::Previous => {
            reader.press_previous();
        }
        Action::TogglePlayback => reader.press_play(),
        Action::SeekBack | Action::SeekForward => {
            let step = if action == Action::SeekBack {
                -SEEK_STEP_MS
            } else {
                SEEK_STEP_MS
            };
            let position = reader.session().state().position_ms() as i64;
            reader.release_slider(position + step);
        }
        Action::ToggleControls => reader.on_tap(),
        Action::ToggleZoom => reader.on_double_tap(),
        Action::Quit => return false,
    }
    true
}

fn draw(
    term: &Term,
    reader: &PageReader<ProbeBackend>,
    chapters: Option<&ChapterIndex>,
) -> Result<()> {
    term.clear_screen().context("Failed to clear screen")?;
    for line in render(reader, chapters) {
        term.write_line(&line).context("Failed to write line")?;
    }
    Ok(())
}

/// Screen contents for the current reader state
pub(crate) fn render(
    reader: &PageReader<ProbeBackend>,
    chapters: Option<&ChapterIndex>,
) -> Vec<String> {
    let mut lines = Vec::new();
    let page = reader.page();
    let image = reader
        .page_image()
        .resolve(reader.session().backend().root());

    if reader.controls_visible() {
        let title = format!("Page {} / {}", page, PageNumber::LAST);
        let mut header = format!("  {}", style(title).bold().cyan());
        if let Some(index) = chapters {
            let names: Vec<&str> = index
                .chapters_on_page(page)
                .iter()
                .map(|c| c.transliteration.as_str())
                .collect();
            if !names.is_empty() {
                header.push_str(&format!("  {}", style(names.join(", ")).dim()));
            }
        }
        lines.push(String::new());
        lines.push(header);
    }

    lines.push(String::new());
    let zoom = reader.zoom();
    let mut image_line = format!("  Image: {}", image.display());
    if zoom.is_zoomed() {
        image_line.push_str(&format!(" ({:.1}x)", zoom.scale()));
    }
    if !image.exists() {
        image_line.push_str(&format!(" {}", style("missing").red()));
    }
    lines.push(image_line);

    if !reader.controls_visible() {
        return lines;
    }

    let controls = reader.controls();
    let state = reader.session().state();
    let status = match state {
        PlaybackState::Idle => style("Idle").dim(),
        PlaybackState::Loading => style("Loading").yellow(),
        PlaybackState::Ready { .. } => style("Paused").yellow(),
        PlaybackState::Playing { .. } => style("Playing").green(),
        PlaybackState::Error => style("No recitation").red(),
    };

    lines.push(String::new());
    lines.push(format!(
        "  {} / {}  {}",
        controls.position_label, controls.duration_label, status
    ));
    lines.push(format!("  {}", progress_bar(state.progress_percentage())));

    if let Some(error) = reader.session().last_error() {
        lines.push(format!("  {}", style(error.user_message()).red()));
    }

    lines.push(String::new());
    lines.push(format!(
        "  {}  {}  {}",
        button("← prev", controls.previous_enabled),
        button(
            if controls.is_playing { "pause" } else { "play" },
            controls.play_enabled
        ),
        button("next →", controls.next_enabled),
    ));
    lines.push(String::new());
    lines.push("  Controls:".to_string());
    lines.push("    ←/→ or p/n  - Previous/next page".to_string());
    lines.push("    Space       - Play/Pause".to_string());
    lines.push("    [/]         - Seek -10s/+10s".to_string());
    lines.push("    z           - Toggle zoom".to_string());
    lines.push("    c           - Hide controls".to_string());
    lines.push("    q/Esc       - Quit".to_string());

    lines
}

fn button(label: &str, enabled: bool) -> String {
    if enabled {
        format!("[{}]", style(label).bold())
    } else {
        format!("[{}]", style(label).dim())
    }
}

pub(crate) fn progress_bar(percentage: f32) -> String {
    let filled = ((percentage.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f32).round() as usize;
    format!(
        "[{}{}]",
        "=".repeat(filled),
        " ".repeat(BAR_WIDTH - filled)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use mushaf_core::AssetCatalog;
    use page_session::ReaderSettings;
    use tempfile::TempDir;

    fn reader_in(dir: &TempDir) -> PageReader<ProbeBackend> {
        PageReader::open(
            PageNumber::new(5).unwrap(),
            AssetCatalog::default(),
            ProbeBackend::new(dir.path()),
            ReaderSettings::default(),
        )
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(Action::from_key(&Key::ArrowRight), Some(Action::Next));
        assert_eq!(Action::from_key(&Key::Char('p')), Some(Action::Previous));
        assert_eq!(Action::from_key(&Key::Char(' ')), Some(Action::TogglePlayback));
        assert_eq!(Action::from_key(&Key::Escape), Some(Action::Quit));
        assert_eq!(Action::from_key(&Key::Char('x')), None);
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0.0), format!("[{}]", " ".repeat(BAR_WIDTH)));
        assert_eq!(progress_bar(100.0), format!("[{}]", "=".repeat(BAR_WIDTH)));
        assert_eq!(progress_bar(250.0), format!("[{}]", "=".repeat(BAR_WIDTH)));
    }

    #[test]
    fn test_missing_audio_still_navigates() {
        let dir = TempDir::new().unwrap();
        let mut reader = reader_in(&dir);
        pump(&mut reader);
        assert!(reader.session().state().is_error());

        assert!(apply(&mut reader, Action::Next));
        assert_eq!(reader.page().get(), 6);
        assert!(!apply(&mut reader, Action::Quit));
    }

    #[test]
    fn test_render_reports_missing_recitation() {
        let dir = TempDir::new().unwrap();
        let mut reader = reader_in(&dir);
        pump(&mut reader);

        let screen = console::strip_ansi_codes(&render(&reader, None).join("\n")).to_string();
        assert!(screen.contains("Page 5 / 604"));
        assert!(screen.contains("pages/005.webp"));
        assert!(screen.contains("Recitation is not available for this page."));
    }

    #[test]
    fn test_render_with_hidden_controls() {
        let dir = TempDir::new().unwrap();
        let mut reader = reader_in(&dir);
        apply(&mut reader, Action::ToggleControls);

        let screen = console::strip_ansi_codes(&render(&reader, None).join("\n")).to_string();
        assert!(!screen.contains("Page 5"));
        assert!(screen.contains("pages/005.webp"));
    }
}

//! Maps the loaded configuration onto the reader's runtime types

use mushaf_config::{Config, ConfigSection, GestureConfig, ReaderConfig, ValidationError};
use mushaf_core::{AssetCatalog, PageNumber};
use page_session::{ReaderSettings, SwipeThresholds, ZoomLimits};

/// Builds the reader settings, replacing invalid sections with defaults
pub fn reader_settings(config: &Config) -> ReaderSettings {
    let gestures = match config.gestures.validate() {
        Ok(()) => config.gestures.clone(),
        Err(errors) => {
            log_fallback(config.gestures.section_name(), &errors);
            GestureConfig::default()
        }
    };

    // start_page is handled by `start_page`, so only the zoom fields are checked here
    let zoom = ReaderConfig {
        start_page: ReaderConfig::default().start_page,
        ..config.reader.clone()
    };
    let zoom = match zoom.validate() {
        Ok(()) => zoom,
        Err(errors) => {
            log_fallback("reader zoom", &errors);
            ReaderConfig::default()
        }
    };

    ReaderSettings {
        swipe: SwipeThresholds {
            distance_px: gestures.swipe_distance_px,
            velocity_px_per_sec: gestures.swipe_velocity_px_per_sec,
        },
        zoom: ZoomLimits {
            min: zoom.min_zoom,
            max: zoom.max_zoom,
            double_tap: zoom.double_tap_zoom,
        },
        hide_controls: !config.reader.show_controls,
    }
}

fn log_fallback(section: &str, errors: &[ValidationError]) {
    for error in errors {
        log::warn!("{}", error);
    }
    log::warn!("Using default {} settings", section);
}

pub fn asset_catalog(config: &Config) -> AssetCatalog {
    AssetCatalog::new(
        config.assets.image_extension.as_str(),
        config.assets.audio_extension.as_str(),
    )
}

/// Configured start page, clamped into the Mushaf
pub fn start_page(config: &Config) -> PageNumber {
    let page = config.reader.start_page;
    PageNumber::new(i64::from(page)).unwrap_or_else(|e| {
        log::warn!("Ignoring reader.start_page: {}", e);
        if page == 0 {
            PageNumber::FIRST
        } else {
            PageNumber::LAST
        }
    })
}

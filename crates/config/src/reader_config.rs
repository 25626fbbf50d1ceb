//! Reader configuration section

use crate::validation::{ConfigSection, ValidationError, Validator};
use serde::{Deserialize, Serialize};

/// Highest page of the mushaf
const LAST_PAGE: u16 = 604;

/// Reader view preferences
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReaderConfig {
    /// Page opened when no page is given
    pub start_page: u16,

    /// Whether header and controls are visible when a page opens
    pub show_controls: bool,

    /// Smallest committed zoom scale
    pub min_zoom: f32,

    /// Largest committed zoom scale
    pub max_zoom: f32,

    /// Scale applied by a double tap on an unzoomed page
    pub double_tap_zoom: f32,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            start_page: 1,
            show_controls: true,
            min_zoom: 1.0,
            max_zoom: 3.0,
            double_tap_zoom: 2.0,
        }
    }
}

impl ConfigSection for ReaderConfig {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut results = vec![
            Validator::in_range(self.start_page, 1, LAST_PAGE, "reader.start_page"),
            Validator::in_range(self.min_zoom, 0.5, 2.0, "reader.min_zoom"),
            Validator::in_range(self.max_zoom, 1.0, 10.0, "reader.max_zoom"),
        ];

        if self.max_zoom < self.min_zoom {
            results.push(Err(ValidationError::with_value(
                "reader.max_zoom",
                "must not be below reader.min_zoom",
                self.max_zoom,
            )));
        }

        results.push(Validator::in_range(
            self.double_tap_zoom,
            self.min_zoom,
            self.max_zoom,
            "reader.double_tap_zoom",
        ));

        Validator::collect_errors(results)
    }

    fn merge(&mut self, other: Self) {
        self.start_page = other.start_page;
        self.show_controls = other.show_controls;
        self.min_zoom = other.min_zoom;
        self.max_zoom = other.max_zoom;
        self.double_tap_zoom = other.double_tap_zoom;
    }

    fn section_name(&self) -> &'static str {
        "reader"
    }
}

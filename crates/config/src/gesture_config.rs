//! Gesture configuration section

use crate::validation::{ConfigSection, ValidationError, Validator};
use serde::{Deserialize, Serialize};

/// Swipe thresholds for page turns
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GestureConfig {
    /// Horizontal travel a swipe must exceed, in logical pixels
    pub swipe_distance_px: f32,

    /// Horizontal speed a swipe must exceed, in logical pixels per second
    pub swipe_velocity_px_per_sec: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            swipe_distance_px: 100.0,
            swipe_velocity_px_per_sec: 500.0,
        }
    }
}

impl ConfigSection for GestureConfig {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        Validator::collect_errors(vec![
            Validator::in_range(
                self.swipe_distance_px,
                10.0,
                1000.0,
                "gestures.swipe_distance_px",
            ),
            Validator::in_range(
                self.swipe_velocity_px_per_sec,
                50.0,
                5000.0,
                "gestures.swipe_velocity_px_per_sec",
            ),
        ])
    }

    fn merge(&mut self, other: Self) {
        self.swipe_distance_px = other.swipe_distance_px;
        self.swipe_velocity_px_per_sec = other.swipe_velocity_px_per_sec;
    }

    fn section_name(&self) -> &'static str {
        "gestures"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(GestureConfig::default().validate().is_ok());
    }

    #[test]
    fn test_multiple_validation_errors() {
        let config = GestureConfig {
            swipe_distance_px: 0.0,
            swipe_velocity_px_per_sec: 10_000.0,
        };
        assert_eq!(config.validate().unwrap_err().len(), 2);
    }
}

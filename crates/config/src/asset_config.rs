//! Asset location configuration section

use crate::validation::{ConfigSection, ValidationError, Validator};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const IMAGE_EXTENSIONS: &[&str] = &["webp", "png", "jpg", "jpeg"];
const AUDIO_EXTENSIONS: &[&str] = &["ogg", "mp3", "m4a", "flac", "wav"];

/// Where page images, recitations and the chapter index live
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssetConfig {
    /// Asset root; `pages/` and `audio/` are resolved under it
    pub root: PathBuf,

    /// Extension of page images (without the dot)
    pub image_extension: String,

    /// Extension of page recitations (without the dot)
    pub audio_extension: String,

    /// Chapter index JSON (relative to `root` if not absolute)
    pub chapter_index: PathBuf,
}

impl AssetConfig {
    /// Resolved location of the chapter index
    pub fn chapter_index_path(&self) -> PathBuf {
        if self.chapter_index.is_absolute() {
            self.chapter_index.clone()
        } else {
            self.root.join(&self.chapter_index)
        }
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("assets"),
            image_extension: "webp".to_string(),
            audio_extension: "ogg".to_string(),
            chapter_index: PathBuf::from("surahs.json"),
        }
    }
}

impl ConfigSection for AssetConfig {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut results = Vec::new();

        if self.root.as_os_str().is_empty() {
            results.push(Err(ValidationError::new("assets.root", "must not be empty")));
        }
        if self.chapter_index.as_os_str().is_empty() {
            results.push(Err(ValidationError::new(
                "assets.chapter_index",
                "must not be empty",
            )));
        }

        let image = self.image_extension.to_ascii_lowercase();
        results.push(
            Validator::file_extension(&image, "assets.image_extension")
                .and_then(|_| Validator::one_of(&image.as_str(), IMAGE_EXTENSIONS, "assets.image_extension")),
        );

        let audio = self.audio_extension.to_ascii_lowercase();
        results.push(
            Validator::file_extension(&audio, "assets.audio_extension")
                .and_then(|_| Validator::one_of(&audio.as_str(), AUDIO_EXTENSIONS, "assets.audio_extension")),
        );

        Validator::collect_errors(results)
    }

    fn merge(&mut self, other: Self) {
        self.root = other.root;
        self.image_extension = other.image_extension;
        self.audio_extension = other.audio_extension;
        self.chapter_index = other.chapter_index;
    }

    fn section_name(&self) -> &'static str {
        "assets"
    }
}

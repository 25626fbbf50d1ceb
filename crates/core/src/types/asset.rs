//! Asset key derivation for page images and recitation tracks

use crate::types::PageNumber;
use std::fmt;
use std::path::{Path, PathBuf};

/// Kind of bundled asset addressed by page number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Image,
    Audio,
}

impl AssetKind {
    /// Directory the asset kind lives in, relative to the asset root
    pub fn directory(&self) -> &'static str {
        match self {
            Self::Image => "pages",
            Self::Audio => "audio",
        }
    }
}

/// Relative key of a bundled asset, e.g. `audio/007.ogg`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetKey {
    kind: AssetKind,
    key: String,
}

impl AssetKey {
    pub fn kind(&self) -> AssetKind {
        self.kind
    }

    pub fn as_str(&self) -> &str {
        &self.key
    }

    /// Resolves the key against an asset root directory
    pub fn resolve(&self, root: &Path) -> PathBuf {
        root.join(&self.key)
    }
}

impl fmt::Display for AssetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

/// Naming scheme of the bundled assets
///
/// Names must match the on-disk files exactly: a page number is always
/// padded to three digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetCatalog {
    image_extension: String,
    audio_extension: String,
}

impl AssetCatalog {
    pub fn new(image_extension: impl Into<String>, audio_extension: impl Into<String>) -> Self {
        Self {
            image_extension: normalize_extension(image_extension.into()),
            audio_extension: normalize_extension(audio_extension.into()),
        }
    }

    /// Key of the scripture image for `page`
    pub fn image_key(&self, page: PageNumber) -> AssetKey {
        self.key(AssetKind::Image, page)
    }

    /// Key of the recitation track for `page`
    pub fn audio_key(&self, page: PageNumber) -> AssetKey {
        self.key(AssetKind::Audio, page)
    }

    pub fn key(&self, kind: AssetKind, page: PageNumber) -> AssetKey {
        let extension = match kind {
            AssetKind::Image => &self.image_extension,
            AssetKind::Audio => &self.audio_extension,
        };
        AssetKey {
            kind,
            key: format!("{}/{}.{}", kind.directory(), page.padded(), extension),
        }
    }
}

impl Default for AssetCatalog {
    fn default() -> Self {
        Self::new("webp", "ogg")
    }
}

fn normalize_extension(ext: String) -> String {
    ext.trim_start_matches('.').to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(n: i64) -> PageNumber {
        PageNumber::new(n).unwrap()
    }

    #[test]
    fn test_default_keys_are_zero_padded() {
        let catalog = AssetCatalog::default();
        assert_eq!(catalog.image_key(page(7)).as_str(), "pages/007.webp");
        assert_eq!(catalog.audio_key(page(7)).as_str(), "audio/007.ogg");
        assert_eq!(catalog.audio_key(page(604)).as_str(), "audio/604.ogg");
    }

    #[test]
    fn test_custom_extensions_are_normalized() {
        let catalog = AssetCatalog::new(".PNG", "mp3");
        assert_eq!(catalog.image_key(page(12)).as_str(), "pages/012.png");
        assert_eq!(catalog.audio_key(page(12)).as_str(), "audio/012.mp3");
    }

    #[test]
    fn test_resolve_against_root() {
        let catalog = AssetCatalog::default();
        let path = catalog.audio_key(page(1)).resolve(Path::new("/opt/mushaf"));
        assert_eq!(path, PathBuf::from("/opt/mushaf/audio/001.ogg"));
    }

    #[test]
    fn test_key_kind() {
        let catalog = AssetCatalog::default();
        assert_eq!(catalog.image_key(page(3)).kind(), AssetKind::Image);
        assert_eq!(catalog.audio_key(page(3)).kind(), AssetKind::Audio);
    }
}

//! Chapter (surah) index used by the list and search views

use crate::error::{AppError, Result};
use crate::types::{PageNumber, Validator};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Chapters featured on the home screen
const POPULAR_CHAPTERS: [u16; 5] = [1, 2, 18, 36, 55];

/// One chapter of the Quran as listed in the bundled index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub number: u16,
    pub name: String,
    pub transliteration: String,
    pub start_page: PageNumber,
    pub end_page: PageNumber,
    pub verses: u16,
}

impl Chapter {
    /// Returns true if any part of the chapter is printed on `page`
    pub fn contains_page(&self, page: PageNumber) -> bool {
        page >= self.start_page && page <= self.end_page
    }

    /// Number of pages the chapter spans
    pub fn page_count(&self) -> u16 {
        self.end_page.get() - self.start_page.get() + 1
    }

    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.transliteration.to_lowercase().contains(needle)
            || self.number.to_string().contains(needle)
    }
}

impl Validator for Chapter {
    fn validate(&self) -> std::result::Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.number == 0 {
            errors.push("Chapter number must start at 1".to_string());
        }

        if self.start_page > self.end_page {
            errors.push(format!(
                "Start page {} is after end page {}",
                self.start_page, self.end_page
            ));
        }

        if self.verses == 0 {
            errors.push("Chapter must have at least one verse".to_string());
        }

        if self.name.trim().is_empty() {
            errors.push("Chapter name must not be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Ordered, read-only list of chapters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChapterIndex {
    chapters: Vec<Chapter>,
}

impl ChapterIndex {
    /// Builds an index, checking every entry and the numbering order
    pub fn new(chapters: Vec<Chapter>) -> Result<Self> {
        let mut expected = 1u16;
        for chapter in &chapters {
            if let Err(errors) = chapter.validate() {
                return Err(AppError::InvalidChapterIndex {
                    chapter: chapter.number,
                    reason: errors.join("; "),
                });
            }
            if chapter.number != expected {
                return Err(AppError::InvalidChapterIndex {
                    chapter: chapter.number,
                    reason: format!("expected chapter {}", expected),
                });
            }
            expected += 1;
        }
        Ok(Self { chapters })
    }

    /// Parses the bundled JSON index
    pub fn from_json_str(json: &str) -> Result<Self> {
        let chapters: Vec<Chapter> = serde_json::from_str(json)
            .map_err(|e| AppError::chapter_index(e.to_string(), e))?;
        Self::new(chapters)
    }

    /// Reads and parses the index from a file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => AppError::AssetNotFound {
                path: path.to_path_buf(),
            },
            _ => AppError::from(e),
        })?;
        let index = Self::from_json_str(&contents)?;
        log::debug!("Loaded {} chapters from {}", index.len(), path.display());
        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Chapter> {
        self.chapters.iter()
    }

    /// Looks up a chapter by its number
    pub fn get(&self, number: u16) -> Option<&Chapter> {
        let idx = usize::from(number).checked_sub(1)?;
        self.chapters.get(idx)
    }

    /// Filters chapters by name, transliteration or number
    ///
    /// Matching is case-insensitive; an empty query returns every chapter.
    pub fn search(&self, query: &str) -> Vec<&Chapter> {
        let needle = query.trim().to_lowercase();
        self.chapters
            .iter()
            .filter(|c| needle.is_empty() || c.matches(&needle))
            .collect()
    }

    /// Chapters featured on the home screen, in display order
    pub fn popular(&self) -> Vec<&Chapter> {
        POPULAR_CHAPTERS
            .iter()
            .filter_map(|&n| self.get(n))
            .collect()
    }

    /// Chapters printed (fully or partially) on `page`
    pub fn chapters_on_page(&self, page: PageNumber) -> Vec<&Chapter> {
        self.chapters
            .iter()
            .filter(|c| c.contains_page(page))
            .collect()
    }
}

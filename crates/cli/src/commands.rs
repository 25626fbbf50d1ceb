// FILE: crates/cli/src/commands.rs

use crate::settings;
use anyhow::{anyhow, Context, Result};
use clap::ArgMatches;
use console::style;
use mushaf_config::{Config, ConfigManager};
use mushaf_core::{Chapter, ChapterIndex, Duration, PageNumber};
use page_session::backend::probe_duration_ms;
use std::path::Path;

/// Show the assets and chapters of one page
pub fn show_page(config: &Config, matches: &ArgMatches) -> Result<()> {
    let raw = matches
        .get_one::<String>("page")
        .ok_or_else(|| anyhow!("Page number is required"))?;
    let page = parse_page(raw)?;

    let catalog = settings::asset_catalog(config);
    let root = &config.assets.root;
    let image = catalog.image_key(page).resolve(root);
    let audio = catalog.audio_key(page).resolve(root);

    println!("\n{}", style(format!("Page {}", page)).bold().cyan());
    println!("{}", "=".repeat(60));
    println!("Image: {} {}", image.display(), presence(&image));
    print!("Audio: {} {}", audio.display(), presence(&audio));
    if audio.exists() {
        match probe_duration_ms(&audio) {
            Ok(ms) => print!(" ({})", Duration::from_millis(ms).as_clock()),
            Err(e) => log::warn!("Could not probe {}: {}", audio.display(), e),
        }
    }
    println!();

    if let Some(index) = optional_chapter_index(config) {
        let chapters = index.chapters_on_page(page);
        if !chapters.is_empty() {
            println!("\n{}", style("Chapters on this page").bold());
            for chapter in chapters {
                print_chapter_summary(chapter);
            }
        }
    }

    Ok(())
}

/// List chapters, optionally filtered
pub fn list_chapters(config: &Config, matches: &ArgMatches) -> Result<()> {
    let index = load_chapter_index(config)?;

    let chapters = if matches.get_flag("popular") {
        index.popular()
    } else {
        let query = matches
            .get_one::<String>("search")
            .map(|s| s.as_str())
            .unwrap_or("");
        index.search(query)
    };

    if chapters.is_empty() {
        println!("No chapters found.");
        return Ok(());
    }

    println!("\n{} Chapters", style(chapters.len()).bold().cyan());
    println!("{}", "=".repeat(60));
    for chapter in chapters {
        print_chapter_summary(chapter);
    }

    Ok(())
}

/// Write a default config file if none exists
pub fn config_init(manager: &ConfigManager) -> Result<()> {
    let created = manager
        .initialize()
        .context("Failed to write default config")?;

    if created {
        println!(
            "{} Created {}",
            style("✓").green().bold(),
            manager.config_path().display()
        );
    } else {
        println!("Config already exists at {}", manager.config_path().display());
    }
    Ok(())
}

/// Print the effective configuration
pub fn config_show(config: &Config) -> Result<()> {
    let rendered = config
        .to_toml_string()
        .context("Failed to render config")?;
    print!("{}", rendered);

    if let Err(errors) = config.validate() {
        eprintln!();
        for error in errors {
            eprintln!("{} {}", style("warning:").yellow().bold(), error);
        }
    }
    Ok(())
}

pub fn config_path(manager: &ConfigManager) -> Result<()> {
    println!("{}", manager.config_path().display());
    Ok(())
}

/// Parses a page argument strictly; out-of-range pages are an error here
pub(crate) fn parse_page(raw: &str) -> Result<PageNumber> {
    let n: i64 = raw
        .trim()
        .parse()
        .with_context(|| format!("'{}' is not a page number", raw))?;
    PageNumber::new(n).map_err(|e| anyhow!(e.user_message()))
}

pub(crate) fn load_chapter_index(config: &Config) -> Result<ChapterIndex> {
    let path = config.assets.chapter_index_path();
    ChapterIndex::load(&path)
        .with_context(|| format!("Failed to load chapter index from {}", path.display()))
}

/// The chapter index, or `None` with a warning when it can't be read
pub(crate) fn optional_chapter_index(config: &Config) -> Option<ChapterIndex> {
    match load_chapter_index(config) {
        Ok(index) => Some(index),
        Err(e) => {
            log::warn!("{:#}", e);
            None
        }
    }
}

fn print_chapter_summary(chapter: &Chapter) {
    println!(
        "  {:>3}. {} {}",
        chapter.number,
        style(&chapter.transliteration).bold(),
        style(&chapter.name).dim()
    );
    println!(
        "       {} verses | {}",
        chapter.verses,
        format_page_range(chapter)
    );
}

pub(crate) fn format_page_range(chapter: &Chapter) -> String {
    if chapter.start_page == chapter.end_page {
        format!("page {}", chapter.start_page)
    } else {
        format!("pages {}-{}", chapter.start_page, chapter.end_page)
    }
}

fn presence(path: &Path) -> console::StyledObject<&'static str> {
    if path.exists() {
        style("✓").green()
    } else {
        style("missing").red()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const INDEX: &str = r#"[
        {"number": 1, "name": "الفاتحة", "transliteration": "Al-Fatihah", "startPage": 1, "endPage": 1, "verses": 7},
        {"number": 2, "name": "البقرة", "transliteration": "Al-Baqarah", "startPage": 2, "endPage": 49, "verses": 286}
    ]"#;

    fn config_with_assets(root: &Path) -> Config {
        let mut config = Config::default();
        config.assets.root = root.to_path_buf();
        config
    }

    #[test]
    fn test_parse_page() {
        assert_eq!(parse_page("12").unwrap().get(), 12);
        assert_eq!(parse_page(" 604 ").unwrap(), PageNumber::LAST);
    }

    #[test]
    fn test_parse_page_rejects_out_of_range() {
        let err = parse_page("605").unwrap_err();
        assert_eq!(err.to_string(), "Pages run from 1 to 604.");
        assert!(parse_page("zero").is_err());
    }

    #[test]
    fn test_format_page_range() {
        let index = ChapterIndex::from_json_str(INDEX).unwrap();
        assert_eq!(format_page_range(index.get(1).unwrap()), "page 1");
        assert_eq!(format_page_range(index.get(2).unwrap()), "pages 2-49");
    }

    #[test]
    fn test_load_chapter_index_from_asset_root() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("surahs.json"), INDEX).unwrap();

        let index = load_chapter_index(&config_with_assets(dir.path())).unwrap();
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_missing_chapter_index_is_optional() {
        let config = config_with_assets(&PathBuf::from("/nonexistent/mushaf"));
        assert!(load_chapter_index(&config).is_err());
        assert!(optional_chapter_index(&config).is_none());
    }

    #[test]
    fn test_show_page_without_assets() {
        let dir = TempDir::new().unwrap();
        let matches = crate::build_cli()
            .try_get_matches_from(["mushaf", "page", "3"])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        assert!(show_page(&config_with_assets(dir.path()), sub).is_ok());
    }

    #[test]
    fn test_list_chapters_requires_index() {
        let dir = TempDir::new().unwrap();
        let matches = crate::build_cli()
            .try_get_matches_from(["mushaf", "chapters", "--popular"])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        assert!(list_chapters(&config_with_assets(dir.path()), sub).is_err());

        std::fs::write(dir.path().join("surahs.json"), INDEX).unwrap();
        assert!(list_chapters(&config_with_assets(dir.path()), sub).is_ok());
    }

    #[test]
    fn test_config_init_then_path() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_directory(dir.path().to_path_buf()).unwrap();
        config_init(&manager).unwrap();
        assert!(manager.config_path().exists());
        config_init(&manager).unwrap();
        config_path(&manager).unwrap();
    }
}

// FILE: crates/cli/src/main.rs

use anyhow::{bail, Context, Result};
use clap::{Arg, ArgMatches, Command};
use mushaf_config::{Config, ConfigManager};
use mushaf_core::PageNumber;
use std::path::PathBuf;

mod commands;
mod reader;
mod settings;

fn build_cli() -> Command {
    Command::new("mushaf")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Mushaf page reader with per-page recitation")
        .arg(
            Arg::new("config-dir")
                .long("config-dir")
                .value_name("DIR")
                .help("Directory holding config.toml")
                .value_parser(clap::value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("assets")
                .short('a')
                .long("assets")
                .value_name("DIR")
                .help("Asset root containing pages/ and audio/")
                .value_parser(clap::value_parser!(PathBuf))
                .global(true),
        )
        .subcommand(
            Command::new("page")
                .about("Show the image, recitation and chapters of a page")
                .arg(Arg::new("page").required(true).value_name("N").help("Page number (1-604)")),
        )
        .subcommand(
            Command::new("chapters")
                .about("List chapters")
                .arg(Arg::new("search").short('s').long("search").value_name("QUERY").help("Filter by name, transliteration or number"))
                .arg(
                    Arg::new("popular")
                        .short('p')
                        .long("popular")
                        .help("Show only the featured chapters")
                        .action(clap::ArgAction::SetTrue)
                        .conflicts_with("search"),
                ),
        )
        .subcommand(
            Command::new("read")
                .about("Open the interactive reader")
                .arg(Arg::new("page").value_name("N").help("Page to open (defaults to reader.start_page)")),
        )
        .subcommand(
            Command::new("config")
                .about("Manage the configuration file")
                .subcommand_required(true)
                .subcommand(Command::new("init").about("Write a default config file"))
                .subcommand(Command::new("show").about("Print the effective configuration"))
                .subcommand(Command::new("path").about("Print the config file location")),
        )
}

fn config_manager(matches: &ArgMatches) -> Result<ConfigManager> {
    match matches.get_one::<PathBuf>("config-dir") {
        Some(dir) => ConfigManager::with_directory(dir.clone()),
        None => ConfigManager::new(),
    }
    .context("Failed to locate config directory")
}

/// File values, then `MUSHAF_*` variables, then command-line flags
fn effective_config(manager: &ConfigManager, matches: &ArgMatches) -> Config {
    let mut config = manager.load_with_env_overrides().unwrap_or_else(|e| {
        eprintln!("Config error: {}, using defaults", e);
        Config::default()
    });
    if let Some(root) = matches.get_one::<PathBuf>("assets") {
        config.assets.root = root.clone();
    }
    config
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = build_cli().get_matches();
    let manager = config_manager(&matches)?;
    let config = effective_config(&manager, &matches);

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.app.log_level.as_filter()),
    )
    .init();

    // loading ran before the logger existed, so report problems again
    if let Err(errors) = config.validate() {
        for error in &errors {
            log::warn!("Config: {}", error);
        }
    }

    match matches.subcommand() {
        Some(("page", sub_matches)) => commands::show_page(&config, sub_matches),
        Some(("chapters", sub_matches)) => commands::list_chapters(&config, sub_matches),
        Some(("read", sub_matches)) => {
            // the reader is lenient like a deep link
            let page = sub_matches
                .get_one::<String>("page")
                .map(|raw| PageNumber::from_route_param(raw))
                .unwrap_or_else(|| settings::start_page(&config));
            reader::run(&config, page).await
        }
        Some(("config", sub_matches)) => match sub_matches.subcommand() {
            Some(("init", _)) => commands::config_init(&manager),
            Some(("show", _)) => commands::config_show(&config),
            Some(("path", _)) => commands::config_path(&manager),
            _ => bail!("Unknown config command"),
        },
        _ => {
            build_cli().print_help()?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_cli_definition_is_valid() {
        build_cli().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let matches = build_cli()
            .try_get_matches_from(["mushaf", "read", "12", "--assets", "/srv/mushaf"])
            .unwrap();
        assert_eq!(
            matches.get_one::<PathBuf>("assets"),
            Some(&PathBuf::from("/srv/mushaf"))
        );
    }

    #[test]
    fn test_popular_conflicts_with_search() {
        let result =
            build_cli().try_get_matches_from(["mushaf", "chapters", "--popular", "--search", "ya"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_assets_flag_overrides_config_file() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_directory(dir.path().to_path_buf()).unwrap();
        manager
            .update(|config| config.assets.root = PathBuf::from("/from/file"))
            .unwrap();

        let matches = build_cli()
            .try_get_matches_from(["mushaf", "page", "1", "--assets", "/from/flag"])
            .unwrap();
        let config = effective_config(&manager, &matches);
        assert_eq!(config.assets.root, PathBuf::from("/from/flag"));
    }
}

// Copyright 2023 Remi Bernotavicius

use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;
use std::process::ExitCode;

mod cli;
mod database;
mod error;
mod repository;

pub use error::{Error, Result};

/// A personal catalog of recipes, their ingredients and categories.
#[derive(Parser, Debug)]
#[command(name = "culinary-compass", version)]
struct Args {
    /// Catalog file to use instead of the one in the user data directory
    #[arg(long, env = "CULINARY_COMPASS_DB", global = true)]
    database: Option<PathBuf>,

    /// Log more; repeat for even more detail
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Without a command the interactive menu is shown
    #[command(subcommand)]
    command: Option<cli::Command>,
}

/// This is where the catalog lives on-disk by default. On Linux it should be like:
/// `~/.local/share/culinary_compass/culinary_compass.db`
fn data_path() -> Result<PathBuf> {
    let dirs = directories::BaseDirs::new().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "failed to get user home directory",
        )
    })?;
    Ok(dirs
        .data_dir()
        .join("culinary_compass")
        .join("culinary_compass.db"))
}

fn init_logging(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    simple_logger::SimpleLogger::new()
        .with_level(level)
        .env()
        .init()?;
    Ok(())
}

fn try_main(args: Args) -> Result<()> {
    let path = match args.database {
        Some(path) => path,
        None => data_path()?,
    };
    let store = database::Store::open(path)?;
    log::debug!("using catalog {}", store.path().display());

    let command = args.command.unwrap_or(cli::Command::Menu);
    cli::run(&store, command, &mut cli::Terminal)
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(err) = init_logging(args.verbose) {
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }

    match try_main(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::debug!("action failed: {err:?}");
            cli::report(&err);
            if err.is_user_error() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

#[test]
fn parses_commands() {
    use clap::CommandFactory as _;

    Args::command().debug_assert();

    let args = Args::try_parse_from([
        "culinary-compass",
        "--database",
        "/tmp/catalog.db",
        "-vv",
        "recipe",
        "update",
        "3",
        "--servings",
        "6",
        "--no-category",
    ])
    .unwrap();
    assert_eq!(args.verbose, 2);
    assert_eq!(args.database, Some(PathBuf::from("/tmp/catalog.db")));
    assert!(matches!(
        args.command,
        Some(cli::Command::Recipe(cli::RecipeCommand::Update {
            no_category: true,
            ..
        }))
    ));

    assert!(Args::try_parse_from([
        "culinary-compass",
        "recipe",
        "update",
        "3",
        "--category",
        "Lunch",
        "--no-category",
    ])
    .is_err());

    let args = Args::try_parse_from(["culinary-compass"]).unwrap();
    assert!(args.command.is_none());
}

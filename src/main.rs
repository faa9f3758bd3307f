//! geoalert - location-filtered emergency dispatch alerts
//!
//! A command-line tool that watches an alert feed and announces the alerts
//! near a chosen postcode.

use clap::Parser;
use geoalert::cli::args::{generate_completions, Cli, Commands};
use geoalert::commands::{log_level, run_geocode, run_recent, run_watch, GlobalOptions};
use geoalert::error::{AppError, ConfigError, GeocodeError, StoreError};

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging; without RUST_LOG the level follows --verbose and
    // the config file's `general.verbose`
    let from_env = std::env::var_os("RUST_LOG").is_some();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn,geoalert=debug"))
        .format_timestamp(None)
        .init();

    if !from_env {
        log::set_max_level(log_level(cli.verbose));
    }

    // Run the appropriate command
    let result = run(&cli);

    if let Err(e) = result {
        log::error!("{}", e);
        print_error(&e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), AppError> {
    let global = GlobalOptions {
        config: cli.config.clone(),
        db: cli.db.clone(),
        verbose: cli.verbose,
    };

    match &cli.command {
        Commands::Watch(args) => run_watch(args, cli.format, &global),

        Commands::Recent(args) => run_recent(args, cli.format, &global),

        Commands::Geocode(args) => run_geocode(args, cli.format, &global),

        Commands::Completions { shell } => {
            generate_completions(*shell);
            Ok(())
        }
    }
}

fn print_error(err: &AppError) {
    eprintln!("Error: {}", err);

    // Print helpful hints for common errors
    match err {
        AppError::Config(ConfigError::FileNotFound(_)) => {
            eprintln!();
            eprintln!("Hint: Check the --config path or unset GEOALERT_CONFIG.");
        }
        AppError::Config(ConfigError::MissingField(field)) if field == "source.feed_url" => {
            eprintln!();
            eprintln!("Hint: Pass --feed-url or set feed_url in the [source] section.");
        }
        AppError::Store(StoreError::Sqlite(_)) | AppError::Store(StoreError::Io(_)) => {
            eprintln!();
            eprintln!("Hint: Check that the database directory is writable,");
            eprintln!("      or choose another location with --db.");
        }
        AppError::Geocode(GeocodeError::EmptyResult(_)) => {
            eprintln!();
            eprintln!("Hint: Check the postcode; lookups are limited to the configured country.");
        }
        AppError::Geocode(GeocodeError::Http(_)) => {
            eprintln!();
            eprintln!("Hint: The geocoding service could not be reached.");
            eprintln!("      Use --lat/--lon to set the filter origin directly.");
        }
        _ => {}
    }
}

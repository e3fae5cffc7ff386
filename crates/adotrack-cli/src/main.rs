mod cli;
mod commands;
mod output;
mod settings;

use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::settings::Settings;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so status output can be piped
    let directive = if cli.verbose > 0 {
        "adotrack=debug"
    } else {
        "adotrack=info"
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .init();

    let settings = Settings::load(cli.config.as_deref())?;
    debug!("Settings: {:?}", settings);

    match cli.command {
        Command::Status {
            states,
            search,
            sort,
            format,
        } => commands::status::run(
            settings.runtime_config(&cli.paths)?,
            &settings.catalog_file(&cli.paths),
            states,
            search,
            sort,
            format,
        ),
        Command::Rating { top } => commands::rating::run(
            settings.runtime_config(&cli.paths)?,
            &settings.catalog_file(&cli.paths),
            top,
        ),
        Command::Fingerprint {
            external_id: Some(external_id),
            ..
        } => commands::fingerprint::run_for_level(
            &settings.runtime_config(&cli.paths)?,
            &external_id,
        ),
        Command::Fingerprint {
            external_id: None,
            author,
            artist,
            song,
        } => commands::fingerprint::run_for_fields(
            author,
            artist,
            song,
            !cli.paths.no_strip_markup && settings.strip_markup.unwrap_or(true),
        ),
        Command::Cache { action } => {
            commands::cache::run(&settings.cache_file(&cli.paths), action)
        }
    }
}

//! H5P package installer CLI
//!
//! Installs content packages into a local store and prints what a host page
//! needs to render them.

mod cli;
mod commands;
mod error;

use std::path::Path;

use clap::Parser;
use colored::Colorize;
use h5p_core::{ContentService, InstallerConfig};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(e.exit_code());
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing if verbose; stdout is reserved for command output
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .map_err(|e| CliError::user(format!("Failed to set tracing subscriber: {e}")))?;
        tracing::debug!("Verbose mode enabled");
    }

    let Some(command) = cli.command else {
        println!("{} H5P package installer", "h5p".green().bold());
        println!();
        println!("Run {} for available commands.", "h5p --help".cyan());
        return Ok(());
    };

    let config = load_config(cli.config.as_deref(), cli.root.as_deref())?;
    execute_command(&ContentService::new(config), command)
}

fn load_config(path: Option<&Path>, root: Option<&Path>) -> Result<InstallerConfig> {
    let mut config = match path {
        Some(path) => InstallerConfig::load(path)?,
        None => InstallerConfig::load_or_default(Path::new(InstallerConfig::DEFAULT_FILENAME))?,
    };
    if let Some(root) = root {
        config = config.with_store_root(root);
    }
    tracing::debug!(root = %config.store.root.display(), "Using installation store");
    Ok(config)
}

fn execute_command(service: &ContentService, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Install { package, json } => commands::run_install(service, &package, json),
        Commands::List { json } => commands::run_list(service, json),
        Commands::Show { id, json } => commands::run_show(service, &id, json),
        Commands::Integration { id, settings } => {
            commands::run_integration(service, &id, settings)
        }
        Commands::Clean => commands::run_clean(service),
    }
}

//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// H5P package installer - install content packages and render their settings
#[derive(Parser, Debug)]
#[command(name = "h5p")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (defaults to ./h5p.toml when present)
    #[arg(short, long, global = true, env = "H5P_CONFIG")]
    pub config: Option<PathBuf>,

    /// Installation store root, overriding the configuration file
    #[arg(short, long, global = true, env = "H5P_STORE_ROOT")]
    pub root: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Install a content package
    ///
    /// Accepts an `.h5p` archive or an already unpacked package directory.
    ///
    /// Examples:
    ///   h5p install quiz.h5p
    ///   h5p install ./unpacked-quiz --json
    Install {
        /// Archive file or unpacked package directory
        package: PathBuf,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// List installed content
    List {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Show one installed content unit
    Show {
        /// Content id printed by `h5p install`
        id: String,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Print the integration descriptor of installed content as JSON
    Integration {
        /// Content id printed by `h5p install`
        id: String,

        /// Print the player settings object a host page embeds instead
        #[arg(long)]
        settings: bool,
    },

    /// Remove leftovers of interrupted installs
    ///
    /// Only run this while no install is in progress.
    Clean,
}

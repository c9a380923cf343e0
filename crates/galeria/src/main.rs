//! Galeria CLI - frontend server for the Web umenia artwork collection.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "galeria")]
#[command(about = "Frontend server for the Web umenia artwork collection")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to galeria.toml config file
    #[arg(short, long, default_value = "galeria.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default galeria.toml in the current directory
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },

    /// Start the site server
    Serve {
        /// Port to listen on (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,

        /// Do not open a browser
        #[arg(long)]
        no_open: bool,
    },

    /// Probe the collection API and print one mapped record
    Check {
        /// Artwork id to fetch
        #[arg(short, long, default_value = "SVK:SNG.O_184")]
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    // Execute command
    match cli.command {
        Commands::Init { force } => {
            commands::init::run(force).await?;
        }
        Commands::Serve { port, no_open } => {
            commands::serve::run(&cli.config, port, no_open).await?;
        }
        Commands::Check { id } => {
            commands::check::run(&cli.config, &id).await?;
        }
    }

    Ok(())
}

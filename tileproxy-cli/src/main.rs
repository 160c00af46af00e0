//! TileProxy CLI - Command-line interface
//!
//! This binary exercises the TileProxy library against real upstreams:
//! validate source definitions, inspect URL resolution and fetch tiles.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::common::TileArgs;
use runner::CliRunner;

#[derive(Parser)]
#[command(name = "tileproxy")]
#[command(version)]
#[command(about = "Resolve and fetch tiles from configured upstream tile services", long_about = None)]
struct Cli {
    /// Settings file (defaults to ~/.tileproxy/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a source definition and list what it serves
    Check {
        /// Source definition file (defaults to `sources` in the settings file)
        definition: Option<PathBuf>,
    },

    /// Print the upstream URLs a tile resolves to, in fetch order
    Urls {
        #[command(flatten)]
        tile: TileArgs,
    },

    /// Fetch a tile through the configured upstream chain
    Fetch {
        #[command(flatten)]
        tile: TileArgs,

        /// Output file for the tile bytes
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = CliRunner::new(cli.config.as_deref()).and_then(|runner| match cli.command {
        Commands::Check { definition } => commands::check::run(&runner, definition),
        Commands::Urls { tile } => commands::urls::run(&runner, tile),
        Commands::Fetch { tile, output } => commands::fetch::run(&runner, tile, output),
    });

    if let Err(e) = result {
        e.exit();
    }
}

//! nether-node - glTF node inspection tool
//!
//! Reports node references and transforms, validates node arrays and
//! rewrites them in canonical form.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use nether_node_cli::{canonicalize, check, inspect, load_config};

#[derive(Parser)]
#[command(name = "nether-node")]
#[command(about = "glTF node inspection tool")]
#[command(version)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to nether-node.toml (defaults to ./nether-node.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every node's references and local transform
    Inspect {
        /// Input glTF file (.gltf or .glb)
        input: PathBuf,
    },

    /// Rewrite the node array in canonical form
    Canonicalize {
        /// Input .gltf file
        input: PathBuf,

        /// Output file (defaults to rewriting the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate nodes without writing anything
    Check {
        /// Input glTF file (.gltf or .glb)
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Inspect { input } => {
            inspect(&input, &config)?;
        }
        Commands::Canonicalize { input, output } => {
            canonicalize(&input, output.as_deref(), &config)?;
        }
        Commands::Check { input } => {
            check(&input)?;
        }
    }

    Ok(())
}

//! layerforge CLI - turn a height field request into an STL file
//!
//! Subcommands:
//! - `mesh`: generate an STL from a JSON [`MeshRequest`]
//! - `defaults`: print the default mesh configuration as JSON

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use layerforge::{MeshConfig, MeshRequest, StlMode, export_mesh};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "layerforge")]
#[command(about = "Convert height fields into printable STL solids", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate an STL mesh from a JSON request
    Mesh(MeshArgs),
    /// Print the default mesh configuration
    Defaults,
}

#[derive(Parser, Debug)]
struct MeshArgs {
    /// Request file: `{ heightmap_base64, width, height, config }`
    #[arg(short, long)]
    input: PathBuf,

    /// Output STL file path
    #[arg(short, long)]
    output: PathBuf,

    /// Write ASCII STL instead of binary
    #[arg(long)]
    ascii: bool,

    /// Add a border frame regardless of the request's configuration
    #[arg(long)]
    border: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Mesh(args) => run_mesh(args),
        Commands::Defaults => {
            println!("{}", serde_json::to_string_pretty(&MeshConfig::default())?);
            Ok(())
        },
    }
}

fn run_mesh(args: MeshArgs) -> Result<()> {
    let text = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read request {}", args.input.display()))?;
    let mut request = MeshRequest::from_json(&text)
        .with_context(|| format!("Failed to parse request {}", args.input.display()))?;
    if args.border {
        request.config.has_border = true;
    }

    let mode = if args.ascii { StlMode::Ascii } else { StlMode::Binary };
    let stats = export_mesh(&request, &args.output, mode)
        .with_context(|| format!("Failed to generate {}", args.output.display()))?;

    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

//! Build a multi-resolution Windows `.ico` from a PNG.

use anyhow::{Context, Result};
use clap::Parser;
use pdf2pptx::icon::make_icon;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Generate a multi-size .ico (16–256 px) from a single image.
#[derive(Parser, Debug)]
#[command(name = "make-icon", version)]
struct Cli {
    /// Source image, ideally a square PNG with transparency.
    input: PathBuf,

    /// Where to write the icon. Default: INPUT with an `.ico` extension.
    output: Option<PathBuf>,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(if cli.verbose { "debug" } else { "warn" })
        }))
        .with_writer(io::stderr)
        .init();

    let report = make_icon(&cli.input, cli.output.as_deref())
        .with_context(|| format!("Failed to build icon from {}", cli.input.display()))?;

    let sizes: Vec<String> = report.sizes.iter().map(|s| format!("{s}x{s}")).collect();
    println!("Icon written: {} ({})", report.output.display(), sizes.join(", "));
    Ok(())
}

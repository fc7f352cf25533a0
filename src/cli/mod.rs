//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to
//! command-specific modules.

mod check;
mod extract;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::load_settings;

#[derive(Parser)]
#[command(name = "rollscan")]
#[command(about = "Voter roll OCR extraction tool")]
#[command(version)]
pub struct Cli {
    /// Config file path (defaults to ./rollscan.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Extract voter records from every PDF in a directory
    Extract {
        /// Directory of source PDFs (overrides config)
        pdf_dir: Option<PathBuf>,
        /// Output JSON file (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Tesseract language code (overrides config)
        #[arg(long)]
        lang: Option<String>,
        /// Number of document workers (overrides config)
        #[arg(short, long)]
        workers: Option<usize>,
        /// Always OCR, even when the PDF carries a text layer
        #[arg(long)]
        force_ocr: bool,
    },

    /// Extract a single document and print its records to stdout
    Preview {
        /// PDF file to process
        file: PathBuf,
        /// Tesseract language code (overrides config)
        #[arg(long)]
        lang: Option<String>,
        /// Always OCR, even when the PDF carries a text layer
        #[arg(long)]
        force_ocr: bool,
    },

    /// Check that the external extraction tools are installed
    Check,
}

/// Parse arguments and dispatch to the requested command.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_deref())?;

    match cli.command {
        Commands::Extract {
            pdf_dir,
            output,
            lang,
            workers,
            force_ocr,
        } => extract::cmd_extract(&settings, pdf_dir, output, lang, workers, force_ocr).await,
        Commands::Preview {
            file,
            lang,
            force_ocr,
        } => extract::cmd_preview(&settings, file, lang, force_ocr).await,
        Commands::Check => check::cmd_check(),
    }
}

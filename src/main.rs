//! rollscan - voter roll OCR extraction tool.
//!
//! Walks a directory of scanned electoral roll PDFs, acquires their
//! text with poppler and Tesseract, and segments the text into
//! structured voter records written as a single JSON file.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rollscan::cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (before anything else)
    let _ = dotenvy::dotenv();

    // Initialize logging based on verbosity
    let default_filter = if cli::is_verbose() {
        "rollscan=info"
    } else {
        "rollscan=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    cli::run().await
}

//! Configuration management for rollscan.
//!
//! Settings come from an optional `rollscan.toml` in the working
//! directory (or an explicit `--config` path); CLI flags override
//! individual values. A missing file means defaults, a malformed file
//! is a hard error.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Config file looked up in the working directory when no explicit
/// path is given.
pub const DEFAULT_CONFIG_FILE: &str = "rollscan.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory scanned for `*.pdf` source documents.
    pub pdf_dir: PathBuf,
    /// Output path for the extracted records.
    pub output: PathBuf,
    /// Tesseract language code.
    pub language: String,
    /// Raster resolution for OCR.
    pub dpi: u32,
    /// Parallel document workers.
    pub workers: usize,
    /// Minimum non-whitespace characters per page for a PDF text layer
    /// to be trusted over OCR.
    pub min_chars_per_page: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pdf_dir: PathBuf::from("pdfs"),
            output: PathBuf::from("voters.json"),
            language: "ben".to_string(),
            dpi: 300,
            workers: 4,
            min_chars_per_page: 100,
        }
    }
}

/// Load settings from an explicit path, or from `rollscan.toml` in the
/// working directory when present.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !default.exists() {
                return Ok(Settings::default());
            }
            default
        }
    };

    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("parsing config file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.pdf_dir, PathBuf::from("pdfs"));
        assert_eq!(settings.output, PathBuf::from("voters.json"));
        assert_eq!(settings.language, "ben");
        assert_eq!(settings.dpi, 300);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings: Settings = toml::from_str("language = \"ben+eng\"\ndpi = 600").unwrap();
        assert_eq!(settings.language, "ben+eng");
        assert_eq!(settings.dpi, 600);
        assert_eq!(settings.workers, 4);
        assert_eq!(settings.output, PathBuf::from("voters.json"));
    }
}

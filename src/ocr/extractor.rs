//! Text acquisition from PDF documents.
//!
//! Drives poppler and Tesseract through their command-line interfaces:
//! pdftotext for the embedded text layer, pdftoppm + tesseract when a
//! roll is a pure scan and needs OCR. The parser downstream only ever
//! sees the resulting text, never the tools.

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;
use thiserror::Error;

/// Errors from the external extraction tools.
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("external tool not found: {0} (install poppler-utils / tesseract-ocr)")]
    ToolNotFound(&'static str),

    #[error("extraction failed: {0}")]
    Failed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// How a document's text was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquisitionMethod {
    /// Read directly from the PDF text layer.
    TextLayer,
    /// Rasterized and recognized with Tesseract.
    Ocr,
}

impl AcquisitionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TextLayer => "text_layer",
            Self::Ocr => "ocr",
        }
    }
}

/// Full text of one document, newline-delimited.
#[derive(Debug)]
pub struct AcquiredText {
    pub text: String,
    pub method: AcquisitionMethod,
    pub page_count: u32,
}

/// Acquires document text, preferring the embedded text layer and
/// falling back to rasterize-and-OCR for scanned rolls.
#[derive(Debug, Clone)]
pub struct PageOcr {
    /// Tesseract language code.
    language: String,
    /// Raster resolution handed to pdftoppm.
    dpi: u32,
    /// Minimum non-whitespace characters per page for the text layer
    /// to be trusted over OCR.
    min_chars_per_page: usize,
    /// Skip the text layer entirely.
    force_ocr: bool,
}

impl Default for PageOcr {
    fn default() -> Self {
        Self {
            language: "ben".to_string(),
            dpi: 300,
            min_chars_per_page: 100,
            force_ocr: false,
        }
    }
}

impl PageOcr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_language(mut self, language: &str) -> Self {
        self.language = language.to_string();
        self
    }

    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    pub fn with_min_chars(mut self, min_chars_per_page: usize) -> Self {
        self.min_chars_per_page = min_chars_per_page;
        self
    }

    pub fn with_force_ocr(mut self, force_ocr: bool) -> Self {
        self.force_ocr = force_ocr;
        self
    }

    /// Acquire the full text of a document.
    ///
    /// The text layer wins unless it is sparse relative to the page
    /// count, which on scanned rolls means the PDF carries no real
    /// text and OCR is required.
    pub fn acquire(&self, pdf_path: &Path) -> Result<AcquiredText, OcrError> {
        let page_count = self.page_count(pdf_path).unwrap_or(1);

        if !self.force_ocr {
            if let Ok(text) = self.run_pdftotext(pdf_path) {
                let chars = text.chars().filter(|c| !c.is_whitespace()).count();
                if chars >= self.min_chars_per_page * page_count as usize {
                    return Ok(AcquiredText {
                        text,
                        method: AcquisitionMethod::TextLayer,
                        page_count,
                    });
                }
                tracing::debug!(
                    "{}: text layer too sparse ({} chars over {} pages), running OCR",
                    pdf_path.display(),
                    chars,
                    page_count
                );
            }
        }

        let text = self.ocr_document(pdf_path)?;
        Ok(AcquiredText {
            text,
            method: AcquisitionMethod::Ocr,
            page_count,
        })
    }

    /// Page count via pdfinfo; None when pdfinfo is unavailable or the
    /// file is unreadable.
    pub fn page_count(&self, pdf_path: &Path) -> Option<u32> {
        let output = Command::new("pdfinfo").arg(pdf_path).output().ok()?;
        if !output.status.success() {
            return None;
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        for line in stdout.lines() {
            if line.starts_with("Pages:") {
                return line.split_whitespace().nth(1).and_then(|s| s.parse().ok());
            }
        }
        None
    }

    fn run_pdftotext(&self, pdf_path: &Path) -> Result<String, OcrError> {
        let output = Command::new("pdftotext")
            .args(["-layout", "-enc", "UTF-8"])
            .arg(pdf_path)
            .arg("-")
            .output();

        handle_output(output, "pdftotext")
    }

    /// Rasterize every page into a temp directory and OCR each image.
    fn ocr_document(&self, pdf_path: &Path) -> Result<String, OcrError> {
        let temp_dir = TempDir::new()?;

        let status = Command::new("pdftoppm")
            .args(["-png", "-r", &self.dpi.to_string()])
            .arg(pdf_path)
            .arg(temp_dir.path().join("page"))
            .status();
        match status {
            Ok(s) if s.success() => {}
            Ok(_) => {
                return Err(OcrError::Failed(format!(
                    "pdftoppm failed to rasterize {}",
                    pdf_path.display()
                )))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(OcrError::ToolNotFound("pdftoppm"))
            }
            Err(e) => return Err(OcrError::Io(e)),
        }

        // pdftoppm names pages page-01.png, page-002.png, ... so a
        // lexical sort preserves page order.
        let mut images: Vec<PathBuf> = std::fs::read_dir(temp_dir.path())?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().map(|ext| ext == "png").unwrap_or(false))
            .collect();
        images.sort();

        if images.is_empty() {
            return Err(OcrError::Failed(format!(
                "no page images rasterized from {}",
                pdf_path.display()
            )));
        }

        let mut text = String::new();
        for (index, image) in images.iter().enumerate() {
            match self.run_tesseract(image) {
                Ok(page_text) => {
                    text.push('\n');
                    text.push_str(&page_text);
                }
                Err(e @ OcrError::ToolNotFound(_)) => return Err(e),
                Err(e) => {
                    tracing::warn!(
                        "OCR failed on page {} of {}: {}",
                        index + 1,
                        pdf_path.display(),
                        e
                    );
                }
            }
        }
        Ok(text)
    }

    fn run_tesseract(&self, image_path: &Path) -> Result<String, OcrError> {
        let output = Command::new("tesseract")
            .arg(image_path)
            .arg("stdout")
            .args(["-l", &self.language])
            .output();

        handle_output(output, "tesseract")
    }
}

/// Extract stdout on success, map missing binaries and tool failures
/// to their own variants.
fn handle_output(
    result: std::io::Result<std::process::Output>,
    tool: &'static str,
) -> Result<String, OcrError> {
    match result {
        Ok(output) => {
            if output.status.success() {
                Ok(String::from_utf8_lossy(&output.stdout).to_string())
            } else {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(OcrError::Failed(format!("{} failed: {}", tool, stderr)))
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(OcrError::ToolNotFound(tool)),
        Err(e) => Err(OcrError::Io(e)),
    }
}

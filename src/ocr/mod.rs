//! Text acquisition from source documents.
//!
//! pdftotext (Poppler) reads the embedded text layer; pdftoppm +
//! Tesseract handle scanned, image-only rolls. The segmentation engine
//! is agnostic to which path produced the text.

mod extractor;
pub mod tools;

pub use extractor::{AcquiredText, AcquisitionMethod, OcrError, PageOcr};

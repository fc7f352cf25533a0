//! rollscan - voter roll OCR extraction.
//!
//! Converts scanned Bangladeshi electoral roll PDFs into structured
//! voter records: poppler renders pages, Tesseract recognizes the
//! Bangla text, and a line-oriented scanner segments the raw output
//! into records and assigns field values.

pub mod cli;
pub mod config;
pub mod export;
pub mod models;
pub mod ocr;
pub mod parse;

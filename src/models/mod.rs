//! Data models for rollscan.

mod voter;

pub use voter::{OcrQuality, VoterRecord, DEGRADED_GLYPH};

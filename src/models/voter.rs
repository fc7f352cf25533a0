//! Voter record data model.
//!
//! One `VoterRecord` corresponds to one printed entry on an electoral
//! roll page. Records are assembled field by field by the parser and
//! serialized as a flat JSON sequence.

use serde::{Deserialize, Serialize};

/// Substring emitted in place of a glyph the extraction engine could
/// not map, e.g. `(cid:123)`. Used as an OCR quality signal and as a
/// validity check on names.
pub const DEGRADED_GLYPH: &str = "cid:";

/// OCR quality annotation for a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OcrQuality {
    #[default]
    Ok,
    Low,
}

impl OcrQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Low => "low",
        }
    }
}

/// One voter entry extracted from a source document.
///
/// Everything except `source_document` is optional; unset fields are
/// omitted from the serialized output. `source_document` is fixed at
/// creation and never reassigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoterRecord {
    /// Identifier of the document this record came from.
    pub source_document: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub voter_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub father: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub mother: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub occupation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub ocr_quality: OcrQuality,
}

impl VoterRecord {
    /// Create an empty record attributed to a source document.
    pub fn new(source_document: &str) -> Self {
        Self {
            source_document: source_document.to_string(),
            name: None,
            voter_id: None,
            father: None,
            mother: None,
            occupation: None,
            address: None,
            date_of_birth: None,
            ocr_quality: OcrQuality::default(),
        }
    }

    /// Whether the record is worth keeping: a name longer than two
    /// characters that is not itself degraded OCR output.
    pub fn is_valid(&self) -> bool {
        match &self.name {
            Some(name) => name.chars().count() > 2 && !name.contains(DEGRADED_GLYPH),
            None => false,
        }
    }
}

//! Record segmentation and field extraction for voter roll text.
//!
//! The scanner walks one document's raw text line by line. An ordinal
//! entry marker ("1.", "২)") closes the previous record and opens the
//! next; labeled lines fill fields; bare lines extend the last
//! wrap-friendly field; the record is validated when it closes. The
//! scanner never fails: unmatched text is attached to the open record
//! or ignored, and invalid candidates are dropped silently.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{OcrQuality, VoterRecord, DEGRADED_GLYPH};

/// An ordinal entry marker: digits followed by `.` or `)`. The regex
/// crate's `\d` is Unicode-aware, so Bangla digits (০-৯) match the
/// same pattern as Western ones.
static ENTRY_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+[.)]").unwrap());

/// Date of birth as printed on the rolls: DD/MM/YYYY. Not calendar
/// validated.
static DATE_OF_BIRTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{2}/\d{2}/\d{4}").unwrap());

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Collapse whitespace runs to single spaces and trim. Idempotent.
pub fn clean(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

/// A labeled field recognized on a roll line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    VoterId,
    Father,
    Mother,
    Occupation,
    Address,
}

/// Label tokens in match priority order. Matching is first-match-wins:
/// a line feeds exactly one field even when it carries several tokens.
const LABELS: [(&str, Field); 6] = [
    ("নাম:", Field::Name),
    ("ভোটার নং:", Field::VoterId),
    ("পিতা:", Field::Father),
    ("মাতা:", Field::Mother),
    ("পেশা:", Field::Occupation),
    ("ঠিকানা:", Field::Address),
];

impl Field {
    /// Fields whose values wrap onto following physical lines in the
    /// printed layout. Voter ID and Occupation never continue.
    fn wraps(self) -> bool {
        !matches!(self, Field::VoterId | Field::Occupation)
    }

    fn slot(self, record: &mut VoterRecord) -> &mut Option<String> {
        match self {
            Field::Name => &mut record.name,
            Field::VoterId => &mut record.voter_id,
            Field::Father => &mut record.father,
            Field::Mother => &mut record.mother,
            Field::Occupation => &mut record.occupation,
            Field::Address => &mut record.address,
        }
    }
}

/// The record currently being populated, plus the single-slot pointer
/// the continuation rule reads: the most recently populated field,
/// kept only while that field is one whose value wraps.
struct OpenRecord {
    record: VoterRecord,
    continuation: Option<Field>,
}

impl OpenRecord {
    fn new(source_id: &str) -> Self {
        Self {
            record: VoterRecord::new(source_id),
            continuation: None,
        }
    }
}

/// Extract every voter record from one document's text.
///
/// `source_id` stamps each record's `source_document`. Records are
/// returned in document order; candidates failing the validity check
/// (no usable name) are filtered out, never reported as errors. Empty
/// input yields an empty vector.
pub fn extract_records(text: &str, source_id: &str) -> Vec<VoterRecord> {
    let mut records = Vec::new();
    let mut open: Option<OpenRecord> = None;

    for raw in text.lines() {
        let line = clean(raw);
        if line.is_empty() {
            continue;
        }

        // An entry marker closes the previous record and opens the
        // next. The ordinal itself carries no field content, but the
        // rest of the line is still inspected below, since rolls print
        // the name on the marker line.
        if ENTRY_MARKER.is_match(&line) {
            close(&mut records, open.take());
            open = Some(OpenRecord::new(source_id));
        }

        // Text ahead of the first marker belongs to no record.
        let Some(current) = open.as_mut() else {
            continue;
        };

        // Sticky downgrade: once a degraded glyph shows up anywhere in
        // the record's block, the whole record is suspect.
        if line.contains(DEGRADED_GLYPH) {
            current.record.ocr_quality = OcrQuality::Low;
        }

        match match_label(&line) {
            Some((field, value)) => {
                *field.slot(&mut current.record) = Some(value);
                current.continuation = field.wraps().then_some(field);
            }
            None => {
                if let Some(field) = current.continuation {
                    if let Some(existing) = field.slot(&mut current.record) {
                        existing.push(' ');
                        existing.push_str(&line);
                    }
                }
            }
        }

        // A date may share a line with any label, so this scan runs on
        // every line of the open record. First match wins.
        if current.record.date_of_birth.is_none() {
            if let Some(found) = DATE_OF_BIRTH.find(&line) {
                current.record.date_of_birth = Some(found.as_str().to_string());
            }
        }
    }

    close(&mut records, open.take());
    records
}

/// Close a record: validity-check it and keep it if it passes.
fn close(records: &mut Vec<VoterRecord>, open: Option<OpenRecord>) {
    if let Some(open) = open {
        if open.record.is_valid() {
            records.push(open.record);
        }
    }
}

/// Find the highest-priority label token on a line and return the
/// cleaned value after its first occurrence.
fn match_label(line: &str) -> Option<(Field, String)> {
    for (token, field) in LABELS {
        if let Some((_, rest)) = line.split_once(token) {
            return Some((field, clean(rest)));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_collapses_and_trims() {
        assert_eq!(clean("  a \t b \r"), "a b");
        assert_eq!(clean("\u{09A8}\u{09BE}\u{09AE}:   x"), "\u{09A8}\u{09BE}\u{09AE}: x");
        assert_eq!(clean("   "), "");
    }

    #[test]
    fn test_clean_is_idempotent() {
        for input in ["  a \t b ", "a b", "", " \n ", "নাম:  করিম"] {
            let once = clean(input);
            assert_eq!(clean(&once), once);
        }
    }

    #[test]
    fn test_marker_matches_both_digit_scripts() {
        for line in ["1.", "12)", "১.", "৯৯)"] {
            assert!(ENTRY_MARKER.is_match(line), "{line} should open a record");
        }
        for line in ["a1.", "..", "নাম: 1."] {
            assert!(!ENTRY_MARKER.is_match(line), "{line} should not open a record");
        }
    }

    #[test]
    fn test_text_before_first_marker_is_discarded() {
        let records = extract_records("নাম: Stray Header Name\n1. নাম: Karim Uddin", "r.pdf");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name.as_deref(), Some("Karim Uddin"));
    }

    #[test]
    fn test_label_matching_is_exclusive() {
        // One line, two tokens: only the higher-priority field (name)
        // is populated, and it swallows the rest of the line.
        let records = extract_records("1. নাম: Karim Uddin পিতা: Rahim", "r.pdf");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name.as_deref(), Some("Karim Uddin পিতা: Rahim"));
        assert_eq!(records[0].father, None);
    }

    #[test]
    fn test_label_value_overwrites() {
        let records = extract_records("1. নাম: First Value\nনাম: Second Value", "r.pdf");
        assert_eq!(records[0].name.as_deref(), Some("Second Value"));
    }

    #[test]
    fn test_continuation_extends_address() {
        let text = "1. নাম: X Y\nঠিকানা: Village A,\nThana B, District C";
        let records = extract_records(text, "r.pdf");
        assert_eq!(
            records[0].address.as_deref(),
            Some("Village A, Thana B, District C")
        );
    }

    #[test]
    fn test_occupation_is_never_extended() {
        let text = "1. নাম: Karim Uddin\nপেশা: কৃষক\nsome stray ocr line";
        let records = extract_records(text, "r.pdf");
        assert_eq!(records[0].occupation.as_deref(), Some("কৃষক"));
        // The stray line is dropped entirely, not glued onto an
        // earlier wrap-friendly field either.
        assert_eq!(records[0].name.as_deref(), Some("Karim Uddin"));
    }

    #[test]
    fn test_voter_id_is_never_extended() {
        let text = "1. নাম: Karim Uddin\nভোটার নং: 110923456789\ngarbage";
        let records = extract_records(text, "r.pdf");
        assert_eq!(records[0].voter_id.as_deref(), Some("110923456789"));
    }

    #[test]
    fn test_date_of_birth_on_labeled_line() {
        let records = extract_records("1. নাম: Karim Uddin 05/06/1990", "r.pdf");
        assert_eq!(records[0].date_of_birth.as_deref(), Some("05/06/1990"));
    }

    #[test]
    fn test_date_of_birth_first_match_wins() {
        let text = "1. নাম: Karim Uddin\nজন্ম তারিখ: 05/06/1990\nপেশা: 11/11/2011";
        let records = extract_records(text, "r.pdf");
        assert_eq!(records[0].date_of_birth.as_deref(), Some("05/06/1990"));
    }

    #[test]
    fn test_degraded_glyph_downgrade_is_sticky() {
        let text = "1. নাম: Karim Uddin\nঠিকানা: (cid:123) Village\nপিতা: Rahim Uddin";
        let records = extract_records(text, "r.pdf");
        assert_eq!(records[0].ocr_quality, OcrQuality::Low);
        assert_eq!(records[0].father.as_deref(), Some("Rahim Uddin"));
    }

    #[test]
    fn test_invalid_records_are_dropped() {
        let records = extract_records("1. নাম: Ka\n2. নাম: Valid Name Here", "r.pdf");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name.as_deref(), Some("Valid Name Here"));
    }

    #[test]
    fn test_degraded_name_is_dropped() {
        let records = extract_records("1. নাম: (cid:88) something", "r.pdf");
        assert!(records.is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(extract_records("", "r.pdf").is_empty());
        assert!(extract_records("\n\n  \n", "r.pdf").is_empty());
    }

    #[test]
    fn test_final_record_closes_at_end_of_input() {
        let records = extract_records("1. নাম: Only Entry", "r.pdf");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].source_document, "r.pdf");
    }
}

//! End-to-end tests for the record segmentation engine.

use rollscan::models::OcrQuality;
use rollscan::parse::extract_records;

#[test]
fn single_record_with_name_and_father() {
    let records = extract_records("1. নাম: Karim Uddin\nপিতা: Rahim Uddin", "doc1.pdf");

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.source_document, "doc1.pdf");
    assert_eq!(record.name.as_deref(), Some("Karim Uddin"));
    assert_eq!(record.father.as_deref(), Some("Rahim Uddin"));
    assert_eq!(record.ocr_quality, OcrQuality::Ok);
    assert_eq!(record.voter_id, None);
    assert_eq!(record.date_of_birth, None);
}

#[test]
fn too_short_name_drops_the_record() {
    let records = extract_records("1. নাম: Ka\n2. নাম: Valid Name Here", "doc.pdf");

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name.as_deref(), Some("Valid Name Here"));
}

#[test]
fn wrapped_address_is_merged() {
    let text = "1. নাম: X Y\nঠিকানা: Village A,\nThana B, District C";
    let records = extract_records(text, "doc.pdf");

    assert_eq!(records.len(), 1);
    assert_eq!(
        records[0].address.as_deref(),
        Some("Village A, Thana B, District C")
    );
}

#[test]
fn degraded_glyph_flags_quality_low_and_stays() {
    let text = "1. নাম: Karim Uddin\nঠিকানা: (cid:123) road\nমাতা: Amena Begum\nপেশা: কৃষক";
    let records = extract_records(text, "doc.pdf");

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].ocr_quality, OcrQuality::Low);
    // Clean lines after the marker do not reset the downgrade.
    assert_eq!(records[0].mother.as_deref(), Some("Amena Begum"));
}

#[test]
fn date_of_birth_is_picked_from_any_line() {
    let text = "1. নাম: Karim Uddin\nপেশা: কৃষক\nজন্ম তারিখ: 05/06/1990";
    let records = extract_records(text, "doc.pdf");

    assert_eq!(records[0].date_of_birth.as_deref(), Some("05/06/1990"));
}

#[test]
fn empty_input_yields_no_records() {
    assert!(extract_records("", "doc.pdf").is_empty());
}

#[test]
fn mixed_digit_scripts_and_whitespace_noise() {
    let text = "\n\n১) নাম: Alpha Beta\nভোটার নং: 1109\n\n   \n2. নাম:   Gamma   Delta\nমাতা: Rokeya Khatun\n";
    let records = extract_records(text, "roll-3.pdf");

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].name.as_deref(), Some("Alpha Beta"));
    assert_eq!(records[0].voter_id.as_deref(), Some("1109"));
    assert_eq!(records[1].name.as_deref(), Some("Gamma Delta"));
    assert_eq!(records[1].mother.as_deref(), Some("Rokeya Khatun"));
    assert!(records.iter().all(|r| r.source_document == "roll-3.pdf"));
}

#[test]
fn serialized_sequence_omits_unset_fields() {
    let records = extract_records("1. নাম: Karim Uddin", "doc.pdf");
    let json = serde_json::to_string_pretty(&records).unwrap();

    assert!(json.contains("\"name\": \"Karim Uddin\""));
    assert!(json.contains("\"ocr_quality\": \"ok\""));
    assert!(!json.contains("father"));
    assert!(!json.contains("address"));
}

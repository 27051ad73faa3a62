// crates/cepp-core/tests/codec.rs
// ============================================================================
// Module: Certificate Codec Tests
// Description: Canonical serialization and strict parsing of CEPP-Data.
// ============================================================================
//! ## Overview
//! Validates the exact wire form and every parser rejection path.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use cepp_core::CertificateRecord;
use cepp_core::FieldKey;
use cepp_core::ParseError;
use cepp_core::RecordError;
use cepp_core::RecordFields;
use cepp_core::record;

/// Canonical header for the sample record.
const SAMPLE: &str = "v=1; s=123; a=ecdsa; i=RU Certificate Authority; nb=250101000000Z; \
                      na=250108000000Z; d=example.com; l=2";

/// Builds the sample record from fields.
fn sample_fields() -> RecordFields {
    RecordFields {
        version: "1".to_string(),
        serial: "123".to_string(),
        algorithm: "ecdsa".to_string(),
        issuer: "RU Certificate Authority".to_string(),
        not_before: "250101000000Z".to_string(),
        not_after: "250108000000Z".to_string(),
        domain: "example.com".to_string(),
        level: "2".to_string(),
    }
}

// ============================================================================
// SECTION: Serialization
// ============================================================================

/// Tests the serializer emits the exact canonical form.
#[test]
fn serialize_emits_canonical_form() {
    let record = CertificateRecord::new(sample_fields()).unwrap();
    assert_eq!(record.serialize(), SAMPLE);
    assert_eq!(record::serialize(&record), SAMPLE);
    assert_eq!(record.to_string(), SAMPLE);
}

/// Tests equal records serialize to identical bytes.
#[test]
fn serialize_is_deterministic() {
    let first = CertificateRecord::new(sample_fields()).unwrap();
    let second = CertificateRecord::new(sample_fields()).unwrap();
    assert_eq!(first.serialize().as_bytes(), second.serialize().as_bytes());
}

/// Tests values with reserved characters are refused at construction.
#[test]
fn new_rejects_reserved_characters() {
    let mut fields = sample_fields();
    fields.domain = "example.com; l=9".to_string();
    assert_eq!(
        CertificateRecord::new(fields),
        Err(RecordError::ReservedCharacter {
            field: FieldKey::Domain,
            character: ';',
        })
    );

    let mut fields = sample_fields();
    fields.level = "a=b".to_string();
    assert!(matches!(
        CertificateRecord::new(fields),
        Err(RecordError::ReservedCharacter {
            field: FieldKey::Level,
            character: '=',
        })
    ));
}

/// Tests values with control characters are refused at construction.
#[test]
fn new_rejects_control_characters() {
    let cases = [("example.com\r\nBcc: x@y.z", '\r'), ("example.com\n", '\n'), ("a\tb", '\t')];
    for (value, character) in cases {
        let mut fields = sample_fields();
        fields.domain = value.to_string();
        assert_eq!(
            CertificateRecord::new(fields),
            Err(RecordError::ControlCharacter {
                field: FieldKey::Domain,
                character,
            })
        );
    }

    let mut fields = sample_fields();
    fields.issuer = "RU\u{7f}".to_string();
    assert!(matches!(
        CertificateRecord::new(fields),
        Err(RecordError::ControlCharacter {
            field: FieldKey::Issuer,
            ..
        })
    ));
}

/// Tests deserialization applies the same checks as construction.
#[test]
fn deserialize_enforces_record_invariants() {
    let record = CertificateRecord::new(sample_fields()).unwrap();
    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["domain"], sample_fields().domain.as_str());
    let back: CertificateRecord = serde_json::from_value(json.clone()).unwrap();
    assert_eq!(back, record);

    let mut injected = json.clone();
    injected["domain"] = serde_json::Value::from("example.com; l=9");
    assert!(serde_json::from_value::<CertificateRecord>(injected).is_err());

    let mut broken = json;
    broken["level"] = serde_json::Value::from("2\r\nX-Extra: 1");
    assert!(serde_json::from_value::<CertificateRecord>(broken).is_err());
}

// ============================================================================
// SECTION: Parsing
// ============================================================================

/// Tests parsing the canonical form yields every field.
#[test]
fn parse_reads_all_fields() {
    let record = CertificateRecord::parse(SAMPLE).unwrap();
    assert_eq!(record.version(), "1");
    assert_eq!(record.serial(), "123");
    assert_eq!(record.algorithm(), "ecdsa");
    assert_eq!(record.issuer(), "RU Certificate Authority");
    assert_eq!(record.not_before(), "250101000000Z");
    assert_eq!(record.not_after(), "250108000000Z");
    assert_eq!(record.domain(), "example.com");
    assert_eq!(record.level(), "2");
    assert_eq!(record, CertificateRecord::new(sample_fields()).unwrap());
}

/// Tests fields iterate in canonical order.
#[test]
fn fields_iterate_in_wire_order() {
    let record = CertificateRecord::parse(SAMPLE).unwrap();
    let keys: Vec<&str> = record.fields().map(|(key, _)| key.as_str()).collect();
    assert_eq!(keys, ["v", "s", "a", "i", "nb", "na", "d", "l"]);
}

/// Tests the parser rejects too few and too many segments.
#[test]
fn parse_rejects_wrong_segment_count() {
    let seven = "v=1; s=123; a=ecdsa; i=RU; nb=250101000000Z; na=250108000000Z; d=example.com";
    assert_eq!(
        record::parse(seven),
        Err(ParseError::SegmentCount {
            found: 7
        })
    );
    let nine = format!("{SAMPLE}; x=1");
    assert_eq!(
        record::parse(&nine),
        Err(ParseError::SegmentCount {
            found: 9
        })
    );
    let trailing = format!("{SAMPLE};");
    assert!(record::parse(&trailing).is_err());
}

/// Tests the parser rejects empty and whitespace input.
#[test]
fn parse_rejects_empty_input() {
    assert_eq!(
        record::parse(""),
        Err(ParseError::SegmentCount {
            found: 1
        })
    );
    assert!(record::parse("   ").is_err());
    assert!(record::parse(";;;;;;;").is_err());
}

/// Tests a wrong key at any position is rejected.
#[test]
fn parse_rejects_wrong_key() {
    let replaced = SAMPLE.replace("d=example.com", "x=example.com");
    assert_eq!(
        record::parse(&replaced),
        Err(ParseError::UnexpectedKey {
            position: 6,
            expected: FieldKey::Domain,
        })
    );
    let first = SAMPLE.replacen("v=1", "V=1", 1);
    assert!(matches!(record::parse(&first), Err(ParseError::UnexpectedKey { position: 0, .. })));
}

/// Tests swapped fields are rejected.
#[test]
fn parse_rejects_reordered_fields() {
    let swapped = "s=123; v=1; a=ecdsa; i=RU; nb=250101000000Z; na=250108000000Z; d=example.com; l=2";
    assert_eq!(
        record::parse(swapped),
        Err(ParseError::UnexpectedKey {
            position: 0,
            expected: FieldKey::Version,
        })
    );
}

/// Tests segments with zero or two `=` characters are rejected.
#[test]
fn parse_rejects_separator_count() {
    let missing = SAMPLE.replace("l=2", "l2");
    assert_eq!(
        record::parse(&missing),
        Err(ParseError::MissingSeparator {
            position: 7
        })
    );
    let doubled = SAMPLE.replace("d=example.com", "d=example.com=evil.org");
    assert_eq!(
        record::parse(&doubled),
        Err(ParseError::ExtraSeparator {
            position: 6
        })
    );
    let empty_key = SAMPLE.replace("s=123", "=123");
    assert!(record::parse(&empty_key).is_err());
}

/// Tests surrounding whitespace on keys is tolerated but values stay verbatim.
#[test]
fn parse_trims_keys_only() {
    let spaced = "  v=1;s=123 ;a=ecdsa;\ti=RU;nb=250101000000Z;na=250108000000Z;d=example.com;l=2";
    let record = record::parse(spaced).unwrap();
    assert_eq!(record.version(), "1");
    assert_eq!(record.serial(), "123 ");
    assert_eq!(record.issuer(), "RU");
}

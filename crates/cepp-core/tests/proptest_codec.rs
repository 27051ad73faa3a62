// crates/cepp-core/tests/proptest_codec.rs
// ============================================================================
// Module: Codec Property-Based Tests
// Description: Property tests for record round trips and parser totality.
// Purpose: Detect panics and invariant breaks across wide input ranges.
// ============================================================================

//! Property-based tests for codec invariants.

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
    reason = "Test-only assertions and helpers are permitted."
)]

use cepp_core::CertificateRecord;
use cepp_core::RecordFields;
use proptest::prelude::*;

/// Field values free of `;`, `=`, and control characters.
fn value_strategy() -> impl Strategy<Value = String> {
    "[^;=\\p{Cc}]{0,24}"
}

/// Well-formed record fields.
fn fields_strategy() -> impl Strategy<Value = RecordFields> {
    (
        value_strategy(),
        value_strategy(),
        value_strategy(),
        value_strategy(),
        value_strategy(),
        value_strategy(),
        value_strategy(),
        value_strategy(),
    )
        .prop_map(|(version, serial, algorithm, issuer, not_before, not_after, domain, level)| {
            RecordFields {
                version,
                serial,
                algorithm,
                issuer,
                not_before,
                not_after,
                domain,
                level,
            }
        })
}

proptest! {
    #[test]
    fn parse_inverts_serialize(fields in fields_strategy()) {
        let record = CertificateRecord::new(fields).unwrap();
        let parsed = CertificateRecord::parse(&record.serialize()).unwrap();
        prop_assert_eq!(parsed, record);
    }

    #[test]
    fn parse_never_panics(input in ".*") {
        let _ = CertificateRecord::parse(&input);
    }

    #[test]
    fn parse_never_panics_on_near_misses(
        segments in prop::collection::vec("[ a-z]{0,3}(=[^;]{0,6}){0,2}", 0 .. 12)
    ) {
        let input = segments.join(";");
        if let Ok(record) = CertificateRecord::parse(&input) {
            prop_assert_eq!(segments.len(), 8);
            prop_assert_eq!(record.fields().count(), 8);
        }
    }
}

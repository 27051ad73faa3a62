// crates/cepp-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Main Helpers Tests
// Description: Unit tests for default windows, serials, and bounded reads.
// Purpose: Ensure compose defaults and input limits behave as documented.
// Dependencies: cepp-cli main helpers
// ============================================================================

//! ## Overview
//! Validates the helper functions behind `cepp sign` defaults and the size
//! limit applied to message files.

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

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;

use rand::SeedableRng;
use rand::rngs::StdRng;
use time::macros::datetime;

use super::ReadLimitError;
use super::SERIAL_UPPER_BOUND;
use super::default_window;
use super::random_serial;
use super::read_bytes_with_limit;

// ============================================================================
// SECTION: Tests
// ============================================================================

/// Verifies the default window starts one day back and spans eight days.
#[test]
fn default_window_starts_a_day_back_and_lasts_eight_days() {
    let (not_before, not_after) = default_window(datetime!(2025-03-10 12:30:15 UTC));
    assert_eq!(not_before.as_str(), "250309123015Z");
    assert_eq!(not_after.as_str(), "250317123015Z");
}

/// Verifies the default window rolls across month boundaries.
#[test]
fn default_window_crosses_month_boundaries() {
    let (not_before, not_after) = default_window(datetime!(2025-03-01 00:00:00 UTC));
    assert_eq!(not_before.as_str(), "250228000000Z");
    assert_eq!(not_after.as_str(), "250308000000Z");
}

/// Verifies generated serials are digit strings below the upper bound.
#[test]
fn random_serials_are_digits_below_bound() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0 .. 64 {
        let serial = random_serial(&mut rng);
        assert!(serial.bytes().all(|byte| byte.is_ascii_digit()));
        assert!(serial.parse::<u64>().unwrap() < SERIAL_UPPER_BOUND);
    }
}

/// Verifies files within the limit are read in full.
#[test]
fn read_bytes_with_limit_allows_small_file() {
    let file = tempfile::NamedTempFile::new().expect("temp file");
    fs::write(file.path(), b"ok").expect("write small file");
    let bytes = read_bytes_with_limit(file.path(), 16).expect("read small file");
    assert_eq!(bytes, b"ok");
}

/// Verifies files over the limit are rejected with their size.
#[test]
fn read_bytes_with_limit_rejects_large_file() {
    let file = tempfile::NamedTempFile::new().expect("temp file");
    fs::write(file.path(), vec![0_u8; 9]).expect("write large file");
    match read_bytes_with_limit(file.path(), 8) {
        Err(ReadLimitError::TooLarge {
            size,
            limit,
        }) => {
            assert_eq!(size, 9);
            assert_eq!(limit, 8);
        }
        other => panic!("expected size limit failure, got {other:?}"),
    }
}

// crates/cepp-core/src/runtime/validity.rs
// ============================================================================
// Module: CEPP Validity Validator
// Description: Version, serial, window, and sender-domain checks.
// Purpose: Reject structurally parsed records that are not currently valid.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! The validator runs four independent checks over a parsed record. All must
//! pass. The window is strict on both ends: `nb < now < na`. The sender's mail
//! domain must equal the record's subject domain, compared ASCII
//! case-insensitively after stripping one trailing `>` left over from
//! `Name <user@host>` header forms.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::CeppTimestamp;
use crate::core::CertificateRecord;
use crate::core::SUPPORTED_VERSION;

// ============================================================================
// SECTION: Check Failures
// ============================================================================

/// The first validity check a record failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidityFailure {
    /// `v` is not the supported version.
    #[error("unsupported protocol version")]
    Version,
    /// `s` is not a non-negative integer.
    #[error("serial number is not a non-negative integer")]
    Serial,
    /// `nb`/`na` are malformed or `now` lies outside the window.
    #[error("certificate is not yet valid or has expired")]
    Window,
    /// The sender domain does not match `d`.
    #[error("sender domain does not match certificate domain")]
    Domain,
}

// ============================================================================
// SECTION: Validator
// ============================================================================

/// Runs every validity check in order and reports the first failure.
///
/// # Errors
///
/// Returns the [`ValidityFailure`] for the first check that does not pass.
pub fn check(
    record: &CertificateRecord,
    now: &CeppTimestamp,
    sender: &str,
) -> Result<(), ValidityFailure> {
    if !check_version(record.version()) {
        return Err(ValidityFailure::Version);
    }
    if !check_serial(record.serial()) {
        return Err(ValidityFailure::Serial);
    }
    if !check_window(record.not_before(), now, record.not_after()) {
        return Err(ValidityFailure::Window);
    }
    if !check_domain(record.domain(), sender) {
        return Err(ValidityFailure::Domain);
    }
    Ok(())
}

/// Returns true when every validity check passes.
#[must_use]
pub fn is_valid(record: &CertificateRecord, now: &CeppTimestamp, sender: &str) -> bool {
    check(record, now, sender).is_ok()
}

/// Returns true when `version` is the supported protocol version.
#[must_use]
pub fn check_version(version: &str) -> bool {
    version == SUPPORTED_VERSION
}

/// Returns true when `serial` is a non-empty run of ASCII digits.
#[must_use]
pub fn check_serial(serial: &str) -> bool {
    !serial.is_empty() && serial.bytes().all(|byte| byte.is_ascii_digit())
}

/// Returns true when both bounds are well-formed and `not_before < now < not_after`.
#[must_use]
pub fn check_window(not_before: &str, now: &CeppTimestamp, not_after: &str) -> bool {
    let (Ok(not_before), Ok(not_after)) =
        (CeppTimestamp::parse(not_before), CeppTimestamp::parse(not_after))
    else {
        return false;
    };
    not_before < *now && *now < not_after
}

/// Returns true when the sender's mail domain equals `domain`.
#[must_use]
pub fn check_domain(domain: &str, sender: &str) -> bool {
    if domain.is_empty() {
        return false;
    }
    sender_domain(sender).is_some_and(|mail_domain| mail_domain.eq_ignore_ascii_case(domain))
}

/// Extracts the mail domain from a sender address.
///
/// Requires exactly one `@`. Strips one trailing `>`.
#[must_use]
pub fn sender_domain(sender: &str) -> Option<&str> {
    let mut parts = sender.split('@');
    let (Some(_), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return None;
    };
    Some(domain.strip_suffix('>').unwrap_or(domain))
}

// ============================================================================
// SECTION: Tests
// ============================================================================

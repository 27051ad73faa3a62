// crates/cepp-core/src/core/time.rs
// ============================================================================
// Module: CEPP Time Model
// Description: Compact `YYMMDDHHMMSSZ` timestamps used by certificate windows.
// Purpose: Give callers one validated representation for bounds and "now".
// Dependencies: serde, thiserror, time
// ============================================================================

//! ## Overview
//! Certificate validity bounds and the verifier's current time share one
//! 13-character form: twelve ASCII digits (`YYMMDDHHMMSS`, UTC) followed by
//! a literal `Z`. Comparison uses the numeric value of the digit prefix.
//!
//! The core never reads the wall clock; hosts build the current timestamp
//! with [`CeppTimestamp::from_datetime`] and pass it in.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use time::Date;
use time::OffsetDateTime;
use time::PrimitiveDateTime;
use time::Time;
use time::UtcOffset;
use time::macros::format_description;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Total timestamp length including the trailing `Z`.
pub const TIMESTAMP_LENGTH: usize = 13;
/// Number of leading digits.
const DIGIT_COUNT: usize = 12;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when parsing or building CEPP timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    /// Input was not exactly 13 bytes long.
    #[error("timestamp must be {TIMESTAMP_LENGTH} characters, found {found}")]
    Length {
        /// Observed byte length.
        found: usize,
    },
    /// The first twelve characters were not all ASCII digits.
    #[error("timestamp must start with 12 digits")]
    Digits,
    /// The thirteenth character was not `Z`.
    #[error("timestamp must end with 'Z'")]
    Suffix,
    /// A date or time form input could not be parsed.
    #[error("invalid {field} input: {value}")]
    Form {
        /// Which form input failed (`date` or `time`).
        field: &'static str,
        /// Rejected input.
        value: String,
    },
}

// ============================================================================
// SECTION: Timestamp
// ============================================================================

/// Validated `YYMMDDHHMMSSZ` timestamp.
///
/// # Invariants
/// - `text` is exactly 12 ASCII digits followed by `Z`.
/// - `value` is the numeric value of those 12 digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CeppTimestamp {
    /// Canonical text form.
    text: String,
    /// Numeric value of the digit prefix.
    value: u64,
}

impl CeppTimestamp {
    /// Parses a timestamp in `YYMMDDHHMMSSZ` form.
    ///
    /// # Errors
    ///
    /// Returns [`TimestampError`] when the length, digits, or suffix are wrong.
    pub fn parse(input: &str) -> Result<Self, TimestampError> {
        let bytes = input.as_bytes();
        if bytes.len() != TIMESTAMP_LENGTH {
            return Err(TimestampError::Length {
                found: bytes.len(),
            });
        }
        let (digits, suffix) = bytes.split_at(DIGIT_COUNT);
        if !digits.iter().all(u8::is_ascii_digit) {
            return Err(TimestampError::Digits);
        }
        if suffix != b"Z" {
            return Err(TimestampError::Suffix);
        }
        let value = digits.iter().fold(0_u64, |acc, digit| acc * 10 + u64::from(digit - b'0'));
        Ok(Self {
            text: input.to_string(),
            value,
        })
    }

    /// Formats a date-time as a UTC CEPP timestamp.
    ///
    /// Uses the 1-based month and the day of the month. The year is reduced
    /// to its last two digits.
    #[must_use]
    pub fn from_datetime(datetime: OffsetDateTime) -> Self {
        let utc = datetime.to_offset(UtcOffset::UTC);
        let year = u64::from(utc.year().rem_euclid(100).unsigned_abs());
        let parts = [
            year,
            u64::from(u8::from(utc.month())),
            u64::from(utc.day()),
            u64::from(utc.hour()),
            u64::from(utc.minute()),
            u64::from(utc.second()),
        ];
        let mut text = String::with_capacity(TIMESTAMP_LENGTH);
        let mut value = 0_u64;
        for part in parts {
            text.push_str(&format!("{part:02}"));
            value = value * 100 + part;
        }
        text.push('Z');
        Self {
            text,
            value,
        }
    }

    /// Builds a timestamp from compose-form inputs (`YYYY-MM-DD` and `HH:MM`).
    ///
    /// Seconds are always `00`.
    ///
    /// # Errors
    ///
    /// Returns [`TimestampError::Form`] when either input fails to parse.
    pub fn from_form(date: &str, time: &str) -> Result<Self, TimestampError> {
        let date = Date::parse(date, format_description!("[year]-[month]-[day]")).map_err(
            |_| TimestampError::Form {
                field: "date",
                value: date.to_string(),
            },
        )?;
        let time = Time::parse(time, format_description!("[hour]:[minute]")).map_err(|_| {
            TimestampError::Form {
                field: "time",
                value: time.to_string(),
            }
        })?;
        Ok(Self::from_datetime(PrimitiveDateTime::new(date, time).assume_utc()))
    }

    /// Returns the canonical text form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns the numeric value of the 12-digit prefix.
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.value
    }
}

impl PartialOrd for CeppTimestamp {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CeppTimestamp {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.value.cmp(&other.value)
    }
}

impl fmt::Display for CeppTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl TryFrom<String> for CeppTimestamp {
    type Error = TimestampError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CeppTimestamp> for String {
    fn from(value: CeppTimestamp) -> Self {
        value.text
    }
}

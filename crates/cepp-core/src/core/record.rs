// crates/cepp-core/src/core/record.rs
// ============================================================================
// Module: CEPP Certificate Record
// Description: Eight-field certificate record and its canonical string codec.
// Purpose: Provide the exact byte sequence signatures are computed over.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! A certificate record is carried in the `CEPP-Data` mail header as
//! `v=V; s=S; a=A; i=I; nb=NB; na=NA; d=D; l=L`. The parser is strict and
//! total: any deviation from that shape yields a [`ParseError`], never a
//! partial record and never a panic.
//!
//! Security posture: parser input comes straight from attacker-controlled mail
//! headers. Values are stored verbatim; semantic checks live in the validity
//! validator.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// The only protocol version this implementation accepts and emits.
pub const SUPPORTED_VERSION: &str = "1";

/// Separator placed between record segments by the serializer.
const SEGMENT_SEPARATOR: &str = "; ";

// ============================================================================
// SECTION: Field Keys
// ============================================================================

/// Record field keys in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKey {
    /// Protocol version (`v`).
    Version,
    /// Serial number (`s`).
    Serial,
    /// Algorithm identifier (`a`).
    Algorithm,
    /// Issuer identifier (`i`).
    Issuer,
    /// Not-before timestamp (`nb`).
    NotBefore,
    /// Not-after timestamp (`na`).
    NotAfter,
    /// Subject domain (`d`).
    Domain,
    /// Classification level (`l`).
    Level,
}

impl FieldKey {
    /// All keys in the fixed wire order.
    pub const ORDER: [Self; 8] = [
        Self::Version,
        Self::Serial,
        Self::Algorithm,
        Self::Issuer,
        Self::NotBefore,
        Self::NotAfter,
        Self::Domain,
        Self::Level,
    ];

    /// Returns the wire key for the field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Version => "v",
            Self::Serial => "s",
            Self::Algorithm => "a",
            Self::Issuer => "i",
            Self::NotBefore => "nb",
            Self::NotAfter => "na",
            Self::Domain => "d",
            Self::Level => "l",
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Reasons a `CEPP-Data` header fails to parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The header did not split into exactly eight segments.
    #[error("expected 8 segments, found {found}")]
    SegmentCount {
        /// Number of `;`-separated segments present.
        found: usize,
    },
    /// A segment had no `=` separator.
    #[error("segment {position} has no '=' separator")]
    MissingSeparator {
        /// Zero-based segment position.
        position: usize,
    },
    /// A segment had more than one `=` separator.
    #[error("segment {position} has more than one '=' separator")]
    ExtraSeparator {
        /// Zero-based segment position.
        position: usize,
    },
    /// A segment key did not match the key expected at its position.
    #[error("segment {position} expected key '{expected}'")]
    UnexpectedKey {
        /// Zero-based segment position.
        position: usize,
        /// Key required at this position.
        expected: FieldKey,
    },
}

/// Errors raised when constructing a record from field values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// A value contains a character reserved by the wire format.
    #[error("field '{field}' contains reserved character '{character}'")]
    ReservedCharacter {
        /// Offending field.
        field: FieldKey,
        /// Reserved character found in the value.
        character: char,
    },
    /// A value contains a control character and cannot travel in a single
    /// mail header line.
    #[error("field '{field}' contains a control character")]
    ControlCharacter {
        /// Offending field.
        field: FieldKey,
        /// Control character found in the value.
        character: char,
    },
}

// ============================================================================
// SECTION: Record Fields
// ============================================================================

/// Field values used to build a [`CertificateRecord`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFields {
    /// Protocol version.
    pub version: String,
    /// Serial number.
    pub serial: String,
    /// Algorithm identifier.
    pub algorithm: String,
    /// Issuer identifier.
    pub issuer: String,
    /// Not-before timestamp (`YYMMDDHHMMSSZ`).
    pub not_before: String,
    /// Not-after timestamp (`YYMMDDHHMMSSZ`).
    pub not_after: String,
    /// Subject domain.
    pub domain: String,
    /// Classification level.
    pub level: String,
}

// ============================================================================
// SECTION: Certificate Record
// ============================================================================

/// Immutable eight-field CEPP certificate record.
///
/// # Invariants
/// - Values built through [`CertificateRecord::new`] contain no `;`, `=`, or
///   control characters. Deserialization goes through the same checks.
/// - Values produced by [`CertificateRecord::parse`] are stored verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RecordFields", into = "RecordFields")]
pub struct CertificateRecord {
    /// Field values in canonical order.
    values: [String; 8],
}

impl CertificateRecord {
    /// Builds a record from field values.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::ReservedCharacter`] when a value contains `;` or
    /// `=` and therefore could not survive a serialize/parse round trip, and
    /// [`RecordError::ControlCharacter`] when a value contains a control
    /// character such as CR or LF.
    pub fn new(fields: RecordFields) -> Result<Self, RecordError> {
        let values = [
            fields.version,
            fields.serial,
            fields.algorithm,
            fields.issuer,
            fields.not_before,
            fields.not_after,
            fields.domain,
            fields.level,
        ];
        for (key, value) in FieldKey::ORDER.iter().zip(values.iter()) {
            if let Some(character) = value.chars().find(|ch| matches!(ch, ';' | '=')) {
                return Err(RecordError::ReservedCharacter {
                    field: *key,
                    character,
                });
            }
            if let Some(character) = value.chars().find(|ch| ch.is_control()) {
                return Err(RecordError::ControlCharacter {
                    field: *key,
                    character,
                });
            }
        }
        Ok(Self {
            values,
        })
    }

    /// Parses a `CEPP-Data` header value.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] for any input that is not a well-formed record.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let segments: Vec<&str> = input.split(';').collect();
        if segments.len() != FieldKey::ORDER.len() {
            return Err(ParseError::SegmentCount {
                found: segments.len(),
            });
        }
        let mut values: [String; 8] = Default::default();
        for (position, (expected, segment)) in
            FieldKey::ORDER.iter().zip(segments.iter()).enumerate()
        {
            let Some((key, value)) = segment.split_once('=') else {
                return Err(ParseError::MissingSeparator {
                    position,
                });
            };
            if value.contains('=') {
                return Err(ParseError::ExtraSeparator {
                    position,
                });
            }
            if key.trim() != expected.as_str() {
                return Err(ParseError::UnexpectedKey {
                    position,
                    expected: *expected,
                });
            }
            values[position] = value.to_string();
        }
        Ok(Self {
            values,
        })
    }

    /// Returns the canonical wire form of the record.
    #[must_use]
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for (index, (key, value)) in FieldKey::ORDER.iter().zip(self.values.iter()).enumerate() {
            if index > 0 {
                out.push_str(SEGMENT_SEPARATOR);
            }
            out.push_str(key.as_str());
            out.push('=');
            out.push_str(value);
        }
        out
    }

    /// Returns the value stored for a field.
    #[must_use]
    pub fn get(&self, key: FieldKey) -> &str {
        &self.values[key as usize]
    }

    /// Protocol version (`v`).
    #[must_use]
    pub fn version(&self) -> &str {
        self.get(FieldKey::Version)
    }

    /// Serial number (`s`).
    #[must_use]
    pub fn serial(&self) -> &str {
        self.get(FieldKey::Serial)
    }

    /// Algorithm identifier (`a`).
    #[must_use]
    pub fn algorithm(&self) -> &str {
        self.get(FieldKey::Algorithm)
    }

    /// Issuer identifier (`i`).
    #[must_use]
    pub fn issuer(&self) -> &str {
        self.get(FieldKey::Issuer)
    }

    /// Not-before timestamp (`nb`).
    #[must_use]
    pub fn not_before(&self) -> &str {
        self.get(FieldKey::NotBefore)
    }

    /// Not-after timestamp (`na`).
    #[must_use]
    pub fn not_after(&self) -> &str {
        self.get(FieldKey::NotAfter)
    }

    /// Subject domain (`d`).
    #[must_use]
    pub fn domain(&self) -> &str {
        self.get(FieldKey::Domain)
    }

    /// Classification level (`l`).
    #[must_use]
    pub fn level(&self) -> &str {
        self.get(FieldKey::Level)
    }

    /// Returns `(key, value)` pairs in canonical order.
    pub fn fields(&self) -> impl Iterator<Item = (FieldKey, &str)> {
        FieldKey::ORDER.iter().copied().zip(self.values.iter().map(String::as_str))
    }
}

impl TryFrom<RecordFields> for CertificateRecord {
    type Error = RecordError;

    fn try_from(fields: RecordFields) -> Result<Self, Self::Error> {
        Self::new(fields)
    }
}

impl From<CertificateRecord> for RecordFields {
    fn from(record: CertificateRecord) -> Self {
        let [version, serial, algorithm, issuer, not_before, not_after, domain, level] =
            record.values;
        Self {
            version,
            serial,
            algorithm,
            issuer,
            not_before,
            not_after,
            domain,
            level,
        }
    }
}

impl fmt::Display for CertificateRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

// ============================================================================
// SECTION: Free Functions
// ============================================================================

/// Serializes a record to its canonical `CEPP-Data` form.
#[must_use]
pub fn serialize(record: &CertificateRecord) -> String {
    record.serialize()
}

/// Parses a `CEPP-Data` header value.
///
/// # Errors
///
/// Returns [`ParseError`] for any malformed input.
pub fn parse(input: &str) -> Result<CertificateRecord, ParseError> {
    CertificateRecord::parse(input)
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only assertions use unwrap for clarity.")]

    use super::*;

    #[test]
    fn field_key_index_matches_canonical_order() {
        for (index, key) in FieldKey::ORDER.iter().enumerate() {
            assert_eq!(*key as usize, index);
        }
    }

    #[test]
    fn parse_keeps_value_whitespace() {
        let record = CertificateRecord::parse("v=1 ;s=1;a=x;i=y;nb=n;na=n;d=d;l= 2").unwrap();
        assert_eq!(record.version(), "1 ");
        assert_eq!(record.level(), " 2");
    }
}

// crates/cepp-core/src/core/identifiers.rs
// ============================================================================
// Module: CEPP Identifiers
// Description: Opaque identifiers for certificate authorities and algorithms.
// Purpose: Provide strongly typed, serializable IDs with stable string forms.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Identifiers are opaque strings that serialize transparently. They key the
//! trust store, the CA keystore, and the signature scheme registry. Validation
//! happens where identifiers enter the system (config loading, record parsing).

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::borrow::Borrow;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Identifier Types
// ============================================================================

/// Certificate authority identifier (the record's `i` field).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssuerId(String);

impl IssuerId {
    /// Creates a new issuer identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IssuerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Borrow<str> for IssuerId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for IssuerId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for IssuerId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Signature algorithm identifier (the record's `a` field).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlgorithmId(String);

impl AlgorithmId {
    /// Creates a new algorithm identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AlgorithmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Borrow<str> for AlgorithmId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AlgorithmId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for AlgorithmId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

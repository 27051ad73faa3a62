// crates/cepp-core/src/core/keys.rs
// ============================================================================
// Module: CEPP Key Material
// Description: Trust store and CA keystore value types.
// Purpose: Carry issuer key parameters into the sign and verify paths.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Trust stores map issuer ids to public key parameters; CA keystores map
//! issuer ids to private key parameters. Both are immutable once built and are
//! passed explicitly into every service call, so concurrent readers need no
//! locking.
//!
//! Security posture: private key hex never appears in `Debug` output.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::AlgorithmId;
use crate::core::identifiers::IssuerId;

// ============================================================================
// SECTION: Key Parameters
// ============================================================================

/// Public key parameters used for verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKeyParams {
    /// Named curve, when the algorithm needs one.
    pub curve: Option<String>,
    /// Hex-encoded public key.
    pub public_key_hex: String,
}

/// Private key parameters used for signing.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateKeyParams {
    /// Named curve, when the algorithm needs one.
    pub curve: Option<String>,
    /// Hex-encoded private key.
    pub private_key_hex: String,
}

impl fmt::Debug for PrivateKeyParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKeyParams")
            .field("curve", &self.curve)
            .field("private_key_hex", &"<redacted>")
            .finish()
    }
}

// ============================================================================
// SECTION: Store Entries
// ============================================================================

/// Trust store entry for a certificate authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustedIssuer {
    /// Abuse contact for spam reports about messages this CA vouched for.
    pub spam_contact: Option<String>,
    /// Signature algorithm the CA signs with.
    pub algorithm: AlgorithmId,
    /// Public key parameters.
    pub key: PublicKeyParams,
}

/// CA keystore entry holding signing material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaSigningKey {
    /// Signature algorithm the CA signs with.
    pub algorithm: AlgorithmId,
    /// Private key parameters.
    pub key: PrivateKeyParams,
}

// ============================================================================
// SECTION: Stores
// ============================================================================

/// Read-only mapping from issuer id to trusted public key material.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrustStore {
    /// Entries keyed by issuer id.
    issuers: BTreeMap<IssuerId, TrustedIssuer>,
}

impl TrustStore {
    /// Creates a trust store from issuer entries.
    #[must_use]
    pub const fn new(issuers: BTreeMap<IssuerId, TrustedIssuer>) -> Self {
        Self {
            issuers,
        }
    }

    /// Looks up an issuer by id.
    #[must_use]
    pub fn get(&self, issuer: &str) -> Option<&TrustedIssuer> {
        self.issuers.get(issuer)
    }

    /// Returns the number of trusted issuers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.issuers.len()
    }

    /// Returns true when no issuers are trusted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issuers.is_empty()
    }

    /// Iterates over trusted issuers in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&IssuerId, &TrustedIssuer)> {
        self.issuers.iter()
    }
}

impl FromIterator<(IssuerId, TrustedIssuer)> for TrustStore {
    fn from_iter<T: IntoIterator<Item = (IssuerId, TrustedIssuer)>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Read-only mapping from issuer id to CA signing material.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaKeystore {
    /// Entries keyed by issuer id.
    keys: BTreeMap<IssuerId, CaSigningKey>,
}

impl CaKeystore {
    /// Creates a keystore from signing entries.
    #[must_use]
    pub const fn new(keys: BTreeMap<IssuerId, CaSigningKey>) -> Self {
        Self {
            keys,
        }
    }

    /// Looks up signing material by issuer id.
    #[must_use]
    pub fn get(&self, issuer: &str) -> Option<&CaSigningKey> {
        self.keys.get(issuer)
    }

    /// Returns the number of signing entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true when the keystore is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Iterates over signing entries in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&IssuerId, &CaSigningKey)> {
        self.keys.iter()
    }
}

impl FromIterator<(IssuerId, CaSigningKey)> for CaKeystore {
    fn from_iter<T: IntoIterator<Item = (IssuerId, CaSigningKey)>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

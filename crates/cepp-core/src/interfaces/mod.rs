// crates/cepp-core/src/interfaces/mod.rs
// ============================================================================
// Module: CEPP Interfaces
// Description: Extension traits for signature schemes.
// Purpose: Let hosts add algorithms without modifying dispatch logic.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! A [`SignatureScheme`] signs and verifies raw bytes against CA key
//! parameters. Schemes are registered by algorithm id in the
//! [`crate::runtime::SignatureRegistry`].
//!
//! Security posture: `verify` is total. Every fault raised by the underlying
//! primitive (bad hex, bad point, bad DER, wrong curve) becomes `false`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::PrivateKeyParams;
use crate::core::PublicKeyParams;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while producing a signature or decoding key material.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    /// No scheme is registered for the algorithm id.
    #[error("unsupported signature algorithm: {0}")]
    UnsupportedAlgorithm(String),
    /// The key parameters name a curve the scheme does not support.
    #[error("unsupported curve: {0}")]
    UnsupportedCurve(String),
    /// The scheme requires a curve and none was given.
    #[error("key parameters are missing a curve")]
    MissingCurve,
    /// Key material could not be decoded.
    #[error("invalid key material: {0}")]
    InvalidKey(String),
}

// ============================================================================
// SECTION: Signature Scheme
// ============================================================================

/// Signing and verification strategy for one algorithm id.
pub trait SignatureScheme: Send + Sync {
    /// Algorithm id carried in the record's `a` field.
    fn algorithm_id(&self) -> &str;

    /// Signs `message` and returns the encoded signature.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError`] when the key parameters are unusable.
    fn sign(&self, key: &PrivateKeyParams, message: &[u8]) -> Result<String, SignatureError>;

    /// Returns true only when `signature` is valid for `message` under `key`.
    fn verify(&self, key: &PublicKeyParams, message: &[u8], signature: &str) -> bool;

    /// Checks that public key parameters decode under this scheme.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError`] when the key cannot be used for verification.
    fn check_public_key(&self, key: &PublicKeyParams) -> Result<(), SignatureError>;

    /// Checks that private key parameters decode under this scheme.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError`] when the key cannot be used for signing.
    fn check_private_key(&self, key: &PrivateKeyParams) -> Result<(), SignatureError>;
}

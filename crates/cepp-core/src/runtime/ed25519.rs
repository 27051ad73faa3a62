// crates/cepp-core/src/runtime/ed25519.rs
// ============================================================================
// Module: Ed25519 Signature Scheme
// Description: Ed25519 signatures over the raw canonical record bytes.
// Purpose: Implement the `ed25519` algorithm id of the CEPP registry.
// Dependencies: ed25519-dalek, hex
// ============================================================================

//! ## Overview
//! Keys are 32-byte hex strings; signatures are 64-byte hex strings.
//! Verification uses `verify_strict`, which rejects small-order keys and
//! non-canonical encodings. No curve parameter is required.

// ============================================================================
// SECTION: Imports
// ============================================================================

use ed25519_dalek::Signature;
use ed25519_dalek::Signer;
use ed25519_dalek::SigningKey;
use ed25519_dalek::VerifyingKey;

use crate::core::PrivateKeyParams;
use crate::core::PublicKeyParams;
use crate::interfaces::SignatureError;
use crate::interfaces::SignatureScheme;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Registry id for the Ed25519 scheme.
pub const ED25519_ALGORITHM_ID: &str = "ed25519";

// ============================================================================
// SECTION: Scheme
// ============================================================================

/// Ed25519 signature scheme.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Scheme;

impl SignatureScheme for Ed25519Scheme {
    fn algorithm_id(&self) -> &str {
        ED25519_ALGORITHM_ID
    }

    fn sign(&self, key: &PrivateKeyParams, message: &[u8]) -> Result<String, SignatureError> {
        let signing_key = signing_key(key)?;
        Ok(hex::encode(signing_key.sign(message).to_bytes()))
    }

    fn verify(&self, key: &PublicKeyParams, message: &[u8], signature: &str) -> bool {
        let Ok(verifying_key) = verifying_key(key) else {
            return false;
        };
        let Ok(bytes) = hex::decode(signature) else {
            return false;
        };
        let Ok(signature) = Signature::from_slice(&bytes) else {
            return false;
        };
        verifying_key.verify_strict(message, &signature).is_ok()
    }

    fn check_public_key(&self, key: &PublicKeyParams) -> Result<(), SignatureError> {
        verifying_key(key).map(|_| ())
    }

    fn check_private_key(&self, key: &PrivateKeyParams) -> Result<(), SignatureError> {
        signing_key(key).map(|_| ())
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Decodes a 32-byte hex key.
fn decode_key_bytes(value: &str) -> Result<[u8; 32], SignatureError> {
    let bytes = hex::decode(value).map_err(|err| SignatureError::InvalidKey(err.to_string()))?;
    <[u8; 32]>::try_from(bytes.as_slice())
        .map_err(|_| SignatureError::InvalidKey("ed25519 keys must be 32 bytes".to_string()))
}

/// Decodes an Ed25519 signing key.
fn signing_key(key: &PrivateKeyParams) -> Result<SigningKey, SignatureError> {
    decode_key_bytes(&key.private_key_hex).map(|bytes| SigningKey::from_bytes(&bytes))
}

/// Decodes an Ed25519 verifying key.
fn verifying_key(key: &PublicKeyParams) -> Result<VerifyingKey, SignatureError> {
    let bytes = decode_key_bytes(&key.public_key_hex)?;
    VerifyingKey::from_bytes(&bytes)
        .map_err(|_| SignatureError::InvalidKey("invalid ed25519 public key".to_string()))
}

// crates/cepp-core/src/runtime/ecdsa.rs
// ============================================================================
// Module: ECDSA Signature Scheme
// Description: ECDSA over secp256k1 and P-256 with SHA-256 digests.
// Purpose: Implement the `ecdsa` algorithm id of the CEPP registry.
// Dependencies: hex, k256, p256, sha2
// ============================================================================

//! ## Overview
//! Signatures are DER-encoded and hex-encoded. The digest is always SHA-256
//! over the raw canonical record bytes. Public keys are SEC1 points and private
//! keys are 32-byte scalars, both hex-encoded.
//!
//! Verification normalizes high-S signatures before checking them, so
//! signatures produced by stacks that do not enforce low-S still verify.

// ============================================================================
// SECTION: Imports
// ============================================================================

use sha2::Digest;
use sha2::Sha256;

use crate::core::PrivateKeyParams;
use crate::core::PublicKeyParams;
use crate::interfaces::SignatureError;
use crate::interfaces::SignatureScheme;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Registry id for the ECDSA scheme.
pub const ECDSA_ALGORITHM_ID: &str = "ecdsa";

// ============================================================================
// SECTION: Curves
// ============================================================================

/// Curves supported by the ECDSA scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcdsaCurve {
    /// secp256k1.
    Secp256k1,
    /// NIST P-256.
    P256,
}

impl EcdsaCurve {
    /// Resolves a curve name. Names match case-insensitively.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "secp256k1" => Some(Self::Secp256k1),
            "p256" | "p-256" | "prime256v1" | "secp256r1" => Some(Self::P256),
            _ => None,
        }
    }

    /// Returns the canonical curve name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Secp256k1 => "secp256k1",
            Self::P256 => "prime256v1",
        }
    }

    /// Resolves the curve named by key parameters.
    fn from_params(curve: Option<&str>) -> Result<Self, SignatureError> {
        let name = curve.ok_or(SignatureError::MissingCurve)?;
        Self::from_name(name).ok_or_else(|| SignatureError::UnsupportedCurve(name.to_string()))
    }
}

// ============================================================================
// SECTION: Scheme
// ============================================================================

/// ECDSA signature scheme with SHA-256 digests.
#[derive(Debug, Clone, Copy, Default)]
pub struct EcdsaScheme;

impl SignatureScheme for EcdsaScheme {
    fn algorithm_id(&self) -> &str {
        ECDSA_ALGORITHM_ID
    }

    /// Signatures are always emitted in low-S form.
    fn sign(&self, key: &PrivateKeyParams, message: &[u8]) -> Result<String, SignatureError> {
        let curve = EcdsaCurve::from_params(key.curve.as_deref())?;
        let secret = decode_hex(&key.private_key_hex)?;
        let digest = Sha256::new_with_prefix(message);
        match curve {
            EcdsaCurve::Secp256k1 => {
                use k256::ecdsa::signature::DigestSigner;
                let signing_key = k256::ecdsa::SigningKey::from_slice(&secret)
                    .map_err(|err| SignatureError::InvalidKey(err.to_string()))?;
                let signature: k256::ecdsa::Signature = signing_key.sign_digest(digest);
                let signature = signature.normalize_s().unwrap_or(signature);
                Ok(hex::encode(signature.to_der().as_bytes()))
            }
            EcdsaCurve::P256 => {
                use p256::ecdsa::signature::DigestSigner;
                let signing_key = p256::ecdsa::SigningKey::from_slice(&secret)
                    .map_err(|err| SignatureError::InvalidKey(err.to_string()))?;
                let signature: p256::ecdsa::Signature = signing_key.sign_digest(digest);
                let signature = signature.normalize_s().unwrap_or(signature);
                Ok(hex::encode(signature.to_der().as_bytes()))
            }
        }
    }

    fn verify(&self, key: &PublicKeyParams, message: &[u8], signature: &str) -> bool {
        let Ok(curve) = EcdsaCurve::from_params(key.curve.as_deref()) else {
            return false;
        };
        let (Ok(point), Ok(der)) = (hex::decode(&key.public_key_hex), hex::decode(signature))
        else {
            return false;
        };
        let digest = Sha256::new_with_prefix(message);
        match curve {
            EcdsaCurve::Secp256k1 => {
                use k256::ecdsa::signature::DigestVerifier;
                let Ok(verifying_key) = k256::ecdsa::VerifyingKey::from_sec1_bytes(&point) else {
                    return false;
                };
                let Ok(parsed) = k256::ecdsa::Signature::from_der(&der) else {
                    return false;
                };
                let parsed = parsed.normalize_s().unwrap_or(parsed);
                verifying_key.verify_digest(digest, &parsed).is_ok()
            }
            EcdsaCurve::P256 => {
                use p256::ecdsa::signature::DigestVerifier;
                let Ok(verifying_key) = p256::ecdsa::VerifyingKey::from_sec1_bytes(&point) else {
                    return false;
                };
                let Ok(parsed) = p256::ecdsa::Signature::from_der(&der) else {
                    return false;
                };
                let parsed = parsed.normalize_s().unwrap_or(parsed);
                verifying_key.verify_digest(digest, &parsed).is_ok()
            }
        }
    }

    fn check_public_key(&self, key: &PublicKeyParams) -> Result<(), SignatureError> {
        let curve = EcdsaCurve::from_params(key.curve.as_deref())?;
        let point = decode_hex(&key.public_key_hex)?;
        let valid = match curve {
            EcdsaCurve::Secp256k1 => k256::ecdsa::VerifyingKey::from_sec1_bytes(&point).is_ok(),
            EcdsaCurve::P256 => p256::ecdsa::VerifyingKey::from_sec1_bytes(&point).is_ok(),
        };
        if valid {
            Ok(())
        } else {
            Err(SignatureError::InvalidKey(format!("not a {} public key", curve.as_str())))
        }
    }

    fn check_private_key(&self, key: &PrivateKeyParams) -> Result<(), SignatureError> {
        let curve = EcdsaCurve::from_params(key.curve.as_deref())?;
        let secret = decode_hex(&key.private_key_hex)?;
        let valid = match curve {
            EcdsaCurve::Secp256k1 => k256::ecdsa::SigningKey::from_slice(&secret).is_ok(),
            EcdsaCurve::P256 => p256::ecdsa::SigningKey::from_slice(&secret).is_ok(),
        };
        if valid {
            Ok(())
        } else {
            Err(SignatureError::InvalidKey(format!("not a {} private key", curve.as_str())))
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Decodes hex key material.
fn decode_hex(value: &str) -> Result<Vec<u8>, SignatureError> {
    hex::decode(value).map_err(|err| SignatureError::InvalidKey(err.to_string()))
}

// ============================================================================
// SECTION: Tests
// ============================================================================

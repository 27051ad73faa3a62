// crates/cepp-core/tests/common/mod.rs
// ============================================================================
// Module: Common Test Utilities
// Description: Shared key fixtures and builders for cepp-core tests.
// Purpose: Provide deterministic CA keys, stores, and certificate requests.
// Dependencies: cepp-core, hex, k256, ed25519-dalek
// ============================================================================

//! ## Overview
//! Fixed private keys keep signatures reproducible across runs. Public keys
//! are derived from them so trust stores always match their keystores.

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
    dead_code,
    reason = "Shared test helpers are not used by every test binary."
)]

use cepp_core::AlgorithmId;
use cepp_core::CaKeystore;
use cepp_core::CaSigningKey;
use cepp_core::CeppTimestamp;
use cepp_core::CertificateRequest;
use cepp_core::IssuerId;
use cepp_core::PrivateKeyParams;
use cepp_core::PublicKeyParams;
use cepp_core::TrustStore;
use cepp_core::TrustedIssuer;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Issuer used by the end-to-end scenarios.
pub const RU_CA: &str = "RU Certificate Authority";
/// Second issuer with an unrelated key.
pub const OTHER_CA: &str = "Other Certificate Authority";
/// Ed25519 issuer.
pub const EDWARDS_CA: &str = "Edwards Certificate Authority";
/// secp256k1 private key for [`RU_CA`].
pub const RU_CA_PRIVATE: &str = "c9afa9d845ba75166b5c215767b1d6934e50c3db36e89b127b8a622b120f6721";
/// secp256k1 private key for [`OTHER_CA`].
pub const OTHER_CA_PRIVATE: &str =
    "0f1e2d3c4b5a69788796a5b4c3d2e1f00f1e2d3c4b5a69788796a5b4c3d2e1f0";
/// Ed25519 private key for [`EDWARDS_CA`].
pub const EDWARDS_CA_PRIVATE: &str =
    "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60";
/// Spam contact configured for [`RU_CA`].
pub const RU_CA_SPAM: &str = "spam@ca.ru.nl";

/// Not-before bound used by the default request.
pub const NOT_BEFORE: &str = "250101000000Z";
/// Not-after bound used by the default request.
pub const NOT_AFTER: &str = "250108000000Z";
/// A moment inside the default window.
pub const INSIDE: &str = "250102120000Z";

// ============================================================================
// SECTION: Key Helpers
// ============================================================================

/// Derives the uncompressed SEC1 public key for a secp256k1 private key.
pub fn secp256k1_public_hex(private_hex: &str) -> String {
    let secret = hex::decode(private_hex).unwrap();
    let signing_key = k256::ecdsa::SigningKey::from_slice(&secret).unwrap();
    let point = signing_key.verifying_key().to_encoded_point(false);
    hex::encode(point.as_bytes())
}

/// Derives the Ed25519 public key for a private key.
pub fn ed25519_public_hex(private_hex: &str) -> String {
    let secret: [u8; 32] = hex::decode(private_hex).unwrap().try_into().unwrap();
    let signing_key = ed25519_dalek::SigningKey::from_bytes(&secret);
    hex::encode(signing_key.verifying_key().to_bytes())
}

/// secp256k1 public parameters for a private key.
pub fn secp256k1_public(private_hex: &str) -> PublicKeyParams {
    PublicKeyParams {
        curve: Some("secp256k1".to_string()),
        public_key_hex: secp256k1_public_hex(private_hex),
    }
}

/// secp256k1 private parameters.
pub fn secp256k1_private(private_hex: &str) -> PrivateKeyParams {
    PrivateKeyParams {
        curve: Some("secp256k1".to_string()),
        private_key_hex: private_hex.to_string(),
    }
}

// ============================================================================
// SECTION: Store Builders
// ============================================================================

/// Trust store holding every fixture issuer.
pub fn trust_store() -> TrustStore {
    [
        (
            IssuerId::new(RU_CA),
            TrustedIssuer {
                spam_contact: Some(RU_CA_SPAM.to_string()),
                algorithm: AlgorithmId::new("ecdsa"),
                key: secp256k1_public(RU_CA_PRIVATE),
            },
        ),
        (
            IssuerId::new(OTHER_CA),
            TrustedIssuer {
                spam_contact: None,
                algorithm: AlgorithmId::new("ecdsa"),
                key: secp256k1_public(OTHER_CA_PRIVATE),
            },
        ),
        (
            IssuerId::new(EDWARDS_CA),
            TrustedIssuer {
                spam_contact: None,
                algorithm: AlgorithmId::new("ed25519"),
                key: PublicKeyParams {
                    curve: None,
                    public_key_hex: ed25519_public_hex(EDWARDS_CA_PRIVATE),
                },
            },
        ),
    ]
    .into_iter()
    .collect()
}

/// CA keystore holding every fixture issuer.
pub fn keystore() -> CaKeystore {
    [
        (
            IssuerId::new(RU_CA),
            CaSigningKey {
                algorithm: AlgorithmId::new("ecdsa"),
                key: secp256k1_private(RU_CA_PRIVATE),
            },
        ),
        (
            IssuerId::new(OTHER_CA),
            CaSigningKey {
                algorithm: AlgorithmId::new("ecdsa"),
                key: secp256k1_private(OTHER_CA_PRIVATE),
            },
        ),
        (
            IssuerId::new(EDWARDS_CA),
            CaSigningKey {
                algorithm: AlgorithmId::new("ed25519"),
                key: PrivateKeyParams {
                    curve: None,
                    private_key_hex: EDWARDS_CA_PRIVATE.to_string(),
                },
            },
        ),
    ]
    .into_iter()
    .collect()
}

/// Parses a fixture timestamp.
pub fn ts(value: &str) -> CeppTimestamp {
    CeppTimestamp::parse(value).unwrap()
}

/// Default certificate request for `example.com`.
pub fn request() -> CertificateRequest {
    CertificateRequest {
        serial: "123".to_string(),
        not_before: ts(NOT_BEFORE),
        not_after: ts(NOT_AFTER),
        domain: "example.com".to_string(),
        level: "2".to_string(),
    }
}

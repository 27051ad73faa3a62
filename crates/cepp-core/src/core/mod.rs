// crates/cepp-core/src/core/mod.rs
// ============================================================================
// Module: CEPP Core Types
// Description: Certificate record, timestamps, identifiers, and key material.
// Purpose: Provide stable value types shared by the sign and verify paths.
// Dependencies: serde, time
// ============================================================================

//! ## Overview
//! Core types are plain immutable values. They hold no references to global
//! state and are safe to share across threads.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod headers;
pub mod identifiers;
pub mod keys;
pub mod record;
pub mod time;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use self::headers::CeppHeaders;
pub use self::headers::DATA_HEADER;
pub use self::headers::FROM_HEADER;
pub use self::headers::SIGNATURE_HEADER;
pub use self::identifiers::AlgorithmId;
pub use self::identifiers::IssuerId;
pub use self::keys::CaKeystore;
pub use self::keys::CaSigningKey;
pub use self::keys::PrivateKeyParams;
pub use self::keys::PublicKeyParams;
pub use self::keys::TrustStore;
pub use self::keys::TrustedIssuer;
pub use self::record::CertificateRecord;
pub use self::record::FieldKey;
pub use self::record::ParseError;
pub use self::record::RecordError;
pub use self::record::RecordFields;
pub use self::record::SUPPORTED_VERSION;
pub use self::time::CeppTimestamp;
pub use self::time::TimestampError;

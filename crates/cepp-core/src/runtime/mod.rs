// crates/cepp-core/src/runtime/mod.rs
// ============================================================================
// Module: CEPP Runtime
// Description: Signature engine, validity validator, and certification service.
// Purpose: Execute the sign and verify paths over core types.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Runtime components are synchronous and side-effect free apart from audit
//! emission. They hold no mutable state and are safe to share across threads.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod ecdsa;
pub mod ed25519;
pub mod registry;
pub mod service;
pub mod validity;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use ecdsa::ECDSA_ALGORITHM_ID;
pub use ecdsa::EcdsaCurve;
pub use ecdsa::EcdsaScheme;
pub use ed25519::ED25519_ALGORITHM_ID;
pub use ed25519::Ed25519Scheme;
pub use registry::SignatureRegistry;
pub use service::CertificateRequest;
pub use service::CertificationService;
pub use service::CertifyError;
pub use service::DisplayClass;
pub use service::SignedCertificate;
pub use service::VerificationResult;
pub use service::VerifiedCertificate;
pub use validity::ValidityFailure;

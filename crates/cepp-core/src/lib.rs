// crates/cepp-core/src/lib.rs
// ============================================================================
// Module: CEPP Core Library
// Description: Public API surface for the CEPP certificate protocol engine.
// Purpose: Expose the record codec, signature engine, and certification service.
// Dependencies: crate::{audit, core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! CEPP attaches a CA-signed certificate record to outgoing mail in two
//! headers, `CEPP-Data` and `CEPP-Signature`. Receivers verify the record
//! against trusted CA public keys to decide whether the sender's domain is
//! authentic.
//!
//! This crate is the protocol engine: canonical record serialization and
//! strict parsing, an algorithm-keyed signature registry, validity checks,
//! and the [`CertificationService`] that ties them together. It performs no
//! I/O apart from optional audit sinks and never reads the wall clock.
//!
//! Security posture: header inputs are attacker-controlled. Every verification
//! failure resolves to a [`VerificationResult`]; nothing panics.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use audit::CeppAuditSink;
pub use audit::FileAuditSink;
pub use audit::NoopAuditSink;
pub use audit::SigningAuditEvent;
pub use audit::StderrAuditSink;
pub use audit::VerificationAuditEvent;
pub use interfaces::SignatureError;
pub use interfaces::SignatureScheme;
pub use runtime::CertificateRequest;
pub use runtime::CertificationService;
pub use runtime::CertifyError;
pub use runtime::DisplayClass;
pub use runtime::EcdsaCurve;
pub use runtime::SignatureRegistry;
pub use runtime::SignedCertificate;
pub use runtime::ValidityFailure;
pub use runtime::VerificationResult;
pub use runtime::VerifiedCertificate;

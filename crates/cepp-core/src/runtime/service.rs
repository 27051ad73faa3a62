// crates/cepp-core/src/runtime/service.rs
// ============================================================================
// Module: CEPP Certification Service
// Description: Produce-certificate and verify-incoming orchestration.
// Purpose: Combine codec, validator, and signature engine into two entry points.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! [`CertificationService`] signs new certificates with CA keystore material
//! and verifies incoming `CEPP-Data`/`CEPP-Signature` pairs against a trust
//! store. Verification is fail-fast, cheapest and least-trusting first:
//!
//! 1. header presence (exactly one of each)
//! 2. strict parse of the data header
//! 3. issuer lookup in the trust store
//! 4. version, serial, window, and domain checks
//! 5. signature verification over the untouched data header bytes
//!
//! The service keeps no state between calls. Every failure resolves into a
//! [`VerificationResult`] variant; nothing escapes as a panic or error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::audit::CeppAuditSink;
use crate::audit::NoopAuditSink;
use crate::audit::SigningAuditEvent;
use crate::audit::SigningAuditEventParams;
use crate::audit::VerificationAuditEvent;
use crate::audit::VerificationAuditEventParams;
use crate::core::CaKeystore;
use crate::core::CeppHeaders;
use crate::core::CeppTimestamp;
use crate::core::CertificateRecord;
use crate::core::IssuerId;
use crate::core::RecordError;
use crate::core::RecordFields;
use crate::core::SUPPORTED_VERSION;
use crate::core::TrustStore;
use crate::interfaces::SignatureError;
use crate::runtime::registry::SignatureRegistry;
use crate::runtime::validity;
use crate::runtime::validity::ValidityFailure;

// ============================================================================
// SECTION: Verification Result
// ============================================================================

/// Closed set of verification outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationResult {
    /// Certificate is authentic and current for the sender.
    Valid,
    /// A CEPP header is absent or repeated.
    NoHeader,
    /// The data header failed to parse or has a bad version or serial.
    Malformed,
    /// The issuer is not trusted or its algorithm is not usable.
    UntrustedIssuer,
    /// The current time lies outside the validity window.
    NotYetValidOrExpired,
    /// The sender domain differs from the certificate domain.
    DomainMismatch,
    /// The signature does not verify over the data header.
    BadSignature,
}

impl VerificationResult {
    /// Returns true only for [`VerificationResult::Valid`].
    #[must_use]
    pub const fn is_valid(self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Returns a stable label for the result.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::NoHeader => "no_header",
            Self::Malformed => "malformed",
            Self::UntrustedIssuer => "untrusted_issuer",
            Self::NotYetValidOrExpired => "not_yet_valid_or_expired",
            Self::DomainMismatch => "domain_mismatch",
            Self::BadSignature => "bad_signature",
        }
    }

    /// Returns the coarse class shown to mail readers.
    #[must_use]
    pub const fn display_class(self) -> DisplayClass {
        match self {
            Self::Valid => DisplayClass::Trusted,
            Self::NoHeader => DisplayClass::NoHeader,
            Self::Malformed
            | Self::UntrustedIssuer
            | Self::NotYetValidOrExpired
            | Self::DomainMismatch
            | Self::BadSignature => DisplayClass::Untrusted,
        }
    }
}

impl fmt::Display for VerificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ValidityFailure> for VerificationResult {
    fn from(failure: ValidityFailure) -> Self {
        match failure {
            ValidityFailure::Version | ValidityFailure::Serial => Self::Malformed,
            ValidityFailure::Window => Self::NotYetValidOrExpired,
            ValidityFailure::Domain => Self::DomainMismatch,
        }
    }
}

/// Coarse trust classification for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayClass {
    /// Message is CEPP protected.
    Trusted,
    /// Message carries no usable CEPP headers.
    NoHeader,
    /// Message carries CEPP headers that failed verification.
    Untrusted,
}

impl DisplayClass {
    /// Returns a stable label for the class.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trusted => "trusted",
            Self::NoHeader => "no_header",
            Self::Untrusted => "untrusted",
        }
    }
}

// ============================================================================
// SECTION: Requests and Outputs
// ============================================================================

/// Caller-supplied fields for a new certificate.
///
/// Version, algorithm, and issuer fields are filled in by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateRequest {
    /// Serial number (ASCII digits).
    pub serial: String,
    /// Start of the validity window.
    pub not_before: CeppTimestamp,
    /// End of the validity window.
    pub not_after: CeppTimestamp,
    /// Subject domain.
    pub domain: String,
    /// Classification level.
    pub level: String,
}

/// A signed certificate ready to attach to a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedCertificate {
    /// Signed record.
    pub record: CertificateRecord,
    /// `CEPP-Data` header value (canonical record string).
    pub data_header: String,
    /// `CEPP-Signature` header value.
    pub signature: String,
}

/// A certificate that passed every verification stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedCertificate {
    /// Parsed record from the data header.
    pub record: CertificateRecord,
    /// Abuse contact of the issuing CA, when configured.
    pub spam_contact: Option<String>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while signing a new certificate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CertifyError {
    /// The issuer has no entry in the CA keystore.
    #[error("unknown issuer: {0}")]
    UnknownIssuer(String),
    /// The issuer's algorithm is not registered.
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),
    /// The request fields are incomplete or malformed.
    #[error("invalid certificate request: {0}")]
    InvalidRequest(String),
    /// The request fields cannot form a well-formed record.
    #[error(transparent)]
    InvalidRecord(#[from] RecordError),
    /// The issuer's private key material is unusable.
    #[error("key material error: {0}")]
    KeyMaterial(String),
}

impl From<SignatureError> for CertifyError {
    fn from(error: SignatureError) -> Self {
        match error {
            SignatureError::UnsupportedAlgorithm(algorithm) => Self::UnsupportedAlgorithm(algorithm),
            other => Self::KeyMaterial(other.to_string()),
        }
    }
}

// ============================================================================
// SECTION: Service
// ============================================================================

/// Stateless certificate signing and verification service.
///
/// # Invariants
/// - The registry and audit sink are fixed at construction.
/// - Trust stores and keystores are borrowed per call and never mutated.
#[derive(Clone)]
pub struct CertificationService {
    /// Signature schemes keyed by algorithm id.
    registry: SignatureRegistry,
    /// Destination for audit events.
    audit: Arc<dyn CeppAuditSink>,
}

impl Default for CertificationService {
    fn default() -> Self {
        Self::new(SignatureRegistry::with_defaults())
    }
}

impl fmt::Debug for CertificationService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CertificationService").field("registry", &self.registry).finish()
    }
}

impl CertificationService {
    /// Creates a service over a signature registry with audit events discarded.
    #[must_use]
    pub fn new(registry: SignatureRegistry) -> Self {
        Self {
            registry,
            audit: Arc::new(NoopAuditSink),
        }
    }

    /// Replaces the audit sink.
    #[must_use]
    pub fn with_audit_sink(mut self, audit: Arc<dyn CeppAuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Returns the signature registry.
    #[must_use]
    pub const fn registry(&self) -> &SignatureRegistry {
        &self.registry
    }

    /// Signs a new certificate for `issuer` with keystore material.
    ///
    /// # Errors
    ///
    /// Returns [`CertifyError::UnknownIssuer`] when the keystore lacks the
    /// issuer, [`CertifyError::UnsupportedAlgorithm`] when its algorithm is not
    /// registered, and request or key errors otherwise. No signature is
    /// produced on error.
    pub fn sign_new_certificate(
        &self,
        request: &CertificateRequest,
        issuer: &IssuerId,
        keystore: &CaKeystore,
    ) -> Result<SignedCertificate, CertifyError> {
        let signed = self.sign_inner(request, issuer, keystore);
        let event = SigningAuditEvent::new(SigningAuditEventParams {
            issuer_id: issuer.to_string(),
            algorithm: keystore.get(issuer.as_str()).map(|entry| entry.algorithm.to_string()),
            serial: request.serial.clone(),
            domain: request.domain.clone(),
            error: signed.as_ref().err().map(ToString::to_string),
        });
        self.audit.record_signing(&event);
        signed
    }

    /// Signing pipeline without audit emission.
    fn sign_inner(
        &self,
        request: &CertificateRequest,
        issuer: &IssuerId,
        keystore: &CaKeystore,
    ) -> Result<SignedCertificate, CertifyError> {
        let entry = keystore
            .get(issuer.as_str())
            .ok_or_else(|| CertifyError::UnknownIssuer(issuer.to_string()))?;
        if !self.registry.contains(entry.algorithm.as_str()) {
            return Err(CertifyError::UnsupportedAlgorithm(entry.algorithm.to_string()));
        }
        validate_request(request)?;
        let record = CertificateRecord::new(RecordFields {
            version: SUPPORTED_VERSION.to_string(),
            serial: request.serial.clone(),
            algorithm: entry.algorithm.to_string(),
            issuer: issuer.to_string(),
            not_before: request.not_before.to_string(),
            not_after: request.not_after.to_string(),
            domain: request.domain.clone(),
            level: request.level.clone(),
        })?;
        let data_header = record.serialize();
        let signature =
            self.registry.sign(entry.algorithm.as_str(), &entry.key, data_header.as_bytes())?;
        Ok(SignedCertificate {
            record,
            data_header,
            signature,
        })
    }

    /// Verifies the CEPP headers of an incoming message.
    #[must_use]
    pub fn verify_incoming(
        &self,
        headers: &CeppHeaders,
        sender: &str,
        trust_store: &TrustStore,
        now: &CeppTimestamp,
    ) -> VerificationResult {
        self.evaluate(headers, sender, trust_store, now).result
    }

    /// Verifies an incoming message and returns the certificate on success.
    ///
    /// # Errors
    ///
    /// Returns the negative [`VerificationResult`] when any stage fails.
    pub fn authenticate_incoming(
        &self,
        headers: &CeppHeaders,
        sender: &str,
        trust_store: &TrustStore,
        now: &CeppTimestamp,
    ) -> Result<VerifiedCertificate, VerificationResult> {
        let evaluation = self.evaluate(headers, sender, trust_store, now);
        match (evaluation.result, evaluation.record) {
            (VerificationResult::Valid, Some(record)) => {
                let spam_contact =
                    trust_store.get(record.issuer()).and_then(|issuer| issuer.spam_contact.clone());
                Ok(VerifiedCertificate {
                    record,
                    spam_contact,
                })
            }
            (VerificationResult::Valid, None) => Err(VerificationResult::Malformed),
            (result, _) => Err(result),
        }
    }

    /// Runs the verification pipeline and records the audit event.
    fn evaluate(
        &self,
        headers: &CeppHeaders,
        sender: &str,
        trust_store: &TrustStore,
        now: &CeppTimestamp,
    ) -> Evaluation {
        let evaluation = self.run_stages(headers, sender, trust_store, now);
        let record = evaluation.record.as_ref();
        let event = VerificationAuditEvent::new(VerificationAuditEventParams {
            result: evaluation.result,
            issuer_id: record.map(|record| record.issuer().to_string()),
            serial: record.map(|record| record.serial().to_string()),
            certificate_domain: record.map(|record| record.domain().to_string()),
            sender_domain: validity::sender_domain(sender).map(ToString::to_string),
            detail: evaluation.detail.clone(),
        });
        self.audit.record_verification(&event);
        evaluation
    }

    /// Verification stages in fail-fast order.
    fn run_stages(
        &self,
        headers: &CeppHeaders,
        sender: &str,
        trust_store: &TrustStore,
        now: &CeppTimestamp,
    ) -> Evaluation {
        let Some((data, signature)) = headers.single_pair() else {
            let detail = format!(
                "expected one data and one signature header, found {} and {}",
                headers.data_values().len(),
                headers.signature_values().len()
            );
            return Evaluation::reject(VerificationResult::NoHeader, None, detail);
        };

        let record = match CertificateRecord::parse(data) {
            Ok(record) => record,
            Err(err) => {
                return Evaluation::reject(VerificationResult::Malformed, None, err.to_string());
            }
        };

        let Some(issuer) = trust_store.get(record.issuer()) else {
            return Evaluation::reject(
                VerificationResult::UntrustedIssuer,
                Some(record),
                "issuer not in trust store".to_string(),
            );
        };
        if !self.registry.contains(issuer.algorithm.as_str()) {
            return Evaluation::reject(
                VerificationResult::UntrustedIssuer,
                Some(record),
                format!("issuer algorithm {} is not registered", issuer.algorithm),
            );
        }
        if record.algorithm() != issuer.algorithm.as_str() {
            return Evaluation::reject(
                VerificationResult::UntrustedIssuer,
                Some(record),
                "record algorithm differs from issuer algorithm".to_string(),
            );
        }

        if let Err(failure) = validity::check(&record, now, sender) {
            return Evaluation::reject(failure.into(), Some(record), failure.to_string());
        }

        if !self.registry.verify(issuer.algorithm.as_str(), &issuer.key, data.as_bytes(), signature)
        {
            return Evaluation::reject(
                VerificationResult::BadSignature,
                Some(record),
                "signature does not verify".to_string(),
            );
        }

        Evaluation {
            result: VerificationResult::Valid,
            record: Some(record),
            detail: None,
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Outcome of one verification pipeline run.
struct Evaluation {
    /// Verification outcome.
    result: VerificationResult,
    /// Parsed record when parsing succeeded.
    record: Option<CertificateRecord>,
    /// Diagnostic reason for negative outcomes.
    detail: Option<String>,
}

impl Evaluation {
    /// Builds a negative evaluation.
    const fn reject(
        result: VerificationResult,
        record: Option<CertificateRecord>,
        detail: String,
    ) -> Self {
        Self {
            result,
            record,
            detail: Some(detail),
        }
    }
}

/// Rejects requests that could never verify.
fn validate_request(request: &CertificateRequest) -> Result<(), CertifyError> {
    if !validity::check_serial(&request.serial) {
        return Err(CertifyError::InvalidRequest(
            "serial must be a non-negative integer".to_string(),
        ));
    }
    if request.domain.trim().is_empty() {
        return Err(CertifyError::InvalidRequest("domain must be non-empty".to_string()));
    }
    if request.not_after <= request.not_before {
        return Err(CertifyError::InvalidRequest(
            "not_after must be later than not_before".to_string(),
        ));
    }
    Ok(())
}

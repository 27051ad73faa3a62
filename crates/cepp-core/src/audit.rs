// crates/cepp-core/src/audit.rs
// ============================================================================
// Module: CEPP Audit Logging
// Description: Structured audit events for certificate signing and verification.
// Purpose: Emit redacted JSON-line audit logs without hard dependencies.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Every sign and verify call produces one audit event. Sinks decide where the
//! event goes; the default sink discards it. Events carry identifiers and
//! outcome labels only: no key material, no signatures, no full headers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::runtime::service::VerificationResult;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Verification audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct VerificationAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Verification outcome.
    pub result: VerificationResult,
    /// Issuer id when the data header parsed.
    pub issuer_id: Option<String>,
    /// Serial number when the data header parsed.
    pub serial: Option<String>,
    /// Certificate subject domain when the data header parsed.
    pub certificate_domain: Option<String>,
    /// Sender mail domain when it could be extracted.
    pub sender_domain: Option<String>,
    /// Diagnostic reason for negative outcomes.
    pub detail: Option<String>,
}

/// Signing audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct SigningAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Issuer id requested by the caller.
    pub issuer_id: String,
    /// Algorithm used, when the issuer resolved.
    pub algorithm: Option<String>,
    /// Serial number requested by the caller.
    pub serial: String,
    /// Subject domain requested by the caller.
    pub domain: String,
    /// Outcome label (`signed` or `rejected`).
    pub outcome: &'static str,
    /// Error message for rejected requests.
    pub error: Option<String>,
}

/// Inputs required to construct a verification audit event.
pub struct VerificationAuditEventParams {
    /// Verification outcome.
    pub result: VerificationResult,
    /// Issuer id when the data header parsed.
    pub issuer_id: Option<String>,
    /// Serial number when the data header parsed.
    pub serial: Option<String>,
    /// Certificate subject domain when the data header parsed.
    pub certificate_domain: Option<String>,
    /// Sender mail domain when it could be extracted.
    pub sender_domain: Option<String>,
    /// Diagnostic reason for negative outcomes.
    pub detail: Option<String>,
}

/// Inputs required to construct a signing audit event.
pub struct SigningAuditEventParams {
    /// Issuer id requested by the caller.
    pub issuer_id: String,
    /// Algorithm used, when the issuer resolved.
    pub algorithm: Option<String>,
    /// Serial number requested by the caller.
    pub serial: String,
    /// Subject domain requested by the caller.
    pub domain: String,
    /// Error message for rejected requests.
    pub error: Option<String>,
}

impl VerificationAuditEvent {
    /// Creates a new verification audit event with a consistent timestamp.
    #[must_use]
    pub fn new(params: VerificationAuditEventParams) -> Self {
        Self {
            event: "cepp_verification",
            timestamp_ms: now_millis(),
            result: params.result,
            issuer_id: params.issuer_id,
            serial: params.serial,
            certificate_domain: params.certificate_domain,
            sender_domain: params.sender_domain,
            detail: params.detail,
        }
    }
}

impl SigningAuditEvent {
    /// Creates a new signing audit event with a consistent timestamp.
    #[must_use]
    pub fn new(params: SigningAuditEventParams) -> Self {
        let outcome = if params.error.is_some() { "rejected" } else { "signed" };
        Self {
            event: "cepp_signing",
            timestamp_ms: now_millis(),
            issuer_id: params.issuer_id,
            algorithm: params.algorithm,
            serial: params.serial,
            domain: params.domain,
            outcome,
            error: params.error,
        }
    }
}

/// Returns the current time in milliseconds since the unix epoch.
fn now_millis() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for certificate events.
pub trait CeppAuditSink: Send + Sync {
    /// Record a verification event.
    fn record_verification(&self, event: &VerificationAuditEvent);

    /// Record a signing event.
    fn record_signing(&self, _event: &SigningAuditEvent) {}
}

/// Audit sink that discards every event.
pub struct NoopAuditSink;

impl CeppAuditSink for NoopAuditSink {
    fn record_verification(&self, _event: &VerificationAuditEvent) {}
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl CeppAuditSink for StderrAuditSink {
    fn record_verification(&self, event: &VerificationAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(io::stderr(), "{payload}");
        }
    }

    fn record_signing(&self, event: &SigningAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Appends one serialized event.
    fn append<T: Serialize>(&self, event: &T) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

impl CeppAuditSink for FileAuditSink {
    fn record_verification(&self, event: &VerificationAuditEvent) {
        self.append(event);
    }

    fn record_signing(&self, event: &SigningAuditEvent) {
        self.append(event);
    }
}

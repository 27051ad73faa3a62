// crates/cepp-config/src/store.rs
// ============================================================================
// Module: CEPP Key Store Files
// Description: TOML models and loaders for trust stores and CA keystores.
// Purpose: Parse and validate CA key files with fail-closed defaults.
// Dependencies: cepp-core, serde, toml
// ============================================================================

//! ## Overview
//! Two file kinds share one layout, a table of issuers keyed by issuer id:
//!
//! ```toml
//! [issuers."RU Certificate Authority"]
//! spam = "spam@ca.ru.nl"
//! algorithm = "ecdsa"
//! curve = "secp256k1"
//! public_key = "04..."
//! ```
//!
//! Trust stores carry `public_key` and an optional `spam` contact. Keystores
//! carry `private_key` only. Every entry is checked against the signature
//! registry so a loaded store never holds key material its scheme rejects.
//!
//! Security posture: inputs are untrusted; path length, file size, and
//! issuer count are bounded before any parsing happens.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use cepp_core::AlgorithmId;
use cepp_core::CaKeystore;
use cepp_core::CaSigningKey;
use cepp_core::IssuerId;
use cepp_core::PrivateKeyParams;
use cepp_core::PublicKeyParams;
use cepp_core::SignatureRegistry;
use cepp_core::SignatureScheme;
use cepp_core::TrustStore;
use cepp_core::TrustedIssuer;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Limits and Defaults
// ============================================================================

/// Default trust store file name.
pub const DEFAULT_TRUST_STORE_NAME: &str = "cepp-trust.toml";
/// Default CA keystore file name.
pub const DEFAULT_CA_KEYSTORE_NAME: &str = "cepp-keystore.toml";
/// Environment variable naming the trust store path.
pub const TRUST_STORE_ENV_VAR: &str = "CEPP_TRUST_STORE";
/// Environment variable naming the CA keystore path.
pub const CA_KEYSTORE_ENV_VAR: &str = "CEPP_CA_KEYSTORE";
/// Maximum key store file size in bytes.
pub const MAX_STORE_FILE_SIZE: usize = 1024 * 1024;
/// Maximum number of issuers per file.
pub const MAX_ISSUERS: usize = 1024;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum issuer id length.
const MAX_ISSUER_ID_LENGTH: usize = 256;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Key store loading errors.
#[derive(Debug, Error)]
pub enum KeyStoreError {
    /// I/O error while reading a key store file.
    #[error("key store io error: {0}")]
    Io(String),
    /// TOML parse error.
    #[error("key store parse error: {0}")]
    Parse(String),
    /// Invalid key store contents.
    #[error("invalid key store: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: File Models
// ============================================================================

/// Trust store file contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrustStoreFile {
    /// Trusted issuers keyed by issuer id.
    #[serde(default)]
    pub issuers: BTreeMap<String, TrustedIssuerEntry>,
}

/// One trusted issuer in a trust store file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrustedIssuerEntry {
    /// Abuse contact address.
    #[serde(default)]
    pub spam: Option<String>,
    /// Signature algorithm id.
    pub algorithm: String,
    /// Named curve for curve-based algorithms.
    #[serde(default)]
    pub curve: Option<String>,
    /// Hex-encoded public key.
    pub public_key: String,
}

/// CA keystore file contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaKeystoreFile {
    /// Signing keys keyed by issuer id.
    #[serde(default)]
    pub issuers: BTreeMap<String, CaKeyEntry>,
}

/// One signing key in a CA keystore file.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaKeyEntry {
    /// Signature algorithm id.
    pub algorithm: String,
    /// Named curve for curve-based algorithms.
    #[serde(default)]
    pub curve: Option<String>,
    /// Hex-encoded private key.
    pub private_key: String,
}

impl fmt::Debug for CaKeyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaKeyEntry")
            .field("algorithm", &self.algorithm)
            .field("curve", &self.curve)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

impl TrustStoreFile {
    /// Validates every entry and converts the file into a trust store.
    ///
    /// # Errors
    ///
    /// Returns [`KeyStoreError::Invalid`] when an entry is unusable.
    pub fn into_trust_store(self, registry: &SignatureRegistry) -> Result<TrustStore, KeyStoreError> {
        check_issuer_count(self.issuers.len())?;
        let mut issuers = Vec::with_capacity(self.issuers.len());
        for (id, entry) in self.issuers {
            validate_issuer_id(&id)?;
            if let Some(spam) = &entry.spam
                && spam.trim().is_empty()
            {
                return Err(KeyStoreError::Invalid(format!(
                    "issuers.{id}.spam must be non-empty when set"
                )));
            }
            let scheme = registered_scheme(registry, &id, &entry.algorithm)?;
            let key = PublicKeyParams {
                curve: entry.curve,
                public_key_hex: entry.public_key,
            };
            scheme
                .check_public_key(&key)
                .map_err(|err| KeyStoreError::Invalid(format!("issuers.{id}.public_key: {err}")))?;
            issuers.push((
                IssuerId::new(id),
                TrustedIssuer {
                    spam_contact: entry.spam,
                    algorithm: AlgorithmId::new(entry.algorithm),
                    key,
                },
            ));
        }
        Ok(issuers.into_iter().collect())
    }
}

impl CaKeystoreFile {
    /// Validates every entry and converts the file into a CA keystore.
    ///
    /// # Errors
    ///
    /// Returns [`KeyStoreError::Invalid`] when an entry is unusable.
    pub fn into_ca_keystore(self, registry: &SignatureRegistry) -> Result<CaKeystore, KeyStoreError> {
        check_issuer_count(self.issuers.len())?;
        let mut keys = Vec::with_capacity(self.issuers.len());
        for (id, entry) in self.issuers {
            validate_issuer_id(&id)?;
            let scheme = registered_scheme(registry, &id, &entry.algorithm)?;
            let key = PrivateKeyParams {
                curve: entry.curve,
                private_key_hex: entry.private_key,
            };
            scheme
                .check_private_key(&key)
                .map_err(|err| KeyStoreError::Invalid(format!("issuers.{id}.private_key: {err}")))?;
            keys.push((
                IssuerId::new(id),
                CaSigningKey {
                    algorithm: AlgorithmId::new(entry.algorithm),
                    key,
                },
            ));
        }
        Ok(keys.into_iter().collect())
    }
}

// ============================================================================
// SECTION: Loaders
// ============================================================================

/// Loads a trust store using the default resolution rules.
///
/// The path resolves from `path`, then [`TRUST_STORE_ENV_VAR`], then
/// [`DEFAULT_TRUST_STORE_NAME`] in the working directory.
///
/// # Errors
///
/// Returns [`KeyStoreError`] when reading, parsing, or validation fails.
pub fn load_trust_store(path: Option<&Path>) -> Result<TrustStore, KeyStoreError> {
    let content = read_store_file(path, TRUST_STORE_ENV_VAR, DEFAULT_TRUST_STORE_NAME)?;
    parse_trust_store_str(&content)
}

/// Loads a CA keystore using the default resolution rules.
///
/// The path resolves from `path`, then [`CA_KEYSTORE_ENV_VAR`], then
/// [`DEFAULT_CA_KEYSTORE_NAME`] in the working directory.
///
/// # Errors
///
/// Returns [`KeyStoreError`] when reading, parsing, or validation fails.
pub fn load_ca_keystore(path: Option<&Path>) -> Result<CaKeystore, KeyStoreError> {
    let content = read_store_file(path, CA_KEYSTORE_ENV_VAR, DEFAULT_CA_KEYSTORE_NAME)?;
    parse_ca_keystore_str(&content)
}

/// Parses and validates trust store TOML against the default registry.
///
/// # Errors
///
/// Returns [`KeyStoreError`] when parsing or validation fails.
pub fn parse_trust_store_str(content: &str) -> Result<TrustStore, KeyStoreError> {
    let file: TrustStoreFile =
        toml::from_str(content).map_err(|err| KeyStoreError::Parse(err.to_string()))?;
    file.into_trust_store(&SignatureRegistry::with_defaults())
}

/// Parses and validates CA keystore TOML against the default registry.
///
/// # Errors
///
/// Returns [`KeyStoreError`] when parsing or validation fails.
pub fn parse_ca_keystore_str(content: &str) -> Result<CaKeystore, KeyStoreError> {
    let file: CaKeystoreFile =
        toml::from_str(content).map_err(|err| KeyStoreError::Parse(err.to_string()))?;
    file.into_ca_keystore(&SignatureRegistry::with_defaults())
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves, bounds, and reads a key store file as UTF-8.
fn read_store_file(
    path: Option<&Path>,
    env_var: &str,
    default_name: &str,
) -> Result<String, KeyStoreError> {
    let resolved = resolve_path(path, env_var, default_name)?;
    validate_path(&resolved)?;
    let bytes = fs::read(&resolved)
        .map_err(|err| KeyStoreError::Io(format!("{}: {err}", resolved.display())))?;
    if bytes.len() > MAX_STORE_FILE_SIZE {
        return Err(KeyStoreError::Invalid("key store file exceeds size limit".to_string()));
    }
    String::from_utf8(bytes)
        .map_err(|_| KeyStoreError::Invalid("key store file must be utf-8".to_string()))
}

/// Resolves the file path from the argument, environment, or default name.
fn resolve_path(
    path: Option<&Path>,
    env_var: &str,
    default_name: &str,
) -> Result<PathBuf, KeyStoreError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(env_var) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(KeyStoreError::Invalid("key store path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(default_name))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), KeyStoreError> {
    if path.as_os_str().len() > MAX_TOTAL_PATH_LENGTH {
        return Err(KeyStoreError::Invalid("key store path exceeds max length".to_string()));
    }
    for component in path.components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(KeyStoreError::Invalid("key store path component too long".to_string()));
        }
    }
    Ok(())
}

/// Rejects files with too many issuers.
fn check_issuer_count(count: usize) -> Result<(), KeyStoreError> {
    if count > MAX_ISSUERS {
        return Err(KeyStoreError::Invalid(format!(
            "key store lists {count} issuers, limit is {MAX_ISSUERS}"
        )));
    }
    Ok(())
}

/// Rejects issuer ids that cannot appear in a certificate record.
fn validate_issuer_id(id: &str) -> Result<(), KeyStoreError> {
    if id.trim().is_empty() {
        return Err(KeyStoreError::Invalid("issuer id must be non-empty".to_string()));
    }
    if id.len() > MAX_ISSUER_ID_LENGTH {
        return Err(KeyStoreError::Invalid(format!(
            "issuer id exceeds {MAX_ISSUER_ID_LENGTH} bytes"
        )));
    }
    if let Some(reserved) = id.chars().find(|ch| matches!(ch, ';' | '=')) {
        return Err(KeyStoreError::Invalid(format!(
            "issuer id {id} contains reserved character {reserved:?}"
        )));
    }
    Ok(())
}

/// Looks up the scheme for an entry's algorithm.
fn registered_scheme<'a>(
    registry: &'a SignatureRegistry,
    id: &str,
    algorithm: &str,
) -> Result<&'a dyn SignatureScheme, KeyStoreError> {
    registry.get(algorithm).ok_or_else(|| {
        KeyStoreError::Invalid(format!("issuers.{id}.algorithm {algorithm} is not registered"))
    })
}

// ============================================================================
// SECTION: Tests
// ============================================================================

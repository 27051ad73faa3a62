// crates/cepp-core/src/runtime/registry.rs
// ============================================================================
// Module: Signature Scheme Registry
// Description: Algorithm-id keyed registry of signature schemes.
// Purpose: Route sign and verify calls to the scheme named by a record.
// Dependencies: crate::interfaces
// ============================================================================

//! ## Overview
//! The registry resolves signature schemes by algorithm id. New algorithms are
//! added with [`SignatureRegistry::register`]; dispatch never changes.
//! Unknown ids fail closed: verification returns `false` and signing returns
//! [`SignatureError::UnsupportedAlgorithm`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::core::PrivateKeyParams;
use crate::core::PublicKeyParams;
use crate::interfaces::SignatureError;
use crate::interfaces::SignatureScheme;
use crate::runtime::ecdsa::EcdsaScheme;
use crate::runtime::ed25519::Ed25519Scheme;

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Signature scheme registry.
///
/// # Invariants
/// - Algorithm ids are unique; registering an id again replaces the scheme.
/// - Registered schemes are `Send + Sync` and shared behind `Arc`.
#[derive(Clone, Default)]
pub struct SignatureRegistry {
    /// Schemes keyed by algorithm id.
    schemes: BTreeMap<String, Arc<dyn SignatureScheme>>,
}

impl SignatureRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a registry with the built-in `ecdsa` and `ed25519` schemes.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(EcdsaScheme);
        registry.register(Ed25519Scheme);
        registry
    }

    /// Registers a scheme under its algorithm id.
    pub fn register<S>(&mut self, scheme: S)
    where
        S: SignatureScheme + 'static,
    {
        self.schemes.insert(scheme.algorithm_id().to_string(), Arc::new(scheme));
    }

    /// Returns the scheme registered for an algorithm id.
    #[must_use]
    pub fn get(&self, algorithm: &str) -> Option<&dyn SignatureScheme> {
        self.schemes.get(algorithm).map(|scheme| &**scheme)
    }

    /// Returns true when an algorithm id is registered.
    #[must_use]
    pub fn contains(&self, algorithm: &str) -> bool {
        self.schemes.contains_key(algorithm)
    }

    /// Returns registered algorithm ids in sorted order.
    pub fn algorithm_ids(&self) -> impl Iterator<Item = &str> {
        self.schemes.keys().map(String::as_str)
    }

    /// Signs `message` with the scheme registered for `algorithm`.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError::UnsupportedAlgorithm`] for unknown ids and
    /// scheme errors for unusable key material.
    pub fn sign(
        &self,
        algorithm: &str,
        key: &PrivateKeyParams,
        message: &[u8],
    ) -> Result<String, SignatureError> {
        let scheme = self
            .get(algorithm)
            .ok_or_else(|| SignatureError::UnsupportedAlgorithm(algorithm.to_string()))?;
        scheme.sign(key, message)
    }

    /// Verifies `signature` with the scheme registered for `algorithm`.
    ///
    /// Returns `false` for unknown ids.
    #[must_use]
    pub fn verify(
        &self,
        algorithm: &str,
        key: &PublicKeyParams,
        message: &[u8],
        signature: &str,
    ) -> bool {
        self.get(algorithm).is_some_and(|scheme| scheme.verify(key, message, signature))
    }
}

impl fmt::Debug for SignatureRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignatureRegistry")
            .field("algorithms", &self.schemes.keys().collect::<Vec<_>>())
            .finish()
    }
}

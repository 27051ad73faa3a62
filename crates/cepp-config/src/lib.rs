// crates/cepp-config/src/lib.rs
// ============================================================================
// Module: CEPP Config Library
// Description: Trust store and CA keystore files for CEPP deployments.
// Purpose: Single source of truth for cepp-trust.toml and cepp-keystore.toml.
// Dependencies: cepp-core, serde, toml
// ============================================================================

//! ## Overview
//! `cepp-config` loads the trust store (CA public keys) and the CA keystore
//! (CA private keys) from TOML files. Loading is strict and fail-closed:
//! unknown fields, malformed hex, unregistered algorithms, and key material
//! that does not decode under its scheme are all rejected before a store is
//! returned.
//!
//! Security posture: key files are operator inputs but may be tampered with;
//! every limit is enforced before parsing.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::*;

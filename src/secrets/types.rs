//! Core types for secret-backed property resolution.

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

// ============================================================================
// Fetch Request / Response
// ============================================================================

/// The minimal addressing tuple handed to a secret-store client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretFetchRequest {
    /// Which secret backend governs this secret (e.g. `"vault"`).
    pub secret_type: String,
    /// The backend-specific identifier of the secret instance.
    pub id: String,
}

/// The raw outcome of a secret fetch, owned entirely by the client.
///
/// The resolver never inspects or transforms this; it is handed to the
/// caller exactly as the client produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretResponse {
    /// Response payload (JSON when the backend returned JSON, raw text
    /// wrapped in a string otherwise).
    pub body: serde_json::Value,
    /// Response headers, flattened to strings.
    pub headers: HashMap<String, String>,
    /// HTTP-style status code.
    pub status_code: u16,
    /// Human-readable status text.
    pub status_text: String,
}

/// Failure of a delegated secret fetch.
///
/// Produced by secret-store clients only. The resolver forwards these
/// untouched; callers apply their own retry/timeout policy.
#[derive(Debug, Error)]
pub enum SecretFetchError {
    /// Transport-level failure (connection, TLS, timeout).
    #[error("secret fetch transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The backend answered with a non-success status.
    #[error("secret backend returned status {status_code}: {body}")]
    Status { status_code: u16, body: String },
    /// Backend-specific failure that is neither transport nor status.
    #[error("secret backend error: {0}")]
    Backend(String),
}

/// A still-pending secret fetch.
///
/// Clients return an owned future so the resolver can hand it to its
/// caller without awaiting it and without borrowing the client.
pub type SecretFetch = BoxFuture<'static, Result<SecretResponse, SecretFetchError>>;

// ============================================================================
// Client Trait
// ============================================================================

/// A client for one secret-store backend.
///
/// `fetch_secret` dispatches the fetch and returns the pending result
/// immediately; any suspension happens inside the returned future, never
/// in the dispatch itself.
pub trait SecretStoreClient: Send + Sync {
    /// Display name for logging.
    fn name(&self) -> &str;

    /// Start fetching the addressed secret.
    fn fetch_secret(&self, request: SecretFetchRequest) -> SecretFetch;
}

// ============================================================================
// Declared / Evaluated Value Shapes
// ============================================================================

/// The secret-relevant part of a property's declared value.
///
/// A property is secret-backed iff its declared value parses into this
/// shape; a missing or mistyped `secret_type` field yields `None`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SecretDeclaration {
    pub secret_type: String,
}

impl SecretDeclaration {
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }
}

/// The secret reference inside a per-entity evaluated value.
///
/// Rule evaluation for a secret-backed property is expected to produce
/// `{"value": {"id": ...}}`; anything else yields `None`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EvaluatedSecretRef {
    pub value: SecretRefBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SecretRefBody {
    pub id: String,
}

impl EvaluatedSecretRef {
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }
}

// ============================================================================
// Tests
// ============================================================================

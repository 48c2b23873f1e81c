//! Secret-reference resolution.
//!
//! A secret-backed property's declared value names a `secret_type`; its
//! per-entity evaluated value names a secret `id`. [`SecretResolver`]
//! walks from property id to `(secret_type, id)` and hands the fetch to
//! the property's [`SecretStoreClient`], forwarding the pending result to
//! the caller unmodified.

pub mod http_client;
pub mod resolver;
pub mod types;

pub use http_client::HttpSecretStoreClient;
pub use resolver::{ResolveFailure, SecretResolver};
pub use types::{
    EvaluatedSecretRef, SecretDeclaration, SecretFetch, SecretFetchError, SecretFetchRequest,
    SecretResponse, SecretStoreClient,
};

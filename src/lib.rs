//! Resolve secret-backed configuration properties.
//!
//! A configuration property may hold a *reference* to a secret in an
//! external store instead of a literal value. Given an entity id and its
//! attributes, this crate evaluates the property's per-entity value,
//! recognizes the secret reference, and delegates retrieval to the
//! secret-store client registered for that property. The retrieval
//! outcome is forwarded to the caller exactly as the client produced it.
//!
//! ```no_run
//! use configvault::catalog::{ConfigCatalog, ConfigurationCatalog, EntityAttributes};
//! use configvault::secrets::{HttpSecretStoreClient, SecretResolver};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut catalog = ConfigCatalog::from_document(json!({
//!     "properties": [{
//!         "propertyId": "db-cred",
//!         "name": "Database credential",
//!         "value": {"secret_type": "vault"},
//!         "defaultValue": {"value": {"id": "sec-42"}}
//!     }]
//! }))?;
//! catalog.register_secret_client(
//!     "db-cred",
//!     Arc::new(HttpSecretStoreClient::new("https://secrets.example.com".into())),
//! );
//!
//! let resolver = SecretResolver::new("db-cred", Arc::new(catalog));
//! let fetch = resolver.resolve("E1", &EntityAttributes::new());
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod logging;
pub mod secrets;

pub use catalog::{ConfigCatalog, ConfigurationCatalog, EntityAttributes, Property};
pub use secrets::{
    ResolveFailure, SecretFetch, SecretFetchError, SecretFetchRequest, SecretResolver,
    SecretResponse, SecretStoreClient,
};

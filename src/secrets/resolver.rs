//! Secret-reference resolution for a single configuration property.
//!
//! A [`SecretResolver`] is bound to one property id at construction and
//! walks a fixed gate chain per call: validate the entity id, inspect the
//! property's declared `secret_type`, evaluate the per-entity value,
//! extract the nested secret id, and dispatch the fetch to the property's
//! secret-store client. The first failed gate ends the call.

use super::types::{
    EvaluatedSecretRef, SecretDeclaration, SecretFetch, SecretFetchRequest,
};
use crate::catalog::{ConfigurationCatalog, EntityAttributes};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error};

/// Why a resolution call stopped before dispatching a fetch.
///
/// All variants are local and terminal: the call yields no fetch and the
/// caller must re-invoke to try again. Failures of the dispatched fetch
/// itself are *not* represented here; those travel inside the returned
/// [`SecretFetch`] untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveFailure {
    /// The caller supplied no usable entity identifier.
    #[error("invalid entity id")]
    InvalidEntityId,

    /// The bound property id has no entry in the catalog.
    #[error("property '{property_id}' is not present in the catalog")]
    UnknownProperty { property_id: String },

    /// The property's declared value is absent or lacks `secret_type`.
    #[error("secret_type is missing from the property value of: {property}")]
    MissingSecretType { property: String },

    /// Rule evaluation produced no usable value for this entity.
    #[error("property evaluated value is invalid")]
    EvaluationFailed,

    /// The evaluated value lacks the nested secret `id`.
    #[error("secret id is missing from the property: {property}")]
    MissingSecretId { property: String },

    /// No secret-store client is registered for the property id.
    #[error("no secret-store client is registered for property '{property_id}'")]
    MissingSecretClient { property_id: String },
}

/// Resolves one property's secret reference per entity and delegates the
/// actual fetch to the property's secret-store client.
///
/// Holds no mutable state; every call is independent, and concurrent
/// calls on one instance are safe.
pub struct SecretResolver {
    property_id: String,
    catalog: Arc<dyn ConfigurationCatalog>,
}

impl SecretResolver {
    /// Bind a resolver to one property id. The binding is permanent.
    pub fn new(property_id: impl Into<String>, catalog: Arc<dyn ConfigurationCatalog>) -> Self {
        Self {
            property_id: property_id.into(),
            catalog,
        }
    }

    /// The property id this resolver is bound to.
    pub fn property_id(&self) -> &str {
        &self.property_id
    }

    /// Resolve the secret reference for `entity_id` and start the fetch.
    ///
    /// Returns the client's still-pending fetch on success. Any failed
    /// gate logs a diagnostic and returns `None`; `None` means "no secret
    /// to fetch", never "fetch failed". If the fetch itself fails later,
    /// that failure surfaces through the returned future exactly as the
    /// client produced it.
    pub fn resolve(
        &self,
        entity_id: &str,
        entity_attributes: &EntityAttributes,
    ) -> Option<SecretFetch> {
        match self.try_resolve(entity_id, entity_attributes) {
            Ok(fetch) => Some(fetch),
            Err(failure) => {
                error!(
                    property_id = %self.property_id,
                    "Secret resolution: {failure}"
                );
                None
            }
        }
    }

    /// Same gate chain as [`resolve`](Self::resolve), surfacing the failed
    /// gate instead of logging it.
    pub fn try_resolve(
        &self,
        entity_id: &str,
        entity_attributes: &EntityAttributes,
    ) -> Result<SecretFetch, ResolveFailure> {
        // Gate 1: entity id, checked before any catalog access.
        if entity_id.is_empty() {
            return Err(ResolveFailure::InvalidEntityId);
        }

        // Gate 2: the bound property.
        let property = self.catalog.property(&self.property_id).ok_or_else(|| {
            ResolveFailure::UnknownProperty {
                property_id: self.property_id.clone(),
            }
        })?;

        // Gate 3: the declared value must mark the property secret-backed.
        let declaration = property
            .value()
            .and_then(SecretDeclaration::from_value)
            .ok_or_else(|| ResolveFailure::MissingSecretType {
                property: property.name().to_string(),
            })?;

        // Gate 4: per-entity evaluation.
        let evaluated = property
            .evaluate(entity_id, entity_attributes)
            .ok_or(ResolveFailure::EvaluationFailed)?;

        // Gate 5: the evaluated value must carry the nested secret id.
        let secret_ref = EvaluatedSecretRef::from_value(&evaluated).ok_or_else(|| {
            ResolveFailure::MissingSecretId {
                property: property.name().to_string(),
            }
        })?;

        // Gate 6: the client, looked up fresh on every call.
        let client = self.catalog.secret_client(&self.property_id).ok_or_else(|| {
            ResolveFailure::MissingSecretClient {
                property_id: self.property_id.clone(),
            }
        })?;

        debug!(
            property_id = %self.property_id,
            secret_type = %declaration.secret_type,
            secret_id = %secret_ref.value.id,
            client = client.name(),
            "Dispatching secret fetch"
        );

        // The client's pending fetch is handed back as-is: no awaiting, no
        // wrapping, no interception of its success or failure.
        Ok(client.fetch_secret(SecretFetchRequest {
            secret_type: declaration.secret_type,
            id: secret_ref.value.id,
        }))
    }
}

// ============================================================================
// Tests
// ============================================================================

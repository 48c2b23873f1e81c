//! The configuration catalog: properties and their secret-store clients.
//!
//! Resolvers look up their bound property and its secret-store client
//! through [`ConfigurationCatalog`] on every call; the catalog is the
//! single source of truth and nothing is cached on the resolver side.

pub mod property;

use crate::secrets::types::SecretStoreClient;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

pub use property::{EntityAttributes, Property, StaticProperty, TargetingRule};

/// Maximum size for a catalog document file (10 MB).
pub const MAX_CATALOG_FILE_BYTES: u64 = 10 * 1024 * 1024;

/// Read-only lookup interface consumed by resolvers.
pub trait ConfigurationCatalog: Send + Sync {
    /// Look up a property by id.
    fn property(&self, property_id: &str) -> Option<Arc<dyn Property>>;

    /// Look up the secret-store client registered for a property id.
    fn secret_client(&self, property_id: &str) -> Option<Arc<dyn SecretStoreClient>>;
}

// ============================================================================
// In-memory catalog
// ============================================================================

/// In-memory catalog built from a JSON document and programmatic client
/// registration. Clients carry credentials, so they never come from the
/// document itself.
#[derive(Default)]
pub struct ConfigCatalog {
    properties: HashMap<String, Arc<dyn Property>>,
    secret_clients: HashMap<String, Arc<dyn SecretStoreClient>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogDocument {
    #[serde(default)]
    properties: Vec<PropertyEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PropertyEntry {
    property_id: String,
    #[serde(flatten)]
    property: StaticProperty,
}

impl ConfigCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from a parsed JSON document.
    ///
    /// Document shape:
    /// `{"properties": [{"propertyId", "name", "value", "entityOverrides",
    /// "rules", "defaultValue"}]}`.
    pub fn from_document(document: serde_json::Value) -> Result<Self> {
        let document: CatalogDocument =
            serde_json::from_value(document).context("Invalid catalog document")?;

        let mut catalog = Self::new();
        for entry in document.properties {
            if entry.property_id.is_empty() {
                bail!("Catalog document contains a property with an empty propertyId");
            }
            catalog.register_property(entry.property_id, entry.property);
        }
        info!(
            "Catalog loaded with {} property(ies)",
            catalog.properties.len()
        );
        Ok(catalog)
    }

    /// Build a catalog from a JSON document string.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let document: serde_json::Value =
            serde_json::from_str(content).context("Cannot parse catalog document")?;
        Self::from_document(document)
    }

    /// Build a catalog from a JSON document file, with a size guardrail.
    pub fn from_file(path: &Path) -> Result<Self> {
        let metadata = std::fs::metadata(path)
            .with_context(|| format!("Cannot stat catalog file '{}'", path.display()))?;
        if metadata.len() > MAX_CATALOG_FILE_BYTES {
            bail!(
                "Catalog file '{}' is {} bytes, exceeds limit of {} bytes",
                path.display(),
                metadata.len(),
                MAX_CATALOG_FILE_BYTES,
            );
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read catalog file '{}'", path.display()))?;
        Self::from_json_str(&content)
    }

    /// Register (or replace) a property.
    pub fn register_property(&mut self, property_id: impl Into<String>, property: StaticProperty) {
        self.properties.insert(property_id.into(), Arc::new(property));
    }

    /// Register (or replace) the secret-store client for a property id.
    /// Exactly one client serves a given property.
    pub fn register_secret_client(
        &mut self,
        property_id: impl Into<String>,
        client: Arc<dyn SecretStoreClient>,
    ) {
        self.secret_clients.insert(property_id.into(), client);
    }

    pub fn property_ids(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }
}

impl ConfigurationCatalog for ConfigCatalog {
    fn property(&self, property_id: &str) -> Option<Arc<dyn Property>> {
        self.properties.get(property_id).cloned()
    }

    fn secret_client(&self, property_id: &str) -> Option<Arc<dyn SecretStoreClient>> {
        self.secret_clients.get(property_id).cloned()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn document_roundtrip() {
        let catalog = ConfigCatalog::from_document(json!({
            "properties": [
                {
                    "propertyId": "db-cred",
                    "name": "Database credential",
                    "value": {"secret_type": "vault"},
                    "rules": [
                        {
                            "attribute": "env",
                            "equals": "prod",
                            "value": {"value": {"id": "sec-prod"}}
                        }
                    ],
                    "defaultValue": {"value": {"id": "sec-dev"}}
                }
            ]
        }))
        .unwrap();

        let property = catalog.property("db-cred").unwrap();
        assert_eq!(property.name(), "Database credential");
        assert_eq!(
            property.value().unwrap()["secret_type"],
            json!("vault")
        );

        let mut attrs = EntityAttributes::new();
        attrs.insert("env".into(), json!("prod"));
        let evaluated = property.evaluate("E1", &attrs).unwrap();
        assert_eq!(evaluated["value"]["id"], "sec-prod");
    }

    #[test]
    fn empty_document_is_valid() {
        let catalog = ConfigCatalog::from_document(json!({})).unwrap();
        assert!(catalog.property("anything").is_none());
    }

    #[test]
    fn empty_property_id_rejected() {
        let result = ConfigCatalog::from_document(json!({
            "properties": [{"propertyId": "", "name": "x"}]
        }));
        assert!(result.is_err());
    }

    #[test]
    fn malformed_document_rejected() {
        assert!(ConfigCatalog::from_json_str("{not json").is_err());
        assert!(ConfigCatalog::from_document(json!({"properties": "nope"})).is_err());
    }

    #[test]
    fn unknown_lookups_return_none() {
        let catalog = ConfigCatalog::new();
        assert!(catalog.property("missing").is_none());
        assert!(catalog.secret_client("missing").is_none());
    }
}

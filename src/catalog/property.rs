//! Configuration properties and their per-entity evaluation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Attributes describing the entity being evaluated.
///
/// Always a mapping; an empty map is valid and means "no attributes".
pub type EntityAttributes = serde_json::Map<String, serde_json::Value>;

/// A configuration property as the resolver consumes it.
///
/// The evaluation engine behind `evaluate` is a black box: it either
/// produces a structured per-entity value or signals absence with `None`.
pub trait Property: Send + Sync {
    /// Property name for diagnostics.
    fn name(&self) -> &str;

    /// The declared (static) value, if any.
    fn value(&self) -> Option<&serde_json::Value>;

    /// Resolve the per-entity value for `entity_id`.
    fn evaluate(
        &self,
        entity_id: &str,
        entity_attributes: &EntityAttributes,
    ) -> Option<serde_json::Value>;
}

// ============================================================================
// Static Property
// ============================================================================

/// A targeting rule: if the entity attribute equals the expected value,
/// the rule's value wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetingRule {
    /// Attribute name to compare.
    pub attribute: String,
    /// Expected attribute value.
    pub equals: serde_json::Value,
    /// Evaluated value when the rule matches.
    pub value: serde_json::Value,
}

/// A property whose evaluation is driven by declarative data:
/// per-entity overrides first, then targeting rules in order, then the
/// default value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticProperty {
    /// Property name for diagnostics.
    pub name: String,
    /// The declared value (carries `secret_type` for secret-backed
    /// properties).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    /// Exact entity-id overrides, checked before rules.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub entity_overrides: HashMap<String, serde_json::Value>,
    /// Attribute targeting rules, first match wins.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<TargetingRule>,
    /// Fallback when no override or rule applies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,
}

impl StaticProperty {
    pub fn new(name: impl Into<String>, value: Option<serde_json::Value>) -> Self {
        Self {
            name: name.into(),
            value,
            entity_overrides: HashMap::new(),
            rules: Vec::new(),
            default_value: None,
        }
    }

    pub fn with_entity_override(
        mut self,
        entity_id: impl Into<String>,
        value: serde_json::Value,
    ) -> Self {
        self.entity_overrides.insert(entity_id.into(), value);
        self
    }

    pub fn with_rule(mut self, rule: TargetingRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn with_default(mut self, value: serde_json::Value) -> Self {
        self.default_value = Some(value);
        self
    }
}

impl Property for StaticProperty {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self) -> Option<&serde_json::Value> {
        self.value.as_ref()
    }

    fn evaluate(
        &self,
        entity_id: &str,
        entity_attributes: &EntityAttributes,
    ) -> Option<serde_json::Value> {
        if let Some(value) = self.entity_overrides.get(entity_id) {
            return Some(value.clone());
        }

        for rule in &self.rules {
            if entity_attributes.get(&rule.attribute) == Some(&rule.equals) {
                return Some(rule.value.clone());
            }
        }

        self.default_value.clone()
    }
}

// ============================================================================
// Tests
// ============================================================================

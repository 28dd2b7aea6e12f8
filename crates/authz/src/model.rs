//! Authorization query and decision models.
//!
//! Field names follow the decision service's vocabulary (`entityType`,
//! `entityId`, `actionId`, ...). The request envelope itself (policy store id,
//! `entityList` / `contextMap` wrappers) is the transport adapter's concern.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Typed reference to an entity (`Bookstore::User::"Dante"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityUid {
    pub entity_type: String,
    pub entity_id: String,
}

impl EntityUid {
    pub fn new(entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            entity_id: entity_id.into(),
        }
    }
}

impl core::fmt::Display for EntityUid {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}::{:?}", self.entity_type, self.entity_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionUid {
    pub action_type: String,
    pub action_id: String,
}

impl ActionUid {
    pub fn new(action_type: impl Into<String>, action_id: impl Into<String>) -> Self {
        Self {
            action_type: action_type.into(),
            action_id: action_id.into(),
        }
    }
}

/// Typed attribute value, tagged the way the decision service expects
/// (`{"long": 5}`, `{"string": "US"}`, `{"entityIdentifier": {...}}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AttributeValue {
    Long(i64),
    String(String),
    Boolean(bool),
    EntityIdentifier(EntityUid),
}

/// Supplemental fact sent alongside a query: an entity, its attributes and
/// its parent edges (role membership, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityFact {
    pub identifier: EntityUid,
    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeValue>,
    #[serde(default)]
    pub parents: Vec<EntityUid>,
}

impl EntityFact {
    pub fn new(identifier: EntityUid) -> Self {
        Self {
            identifier,
            attributes: BTreeMap::new(),
            parents: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: AttributeValue) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    pub fn with_parent(mut self, parent: EntityUid) -> Self {
        self.parents.push(parent);
        self
    }
}

/// One authorization question. Built per request, never persisted.
///
/// Invariant: `entities[0]` is the principal's fact and carries its role edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationQuery {
    pub principal: EntityUid,
    pub action: ActionUid,
    pub resource: EntityUid,
    pub entities: Vec<EntityFact>,
    pub context: BTreeMap<String, AttributeValue>,
}

impl AuthorizationQuery {
    pub fn principal_fact(&self) -> Option<&EntityFact> {
        self.entities.iter().find(|e| e.identifier == self.principal)
    }

    pub fn entity(&self, uid: &EntityUid) -> Option<&EntityFact> {
        self.entities.iter().find(|e| &e.identifier == uid)
    }
}

/// Raw decision value as reported by the decision service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DecisionOutcome {
    Allow,
    Deny,
    /// Anything else the service sent; never interpreted.
    Unrecognized(String),
}

impl From<String> for DecisionOutcome {
    fn from(value: String) -> Self {
        match value.as_str() {
            "ALLOW" => Self::Allow,
            "DENY" => Self::Deny,
            _ => Self::Unrecognized(value),
        }
    }
}

impl From<DecisionOutcome> for String {
    fn from(value: DecisionOutcome) -> Self {
        match value {
            DecisionOutcome::Allow => "ALLOW".to_string(),
            DecisionOutcome::Deny => "DENY".to_string(),
            DecisionOutcome::Unrecognized(raw) => raw,
        }
    }
}

/// Decision returned by the decision service (not owned by this system).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    #[serde(default)]
    pub outcome: Option<DecisionOutcome>,
    #[serde(default)]
    pub determining_rule_id: Option<String>,
}

impl Decision {
    pub fn allow(rule_id: impl Into<String>) -> Self {
        Self {
            outcome: Some(DecisionOutcome::Allow),
            determining_rule_id: Some(rule_id.into()),
        }
    }

    pub fn deny(rule_id: impl Into<String>) -> Self {
        Self {
            outcome: Some(DecisionOutcome::Deny),
            determining_rule_id: Some(rule_id.into()),
        }
    }

    /// Deny reached because no rule matched.
    pub fn default_deny() -> Self {
        Self {
            outcome: Some(DecisionOutcome::Deny),
            determining_rule_id: None,
        }
    }
}

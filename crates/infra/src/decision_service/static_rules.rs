use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use bookstore_authz::policy::{ACTION_VIEW, ACTION_VIEW_PREMIUM_OFFERS};
use bookstore_authz::rationale::{CUSTOMER_TENURE_PREMIUM_DENY, PUBLISHER_OWN_WORKS};
use bookstore_authz::{AuthorizationQuery, Decision, DecisionService, DecisionServiceError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    Allow,
    Deny,
}

/// One rule of the in-process rule list.
///
/// `role` is matched against the principal's role edge, `action` against the
/// action id. `None` matches anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticRule {
    pub rule_id: String,
    pub description: String,
    pub effect: Effect,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
}

impl StaticRule {
    pub fn new(rule_id: impl Into<String>, effect: Effect, description: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.into(),
            description: description.into(),
            effect,
            role: None,
            action: None,
        }
    }

    pub fn for_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn for_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    fn matches(&self, role: Option<&str>, action: &str) -> bool {
        let role_ok = self.role.as_deref().is_none_or(|r| Some(r) == role);
        let action_ok = self.action.as_deref().is_none_or(|a| a == action);
        role_ok && action_ok
    }
}

/// First-match rule list evaluated in process. Intended for tests/dev.
///
/// Stands in for a real policy store when no decision service URL is
/// configured. A query no rule matches is denied with no determining rule.
#[derive(Debug, Clone, Default)]
pub struct StaticDecisionService {
    rules: Vec<StaticRule>,
    descriptions: HashMap<String, String>,
}

impl StaticDecisionService {
    pub fn new(rules: Vec<StaticRule>) -> Self {
        let descriptions = rules
            .iter()
            .map(|r| (r.rule_id.clone(), r.description.clone()))
            .collect();
        Self { rules, descriptions }
    }

    /// Rules mirroring the storefront's deployed policy store.
    pub fn bookstore() -> Self {
        Self::new(vec![
            StaticRule::new("admin-all", Effect::Allow, "Allows admins to see every book").for_role("Admin"),
            StaticRule::new("publisher-own", Effect::Allow, PUBLISHER_OWN_WORKS)
                .for_role("Publisher")
                .for_action(ACTION_VIEW),
            StaticRule::new(
                "customer-premium",
                Effect::Allow,
                "Allows long-standing customers to see premium offers",
            )
            .for_role("Customer")
            .for_action(ACTION_VIEW_PREMIUM_OFFERS),
            StaticRule::new("customer-tenure-deny", Effect::Deny, CUSTOMER_TENURE_PREMIUM_DENY)
                .for_role("Customer")
                .for_action(ACTION_VIEW),
            StaticRule::new("deny-everyone-else", Effect::Deny, "Denies everyone else"),
        ])
    }

    pub fn rules(&self) -> &[StaticRule] {
        &self.rules
    }

    fn evaluate(&self, query: &AuthorizationQuery) -> Decision {
        let role = query
            .principal_fact()
            .and_then(|f| f.parents.first())
            .map(|p| p.entity_id.as_str());
        let action = query.action.action_id.as_str();

        match self.rules.iter().find(|r| r.matches(role, action)) {
            Some(rule) => match rule.effect {
                Effect::Allow => Decision::allow(&rule.rule_id),
                Effect::Deny => Decision::deny(&rule.rule_id),
            },
            None => Decision::default_deny(),
        }
    }
}

#[async_trait]
impl DecisionService for StaticDecisionService {
    async fn is_authorized(&self, query: &AuthorizationQuery) -> Result<Decision, DecisionServiceError> {
        let decision = self.evaluate(query);
        tracing::debug!(principal = %query.principal, rule_id = ?decision.determining_rule_id, "static rules evaluated");
        Ok(decision)
    }

    async fn get_rule_description(&self, rule_id: &str) -> Result<String, DecisionServiceError> {
        self.descriptions
            .get(rule_id)
            .cloned()
            .ok_or_else(|| DecisionServiceError::RuleNotFound(rule_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use bookstore_auth::{AuthorizationContext, Region, Role};
    use bookstore_authz::{DecisionOutcome, QueryConstructor};
    use bookstore_core::Username;

    use super::*;

    fn decide(role: Role, tenure: Option<u32>) -> Decision {
        let ctx = AuthorizationContext::new(Username::new("someone"), role, tenure, Region::new("US"));
        let query = QueryConstructor::default().construct_single(&ctx);
        StaticDecisionService::bookstore().evaluate(&query)
    }

    #[test]
    fn bookstore_rules_by_role() {
        assert_eq!(decide(Role::Admin, None), Decision::allow("admin-all"));
        assert_eq!(decide(Role::Publisher, None), Decision::allow("publisher-own"));
        assert_eq!(decide(Role::Customer, Some(3)), Decision::allow("customer-premium"));
        assert_eq!(decide(Role::Customer, None), Decision::deny("customer-tenure-deny"));
        assert_eq!(decide(Role::Unknown, None), Decision::deny("deny-everyone-else"));
    }

    #[test]
    fn empty_rule_list_denies_without_rule() {
        let query = QueryConstructor::default().construct_single(&AuthorizationContext::anonymous());
        let decision = StaticDecisionService::default().evaluate(&query);
        assert_eq!(decision.outcome, Some(DecisionOutcome::Deny));
        assert_eq!(decision.determining_rule_id, None);
    }

    #[tokio::test]
    async fn descriptions_resolve_by_rule_id() {
        let svc = StaticDecisionService::bookstore();
        assert_eq!(svc.get_rule_description("publisher-own").await.unwrap(), PUBLISHER_OWN_WORKS);
        assert!(matches!(
            svc.get_rule_description("nope").await,
            Err(DecisionServiceError::RuleNotFound(_))
        ));
    }

    #[test]
    fn rules_deserialize_from_json() {
        let rule: StaticRule = serde_json::from_value(serde_json::json!({
            "rule_id": "r1",
            "description": "d",
            "effect": "deny",
            "role": "Customer"
        }))
        .unwrap();
        assert_eq!(rule, StaticRule::new("r1", Effect::Deny, "d").for_role("Customer"));
    }
}

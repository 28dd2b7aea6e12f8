//! Decision interpreter: explains a decision by its determining rule and
//! turns it into a [`FilterOutcome`].
//!
//! | outcome | rationale                   | role      | filter                   |
//! |---------|-----------------------------|-----------|--------------------------|
//! | ALLOW   | publisher sees own works    | Publisher | `ShowPublisherOwn`       |
//! | ALLOW   | anything else               | any       | `ShowAll`                |
//! | DENY    | customer tenure / premium   | Customer  | `ShowExcludingPremium`   |
//! | DENY    | anything else               | any       | `ShowNone`               |
//!
//! Unknown rationales fall through permissively under ALLOW and restrictively
//! under DENY. The asymmetry is part of the storefront's access model.

use std::sync::Arc;

use bookstore_auth::{AuthorizationContext, Role};
use bookstore_catalog::FilterOutcome;

use crate::error::AuthzError;
use crate::model::{Decision, DecisionOutcome};
use crate::rationale::{Rationale, RationaleTable};
use crate::service::DecisionService;

#[derive(Clone)]
pub struct DecisionInterpreter {
    service: Arc<dyn DecisionService>,
    rationales: RationaleTable,
}

impl DecisionInterpreter {
    pub fn new(service: Arc<dyn DecisionService>) -> Self {
        Self::with_rationales(service, RationaleTable::default())
    }

    pub fn with_rationales(service: Arc<dyn DecisionService>, rationales: RationaleTable) -> Self {
        Self { service, rationales }
    }

    /// Interpret `decision` for `ctx`.
    ///
    /// Issues one rule-description lookup. Fails with
    /// [`AuthzError::DecisionUnresolvable`] rather than guessing when the
    /// outcome is missing or unrecognised, or no determining rule is named.
    pub async fn interpret(&self, decision: &Decision, ctx: &AuthorizationContext) -> Result<FilterOutcome, AuthzError> {
        let allowed = match &decision.outcome {
            Some(DecisionOutcome::Allow) => true,
            Some(DecisionOutcome::Deny) => false,
            Some(DecisionOutcome::Unrecognized(raw)) => {
                return Err(AuthzError::unresolvable(format!("unrecognised decision outcome {raw:?}")));
            }
            None => return Err(AuthzError::unresolvable("decision outcome absent")),
        };

        let rule_id = decision
            .determining_rule_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AuthzError::unresolvable("decision names no determining rule"))?;

        let description = self.service.get_rule_description(rule_id).await?;
        let rationale = self.rationales.classify(&description);

        let outcome = outcome_for(allowed, rationale, ctx);
        tracing::debug!(
            rule_id,
            ?rationale,
            allowed,
            verdict = %outcome.verdict(),
            "decision interpreted"
        );
        Ok(outcome)
    }
}

/// Pure mapping from (outcome, rationale, role) to a filter.
pub fn outcome_for(allowed: bool, rationale: Rationale, ctx: &AuthorizationContext) -> FilterOutcome {
    match (allowed, rationale, ctx.role()) {
        (true, Rationale::PublisherOwnWorks, Role::Publisher) => FilterOutcome::ShowPublisherOwn {
            actor: ctx.username().clone(),
        },
        (true, _, _) => FilterOutcome::ShowAll,
        (false, Rationale::CustomerTenurePremiumDeny, Role::Customer) => FilterOutcome::ShowExcludingPremium,
        (false, _, _) => FilterOutcome::ShowNone,
    }
}

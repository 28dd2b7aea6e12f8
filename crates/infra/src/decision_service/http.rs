use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use bookstore_authz::{
    ActionUid, AttributeValue, AuthorizationQuery, Decision, DecisionOutcome, DecisionService, DecisionServiceError,
    EntityFact, EntityUid,
};

/// Client for a remote policy decision service.
///
/// Endpoints (all `POST`, JSON bodies, every body carries `policyStoreId`):
/// - `/is-authorized`
/// - `/batch-is-authorized`
/// - `/get-policy`
///
/// No retries: a repeated query is a fresh evaluation. The per-call timeout is
/// the only protection against a stalled service, and dropping the returned
/// future cancels the in-flight request.
///
/// A DENY with no determining policy (nothing matched) is reported as
/// [`Decision::default_deny`], which the interpreter treats as unresolvable.
/// Policy stores need an explicit catch-all deny rule for anonymous callers to
/// get an empty catalog instead of an error.
#[derive(Debug, Clone)]
pub struct HttpDecisionService {
    client: Client,
    base_url: String,
    policy_store_id: String,
}

impl HttpDecisionService {
    pub fn new(
        base_url: impl Into<String>,
        policy_store_id: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, DecisionServiceError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DecisionServiceError::Transport(e.to_string()))?;
        Ok(Self::with_client(client, base_url, policy_store_id))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>, policy_store_id: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            policy_store_id: policy_store_id.into(),
        }
    }

    async fn post<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, DecisionServiceError> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| DecisionServiceError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(%url, status = status.as_u16(), "decision service call failed");
            return Err(DecisionServiceError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<R>()
            .await
            .map_err(|e| DecisionServiceError::Decode(e.to_string()))
    }
}

#[async_trait]
impl DecisionService for HttpDecisionService {
    async fn is_authorized(&self, query: &AuthorizationQuery) -> Result<Decision, DecisionServiceError> {
        let body = IsAuthorizedRequest::new(&self.policy_store_id, query);
        let response: DecisionResponse = self.post("/is-authorized", &body).await?;
        Ok(response.into())
    }

    async fn get_rule_description(&self, rule_id: &str) -> Result<String, DecisionServiceError> {
        let body = GetPolicyRequest {
            policy_store_id: &self.policy_store_id,
            policy_id: rule_id,
        };
        let response: GetPolicyResponse = match self.post("/get-policy", &body).await {
            Err(DecisionServiceError::Status { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                return Err(DecisionServiceError::RuleNotFound(rule_id.to_string()));
            }
            other => other?,
        };

        Ok(response
            .definition
            .and_then(|d| d.static_definition)
            .and_then(|s| s.description)
            .unwrap_or_default())
    }

    async fn batch_is_authorized(&self, queries: &[AuthorizationQuery]) -> Result<Vec<Decision>, DecisionServiceError> {
        let body = BatchIsAuthorizedRequest::new(&self.policy_store_id, queries);
        let response: BatchIsAuthorizedResponse = self.post("/batch-is-authorized", &body).await?;

        if response.results.len() != queries.len() {
            return Err(DecisionServiceError::BatchLength {
                expected: queries.len(),
                actual: response.results.len(),
            });
        }
        Ok(response.results.into_iter().map(Decision::from).collect())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Wire format
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EntityList<'a> {
    entity_list: Vec<&'a EntityFact>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ContextMap<'a> {
    context_map: &'a BTreeMap<String, AttributeValue>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct IsAuthorizedRequest<'a> {
    policy_store_id: &'a str,
    principal: &'a EntityUid,
    action: &'a ActionUid,
    resource: &'a EntityUid,
    entities: EntityList<'a>,
    context: ContextMap<'a>,
}

impl<'a> IsAuthorizedRequest<'a> {
    fn new(policy_store_id: &'a str, query: &'a AuthorizationQuery) -> Self {
        Self {
            policy_store_id,
            principal: &query.principal,
            action: &query.action,
            resource: &query.resource,
            entities: EntityList {
                entity_list: query.entities.iter().collect(),
            },
            context: ContextMap {
                context_map: &query.context,
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchItem<'a> {
    principal: &'a EntityUid,
    action: &'a ActionUid,
    resource: &'a EntityUid,
    context: ContextMap<'a>,
}

/// Batch requests share one entity list; facts repeated across queries are sent once.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchIsAuthorizedRequest<'a> {
    policy_store_id: &'a str,
    entities: EntityList<'a>,
    requests: Vec<BatchItem<'a>>,
}

impl<'a> BatchIsAuthorizedRequest<'a> {
    fn new(policy_store_id: &'a str, queries: &'a [AuthorizationQuery]) -> Self {
        let mut entity_list: Vec<&EntityFact> = Vec::new();
        for fact in queries.iter().flat_map(|q| q.entities.iter()) {
            if !entity_list.contains(&fact) {
                entity_list.push(fact);
            }
        }

        Self {
            policy_store_id,
            entities: EntityList { entity_list },
            requests: queries
                .iter()
                .map(|q| BatchItem {
                    principal: &q.principal,
                    action: &q.action,
                    resource: &q.resource,
                    context: ContextMap {
                        context_map: &q.context,
                    },
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeterminingPolicy {
    policy_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DecisionResponse {
    #[serde(default)]
    decision: Option<DecisionOutcome>,
    #[serde(default)]
    determining_policies: Vec<DeterminingPolicy>,
}

impl From<DecisionResponse> for Decision {
    /// The first determining policy is the determining rule.
    fn from(value: DecisionResponse) -> Self {
        Decision {
            outcome: value.decision,
            determining_rule_id: value.determining_policies.into_iter().next().map(|p| p.policy_id),
        }
    }
}

#[derive(Debug, Deserialize)]
struct BatchIsAuthorizedResponse {
    results: Vec<DecisionResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GetPolicyRequest<'a> {
    policy_store_id: &'a str,
    policy_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct GetPolicyResponse {
    #[serde(default)]
    definition: Option<PolicyDefinition>,
}

#[derive(Debug, Deserialize)]
struct PolicyDefinition {
    #[serde(default, rename = "static")]
    static_definition: Option<StaticPolicyDefinition>,
}

#[derive(Debug, Deserialize)]
struct StaticPolicyDefinition {
    #[serde(default)]
    description: Option<String>,
}

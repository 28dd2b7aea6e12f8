//! Port to the remote policy decision service.

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{AuthorizationQuery, Decision};

/// Transport-level failures talking to the decision service.
///
/// An explicit DENY is a [`Decision`], never an error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecisionServiceError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("decision service returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("could not decode decision service response: {0}")]
    Decode(String),

    #[error("rule not found: {0}")]
    RuleNotFound(String),

    #[error("batch response had {actual} decisions for {expected} queries")]
    BatchLength { expected: usize, actual: usize },
}

/// Policy decision service.
///
/// Every call is a fresh evaluation; implementations must not cache decisions
/// and callers must not assume retries are idempotent.
#[async_trait]
pub trait DecisionService: Send + Sync {
    /// Evaluate one query.
    async fn is_authorized(&self, query: &AuthorizationQuery) -> Result<Decision, DecisionServiceError>;

    /// Resolve a determining rule id to its human-readable description.
    async fn get_rule_description(&self, rule_id: &str) -> Result<String, DecisionServiceError>;

    /// Evaluate several queries; decisions come back in input order.
    ///
    /// The default issues every query concurrently through
    /// [`DecisionService::is_authorized`] and fails as a whole if any call fails.
    async fn batch_is_authorized(
        &self,
        queries: &[AuthorizationQuery],
    ) -> Result<Vec<Decision>, DecisionServiceError> {
        futures::future::try_join_all(queries.iter().map(|q| self.is_authorized(q))).await
    }
}

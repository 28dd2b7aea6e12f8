//! Batch coordinator for the two-resource publisher path.

use std::sync::Arc;

use bookstore_auth::AuthorizationContext;
use bookstore_catalog::FilterOutcome;

use crate::error::AuthzError;
use crate::model::{AuthorizationQuery, Decision};
use crate::service::{DecisionService, DecisionServiceError};

#[derive(Clone)]
pub struct BatchCoordinator {
    service: Arc<dyn DecisionService>,
}

impl BatchCoordinator {
    pub fn new(service: Arc<dyn DecisionService>) -> Self {
        Self { service }
    }

    /// Evaluate both queries and return both decisions, uninterpreted.
    ///
    /// The queries have no ordering dependency and are issued together. If
    /// either evaluation fails the whole batch fails; there is no one-sided
    /// result.
    pub async fn run_batch(&self, queries: (AuthorizationQuery, AuthorizationQuery)) -> Result<(Decision, Decision), AuthzError> {
        let (first, second) = queries;
        let decisions = self.service.batch_is_authorized(&[first, second]).await?;

        let [a, b]: [Decision; 2] = decisions.try_into().map_err(|d: Vec<Decision>| {
            AuthzError::DecisionServiceUnavailable(DecisionServiceError::BatchLength {
                expected: 2,
                actual: d.len(),
            })
        })?;

        tracing::debug!(first = ?a.outcome, second = ?b.outcome, "batch evaluated");
        Ok((a, b))
    }

    /// Merge two batched decisions into one filter.
    ///
    /// Extension point: no merge policy is defined, so this always returns
    /// [`AuthzError::BatchCombinationNotImplemented`] instead of guessing.
    /// A merged outcome flows through the same catalog filtering as the single path.
    pub fn combine(_decisions: &(Decision, Decision), _ctx: &AuthorizationContext) -> Result<FilterOutcome, AuthzError> {
        Err(AuthzError::BatchCombinationNotImplemented)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::Barrier;

    use super::*;
    use crate::QueryConstructor;
    use crate::testing::ScriptedDecisionService;
    use bookstore_auth::{Region, Role};
    use bookstore_core::Username;

    fn dante() -> AuthorizationContext {
        AuthorizationContext::new(Username::new("Dante"), Role::Publisher, None, Region::new("US"))
    }

    fn pair() -> (AuthorizationQuery, AuthorizationQuery) {
        QueryConstructor::default().construct_batch(&dante()).unwrap()
    }

    #[tokio::test]
    async fn returns_both_decisions_in_query_order() {
        let svc = ScriptedDecisionService::new(|q| {
            if q.resource.entity_id.starts_with("fn2") {
                Ok(Decision::allow("p-own"))
            } else {
                Ok(Decision::deny("p-not-owner"))
            }
        });

        let (a, b) = BatchCoordinator::new(Arc::new(svc)).run_batch(pair()).await.unwrap();
        assert_eq!(a, Decision::allow("p-own"));
        assert_eq!(b, Decision::deny("p-not-owner"));
    }

    #[tokio::test]
    async fn one_failed_call_fails_the_batch() {
        let svc = ScriptedDecisionService::new(|q| {
            if q.resource.entity_id.starts_with("em1") {
                Err(DecisionServiceError::Transport("connection reset".to_string()))
            } else {
                Ok(Decision::allow("p-own"))
            }
        });

        let err = BatchCoordinator::new(Arc::new(svc)).run_batch(pair()).await.unwrap_err();
        assert!(matches!(err, AuthzError::DecisionServiceUnavailable(_)));
    }

    /// Blocks each call until both are in flight, so a sequential
    /// implementation would never finish.
    struct RendezvousService {
        barrier: Barrier,
    }

    #[async_trait]
    impl DecisionService for RendezvousService {
        async fn is_authorized(&self, _query: &AuthorizationQuery) -> Result<Decision, DecisionServiceError> {
            self.barrier.wait().await;
            Ok(Decision::allow("p-any"))
        }

        async fn get_rule_description(&self, _rule_id: &str) -> Result<String, DecisionServiceError> {
            Ok(String::new())
        }
    }

    #[tokio::test]
    async fn queries_are_issued_concurrently() {
        let svc = RendezvousService {
            barrier: Barrier::new(2),
        };
        let coordinator = BatchCoordinator::new(Arc::new(svc));

        let result = tokio::time::timeout(Duration::from_secs(2), coordinator.run_batch(pair())).await;
        assert!(result.is_ok(), "batch queries were not in flight together");
    }

    struct ShortBatchService;

    #[async_trait]
    impl DecisionService for ShortBatchService {
        async fn is_authorized(&self, _query: &AuthorizationQuery) -> Result<Decision, DecisionServiceError> {
            Ok(Decision::allow("p-any"))
        }

        async fn get_rule_description(&self, _rule_id: &str) -> Result<String, DecisionServiceError> {
            Ok(String::new())
        }

        async fn batch_is_authorized(&self, _queries: &[AuthorizationQuery]) -> Result<Vec<Decision>, DecisionServiceError> {
            Ok(vec![Decision::allow("p-any")])
        }
    }

    #[tokio::test]
    async fn short_batch_response_is_rejected() {
        let err = BatchCoordinator::new(Arc::new(ShortBatchService))
            .run_batch(pair())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            AuthzError::DecisionServiceUnavailable(DecisionServiceError::BatchLength { expected: 2, actual: 1 })
        );
    }

    #[test]
    fn combine_is_not_implemented() {
        let decisions = (Decision::allow("a"), Decision::allow("b"));
        assert_eq!(
            BatchCoordinator::combine(&decisions, &dante()),
            Err(AuthzError::BatchCombinationNotImplemented)
        );
    }
}

//! In-crate test doubles for the decision service.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::model::{AuthorizationQuery, Decision};
use crate::service::{DecisionService, DecisionServiceError};

type Responder = Box<dyn Fn(&AuthorizationQuery) -> Result<Decision, DecisionServiceError> + Send + Sync>;

/// Decision service answering from a closure, with a fixed rule → description map.
pub struct ScriptedDecisionService {
    respond: Responder,
    descriptions: HashMap<String, String>,
    pub queries: Mutex<Vec<AuthorizationQuery>>,
    pub lookups: AtomicUsize,
}

impl ScriptedDecisionService {
    pub fn new(
        respond: impl Fn(&AuthorizationQuery) -> Result<Decision, DecisionServiceError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            respond: Box::new(respond),
            descriptions: HashMap::new(),
            queries: Mutex::new(Vec::new()),
            lookups: AtomicUsize::new(0),
        }
    }

    /// Always answer with `decision`.
    pub fn always(decision: Decision) -> Self {
        Self::new(move |_| Ok(decision.clone()))
    }

    pub fn with_rule(mut self, rule_id: &str, description: &str) -> Self {
        self.descriptions.insert(rule_id.to_string(), description.to_string());
        self
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn recorded_queries(&self) -> Vec<AuthorizationQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl DecisionService for ScriptedDecisionService {
    async fn is_authorized(&self, query: &AuthorizationQuery) -> Result<Decision, DecisionServiceError> {
        self.queries.lock().unwrap().push(query.clone());
        (self.respond)(query)
    }

    async fn get_rule_description(&self, rule_id: &str) -> Result<String, DecisionServiceError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.descriptions
            .get(rule_id)
            .cloned()
            .ok_or_else(|| DecisionServiceError::RuleNotFound(rule_id.to_string()))
    }
}

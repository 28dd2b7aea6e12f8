//! End-to-end catalog authorization: token in, visible products out.

use std::net::IpAddr;
use std::sync::Arc;

use tracing::Instrument;

use bookstore_auth::{AuthorizationContext, ContextBuilder, IdentityVerifier, RegionResolver};
use bookstore_catalog::{CatalogStore, FilterOutcome, Product, apply};

use crate::batch::BatchCoordinator;
use crate::error::AuthzError;
use crate::interpreter::DecisionInterpreter;
use crate::policy::PolicySurface;
use crate::query::QueryConstructor;
use crate::rationale::RationaleTable;
use crate::service::DecisionService;

/// Wires the decision pipeline together.
///
/// Stateless between requests: every call builds a fresh context, asks the
/// decision service again and filters the catalog it loads. Cheap to clone.
#[derive(Clone)]
pub struct CatalogAuthorizer {
    verifier: Arc<dyn IdentityVerifier>,
    contexts: ContextBuilder,
    queries: QueryConstructor,
    service: Arc<dyn DecisionService>,
    interpreter: DecisionInterpreter,
    batch: BatchCoordinator,
    catalog: Arc<dyn CatalogStore>,
}

impl CatalogAuthorizer {
    pub fn new(
        verifier: Arc<dyn IdentityVerifier>,
        service: Arc<dyn DecisionService>,
        catalog: Arc<dyn CatalogStore>,
    ) -> Self {
        Self {
            verifier,
            contexts: ContextBuilder::default(),
            queries: QueryConstructor::default(),
            interpreter: DecisionInterpreter::new(service.clone()),
            batch: BatchCoordinator::new(service.clone()),
            service,
            catalog,
        }
    }

    pub fn with_region_resolver(mut self, regions: Arc<dyn RegionResolver>) -> Self {
        self.contexts = ContextBuilder::new(regions);
        self
    }

    pub fn with_policy_surface(mut self, surface: PolicySurface) -> Self {
        self.queries = QueryConstructor::new(surface);
        self
    }

    pub fn with_rationales(mut self, rationales: RationaleTable) -> Self {
        self.interpreter = DecisionInterpreter::with_rationales(self.service.clone(), rationales);
        self
    }

    /// Build the context for a request. Never fails.
    ///
    /// A missing token and a token the verifier rejects are treated the same:
    /// the context is made of sentinels.
    pub fn context_for(&self, token: Option<&str>, source_addr: Option<IpAddr>) -> AuthorizationContext {
        let attributes = token.and_then(|token| match self.verifier.verify(token) {
            Ok(attributes) => Some(attributes),
            Err(e) => {
                tracing::warn!(error = %e, "identity verification failed; continuing unauthenticated");
                None
            }
        });
        self.contexts.build(attributes.as_ref(), source_addr)
    }

    /// Products visible to the caller presenting `token` from `source_addr`.
    pub async fn visible_products(&self, token: Option<&str>, source_addr: Option<IpAddr>) -> Result<Vec<Product>, AuthzError> {
        let ctx = self.context_for(token, source_addr);
        self.visible_products_for(&ctx).await
    }

    /// Products visible to an already-built context.
    pub async fn visible_products_for(&self, ctx: &AuthorizationContext) -> Result<Vec<Product>, AuthzError> {
        let span = tracing::info_span!(
            "catalog_authorization",
            username = %ctx.username(),
            role = %ctx.role(),
            region = %ctx.region(),
        );
        self.run(ctx).instrument(span).await
    }

    async fn run(&self, ctx: &AuthorizationContext) -> Result<Vec<Product>, AuthzError> {
        let outcome = match self.queries.construct_batch(ctx) {
            Some(pair) => {
                tracing::info!("publisher takes the batched path");
                let decisions = self.batch.run_batch(pair).await?;
                tracing::info!(first = ?decisions.0, second = ?decisions.1, "batch decisions");
                BatchCoordinator::combine(&decisions, ctx)?
            }
            None => self.decide_single(ctx).await?,
        };

        let catalog = self.catalog.load_catalog().await?;
        let visible = apply(&outcome, &catalog);

        tracing::info!(verdict = %outcome.verdict(), visible = visible.len(), total = catalog.len(), "catalog filtered");
        Ok(visible)
    }

    async fn decide_single(&self, ctx: &AuthorizationContext) -> Result<FilterOutcome, AuthzError> {
        let query = self.queries.construct_single(ctx);
        tracing::debug!(
            action = %query.action.action_id,
            resource = %query.resource,
            entities = query.entities.len(),
            "authorization query built"
        );

        let decision = self.service.is_authorized(&query).await?;
        tracing::info!(
            outcome = ?decision.outcome,
            rule_id = ?decision.determining_rule_id,
            "decision received"
        );

        self.interpreter.interpret(&decision, ctx).await
    }
}

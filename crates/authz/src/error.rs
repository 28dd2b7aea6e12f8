use thiserror::Error;

use bookstore_catalog::CatalogError;

use crate::service::DecisionServiceError;

/// Failures of the decision pipeline.
///
/// None of these fall back to an unfiltered catalog: the request fails instead.
/// A context built from sentinels is not an error and never shows up here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    /// The decision cannot be interpreted (no determining rule, or an outcome
    /// outside ALLOW/DENY). Distinct from a legitimate DENY.
    #[error("decision unresolvable: {0}")]
    DecisionUnresolvable(String),

    #[error("decision service unavailable: {0}")]
    DecisionServiceUnavailable(#[from] DecisionServiceError),

    /// Combining batched decisions into one product list has no defined policy yet.
    #[error("combining batched decisions is not implemented")]
    BatchCombinationNotImplemented,

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl AuthzError {
    pub fn unresolvable(msg: impl Into<String>) -> Self {
        Self::DecisionUnresolvable(msg.into())
    }

    /// Stable machine-readable code for logs and API responses.
    pub fn code(&self) -> &'static str {
        match self {
            AuthzError::DecisionUnresolvable(_) => "decision_unresolvable",
            AuthzError::DecisionServiceUnavailable(_) => "decision_service_unavailable",
            AuthzError::BatchCombinationNotImplemented => "not_implemented",
            AuthzError::Catalog(_) => "catalog_unavailable",
        }
    }
}

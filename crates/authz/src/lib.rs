//! `bookstore-authz`: the decision pipeline.
//!
//! Flow for one request:
//!
//! 1. [`bookstore_auth::ContextBuilder`] normalises identity attributes.
//! 2. [`QueryConstructor`] builds the authorization query (or the batch pair).
//! 3. A [`DecisionService`] evaluates it remotely.
//! 4. [`DecisionInterpreter`] resolves the determining rule's rationale and
//!    emits a [`bookstore_catalog::FilterOutcome`].
//! 5. [`bookstore_catalog::apply`] produces the visible product list.
//!
//! [`CatalogAuthorizer`] wires the steps together; [`BatchCoordinator`]
//! handles the two-resource special case.

pub mod batch;
pub mod error;
pub mod interpreter;
pub mod model;
pub mod pipeline;
pub mod policy;
pub mod query;
pub mod rationale;
pub mod service;

#[cfg(test)]
mod testing;

pub use batch::BatchCoordinator;
pub use error::AuthzError;
pub use interpreter::DecisionInterpreter;
pub use model::{
    ActionUid, AttributeValue, AuthorizationQuery, Decision, DecisionOutcome, EntityFact, EntityUid,
};
pub use pipeline::CatalogAuthorizer;
pub use policy::{BatchPair, OwnedBook, PolicySurface};
pub use query::QueryConstructor;
pub use rationale::{Rationale, RationaleTable};
pub use service::{DecisionService, DecisionServiceError};

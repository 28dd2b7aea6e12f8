//! `bookstore-auth`: identity attributes and the canonical authorization context.
//!
//! This crate is intentionally decoupled from HTTP and from the decision
//! service: it turns whatever the identity verifier produced (or nothing at
//! all) into an [`AuthorizationContext`] and never fails doing so.

pub mod claims;
pub mod context;
pub mod region;
pub mod roles;
pub mod verifier;

pub use claims::IdentityAttributes;
pub use context::{AuthorizationContext, ContextBuilder, UNKNOWN_USERNAME};
pub use region::{Region, RegionResolver, UsernameRegionResolver};
pub use roles::Role;
pub use verifier::{IdentityVerifier, StaticIdentityVerifier, VerifyError};

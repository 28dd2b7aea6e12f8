//! Decision service adapters.
//!
//! - [`HttpDecisionService`]: remote policy decision service over HTTP/JSON.
//! - [`StaticDecisionService`]: in-process rule list for local development and tests.

pub mod http;
pub mod static_rules;

pub use http::HttpDecisionService;
pub use static_rules::{Effect, StaticDecisionService, StaticRule};

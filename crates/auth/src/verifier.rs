use std::collections::HashMap;

use thiserror::Error;

use crate::IdentityAttributes;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerifyError {
    #[error("token is malformed")]
    Malformed,

    #[error("token rejected: {0}")]
    Rejected(String),
}

/// Validates a bearer token and returns the attributes it vouches for.
///
/// Signature checking, revocation and claim-schema evolution live behind this
/// trait; the authorization pipeline only sees the resulting attributes.
pub trait IdentityVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<IdentityAttributes, VerifyError>;
}

/// Fixed token → identity table.
///
/// Used for local development and tests in place of a real identity provider.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentityVerifier {
    identities: HashMap<String, IdentityAttributes>,
}

impl StaticIdentityVerifier {
    pub fn new(identities: HashMap<String, IdentityAttributes>) -> Self {
        Self { identities }
    }

    pub fn with_identity(mut self, token: impl Into<String>, attributes: IdentityAttributes) -> Self {
        self.identities.insert(token.into(), attributes);
        self
    }

    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }
}

impl IdentityVerifier for StaticIdentityVerifier {
    fn verify(&self, token: &str) -> Result<IdentityAttributes, VerifyError> {
        let token = token.trim();
        if token.is_empty() || token.chars().any(char::is_whitespace) {
            return Err(VerifyError::Malformed);
        }

        self.identities
            .get(token)
            .cloned()
            .ok_or_else(|| VerifyError::Rejected("unknown token".to_string()))
    }
}

use std::net::IpAddr;

use uuid::Uuid;

/// What the transport knows about the caller of a request.
///
/// Set by [`crate::middleware::request_context`] for every route. The token is
/// raw and unverified; it must never be logged.
#[derive(Clone, PartialEq, Eq)]
pub struct CallerContext {
    request_id: Uuid,
    token: Option<String>,
    source_addr: Option<IpAddr>,
}

impl CallerContext {
    pub fn new(request_id: Uuid, token: Option<String>, source_addr: Option<IpAddr>) -> Self {
        Self {
            request_id,
            token,
            source_addr,
        }
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn source_addr(&self) -> Option<IpAddr> {
        self.source_addr
    }
}

impl std::fmt::Debug for CallerContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallerContext")
            .field("request_id", &self.request_id)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("source_addr", &self.source_addr)
            .finish()
    }
}

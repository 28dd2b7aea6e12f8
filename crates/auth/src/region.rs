use std::collections::HashMap;
use std::net::IpAddr;

use serde::{Deserialize, Serialize};

use bookstore_core::Username;

/// Region the request is considered to originate from.
///
/// Always present: [`Region::unknown`] stands in when nothing could be derived.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Region(String);

impl Region {
    pub const UNKNOWN: &'static str = "Unknown";

    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn unknown() -> Self {
        Self(Self::UNKNOWN.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_unknown(&self) -> bool {
        self.0 == Self::UNKNOWN
    }
}

impl core::fmt::Display for Region {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derives a region for a verified principal.
///
/// Implementations are authoritative and must not fail; ambiguity resolves to
/// a fallback region.
pub trait RegionResolver: Send + Sync {
    fn resolve_region(&self, source_addr: Option<IpAddr>, username: &Username) -> Region;
}

/// Naive resolver keyed on the username; the source address is ignored.
///
/// Stands in for a geo-IP lookup until one exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsernameRegionResolver {
    overrides: HashMap<Username, Region>,
    fallback: Region,
}

impl UsernameRegionResolver {
    pub fn new(fallback: Region) -> Self {
        Self {
            overrides: HashMap::new(),
            fallback,
        }
    }

    pub fn with_override(mut self, username: impl Into<Username>, region: Region) -> Self {
        self.overrides.insert(username.into(), region);
        self
    }
}

impl Default for UsernameRegionResolver {
    fn default() -> Self {
        Self::new(Region::new("US")).with_override("Toby", Region::new("UK"))
    }
}

impl RegionResolver for UsernameRegionResolver {
    fn resolve_region(&self, _source_addr: Option<IpAddr>, username: &Username) -> Region {
        self.overrides
            .get(username)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

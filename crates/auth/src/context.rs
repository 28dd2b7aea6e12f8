use std::net::IpAddr;
use std::sync::Arc;

use serde::Serialize;

use bookstore_core::Username;

use crate::{IdentityAttributes, Region, RegionResolver, Role, UsernameRegionResolver};

/// Username used when no verified identity is available.
pub const UNKNOWN_USERNAME: &str = "Unknown";

/// Canonical, immutable authorization context for one request.
///
/// Every field has a sentinel for "unknown", so a context can always be built;
/// a degraded context is a valid input that the decision service will deny.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizationContext {
    username: Username,
    role: Role,
    membership_tenure: Option<u32>,
    region: Region,
}

impl AuthorizationContext {
    pub fn new(username: Username, role: Role, membership_tenure: Option<u32>, region: Region) -> Self {
        Self {
            username,
            role,
            membership_tenure,
            region,
        }
    }

    /// Context made entirely of sentinels (no token, or an unverifiable one).
    pub fn anonymous() -> Self {
        Self::new(Username::new(UNKNOWN_USERNAME), Role::Unknown, None, Region::unknown())
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn membership_tenure(&self) -> Option<u32> {
        self.membership_tenure
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    /// True when any attribute fell back to its sentinel.
    pub fn is_degraded(&self) -> bool {
        self.username.as_str() == UNKNOWN_USERNAME || self.role.is_unknown() || self.region.is_unknown()
    }
}

/// Builds an [`AuthorizationContext`] from verified identity attributes.
///
/// - No IO (region derivation is delegated to the injected resolver)
/// - No failures: missing or malformed attributes become sentinels
#[derive(Clone)]
pub struct ContextBuilder {
    regions: Arc<dyn RegionResolver>,
}

impl ContextBuilder {
    pub fn new(regions: Arc<dyn RegionResolver>) -> Self {
        Self { regions }
    }

    pub fn build(&self, attributes: Option<&IdentityAttributes>, source_addr: Option<IpAddr>) -> AuthorizationContext {
        let Some(attributes) = attributes else {
            tracing::debug!("no verified identity; using anonymous context");
            return AuthorizationContext::anonymous();
        };

        let username = attributes
            .username
            .as_deref()
            .map(str::trim)
            .and_then(|u| u.parse::<Username>().ok())
            .unwrap_or_else(|| Username::new(UNKNOWN_USERNAME));
        let role = Role::parse(attributes.role.as_deref());
        let membership_tenure = attributes.membership_tenure();
        let region = self.regions.resolve_region(source_addr, &username);

        let ctx = AuthorizationContext::new(username, role, membership_tenure, region);
        if ctx.is_degraded() {
            tracing::warn!(
                username = %ctx.username,
                role = %ctx.role,
                region = %ctx.region,
                "identity attributes incomplete; context degraded to sentinels"
            );
        }
        ctx
    }
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new(Arc::new(UsernameRegionResolver::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_identity_yields_all_sentinels() {
        let ctx = ContextBuilder::default().build(None, None);

        assert_eq!(ctx, AuthorizationContext::anonymous());
        assert_eq!(ctx.username().as_str(), "Unknown");
        assert!(ctx.role().is_unknown());
        assert_eq!(ctx.membership_tenure(), None);
        assert!(ctx.region().is_unknown());
        assert!(ctx.is_degraded());
    }

    #[test]
    fn verified_customer_with_tenure() {
        let attrs = IdentityAttributes::new("Andrew", "Customer").with_years_as_member("5");
        let ctx = ContextBuilder::default().build(Some(&attrs), None);

        assert_eq!(ctx.username().as_str(), "Andrew");
        assert_eq!(ctx.role(), &Role::Customer);
        assert_eq!(ctx.membership_tenure(), Some(5));
        assert_eq!(ctx.region().as_str(), "US");
        assert!(!ctx.is_degraded());
    }

    #[test]
    fn region_comes_from_resolver() {
        let attrs = IdentityAttributes::new("Toby", "Customer");
        let ctx = ContextBuilder::default().build(Some(&attrs), "198.51.100.1".parse().ok());
        assert_eq!(ctx.region().as_str(), "UK");
    }

    #[test]
    fn partial_attributes_degrade_without_failing() {
        let attrs = IdentityAttributes {
            username: Some("   ".to_string()),
            role: None,
            years_as_member: Some(serde_json::json!("Unknown")),
        };
        let ctx = ContextBuilder::default().build(Some(&attrs), None);

        assert_eq!(ctx.username().as_str(), UNKNOWN_USERNAME);
        assert!(ctx.role().is_unknown());
        assert_eq!(ctx.membership_tenure(), None);
        assert!(ctx.is_degraded());
    }
}

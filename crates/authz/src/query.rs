//! Query constructor: turns an [`AuthorizationContext`] into authorization
//! queries.
//!
//! The rules here encode the policy surface and must stay in step with the
//! policy store:
//!
//! 1. Action defaults to `View`.
//! 2. A `Customer` with known tenure asks for `ViewPremiumOffers` and carries
//!    `yearsAsMember` on its principal fact.
//! 3. A `Publisher` is narrowed to the well-known publisher book, with an
//!    ownership fact naming the publisher as owner.
//! 4. `region` is always in the context map.
//! 5. The principal's role edge is always present.
//!
//! Construction never fails: sentinel contexts produce queries the decision
//! service will deny.

use std::collections::BTreeMap;

use bookstore_auth::{AuthorizationContext, Role};
use bookstore_core::{BookId, Username};

use crate::model::{AttributeValue, AuthorizationQuery, EntityFact};
use crate::policy::{
    ACTION_VIEW, ACTION_VIEW_PREMIUM_OFFERS, ATTR_OWNER, ATTR_YEARS_AS_MEMBER, CONTEXT_REGION, PolicySurface,
};

#[derive(Debug, Clone, Default)]
pub struct QueryConstructor {
    surface: PolicySurface,
}

impl QueryConstructor {
    pub fn new(surface: PolicySurface) -> Self {
        Self { surface }
    }

    pub fn surface(&self) -> &PolicySurface {
        &self.surface
    }

    pub fn construct_single(&self, ctx: &AuthorizationContext) -> AuthorizationQuery {
        let mut principal_fact = self.principal_fact(ctx);
        let mut action_id = ACTION_VIEW;

        if let (Role::Customer, Some(years)) = (ctx.role(), ctx.membership_tenure()) {
            action_id = ACTION_VIEW_PREMIUM_OFFERS;
            principal_fact = principal_fact.with_attribute(ATTR_YEARS_AS_MEMBER, AttributeValue::Long(i64::from(years)));
        }

        let mut entities = vec![principal_fact];
        let resource = if *ctx.role() == Role::Publisher {
            let book = self.surface.publisher_book.clone();
            entities.push(self.ownership_fact(&book, ctx.username()));
            self.surface.book(&book)
        } else {
            self.surface.all_books()
        };

        AuthorizationQuery {
            principal: self.surface.user(ctx.username()),
            action: self.surface.action(action_id),
            resource,
            entities,
            context: self.context_map(ctx),
        }
    }

    /// Two independent single-resource `View` queries for the same principal.
    ///
    /// Tenure is not considered on this path.
    pub fn construct_for_batch_pair(
        &self,
        ctx: &AuthorizationContext,
        resource_a: &BookId,
        owner_a: &Username,
        resource_b: &BookId,
        owner_b: &Username,
    ) -> (AuthorizationQuery, AuthorizationQuery) {
        (
            self.resource_query(ctx, resource_a, owner_a),
            self.resource_query(ctx, resource_b, owner_b),
        )
    }

    /// Whether `ctx` takes the batched path.
    pub fn is_batch_eligible(&self, ctx: &AuthorizationContext) -> bool {
        *ctx.role() == Role::Publisher && *ctx.username() == self.surface.batch.publisher
    }

    /// Batch pair for `ctx` using the configured resources, if eligible.
    pub fn construct_batch(&self, ctx: &AuthorizationContext) -> Option<(AuthorizationQuery, AuthorizationQuery)> {
        if !self.is_batch_eligible(ctx) {
            return None;
        }
        let pair = &self.surface.batch;
        Some(self.construct_for_batch_pair(
            ctx,
            &pair.first.book,
            &pair.first.owner,
            &pair.second.book,
            &pair.second.owner,
        ))
    }

    fn resource_query(&self, ctx: &AuthorizationContext, book: &BookId, owner: &Username) -> AuthorizationQuery {
        AuthorizationQuery {
            principal: self.surface.user(ctx.username()),
            action: self.surface.action(ACTION_VIEW),
            resource: self.surface.book(book),
            entities: vec![self.principal_fact(ctx), self.ownership_fact(book, owner)],
            context: self.context_map(ctx),
        }
    }

    fn principal_fact(&self, ctx: &AuthorizationContext) -> EntityFact {
        EntityFact::new(self.surface.user(ctx.username())).with_parent(self.surface.role(ctx.role().as_str()))
    }

    fn ownership_fact(&self, book: &BookId, owner: &Username) -> EntityFact {
        EntityFact::new(self.surface.book(book))
            .with_attribute(ATTR_OWNER, AttributeValue::EntityIdentifier(self.surface.user(owner)))
    }

    fn context_map(&self, ctx: &AuthorizationContext) -> BTreeMap<String, AttributeValue> {
        BTreeMap::from([(
            CONTEXT_REGION.to_string(),
            AttributeValue::String(ctx.region().as_str().to_string()),
        )])
    }
}

//! The storefront's policy surface: entity types, action ids and the
//! well-known resources that the policy store's rules reference.
//!
//! These values must agree with the deployed policy store; defaults match the
//! `Bookstore` namespace.

use serde::{Deserialize, Serialize};

use bookstore_core::{BookId, Username};

use crate::model::{ActionUid, EntityUid};

pub const ACTION_VIEW: &str = "View";
pub const ACTION_VIEW_PREMIUM_OFFERS: &str = "ViewPremiumOffers";

/// Resource id meaning "all books".
pub const ALL_BOOKS: &str = "*";

pub const ATTR_YEARS_AS_MEMBER: &str = "yearsAsMember";
pub const ATTR_OWNER: &str = "owner";
pub const CONTEXT_REGION: &str = "region";

/// A book together with the user the policy store should treat as its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnedBook {
    pub book: BookId,
    pub owner: Username,
}

impl OwnedBook {
    pub fn new(book: impl Into<BookId>, owner: impl Into<Username>) -> Self {
        Self {
            book: book.into(),
            owner: owner.into(),
        }
    }
}

/// The publisher whose requests take the batched two-resource path, and the
/// two resources checked for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchPair {
    pub publisher: Username,
    pub first: OwnedBook,
    pub second: OwnedBook,
}

impl Default for BatchPair {
    fn default() -> Self {
        Self {
            publisher: Username::new("Dante"),
            first: OwnedBook::new("fn2padaa-c33l-4ea8-ll44-g7n217604p4n", "Dante"),
            second: OwnedBook::new("em1oadaa-b22k-4ea8-kk33-f6m217604o3m", "William"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicySurface {
    /// Entity namespace, e.g. `Bookstore` for `Bookstore::User`.
    pub namespace: String,
    /// Book a publisher's single query is narrowed to.
    pub publisher_book: BookId,
    pub batch: BatchPair,
}

impl Default for PolicySurface {
    fn default() -> Self {
        Self {
            namespace: "Bookstore".to_string(),
            publisher_book: BookId::new("fn2padaa-c33l-4ea8-ll44-g7n217604p4n"),
            batch: BatchPair::default(),
        }
    }
}

impl PolicySurface {
    fn qualified(&self, kind: &str) -> String {
        format!("{}::{kind}", self.namespace)
    }

    pub fn user(&self, username: &Username) -> EntityUid {
        EntityUid::new(self.qualified("User"), username.as_str())
    }

    pub fn role(&self, role: &str) -> EntityUid {
        EntityUid::new(self.qualified("Role"), role)
    }

    pub fn book(&self, book: &BookId) -> EntityUid {
        EntityUid::new(self.qualified("Book"), book.as_str())
    }

    pub fn all_books(&self) -> EntityUid {
        EntityUid::new(self.qualified("Book"), ALL_BOOKS)
    }

    pub fn action(&self, action_id: &str) -> ActionUid {
        ActionUid::new(self.qualified("Action"), action_id)
    }
}

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use bookstore_core::BookId;

/// A catalog record.
///
/// Only `publisher` and `premiumOffer` are interpreted by the storefront; all
/// other fields (title, author, price, cover, ...) are carried through
/// untouched in `details`. The id is optional and never consulted by the filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<BookId>,
    pub publisher: String,
    #[serde(rename = "premiumOffer")]
    pub premium_offer: bool,
    #[serde(flatten)]
    pub details: Map<String, JsonValue>,
}

impl Product {
    pub fn new(id: impl Into<BookId>, publisher: impl Into<String>, premium_offer: bool) -> Self {
        Self {
            id: Some(id.into()),
            publisher: publisher.into(),
            premium_offer,
            details: Map::new(),
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    pub fn book_id(&self) -> Option<&str> {
        self.id.as_ref().map(BookId::as_str)
    }

    pub fn is_published_by(&self, publisher: &str) -> bool {
        self.publisher == publisher
    }
}

/// On-disk / over-the-wire catalog document: `{"books": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogDocument {
    pub books: Vec<Product>,
}

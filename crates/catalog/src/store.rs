use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::Product;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog unavailable: {0}")]
    Unavailable(String),

    #[error("catalog malformed: {0}")]
    Malformed(String),
}

/// Read-only source of the raw, unfiltered catalog.
///
/// Freshness (load once vs. per call) is the implementation's concern; the
/// returned list is shared and must never be mutated by callers.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn load_catalog(&self) -> Result<Arc<[Product]>, CatalogError>;
}

/// Fixed in-memory catalog (tests, demos, or a catalog loaded at startup).
#[derive(Debug, Clone)]
pub struct InMemoryCatalog {
    products: Arc<[Product]>,
}

impl InMemoryCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: products.into(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn load_catalog(&self) -> Result<Arc<[Product]>, CatalogError> {
        Ok(self.products.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_catalog_shares_one_copy() {
        let store = InMemoryCatalog::new(vec![Product::new("b-1", "Dante", false)]);

        let first = store.load_catalog().await.unwrap();
        let second = store.load_catalog().await.unwrap();

        assert_eq!(first.len(), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn empty_catalog_loads() {
        let store = InMemoryCatalog::empty();
        assert!(store.is_empty());
        assert!(store.load_catalog().await.unwrap().is_empty());
    }
}

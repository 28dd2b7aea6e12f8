use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;

use bookstore_catalog::{CatalogDocument, CatalogError, CatalogStore, Product};

/// Catalog read from a `{"books": [...]}` JSON document.
///
/// The file is read on first use and cached for the life of the process. A
/// failed read is not cached; the next call tries again.
#[derive(Debug)]
pub struct JsonFileCatalog {
    path: PathBuf,
    products: OnceCell<Arc<[Product]>>,
}

impl JsonFileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            products: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<Arc<[Product]>, CatalogError> {
        let raw = tokio::fs::read(&self.path)
            .await
            .map_err(|e| CatalogError::Unavailable(format!("{}: {e}", self.path.display())))?;
        let document: CatalogDocument = serde_json::from_slice(&raw)
            .map_err(|e| CatalogError::Malformed(format!("{}: {e}", self.path.display())))?;

        tracing::info!(path = %self.path.display(), books = document.books.len(), "catalog loaded");
        Ok(document.books.into())
    }
}

#[async_trait]
impl CatalogStore for JsonFileCatalog {
    async fn load_catalog(&self) -> Result<Arc<[Product]>, CatalogError> {
        self.products.get_or_try_init(|| self.read()).await.cloned()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_catalog(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn loads_books_in_file_order_and_keeps_extra_fields() {
        let file = write_catalog(
            r#"{"books": [
                {"id": "b-2", "publisher": "William", "premiumOffer": true, "title": "Sonnets"},
                {"id": "b-1", "publisher": "Dante", "premiumOffer": false}
            ]}"#,
        );
        let catalog = JsonFileCatalog::new(file.path());

        let books = catalog.load_catalog().await.unwrap();
        assert_eq!(books.len(), 2);
        assert_eq!(books[0].book_id(), Some("b-2"));
        assert_eq!(books[0].details.get("title"), Some(&serde_json::json!("Sonnets")));
        assert_eq!(books[1].publisher, "Dante");
    }

    #[tokio::test]
    async fn second_load_is_served_from_cache() {
        let file = write_catalog(r#"{"books": []}"#);
        let catalog = JsonFileCatalog::new(file.path());

        let first = catalog.load_catalog().await.unwrap();
        std::fs::write(file.path(), "not json").unwrap();
        let second = catalog.load_catalog().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn missing_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = JsonFileCatalog::new(dir.path().join("absent.json"));
        assert!(matches!(catalog.load_catalog().await, Err(CatalogError::Unavailable(_))));
    }

    #[tokio::test]
    async fn bad_document_is_malformed_and_retried() {
        let file = write_catalog(r#"{"books": [{"id": "b-1"}]}"#);
        let catalog = JsonFileCatalog::new(file.path());
        assert!(matches!(catalog.load_catalog().await, Err(CatalogError::Malformed(_))));

        std::fs::write(file.path(), r#"{"books": []}"#).unwrap();
        assert!(catalog.load_catalog().await.unwrap().is_empty());
    }
}

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use bookstore_auth::{IdentityAttributes, StaticIdentityVerifier};
use bookstore_authz::{CatalogAuthorizer, DecisionService};
use bookstore_catalog::{CatalogStore, InMemoryCatalog};
use bookstore_infra::catalog::JsonFileCatalog;
use bookstore_infra::decision_service::{HttpDecisionService, StaticDecisionService};

use crate::config::AppConfig;

/// Wire the catalog authorizer from configuration.
///
/// The catalog file and the identities file are read here so a bad path fails
/// startup instead of the first request.
pub async fn build_authorizer(config: &AppConfig) -> anyhow::Result<CatalogAuthorizer> {
    let verifier = match &config.identities_path {
        Some(path) => load_identities(path).await?,
        None => {
            tracing::warn!("IDENTITIES_PATH not set; every caller is treated as anonymous");
            StaticIdentityVerifier::default()
        }
    };

    let service: Arc<dyn DecisionService> = match &config.decision_service_url {
        Some(url) => {
            tracing::info!(%url, policy_store_id = %config.policy_store_id, "using remote decision service");
            Arc::new(
                HttpDecisionService::new(url.as_str(), config.policy_store_id.as_str(), config.decision_timeout)
                    .context("failed to build decision service client")?,
            )
        }
        None => {
            tracing::warn!("DECISION_SERVICE_URL not set; using static in-process rules");
            Arc::new(StaticDecisionService::bookstore())
        }
    };

    let catalog: Arc<dyn CatalogStore> = match &config.catalog_path {
        Some(path) => {
            let catalog = JsonFileCatalog::new(path);
            catalog
                .load_catalog()
                .await
                .with_context(|| format!("failed to load catalog from {}", path.display()))?;
            Arc::new(catalog)
        }
        None => {
            tracing::warn!("CATALOG_PATH not set; serving an empty catalog");
            Arc::new(InMemoryCatalog::empty())
        }
    };

    Ok(CatalogAuthorizer::new(Arc::new(verifier), service, catalog))
}

/// Read a JSON object mapping tokens to identity attributes.
pub async fn load_identities(path: &Path) -> anyhow::Result<StaticIdentityVerifier> {
    let raw = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read identities from {}", path.display()))?;
    let identities: HashMap<String, IdentityAttributes> = serde_json::from_slice(&raw)
        .with_context(|| format!("identities file {} is not a token → attributes map", path.display()))?;

    tracing::info!(path = %path.display(), identities = identities.len(), "identities loaded");
    Ok(StaticIdentityVerifier::new(identities))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bookstore_observability::LogFormat;

    use super::*;

    fn config() -> AppConfig {
        AppConfig {
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            decision_service_url: None,
            policy_store_id: String::new(),
            decision_timeout: Duration::from_millis(100),
            catalog_path: None,
            identities_path: None,
            log_format: LogFormat::Json,
        }
    }

    #[tokio::test]
    async fn builds_with_static_defaults() {
        let authz = build_authorizer(&config()).await.unwrap();
        assert!(authz.visible_products(None, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn loads_identities_and_catalog_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let identities = dir.path().join("identities.json");
        let catalog = dir.path().join("books.json");
        std::fs::write(&identities, r#"{"tok-ada": {"username": "Ada", "role": "Admin"}}"#).unwrap();
        std::fs::write(
            &catalog,
            r#"{"books": [{"id": "b-1", "publisher": "Jane", "premiumOffer": true}]}"#,
        )
        .unwrap();

        let authz = build_authorizer(&AppConfig {
            identities_path: Some(identities),
            catalog_path: Some(catalog),
            ..config()
        })
        .await
        .unwrap();

        let visible = authz.visible_products(Some("tok-ada"), None).await.unwrap();
        assert_eq!(visible.len(), 1);
    }

    #[tokio::test]
    async fn unreadable_catalog_fails_startup() {
        let dir = tempfile::tempdir().unwrap();
        let result = build_authorizer(&AppConfig {
            catalog_path: Some(dir.path().join("missing.json")),
            ..config()
        })
        .await;
        assert!(result.is_err());
    }
}

//! Environment-driven configuration, read once at startup.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, anyhow};

use bookstore_observability::LogFormat;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_DECISION_TIMEOUT_MS: u64 = 5000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// Unset means the static in-process decision service.
    pub decision_service_url: Option<String>,
    pub policy_store_id: String,
    pub decision_timeout: Duration,
    /// Unset means an empty catalog.
    pub catalog_path: Option<PathBuf>,
    pub identities_path: Option<PathBuf>,
    pub log_format: LogFormat,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_addr = var("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("BIND_ADDR must be a socket address such as 0.0.0.0:8080")?;

        let decision_timeout = match var("DECISION_TIMEOUT_MS") {
            Some(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("DECISION_TIMEOUT_MS must be milliseconds, got {raw:?}"))?,
            None => DEFAULT_DECISION_TIMEOUT_MS,
        };

        let log_format = match var("LOG_FORMAT") {
            Some(raw) => raw.parse().map_err(|e: String| anyhow!("LOG_FORMAT: {e}"))?,
            None => LogFormat::default(),
        };

        Ok(Self {
            bind_addr,
            decision_service_url: var("DECISION_SERVICE_URL"),
            policy_store_id: var("POLICY_STORE_ID").unwrap_or_default(),
            decision_timeout: Duration::from_millis(decision_timeout),
            catalog_path: var("CATALOG_PATH").map(PathBuf::from),
            identities_path: var("IDENTITIES_PATH").map(PathBuf::from),
            log_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.bind_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(cfg.decision_service_url, None);
        assert_eq!(cfg.policy_store_id, "");
        assert_eq!(cfg.decision_timeout, Duration::from_millis(5000));
        assert_eq!(cfg.catalog_path, None);
        assert_eq!(cfg.log_format, LogFormat::Json);
    }

    #[test]
    fn reads_every_variable() {
        let cfg = config(&[
            ("BIND_ADDR", "127.0.0.1:9000"),
            ("DECISION_SERVICE_URL", "http://pdp.internal"),
            ("POLICY_STORE_ID", "ps-123"),
            ("DECISION_TIMEOUT_MS", "250"),
            ("CATALOG_PATH", "/data/books.json"),
            ("IDENTITIES_PATH", "/data/identities.json"),
            ("LOG_FORMAT", "pretty"),
        ])
        .unwrap();

        assert_eq!(cfg.bind_addr.port(), 9000);
        assert_eq!(cfg.decision_service_url.as_deref(), Some("http://pdp.internal"));
        assert_eq!(cfg.policy_store_id, "ps-123");
        assert_eq!(cfg.decision_timeout, Duration::from_millis(250));
        assert_eq!(cfg.catalog_path, Some(PathBuf::from("/data/books.json")));
        assert_eq!(cfg.identities_path, Some(PathBuf::from("/data/identities.json")));
        assert_eq!(cfg.log_format, LogFormat::Pretty);
    }

    #[test]
    fn blank_values_count_as_unset() {
        let cfg = config(&[("DECISION_SERVICE_URL", "  "), ("CATALOG_PATH", "")]).unwrap();
        assert_eq!(cfg.decision_service_url, None);
        assert_eq!(cfg.catalog_path, None);
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(config(&[("BIND_ADDR", "nowhere")]).is_err());
        assert!(config(&[("DECISION_TIMEOUT_MS", "soon")]).is_err());
        assert!(config(&[("LOG_FORMAT", "xml")]).is_err());
    }
}

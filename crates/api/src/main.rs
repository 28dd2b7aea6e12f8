use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;

use bookstore_api::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    bookstore_observability::init(config.log_format);

    let authorizer = bookstore_api::app::services::build_authorizer(&config).await?;
    let app = bookstore_api::app::build_app(Arc::new(authorizer));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;
    Ok(())
}

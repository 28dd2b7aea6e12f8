use std::sync::Arc;

use axum::{Json, extract::Extension, response::IntoResponse};

use bookstore_authz::CatalogAuthorizer;

use crate::app::{dto, errors};
use crate::context::CallerContext;

/// `GET /products`: the catalog as the caller is allowed to see it.
pub async fn list_visible_products(
    Extension(authorizer): Extension<Arc<CatalogAuthorizer>>,
    Extension(caller): Extension<CallerContext>,
) -> axum::response::Response {
    match authorizer
        .visible_products(caller.token(), caller.source_addr())
        .await
    {
        Ok(products) => Json(dto::ProductsResponse { products }).into_response(),
        Err(e) => {
            tracing::error!(error = %e, code = e.code(), "catalog authorization failed");
            errors::authz_error_to_response(e)
        }
    }
}

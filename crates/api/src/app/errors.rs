use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use bookstore_authz::AuthzError;

pub fn authz_error_to_response(err: AuthzError) -> axum::response::Response {
    let status = match &err {
        AuthzError::DecisionUnresolvable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        AuthzError::DecisionServiceUnavailable(_) => StatusCode::BAD_GATEWAY,
        AuthzError::BatchCombinationNotImplemented => StatusCode::NOT_IMPLEMENTED,
        AuthzError::Catalog(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    json_error(status, err.code(), err.to_string())
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use hotcoffee_infra::InventoryServiceError;

pub fn service_error_to_response(err: InventoryServiceError) -> axum::response::Response {
    match err {
        InventoryServiceError::Validation(msg) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
        }
        InventoryServiceError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        InventoryServiceError::NotFound(msg) => json_error(StatusCode::NOT_FOUND, "not_found", msg),
        InventoryServiceError::Storage { context, source } => {
            tracing::error!(error = %source, "{context}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", context)
        }
    }
}

/// Undecodable JSON body (wrong shape, wrong types, missing content type).
pub fn json_rejection_to_response(rejection: JsonRejection) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "validation_error", rejection.body_text())
}

pub fn query_rejection_to_response(rejection: QueryRejection) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "validation_error", rejection.body_text())
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

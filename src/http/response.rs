//! Error responses in the gateway's JSON error format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Body of every error the HTTP side returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

/// Build an error response.
pub fn error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    let body = ErrorBody {
        code,
        message: message.into(),
    };
    (status, Json(body)).into_response()
}

pub fn not_found() -> Response {
    error(StatusCode::NOT_FOUND, "system.notFound", "Not found")
}

pub fn forbidden_origin() -> Response {
    error(StatusCode::FORBIDDEN, "system.forbidden", "Forbidden origin")
}

/// The resource engine behind `rid` cannot serve the request.
pub fn unavailable(rid: &str) -> Response {
    error(
        StatusCode::SERVICE_UNAVAILABLE,
        "system.unavailable",
        format!("Resource {rid} is unavailable"),
    )
}

// src/server/error.rs

//! Request-scoped error responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::error::AppError;

/// Field-naming convention of the endpoint that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// `{"ok": false, "error": ...}`
    Verbose,
    /// `{"ok": 0, "e": ...}`
    Compact,
}

/// An [`AppError`] bound to the response shape of its endpoint.
#[derive(Debug)]
pub struct ApiError {
    pub shape: Shape,
    pub error: AppError,
}

impl ApiError {
    pub fn verbose(error: AppError) -> Self {
        Self {
            shape: Shape::Verbose,
            error,
        }
    }

    pub fn compact(error: AppError) -> Self {
        Self {
            shape: Shape::Compact,
            error,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.error.to_string();
        log::error!("Request failed: {message}");

        let body = match self.shape {
            Shape::Verbose => json!({ "ok": false, "error": message }),
            Shape::Compact => json!({ "ok": 0, "e": message }),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

//! JSON response shaping
//!
//! Success bodies are the CLI's own JSON, forwarded untouched. Errors use a
//! fixed `{"code": <int>, "error": "<message>"}` envelope where `code` is
//! the CLI's exit status, or -1 when the failure did not come from the CLI.
//!
//! `Content-Type` is set exactly when a body is written. Error responses
//! always have a body, so they always carry it.

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::common::{Error, ErrorKind, UNSET_EXIT_STATUS};

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// Wire-level error envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: i32,
    pub error: String,
}

impl ErrorResponse {
    pub fn from_error(err: Option<&Error>) -> Self {
        let Some(err) = err else {
            return Self {
                code: UNSET_EXIT_STATUS,
                error: String::new(),
            };
        };

        let code = match err.kind() {
            ErrorKind::Spawn | ErrorKind::NonzeroExit => err.exit_status(),
            ErrorKind::Other => UNSET_EXIT_STATUS,
        };

        Self {
            code,
            error: err.to_string(),
        }
    }
}

/// Build a non-error response. An empty payload produces a bodyless
/// response without a content type (e.g. 204).
pub fn send_success(status: StatusCode, payload: impl Into<Bytes>) -> Response {
    let payload: Bytes = payload.into();
    let has_body = !payload.is_empty();

    let mut response = Response::new(Body::from(payload));
    *response.status_mut() = status;
    if has_body {
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
    }
    response
}

/// Build an error response carrying the [`ErrorResponse`] envelope
pub fn send_error(status: StatusCode, err: Option<&Error>) -> Response {
    let resp = ErrorResponse::from_error(err);
    let body = match serde_json::to_vec(&resp) {
        Ok(body) => body,
        Err(e) => {
            tracing::error!(error = %e, response = ?resp, "Failed to encode error response");
            Vec::new()
        }
    };

    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
    response
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        send_error(self.to_http_status(), Some(&self))
    }
}

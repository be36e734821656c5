//! Response construction.
//!
//! # Responsibilities
//! - Serialize the status map for successful requests
//! - Wrap every backend failure in the `{"error": "..."}` envelope
//! - Fall back to a fixed body if the envelope itself cannot be serialized
//!
//! # Design Decisions
//! - All backend and translation failures are 500; the message tells them apart
//! - 400 and 404 are produced by the handler directly and carry no envelope

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::backend::{BackendError, StatusMap};

/// Body written when even the error envelope fails to serialize.
pub const FALLBACK_ERROR_BODY: &str = r#"{"error":"internal error while encoding an error response"}"#;

/// The sole shape of a 500 response body.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope<'a> {
    pub error: &'a str,
}

/// Encode an error message as an envelope.
pub fn error_body(message: &str) -> Vec<u8> {
    serde_json::to_vec(&ErrorEnvelope { error: message }).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to encode error envelope");
        FALLBACK_ERROR_BODY.as_bytes().to_vec()
    })
}

/// A response with an `application/json` body.
pub fn json_response(status: StatusCode, body: Vec<u8>) -> Response {
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    response
}

/// 500 with the envelope for `message`.
pub fn internal_error(message: &str) -> Response {
    json_response(StatusCode::INTERNAL_SERVER_ERROR, error_body(message))
}

/// 200 with the endpoint → seal state object.
pub fn status_response(statuses: &StatusMap) -> Response {
    match serde_json::to_vec(statuses) {
        Ok(body) => json_response(StatusCode::OK, body),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode status map");
            internal_error(&e.to_string())
        }
    }
}

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        internal_error(&self.to_string())
    }
}

//! The strongbox endpoint.
//!
//! ```text
//! AwaitingRequest → ValidatingShape → FetchingBackend → Translating → Responding
//! ```
//!
//! Nothing is shared between requests except the immutable `AppState`.

use axum::{
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};

use crate::http::response::status_response;
use crate::http::server::AppState;

/// Handler mounted at the configured path.
pub async fn strongbox_handler(State(state): State<AppState>, method: Method, uri: Uri) -> Response {
    tracing::debug!(method = %method, uri = %uri, "Inbound request");

    if uri.path() != &*state.mount {
        return not_found(uri.path());
    }

    if method != Method::GET {
        tracing::debug!("Replying with HTTP 400 (not a GET request)");
        return StatusCode::BAD_REQUEST.into_response();
    }

    let response = match state.backend.fetch_statuses().await {
        Ok(statuses) => {
            tracing::debug!(endpoints = statuses.len(), "Translated consul health data");
            status_response(&statuses)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to answer status request");
            e.into_response()
        }
    };

    tracing::debug!(status = %response.status(), "Sending response");
    response
}

/// Fallback for every path other than the mount.
pub async fn not_found_handler(method: Method, uri: Uri) -> Response {
    tracing::debug!(method = %method, uri = %uri, "Inbound request");
    not_found(uri.path())
}

fn not_found(path: &str) -> Response {
    tracing::debug!(path = %path, "Replying with HTTP 404");
    (StatusCode::NOT_FOUND, format!("{} not found\n", path)).into_response()
}

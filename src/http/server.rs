//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the strongbox handler and the 404 fallback
//! - Wire up middleware (request ID, tracing)
//! - Bind server to listener
//! - Stop accepting on shutdown and drain in-flight requests

use std::sync::Arc;

use axum::{routing::any, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::backend::BackendClient;
use crate::config::GatewayConfig;
use crate::http::handler::{not_found_handler, strongbox_handler};
use crate::http::request::{make_request_span, MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub backend: BackendClient,
    pub mount: Arc<str>,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and backend client.
    pub fn new(config: GatewayConfig, backend: BackendClient) -> Self {
        let state = AppState {
            backend,
            mount: Arc::from(config.listener.mount.as_str()),
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        // Mount paths are literal; `/:status` must not be read as 0.7 syntax.
        Router::new()
            .without_v07_checks()
            .route(&config.listener.mount, any(strongbox_handler))
            .fallback(not_found_handler)
            .with_state(state)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            mount = %self.config.listener.mount,
            consul = %self.config.backend.base_uri,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::http::{header, StatusCode};
use axum::routing::get;
use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use strongbox::backend::BackendClient;
use strongbox::config::GatewayConfig;
use strongbox::net::TrustPolicy;
use strongbox::{HttpServer, Shutdown};

/// A Consul stand-in that answers every request with a fixed status and body.
pub struct MockConsul {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockConsul {
    /// Request lines (`GET /path HTTP/1.1`) seen so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn base_uri(&self) -> String {
        format!("http://{}", self.addr)
    }
}

/// Start a mock Consul agent on an ephemeral port.
pub async fn start_mock_consul(status: u16, body: impl Into<String>) -> MockConsul {
    let body = body.into();
    let reason = StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown");
    start_raw_consul(format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason,
        body.len(),
        body
    ))
    .await
}

/// Start a mock Consul agent that writes `response` verbatim and hangs up.
pub async fn start_raw_consul(response: impl Into<String>) -> MockConsul {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let response: Arc<str> = Arc::from(response.into());

    let seen = requests.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let seen = seen.clone();
                    let response = response.clone();
                    tokio::spawn(async move {
                        answer(socket, &response, &seen).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    MockConsul { addr, requests }
}

async fn answer(mut socket: TcpStream, response: &str, seen: &Mutex<Vec<String>>) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }

    let head = String::from_utf8_lossy(&buf);
    if let Some(line) = head.lines().next() {
        seen.lock().unwrap().push(line.to_string());
    }

    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
}

const CONSUL_CERT: &str = include_str!("../fixtures/consul-cert.pem");
const CONSUL_KEY: &str = include_str!("../fixtures/consul-key.pem");

/// A Consul stand-in served over HTTPS with a certificate issued by the
/// alpha test CA for `127.0.0.1`.
pub struct TlsConsul {
    pub addr: SocketAddr,
    handle: axum_server::Handle,
}

impl TlsConsul {
    pub fn base_uri(&self) -> String {
        format!("https://{}", self.addr)
    }
}

impl Drop for TlsConsul {
    fn drop(&mut self) {
        self.handle.shutdown();
    }
}

/// Start an HTTPS mock Consul agent answering the vault health query with `body`.
pub async fn start_tls_consul(body: impl Into<String>) -> TlsConsul {
    let certs = rustls_pemfile::certs(&mut CONSUL_CERT.as_bytes())
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    let key = rustls_pemfile::private_key(&mut CONSUL_KEY.as_bytes()).unwrap().unwrap();

    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let mut server_config = rustls::ServerConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .unwrap()
        .with_no_client_auth()
        .with_single_cert(certs, key)
        .unwrap();
    server_config.alpn_protocols = vec![b"http/1.1".to_vec()];
    let tls = RustlsConfig::from_config(Arc::new(server_config));

    let body = body.into();
    let app = Router::new().route(
        "/v1/health/service/vault",
        get(move || {
            let body = body.clone();
            async move { ([(header::CONTENT_TYPE, "application/json")], body) }
        }),
    );

    let handle = axum_server::Handle::new();
    let server = axum_server::bind_rustls(SocketAddr::from(([127, 0, 0, 1], 0)), tls).handle(handle.clone());
    tokio::spawn(async move {
        let _ = server.serve(app.into_make_service()).await;
    });
    let addr = handle.listening().await.unwrap();

    TlsConsul { addr, handle }
}

/// A running gateway bound to an ephemeral port.
pub struct Gateway {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl Gateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for Gateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the gateway in front of `base_uri` with otherwise default settings.
pub async fn start_gateway(base_uri: &str) -> Gateway {
    let mut config = GatewayConfig::default();
    config.backend.base_uri = base_uri.to_string();
    start_gateway_with(config).await
}

/// Start the gateway with a custom configuration.
pub async fn start_gateway_with(mut config: GatewayConfig) -> Gateway {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    config.listener.bind_address = addr.to_string();

    let trust = TrustPolicy::from_config(&config.backend).unwrap();
    let backend = BackendClient::new(&config, &trust).unwrap();
    let server = HttpServer::new(config, backend);
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    Gateway { addr, shutdown }
}

/// A client that never pools or proxies, so each test request is independent.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

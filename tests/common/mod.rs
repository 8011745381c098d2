//! Shared utilities for integration and load testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::IntoResponse,
    routing::any,
    Router,
};
use request_dispatcher::config::{BackendConfig, DispatcherConfig};
use request_dispatcher::http::HttpServer;
use request_dispatcher::lifecycle::Shutdown;
use tokio::net::TcpListener;

/// Serve `router` on an ephemeral loopback port.
pub async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

/// A backend answering `name` to everything and counting hits.
pub async fn start_named_backend(name: &'static str) -> (SocketAddr, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let state = (name, hits.clone());
    let router = Router::new()
        .route("/{*path}", any(named_reply))
        .route("/", any(named_reply))
        .with_state(state);
    (serve(router).await, hits)
}

async fn named_reply(State((name, hits)): State<(&'static str, Arc<AtomicUsize>)>) -> &'static str {
    hits.fetch_add(1, Ordering::SeqCst);
    name
}

/// A backend that describes the request it received.
///
/// Replies 201 with `x-echo-method`, `x-echo-uri`, and `x-echo-custom`
/// headers and the request body as the response body.
pub async fn start_echo_backend() -> SocketAddr {
    let router = Router::new()
        .route("/{*path}", any(echo))
        .route("/", any(echo));
    serve(router).await
}

async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> impl IntoResponse {
    let custom = headers
        .get("x-custom")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    (
        StatusCode::CREATED,
        [
            ("x-echo-method", method.to_string()),
            ("x-echo-uri", uri.to_string()),
            ("x-echo-custom", custom),
            ("x-echo-forwarded-for", forwarded),
        ],
        Body::from(body),
    )
}

/// A URL nothing is listening on.
pub fn closed_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

pub fn backend(addr: SocketAddr, alive: bool) -> BackendConfig {
    BackendConfig {
        url: format!("http://{}", addr),
        alive,
    }
}

/// Start a dispatcher for `backends`; returns its address and the shutdown handle.
pub async fn start_dispatcher(
    strategy: &str,
    backends: Vec<BackendConfig>,
) -> (SocketAddr, Shutdown) {
    let mut config = DispatcherConfig::default();
    config.strategy = strategy.to_string();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.backends = backends;

    let server = HttpServer::new(&config).unwrap();
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    // The listener is already bound; this only lets the accept loop spin up.
    tokio::time::sleep(Duration::from_millis(50)).await;
    (addr, shutdown)
}

/// A client that opens a fresh connection per request.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

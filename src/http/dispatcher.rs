//! Per-request dispatch.
//!
//! # Responsibilities
//! - Ask the pool for a backend under the configured strategy
//! - Reject the request when the pick is dead
//! - Hand the request to the chosen backend's forwarder
//! - Map forwarding failures to 502
//!
//! # Design Decisions
//! - A dead pick fails the request; there is no second selection
//! - Forward errors never touch liveness
//! - Nothing is buffered; the response body streams from the backend

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
};

use crate::http::request::RequestIdExt;
use crate::load_balancer::{BackendPool, Strategy};
use crate::observability::metrics;

/// Ties selection and forwarding together for every inbound request.
#[derive(Debug)]
pub struct Dispatcher {
    pool: Arc<BackendPool>,
    strategy: Strategy,
}

impl Dispatcher {
    pub fn new(pool: Arc<BackendPool>, strategy: Strategy) -> Self {
        Self { pool, strategy }
    }

    pub fn pool(&self) -> &Arc<BackendPool> {
        &self.pool
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Turn one inbound request into a forwarded response or a rejection.
    pub async fn handle(&self, request: Request<Body>) -> Response {
        let start = Instant::now();
        let strategy = self.strategy.as_str();
        let request_id = request.request_id().to_string();

        let selection = match self.pool.select(self.strategy) {
            Some(s) => s,
            None => {
                tracing::error!(request_id = %request_id, strategy, "Pool returned no backend");
                metrics::record_rejection("no_backend");
                return service_unavailable();
            }
        };
        let backend = selection.backend;
        let backend_id = backend.to_string();

        if !backend.is_alive() {
            tracing::warn!(
                request_id = %request_id,
                backend = %backend_id,
                index = selection.index,
                strategy,
                "Selected backend is down"
            );
            metrics::record_rejection("backend_down");
            return service_unavailable();
        }

        tracing::info!(
            request_id = %request_id,
            backend = %backend_id,
            index = selection.index,
            strategy,
            method = %request.method(),
            path = %request.uri().path(),
            "Proxying request"
        );

        let client_addr = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);

        match backend.forwarder().forward(request, client_addr).await {
            Ok(response) => {
                metrics::record_dispatch(&backend_id, strategy, response.status().as_u16(), start);
                response
            }
            Err(e) => {
                tracing::error!(
                    request_id = %request_id,
                    backend = %backend_id,
                    strategy,
                    error = %e,
                    "Upstream error"
                );
                metrics::record_dispatch(&backend_id, strategy, StatusCode::BAD_GATEWAY.as_u16(), start);
                (StatusCode::BAD_GATEWAY, "Bad Gateway\n").into_response()
            }
        }
    }
}

fn service_unavailable() -> Response {
    (StatusCode::SERVICE_UNAVAILABLE, "Service Unavailable\n").into_response()
}

/// Axum entry point; every method and path lands here.
pub async fn dispatch_handler(
    State(dispatcher): State<Arc<Dispatcher>>,
    request: Request<Body>,
) -> Response {
    dispatcher.handle(request).await
}

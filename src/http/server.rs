//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build the backend pool and dispatcher from configuration
//! - Create Axum Router sending every method and path to the dispatcher
//! - Wire up middleware (tracing, request ID)
//! - Serve on a listener until shutdown

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{body::Body, routing::any, Router};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::DispatcherConfig;
use crate::http::dispatcher::{dispatch_handler, Dispatcher};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::load_balancer::{BackendPool, PoolError, Strategy};

/// HTTP server for the dispatcher.
pub struct HttpServer {
    router: Router,
    dispatcher: Arc<Dispatcher>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: &DispatcherConfig) -> Result<Self, PoolError> {
        // One client for the whole process; every forwarder clones it.
        let client: Client<HttpConnector, Body> =
            Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let pool = Arc::new(BackendPool::from_configs(&config.backends, client)?);
        let strategy = Strategy::resolve(&config.strategy);

        tracing::info!(
            backends = pool.len(),
            live = pool.live_count(),
            strategy = %strategy,
            "Backend pool ready"
        );
        for (index, backend) in pool.backends().iter().enumerate() {
            tracing::debug!(index, backend = %backend, alive = backend.is_alive(), "Backend registered");
        }

        Ok(Self::from_dispatcher(Arc::new(Dispatcher::new(pool, strategy))))
    }

    /// Wrap an already-built dispatcher.
    pub fn from_dispatcher(dispatcher: Arc<Dispatcher>) -> Self {
        let router = Self::build_router(dispatcher.clone());
        Self { router, dispatcher }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(dispatcher: Arc<Dispatcher>) -> Router {
        Router::new()
            .route("/{*path}", any(dispatch_handler))
            .route("/", any(dispatch_handler))
            .with_state(dispatcher)
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// The router, for serving or for driving in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
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
            strategy = %self.dispatcher.strategy(),
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

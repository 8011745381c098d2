//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → dispatcher.rs (select backend, liveness check)
//!     → forwarder.rs (rewrite, relay, stream response back)
//!     → Send to client
//! ```

pub mod dispatcher;
pub mod forwarder;
pub mod request;
pub mod server;

pub use dispatcher::Dispatcher;
pub use forwarder::{ForwardError, Forwarder};
pub use request::{RequestIdExt, X_REQUEST_ID};
pub use server::HttpServer;

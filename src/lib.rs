//! HTTP request dispatcher library.

pub mod bench;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod load_balancer;
pub mod observability;
pub mod simulator;

pub use config::DispatcherConfig;
pub use http::{Dispatcher, HttpServer};
pub use lifecycle::Shutdown;
pub use load_balancer::{Backend, BackendPool, Strategy};

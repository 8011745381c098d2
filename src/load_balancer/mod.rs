//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → pool.rs (select under the configured strategy)
//!         - round_robin.rs (atomic cursor, mod pool size)
//!         - random.rs (uniform draw, no shared state)
//!     → backend.rs (liveness check, forwarder bound to target)
//!     → Return selected backend
//! ```
//!
//! # Design Decisions
//! - Pool is fixed at startup; no add/remove at runtime
//! - The round-robin cursor is the only shared mutable state on the hot path
//! - Strategy is a closed enum resolved once at construction
//! - Liveness is read here but never written by request handling

pub mod backend;
pub mod pool;
pub mod random;
pub mod round_robin;
pub mod strategy;

pub use backend::{Backend, BackendError, Target};
pub use pool::{BackendPool, PoolError, Selection};
pub use strategy::{Strategy, UnknownStrategy};

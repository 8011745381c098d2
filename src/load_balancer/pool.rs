//! Backend pool management.
//!
//! # Responsibilities
//! - Hold the fixed, ordered set of backends
//! - Own the shared round-robin cursor
//! - Answer "which backend serves the next request" for a strategy

use std::sync::Arc;

use axum::body::Body;
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use thiserror::Error;

use crate::config::BackendConfig;
use crate::load_balancer::{
    backend::{Backend, BackendError},
    random::Random,
    round_robin::RoundRobin,
    strategy::Strategy,
};

/// Errors raised while assembling a pool.
#[derive(Debug, Error)]
pub enum PoolError {
    /// A pool must hold at least one backend before anything selects from it.
    #[error("backend pool is empty")]
    Empty,

    #[error(transparent)]
    InvalidBackend(#[from] BackendError),
}

/// Outcome of one selection.
#[derive(Debug, Clone)]
pub struct Selection {
    /// Position of the backend in pool order.
    pub index: usize,
    pub backend: Arc<Backend>,
}

/// The fixed collection of backends plus the rotation cursor.
#[derive(Debug)]
pub struct BackendPool {
    backends: Vec<Arc<Backend>>,
    round_robin: RoundRobin,
    random: Random,
}

impl BackendPool {
    /// Build a pool; insertion order is round-robin order.
    pub fn new(backends: Vec<Backend>) -> Result<Self, PoolError> {
        if backends.is_empty() {
            return Err(PoolError::Empty);
        }

        Ok(Self {
            backends: backends.into_iter().map(Arc::new).collect(),
            round_robin: RoundRobin::new(),
            random: Random::new(),
        })
    }

    /// Build every configured backend on top of one shared client.
    pub fn from_configs(
        configs: &[BackendConfig],
        client: Client<HttpConnector, Body>,
    ) -> Result<Self, PoolError> {
        let backends = configs
            .iter()
            .map(|config| {
                Backend::new(&config.url, client.clone()).map(|b| b.with_alive(config.alive))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(backends)
    }

    /// Pick a backend. O(1), never blocks.
    ///
    /// Returns `None` only if the non-empty invariant was broken.
    pub fn select(&self, strategy: Strategy) -> Option<Selection> {
        let len = self.backends.len();
        debug_assert!(len > 0, "selection from an empty pool");
        if len == 0 {
            return None;
        }

        let index = match strategy {
            Strategy::RoundRobin => self.round_robin.next_index(len),
            Strategy::Random => self.random.next_index(len),
        };

        self.backends.get(index).map(|backend| Selection {
            index,
            backend: backend.clone(),
        })
    }

    pub fn backends(&self) -> &[Arc<Backend>] {
        &self.backends
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    /// Number of backends currently flagged alive.
    pub fn live_count(&self) -> usize {
        self.backends.iter().filter(|b| b.is_alive()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper_util::rt::TokioExecutor;
    use std::sync::Mutex;
    use std::thread;

    fn client() -> Client<HttpConnector, Body> {
        Client::builder(TokioExecutor::new()).build(HttpConnector::new())
    }

    fn pool(n: u16) -> BackendPool {
        let backends = (0..n)
            .map(|i| Backend::new(&format!("http://127.0.0.1:{}", 9000 + i), client()).unwrap())
            .collect();
        BackendPool::new(backends).unwrap()
    }

    #[test]
    fn test_empty_pool_is_rejected() {
        assert!(matches!(BackendPool::new(Vec::new()), Err(PoolError::Empty)));
        assert!(matches!(
            BackendPool::from_configs(&[], client()),
            Err(PoolError::Empty)
        ));
    }

    #[test]
    fn test_invalid_backend_is_rejected() {
        let configs = vec![
            BackendConfig::new("http://127.0.0.1:9000"),
            BackendConfig::new("https://127.0.0.1:9001"),
        ];
        assert!(matches!(
            BackendPool::from_configs(&configs, client()),
            Err(PoolError::InvalidBackend(BackendError::UnsupportedScheme { .. }))
        ));
    }

    #[test]
    fn test_from_configs_keeps_order_and_liveness() {
        let mut dead = BackendConfig::new("http://127.0.0.1:9001");
        dead.alive = false;
        let configs = vec![BackendConfig::new("http://127.0.0.1:9000"), dead];

        let pool = BackendPool::from_configs(&configs, client()).unwrap();
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.live_count(), 1);
        assert_eq!(pool.backends()[0].to_string(), "http://127.0.0.1:9000");
        assert!(!pool.backends()[1].is_alive());
    }

    #[test]
    fn test_round_robin_cycles_in_insertion_order() {
        let pool = pool(3);
        let picks: Vec<String> = (0..6)
            .map(|_| pool.select(Strategy::RoundRobin).unwrap().backend.to_string())
            .collect();
        assert_eq!(
            picks,
            vec![
                "http://127.0.0.1:9000",
                "http://127.0.0.1:9001",
                "http://127.0.0.1:9002",
                "http://127.0.0.1:9000",
                "http://127.0.0.1:9001",
                "http://127.0.0.1:9002",
            ]
        );
    }

    #[test]
    fn test_selection_index_matches_backend() {
        let pool = pool(4);
        for strategy in [Strategy::RoundRobin, Strategy::Random] {
            for _ in 0..20 {
                let sel = pool.select(strategy).unwrap();
                assert!(Arc::ptr_eq(&sel.backend, &pool.backends()[sel.index]));
            }
        }
    }

    #[test]
    fn test_random_does_not_move_cursor() {
        let pool = pool(3);
        for _ in 0..10 {
            pool.select(Strategy::Random).unwrap();
        }
        assert_eq!(pool.select(Strategy::RoundRobin).unwrap().index, 0);
    }

    #[test]
    fn test_concurrent_round_robin_over_pool() {
        let pool = pool(5);
        let seen = Mutex::new(vec![0usize; pool.len()]);

        thread::scope(|s| {
            for _ in 0..10 {
                s.spawn(|| {
                    for _ in 0..500 {
                        let idx = pool.select(Strategy::RoundRobin).unwrap().index;
                        seen.lock().unwrap()[idx] += 1;
                    }
                });
            }
        });

        assert!(seen.into_inner().unwrap().iter().all(|&n| n == 1000));
        // 5000 claims so far, so the next one starts a fresh cycle.
        assert_eq!(pool.select(Strategy::RoundRobin).unwrap().index, 0);
    }
}

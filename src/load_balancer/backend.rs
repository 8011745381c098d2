//! Backend abstraction.
//!
//! # Responsibilities
//! - Represent a single upstream target
//! - Hold the liveness flag read on every dispatch
//! - Own the forwarder bound to the target for its whole lifetime

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::body::Body;
use axum::http::uri::{Authority, Scheme};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use thiserror::Error;
use url::Url;

use crate::http::forwarder::Forwarder;

/// Errors raised while building a backend from its address.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The address is not a URL at all.
    #[error("invalid backend url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The URL parsed but names no host.
    #[error("backend url {0:?} has no host")]
    MissingHost(String),

    /// Only plain HTTP upstreams are supported.
    #[error("backend url {url:?} uses unsupported scheme {scheme:?}")]
    UnsupportedScheme { url: String, scheme: String },

    /// Host and port do not form a valid authority.
    #[error("backend url {0:?} does not yield a valid authority")]
    InvalidAuthority(String),
}

/// Where a backend lives: the parsed base address requests are rewritten to.
#[derive(Debug, Clone)]
pub struct Target {
    /// The URL as configured.
    pub url: Url,
    pub(crate) scheme: Scheme,
    pub(crate) authority: Authority,
}

impl Target {
    /// Parse and validate a base address such as `http://localhost:8081`.
    pub fn parse(raw: &str) -> Result<Self, BackendError> {
        let url = Url::parse(raw).map_err(|source| BackendError::InvalidUrl {
            url: raw.to_string(),
            source,
        })?;

        if url.scheme() != "http" {
            return Err(BackendError::UnsupportedScheme {
                url: raw.to_string(),
                scheme: url.scheme().to_string(),
            });
        }

        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| BackendError::MissingHost(raw.to_string()))?;
        let port = url
            .port_or_known_default()
            .ok_or_else(|| BackendError::InvalidAuthority(raw.to_string()))?;

        // host_str() keeps IPv6 brackets, so this is always a valid host:port form.
        let authority = format!("{}:{}", host, port)
            .parse::<Authority>()
            .map_err(|_| BackendError::InvalidAuthority(raw.to_string()))?;

        Ok(Self {
            url,
            scheme: Scheme::HTTP,
            authority,
        })
    }

    /// Base path of the target, joined in front of every forwarded path.
    pub fn base_path(&self) -> &str {
        self.url.path()
    }

    /// Base query of the target, merged with every forwarded query.
    pub fn base_query(&self) -> Option<&str> {
        self.url.query()
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.authority)
    }
}

/// A single backend server.
#[derive(Debug)]
pub struct Backend {
    target: Target,
    alive: AtomicBool,
    forwarder: Forwarder,
}

impl Backend {
    /// Create a backend for `raw`, sharing `client`'s connection pool.
    pub fn new(raw: &str, client: Client<HttpConnector, Body>) -> Result<Self, BackendError> {
        let target = Target::parse(raw)?;
        let forwarder = Forwarder::new(target.clone(), client);
        Ok(Self {
            target,
            alive: AtomicBool::new(true),
            forwarder,
        })
    }

    /// Builder-style initial liveness.
    pub fn with_alive(self, alive: bool) -> Self {
        self.set_alive(alive);
        self
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn forwarder(&self) -> &Forwarder {
        &self.forwarder
    }

    /// Whether the backend may receive traffic.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Flip liveness. Nothing on the request path calls this.
    pub fn set_alive(&self, alive: bool) {
        self.alive.store(alive, Ordering::Release);
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.target.fmt(f)
    }
}

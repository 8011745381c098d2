//! Single-target request forwarding.
//!
//! # Responsibilities
//! - Rewrite an inbound request onto the backend's base address
//! - Strip hop-by-hop headers in both directions
//! - Stream the backend response back without buffering
//! - Surface transport failures as a distinct error

use std::net::SocketAddr;

use axum::{
    body::Body,
    http::{
        header::{self, HeaderMap, HeaderName, HeaderValue},
        uri::PathAndQuery,
        Request, Response, Uri, Version,
    },
};
use hyper::body::Incoming;
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use thiserror::Error;

use crate::load_balancer::backend::Target;

/// Headers that describe a single connection and must not be relayed.
const HOP_BY_HOP: [HeaderName; 8] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    HeaderName::from_static("proxy-connection"),
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
];

const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");

/// Errors raised while forwarding one request.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// The rewritten request could not be assembled.
    #[error("failed to build upstream request: {0}")]
    Request(#[from] axum::http::Error),

    /// Connecting to or talking with the backend failed.
    #[error("upstream request failed: {0}")]
    Upstream(#[from] hyper_util::client::legacy::Error),
}

/// Relays requests to one backend. Cheap to clone; the client pool is shared.
#[derive(Debug, Clone)]
pub struct Forwarder {
    target: Target,
    client: Client<HttpConnector, Body>,
}

impl Forwarder {
    pub fn new(target: Target, client: Client<HttpConnector, Body>) -> Self {
        Self { target, client }
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Forward `request` and stream the backend's response back.
    pub async fn forward(
        &self,
        request: Request<Body>,
        client_addr: Option<SocketAddr>,
    ) -> Result<Response<Body>, ForwardError> {
        let outbound = self.rewrite(request, client_addr)?;
        let response: Response<Incoming> = self.client.request(outbound).await?;

        let (mut parts, body) = response.into_parts();
        strip_hop_by_hop(&mut parts.headers);
        Ok(Response::from_parts(parts, Body::new(body)))
    }

    /// Build the outbound request: same method, headers and body, new destination.
    pub fn rewrite(
        &self,
        request: Request<Body>,
        client_addr: Option<SocketAddr>,
    ) -> Result<Request<Body>, ForwardError> {
        let (mut parts, body) = request.into_parts();

        let uri = Uri::builder()
            .scheme(self.target.scheme.clone())
            .authority(self.target.authority.clone())
            .path_and_query(self.path_and_query(&parts.uri)?)
            .build()?;

        strip_hop_by_hop(&mut parts.headers);
        if let Some(addr) = client_addr {
            append_forwarded_for(&mut parts.headers, addr);
        }

        let mut builder = Request::builder()
            .method(parts.method)
            .uri(uri)
            .version(Version::HTTP_11);
        if let Some(headers) = builder.headers_mut() {
            *headers = parts.headers;
        }

        Ok(builder.body(body)?)
    }

    fn path_and_query(&self, inbound: &Uri) -> Result<PathAndQuery, axum::http::Error> {
        let path = join_paths(self.target.base_path(), inbound.path());
        let query = match (self.target.base_query(), inbound.query()) {
            (Some(base), Some(req)) if !base.is_empty() && !req.is_empty() => {
                Some(format!("{}&{}", base, req))
            }
            (Some(base), _) if !base.is_empty() => Some(base.to_string()),
            (_, Some(req)) if !req.is_empty() => Some(req.to_string()),
            _ => None,
        };

        let raw = match query {
            Some(q) => format!("{}?{}", path, q),
            None => path,
        };
        Ok(PathAndQuery::try_from(raw)?)
    }
}

/// Join a base path and a request path with exactly one slash between them.
fn join_paths(base: &str, path: &str) -> String {
    match (base.ends_with('/'), path.starts_with('/')) {
        (true, true) => format!("{}{}", base, &path[1..]),
        (false, false) => format!("{}/{}", base, path),
        _ => format!("{}{}", base, path),
    }
}

fn strip_hop_by_hop(headers: &mut HeaderMap) {
    // Headers named in Connection are hop-by-hop too.
    let listed: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| HeaderName::try_from(name.trim()).ok())
        .collect();

    for name in listed.iter().chain(HOP_BY_HOP.iter()) {
        headers.remove(name);
    }
    headers.remove(header::UPGRADE);
}

fn append_forwarded_for(headers: &mut HeaderMap, addr: SocketAddr) {
    let ip = addr.ip().to_string();
    let value = match headers.get(&X_FORWARDED_FOR).and_then(|v| v.to_str().ok()) {
        Some(prior) => format!("{}, {}", prior, ip),
        None => ip,
    };
    if let Ok(value) = HeaderValue::from_str(&value) {
        headers.insert(X_FORWARDED_FOR, value);
    }
}

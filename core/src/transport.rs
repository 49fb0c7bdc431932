//! Executes plain-data requests against the network.
//!
//! `Transport` is the seam between the deterministic builder/parser and real
//! I/O. `UreqTransport` is the production implementation; tests substitute
//! a scripted one.

use std::fmt;
use std::time::Duration;

use tracing::{debug, warn};
use ureq::typestate::WithBody;
use ureq::{Agent, RequestBuilder};

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

pub trait Transport {
    /// Perform the round-trip. Non-2xx statuses are returned as data;
    /// only a missing response is an error.
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Blocking HTTP transport backed by a `ureq` agent.
#[derive(Clone)]
pub struct UreqTransport {
    agent: Agent,
    timeout: Duration,
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent, timeout }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = request.method.as_str(), path = %request.path, "sending request");

        let body = request.body.as_deref();
        let sent = match request.method {
            HttpMethod::Get => with_headers(self.agent.get(&request.path), request).call(),
            HttpMethod::Delete => with_headers(self.agent.delete(&request.path), request).call(),
            HttpMethod::Post => send(with_headers(self.agent.post(&request.path), request), body),
            HttpMethod::Put => send(with_headers(self.agent.put(&request.path), request), body),
        };

        let mut response = sent.map_err(|e| {
            warn!(method = request.method.as_str(), path = %request.path, error = %e, "no response");
            map_error(e)
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(map_body_error)?;

        debug!(status, path = %request.path, "received response");
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn with_headers<B>(mut builder: RequestBuilder<B>, request: &HttpRequest) -> RequestBuilder<B> {
    for (key, value) in &request.headers {
        builder = builder.header(key.as_str(), value.as_str());
    }
    builder
}

fn send(
    builder: RequestBuilder<WithBody>,
    body: Option<&str>,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match body {
        Some(body) => builder.send(body.as_bytes()),
        None => builder.send_empty(),
    }
}

fn map_error(e: ureq::Error) -> ApiError {
    match e {
        ureq::Error::BadUri(uri) => ApiError::Unexpected(format!("bad uri: {uri}")),
        other => ApiError::Network(other.to_string()),
    }
}

/// A body that stops arriving is a connectivity problem; one that arrived
/// but cannot be read (size limit, bad encoding) is not.
fn map_body_error(e: ureq::Error) -> ApiError {
    match e {
        ureq::Error::Io(_) | ureq::Error::Timeout(_) => {
            ApiError::Network(format!("failed to read response body: {e}"))
        }
        other => ApiError::Unexpected(format!("unreadable response body: {other}")),
    }
}

//! Fire-and-forget HTTP delivery of outbound requests.
//!
//! Every [`OutboundRequest`] becomes one `POST` against the server root.  The
//! dispatch loop never waits for it: [`HttpRequestSink::submit`] spawns a task
//! per request and returns immediately.  A failed request is logged at
//! `warn!` and dropped; the next state change supersedes it, and the server
//! treats every device byte as the complete current state.
//!
//! Overlapping requests for rapid input changes may arrive out of order.
//! Requests carry no sequence number and are never cancelled; the server
//! accepts the last value it receives.

use mtmc_core::{OutboundRequest, RequestBody};
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, warn};

use crate::application::session::RequestSink;

/// Errors from a single delivered request.
#[derive(Debug, Error)]
pub enum HttpSinkError {
    /// The request could not be sent (connection refused, DNS, ...).
    #[error("POST {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("POST {endpoint} returned {status}")]
    Status { endpoint: String, status: StatusCode },
}

/// Builds the HTTP client shared by the push channel and the request sink.
///
/// The cookie store carries the server's session cookie, so the push
/// subscription and every POST act as the same session.
///
/// # Errors
///
/// Returns the underlying `reqwest` error if the TLS backend cannot be
/// initialised.
pub fn build_http_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .cookie_store(true)
        .user_agent(concat!("mtmc-client/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Delivers outbound requests with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpRequestSink {
    client: reqwest::Client,
    server_url: String,
}

impl HttpRequestSink {
    /// Creates a sink posting to `server_url` (scheme, host, port).
    pub fn new(client: reqwest::Client, server_url: impl Into<String>) -> Self {
        let server_url = server_url.into();
        Self {
            client,
            server_url: server_url.trim_end_matches('/').to_string(),
        }
    }

    /// Full URL for `request`.
    pub fn endpoint(&self, request: &OutboundRequest) -> String {
        format!("{}{}", self.server_url, request.path())
    }

    /// Builds the `POST` for `request` without sending it.
    pub fn build(&self, request: &OutboundRequest) -> reqwest::RequestBuilder {
        let builder = self.client.post(self.endpoint(request));
        match request.body() {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Form(fields) => builder.form(&fields),
        }
    }

    /// Sends `request` and waits for the status line.  Used by one-shot
    /// commands that report failures to the user.
    ///
    /// # Errors
    ///
    /// Returns [`HttpSinkError`] on transport failure or a non-2xx status.
    pub async fn send(&self, request: &OutboundRequest) -> Result<(), HttpSinkError> {
        deliver(self.build(request), self.endpoint(request)).await
    }
}

async fn deliver(builder: reqwest::RequestBuilder, endpoint: String) -> Result<(), HttpSinkError> {
    let response = match builder.send().await {
        Ok(response) => response,
        Err(source) => return Err(HttpSinkError::Request { endpoint, source }),
    };
    let status = response.status();
    if !status.is_success() {
        return Err(HttpSinkError::Status { endpoint, status });
    }
    debug!(%endpoint, %status, "request delivered");
    Ok(())
}

impl RequestSink for HttpRequestSink {
    fn submit(&self, request: OutboundRequest) {
        let builder = self.build(&request);
        let endpoint = self.endpoint(&request);
        tokio::spawn(async move {
            if let Err(e) = deliver(builder, endpoint).await {
                warn!(request = request.label(), error = %e, "dropping failed request");
            }
        });
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! The push channel: one server-sent-events subscription to `/sse`.
//!
//! # How server-sent events work (for beginners)
//!
//! The client issues one long-lived `GET`.  The server keeps the response
//! open and writes events as text blocks:
//!
//! ```text
//! event: console-output
//! data: Hello, world
//!
//! ```
//!
//! Each block has a name (`event:`) and a UTF-8 payload (`data:`).  Many event
//! names share the one connection.  If the connection drops, the transport
//! reconnects on its own with a backoff; events emitted while it was down
//! are lost, and nothing orders them against the client's own POSTs.
//!
//! [`PushChannel::run`] forwards every registered event to the dispatch loop
//! as a [`RawServerEvent`].  Decoding happens in the loop so that one bad
//! payload only affects its own event.

use std::collections::BTreeSet;

use futures_util::StreamExt;
use mtmc_core::ServerEventKind;
use reqwest::Url;
use reqwest_eventsource::{Event, EventSource};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Errors that prevent the subscription from starting.
#[derive(Debug, Error)]
pub enum PushChannelError {
    /// The push endpoint is not a valid absolute URL.
    #[error("invalid push endpoint URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The subscription request could not be prepared for reconnection.
    #[error("push subscription request cannot be cloned for reconnects")]
    CannotCloneRequest,
}

/// A named event with its raw payload, not yet decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawServerEvent {
    pub name: String,
    pub data: String,
}

/// The set of event kinds the subscription delivers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventRegistry {
    kinds: BTreeSet<ServerEventKind>,
}

impl EventRegistry {
    /// A registry with nothing registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every known kind registered.
    pub fn all() -> Self {
        let mut registry = Self::new();
        for kind in ServerEventKind::ALL {
            registry.register(kind);
        }
        registry
    }

    /// Registers `kind`.  Returns `false`, changing nothing, if it was
    /// already registered.
    pub fn register(&mut self, kind: ServerEventKind) -> bool {
        self.kinds.insert(kind)
    }

    pub fn is_registered(&self, kind: ServerEventKind) -> bool {
        self.kinds.contains(&kind)
    }

    /// Resolves a wire name to a registered kind.
    pub fn resolve(&self, name: &str) -> Option<ServerEventKind> {
        ServerEventKind::from_name(name).filter(|kind| self.is_registered(*kind))
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

/// The single push subscription.
#[derive(Debug)]
pub struct PushChannel {
    client: reqwest::Client,
    url: Url,
    registry: EventRegistry,
}

impl PushChannel {
    /// Prepares a subscription to `url`.
    ///
    /// `client` should be the cookie-enabled client shared with the request
    /// sink so the subscription carries the session's credentials.
    ///
    /// # Errors
    ///
    /// Returns [`PushChannelError::InvalidUrl`] if `url` does not parse.
    pub fn new(
        client: reqwest::Client,
        url: &str,
        registry: EventRegistry,
    ) -> Result<Self, PushChannelError> {
        let url = Url::parse(url).map_err(|e| PushChannelError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            client,
            url,
            registry,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn registry(&self) -> &EventRegistry {
        &self.registry
    }

    /// Runs the subscription until the transport gives up or `tx` closes.
    ///
    /// Transport errors are logged and left to the event source's retry
    /// policy.  Unregistered events are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`PushChannelError::CannotCloneRequest`] if the subscription
    /// cannot be started.
    pub async fn run(self, tx: mpsc::Sender<RawServerEvent>) -> Result<(), PushChannelError> {
        let request = self.client.get(self.url.clone());
        let mut source =
            EventSource::new(request).map_err(|_| PushChannelError::CannotCloneRequest)?;

        while let Some(event) = source.next().await {
            match event {
                Ok(Event::Open) => info!(url = %self.url, "push channel open"),
                Ok(Event::Message(message)) => {
                    if self.registry.resolve(&message.event).is_none() {
                        debug!(event = %message.event, "dropping unregistered push event");
                        continue;
                    }
                    let raw = RawServerEvent {
                        name: message.event,
                        data: message.data,
                    };
                    if tx.send(raw).await.is_err() {
                        debug!("dispatch loop gone; closing push channel");
                        source.close();
                        break;
                    }
                }
                Err(e) => warn!(url = %self.url, error = %e, "push channel error"),
            }
        }

        info!(url = %self.url, "push channel closed");
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

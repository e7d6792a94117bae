//! Infrastructure layer for the client.
//!
//! Contains the I/O adapters that `main` wires into the application layer.
//!
//! **Dependency rule**: this layer may depend on `application`, `domain`, and
//! `mtmc_core`, but MUST NOT be imported by them.
//!
//! # Sub-modules
//!
//! - **`push_channel`** – the server-sent-events subscription; forwards
//!   registered events to the dispatch loop.
//! - **`http_sink`** – `RequestSink` over `reqwest`; one fire-and-forget POST
//!   per outbound request.
//! - **`terminal`** – stdin line parsing into local input, and incremental
//!   console rendering to stdout.
//! - **`storage`** – the TOML config file.

pub mod http_sink;
pub mod push_channel;
pub mod storage;
pub mod terminal;

pub use http_sink::{build_http_client, HttpRequestSink, HttpSinkError};
pub use push_channel::{EventRegistry, PushChannel, PushChannelError, RawServerEvent};
pub use terminal::{parse_line, read_lines, read_stdin, DirectiveError, TerminalRenderer};

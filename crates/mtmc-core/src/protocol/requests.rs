//! Outbound requests from the client to the MTMC server.
//!
//! Every request is a fire-and-forget HTTP `POST`.  The client never reads
//! the response body and never retries: if a request is lost, the next state
//! change supersedes it.
//!
//! # Endpoints
//!
//! | Request                | Path                  | Body                    |
//! |------------------------|-----------------------|-------------------------|
//! | `DeviceState(0x81)`    | `/io/81`              | none                    |
//! | `Command`              | `/cmd`                | `{"cmd": "..."}`        |
//! | `ReadString`           | `/readstr`            | `{"str": "..."}`        |
//! | `ReadInt`              | `/readint`            | `{"str": "..."}`        |
//! | `ReadChar`             | `/readchar`           | `{"c": "x"}`            |
//! | `Control(Step)`        | `/control/step`       | none                    |
//! | `Speed(1000)`          | `/speed`              | form `speed=1000`       |
//! | `ToggleMemoryFormat`   | `/memFormat`          | none                    |
//!
//! Note that `ReadInt` sends the raw digits as a *string* under the `str`
//! key; the server parses the number.

use std::fmt;
use std::str::FromStr;

use serde_json::json;
use thiserror::Error;

/// Execution-control actions exposed by the server's `/control/<action>` route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlAction {
    /// Re-initialise emulator memory.
    Reset,
    /// Pause a running program.
    Pause,
    /// Execute exactly one instruction.
    Step,
}

impl ControlAction {
    /// Path segment used by the server route.
    pub fn as_str(self) -> &'static str {
        match self {
            ControlAction::Reset => "reset",
            ControlAction::Pause => "pause",
            ControlAction::Step => "step",
        }
    }
}

impl fmt::Display for ControlAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a [`ControlAction`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown control action: {0:?} (expected reset, pause or step)")]
pub struct UnknownControlAction(pub String);

impl FromStr for ControlAction {
    type Err = UnknownControlAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reset" => Ok(ControlAction::Reset),
            "pause" => Ok(ControlAction::Pause),
            "step" => Ok(ControlAction::Step),
            _ => Err(UnknownControlAction(s.to_string())),
        }
    }
}

/// A request the client sends to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundRequest {
    /// The full current device-state byte (last-write-wins on the server).
    DeviceState(u8),
    /// A shell command line submitted in `Ready` mode.
    Command(String),
    /// A line submitted while the program waits for a string.
    ReadString(String),
    /// A line submitted while the program waits for an integer.
    ReadInt(String),
    /// A single character forwarded while the program waits for a character.
    ReadChar(char),
    /// Execution control (reset / pause / step).
    Control(ControlAction),
    /// Emulator clock speed in instructions per second.
    Speed(u32),
    /// Toggle the memory panel's number format.
    ToggleMemoryFormat,
}

/// The body attached to an outbound `POST`.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// No body.
    Empty,
    /// A JSON object body.
    Json(serde_json::Value),
    /// An `application/x-www-form-urlencoded` body.
    Form(Vec<(&'static str, String)>),
}

impl OutboundRequest {
    /// The request path, relative to the server root.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mtmc_core::OutboundRequest;
    ///
    /// assert_eq!(OutboundRequest::DeviceState(0x81).path(), "/io/81");
    /// assert_eq!(OutboundRequest::ReadInt("12".into()).path(), "/readint");
    /// ```
    pub fn path(&self) -> String {
        match self {
            OutboundRequest::DeviceState(mask) => format!("/io/{}", hex::encode([*mask])),
            OutboundRequest::Command(_) => "/cmd".to_string(),
            OutboundRequest::ReadString(_) => "/readstr".to_string(),
            OutboundRequest::ReadInt(_) => "/readint".to_string(),
            OutboundRequest::ReadChar(_) => "/readchar".to_string(),
            OutboundRequest::Control(action) => format!("/control/{action}"),
            OutboundRequest::Speed(_) => "/speed".to_string(),
            OutboundRequest::ToggleMemoryFormat => "/memFormat".to_string(),
        }
    }

    /// The request body.
    pub fn body(&self) -> RequestBody {
        match self {
            OutboundRequest::Command(cmd) => RequestBody::Json(json!({ "cmd": cmd })),
            OutboundRequest::ReadString(s) | OutboundRequest::ReadInt(s) => {
                RequestBody::Json(json!({ "str": s }))
            }
            OutboundRequest::ReadChar(c) => RequestBody::Json(json!({ "c": c.to_string() })),
            OutboundRequest::Speed(hz) => RequestBody::Form(vec![("speed", hz.to_string())]),
            OutboundRequest::DeviceState(_)
            | OutboundRequest::Control(_)
            | OutboundRequest::ToggleMemoryFormat => RequestBody::Empty,
        }
    }

    /// Short name for log lines.
    pub fn label(&self) -> &'static str {
        match self {
            OutboundRequest::DeviceState(_) => "io",
            OutboundRequest::Command(_) => "cmd",
            OutboundRequest::ReadString(_) => "readstr",
            OutboundRequest::ReadInt(_) => "readint",
            OutboundRequest::ReadChar(_) => "readchar",
            OutboundRequest::Control(_) => "control",
            OutboundRequest::Speed(_) => "speed",
            OutboundRequest::ToggleMemoryFormat => "memFormat",
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

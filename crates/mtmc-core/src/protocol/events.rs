//! Named events delivered by the server's push channel.
//!
//! The push channel multiplexes thirteen event names over one subscription.
//! Each name maps to exactly one [`ServerEventKind`]; decoding a payload for
//! a kind yields a [`ServerEvent`], which the session dispatches through an
//! exhaustive `match`.
//!
//! | Event name                                | Decoded as                     |
//! |-------------------------------------------|--------------------------------|
//! | `update:execution` ... `update:memory-panel` | [`ServerEvent::PanelUpdate`] |
//! | `update:display`                          | [`ServerEvent::Display`]       |
//! | `update:step-execution`                   | [`ServerEvent::StepExecution`] |
//! | `console-output`                          | [`ServerEvent::ConsoleOutput`] |
//! | `console-partial`                         | [`ServerEvent::ConsolePartial`]|
//! | `console-ready` / `-readstr` / `-readchar` / `-readint` | [`ServerEvent::ConsoleMode`] |
//!
//! Only `update:step-execution` carries structured (JSON) data; every other
//! payload is used as raw text.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::console::ConsoleMode;

/// Errors produced while decoding a push event payload.
#[derive(Debug, Error)]
pub enum EventDecodeError {
    /// A structured payload did not match its schema.
    #[error("malformed {kind} payload: {source}")]
    MalformedPayload {
        kind: ServerEventKind,
        #[source]
        source: serde_json::Error,
    },
}

/// Every event name the server pushes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ServerEventKind {
    UpdateExecution,
    UpdateFilesystem,
    UpdateRegisters,
    UpdateMemory,
    UpdateMemoryPanel,
    UpdateDisplay,
    UpdateStepExecution,
    ConsoleOutput,
    ConsolePartial,
    ConsoleReady,
    ConsoleReadStr,
    ConsoleReadChar,
    ConsoleReadInt,
}

impl ServerEventKind {
    pub const ALL: [ServerEventKind; 13] = [
        ServerEventKind::UpdateExecution,
        ServerEventKind::UpdateFilesystem,
        ServerEventKind::UpdateRegisters,
        ServerEventKind::UpdateMemory,
        ServerEventKind::UpdateMemoryPanel,
        ServerEventKind::UpdateDisplay,
        ServerEventKind::UpdateStepExecution,
        ServerEventKind::ConsoleOutput,
        ServerEventKind::ConsolePartial,
        ServerEventKind::ConsoleReady,
        ServerEventKind::ConsoleReadStr,
        ServerEventKind::ConsoleReadChar,
        ServerEventKind::ConsoleReadInt,
    ];

    /// The event name on the wire.
    pub const fn name(self) -> &'static str {
        match self {
            ServerEventKind::UpdateExecution => "update:execution",
            ServerEventKind::UpdateFilesystem => "update:filesystem",
            ServerEventKind::UpdateRegisters => "update:registers",
            ServerEventKind::UpdateMemory => "update:memory",
            ServerEventKind::UpdateMemoryPanel => "update:memory-panel",
            ServerEventKind::UpdateDisplay => "update:display",
            ServerEventKind::UpdateStepExecution => "update:step-execution",
            ServerEventKind::ConsoleOutput => "console-output",
            ServerEventKind::ConsolePartial => "console-partial",
            ServerEventKind::ConsoleReady => "console-ready",
            ServerEventKind::ConsoleReadStr => "console-readstr",
            ServerEventKind::ConsoleReadChar => "console-readchar",
            ServerEventKind::ConsoleReadInt => "console-readint",
        }
    }

    /// Looks up a kind by its wire name.  Names are case-sensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    /// The panel replaced by this event, for the five `update:<panel>` kinds.
    pub fn panel(self) -> Option<Panel> {
        match self {
            ServerEventKind::UpdateExecution => Some(Panel::Execution),
            ServerEventKind::UpdateFilesystem => Some(Panel::Filesystem),
            ServerEventKind::UpdateRegisters => Some(Panel::Registers),
            ServerEventKind::UpdateMemory => Some(Panel::Memory),
            ServerEventKind::UpdateMemoryPanel => Some(Panel::MemoryPanel),
            _ => None,
        }
    }

    /// The console mode announced by this event, for the four mode kinds.
    pub fn console_mode(self) -> Option<ConsoleMode> {
        match self {
            ServerEventKind::ConsoleReady => Some(ConsoleMode::Ready),
            ServerEventKind::ConsoleReadStr => Some(ConsoleMode::ReadString),
            ServerEventKind::ConsoleReadChar => Some(ConsoleMode::ReadChar),
            ServerEventKind::ConsoleReadInt => Some(ConsoleMode::ReadInt),
            _ => None,
        }
    }
}

impl fmt::Display for ServerEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A server-rendered panel that is replaced wholesale on update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    Execution,
    Filesystem,
    Registers,
    Memory,
    MemoryPanel,
}

impl Panel {
    /// Id of the mount point this panel replaces.
    pub const fn mount_id(self) -> &'static str {
        match self {
            Panel::Execution => "execution",
            Panel::Filesystem => "filesystem",
            Panel::Registers => "registers",
            Panel::Memory => "memory",
            Panel::MemoryPanel => "memory-panel",
        }
    }
}

/// Payload of `update:step-execution`: the lines to highlight in the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepExecution {
    /// Name of the program being stepped.
    pub program: String,
    /// 1-based line in the assembly view, if known.
    pub asm: Option<u32>,
    /// 1-based line in the source view, if known.
    pub src: Option<u32>,
}

/// A decoded push event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    /// Replace a panel's outer markup.
    PanelUpdate { panel: Panel, markup: String },
    /// Set the display image reference (a `data:` URL).
    Display { image_ref: String },
    /// Highlight the current execution position in the editor.
    StepExecution(StepExecution),
    /// Committed output lines, newline-delimited.
    ConsoleOutput(String),
    /// The unterminated tail of the current output line.
    ConsolePartial(String),
    /// Switch the console to `mode` with the raw (untrimmed) `prompt`.
    ConsoleMode { mode: ConsoleMode, prompt: String },
}

impl ServerEvent {
    /// Decodes the payload of a `kind` event.
    ///
    /// # Errors
    ///
    /// Returns [`EventDecodeError::MalformedPayload`] if `kind` expects JSON
    /// and `data` does not match the schema.  Text payloads never fail.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mtmc_core::{ConsoleMode, ServerEvent, ServerEventKind};
    ///
    /// let ev = ServerEvent::decode(ServerEventKind::ConsoleReadInt, "#").unwrap();
    /// assert_eq!(ev, ServerEvent::ConsoleMode { mode: ConsoleMode::ReadInt, prompt: "#".into() });
    /// ```
    pub fn decode(kind: ServerEventKind, data: &str) -> Result<Self, EventDecodeError> {
        let text = data.to_string();
        let panel = |panel| ServerEvent::PanelUpdate {
            panel,
            markup: data.to_string(),
        };
        let mode = |mode| ServerEvent::ConsoleMode {
            mode,
            prompt: data.to_string(),
        };
        let event = match kind {
            ServerEventKind::UpdateExecution => panel(Panel::Execution),
            ServerEventKind::UpdateFilesystem => panel(Panel::Filesystem),
            ServerEventKind::UpdateRegisters => panel(Panel::Registers),
            ServerEventKind::UpdateMemory => panel(Panel::Memory),
            ServerEventKind::UpdateMemoryPanel => panel(Panel::MemoryPanel),
            ServerEventKind::UpdateDisplay => ServerEvent::Display { image_ref: text },
            ServerEventKind::UpdateStepExecution => serde_json::from_str(data)
                .map(ServerEvent::StepExecution)
                .map_err(|source| EventDecodeError::MalformedPayload { kind, source })?,
            ServerEventKind::ConsoleOutput => ServerEvent::ConsoleOutput(text),
            ServerEventKind::ConsolePartial => ServerEvent::ConsolePartial(text),
            ServerEventKind::ConsoleReady => mode(ConsoleMode::Ready),
            ServerEventKind::ConsoleReadStr => mode(ConsoleMode::ReadString),
            ServerEventKind::ConsoleReadChar => mode(ConsoleMode::ReadChar),
            ServerEventKind::ConsoleReadInt => mode(ConsoleMode::ReadInt),
        };
        Ok(event)
    }

    /// The kind this event was decoded from.
    pub fn kind(&self) -> ServerEventKind {
        match self {
            ServerEvent::PanelUpdate { panel, .. } => match panel {
                Panel::Execution => ServerEventKind::UpdateExecution,
                Panel::Filesystem => ServerEventKind::UpdateFilesystem,
                Panel::Registers => ServerEventKind::UpdateRegisters,
                Panel::Memory => ServerEventKind::UpdateMemory,
                Panel::MemoryPanel => ServerEventKind::UpdateMemoryPanel,
            },
            ServerEvent::Display { .. } => ServerEventKind::UpdateDisplay,
            ServerEvent::StepExecution(_) => ServerEventKind::UpdateStepExecution,
            ServerEvent::ConsoleOutput(_) => ServerEventKind::ConsoleOutput,
            ServerEvent::ConsolePartial(_) => ServerEventKind::ConsolePartial,
            ServerEvent::ConsoleMode { mode, .. } => match mode {
                ConsoleMode::Ready => ServerEventKind::ConsoleReady,
                ConsoleMode::ReadString => ServerEventKind::ConsoleReadStr,
                ConsoleMode::ReadChar => ServerEventKind::ConsoleReadChar,
                ConsoleMode::ReadInt => ServerEventKind::ConsoleReadInt,
            },
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

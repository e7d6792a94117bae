//! # mtmc-core
//!
//! Shared library for the MTMC web client containing the console input state
//! machine, the virtual input device encoder, the per-surface button lookup
//! tables, and the push-event / outbound-request protocol types.
//!
//! It has zero dependencies on sockets, HTTP clients, async runtimes, or
//! terminals.  Everything here is driven by plain method calls and returns
//! plain values, so the whole interaction layer can be tested without a
//! server.
//!
//! # Architecture overview (for beginners)
//!
//! The MTMC is a teaching microcomputer whose emulator runs on a server.  The
//! client keeps two things in sync with it:
//!
//! - **The console.**  The server pushes output text and tells the client
//!   which kind of input it is waiting for (a shell command, a string, an
//!   integer, or a single character).  The client enforces the matching
//!   keystroke policy and posts completed lines back.
//!
//! - **The virtual game pad.**  Eight logical buttons (`up`, `down`, `left`,
//!   `right`, `start`, `select`, `b`, `a`) are packed into one byte.  Any of
//!   three physical surfaces (on-screen controls, the keyboard, a game
//!   controller) can press or release them; whenever the byte changes it is
//!   sent to the server.
//!
//! This crate is split into:
//!
//! - **`domain`** – the state machines: [`ConsoleSession`] and
//!   [`VirtualDeviceEncoder`].
//!
//! - **`keymap`** – the [`LogicalButton`] table and the per-surface lookup
//!   tables that translate a physical identifier (a DOM key code, a gamepad
//!   button index, an on-screen region id) into a logical button.
//!
//! - **`protocol`** – the closed set of [`ServerEvent`]s the push channel
//!   delivers and the [`OutboundRequest`]s the client sends.

pub mod domain;
pub mod keymap;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `mtmc_core::ConsoleSession` instead of `mtmc_core::domain::console::ConsoleSession`.
pub use domain::console::{ConsoleMode, ConsoleSession, ConsoleView, KeyInput, KeyOutcome};
pub use domain::device::{ButtonEdge, GamepadSnapshot, VirtualDeviceEncoder, MAX_GAMEPAD_BUTTONS};
pub use domain::transcript::Transcript;
pub use keymap::buttons::LogicalButton;
pub use keymap::SurfaceMaps;
pub use protocol::events::{EventDecodeError, Panel, ServerEvent, ServerEventKind, StepExecution};
pub use protocol::requests::{ControlAction, OutboundRequest, RequestBody};

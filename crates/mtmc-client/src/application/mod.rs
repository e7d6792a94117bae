//! Application layer: the client session and the pieces it drives.
//!
//! - [`session`] – `ClientSession`, the owned interaction state, and the
//!   `RequestSink` / `StepHighlighter` seams.
//! - [`render`] – the rendered tree of server-patched mount points.
//! - [`gamepad`] – per-frame controller polling.
//!
//! Nothing here performs I/O directly; infrastructure implementations of the
//! traits are injected by `main`.

pub mod gamepad;
pub mod render;
pub mod session;

pub use gamepad::{GamepadSource, VirtualGamepads};
pub use render::{MountPoint, PatchOutcome, RenderTree, TransientState};
pub use session::{ClientSession, Focus, LocalInput, LoggingHighlighter, RequestSink, StepHighlighter};

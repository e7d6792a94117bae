//! mtmc-client library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does mtmc-client do? (for beginners)
//!
//! The MTMC server runs the emulated computer and owns all of its state.  The
//! client is a thin front end that:
//!
//! 1. Subscribes to the server's push channel (`/sse`) and applies each named
//!    event: panel markup replacement, display image updates, step
//!    highlighting, console output and console mode changes.
//! 2. Turns local input into requests: console keystrokes become
//!    `/cmd`, `/readstr`, `/readint`, or `/readchar` posts depending on the
//!    console mode, and button presses from the on-screen controls, the
//!    keyboard, or a game controller are folded into one device-state byte
//!    posted to `/io/<hex>`.
//! 3. Renders the console transcript and prompt to the terminal.
//!
//! # Layers
//!
//! - [`domain`] – `ClientConfig`, the merged runtime settings.
//! - [`application`] – `ClientSession` and the seams it is driven through.
//! - [`infrastructure`] – HTTP, push channel, terminal, and config file.

/// Domain layer: configuration types.
pub mod domain;

/// Application layer: the client session.
pub mod application;

/// Infrastructure layer: network, terminal, and storage adapters.
pub mod infrastructure;

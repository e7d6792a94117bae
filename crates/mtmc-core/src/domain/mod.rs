//! Domain state machines for the MTMC web client.
//!
//! This module contains pure business logic with no infrastructure
//! dependencies.
//!
//! # What lives here? (for beginners)
//!
//! - [`console::ConsoleSession`] – the mode-governed console: prompt, input
//!   buffer, command history, and the bounded transcript.
//! - [`device::VirtualDeviceEncoder`] – the single device-state byte shared by
//!   every physical input surface, plus the "send only on change" rule.
//! - [`transcript::Transcript`] – the bounded FIFO of committed output lines.
//!
//! None of these types know how a request reaches the server.  They return
//! [`crate::protocol::requests::OutboundRequest`] values and let the caller
//! decide how to deliver them.

pub mod console;
pub mod device;
pub mod transcript;

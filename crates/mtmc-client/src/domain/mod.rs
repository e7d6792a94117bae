//! Domain layer: pure configuration types for the client.
//!
//! Nothing here performs I/O.  The console and device state machines live in
//! `mtmc-core`; this layer only adds what is specific to running as a
//! headless client against one server.

pub mod config;

pub use config::ClientConfig;

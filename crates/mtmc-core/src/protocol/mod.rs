//! Protocol module containing push-event types and outbound request types.

pub mod events;
pub mod requests;

pub use events::{EventDecodeError, Panel, ServerEvent, ServerEventKind, StepExecution};
pub use requests::{ControlAction, OutboundRequest, RequestBody, UnknownControlAction};

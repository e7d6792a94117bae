//! Per-frame game controller polling.
//!
//! Controllers are not event driven: the runtime asks a [`GamepadSource`]
//! for a snapshot once per frame, and only while at least one controller is
//! connected.  The snapshot goes straight into
//! [`mtmc_core::VirtualDeviceEncoder::gamepad_frame`].
//!
//! The headless client has no controller hardware binding.  It ships
//! [`VirtualGamepads`], a source whose button states are set by terminal
//! directives, so the polling path is the same one a hardware source would
//! use.

use std::collections::BTreeMap;

use mtmc_core::{GamepadSnapshot, MAX_GAMEPAD_BUTTONS};
use tracing::debug;

/// Number of buttons in the standard controller mapping.
pub const STANDARD_BUTTON_COUNT: usize = 17;

/// A source of per-frame controller state.
#[cfg_attr(test, mockall::automock)]
pub trait GamepadSource: Send {
    /// Returns `true` while at least one controller is connected.
    fn connected(&self) -> bool;

    /// Current button states of every connected controller.
    fn poll(&mut self) -> Vec<GamepadSnapshot>;
}

/// Software controllers whose buttons are set explicitly.
///
/// A controller "connects" the first time one of its buttons is set and
/// disconnects on [`VirtualGamepads::unplug`].
#[derive(Debug, Clone, Default)]
pub struct VirtualGamepads {
    pads: BTreeMap<usize, Vec<bool>>,
}

impl VirtualGamepads {
    /// Sets button `button` of controller `pad`.  Indices at or past
    /// [`MAX_GAMEPAD_BUTTONS`] are ignored and do not connect the pad.
    pub fn set_button(&mut self, pad: usize, button: usize, pressed: bool) {
        if button >= MAX_GAMEPAD_BUTTONS {
            debug!(pad, button, "ignoring out-of-range controller button");
            return;
        }
        let buttons = self
            .pads
            .entry(pad)
            .or_insert_with(|| vec![false; STANDARD_BUTTON_COUNT]);
        if buttons.len() <= button {
            buttons.resize(button + 1, false);
        }
        buttons[button] = pressed;
    }

    /// Disconnects controller `pad`.  Returns `false` if it was not connected.
    pub fn unplug(&mut self, pad: usize) -> bool {
        self.pads.remove(&pad).is_some()
    }
}

impl GamepadSource for VirtualGamepads {
    fn connected(&self) -> bool {
        !self.pads.is_empty()
    }

    fn poll(&mut self) -> Vec<GamepadSnapshot> {
        self.pads
            .iter()
            .map(|(index, buttons)| GamepadSnapshot {
                index: *index,
                buttons: buttons.clone(),
            })
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

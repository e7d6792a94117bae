//! The virtual input device: one byte shared by every physical surface.
//!
//! # How it works (for beginners)
//!
//! Each of the eight logical buttons owns one bit of a byte (see
//! [`LogicalButton::mask`]).  Every input edge, from any surface, sets or
//! clears exactly one bit.  After the edge the encoder compares the byte with
//! the last byte it handed out; only when they differ does it return a
//! [`OutboundRequest::DeviceState`] carrying the *whole* byte.
//!
//! There is no per-surface ownership.  Pressing `up` on the keyboard and
//! releasing `up` on the on-screen pad clears the bit even though neither
//! surface "owns" it: the most recent edge wins.  The server treats each
//! received byte as the complete current state, so a lost or reordered
//! request is repaired by the next one.
//!
//! The game controller is the exception to edge handling: it is polled once
//! per frame and every mapped button's current state is written directly.

use crate::keymap::{LogicalButton, SurfaceMaps};
use crate::protocol::requests::OutboundRequest;

/// Direction of an input edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonEdge {
    Press,
    Release,
}

/// Highest number of buttons a snapshot tracks.  Gamepad bindings are keyed
/// by `u8`, so no index at or past this can ever be mapped.
pub const MAX_GAMEPAD_BUTTONS: usize = 256;

/// One connected controller's button states for the current frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GamepadSnapshot {
    /// Controller slot reported by the platform.
    pub index: usize,
    /// Pressed state per standard-mapping button index.
    pub buttons: Vec<bool>,
}

impl GamepadSnapshot {
    /// A snapshot with `count` released buttons.
    pub fn released(index: usize, count: usize) -> Self {
        Self {
            index,
            buttons: vec![false; count],
        }
    }

    /// Returns a copy with button `button` set to `pressed`, growing the
    /// button list if necessary.  Indices at or past
    /// [`MAX_GAMEPAD_BUTTONS`] are ignored.
    pub fn with_button(mut self, button: usize, pressed: bool) -> Self {
        if button >= MAX_GAMEPAD_BUTTONS {
            return self;
        }
        if self.buttons.len() <= button {
            self.buttons.resize(button + 1, false);
        }
        self.buttons[button] = pressed;
        self
    }
}

/// Maps input edges from all surfaces onto the device-state byte and emits a
/// request whenever the byte changes.
#[derive(Debug, Clone, Default)]
pub struct VirtualDeviceEncoder {
    mask: u8,
    last_sent: u8,
    maps: SurfaceMaps,
}

impl VirtualDeviceEncoder {
    /// Creates an encoder with all buttons released.
    pub fn new(maps: SurfaceMaps) -> Self {
        Self {
            mask: 0,
            last_sent: 0,
            maps,
        }
    }

    /// Current device-state byte.
    pub fn mask(&self) -> u8 {
        self.mask
    }

    /// The byte carried by the most recently emitted request.
    pub fn last_sent(&self) -> u8 {
        self.last_sent
    }

    pub fn maps(&self) -> &SurfaceMaps {
        &self.maps
    }

    /// Returns `true` if `button`'s bit is currently set.
    pub fn is_pressed(&self, button: LogicalButton) -> bool {
        self.mask & button.mask() != 0
    }

    /// Applies a press or release on an on-screen control region.
    pub fn control_edge(&mut self, region: &str, edge: ButtonEdge) -> Option<OutboundRequest> {
        let button = self.maps.controls.lookup(region)?;
        self.edge(button, edge)
    }

    /// Applies a key-down.  A repeated key-down for a button already held is
    /// ignored.
    pub fn key_down(&mut self, code: &str) -> Option<OutboundRequest> {
        let button = self.maps.keyboard.lookup(code)?;
        if self.is_pressed(button) {
            return None;
        }
        self.edge(button, ButtonEdge::Press)
    }

    /// Applies a key-up.
    pub fn key_up(&mut self, code: &str) -> Option<OutboundRequest> {
        let button = self.maps.keyboard.lookup(code)?;
        self.edge(button, ButtonEdge::Release)
    }

    /// Writes one frame of controller state into the byte.
    ///
    /// Every mapped button present on a pad overwrites its bit, so with
    /// several pads connected the last one in `pads` wins.  Buttons a pad
    /// does not report leave their bit untouched.
    pub fn gamepad_frame(&mut self, pads: &[GamepadSnapshot]) -> Option<OutboundRequest> {
        for pad in pads {
            for (index, button) in self.maps.gamepad.iter() {
                if let Some(&pressed) = pad.buttons.get(usize::from(index)) {
                    write_bit(&mut self.mask, button, pressed);
                }
            }
        }
        self.take_pending()
    }

    /// Applies an edge for a logical button directly, bypassing the
    /// surface tables.
    pub fn edge(&mut self, button: LogicalButton, edge: ButtonEdge) -> Option<OutboundRequest> {
        write_bit(&mut self.mask, button, edge == ButtonEdge::Press);
        self.take_pending()
    }

    /// Returns a request for the current byte if it differs from the last
    /// one handed out.
    fn take_pending(&mut self) -> Option<OutboundRequest> {
        if self.mask == self.last_sent {
            return None;
        }
        self.last_sent = self.mask;
        Some(OutboundRequest::DeviceState(self.mask))
    }
}

fn write_bit(mask: &mut u8, button: LogicalButton, pressed: bool) {
    if pressed {
        *mask |= button.mask();
    } else {
        *mask &= !button.mask();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

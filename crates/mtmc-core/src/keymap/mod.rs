//! Per-surface lookup tables from physical identifiers to logical buttons.
//!
//! Three independent input surfaces drive the same device-state byte.  Each
//! has its own identifier space:
//!
//! | Surface            | Identifier                          | Table          |
//! |--------------------|-------------------------------------|----------------|
//! | On-screen controls | region id (`"up"`, `"a"`, ...)      | [`ControlMap`] |
//! | Keyboard           | DOM `KeyboardEvent.code` (`"KeyW"`) | [`KeyboardMap`]|
//! | Game controller    | standard-mapping button index       | [`GamepadMap`] |
//!
//! All three resolve to a [`LogicalButton`]; an unknown identifier resolves
//! to `None` and leaves the device byte untouched.

pub mod buttons;
pub mod controls;
pub mod gamepad;
pub mod keyboard;

pub use buttons::LogicalButton;
pub use controls::ControlMap;
pub use gamepad::GamepadMap;
pub use keyboard::KeyboardMap;

use thiserror::Error;

/// Errors produced when parsing button names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ButtonParseError {
    #[error("unknown logical button: {0:?} (expected one of up, down, left, right, start, select, b, a)")]
    UnknownButton(String),
}

/// The lookup tables for all three input surfaces.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SurfaceMaps {
    pub controls: ControlMap,
    pub keyboard: KeyboardMap,
    pub gamepad: GamepadMap,
}

impl SurfaceMaps {
    /// Builds the tables with custom keyboard and controller bindings.
    /// On-screen region ids are fixed.
    pub fn new(keyboard: KeyboardMap, gamepad: GamepadMap) -> Self {
        Self {
            controls: ControlMap,
            keyboard,
            gamepad,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

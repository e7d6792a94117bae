//! Game controller bindings keyed by standard-mapping button index.
//!
//! # Standard mapping (for beginners)
//!
//! Controllers that follow the W3C "standard" gamepad layout number their
//! buttons the same way regardless of vendor: `0` is the bottom face button,
//! `1` the right face button, `8`/`9` are select/start, and `12..=15` are the
//! D-pad up, down, left, right.  Anything else is left unbound.

use std::collections::BTreeMap;

use super::LogicalButton;

/// The built-in controller bindings.
pub const DEFAULT_BINDINGS: [(u8, LogicalButton); 8] = [
    (12, LogicalButton::Up),
    (13, LogicalButton::Down),
    (14, LogicalButton::Left),
    (15, LogicalButton::Right),
    (9, LogicalButton::Start),
    (8, LogicalButton::Select),
    (1, LogicalButton::B),
    (0, LogicalButton::A),
];

/// Button index → logical button.
///
/// Ordered by index so that the per-frame write order is deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GamepadMap {
    bindings: BTreeMap<u8, LogicalButton>,
}

impl GamepadMap {
    /// Builds a table from explicit bindings, replacing the defaults.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (u8, LogicalButton)>) -> Self {
        Self {
            bindings: pairs.into_iter().collect(),
        }
    }

    /// Returns the button bound to `index`, if any.
    pub fn lookup(&self, index: u8) -> Option<LogicalButton> {
        self.bindings.get(&index).copied()
    }

    /// Iterates over `(index, button)` bindings in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, LogicalButton)> + '_ {
        self.bindings.iter().map(|(i, b)| (*i, *b))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Default for GamepadMap {
    fn default() -> Self {
        Self::from_pairs(DEFAULT_BINDINGS)
    }
}

//! Keyboard bindings keyed by DOM `KeyboardEvent.code`.
//!
//! Codes name physical key positions (`"KeyW"` is the key labelled W on a
//! QWERTY layout), so the default WASD cluster stays in place on other
//! layouts.  Codes are matched exactly; `"keyw"` is not `"KeyW"`.

use std::collections::HashMap;

use super::LogicalButton;

/// The built-in keyboard bindings.
pub const DEFAULT_BINDINGS: [(&str, LogicalButton); 13] = [
    ("ArrowUp", LogicalButton::Up),
    ("KeyW", LogicalButton::Up),
    ("ArrowDown", LogicalButton::Down),
    ("KeyS", LogicalButton::Down),
    ("ArrowLeft", LogicalButton::Left),
    ("KeyA", LogicalButton::Left),
    ("ArrowRight", LogicalButton::Right),
    ("KeyD", LogicalButton::Right),
    ("Enter", LogicalButton::Start),
    ("ShiftRight", LogicalButton::Select),
    ("Space", LogicalButton::Select),
    ("KeyZ", LogicalButton::B),
    ("KeyX", LogicalButton::A),
];

/// Key code → logical button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardMap {
    bindings: HashMap<String, LogicalButton>,
}

impl KeyboardMap {
    /// Builds a table from explicit bindings, replacing the defaults.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, LogicalButton)>) -> Self {
        Self {
            bindings: pairs.into_iter().collect(),
        }
    }

    /// Returns the button bound to `code`, if any.
    pub fn lookup(&self, code: &str) -> Option<LogicalButton> {
        self.bindings.get(code).copied()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Iterates over `(code, button)` bindings in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, LogicalButton)> {
        self.bindings.iter().map(|(code, b)| (code.as_str(), *b))
    }
}

impl Default for KeyboardMap {
    fn default() -> Self {
        Self::from_pairs(
            DEFAULT_BINDINGS
                .iter()
                .map(|(code, b)| ((*code).to_string(), *b)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings_cover_every_button() {
        let map = KeyboardMap::default();
        for b in LogicalButton::ALL {
            let bound = ["ArrowUp", "ArrowDown", "ArrowLeft", "ArrowRight", "Enter", "Space", "KeyZ", "KeyX"]
                .iter()
                .any(|code| map.lookup(code) == Some(b));
            assert!(bound, "{b} has no default key");
        }
    }

    #[test]
    fn test_wasd_mirrors_arrows() {
        let map = KeyboardMap::default();
        assert_eq!(map.lookup("KeyW"), map.lookup("ArrowUp"));
        assert_eq!(map.lookup("KeyA"), map.lookup("ArrowLeft"));
        assert_eq!(map.lookup("KeyS"), map.lookup("ArrowDown"));
        assert_eq!(map.lookup("KeyD"), map.lookup("ArrowRight"));
    }

    #[test]
    fn test_codes_are_case_sensitive() {
        let map = KeyboardMap::default();
        assert_eq!(map.lookup("keyw"), None);
    }

    #[test]
    fn test_unmapped_code_returns_none() {
        assert_eq!(KeyboardMap::default().lookup("F5"), None);
    }

    #[test]
    fn test_from_pairs_replaces_defaults() {
        let map = KeyboardMap::from_pairs([("KeyJ".to_string(), LogicalButton::A)]);
        assert_eq!(map.len(), 1);
        assert_eq!(map.lookup("KeyX"), None);
        assert_eq!(map.lookup("KeyJ"), Some(LogicalButton::A));
    }
}

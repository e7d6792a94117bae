//! The eight logical buttons of the MTMC game pad and their bit positions in
//! the device-state byte.
//!
//! The bit layout matches the emulator's IO register, high bit first:
//!
//! ```text
//!   bit:   7    6     5     4      3      2      1  0
//!        [up][down][left][right][start][select][b][a]
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ButtonParseError;

/// One of the eight named input actions, independent of the physical source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalButton {
    Up,
    Down,
    Left,
    Right,
    Start,
    Select,
    B,
    A,
}

impl LogicalButton {
    /// All buttons, from the highest bit to the lowest.
    pub const ALL: [LogicalButton; 8] = [
        LogicalButton::Up,
        LogicalButton::Down,
        LogicalButton::Left,
        LogicalButton::Right,
        LogicalButton::Start,
        LogicalButton::Select,
        LogicalButton::B,
        LogicalButton::A,
    ];

    /// The single bit this button occupies in the device-state byte.
    pub const fn mask(self) -> u8 {
        match self {
            LogicalButton::Up => 0b1000_0000,
            LogicalButton::Down => 0b0100_0000,
            LogicalButton::Left => 0b0010_0000,
            LogicalButton::Right => 0b0001_0000,
            LogicalButton::Start => 0b0000_1000,
            LogicalButton::Select => 0b0000_0100,
            LogicalButton::B => 0b0000_0010,
            LogicalButton::A => 0b0000_0001,
        }
    }

    /// Lowercase name used in config files and on-screen region ids.
    pub const fn name(self) -> &'static str {
        match self {
            LogicalButton::Up => "up",
            LogicalButton::Down => "down",
            LogicalButton::Left => "left",
            LogicalButton::Right => "right",
            LogicalButton::Start => "start",
            LogicalButton::Select => "select",
            LogicalButton::B => "b",
            LogicalButton::A => "a",
        }
    }
}

impl fmt::Display for LogicalButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LogicalButton {
    type Err = ButtonParseError;

    /// Parses a button name case-insensitively (`"UP"`, `"up"`, `" Up "`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        LogicalButton::ALL
            .into_iter()
            .find(|b| b.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ButtonParseError::UnknownButton(s.to_string()))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

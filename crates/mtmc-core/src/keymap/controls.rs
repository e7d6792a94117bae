//! On-screen control regions.
//!
//! Each pressable region of the on-screen game pad is identified by the name
//! of the logical button it drives, so the table is simply the button-name
//! parser.  Matching is case-insensitive.

use super::LogicalButton;

/// Region id → logical button for the on-screen controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlMap;

impl ControlMap {
    /// Returns the button bound to `region`, or `None` for an unknown region.
    pub fn lookup(&self, region: &str) -> Option<LogicalButton> {
        region.parse().ok()
    }
}

//! Client configuration types.
//!
//! [`ClientConfig`] is the single source of truth for all runtime settings.
//! It is assembled once at startup from the TOML file and the command line
//! (see `infrastructure::storage::config`), then handed to each component.
//!
//! Keeping it a plain struct (no global state, no environment reads inside
//! the domain) means tests can build one with struct-update syntax.

use std::time::Duration;

use mtmc_core::keymap::{GamepadMap, KeyboardMap};
use mtmc_core::SurfaceMaps;

/// Default server root.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8081";
/// Default push endpoint path.
pub const DEFAULT_SSE_PATH: &str = "/sse";
/// Default gamepad poll interval, roughly one 60 Hz frame.
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// All runtime configuration for the client.
///
/// # Example
///
/// ```rust
/// use mtmc_client::domain::ClientConfig;
///
/// let cfg = ClientConfig::default();
/// assert_eq!(cfg.sse_url(), "http://localhost:8081/sse");
/// assert_eq!(cfg.endpoint_url("/io/80"), "http://localhost:8081/io/80");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Root URL of the MTMC server, without a trailing path.
    pub server_url: String,
    /// Path of the push endpoint relative to `server_url`.
    pub sse_path: String,
    /// How often connected controllers are polled.
    pub frame_interval: Duration,
    /// Fallback `tracing` filter when `RUST_LOG` is unset.
    pub log_level: String,
    /// Keyboard code → logical button.
    pub keyboard: KeyboardMap,
    /// Controller button index → logical button.
    pub gamepad: GamepadMap,
}

impl ClientConfig {
    /// Full URL of the push endpoint.
    pub fn sse_url(&self) -> String {
        self.endpoint_url(&self.sse_path)
    }

    /// Joins `path` onto the server root with exactly one `/` between them.
    pub fn endpoint_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.server_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// The surface lookup tables built from the configured bindings.
    pub fn surface_maps(&self) -> SurfaceMaps {
        SurfaceMaps::new(self.keyboard.clone(), self.gamepad.clone())
    }
}

impl Default for ClientConfig {
    /// | Field            | Default                  |
    /// |------------------|--------------------------|
    /// | server_url       | `http://localhost:8081`  |
    /// | sse_path         | `/sse`                   |
    /// | frame_interval   | 16 ms                    |
    /// | log_level        | `info`                   |
    /// | keyboard/gamepad | built-in bindings        |
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            sse_path: DEFAULT_SSE_PATH.to_string(),
            frame_interval: DEFAULT_FRAME_INTERVAL,
            log_level: "info".to_string(),
            keyboard: KeyboardMap::default(),
            gamepad: GamepadMap::default(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use mtmc_core::LogicalButton;

    #[test]
    fn test_default_server_url_is_localhost_8081() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.server_url, "http://localhost:8081");
    }

    #[test]
    fn test_default_frame_interval_is_16ms() {
        assert_eq!(ClientConfig::default().frame_interval, Duration::from_millis(16));
    }

    #[test]
    fn test_endpoint_url_collapses_duplicate_slashes() {
        // Arrange
        let cfg = ClientConfig {
            server_url: "http://mtmc.local:9000/".to_string(),
            ..ClientConfig::default()
        };

        // Act / Assert
        assert_eq!(cfg.endpoint_url("/cmd"), "http://mtmc.local:9000/cmd");
        assert_eq!(cfg.endpoint_url("readstr"), "http://mtmc.local:9000/readstr");
    }

    #[test]
    fn test_sse_url_uses_configured_path() {
        let cfg = ClientConfig {
            sse_path: "/events".to_string(),
            ..ClientConfig::default()
        };
        assert_eq!(cfg.sse_url(), "http://localhost:8081/events");
    }

    #[test]
    fn test_surface_maps_carry_custom_keyboard() {
        let cfg = ClientConfig {
            keyboard: KeyboardMap::from_pairs([("KeyK".to_string(), LogicalButton::A)]),
            ..ClientConfig::default()
        };
        let maps = cfg.surface_maps();
        assert_eq!(maps.keyboard.lookup("KeyK"), Some(LogicalButton::A));
        assert_eq!(maps.gamepad.lookup(0), Some(LogicalButton::A));
    }
}

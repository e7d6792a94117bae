//! ClientSession: the single owner of all client-side interaction state.
//!
//! The session bundles the console state machine, the virtual device
//! encoder, the rendered tree, and the current focus.  Every handler (push
//! event, keystroke, input edge, frame tick) is a `&mut self` method that
//! runs to completion, so no locking is needed.
//!
//! # Architecture
//!
//! The session depends only on two traits:
//!
//! - [`RequestSink`] receives every outbound request.  The HTTP
//!   implementation fires a POST and forgets it; tests record calls.
//! - [`StepHighlighter`] receives `update:step-execution` payloads for the
//!   editor collaborator.
//!
//! Both are injected at construction time, making the session fully
//! unit-testable without a server.

use mtmc_core::{
    ButtonEdge, ConsoleSession, EventDecodeError, KeyInput, KeyOutcome, OutboundRequest, Panel,
    ServerEvent, ServerEventKind, StepExecution, SurfaceMaps, VirtualDeviceEncoder,
};
use std::ops::ControlFlow;

use tracing::{debug, info};

use crate::application::gamepad::{GamepadSource, VirtualGamepads};
use crate::application::render::{PatchOutcome, RenderTree, TransientState};

/// Mount point that shows the emulator display.
pub const DISPLAY_MOUNT: &str = "display";
/// Mount point that hosts the console.
pub const CONSOLE_MOUNT: &str = "console";

/// Trait for delivering outbound requests to the server.
///
/// Implementations must not block: the caller is the dispatch loop.
#[cfg_attr(test, mockall::automock)]
pub trait RequestSink: Send {
    /// Hands `request` off for delivery.  No result is reported back.
    fn submit(&self, request: OutboundRequest);
}

/// Trait for the editor collaborator that highlights the executing line.
#[cfg_attr(test, mockall::automock)]
pub trait StepHighlighter: Send {
    fn highlight(&self, step: &StepExecution);
}

/// Highlighter for a client without an editor: logs the position.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingHighlighter;

impl StepHighlighter for LoggingHighlighter {
    fn highlight(&self, step: &StepExecution) {
        info!(program = %step.program, asm = ?step.asm, src = ?step.src, "step");
    }
}

/// Which surface receives keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// Keystrokes go to the console.
    #[default]
    Console,
    /// Key codes drive the virtual game pad.
    PlaySurface,
}

impl Focus {
    fn mount_id(self) -> &'static str {
        match self {
            Focus::Console => CONSOLE_MOUNT,
            Focus::PlaySurface => DISPLAY_MOUNT,
        }
    }
}

/// One local input, as produced by a front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalInput {
    /// A console keystroke.
    Key(KeyInput),
    /// Press or release of an on-screen control region.
    Control { region: String, edge: ButtonEdge },
    /// A keyboard key-down, by key code.
    KeyDown(String),
    /// A keyboard key-up, by key code.
    KeyUp(String),
    /// Move keyboard focus.
    Focus(Focus),
    /// Set a button on a software controller.
    Pad { pad: usize, button: usize, pressed: bool },
    /// Disconnect a software controller.
    Unplug(usize),
    /// A request sent as-is (execution control, speed, memory format).
    Send(OutboundRequest),
    /// Leave the session.
    Quit,
}

/// Panels whose scroll position survives a server refresh.
fn keeps_scroll(panel: Panel) -> bool {
    matches!(panel, Panel::Memory | Panel::MemoryPanel)
}

/// The client-side session.
pub struct ClientSession {
    console: ConsoleSession,
    device: VirtualDeviceEncoder,
    tree: RenderTree,
    focus: Focus,
    sink: Box<dyn RequestSink>,
    highlighter: Box<dyn StepHighlighter>,
}

impl ClientSession {
    /// Creates a session with the default mount points and console focus.
    pub fn new(
        maps: SurfaceMaps,
        sink: Box<dyn RequestSink>,
        highlighter: Box<dyn StepHighlighter>,
    ) -> Self {
        let mut tree = RenderTree::default();
        tree.focus(CONSOLE_MOUNT);
        Self {
            console: ConsoleSession::new(),
            device: VirtualDeviceEncoder::new(maps),
            tree,
            focus: Focus::Console,
            sink,
            highlighter,
        }
    }

    pub fn console(&self) -> &ConsoleSession {
        &self.console
    }

    pub fn device(&self) -> &VirtualDeviceEncoder {
        &self.device
    }

    pub fn tree(&self) -> &RenderTree {
        &self.tree
    }

    /// Mutable access for front ends that track scroll or selection.
    pub fn tree_mut(&mut self) -> &mut RenderTree {
        &mut self.tree
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    // ── Push events ──────────────────────────────────────────────────────────

    /// Decodes and applies one raw push event.
    ///
    /// Unknown event names are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`EventDecodeError`] if a structured payload is malformed.
    /// The session is left unchanged and stays usable.
    pub fn apply_raw(&mut self, name: &str, data: &str) -> Result<(), EventDecodeError> {
        let Some(kind) = ServerEventKind::from_name(name) else {
            debug!(event = name, "ignoring unknown push event");
            return Ok(());
        };
        let event = ServerEvent::decode(kind, data)?;
        self.apply_event(event);
        Ok(())
    }

    /// Applies a decoded push event.
    pub fn apply_event(&mut self, event: ServerEvent) {
        debug!(event = %event.kind(), "push event");
        match event {
            ServerEvent::PanelUpdate { panel, markup } => self.replace_panel(panel, markup),
            ServerEvent::Display { image_ref } => {
                self.tree.set_attribute(DISPLAY_MOUNT, "src", image_ref);
            }
            ServerEvent::StepExecution(step) => self.highlighter.highlight(&step),
            console_event @ (ServerEvent::ConsoleOutput(_)
            | ServerEvent::ConsolePartial(_)
            | ServerEvent::ConsoleMode { .. }) => {
                self.console.handle_event(&console_event);
            }
        }
    }

    fn replace_panel(&mut self, panel: Panel, markup: String) {
        let id = panel.mount_id();
        let saved = if keeps_scroll(panel) {
            self.tree.snapshot_transient(id)
        } else {
            None
        };
        if self.tree.replace_outer(id, markup) == PatchOutcome::MissingMountPoint {
            return;
        }
        if let Some(saved) = saved {
            let restored = TransientState {
                scroll_offset: saved.scroll_offset,
                ..TransientState::default()
            };
            self.tree.restore_transient(id, restored);
        }
    }

    // ── Local input ──────────────────────────────────────────────────────────

    /// Moves keyboard focus between the console and the play surface.
    pub fn set_focus(&mut self, focus: Focus) {
        if self.focus != focus {
            debug!(?focus, "focus changed");
        }
        self.focus = focus;
        self.tree.focus(focus.mount_id());
    }

    /// Applies a console keystroke.  Ignored unless the console has focus.
    pub fn handle_key(&mut self, key: KeyInput) -> KeyOutcome {
        if self.focus != Focus::Console {
            return KeyOutcome::Suppressed;
        }
        let outcome = self.console.handle_key(key);
        if let Some(request) = outcome.request() {
            self.sink.submit(request.clone());
        }
        outcome
    }

    /// Applies a press or release on an on-screen control region.
    pub fn control_edge(&mut self, region: &str, edge: ButtonEdge) {
        let request = self.device.control_edge(region, edge);
        self.forward(request);
    }

    /// Applies a keyboard key-down.  Ignored unless the play surface has
    /// focus.
    pub fn key_down(&mut self, code: &str) {
        if self.focus != Focus::PlaySurface {
            return;
        }
        let request = self.device.key_down(code);
        self.forward(request);
    }

    /// Applies a keyboard key-up.  Ignored unless the play surface has focus.
    pub fn key_up(&mut self, code: &str) {
        if self.focus != Focus::PlaySurface {
            return;
        }
        let request = self.device.key_up(code);
        self.forward(request);
    }

    /// Runs one frame of controller polling.  Nothing is polled while no
    /// controller is connected.
    pub fn on_frame(&mut self, source: &mut dyn GamepadSource) {
        if !source.connected() {
            return;
        }
        let pads = source.poll();
        let request = self.device.gamepad_frame(&pads);
        self.forward(request);
    }

    /// Sends a request that is not produced by the state machines.
    pub fn send(&mut self, request: OutboundRequest) {
        self.sink.submit(request);
    }

    /// Routes one front-end input to the matching handler.
    ///
    /// Software controller directives update `pads`; the session picks them
    /// up on the next frame.  Returns [`ControlFlow::Break`] for
    /// [`LocalInput::Quit`].
    pub fn apply_input(&mut self, input: LocalInput, pads: &mut VirtualGamepads) -> ControlFlow<()> {
        match input {
            LocalInput::Key(key) => {
                self.handle_key(key);
            }
            LocalInput::Control { region, edge } => self.control_edge(&region, edge),
            LocalInput::KeyDown(code) => self.key_down(&code),
            LocalInput::KeyUp(code) => self.key_up(&code),
            LocalInput::Focus(focus) => self.set_focus(focus),
            LocalInput::Pad {
                pad,
                button,
                pressed,
            } => pads.set_button(pad, button, pressed),
            LocalInput::Unplug(pad) => {
                if !pads.unplug(pad) {
                    debug!(pad, "unplug of unknown controller ignored");
                }
            }
            LocalInput::Send(request) => self.send(request),
            LocalInput::Quit => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    fn forward(&self, request: Option<OutboundRequest>) {
        if let Some(request) = request {
            self.sink.submit(request);
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::gamepad::MockGamepadSource;
    use mockall::predicate::eq;
    use mtmc_core::{ConsoleMode, GamepadSnapshot};

    fn session_with(sink: MockRequestSink) -> ClientSession {
        let mut highlighter = MockStepHighlighter::new();
        highlighter.expect_highlight().never();
        ClientSession::new(SurfaceMaps::default(), Box::new(sink), Box::new(highlighter))
    }

    fn silent_sink() -> MockRequestSink {
        let mut sink = MockRequestSink::new();
        sink.expect_submit().never();
        sink
    }

    // ── Push events ──────────────────────────────────────────────────────────

    #[test]
    fn test_new_session_focuses_console() {
        let session = session_with(silent_sink());
        assert_eq!(session.focus(), Focus::Console);
        assert!(session.tree().find(CONSOLE_MOUNT).unwrap().transient().focused);
    }

    #[test]
    fn test_panel_update_replaces_mount_point() {
        // Arrange
        let mut session = session_with(silent_sink());

        // Act
        session
            .apply_raw("update:registers", "<div id=\"registers\">pc=0</div>")
            .unwrap();

        // Assert
        assert_eq!(
            session.tree().find("registers").unwrap().outer_markup(),
            "<div id=\"registers\">pc=0</div>"
        );
    }

    #[test]
    fn test_memory_panel_scroll_survives_refresh() {
        // Arrange
        let mut session = session_with(silent_sink());
        session.tree_mut().scroll_to("memory", 320);
        session.tree_mut().select("memory", Some((0, 4)));

        // Act
        session.apply_raw("update:memory", "<table/>").unwrap();

        // Assert: scroll restored, selection lost
        let state = session.tree().find("memory").unwrap().transient();
        assert_eq!(state.scroll_offset, 320);
        assert_eq!(state.selection, None);
    }

    #[test]
    fn test_other_panels_lose_scroll_on_refresh() {
        let mut session = session_with(silent_sink());
        session.tree_mut().scroll_to("filesystem", 80);

        session.apply_raw("update:filesystem", "<ul/>").unwrap();

        assert_eq!(session.tree().find("filesystem").unwrap().transient().scroll_offset, 0);
    }

    #[test]
    fn test_display_update_sets_src_attribute() {
        let mut session = session_with(silent_sink());
        session.apply_raw("update:display", "data:image/png;base64,AAA=").unwrap();
        assert_eq!(
            session.tree().find(DISPLAY_MOUNT).unwrap().attribute("src"),
            Some("data:image/png;base64,AAA=")
        );
    }

    #[test]
    fn test_step_execution_is_forwarded_to_highlighter() {
        // Arrange
        let mut highlighter = MockStepHighlighter::new();
        highlighter
            .expect_highlight()
            .withf(|step| step.program == "loop.asm" && step.asm == Some(7) && step.src.is_none())
            .times(1)
            .return_const(());
        let mut session = ClientSession::new(
            SurfaceMaps::default(),
            Box::new(silent_sink()),
            Box::new(highlighter),
        );

        // Act
        let result = session.apply_raw(
            "update:step-execution",
            r#"{"program":"loop.asm","asm":7,"src":null}"#,
        );

        // Assert
        assert!(result.is_ok());
    }

    #[test]
    fn test_malformed_step_payload_errors_and_next_event_still_applies() {
        // Arrange
        let mut session = session_with(silent_sink());

        // Act
        let bad = session.apply_raw("update:step-execution", "{oops");
        let good = session.apply_raw("console-output", "still here");

        // Assert
        assert!(bad.is_err());
        assert!(good.is_ok());
        assert_eq!(session.console().transcript().iter().last(), Some("still here"));
    }

    #[test]
    fn test_unknown_event_name_is_ignored() {
        let mut session = session_with(silent_sink());
        assert!(session.apply_raw("update:tooltip", "x").is_ok());
    }

    #[test]
    fn test_mode_event_switches_console_mode() {
        let mut session = session_with(silent_sink());
        session.apply_raw("console-readchar", "").unwrap();
        assert_eq!(session.console().mode(), ConsoleMode::ReadChar);
    }

    // ── Console keystrokes ───────────────────────────────────────────────────

    #[test]
    fn test_enter_submits_line_through_sink() {
        // Arrange
        let mut sink = MockRequestSink::new();
        sink.expect_submit()
            .with(eq(OutboundRequest::Command("run".to_string())))
            .times(1)
            .return_const(());
        let mut session = session_with(sink);

        // Act
        for c in "run".chars() {
            session.handle_key(KeyInput::Char(c));
        }
        session.handle_key(KeyInput::Enter);

        // Assert: the mock verifies the single submit on drop
        assert_eq!(session.console().buffer(), "");
    }

    #[test]
    fn test_read_char_forwards_through_sink() {
        let mut sink = MockRequestSink::new();
        sink.expect_submit()
            .with(eq(OutboundRequest::ReadChar('q')))
            .times(1)
            .return_const(());
        let mut session = session_with(sink);
        session.apply_raw("console-readchar", "").unwrap();

        session.handle_key(KeyInput::Char('q'));
    }

    #[test]
    fn test_console_keys_ignored_while_play_surface_focused() {
        let mut session = session_with(silent_sink());
        session.set_focus(Focus::PlaySurface);

        let outcome = session.handle_key(KeyInput::Char('x'));

        assert_eq!(outcome, KeyOutcome::Suppressed);
        assert_eq!(session.console().buffer(), "");
    }

    // ── Device edges ─────────────────────────────────────────────────────────

    #[test]
    fn test_keyboard_edges_ignored_without_play_focus() {
        let mut session = session_with(silent_sink());
        session.key_down("ArrowUp");
        session.key_up("ArrowUp");
        assert_eq!(session.device().mask(), 0);
    }

    #[test]
    fn test_keyboard_edges_with_play_focus_send_bytes() {
        // Arrange
        let mut sink = MockRequestSink::new();
        let mut seq = mockall::Sequence::new();
        sink.expect_submit()
            .with(eq(OutboundRequest::DeviceState(0x80)))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        sink.expect_submit()
            .with(eq(OutboundRequest::DeviceState(0x00)))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        let mut session = session_with(sink);
        session.set_focus(Focus::PlaySurface);

        // Act: down, auto-repeat, up
        session.key_down("ArrowUp");
        session.key_down("ArrowUp");
        session.key_up("ArrowUp");
    }

    #[test]
    fn test_control_edges_work_regardless_of_focus() {
        let mut sink = MockRequestSink::new();
        sink.expect_submit()
            .with(eq(OutboundRequest::DeviceState(0x08)))
            .times(1)
            .return_const(());
        let mut session = session_with(sink);

        session.control_edge("start", ButtonEdge::Press);

        assert_eq!(session.device().mask(), 0x08);
    }

    #[test]
    fn test_frame_skips_poll_when_no_controller_connected() {
        // Arrange
        let mut source = MockGamepadSource::new();
        source.expect_connected().return_const(false);
        source.expect_poll().never();
        let mut session = session_with(silent_sink());

        // Act / Assert: poll() must not be called
        for _ in 0..10 {
            session.on_frame(&mut source);
        }
    }

    #[test]
    fn test_held_controller_button_sends_once() {
        // Arrange
        let mut source = MockGamepadSource::new();
        source.expect_connected().return_const(true);
        source
            .expect_poll()
            .times(30)
            .returning(|| vec![GamepadSnapshot::released(0, 17).with_button(0, true)]);
        let mut sink = MockRequestSink::new();
        sink.expect_submit()
            .with(eq(OutboundRequest::DeviceState(0x01)))
            .times(1)
            .return_const(());
        let mut session = session_with(sink);

        // Act
        for _ in 0..30 {
            session.on_frame(&mut source);
        }
    }

    #[test]
    fn test_send_passes_request_through() {
        let mut sink = MockRequestSink::new();
        sink.expect_submit()
            .with(eq(OutboundRequest::ToggleMemoryFormat))
            .times(1)
            .return_const(());
        let mut session = session_with(sink);

        session.send(OutboundRequest::ToggleMemoryFormat);
    }

    // ── Local input routing ──────────────────────────────────────────────────

    #[test]
    fn test_apply_input_quit_breaks() {
        let mut session = session_with(silent_sink());
        let mut pads = VirtualGamepads::default();

        let flow = session.apply_input(LocalInput::Quit, &mut pads);

        assert_eq!(flow, ControlFlow::Break(()));
    }

    #[test]
    fn test_apply_input_typed_line_submits_command() {
        // Arrange
        let mut sink = MockRequestSink::new();
        sink.expect_submit()
            .with(eq(OutboundRequest::Command("ls".to_string())))
            .times(1)
            .return_const(());
        let mut session = session_with(sink);
        let mut pads = VirtualGamepads::default();

        // Act
        for key in [KeyInput::Char('l'), KeyInput::Char('s'), KeyInput::Enter] {
            let flow = session.apply_input(LocalInput::Key(key), &mut pads);
            assert_eq!(flow, ControlFlow::Continue(()));
        }
    }

    #[test]
    fn test_apply_input_pad_directive_reaches_next_frame() {
        // Arrange
        let mut sink = MockRequestSink::new();
        sink.expect_submit()
            .with(eq(OutboundRequest::DeviceState(0x08)))
            .times(1)
            .return_const(());
        let mut session = session_with(sink);
        let mut pads = VirtualGamepads::default();

        // Act: button 9 is start in the standard mapping
        session.apply_input(
            LocalInput::Pad {
                pad: 0,
                button: 9,
                pressed: true,
            },
            &mut pads,
        );
        session.on_frame(&mut pads);
    }

    #[test]
    fn test_apply_input_focus_then_keydown_sends_device_state() {
        let mut sink = MockRequestSink::new();
        sink.expect_submit()
            .with(eq(OutboundRequest::DeviceState(0x01)))
            .times(1)
            .return_const(());
        let mut session = session_with(sink);
        let mut pads = VirtualGamepads::default();

        session.apply_input(LocalInput::Focus(Focus::PlaySurface), &mut pads);
        session.apply_input(LocalInput::KeyDown("KeyX".to_string()), &mut pads);

        assert_eq!(session.focus(), Focus::PlaySurface);
    }
}

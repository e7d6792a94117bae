//! Mode-governed console input state machine.
//!
//! # How the console works (for beginners)
//!
//! The program running on the emulator decides what kind of input it wants.
//! The server announces that decision with one of four push events
//! (`console-ready`, `console-readstr`, `console-readint`, `console-readchar`),
//! each carrying a prompt string.  The client never changes mode on its own;
//! it only enforces the keystroke policy of the mode it was told about:
//!
//! | Mode         | Keystrokes                                            |
//! |--------------|-------------------------------------------------------|
//! | `Ready`      | free text, history navigation, Enter posts to `/cmd`  |
//! | `ReadString` | free text, history navigation, Enter posts to `/readstr` |
//! | `ReadInt`    | digits and one leading `-`, Enter posts to `/readint` |
//! | `ReadChar`   | every character is posted to `/readchar` immediately  |
//!
//! Output arrives separately: `console-output` carries committed lines and
//! `console-partial` carries the unterminated tail of the current line.

use std::collections::VecDeque;

use tracing::{debug, info};

use crate::domain::transcript::Transcript;
use crate::protocol::events::ServerEvent;
use crate::protocol::requests::OutboundRequest;

/// Which input-acceptance policy governs keystroke handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConsoleMode {
    /// Waiting for a shell command.
    #[default]
    Ready,
    /// The running program waits for a single character.
    ReadChar,
    /// The running program waits for a line of text.
    ReadString,
    /// The running program waits for an integer.
    ReadInt,
}

impl ConsoleMode {
    /// Prompt shown when the server sends an empty prompt string.
    pub fn default_prompt(self) -> &'static str {
        match self {
            ConsoleMode::Ready => "mtmc$",
            ConsoleMode::ReadChar => ">",
            ConsoleMode::ReadString => ">",
            ConsoleMode::ReadInt => "#",
        }
    }

    /// Whether lines submitted in this mode are pushed onto the command
    /// history.
    ///
    /// `ReadInt` shares the `ReadString` exclusion, so only shell commands
    /// entered in `Ready` mode are recalled with the arrow keys.
    pub fn records_history(self) -> bool {
        matches!(self, ConsoleMode::Ready)
    }

    /// Whether ArrowUp / ArrowDown walk the command history in this mode.
    fn navigates_history(self) -> bool {
        matches!(self, ConsoleMode::Ready | ConsoleMode::ReadString)
    }
}

/// One local keystroke delivered to the console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyInput {
    /// A printable character.
    Char(char),
    Enter,
    Backspace,
    Delete,
    ArrowUp,
    ArrowDown,
    /// Any other named key (`Tab`, `Escape`, ...).
    Other(String),
}

/// What the console did with a keystroke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Default handling ran; the buffer may have changed.
    Edited,
    /// Default handling was prevented; nothing changed.
    Suppressed,
    /// `ReadChar`: the character was posted immediately.
    Forwarded(OutboundRequest),
    /// Enter: the buffered line was posted.
    Submitted(OutboundRequest),
}

impl KeyOutcome {
    /// The outbound request produced by this keystroke, if any.
    pub fn request(&self) -> Option<&OutboundRequest> {
        match self {
            KeyOutcome::Forwarded(req) | KeyOutcome::Submitted(req) => Some(req),
            KeyOutcome::Edited | KeyOutcome::Suppressed => None,
        }
    }

    /// Consumes the outcome and returns its outbound request, if any.
    pub fn into_request(self) -> Option<OutboundRequest> {
        match self {
            KeyOutcome::Forwarded(req) | KeyOutcome::Submitted(req) => Some(req),
            KeyOutcome::Edited | KeyOutcome::Suppressed => None,
        }
    }
}

/// A borrowed snapshot of everything a front end needs to draw the console.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleView<'a> {
    pub transcript: &'a Transcript,
    pub partial_line: Option<&'a str>,
    pub prompt: &'a str,
    pub buffer: &'a str,
    pub mode: ConsoleMode,
}

/// The console: mode, prompt, input buffer, command history, and transcript.
///
/// History is stored most-recent-first.  The cursor is `None` when no history
/// entry is selected and `Some(i)` when the buffer shows `history[i]`.
#[derive(Debug, Clone)]
pub struct ConsoleSession {
    mode: ConsoleMode,
    prompt: String,
    buffer: String,
    history: VecDeque<String>,
    history_cursor: Option<usize>,
    transcript: Transcript,
    partial_line: Option<String>,
}

impl ConsoleSession {
    /// Creates a console in `Ready` mode with the default prompt.
    pub fn new() -> Self {
        Self::with_transcript(Transcript::new())
    }

    /// Creates a console that records output into `transcript`.
    pub fn with_transcript(transcript: Transcript) -> Self {
        Self {
            mode: ConsoleMode::Ready,
            prompt: ConsoleMode::Ready.default_prompt().to_string(),
            buffer: String::new(),
            history: VecDeque::new(),
            history_cursor: None,
            transcript,
            partial_line: None,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn mode(&self) -> ConsoleMode {
        self.mode
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Submitted commands, most recent first.
    pub fn history(&self) -> impl Iterator<Item = &str> {
        self.history.iter().map(String::as_str)
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn history_cursor(&self) -> Option<usize> {
        self.history_cursor
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn partial_line(&self) -> Option<&str> {
        self.partial_line.as_deref()
    }

    /// Returns a snapshot for drawing.
    pub fn render(&self) -> ConsoleView<'_> {
        ConsoleView {
            transcript: &self.transcript,
            partial_line: self.partial_line.as_deref(),
            prompt: &self.prompt,
            buffer: &self.buffer,
            mode: self.mode,
        }
    }

    // ── Server-driven transitions ────────────────────────────────────────────

    /// Applies a console-related push event.
    ///
    /// Returns `false` for events that do not concern the console, leaving
    /// the session untouched.
    pub fn handle_event(&mut self, event: &ServerEvent) -> bool {
        match event {
            ServerEvent::ConsoleOutput(text) => {
                self.apply_output(text);
                true
            }
            ServerEvent::ConsolePartial(text) => {
                self.set_partial(text);
                true
            }
            ServerEvent::ConsoleMode { mode, prompt } => {
                self.enter_mode(*mode, prompt);
                true
            }
            ServerEvent::PanelUpdate { .. }
            | ServerEvent::Display { .. }
            | ServerEvent::StepExecution(_) => false,
        }
    }

    /// Switches to `mode` with `raw_prompt`, trimmed.  An empty prompt, or
    /// the server's `{}` placeholder, falls back to
    /// [`ConsoleMode::default_prompt`].
    ///
    /// The input buffer is kept, except that entering `ReadInt` drops a
    /// buffer that is not an integer prefix.
    pub fn enter_mode(&mut self, mode: ConsoleMode, raw_prompt: &str) {
        let trimmed = raw_prompt.trim();
        self.prompt = if trimmed.is_empty() || trimmed == EMPTY_PROMPT_PAYLOAD {
            mode.default_prompt().to_string()
        } else {
            trimmed.to_string()
        };
        if mode == ConsoleMode::ReadInt && !is_integer_prefix(&self.buffer) {
            debug!(buffer = %self.buffer, "dropping non-numeric input on ReadInt");
            self.buffer.clear();
        }
        if self.mode != mode {
            info!(from = ?self.mode, to = ?mode, prompt = %self.prompt, "console mode changed");
        }
        self.mode = mode;
    }

    /// Appends a `console-output` payload to the transcript and clears the
    /// partial line.  Returns the number of lines appended.
    pub fn apply_output(&mut self, payload: &str) -> usize {
        self.partial_line = None;
        let n = self.transcript.append_output(payload);
        debug!(lines = n, "console output");
        n
    }

    /// Replaces the partial line with a `console-partial` payload.
    pub fn set_partial(&mut self, payload: &str) {
        self.partial_line = if payload.is_empty() {
            None
        } else {
            Some(payload.to_string())
        };
    }

    // ── Local keystrokes ─────────────────────────────────────────────────────

    /// Applies one keystroke under the current mode's policy.
    pub fn handle_key(&mut self, key: KeyInput) -> KeyOutcome {
        match self.mode {
            ConsoleMode::ReadChar => self.handle_read_char(key),
            ConsoleMode::ReadInt => self.handle_read_int(key),
            ConsoleMode::Ready | ConsoleMode::ReadString => self.handle_text(key),
        }
    }

    fn handle_read_char(&mut self, key: KeyInput) -> KeyOutcome {
        match key {
            KeyInput::Char(c) => KeyOutcome::Forwarded(OutboundRequest::ReadChar(c)),
            _ => KeyOutcome::Suppressed,
        }
    }

    fn handle_read_int(&mut self, key: KeyInput) -> KeyOutcome {
        match key {
            KeyInput::Char(c) if c.is_ascii_digit() => {
                self.buffer.push(c);
                KeyOutcome::Edited
            }
            KeyInput::Char('-') if self.buffer.is_empty() => {
                self.buffer.push('-');
                KeyOutcome::Edited
            }
            KeyInput::Backspace | KeyInput::Delete => self.edit(key),
            KeyInput::Enter => self.submit(),
            KeyInput::Char(_) | KeyInput::ArrowUp | KeyInput::ArrowDown | KeyInput::Other(_) => {
                KeyOutcome::Suppressed
            }
        }
    }

    fn handle_text(&mut self, key: KeyInput) -> KeyOutcome {
        match key {
            KeyInput::Enter => self.submit(),
            KeyInput::ArrowUp => {
                self.history_older();
                KeyOutcome::Edited
            }
            KeyInput::ArrowDown => {
                self.history_newer();
                KeyOutcome::Edited
            }
            other => self.edit(other),
        }
    }

    /// Default buffer editing with the caret at the end of the buffer.
    fn edit(&mut self, key: KeyInput) -> KeyOutcome {
        match key {
            KeyInput::Char(c) => {
                self.buffer.push(c);
            }
            KeyInput::Backspace => {
                self.buffer.pop();
            }
            // Nothing to the right of the caret.
            KeyInput::Delete | KeyInput::Other(_) => {}
            KeyInput::Enter | KeyInput::ArrowUp | KeyInput::ArrowDown => {}
        }
        KeyOutcome::Edited
    }

    /// Commits the buffer: echoes it into the transcript, records history
    /// when the mode allows it, and builds the mode's outbound request.
    fn submit(&mut self) -> KeyOutcome {
        let line = std::mem::take(&mut self.buffer);
        self.transcript.push(format!("{} {}", self.prompt, line));
        if self.mode.records_history() {
            self.history.push_front(line.clone());
        }
        self.history_cursor = None;

        let request = match self.mode {
            ConsoleMode::ReadInt => OutboundRequest::ReadInt(line),
            ConsoleMode::ReadString => OutboundRequest::ReadString(line),
            ConsoleMode::Ready | ConsoleMode::ReadChar => OutboundRequest::Command(line),
        };
        debug!(endpoint = request.label(), "console line submitted");
        KeyOutcome::Submitted(request)
    }

    /// ArrowUp: move toward older entries, clamped at the oldest.
    pub fn history_older(&mut self) {
        if !self.mode.navigates_history() || self.history.is_empty() {
            return;
        }
        let last = self.history.len() - 1;
        let next = match self.history_cursor {
            None => 0,
            Some(i) => (i + 1).min(last),
        };
        self.select_history(next);
    }

    /// ArrowDown: move toward newer entries; past the newest the cursor
    /// resets and the buffer empties.
    pub fn history_newer(&mut self) {
        if !self.mode.navigates_history() {
            return;
        }
        match self.history_cursor {
            Some(i) if i > 0 => self.select_history(i - 1),
            _ => {
                self.history_cursor = None;
                self.buffer.clear();
            }
        }
    }

    fn select_history(&mut self, index: usize) {
        if let Some(entry) = self.history.get(index) {
            self.buffer.clone_from(entry);
            self.history_cursor = Some(index);
        }
    }
}

impl Default for ConsoleSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Payload the server sends with `console-ready` after a command.
const EMPTY_PROMPT_PAYLOAD: &str = "{}";

/// `true` for text `ReadInt` could have built: an optional leading `-`
/// followed by digits.
fn is_integer_prefix(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    digits.chars().all(|c| c.is_ascii_digit())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn type_line(console: &mut ConsoleSession, text: &str) -> Vec<KeyOutcome> {
        text.chars().map(|c| console.handle_key(KeyInput::Char(c))).collect()
    }

    fn submit_command(console: &mut ConsoleSession, text: &str) {
        type_line(console, text);
        console.handle_key(KeyInput::Enter);
    }

    // ── Modes and prompts ─────────────────────────────────────────────────────

    #[test]
    fn test_new_console_is_ready_with_default_prompt() {
        let c = ConsoleSession::new();
        assert_eq!(c.mode(), ConsoleMode::Ready);
        assert_eq!(c.prompt(), "mtmc$");
        assert_eq!(c.history_cursor(), None);
    }

    #[test]
    fn test_enter_mode_trims_prompt() {
        let mut c = ConsoleSession::new();
        c.enter_mode(ConsoleMode::ReadString, "  name?  ");
        assert_eq!(c.mode(), ConsoleMode::ReadString);
        assert_eq!(c.prompt(), "name?");
    }

    #[test]
    fn test_enter_mode_empty_prompt_falls_back_per_mode() {
        let mut c = ConsoleSession::new();

        c.enter_mode(ConsoleMode::ReadInt, "   ");
        assert_eq!(c.prompt(), "#");
        c.enter_mode(ConsoleMode::ReadChar, "");
        assert_eq!(c.prompt(), ">");
        c.enter_mode(ConsoleMode::ReadString, "");
        assert_eq!(c.prompt(), ">");
        c.enter_mode(ConsoleMode::Ready, "");
        assert_eq!(c.prompt(), "mtmc$");
    }

    #[test]
    fn test_enter_read_string_keeps_buffer() {
        let mut c = ConsoleSession::new();
        type_line(&mut c, "abc");
        c.enter_mode(ConsoleMode::ReadString, ">");
        assert_eq!(c.buffer(), "abc");
    }

    #[test]
    fn test_enter_read_int_drops_text_typed_in_ready() {
        // Arrange
        let mut c = ConsoleSession::new();
        type_line(&mut c, "ls");

        // Act
        c.enter_mode(ConsoleMode::ReadInt, "#");
        let outcome = c.handle_key(KeyInput::Enter);

        // Assert
        assert_eq!(outcome, KeyOutcome::Submitted(OutboundRequest::ReadInt(String::new())));
    }

    #[test]
    fn test_enter_read_int_keeps_integer_prefix() {
        let mut c = ConsoleSession::new();
        type_line(&mut c, "-42");

        c.enter_mode(ConsoleMode::ReadInt, "#");

        assert_eq!(c.buffer(), "-42");
    }

    #[test]
    fn test_ready_placeholder_payload_uses_default_prompt() {
        let mut c = ConsoleSession::new();
        c.enter_mode(ConsoleMode::ReadString, "Name?");

        c.enter_mode(ConsoleMode::Ready, "{}");

        assert_eq!(c.prompt(), "mtmc$");
    }

    #[test]
    fn test_handle_event_ignores_non_console_events() {
        let mut c = ConsoleSession::new();
        let consumed = c.handle_event(&ServerEvent::Display {
            image_ref: "data:image/png;base64,AAAA".to_string(),
        });
        assert!(!consumed);
    }

    // ── Ready / ReadString ────────────────────────────────────────────────────

    #[test]
    fn test_ready_enter_posts_command_and_echoes_with_prompt() {
        // Arrange
        let mut c = ConsoleSession::new();
        type_line(&mut c, "help");

        // Act
        let outcome = c.handle_key(KeyInput::Enter);

        // Assert
        assert_eq!(outcome, KeyOutcome::Submitted(OutboundRequest::Command("help".into())));
        assert_eq!(c.buffer(), "");
        assert_eq!(c.transcript().iter().last(), Some("mtmc$ help"));
        assert_eq!(c.history().collect::<Vec<_>>(), vec!["help"]);
    }

    #[test]
    fn test_backspace_removes_last_character() {
        let mut c = ConsoleSession::new();
        type_line(&mut c, "lss");
        assert_eq!(c.handle_key(KeyInput::Backspace), KeyOutcome::Edited);
        assert_eq!(c.buffer(), "ls");
    }

    #[test]
    fn test_backspace_on_empty_buffer_is_harmless() {
        let mut c = ConsoleSession::new();
        assert_eq!(c.handle_key(KeyInput::Backspace), KeyOutcome::Edited);
        assert_eq!(c.buffer(), "");
    }

    #[test]
    fn test_delete_and_other_keys_leave_buffer_unchanged() {
        let mut c = ConsoleSession::new();
        type_line(&mut c, "ab");
        c.handle_key(KeyInput::Delete);
        c.handle_key(KeyInput::Other("Tab".into()));
        assert_eq!(c.buffer(), "ab");
    }

    #[test]
    fn test_read_string_submit_posts_readstr_without_history() {
        // Arrange
        let mut c = ConsoleSession::new();
        c.enter_mode(ConsoleMode::ReadString, "name?");
        type_line(&mut c, "Ada");

        // Act
        let outcome = c.handle_key(KeyInput::Enter);

        // Assert
        assert_eq!(outcome, KeyOutcome::Submitted(OutboundRequest::ReadString("Ada".into())));
        assert_eq!(c.history_len(), 0);
        assert_eq!(c.transcript().iter().last(), Some("name? Ada"));
    }

    #[test]
    fn test_ready_empty_line_is_still_submitted() {
        let mut c = ConsoleSession::new();
        let outcome = c.handle_key(KeyInput::Enter);
        assert_eq!(outcome, KeyOutcome::Submitted(OutboundRequest::Command(String::new())));
        assert_eq!(c.transcript().iter().last(), Some("mtmc$ "));
    }

    // ── ReadInt ───────────────────────────────────────────────────────────────

    #[test]
    fn test_read_int_accepts_only_digits() {
        // Arrange
        let mut c = ConsoleSession::new();
        c.enter_mode(ConsoleMode::ReadInt, "#");

        // Act
        let outcomes = type_line(&mut c, "1a2 3x");

        // Assert
        assert_eq!(c.buffer(), "123");
        assert_eq!(outcomes[1], KeyOutcome::Suppressed);
        assert_eq!(outcomes[3], KeyOutcome::Suppressed);
    }

    #[test]
    fn test_read_int_minus_only_when_buffer_empty() {
        let mut c = ConsoleSession::new();
        c.enter_mode(ConsoleMode::ReadInt, "");

        assert_eq!(c.handle_key(KeyInput::Char('-')), KeyOutcome::Edited);
        assert_eq!(c.handle_key(KeyInput::Char('-')), KeyOutcome::Suppressed);
        c.handle_key(KeyInput::Char('4'));
        assert_eq!(c.handle_key(KeyInput::Char('-')), KeyOutcome::Suppressed);
        assert_eq!(c.buffer(), "-4");
    }

    #[test]
    fn test_read_int_minus_allowed_again_after_backspace_empties_buffer() {
        let mut c = ConsoleSession::new();
        c.enter_mode(ConsoleMode::ReadInt, "");
        c.handle_key(KeyInput::Char('7'));
        c.handle_key(KeyInput::Backspace);
        assert_eq!(c.handle_key(KeyInput::Char('-')), KeyOutcome::Edited);
        assert_eq!(c.buffer(), "-");
    }

    #[test]
    fn test_read_int_suppresses_arrows_and_named_keys() {
        let mut c = ConsoleSession::new();
        submit_command(&mut c, "run");
        c.enter_mode(ConsoleMode::ReadInt, "#");

        assert_eq!(c.handle_key(KeyInput::ArrowUp), KeyOutcome::Suppressed);
        assert_eq!(c.handle_key(KeyInput::Other("Tab".into())), KeyOutcome::Suppressed);
        assert_eq!(c.buffer(), "");
    }

    #[test]
    fn test_read_int_delete_passes_through() {
        let mut c = ConsoleSession::new();
        c.enter_mode(ConsoleMode::ReadInt, "#");
        assert_eq!(c.handle_key(KeyInput::Delete), KeyOutcome::Edited);
    }

    #[test]
    fn test_read_int_line_is_not_pushed_to_history() {
        // Arrange
        let mut c = ConsoleSession::new();
        c.enter_mode(ConsoleMode::ReadInt, "#");
        type_line(&mut c, "42");

        // Act
        let outcome = c.handle_key(KeyInput::Enter);

        // Assert
        assert_eq!(outcome, KeyOutcome::Submitted(OutboundRequest::ReadInt("42".into())));
        assert_eq!(c.history_len(), 0);
        assert_eq!(c.transcript().iter().last(), Some("# 42"));
    }

    // ── ReadChar ──────────────────────────────────────────────────────────────

    #[test]
    fn test_read_char_forwards_each_character_without_buffering() {
        // Arrange
        let mut c = ConsoleSession::new();
        c.enter_mode(ConsoleMode::ReadChar, "");

        // Act
        let outcomes = type_line(&mut c, "hi");

        // Assert
        assert_eq!(
            outcomes,
            vec![
                KeyOutcome::Forwarded(OutboundRequest::ReadChar('h')),
                KeyOutcome::Forwarded(OutboundRequest::ReadChar('i')),
            ]
        );
        assert_eq!(c.buffer(), "");
        assert!(c.transcript().is_empty());
    }

    #[test]
    fn test_read_char_enter_does_not_submit() {
        let mut c = ConsoleSession::new();
        c.enter_mode(ConsoleMode::ReadChar, "");
        assert_eq!(c.handle_key(KeyInput::Enter), KeyOutcome::Suppressed);
        assert!(c.transcript().is_empty());
    }

    #[test]
    fn test_read_char_ignores_buffer_left_from_previous_mode() {
        let mut c = ConsoleSession::new();
        type_line(&mut c, "partial");
        c.enter_mode(ConsoleMode::ReadChar, "");
        c.handle_key(KeyInput::Backspace);
        assert_eq!(c.buffer(), "partial");
    }

    // ── History ───────────────────────────────────────────────────────────────

    #[test]
    fn test_arrow_up_on_empty_history_is_noop() {
        let mut c = ConsoleSession::new();
        type_line(&mut c, "draft");
        c.handle_key(KeyInput::ArrowUp);
        assert_eq!(c.buffer(), "draft");
        assert_eq!(c.history_cursor(), None);
    }

    #[test]
    fn test_arrow_up_walks_older_and_clamps_at_oldest() {
        // Arrange
        let mut c = ConsoleSession::new();
        submit_command(&mut c, "first");
        submit_command(&mut c, "second");
        submit_command(&mut c, "third");

        // Act / Assert
        c.handle_key(KeyInput::ArrowUp);
        assert_eq!(c.buffer(), "third");
        c.handle_key(KeyInput::ArrowUp);
        assert_eq!(c.buffer(), "second");
        c.handle_key(KeyInput::ArrowUp);
        assert_eq!(c.buffer(), "first");
        c.handle_key(KeyInput::ArrowUp);
        assert_eq!(c.buffer(), "first");
        assert_eq!(c.history_cursor(), Some(2));
    }

    #[test]
    fn test_arrow_down_past_newest_resets_cursor_and_clears_buffer() {
        // Arrange
        let mut c = ConsoleSession::new();
        submit_command(&mut c, "one");
        submit_command(&mut c, "two");
        c.handle_key(KeyInput::ArrowUp);
        c.handle_key(KeyInput::ArrowUp);

        // Act
        c.handle_key(KeyInput::ArrowDown);
        let after_one = c.buffer().to_string();
        c.handle_key(KeyInput::ArrowDown);

        // Assert
        assert_eq!(after_one, "two");
        assert_eq!(c.history_cursor(), None);
        assert_eq!(c.buffer(), "");
    }

    #[test]
    fn test_submit_resets_history_cursor() {
        let mut c = ConsoleSession::new();
        submit_command(&mut c, "ls");
        c.handle_key(KeyInput::ArrowUp);
        assert_eq!(c.history_cursor(), Some(0));

        c.handle_key(KeyInput::Enter);

        assert_eq!(c.history_cursor(), None);
        assert_eq!(c.history().collect::<Vec<_>>(), vec!["ls", "ls"]);
    }

    #[test]
    fn test_read_string_can_recall_history() {
        let mut c = ConsoleSession::new();
        submit_command(&mut c, "hello");
        c.enter_mode(ConsoleMode::ReadString, "?");
        c.handle_key(KeyInput::ArrowUp);
        assert_eq!(c.buffer(), "hello");
    }

    // ── Output ────────────────────────────────────────────────────────────────

    #[test]
    fn test_output_clears_partial_line() {
        // Arrange
        let mut c = ConsoleSession::new();
        c.set_partial("Loading...");
        assert_eq!(c.partial_line(), Some("Loading..."));

        // Act
        c.apply_output("line1\nline2");

        // Assert
        assert_eq!(c.partial_line(), None);
        assert_eq!(c.transcript().iter().collect::<Vec<_>>(), vec!["line1", "line2"]);
    }

    #[test]
    fn test_empty_partial_clears_partial_line() {
        let mut c = ConsoleSession::new();
        c.set_partial("abc");
        c.set_partial("");
        assert_eq!(c.partial_line(), None);
    }

    #[test]
    fn test_render_reflects_current_state() {
        let mut c = ConsoleSession::new();
        c.enter_mode(ConsoleMode::ReadInt, "n?");
        c.handle_key(KeyInput::Char('5'));
        c.set_partial("wait");

        let view = c.render();

        assert_eq!(view.mode, ConsoleMode::ReadInt);
        assert_eq!(view.prompt, "n?");
        assert_eq!(view.buffer, "5");
        assert_eq!(view.partial_line, Some("wait"));
    }
}

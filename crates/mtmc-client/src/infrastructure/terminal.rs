//! Line-oriented terminal front end.
//!
//! # Input
//!
//! Each line read from stdin becomes console keystrokes: one
//! [`KeyInput::Char`] per character, then [`KeyInput::Enter`].  Lines that
//! start with `::` are local directives instead:
//!
//! | Directive               | Effect                                   |
//! |-------------------------|------------------------------------------|
//! | `::press <button>`      | on-screen control press                  |
//! | `::release <button>`    | on-screen control release                |
//! | `::keydown <code>`      | keyboard key-down (needs play focus)     |
//! | `::keyup <code>`        | keyboard key-up (needs play focus)       |
//! | `::focus <target>`      | `console` or `play` keyboard focus       |
//! | `::up`, `::down`        | history navigation                       |
//! | `::pad <n> <idx> on|off`| software controller button               |
//! | `::unplug <n>`          | disconnect software controller           |
//! | `::reset`, `::pause`, `::step` | execution control                 |
//! | `::speed <hz>`          | emulator speed                           |
//! | `::memformat`           | toggle memory number format              |
//! | `::quit`                | leave                                    |
//!
//! # Output
//!
//! [`TerminalRenderer`] prints committed transcript lines as they appear and
//! re-prints the partial line and prompt whenever they change.  Logs go to
//! stderr, so stdout carries only the console.

use std::io::{self, Write};

use mtmc_core::{ButtonEdge, ConsoleView, ControlAction, KeyInput, OutboundRequest};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::application::session::{Focus, LocalInput};

/// Prefix marking a directive line.
pub const DIRECTIVE_PREFIX: &str = "::";

/// Errors from parsing a directive line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectiveError {
    #[error("unknown directive ::{0}")]
    Unknown(String),

    #[error("::{directive} needs {expected}")]
    MissingArgument {
        directive: &'static str,
        expected: &'static str,
    },

    #[error("::{directive}: invalid argument {value:?}")]
    InvalidArgument {
        directive: &'static str,
        value: String,
    },
}

/// Turns one input line into local inputs.
///
/// # Errors
///
/// Returns [`DirectiveError`] for a malformed `::` directive.  Plain text
/// never fails.
pub fn parse_line(line: &str) -> Result<Vec<LocalInput>, DirectiveError> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    match line.strip_prefix(DIRECTIVE_PREFIX) {
        Some(directive) => parse_directive(directive).map(|input| vec![input]),
        None => Ok(line
            .chars()
            .map(|c| LocalInput::Key(KeyInput::Char(c)))
            .chain(std::iter::once(LocalInput::Key(KeyInput::Enter)))
            .collect()),
    }
}

fn parse_directive(text: &str) -> Result<LocalInput, DirectiveError> {
    let mut words = text.split_whitespace();
    let name = words.next().unwrap_or_default();
    let mut arg = |directive: &'static str, expected: &'static str| {
        words
            .next()
            .ok_or(DirectiveError::MissingArgument { directive, expected })
    };

    let input = match name {
        "press" | "release" => {
            let (directive, edge) = if name == "press" {
                ("press", ButtonEdge::Press)
            } else {
                ("release", ButtonEdge::Release)
            };
            let region = arg(directive, "a button name")?.to_string();
            LocalInput::Control { region, edge }
        }
        "keydown" => LocalInput::KeyDown(arg("keydown", "a key code")?.to_string()),
        "keyup" => LocalInput::KeyUp(arg("keyup", "a key code")?.to_string()),
        "focus" => match arg("focus", "console or play")? {
            "console" => LocalInput::Focus(Focus::Console),
            "play" => LocalInput::Focus(Focus::PlaySurface),
            other => {
                return Err(DirectiveError::InvalidArgument {
                    directive: "focus",
                    value: other.to_string(),
                })
            }
        },
        "up" => LocalInput::Key(KeyInput::ArrowUp),
        "down" => LocalInput::Key(KeyInput::ArrowDown),
        "pad" => {
            let pad = parse_number("pad", arg("pad", "<pad> <button> on|off")?)?;
            let button: u8 = parse_number("pad", arg("pad", "<pad> <button> on|off")?)?;
            let pressed = match arg("pad", "<pad> <button> on|off")? {
                "on" | "press" | "1" => true,
                "off" | "release" | "0" => false,
                other => {
                    return Err(DirectiveError::InvalidArgument {
                        directive: "pad",
                        value: other.to_string(),
                    })
                }
            };
            LocalInput::Pad {
                pad,
                button: usize::from(button),
                pressed,
            }
        }
        "unplug" => LocalInput::Unplug(parse_number("unplug", arg("unplug", "a pad number")?)?),
        "reset" => LocalInput::Send(OutboundRequest::Control(ControlAction::Reset)),
        "pause" => LocalInput::Send(OutboundRequest::Control(ControlAction::Pause)),
        "step" => LocalInput::Send(OutboundRequest::Control(ControlAction::Step)),
        "speed" => LocalInput::Send(OutboundRequest::Speed(parse_number(
            "speed",
            arg("speed", "instructions per second")?,
        )?)),
        "memformat" => LocalInput::Send(OutboundRequest::ToggleMemoryFormat),
        "quit" => LocalInput::Quit,
        other => return Err(DirectiveError::Unknown(other.to_string())),
    };
    Ok(input)
}

fn parse_number<T: std::str::FromStr>(
    directive: &'static str,
    value: &str,
) -> Result<T, DirectiveError> {
    value.parse().map_err(|_| DirectiveError::InvalidArgument {
        directive,
        value: value.to_string(),
    })
}

/// Reads stdin line by line and forwards parsed input until EOF or until
/// the receiver is dropped.
pub async fn read_stdin(tx: mpsc::Sender<LocalInput>) {
    read_lines(tokio::io::stdin(), tx).await;
}

/// Forwards parsed input from `reader`.  Malformed directives are logged and
/// skipped.  End of input sends [`LocalInput::Quit`].
pub async fn read_lines<R: AsyncRead + Unpin>(reader: R, tx: mpsc::Sender<LocalInput>) {
    let mut lines = BufReader::new(reader).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                debug!("input closed");
                break;
            }
            Err(e) => {
                warn!(error = %e, "failed to read input");
                break;
            }
        };
        let inputs = match parse_line(&line) {
            Ok(inputs) => inputs,
            Err(e) => {
                warn!(error = %e, "ignoring input line");
                continue;
            }
        };
        for input in inputs {
            if tx.send(input).await.is_err() {
                return;
            }
        }
    }
    // EOF ends the session like ::quit.
    let _ = tx.send(LocalInput::Quit).await;
}

/// Returns the cursor to column 0 and erases the line.
const CLEAR_LINE: &str = "\r\x1b[2K";

/// Prints console changes incrementally.
///
/// The partial line, prompt and buffer share one status line at the bottom.
/// Once it has been printed, every change erases it in place before new
/// transcript lines or the updated status are written.
#[derive(Debug, Default)]
pub struct TerminalRenderer {
    seen: u64,
    last_status: Option<String>,
}

impl TerminalRenderer {
    /// Writes whatever changed since the previous call.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from `out`.
    pub fn render(&mut self, view: ConsoleView<'_>, out: &mut impl Write) -> io::Result<()> {
        let new_lines: Vec<&str> = view.transcript.tail_since(self.seen).collect();
        self.seen = view.transcript.total_appended();

        let status = format!("{}{} {}", view.partial_line.unwrap_or_default(), view.prompt, view.buffer);
        if new_lines.is_empty() && self.last_status.as_deref() == Some(status.as_str()) {
            return Ok(());
        }
        if self.last_status.is_some() {
            write!(out, "{CLEAR_LINE}")?;
        }
        for line in new_lines {
            writeln!(out, "{line}")?;
        }
        write!(out, "{status}")?;
        out.flush()?;
        self.last_status = Some(status);
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Controller commands
//!
//! Parses the lines an external controller writes to the HUD.

use core::fmt;

use heapless::String;

use crate::{MODE_IDLE, MODE_LISTENING, MODE_SPEAKING};

/// Maximum status text carried by a command (longer text is truncated)
pub const MAX_TEXT_LEN: usize = 48;

/// Command parse errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// First word is not a known command or mode
    UnknownCommand,
    /// `MODE` without a mode argument
    MissingMode,
    /// Mode argument is neither a mode name nor a number
    UnknownMode,
    /// Trailing arguments on a command that takes none
    UnexpectedArgument,
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::UnknownCommand => f.write_str("unknown command"),
            CommandError::MissingMode => f.write_str("MODE requires a mode argument"),
            CommandError::UnknownMode => f.write_str("unknown mode"),
            CommandError::UnexpectedArgument => f.write_str("unexpected argument"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CommandError {}

/// Commands from the external controller
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControllerCommand {
    /// Change the displayed mode
    ///
    /// `mode` is the raw wire value; values outside the known modes are
    /// passed through so the receiver can clamp them.
    SetMode {
        mode: u8,
        text: String<MAX_TEXT_LEN>,
    },
    /// Stop the render loop
    Stop,
    /// Ask for the currently displayed mode and status
    Query,
}

/// Parse one protocol line
///
/// Returns `Ok(None)` for blank lines and comments.
pub fn parse_command(line: &str) -> Result<Option<ControllerCommand>, CommandError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (word, rest) = split_word(line);

    if word.eq_ignore_ascii_case("stop") || word.eq_ignore_ascii_case("quit") {
        return no_args(rest, ControllerCommand::Stop);
    }

    if word.eq_ignore_ascii_case("status") || word == "?" {
        return no_args(rest, ControllerCommand::Query);
    }

    if word.eq_ignore_ascii_case("mode") {
        let (mode_word, text) = split_word(rest);
        if mode_word.is_empty() {
            return Err(CommandError::MissingMode);
        }
        let mode = parse_mode(mode_word)?;
        return Ok(Some(set_mode(mode, text)));
    }

    // Shorthand: `<mode name> [text]`. Numbers are only accepted after MODE.
    match mode_from_name(word) {
        Some(mode) => Ok(Some(set_mode(mode, rest))),
        None => Err(CommandError::UnknownCommand),
    }
}

fn no_args(rest: &str, cmd: ControllerCommand) -> Result<Option<ControllerCommand>, CommandError> {
    if rest.is_empty() {
        Ok(Some(cmd))
    } else {
        Err(CommandError::UnexpectedArgument)
    }
}

fn set_mode(mode: u8, text: &str) -> ControllerCommand {
    let mut s = String::new();
    for ch in text.chars() {
        if s.push(ch).is_err() {
            break;
        }
    }
    ControllerCommand::SetMode { mode, text: s }
}

/// Parse a mode argument: a name or a raw number
///
/// Numbers that do not fit in a byte saturate to `u8::MAX`, which is still
/// an invalid mode and gets clamped downstream.
fn parse_mode(word: &str) -> Result<u8, CommandError> {
    if let Some(mode) = mode_from_name(word) {
        return Ok(mode);
    }
    if !word.is_empty() && word.bytes().all(|b| b.is_ascii_digit()) {
        let value = word
            .parse::<u32>()
            .unwrap_or(u32::MAX)
            .min(u8::MAX as u32);
        return Ok(value as u8);
    }
    Err(CommandError::UnknownMode)
}

fn mode_from_name(word: &str) -> Option<u8> {
    if word.eq_ignore_ascii_case("idle") {
        Some(MODE_IDLE)
    } else if word.eq_ignore_ascii_case("listening") || word.eq_ignore_ascii_case("listen") {
        Some(MODE_LISTENING)
    } else if word.eq_ignore_ascii_case("speaking") || word.eq_ignore_ascii_case("speak") {
        Some(MODE_SPEAKING)
    } else {
        None
    }
}

/// Split off the first whitespace-delimited word, trimming the remainder
fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(idx) => (&s[..idx], s[idx..].trim()),
        None => (s, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(mode: u8, text: &str) -> Option<ControllerCommand> {
        Some(set_mode(mode, text))
    }

    #[test]
    fn test_blank_and_comment_lines() {
        assert_eq!(parse_command(""), Ok(None));
        assert_eq!(parse_command("   \t"), Ok(None));
        assert_eq!(parse_command("# listening"), Ok(None));
    }

    #[test]
    fn test_mode_command() {
        assert_eq!(parse_command("MODE listening"), Ok(set(MODE_LISTENING, "")));
        assert_eq!(
            parse_command("mode SPEAKING processing data"),
            Ok(set(MODE_SPEAKING, "processing data"))
        );
        assert_eq!(parse_command("Mode 0"), Ok(set(MODE_IDLE, "")));
    }

    #[test]
    fn test_shorthand_mode() {
        assert_eq!(
            parse_command("idle   Awaiting Input  "),
            Ok(set(MODE_IDLE, "Awaiting Input"))
        );
        assert_eq!(parse_command("listen"), Ok(set(MODE_LISTENING, "")));
    }

    #[test]
    fn test_raw_numeric_mode_passes_through() {
        assert_eq!(parse_command("MODE 7"), Ok(set(7, "")));
        assert_eq!(parse_command("MODE 99999"), Ok(set(u8::MAX, "")));
    }

    #[test]
    fn test_bare_number_is_not_a_command() {
        assert_eq!(parse_command("1"), Err(CommandError::UnknownCommand));
    }

    #[test]
    fn test_stop_and_query() {
        assert_eq!(parse_command("stop"), Ok(Some(ControllerCommand::Stop)));
        assert_eq!(parse_command("QUIT"), Ok(Some(ControllerCommand::Stop)));
        assert_eq!(parse_command("status"), Ok(Some(ControllerCommand::Query)));
        assert_eq!(parse_command("?"), Ok(Some(ControllerCommand::Query)));
        assert_eq!(
            parse_command("stop now"),
            Err(CommandError::UnexpectedArgument)
        );
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse_command("MODE"), Err(CommandError::MissingMode));
        assert_eq!(parse_command("MODE dancing"), Err(CommandError::UnknownMode));
        assert_eq!(parse_command("launch"), Err(CommandError::UnknownCommand));
    }

    #[test]
    fn test_long_text_truncated_on_char_boundary() {
        let mut line: heapless::String<128> = heapless::String::new();
        line.push_str("speaking ").unwrap();
        for _ in 0..40 {
            line.push('é').unwrap(); // 80 bytes total
        }
        match parse_command(&line) {
            Ok(Some(ControllerCommand::SetMode { text, .. })) => {
                assert_eq!(text.len(), MAX_TEXT_LEN);
                assert!(text.chars().all(|c| c == 'é'));
            }
            other => panic!("unexpected parse result {:?}", other),
        }
    }
}

//! Arclight Controller Protocol
//!
//! This crate defines the text protocol an external controller (voice
//! capture, LLM and TTS glue) uses to drive the HUD across a process
//! boundary, typically by piping lines into the HUD's stdin.
//!
//! # Protocol Overview
//!
//! One command per line, keywords case-insensitive:
//! ```text
//! MODE <idle|listening|speaking|n> [status text...]
//! <idle|listening|speaking> [status text...]
//! STOP | QUIT
//! STATUS | ?
//! ```
//!
//! The HUD answers `STATUS` with a single `STATUS <mode> <text>` line.
//! Blank lines and `#` comments are ignored.

#![no_std]
#![deny(unsafe_code)]

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod command;
pub mod status;

pub use command::{parse_command, CommandError, ControllerCommand, MAX_TEXT_LEN};
pub use status::StatusLine;

/// Wire value for the idle mode
pub const MODE_IDLE: u8 = 0;
/// Wire value for the listening mode
pub const MODE_LISTENING: u8 = 1;
/// Wire value for the speaking mode
pub const MODE_SPEAKING: u8 = 2;

//! Status reply line
//!
//! The HUD's answer to a `STATUS` query.

use core::fmt;

/// `STATUS <mode> <text>` reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusLine<'a> {
    /// Mode wire name (`idle`, `listening`, `speaking`)
    pub mode: &'a str,
    /// Status text as displayed
    pub text: &'a str,
}

impl fmt::Display for StatusLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "STATUS {} {}", self.mode, self.text)
    }
}

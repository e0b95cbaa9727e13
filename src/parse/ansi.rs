//! parse::ansi
//!
//! ANSI escape stripping.
//!
//! The tool colors parts of its output (log headers, the current branch
//! marker) and offers no switch to turn that off, so every grammar runs on
//! a stripped copy.

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

/// CSI escape sequences: ESC `[`, parameter and intermediate bytes, one
/// final byte. Covers color codes and cursor controls alike.
static ANSI_ESCAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\x1B\[[0-?]*[ -/]*[@-~]").expect("valid regex"));

/// Remove ANSI escape sequences. Borrows when there is nothing to strip.
pub fn strip_ansi(text: &str) -> Cow<'_, str> {
    ANSI_ESCAPE.replace_all(text, "")
}

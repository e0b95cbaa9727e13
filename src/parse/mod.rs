//! parse
//!
//! Pure parsers for the tool's text output, one module per grammar.
//!
//! Every function here takes a borrowed `&str` and returns owned values.
//! Parsers never fail: a line that does not match its grammar is skipped
//! (with a debug trace), so a damaged or colorized stream degrades to fewer
//! results instead of an error. ANSI escapes are stripped before any
//! grammar is applied.

pub mod ansi;
pub mod graph;
pub mod log;
pub mod object;
pub mod refs;
pub mod tree;

pub use ansi::strip_ansi;

/// Extract a single-value output: the first non-blank line, trimmed.
///
/// `rev-parse` and `cat-file -t`/`-s` answer with one significant line;
/// anything after it is noise.
pub fn first_line(output: &str) -> Option<String> {
    let clean = strip_ansi(output);
    clean
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

//! tool
//!
//! The command protocol client.
//!
//! The only way this crate touches a repository is by spawning the external
//! tool as a subprocess and reading its text output. This module owns that
//! boundary: argument screening, spawning, concurrent stream draining, and
//! the wall-clock timeout. Higher layers never see `std::process` types,
//! only [`ToolOutput`].

mod runner;

pub use runner::{ToolOutput, ToolRunner};

/// The fixed logical command name. Invocations naming anything else are
/// refused without spawning.
pub const TOOL_BIN: &str = "mygit";

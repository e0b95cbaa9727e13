//! repo
//!
//! Repository access: locating repositories on disk and resolving their
//! contents through the tool protocol.
//!
//! # Modules
//!
//! - `workspace` - Enumerates and validates repositories under a base dir
//! - `resolver` - Reference and path resolution against one repository
//! - `history` - Commit history and graph operations
//! - `refs` - Branch and tag collection operations
//!
//! Every operation is a fresh sequence of subprocess calls; nothing is
//! cached between requests.

mod history;
mod refs;
mod resolver;
mod workspace;

pub use resolver::Repository;
pub use workspace::Workspace;

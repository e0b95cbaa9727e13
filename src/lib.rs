//! Refscope - Read-only introspection for mygit repositories
//!
//! Refscope turns the `mygit` command-line tool into a structured, typed
//! view of a repository: commits, trees, blobs, branches, tags, and history
//! graphs. The tool's line-oriented stdout is the only access surface;
//! nothing reads the object store directly.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`core`] - Domain types, the object model, and configuration
//! - [`tool`] - The subprocess protocol client (spawn, drain, timeout)
//! - [`parse`] - Pure parsers, one per output grammar
//! - [`repo`] - Repository location, reference/path resolution, history
//! - [`error`] - The crate-wide error taxonomy
//!
//! # Correctness Invariants
//!
//! Refscope maintains the following invariants:
//!
//! 1. Every identifier crossing the subprocess boundary is validated first
//! 2. Object ids handed to a command are exactly what a prior step returned
//! 3. Parsers never fail; malformed lines degrade to fewer results
//! 4. Nothing mutates a repository, and nothing is cached between requests

pub mod core;
pub mod error;
pub mod parse;
pub mod repo;
pub mod tool;

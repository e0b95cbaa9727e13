//! core
//!
//! Core domain types and configuration for refscope.
//!
//! # Modules
//!
//! - [`types`] - Strong types: ObjectId, RevSpec, RepoPath, etc.
//! - [`model`] - The structured object model built from tool output
//! - [`config`] - Engine configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Anything that crosses the subprocess boundary is validated first
//! - Model values are transient, rebuilt per request

pub mod config;
pub mod model;
pub mod types;

//! core::types
//!
//! Strong types for the identifiers that cross the tool boundary.
//!
//! # Types
//!
//! - [`ObjectId`] - Full 40-hex object identifier
//! - [`OidPrefix`] - Abbreviated (1-40 hex) object identifier
//! - [`RevSpec`] - Validated revision specifier (`HEAD`, a hash, or a ref name)
//! - [`RepoPath`] - Repository-relative file path
//! - [`ObjectKind`] - Object type as reported by the tool
//!
//! # Validation
//!
//! These types enforce validity at construction time. Every value handed to
//! the subprocess layer has already passed through one of these
//! constructors, so no raw user string ever reaches an argument list.
//!
//! # Examples
//!
//! ```
//! use refscope::core::types::{ObjectId, RevSpec, RepoPath};
//!
//! // Valid constructions
//! let oid = ObjectId::new("abc123def4567890abc123def4567890abc12345").unwrap();
//! let rev = RevSpec::new("feature/parser").unwrap();
//! let path = RepoPath::new("src/main.c").unwrap();
//!
//! // Invalid constructions fail at creation time
//! assert!(ObjectId::new("not-a-sha").is_err());
//! assert!(RevSpec::new("bad..name").is_err());
//! assert!(RepoPath::new("../escape").is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid object id: {0}")]
    InvalidObjectId(String),

    #[error("invalid revision: {0}")]
    InvalidRevSpec(String),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("unknown object kind: {0}")]
    UnknownObjectKind(String),
}

/// A full object identifier: exactly 40 hex characters.
///
/// Identifiers are normalized to lowercase. The tool hashes with SHA-1, so
/// 40 characters is the only accepted length.
///
/// # Example
///
/// ```
/// use refscope::core::types::ObjectId;
///
/// let oid = ObjectId::new("ABC123DEF4567890ABC123DEF4567890ABC12345").unwrap();
/// assert_eq!(oid.as_str(), "abc123def4567890abc123def4567890abc12345");
/// assert_eq!(oid.short(7), "abc123d");
///
/// assert!(ObjectId::new("abc123").is_err());      // too short
/// assert!(ObjectId::new("xyz").is_err());          // not hex
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectId(String);

impl ObjectId {
    /// Create a new validated object id.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidObjectId` unless the input is exactly 40
    /// hex characters.
    pub fn new(hex: impl Into<String>) -> Result<Self, TypeError> {
        let hex = hex.into();
        if hex.len() != 40 {
            return Err(TypeError::InvalidObjectId(format!(
                "expected 40 hex characters, got {}",
                hex.len()
            )));
        }
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TypeError::InvalidObjectId(
                "contains non-hex characters".into(),
            ));
        }
        Ok(Self(hex.to_ascii_lowercase()))
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get an abbreviated form of the id.
    pub fn short(&self, len: usize) -> &str {
        &self.0[..len.min(40)]
    }
}

impl TryFrom<String> for ObjectId {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<ObjectId> for String {
    fn from(oid: ObjectId) -> Self {
        oid.0
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An abbreviated object identifier: 1 to 40 hex characters.
///
/// Lookup commands (`cat-file`) accept abbreviations, and the tool itself
/// emits 7-character prefixes on merge lines. A full [`ObjectId`] converts
/// losslessly into a prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OidPrefix(String);

impl OidPrefix {
    /// Create a new validated prefix.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidObjectId` unless the input is 1-40 hex
    /// characters.
    pub fn new(hex: impl Into<String>) -> Result<Self, TypeError> {
        let hex = hex.into();
        if hex.is_empty() || hex.len() > 40 {
            return Err(TypeError::InvalidObjectId(format!(
                "expected 1-40 hex characters, got {}",
                hex.len()
            )));
        }
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TypeError::InvalidObjectId(
                "contains non-hex characters".into(),
            ));
        }
        Ok(Self(hex.to_ascii_lowercase()))
    }

    /// Get the prefix as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<ObjectId> for OidPrefix {
    fn from(oid: ObjectId) -> Self {
        Self(oid.0)
    }
}

impl TryFrom<String> for OidPrefix {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<OidPrefix> for String {
    fn from(prefix: OidPrefix) -> Self {
        prefix.0
    }
}

impl AsRef<str> for OidPrefix {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OidPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated revision specifier.
///
/// Accepts `HEAD`, a hex hash (full or abbreviated), or a ref name over
/// `[A-Za-z0-9/_.-]`. Rejected regardless of form:
/// - empty input
/// - any occurrence of `..`
/// - a leading or trailing `/`, or `//`
/// - characters outside the allowed set (in particular whitespace and
///   anything shell-significant)
///
/// # Example
///
/// ```
/// use refscope::core::types::RevSpec;
///
/// assert!(RevSpec::new("HEAD").is_ok());
/// assert!(RevSpec::new("feature/parser").is_ok());
/// assert!(RevSpec::new("abc123d").is_ok());
///
/// assert!(RevSpec::new("").is_err());
/// assert!(RevSpec::new("bad..name").is_err());
/// assert!(RevSpec::new("/leading").is_err());
/// assert!(RevSpec::new("has space").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RevSpec(String);

impl RevSpec {
    /// Create a new validated revision specifier.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidRevSpec` if the input violates the rules
    /// above.
    pub fn new(rev: impl Into<String>) -> Result<Self, TypeError> {
        let rev = rev.into();
        Self::validate(&rev)?;
        Ok(Self(rev))
    }

    /// The symbolic head revision.
    pub fn head() -> Self {
        Self("HEAD".into())
    }

    fn validate(rev: &str) -> Result<(), TypeError> {
        if rev.is_empty() {
            return Err(TypeError::InvalidRevSpec(
                "revision cannot be empty".into(),
            ));
        }
        if rev.contains("..") {
            return Err(TypeError::InvalidRevSpec(
                "revision cannot contain '..'".into(),
            ));
        }
        if rev.starts_with('/') || rev.ends_with('/') {
            return Err(TypeError::InvalidRevSpec(
                "revision cannot start or end with '/'".into(),
            ));
        }
        if rev.contains("//") {
            return Err(TypeError::InvalidRevSpec(
                "revision cannot contain '//'".into(),
            ));
        }
        for c in rev.chars() {
            if !(c.is_ascii_alphanumeric() || matches!(c, '/' | '_' | '-' | '.')) {
                return Err(TypeError::InvalidRevSpec(format!(
                    "revision cannot contain '{c}'"
                )));
            }
        }
        Ok(())
    }

    /// Get the revision as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RevSpec {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<RevSpec> for String {
    fn from(rev: RevSpec) -> Self {
        rev.0
    }
}

impl From<ObjectId> for RevSpec {
    fn from(oid: ObjectId) -> Self {
        Self(oid.0)
    }
}

impl AsRef<str> for RevSpec {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RevSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A repository-relative file path.
///
/// Paths are slash-separated and must stay inside the tree: `..` components
/// and a leading `/` are rejected. Empty segments (from doubled or trailing
/// slashes) are tolerated and skipped when walking.
///
/// # Example
///
/// ```
/// use refscope::core::types::RepoPath;
///
/// let path = RepoPath::new("src/parse/tree.rs").unwrap();
/// assert_eq!(path.file_name(), Some("tree.rs"));
/// assert_eq!(path.segments().count(), 3);
///
/// assert!(RepoPath::new("").is_err());
/// assert!(RepoPath::new("/absolute").is_err());
/// assert!(RepoPath::new("a/../b").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepoPath(String);

impl RepoPath {
    /// Create a new validated repository path.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidPath` for an empty path, a leading `/`,
    /// or any `..` component.
    pub fn new(path: impl Into<String>) -> Result<Self, TypeError> {
        let path = path.into();
        if path.is_empty() {
            return Err(TypeError::InvalidPath("path cannot be empty".into()));
        }
        if path.starts_with('/') {
            return Err(TypeError::InvalidPath(
                "path cannot be absolute".into(),
            ));
        }
        if path.split('/').any(|seg| seg == "..") {
            return Err(TypeError::InvalidPath(
                "path cannot contain '..' components".into(),
            ));
        }
        Ok(Self(path))
    }

    /// Iterate the non-empty path segments in order.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|seg| !seg.is_empty())
    }

    /// The final non-empty segment, if any.
    pub fn file_name(&self) -> Option<&str> {
        self.segments().last()
    }

    /// The segments before the final one.
    pub fn parent_segments(&self) -> Vec<&str> {
        let mut segs: Vec<_> = self.segments().collect();
        segs.pop();
        segs
    }

    /// Get the path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RepoPath {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<RepoPath> for String {
    fn from(path: RepoPath) -> Self {
        path.0
    }
}

impl AsRef<str> for RepoPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RepoPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Object type as reported by `cat-file -t`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Blob,
    Tree,
    Commit,
    Tag,
}

impl ObjectKind {
    /// Get the kind as the tool spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Blob => "blob",
            ObjectKind::Tree => "tree",
            ObjectKind::Commit => "commit",
            ObjectKind::Tag => "tag",
        }
    }
}

impl std::str::FromStr for ObjectKind {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "blob" => Ok(ObjectKind::Blob),
            "tree" => Ok(ObjectKind::Tree),
            "commit" => Ok(ObjectKind::Commit),
            "tag" => Ok(ObjectKind::Tag),
            other => Err(TypeError::UnknownObjectKind(other.to_string())),
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

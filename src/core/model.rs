//! core::model
//!
//! The structured object model assembled from tool output.
//!
//! Every type here is a plain data carrier: built by the resolver, consumed
//! by whatever transport sits above the crate. Entities are transient and
//! rebuilt per request; nothing in the model caches or refreshes itself.

use serde::{Deserialize, Serialize};

use crate::core::types::{ObjectId, ObjectKind, OidPrefix};

/// One entry of a tree listing.
///
/// `path` is relative to the tree the listing ran against (for a listing
/// under a subdirectory that is the subdirectory's own tree, not the
/// repository root). `name` is the final path segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    pub mode: String,
    pub kind: ObjectKind,
    pub sha: ObjectId,
    pub name: String,
    pub path: String,
}

/// A commit, possibly partially populated.
///
/// Two sources feed this struct: `log` blocks (author, human-readable
/// timestamp, message, abbreviated merge parents) and `cat-file -p` commit
/// bodies (tree, full parents, committer, epoch timestamp). Enrichment fills
/// the optional fields when the per-commit lookup succeeds; on failure the
/// partial record from the log block stands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub sha: ObjectId,
    pub tree: Option<ObjectId>,
    /// Parent ids in order. Abbreviated when sourced from a log `Merge:`
    /// line, full when sourced from the commit body.
    pub parents: Vec<OidPrefix>,
    pub author: Option<String>,
    pub committer: Option<String>,
    /// Human-readable date from `log`, or the committer epoch token from
    /// the commit body, whichever populated the record last.
    pub timestamp: Option<String>,
    pub message: String,
}

impl CommitRecord {
    /// A record carrying only the commit id.
    pub fn bare(sha: ObjectId) -> Self {
        Self {
            sha,
            tree: None,
            parents: Vec::new(),
            author: None,
            committer: None,
            timestamp: None,
            message: String::new(),
        }
    }
}

/// A branch as reported by the `branch` listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchRef {
    pub name: String,
    pub is_current: bool,
    /// Unset when per-branch resolution failed; the listing still includes
    /// the branch.
    pub sha: Option<ObjectId>,
}

/// Whether a tag is a plain ref or an annotated tag object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagKind {
    Lightweight,
    Annotated,
}

/// A tag as reported by the `tag` listing, enriched where possible.
///
/// For an annotated tag `sha` is the tag object itself and `target_*`
/// describe the object it points to. For a lightweight tag `sha` and
/// `target_sha` coincide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRef {
    pub name: String,
    pub sha: Option<ObjectId>,
    pub kind: Option<TagKind>,
    pub target_sha: Option<ObjectId>,
    pub target_kind: Option<ObjectKind>,
}

impl TagRef {
    /// A tag known only by name.
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sha: None,
            kind: None,
            target_sha: None,
            target_kind: None,
        }
    }
}

/// A commit node of the history graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub sha: ObjectId,
    pub label: String,
}

/// A parent edge of the history graph (child to parent).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: ObjectId,
    pub to: ObjectId,
}

/// What kind of ref a graph marker decorates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefMarkerKind {
    Branch,
    Tag,
    Head,
}

/// A ref decoration attached to a commit in the history graph.
///
/// Markers are only emitted with a known target commit; declarations whose
/// target edge never appeared are pruned during assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefMarker {
    pub name: String,
    pub label: String,
    pub kind: RefMarkerKind,
    pub target: ObjectId,
}

/// The assembled commit graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub refs: Vec<RefMarker>,
}

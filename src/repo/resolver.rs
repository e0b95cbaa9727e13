//! repo::resolver
//!
//! Reference and path resolution against one repository.
//!
//! This module is the single doorway from validated identifiers to tool
//! invocations. Every operation follows the same stepwise shape: resolve a
//! revision to a hash, learn the hash's kind, then narrow to the object the
//! caller asked for, one subprocess call per step. The protocol has no
//! combined ref-plus-path addressing, so path lookups walk one tree level
//! at a time.
//!
//! # Error Classification
//!
//! Failures from the tool are classified in a fixed order: a timeout is
//! always reported as [`Error::Timeout`]; stderr that names a missing
//! object becomes [`Error::NotFound`]; everything else is
//! [`Error::ToolFailure`]. Classification never inspects stdout.
//!
//! # Example
//!
//! ```ignore
//! use refscope::repo::Repository;
//! use refscope::tool::ToolRunner;
//! use refscope::core::types::RevSpec;
//!
//! let repo = Repository::at("/srv/repos/project", ToolRunner::new());
//! let head = repo.resolve_rev(&RevSpec::head()).await?;
//! println!("HEAD is at {}", head.short(7));
//! ```

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::model::{CommitRecord, TagKind, TagRef, TreeEntry};
use crate::core::types::{ObjectId, ObjectKind, OidPrefix, RepoPath, RevSpec};
use crate::error::{Error, Result};
use crate::parse::first_line;
use crate::parse::object::{parse_commit_body, parse_tag_body};
use crate::parse::tree::{parse_tree_listing, sort_entries};
use crate::tool::{ToolOutput, ToolRunner, TOOL_BIN};

/// One repository, addressed through the tool protocol.
///
/// The struct holds no open handles: it is a directory plus a runner, and
/// every method is a fresh sequence of subprocess calls.
#[derive(Debug, Clone)]
pub struct Repository {
    dir: PathBuf,
    runner: ToolRunner,
}

impl Repository {
    /// A repository at `dir`. The caller vouches for the path; use
    /// [`Workspace::open`](crate::repo::Workspace::open) to get validation.
    pub fn at(dir: impl Into<PathBuf>, runner: ToolRunner) -> Self {
        Self {
            dir: dir.into(),
            runner,
        }
    }

    /// The repository directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    // =========================================================================
    // Protocol Plumbing
    // =========================================================================

    /// Run one tool invocation in this repository.
    pub(super) async fn run(&self, args: &[&str]) -> ToolOutput {
        self.runner.execute(&self.dir, TOOL_BIN, args).await
    }

    /// Classify a failed invocation: timeout first, then tool failure.
    pub(super) fn failure(&self, context: &str, out: &ToolOutput) -> Error {
        if out.timed_out {
            Error::Timeout {
                context: context.to_string(),
                seconds: self.runner.timeout().as_secs(),
            }
        } else {
            Error::ToolFailure {
                context: context.to_string(),
                exit_code: out.exit_code,
                stderr: out.stderr.trim().to_string(),
            }
        }
    }

    /// `cat-file` with missing-object classification applied.
    async fn cat_file(&self, flag: &str, oid: &str, context: &str) -> Result<ToolOutput> {
        let out = self.run(&["cat-file", flag, oid]).await;
        if out.success() {
            return Ok(out);
        }
        if !out.timed_out && stderr_signals_missing(&out.stderr) {
            return Err(Error::not_found(format!("object '{oid}'")));
        }
        Err(self.failure(context, &out))
    }

    // =========================================================================
    // Revision and Object Lookup
    // =========================================================================

    /// Resolve a revision to a full object id via `rev-parse`.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] when the tool cannot resolve the revision
    /// - [`Error::Timeout`] / [`Error::ToolFailure`] for protocol failures,
    ///   including output that is not a full hash
    pub async fn resolve_rev(&self, rev: &RevSpec) -> Result<ObjectId> {
        let out = self.run(&["rev-parse", rev.as_str()]).await;
        if !out.success() {
            if out.timed_out {
                return Err(self.failure("mygit rev-parse", &out));
            }
            debug!(rev = %rev, stderr = %out.stderr.trim(), "rev-parse miss");
            return Err(Error::not_found(format!("revision '{rev}'")));
        }
        let line = first_line(&out.stdout)
            .ok_or_else(|| malformed("mygit rev-parse", "produced no output"))?;
        ObjectId::new(&line)
            .map_err(|_| malformed("mygit rev-parse", &format!("'{line}' is not a full hash")))
    }

    /// The kind of an object, via `cat-file -t`.
    pub async fn object_kind(&self, oid: &OidPrefix) -> Result<ObjectKind> {
        let out = self.cat_file("-t", oid.as_str(), "mygit cat-file -t").await?;
        let line = first_line(&out.stdout)
            .ok_or_else(|| Error::not_found(format!("object '{oid}'")))?;
        line.parse()
            .map_err(|_| malformed("mygit cat-file -t", &format!("unknown kind '{line}'")))
    }

    /// The size of an object in bytes, via `cat-file -s`.
    pub async fn object_size(&self, oid: &OidPrefix) -> Result<u64> {
        let out = self.cat_file("-s", oid.as_str(), "mygit cat-file -s").await?;
        let line = first_line(&out.stdout)
            .ok_or_else(|| Error::not_found(format!("object '{oid}'")))?;
        line.parse()
            .map_err(|_| malformed("mygit cat-file -s", &format!("'{line}' is not a size")))
    }

    /// The pretty-printed body of an object, via `cat-file -p`, verbatim.
    pub async fn object_pretty(&self, oid: &OidPrefix) -> Result<String> {
        let out = self.cat_file("-p", oid.as_str(), "mygit cat-file -p").await?;
        Ok(out.stdout)
    }

    // =========================================================================
    // Commits and Tags
    // =========================================================================

    /// Read one commit as a fully populated record.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedObject`] when `sha` names something other than
    /// a commit.
    pub async fn commit(&self, sha: &ObjectId) -> Result<CommitRecord> {
        let kind = self.object_kind(&OidPrefix::from(sha.clone())).await?;
        if kind != ObjectKind::Commit {
            return Err(Error::unsupported(format!(
                "object {} is a {kind}, not a commit",
                sha.short(7)
            )));
        }
        let out = self.cat_file("-p", sha.as_str(), "mygit cat-file -p").await?;
        Ok(parse_commit_body(sha.clone(), &out.stdout))
    }

    /// Look up one tag by name and classify it.
    ///
    /// An annotated tag resolves to a tag object whose body names its
    /// target; a lightweight tag resolves straight to the target object.
    pub async fn tag_detail(&self, name: &str) -> Result<TagRef> {
        let rev = RevSpec::new(name)?;
        let sha = self.resolve_rev(&rev).await?;
        let kind = self.object_kind(&OidPrefix::from(sha.clone())).await?;
        if kind == ObjectKind::Tag {
            let out = self.cat_file("-p", sha.as_str(), "mygit cat-file -p").await?;
            let body = parse_tag_body(&out.stdout);
            return Ok(TagRef {
                name: name.to_string(),
                sha: Some(sha),
                kind: Some(TagKind::Annotated),
                target_sha: body.object,
                target_kind: body.kind,
            });
        }
        Ok(TagRef {
            name: name.to_string(),
            sha: Some(sha.clone()),
            kind: Some(TagKind::Lightweight),
            target_sha: Some(sha),
            target_kind: Some(kind),
        })
    }

    // =========================================================================
    // Trees and Blobs
    // =========================================================================

    /// List the entries of a tree.
    ///
    /// `rev` may name a commit (its root tree is listed), an annotated tag
    /// (dereferenced once), or a tree directly. With a `path`, the walk
    /// descends one tree per segment before listing. Entries come back
    /// trees-first, then by name; with `recursive`, entry paths are
    /// relative to the listed subtree, not the repository root.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] when the revision or a path segment is missing
    /// - [`Error::UnsupportedObject`] when the revision names a blob, or a
    ///   tag pointing at one
    pub async fn tree_entries(
        &self,
        rev: &RevSpec,
        path: Option<&RepoPath>,
        recursive: bool,
    ) -> Result<Vec<TreeEntry>> {
        let root = self.resolve_tree_sha(rev).await?;
        let tree = match path {
            Some(path) => {
                let segments: Vec<&str> = path.segments().collect();
                self.walk_segments(root, &segments).await?
            }
            None => root,
        };
        let out = if recursive {
            self.run(&["ls-tree", "-r", tree.as_str()]).await
        } else {
            self.run(&["ls-tree", tree.as_str()]).await
        };
        if !out.success() {
            return Err(self.failure("mygit ls-tree", &out));
        }
        let mut entries = parse_tree_listing(&out.stdout);
        sort_entries(&mut entries);
        Ok(entries)
    }

    /// Read a blob's content at `path` under `rev`.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] when any path segment is missing or the final
    /// segment is not a blob.
    pub async fn blob_content(&self, rev: &RevSpec, path: &RepoPath) -> Result<String> {
        let segments: Vec<&str> = path.segments().collect();
        let Some((file_name, parents)) = segments.split_last() else {
            return Err(Error::invalid_input(format!(
                "path '{path}' has no file component"
            )));
        };
        let root = self.resolve_tree_sha(rev).await?;
        let tree = self.walk_segments(root, parents).await?;

        let out = self.run(&["ls-tree", tree.as_str()]).await;
        if !out.success() {
            return Err(self.failure("mygit ls-tree", &out));
        }
        let entries = parse_tree_listing(&out.stdout);
        let blob = entries
            .iter()
            .find(|e| e.name == *file_name && e.kind == ObjectKind::Blob)
            .ok_or_else(|| Error::not_found(format!("file '{path}' under '{rev}'")))?;

        let out = self
            .cat_file("-p", blob.sha.as_str(), "mygit cat-file -p")
            .await?;
        Ok(out.stdout)
    }

    /// Resolve a revision down to a tree id.
    ///
    /// Commits contribute their root tree; annotated tags are dereferenced
    /// once and their target handled by kind; trees pass through. Anything
    /// else has no tree to offer.
    async fn resolve_tree_sha(&self, rev: &RevSpec) -> Result<ObjectId> {
        let sha = self.resolve_rev(rev).await?;
        let kind = self.object_kind(&OidPrefix::from(sha.clone())).await?;
        match kind {
            ObjectKind::Tree => Ok(sha),
            ObjectKind::Commit => self.commit_tree(&sha).await,
            ObjectKind::Tag => {
                let out = self.cat_file("-p", sha.as_str(), "mygit cat-file -p").await?;
                let body = parse_tag_body(&out.stdout);
                let target = body
                    .object
                    .ok_or_else(|| malformed("mygit cat-file -p", "tag body has no object"))?;
                match body.kind {
                    Some(ObjectKind::Commit) => self.commit_tree(&target).await,
                    Some(ObjectKind::Tree) => Ok(target),
                    _ => Err(Error::unsupported(format!(
                        "tag '{rev}' does not point at a commit or tree"
                    ))),
                }
            }
            ObjectKind::Blob => Err(Error::unsupported(format!(
                "'{rev}' is a blob and has no tree"
            ))),
        }
    }

    /// The root tree of a commit, read from its body.
    async fn commit_tree(&self, sha: &ObjectId) -> Result<ObjectId> {
        let out = self.cat_file("-p", sha.as_str(), "mygit cat-file -p").await?;
        let record = parse_commit_body(sha.clone(), &out.stdout);
        record
            .tree
            .ok_or_else(|| malformed("mygit cat-file -p", "commit body has no tree header"))
    }

    /// Descend one tree per segment, matching each segment against the
    /// tree entries of the previous level.
    async fn walk_segments(&self, mut tree: ObjectId, segments: &[&str]) -> Result<ObjectId> {
        for segment in segments {
            let out = self.run(&["ls-tree", tree.as_str()]).await;
            if !out.success() {
                return Err(self.failure("mygit ls-tree", &out));
            }
            let entries = parse_tree_listing(&out.stdout);
            let next = entries
                .iter()
                .find(|e| e.name == *segment && e.kind == ObjectKind::Tree)
                .ok_or_else(|| {
                    Error::not_found(format!(
                        "directory '{segment}' in tree {}",
                        tree.short(7)
                    ))
                })?;
            tree = next.sha.clone();
        }
        Ok(tree)
    }
}

/// Stderr text that means the object or revision does not exist, as
/// opposed to the tool misbehaving.
pub(super) fn stderr_signals_missing(stderr: &str) -> bool {
    let stderr = stderr.to_ascii_lowercase();
    stderr.contains("not a valid object name") || stderr.contains("unknown revision")
}

/// A protocol-shape violation: the tool succeeded but its output does not
/// fit the grammar the operation requires.
fn malformed(context: &str, what: &str) -> Error {
    Error::ToolFailure {
        context: context.to_string(),
        exit_code: 0,
        stderr: format!("unexpected output: {what}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn missing_object_stderr_recognized() {
        assert!(stderr_signals_missing("fatal: Not a valid object name abc"));
        assert!(stderr_signals_missing(
            "fatal: unknown revision or path not in the working tree."
        ));
        assert!(!stderr_signals_missing("fatal: not a tree object"));
        assert!(!stderr_signals_missing(""));
    }

    #[test]
    fn timeout_classified_before_tool_failure() {
        let repo = Repository::at("/tmp", ToolRunner::new());
        let out = ToolOutput {
            exit_code: -1,
            stdout: String::new(),
            stderr: "fatal: Not a valid object name\ncommand timed out after 30s".into(),
            timed_out: true,
        };
        assert_eq!(repo.failure("mygit log", &out).kind(), ErrorKind::Timeout);
    }

    #[test]
    fn plain_failure_carries_exit_and_stderr() {
        let repo = Repository::at("/tmp", ToolRunner::new());
        let out = ToolOutput {
            exit_code: 128,
            stdout: String::new(),
            stderr: "fatal: bad tree\n".into(),
            timed_out: false,
        };
        match repo.failure("mygit ls-tree", &out) {
            Error::ToolFailure {
                context,
                exit_code,
                stderr,
            } => {
                assert_eq!(context, "mygit ls-tree");
                assert_eq!(exit_code, 128);
                assert_eq!(stderr, "fatal: bad tree");
            }
            other => panic!("expected tool failure, got {other:?}"),
        }
    }

    #[test]
    fn malformed_output_is_tool_failure() {
        assert_eq!(
            malformed("mygit rev-parse", "short output").kind(),
            ErrorKind::ToolFailure
        );
    }
}

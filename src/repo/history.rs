//! repo::history
//!
//! Commit history and graph operations.
//!
//! History is assembled in two passes: `log` supplies the ordering and a
//! partial record per commit, then each commit object is read for the full
//! record. A commit whose object read fails keeps its partial record; a
//! repository with no commits yet yields empty results instead of an error.

use tracing::warn;

use crate::core::model::{CommitRecord, HistoryGraph};
use crate::core::types::RevSpec;
use crate::error::Result;
use crate::parse::graph::parse_history_graph;
use crate::parse::log::parse_log;
use crate::repo::Repository;

/// Stderr text for a repository whose HEAD has nothing behind it.
const NO_COMMITS_MARKER: &str = "does not have any commits yet";

impl Repository {
    /// The commit history reachable from `rev`, newest first.
    ///
    /// `skip` drops records from the front and `limit` caps what remains;
    /// both apply after enrichment, and a `skip` past the end yields an
    /// empty list. A `limit` of zero means no limit.
    pub async fn history(
        &self,
        rev: &RevSpec,
        limit: Option<usize>,
        skip: Option<usize>,
    ) -> Result<Vec<CommitRecord>> {
        let out = self.run(&["log", rev.as_str()]).await;
        if !out.success() {
            if !out.timed_out && out.stderr.contains(NO_COMMITS_MARKER) {
                return Ok(Vec::new());
            }
            return Err(self.failure("mygit log", &out));
        }

        let blocks = parse_log(&out.stdout);
        let mut commits = Vec::with_capacity(blocks.len());
        for block in blocks {
            match self.commit(&block.sha).await {
                Ok(full) => commits.push(full),
                Err(e) => {
                    warn!(sha = %block.sha.short(7), error = %e, "commit enrichment failed, keeping log record");
                    commits.push(block);
                }
            }
        }
        Ok(window(commits, limit, skip))
    }

    /// The commit graph reachable from `rev`.
    pub async fn history_graph(&self, rev: &RevSpec) -> Result<HistoryGraph> {
        let out = self.run(&["log", "--graph", rev.as_str()]).await;
        if !out.success() {
            if !out.timed_out && out.stderr.contains(NO_COMMITS_MARKER) {
                return Ok(HistoryGraph::default());
            }
            return Err(self.failure("mygit log --graph", &out));
        }
        Ok(parse_history_graph(&out.stdout))
    }
}

fn window(
    commits: Vec<CommitRecord>,
    limit: Option<usize>,
    skip: Option<usize>,
) -> Vec<CommitRecord> {
    let start = skip.unwrap_or(0);
    if start >= commits.len() {
        return Vec::new();
    }
    let end = match limit {
        Some(limit) if limit > 0 => (start + limit).min(commits.len()),
        _ => commits.len(),
    };
    commits[start..end].to_vec()
}

//! repo::refs
//!
//! Branch and tag collection operations.
//!
//! Listings enrich each entry with a second lookup, and an entry whose
//! lookup fails stays in the listing with its detail fields unset. One bad
//! ref must not hide the rest.

use tracing::warn;

use crate::core::model::{BranchRef, TagRef};
use crate::core::types::RevSpec;
use crate::error::Result;
use crate::parse::refs::{parse_branch_list, parse_tag_names};
use crate::repo::Repository;

impl Repository {
    /// List branches in the tool's order, each resolved to its commit
    /// where possible.
    pub async fn branches(&self) -> Result<Vec<BranchRef>> {
        let out = self.run(&["branch"]).await;
        if !out.success() {
            return Err(self.failure("mygit branch", &out));
        }
        let mut branches = parse_branch_list(&out.stdout);
        for branch in &mut branches {
            let rev = match RevSpec::new(&branch.name) {
                Ok(rev) => rev,
                Err(e) => {
                    warn!(branch = %branch.name, error = %e, "branch name failed validation");
                    continue;
                }
            };
            match self.resolve_rev(&rev).await {
                Ok(sha) => branch.sha = Some(sha),
                Err(e) => {
                    warn!(branch = %branch.name, error = %e, "branch resolution failed");
                }
            }
        }
        Ok(branches)
    }

    /// List tags sorted by name, each classified and dereferenced where
    /// possible.
    pub async fn tags(&self) -> Result<Vec<TagRef>> {
        let out = self.run(&["tag"]).await;
        if !out.success() {
            return Err(self.failure("mygit tag", &out));
        }
        let mut tags = Vec::new();
        for name in parse_tag_names(&out.stdout) {
            match self.tag_detail(&name).await {
                Ok(tag) => tags.push(tag),
                Err(e) => {
                    warn!(tag = %name, error = %e, "tag lookup failed");
                    tags.push(TagRef::bare(name));
                }
            }
        }
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }
}

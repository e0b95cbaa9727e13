//! parse::refs
//!
//! The `branch` and `tag` listing grammars: one name per line, with a
//! `* ` prefix marking the current branch.

use crate::core::model::BranchRef;
use crate::parse::strip_ansi;

/// Parse `branch` output. Resolution of each branch's commit happens
/// later; entries come back with `sha` unset.
pub fn parse_branch_list(output: &str) -> Vec<BranchRef> {
    let clean = strip_ansi(output);
    clean
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            if line.is_empty() {
                return None;
            }
            let (name, is_current) = match line.strip_prefix("* ") {
                Some(rest) => (rest.trim(), true),
                None => (line, false),
            };
            Some(BranchRef {
                name: name.to_string(),
                is_current,
                sha: None,
            })
        })
        .collect()
}

/// Parse `tag` output into names.
pub fn parse_tag_names(output: &str) -> Vec<String> {
    let clean = strip_ansi(output);
    clean
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

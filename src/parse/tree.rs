//! parse::tree
//!
//! The `ls-tree` listing grammar.
//!
//! Each line is `<mode> <kind> <sha>\t<path>`. The split is bounded to four
//! fields so paths keep their internal whitespace.

use std::str::FromStr;

use tracing::debug;

use crate::core::model::TreeEntry;
use crate::core::types::{ObjectId, ObjectKind};
use crate::parse::strip_ansi;

/// Parse a tree listing into entries, skipping lines that do not fit the
/// grammar. Entry order follows the listing; callers sort.
pub fn parse_tree_listing(output: &str) -> Vec<TreeEntry> {
    let clean = strip_ansi(output);
    let mut entries = Vec::new();
    for line in clean.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match parse_entry(line) {
            Some(entry) => entries.push(entry),
            None => debug!(line, "skipping unparseable tree entry"),
        }
    }
    entries
}

/// Sort entries the way a directory listing reads: trees first, then by
/// name. The sort is stable, so listing order breaks ties.
pub fn sort_entries(entries: &mut [TreeEntry]) {
    entries.sort_by(|a, b| {
        (a.kind != ObjectKind::Tree)
            .cmp(&(b.kind != ObjectKind::Tree))
            .then_with(|| a.name.cmp(&b.name))
    });
}

fn parse_entry(line: &str) -> Option<TreeEntry> {
    let (mode, rest) = split_token(line)?;
    let (kind, rest) = split_token(rest)?;
    let (sha, path) = split_token(rest)?;
    if path.is_empty() {
        return None;
    }
    let kind = ObjectKind::from_str(kind).ok()?;
    let sha = ObjectId::new(sha).ok()?;
    let name = path.rsplit('/').next().unwrap_or(path);
    Some(TreeEntry {
        mode: mode.to_string(),
        kind,
        sha,
        name: name.to_string(),
        path: path.to_string(),
    })
}

/// Split off the leading whitespace-delimited token; the remainder has its
/// leading whitespace consumed.
fn split_token(s: &str) -> Option<(&str, &str)> {
    let (token, rest) = s.split_once(char::is_whitespace)?;
    if token.is_empty() {
        return None;
    }
    Some((token, rest.trim_start()))
}

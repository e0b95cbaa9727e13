//! parse::log
//!
//! The `log` block grammar.
//!
//! A block opens at a `commit <sha>` line and runs until the next one.
//! Field lines (`Merge:`, `Author:`, `Date:`) are optional; message lines
//! carry a four-space indent. The records produced here are partial, meant
//! to be enriched from the commit objects afterwards.

use tracing::debug;

use crate::core::model::CommitRecord;
use crate::core::types::{ObjectId, OidPrefix};
use crate::parse::strip_ansi;

const MESSAGE_INDENT: &str = "    ";

/// Parse `log` output into partial commit records, newest first as the
/// tool prints them. Blocks whose commit line does not carry a valid id
/// are dropped.
pub fn parse_log(output: &str) -> Vec<CommitRecord> {
    let clean = strip_ansi(output);
    let mut commits = Vec::new();
    let mut current: Option<BlockAccumulator> = None;

    for line in clean.lines() {
        if let Some(sha) = line.strip_prefix("commit ") {
            if let Some(block) = current.take() {
                flush(block, &mut commits);
            }
            current = Some(BlockAccumulator::new(sha.trim()));
            continue;
        }
        let Some(block) = current.as_mut() else {
            if !line.trim().is_empty() {
                debug!(line, "log line outside any commit block");
            }
            continue;
        };
        if let Some(parents) = line.strip_prefix("Merge:") {
            block.parents = parents
                .split_whitespace()
                .filter_map(|p| OidPrefix::new(p).ok())
                .collect();
        } else if let Some(author) = line.strip_prefix("Author:") {
            block.author = Some(author.trim().to_string());
        } else if let Some(date) = line.strip_prefix("Date:") {
            block.timestamp = Some(date.trim().to_string());
        } else if let Some(text) = line.strip_prefix(MESSAGE_INDENT) {
            block.message.push_str(text);
            block.message.push('\n');
        } else if line.trim().is_empty() && !block.message.is_empty() {
            // Blank line inside an already-started message keeps the
            // paragraph break; the separator blank before the message has
            // nothing accumulated yet and falls through.
            block.message.push('\n');
        }
    }
    if let Some(block) = current.take() {
        flush(block, &mut commits);
    }
    commits
}

struct BlockAccumulator {
    sha: String,
    parents: Vec<OidPrefix>,
    author: Option<String>,
    timestamp: Option<String>,
    message: String,
}

impl BlockAccumulator {
    fn new(sha: &str) -> Self {
        Self {
            sha: sha.to_string(),
            parents: Vec::new(),
            author: None,
            timestamp: None,
            message: String::new(),
        }
    }
}

fn flush(block: BlockAccumulator, commits: &mut Vec<CommitRecord>) {
    let sha = match ObjectId::new(&block.sha) {
        Ok(sha) => sha,
        Err(_) => {
            debug!(sha = %block.sha, "dropping log block with malformed commit id");
            return;
        }
    };
    commits.push(CommitRecord {
        sha,
        tree: None,
        parents: block.parents,
        author: block.author,
        committer: None,
        timestamp: block.timestamp,
        message: block.message.trim().to_string(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHA_A: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
    const SHA_B: &str = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

    #[test]
    fn parses_single_block() {
        let output = format!(
            "commit {SHA_A}\nAuthor: Ada <ada@example.com>\nDate:   Thu Mar 6 10:00:00 2025\n\n    Initial commit\n"
        );
        let commits = parse_log(&output);
        assert_eq!(commits.len(), 1);
        let c = &commits[0];
        assert_eq!(c.sha.as_str(), SHA_A);
        assert_eq!(c.author.as_deref(), Some("Ada <ada@example.com>"));
        assert_eq!(c.timestamp.as_deref(), Some("Thu Mar 6 10:00:00 2025"));
        assert_eq!(c.message, "Initial commit");
        assert!(c.parents.is_empty());
    }

    #[test]
    fn splits_blocks_on_commit_marker() {
        let output = format!(
            "commit {SHA_A}\nAuthor: Ada <a@x>\n\n    second\n\ncommit {SHA_B}\nAuthor: Bob <b@x>\n\n    first\n"
        );
        let commits = parse_log(&output);
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].message, "second");
        assert_eq!(commits[1].message, "first");
    }

    #[test]
    fn colored_commit_lines_recognized() {
        let output = format!("\x1b[33mcommit {SHA_A}\x1b[0m\nAuthor: Ada <a@x>\n\n    hi\n");
        assert_eq!(parse_log(&output).len(), 1);
    }

    #[test]
    fn merge_line_yields_abbreviated_parents() {
        let output = format!("commit {SHA_A}\nMerge: aaaaaaa bbbbbbb\nAuthor: Ada <a@x>\n\n    merge\n");
        let commits = parse_log(&output);
        let parents: Vec<_> = commits[0].parents.iter().map(|p| p.as_str()).collect();
        assert_eq!(parents, vec!["aaaaaaa", "bbbbbbb"]);
    }

    #[test]
    fn multi_paragraph_message_keeps_break() {
        let output = format!("commit {SHA_A}\nAuthor: Ada <a@x>\n\n    subject\n\n    body line\n");
        let commits = parse_log(&output);
        assert_eq!(commits[0].message, "subject\n\nbody line");
    }

    #[test]
    fn malformed_commit_id_drops_block() {
        let output = format!("commit nothex\n\n    lost\ncommit {SHA_A}\n\n    kept\n");
        let commits = parse_log(&output);
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].message, "kept");
    }

    #[test]
    fn preamble_noise_ignored() {
        let output = format!("warning: something\ncommit {SHA_A}\n\n    ok\n");
        assert_eq!(parse_log(&output).len(), 1);
    }

    #[test]
    fn empty_output_yields_no_commits() {
        assert!(parse_log("").is_empty());
    }
}

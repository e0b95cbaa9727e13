//! parse::object
//!
//! Grammars for pretty-printed object bodies (`cat-file -p`).
//!
//! Unlike `log` output these carry no indentation: header lines run until
//! the first blank line, and everything after it is the message verbatim.

use std::str::FromStr;

use tracing::debug;

use crate::core::model::CommitRecord;
use crate::core::types::{ObjectId, ObjectKind, OidPrefix};
use crate::parse::strip_ansi;

/// The header fields of an annotated tag object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagBody {
    pub object: Option<ObjectId>,
    pub kind: Option<ObjectKind>,
}

/// Parse a commit object body into a full record for `sha`.
///
/// Header lines are `tree`, `parent` (repeated), `author`, `committer`.
/// The identity fields keep the `Name <email>` part; the timestamp is the
/// first token after the committer's closing `>`.
pub fn parse_commit_body(sha: ObjectId, body: &str) -> CommitRecord {
    let clean = strip_ansi(body);
    let mut record = CommitRecord::bare(sha);
    let mut lines = clean.lines();

    for line in lines.by_ref() {
        if line.trim().is_empty() {
            break;
        }
        if let Some(tree) = line.strip_prefix("tree ") {
            record.tree = ObjectId::new(tree.trim()).ok();
        } else if let Some(parent) = line.strip_prefix("parent ") {
            match OidPrefix::new(parent.trim()) {
                Ok(parent) => record.parents.push(parent),
                Err(_) => debug!(line, "skipping malformed parent line"),
            }
        } else if let Some(author) = line.strip_prefix("author ") {
            record.author = Some(identity(author).to_string());
        } else if let Some(committer) = line.strip_prefix("committer ") {
            record.committer = Some(identity(committer).to_string());
            record.timestamp = timestamp_after_identity(committer);
        } else {
            debug!(line, "skipping unknown commit header");
        }
    }

    let message: Vec<&str> = lines.collect();
    record.message = message.join("\n").trim_end().to_string();
    record
}

/// Parse an annotated tag object body. Only the `object` and `type`
/// headers matter for dereferencing; name, tagger, and message are not
/// consumed by any caller.
pub fn parse_tag_body(body: &str) -> TagBody {
    let clean = strip_ansi(body);
    let mut tag = TagBody::default();
    for line in clean.lines() {
        if line.trim().is_empty() {
            break;
        }
        if let Some(object) = line.strip_prefix("object ") {
            tag.object = ObjectId::new(object.trim()).ok();
        } else if let Some(kind) = line.strip_prefix("type ") {
            tag.kind = ObjectKind::from_str(kind.trim()).ok();
        }
    }
    tag
}

/// `Name <email>` portion of an identity line, without the trailing
/// timestamp tokens.
fn identity(value: &str) -> &str {
    match value.rfind('>') {
        Some(end) => value[..=end].trim(),
        None => value.trim(),
    }
}

/// First whitespace-delimited token after the identity's closing `>`.
fn timestamp_after_identity(value: &str) -> Option<String> {
    let end = value.rfind('>')?;
    value[end + 1..]
        .split_whitespace()
        .next()
        .map(str::to_string)
}

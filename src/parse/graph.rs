//! parse::graph
//!
//! The `log --graph` digraph grammar.
//!
//! The tool prints a DOT digraph with four meaningful line shapes: commit
//! nodes, commit edges, ref marker declarations, and ref target edges. A
//! line is classified by the first matching shape; everything else
//! (the `digraph` wrapper, attribute-only lines, damage) is ignored.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::core::model::{GraphEdge, GraphNode, HistoryGraph, RefMarker, RefMarkerKind};
use crate::core::types::ObjectId;
use crate::parse::strip_ansi;

// Commit nodes and edges carry bare hex ids and no attribute tail. Ref
// declarations and ref edges are attributed, so their patterns allow a tail.
static NODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^\s*"([0-9a-f]+)"\s*\[label="(.*)"\];?\s*$"#).expect("valid regex"));
static EDGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*"([0-9a-f]+)"\s*->\s*"([0-9a-f]+)";?\s*$"#).expect("valid regex")
});
static REF_NODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*"(branch_|tag_|HEAD)(.*?)"\s*\[label="([^"]*)".*\];?\s*$"#)
        .expect("valid regex")
});
static REF_EDGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*"(branch_|tag_|HEAD)(.*?)"\s*->\s*"([0-9a-f]+)"\s*(\[[^\]]*\])?;?\s*$"#)
        .expect("valid regex")
});

/// One classified digraph line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphLine {
    Node {
        sha: ObjectId,
        label: String,
    },
    Edge {
        from: ObjectId,
        to: ObjectId,
    },
    RefNode {
        kind: RefMarkerKind,
        name: String,
        label: String,
    },
    RefEdge {
        kind: RefMarkerKind,
        name: String,
        target: ObjectId,
    },
    Other,
}

/// Classify one line of digraph output. Shapes are tried in a fixed order
/// (node, edge, ref node, ref edge) and the first match wins; a matched
/// line with an id that is not a full hash classifies as `Other`.
pub fn classify_line(line: &str) -> GraphLine {
    if let Some(caps) = NODE.captures(line) {
        let Ok(sha) = ObjectId::new(&caps[1]) else {
            debug!(line, "graph node with short id");
            return GraphLine::Other;
        };
        return GraphLine::Node {
            sha,
            label: caps[2].replace("\\n", "\n"),
        };
    }
    if let Some(caps) = EDGE.captures(line) {
        let (Ok(from), Ok(to)) = (ObjectId::new(&caps[1]), ObjectId::new(&caps[2])) else {
            debug!(line, "graph edge with short id");
            return GraphLine::Other;
        };
        return GraphLine::Edge { from, to };
    }
    if let Some(caps) = REF_NODE.captures(line) {
        let (kind, name) = marker_identity(&caps[1], &caps[2]);
        return GraphLine::RefNode {
            kind,
            name,
            label: caps[3].to_string(),
        };
    }
    if let Some(caps) = REF_EDGE.captures(line) {
        let Ok(target) = ObjectId::new(&caps[3]) else {
            debug!(line, "ref edge with short target");
            return GraphLine::Other;
        };
        let (kind, name) = marker_identity(&caps[1], &caps[2]);
        return GraphLine::RefEdge { kind, name, target };
    }
    GraphLine::Other
}

/// Assemble a history graph from digraph output.
///
/// Markers are declared by ref nodes and given targets by ref edges; a
/// declaration whose target never arrives is pruned, and a target edge for
/// an undeclared marker is dropped.
pub fn parse_history_graph(output: &str) -> HistoryGraph {
    let clean = strip_ansi(output);
    let mut nodes = Vec::new();
    let mut edges = Vec::new();
    let mut markers: Vec<PendingMarker> = Vec::new();

    for line in clean.lines() {
        match classify_line(line) {
            GraphLine::Node { sha, label } => nodes.push(GraphNode { sha, label }),
            GraphLine::Edge { from, to } => edges.push(GraphEdge { from, to }),
            GraphLine::RefNode { kind, name, label } => {
                match markers.iter_mut().find(|m| m.kind == kind && m.name == name) {
                    Some(marker) => marker.label = label,
                    None => markers.push(PendingMarker {
                        kind,
                        name,
                        label,
                        target: None,
                    }),
                }
            }
            GraphLine::RefEdge { kind, name, target } => {
                match markers.iter_mut().find(|m| m.kind == kind && m.name == name) {
                    Some(marker) => marker.target = Some(target),
                    None => debug!(name, "ref edge without a declaration"),
                }
            }
            GraphLine::Other => {}
        }
    }

    let refs = markers
        .into_iter()
        .filter_map(|m| {
            let Some(target) = m.target else {
                debug!(name = %m.name, "pruning marker without target");
                return None;
            };
            Some(RefMarker {
                name: m.name,
                label: m.label,
                kind: m.kind,
                target,
            })
        })
        .collect();

    HistoryGraph { nodes, edges, refs }
}

struct PendingMarker {
    kind: RefMarkerKind,
    name: String,
    label: String,
    target: Option<ObjectId>,
}

fn marker_identity(prefix: &str, rest: &str) -> (RefMarkerKind, String) {
    match prefix {
        "branch_" => (RefMarkerKind::Branch, rest.to_string()),
        "tag_" => (RefMarkerKind::Tag, rest.to_string()),
        _ => (RefMarkerKind::Head, "HEAD".to_string()),
    }
}

//! ADG export to DOT and JSON formats.
//!
//! Exports the whole multi-relation graph rather than a single
//! projection, since that is the artifact this crate actually hands to
//! callers: a `cflow`-only DOT graph would need its own export path if
//! someone wants it, but the common case (inspecting what the lowering
//! pass produced) wants every relation at once, color-coded.

use crate::adg::Adg;
use crate::graph::RelationFlags;
use serde::Serialize;
use std::fmt::Write;

/// Export every node and edge of the ADG as a Graphviz DOT digraph.
/// Edges are colored by relation; an edge carrying more than one
/// relation gets one line per relation so both colors show up.
pub fn export_dot(adg: &Adg<'_>) -> String {
    let mut dot = String::from("digraph ADG {\n");
    dot.push_str("  rankdir=TB;\n");
    dot.push_str("  node [shape=box, style=rounded];\n\n");

    for id in adg.node_ids() {
        let label = escape_dot_string(&format!("{}:{}", adg.node(id).label(), id));
        writeln!(dot, "  \"{id}\" [label=\"{label}\"];").ok();
    }

    dot.push('\n');
    for (from, to, data) in adg.edges() {
        for (flag, color) in RELATION_COLORS {
            if data.flags.contains(*flag) {
                let label = if *flag == RelationFlags::DDEP && !data.vars.is_empty() {
                    let mut vars: Vec<&str> = data.vars.iter().map(String::as_str).collect();
                    vars.sort_unstable();
                    format!(", label=\"{}\"", vars.join(","))
                } else {
                    String::new()
                };
                writeln!(dot, "  \"{from}\" -> \"{to}\" [color={color}{label}];").ok();
            }
        }
    }

    dot.push_str("}\n");
    dot
}

const RELATION_COLORS: &[(RelationFlags, &str)] = &[
    (RelationFlags::SYNTAX, "gray"),
    (RelationFlags::CFLOW, "black"),
    (RelationFlags::CDEP, "blue"),
    (RelationFlags::DDEP, "red"),
];

#[derive(Debug, Serialize)]
pub struct AdgExportNode {
    pub id: usize,
    pub label: String,
}

#[derive(Debug, Serialize)]
pub struct AdgExportEdge {
    pub from: usize,
    pub to: usize,
    pub relations: String,
    pub vars: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct AdgExport {
    pub nodes: Vec<AdgExportNode>,
    pub edges: Vec<AdgExportEdge>,
}

/// Build the flat node/edge JSON shape consumed by external graph
/// viewers, without committing to a compact or pretty rendering.
pub fn build_export(adg: &Adg<'_>) -> AdgExport {
    let nodes = adg
        .node_ids()
        .map(|id| AdgExportNode {
            id,
            label: adg.node(id).label(),
        })
        .collect();

    let edges = adg
        .edges()
        .map(|(from, to, data)| {
            let mut vars: Vec<String> = data.vars.iter().cloned().collect();
            vars.sort_unstable();
            AdgExportEdge {
                from,
                to,
                relations: data.flags.label(),
                vars,
            }
        })
        .collect();

    AdgExport { nodes, edges }
}

/// Serialize the ADG to the JSON shape consumed by external graph
/// viewers: flat node/edge lists, relation names as a joined string.
pub fn export_json(adg: &Adg<'_>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&build_export(adg))
}

fn escape_dot_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::parse_java;
    use crate::lower::parse_from_ast;

    #[test]
    fn dot_export_contains_every_node_id() {
        let src = "class A { void m() { x = 1; } }";
        let tree = parse_java(src).unwrap();
        let owned = src.to_string();
        let adg = parse_from_ast(tree.root_node(), owned.as_bytes()).unwrap();

        let dot = export_dot(&adg);
        assert!(dot.starts_with("digraph ADG {"));
        for id in adg.node_ids() {
            assert!(dot.contains(&format!("\"{id}\"")));
        }
    }

    #[test]
    fn json_export_round_trips_through_serde_json() {
        let src = "class A { void m() { int a = 0; int b = a; } }";
        let tree = parse_java(src).unwrap();
        let owned = src.to_string();
        let adg = parse_from_ast(tree.root_node(), owned.as_bytes()).unwrap();

        let json = export_json(&adg).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["nodes"].is_array());
        assert!(value["edges"].is_array());
    }
}

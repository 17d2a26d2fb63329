//! Data-dependence computation: a worklist reaching-definitions fixpoint
//! over the CFG projection, used to insert `ddep` edges into the ADG.
//!
//! The reference implementation walks the CFG recursively, re-entering a
//! successor only when merging introduces new reaching definitions. That
//! recursion is equivalent to worklist reaching-definitions and is
//! rewritten here as an explicit queue so the fixpoint doesn't blow the
//! stack on large control-flow graphs (see the lowering pass's own
//! comment on recursion depth).

use crate::adg::Adg;
use crate::graph::NodeId;
use std::collections::{HashMap, HashSet, VecDeque};

/// name -> set of node ids whose most recent write to that name may still
/// be live at this program point.
pub type VarTable = HashMap<String, HashSet<NodeId>>;

/// Run the full data-dependence pass: bind read/write variable sets on
/// every syntactic leaf, compute reaching definitions over the CFG
/// projection, and insert `ddep` edges for every read that a definition
/// reaches.
pub fn add_data_dependency_layer(adg: &mut Adg<'_>) {
    adg.bind_variables();
    let cfg = adg.to_cfg();
    if cfg.node_count() == 0 {
        return;
    }
    let entry = adg.entry_node();
    let reach = reaching_definitions(adg, &cfg, entry);

    let mut edges = Vec::new();
    for (node, in_table) in &reach {
        for read in &adg.node(*node).read_vars {
            if let Some(writers) = in_table.get(&read.name) {
                for &writer in writers {
                    edges.push((writer, *node, read.name.clone()));
                }
            }
        }
    }
    for (from, to, var) in edges {
        adg.add_ddep_edge(from, to, &var);
    }
}

/// The reaching-definitions-in table for every CFG node: the union, over
/// every predecessor path, of the writer sets live just before the node
/// executes.
fn reaching_definitions(
    adg: &Adg<'_>,
    cfg: &crate::adg::Projection,
    entry: NodeId,
) -> HashMap<NodeId, VarTable> {
    let mut in_tables: HashMap<NodeId, VarTable> = HashMap::new();
    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut queue: VecDeque<(NodeId, VarTable)> = VecDeque::new();
    queue.push_back((entry, VarTable::new()));

    while let Some((node, incoming)) = queue.pop_front() {
        let entry_table = in_tables.entry(node).or_default();
        let grew = merge_into(entry_table, &incoming);
        let first_visit = visited.insert(node);
        if !grew && !first_visit {
            continue;
        }
        let out_table = apply_writes(entry_table, adg, node);
        for succ in cfg.successors(node) {
            queue.push_back((succ, out_table.clone()));
        }
    }

    in_tables
}

/// Union `incoming` into `target`, returning whether anything new was
/// added (new variable, or new writer id for an existing variable).
fn merge_into(target: &mut VarTable, incoming: &VarTable) -> bool {
    let mut grew = false;
    for (name, writers) in incoming {
        let entry = target.entry(name.clone()).or_default();
        let before = entry.len();
        entry.extend(writers.iter().copied());
        if entry.len() != before {
            grew = true;
        }
    }
    grew
}

/// `in_table` after executing `node`: each variable `node` writes now
/// reaches later nodes solely from `node` (kill), everything else
/// passes through unchanged (no gen beyond the node's own writes).
fn apply_writes(in_table: &VarTable, adg: &Adg<'_>, node: NodeId) -> VarTable {
    let mut out = in_table.clone();
    for write in &adg.node(node).write_vars {
        let mut writers = HashSet::new();
        writers.insert(node);
        out.insert(write.name.clone(), writers);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::parse_java;
    use crate::graph::RelationFlags;
    use crate::lower::parse_from_ast;

    fn build(src: &str) -> (tree_sitter::Tree, String) {
        let tree = parse_java(src).unwrap();
        (tree, src.to_string())
    }

    #[test]
    fn read_after_write_gets_a_ddep_edge() {
        let src = "class A { void m() { int a = 0; int b = a; } }";
        let (tree, owned) = build(src);
        let adg = parse_from_ast(tree.root_node(), owned.as_bytes()).unwrap();

        let has_ddep = adg
            .edges()
            .any(|(_, _, d)| d.flags.contains(RelationFlags::DDEP) && d.vars.contains("a"));
        assert!(has_ddep, "expected a ddep edge carrying variable 'a'");
    }

    #[test]
    fn declaration_without_read_has_no_ddep_edge() {
        let src = "class A { void m() { int a; a = 1; } }";
        let (tree, owned) = build(src);
        let adg = parse_from_ast(tree.root_node(), owned.as_bytes()).unwrap();

        let has_ddep = adg.edges().any(|(_, _, d)| d.flags.contains(RelationFlags::DDEP));
        assert!(!has_ddep, "a=1 never reads 'a' so there should be no ddep edge");
    }

    #[test]
    fn multi_variable_declaration_fuses_into_one_edge() {
        let src = "class A { void m() { int a = 0, b = 0; int c = a + b; } }";
        let (tree, owned) = build(src);
        let adg = parse_from_ast(tree.root_node(), owned.as_bytes()).unwrap();

        let ddeps: Vec<_> = adg
            .edges()
            .filter(|(_, _, d)| d.flags.contains(RelationFlags::DDEP))
            .collect();
        assert_eq!(ddeps.len(), 1);
        let (_, _, data) = ddeps[0];
        assert!(data.vars.contains("a"));
        assert!(data.vars.contains("b"));
    }
}

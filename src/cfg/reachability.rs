//! Reachability analysis for CFG projections.

use crate::adg::Projection;
use crate::cfg::analysis::find_entry;
use petgraph::graph::NodeIndex;
use petgraph::visit::Dfs;
use std::collections::HashSet;

/// Every node reachable from the entry node. Empty for an empty graph.
pub fn find_reachable(cfg: &Projection) -> Vec<NodeIndex> {
    let entry = match find_entry(cfg) {
        Some(e) => e,
        None => return vec![],
    };

    let mut dfs = Dfs::new(cfg.index(), entry);
    let mut reachable = Vec::new();
    while let Some(node) = dfs.next(cfg.index()) {
        reachable.push(node);
    }
    reachable
}

/// Every node that the entry node cannot reach: dead code.
pub fn find_unreachable(cfg: &Projection) -> Vec<NodeIndex> {
    if find_entry(cfg).is_none() {
        return vec![];
    }
    let reachable: HashSet<_> = find_reachable(cfg).into_iter().collect();
    cfg.index()
        .node_indices()
        .filter(|n| !reachable.contains(n))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::parse_java;
    use crate::lower::parse_from_ast;

    fn projection_for(src: &str) -> Projection {
        let tree = parse_java(src).unwrap();
        let owned = src.to_string();
        let adg = parse_from_ast(tree.root_node(), owned.as_bytes()).unwrap();
        adg.to_cfg()
    }

    #[test]
    fn every_node_in_a_straight_line_method_is_reachable() {
        let cfg = projection_for("class A { void m() { x = 1; y = 2; } }");
        assert_eq!(find_reachable(&cfg).len(), cfg.node_count());
        assert!(find_unreachable(&cfg).is_empty());
    }

    #[test]
    fn an_if_else_method_has_no_unreachable_nodes() {
        let cfg = projection_for("class A { void m() { if (x) { y = 1; } else { y = 2; } } }");
        assert!(find_unreachable(&cfg).is_empty());
    }
}

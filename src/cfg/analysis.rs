//! Entry/exit detection and degree queries over a CFG projection.

use crate::adg::Projection;
use petgraph::graph::NodeIndex;

/// The entry node: the projection's nodes are inserted in ascending
/// [`crate::graph::NodeId`] order, and the ADG's own entry node (id `1`)
/// is always the smallest id touched by a `cflow` edge.
pub fn find_entry(cfg: &Projection) -> Option<NodeIndex> {
    cfg.index().node_indices().next()
}

/// Every node with no outgoing edge in this projection.
pub fn find_exits(cfg: &Projection) -> Vec<NodeIndex> {
    cfg.index()
        .node_indices()
        .filter(|&idx| is_exit(cfg, idx))
        .collect()
}

pub fn is_exit(cfg: &Projection, node: NodeIndex) -> bool {
    out_degree(cfg, node) == 0
}

pub fn in_degree(cfg: &Projection, node: NodeIndex) -> usize {
    cfg.index()
        .neighbors_directed(node, petgraph::Direction::Incoming)
        .count()
}

pub fn out_degree(cfg: &Projection, node: NodeIndex) -> usize {
    cfg.index()
        .neighbors_directed(node, petgraph::Direction::Outgoing)
        .count()
}

/// More than one incoming edge: a point where control flow joins back up.
pub fn is_merge_point(cfg: &Projection, node: NodeIndex) -> bool {
    in_degree(cfg, node) > 1
}

/// More than one outgoing edge: a branch.
pub fn is_branch_point(cfg: &Projection, node: NodeIndex) -> bool {
    out_degree(cfg, node) > 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::parse_java;
    use crate::lower::parse_from_ast;

    #[test]
    fn if_else_has_one_branch_point_and_one_merge_point() {
        let src = "class A { void m() { if (x) { y = 1; } else { y = 2; } z = 3; } }";
        let tree = parse_java(src).unwrap();
        let owned = src.to_string();
        let adg = parse_from_ast(tree.root_node(), owned.as_bytes()).unwrap();
        let cfg = adg.to_cfg();

        let branch_points = cfg
            .index()
            .node_indices()
            .filter(|&n| is_branch_point(&cfg, n))
            .count();
        assert!(branch_points >= 1);

        let merge_points = cfg
            .index()
            .node_indices()
            .filter(|&n| is_merge_point(&cfg, n))
            .count();
        assert!(merge_points >= 1);
    }

    #[test]
    fn straight_line_method_has_a_single_exit() {
        let src = "class A { void m() { x = 1; y = 2; } }";
        let tree = parse_java(src).unwrap();
        let owned = src.to_string();
        let adg = parse_from_ast(tree.root_node(), owned.as_bytes()).unwrap();
        let cfg = adg.to_cfg();

        assert_eq!(find_exits(&cfg).len(), 1);
    }
}

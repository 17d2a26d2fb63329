//! Dominator tree construction and queries.
//!
//! A node `d` dominates node `n` if every path from the entry node to
//! `n` must go through `d`. The immediate dominator of a node is its
//! unique closest strict dominator. This wraps `petgraph`'s dominance
//! algorithm with a more ergonomic API over a [`Projection`].

use crate::adg::Projection;
use crate::cfg::analysis::find_entry;
use petgraph::algo::dominators::simple_fast;
use petgraph::graph::NodeIndex;
use std::collections::HashMap;

/// Dominator tree for a CFG projection.
///
/// Provides cached dominance queries including immediate dominators,
/// dominance checks, and dominator-tree traversal.
#[derive(Debug, Clone)]
pub struct DominatorTree {
    root: NodeIndex,
    immediate_dominator: HashMap<NodeIndex, Option<NodeIndex>>,
    children: HashMap<NodeIndex, Vec<NodeIndex>>,
}

impl DominatorTree {
    /// Compute the dominator tree using the Cooper/Harvey/Kennedy
    /// algorithm. Returns `None` if the projection has no entry node.
    pub fn new(cfg: &Projection) -> Option<Self> {
        let entry = find_entry(cfg)?;
        let dominators = simple_fast(cfg.index(), entry);

        let mut immediate_dominator = HashMap::new();
        let mut children: HashMap<NodeIndex, Vec<NodeIndex>> = HashMap::new();

        for node in cfg.index().node_indices() {
            let idom = dominators.immediate_dominator(node);
            immediate_dominator.insert(node, idom);
            if let Some(parent) = idom {
                children.entry(parent).or_default().push(node);
            }
        }

        Some(Self {
            root: entry,
            immediate_dominator,
            children,
        })
    }

    pub fn root(&self) -> NodeIndex {
        self.root
    }

    /// The immediate dominator of `node`; `None` for the root.
    pub fn immediate_dominator(&self, node: NodeIndex) -> Option<NodeIndex> {
        self.immediate_dominator.get(&node).copied().flatten()
    }

    /// Does `a` dominate `b`? Every node dominates itself.
    pub fn dominates(&self, a: NodeIndex, b: NodeIndex) -> bool {
        if a == b {
            return true;
        }
        let mut current = b;
        while let Some(idom) = self.immediate_dominator(current) {
            if idom == a {
                return true;
            }
            current = idom;
        }
        false
    }

    /// Nodes immediately dominated by `node`.
    pub fn children(&self, node: NodeIndex) -> &[NodeIndex] {
        self.children.get(&node).map_or(&[], |v| v.as_slice())
    }

    pub fn strictly_dominates(&self, a: NodeIndex, b: NodeIndex) -> bool {
        a != b && self.dominates(a, b)
    }

    /// Dominators of `node`, from `node` itself up to the root.
    pub fn dominators(&self, node: NodeIndex) -> Dominators<'_> {
        Dominators {
            tree: self,
            current: Some(node),
        }
    }

    /// The nearest dominator common to both `a` and `b`.
    pub fn common_dominator(&self, a: NodeIndex, b: NodeIndex) -> Option<NodeIndex> {
        let a_doms: std::collections::HashSet<NodeIndex> = self.dominators(a).collect();
        self.dominators(b).find(|dom| a_doms.contains(dom))
    }

    /// Depth in the dominator tree; the root has depth 0.
    pub fn depth(&self, node: NodeIndex) -> usize {
        let mut depth = 0;
        let mut current = node;
        while let Some(idom) = self.immediate_dominator(current) {
            depth += 1;
            current = idom;
        }
        depth
    }

    /// Build a tree from pre-computed parts. Used by [`crate::cfg::post_dominators`]
    /// to wrap dominators computed on a reversed graph.
    pub(crate) fn from_parts(
        root: NodeIndex,
        immediate_dominator: HashMap<NodeIndex, Option<NodeIndex>>,
        children: HashMap<NodeIndex, Vec<NodeIndex>>,
    ) -> Self {
        Self {
            root,
            immediate_dominator,
            children,
        }
    }
}

pub struct Dominators<'a> {
    tree: &'a DominatorTree,
    current: Option<NodeIndex>,
}

impl<'a> Iterator for Dominators<'a> {
    type Item = NodeIndex;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.current?;
        self.current = self.tree.immediate_dominator(node);
        Some(node)
    }
}

pub fn compute_dominator_tree(cfg: &Projection) -> Option<DominatorTree> {
    DominatorTree::new(cfg)
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
    fn entry_has_no_immediate_dominator() {
        let cfg = projection_for("class A { void m() { if (x) { y = 1; } else { y = 2; } } }");
        let tree = DominatorTree::new(&cfg).expect("cfg has an entry");
        assert_eq!(tree.immediate_dominator(tree.root()), None);
    }

    #[test]
    fn entry_dominates_every_reachable_node() {
        let cfg = projection_for("class A { void m() { if (x) { y = 1; } else { y = 2; } } }");
        let tree = DominatorTree::new(&cfg).expect("cfg has an entry");
        let root = tree.root();
        for node in cfg.index().node_indices() {
            assert!(tree.dominates(root, node));
        }
    }

    #[test]
    fn a_node_dominates_itself_but_not_strictly() {
        let cfg = projection_for("class A { void m() { x = 1; } }");
        let tree = DominatorTree::new(&cfg).expect("cfg has an entry");
        let root = tree.root();
        assert!(tree.dominates(root, root));
        assert!(!tree.strictly_dominates(root, root));
    }
}

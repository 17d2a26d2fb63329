//! Post-dominator tree construction and queries.
//!
//! A node `d` post-dominates node `n` if every path from `n` to an
//! exit node must go through `d`. Post-dominance is the dual of
//! dominance, computed by running the dominance algorithm on a
//! reversed CFG projection. This is what gives a semantic, as opposed
//! to structural, view of control dependence: `n` is control-dependent
//! on a branch `b` iff `b` has a successor that does not post-dominate
//! `n`. The structural `cdep` edges the lowering pass inserts are the
//! graph's ground truth; this tree is available to build a semantic
//! cross-check on top of it.

use crate::adg::Projection;
use crate::cfg::analysis::find_exits;
use crate::cfg::dominators::DominatorTree;
use petgraph::algo::dominators::simple_fast;
use petgraph::graph::NodeIndex;
use petgraph::visit::Reversed;
use std::collections::HashMap;

/// Post-dominator tree for a CFG projection, built by reversing the
/// graph and running ordinary dominance from the exit node.
#[derive(Debug, Clone)]
pub struct PostDominatorTree {
    inner: DominatorTree,
    exit: NodeIndex,
}

impl PostDominatorTree {
    /// Uses the first exit found by [`find_exits`] as the root.
    /// A projection with several exits gets an approximate tree built
    /// from only one of them; most Java methods have a single exit
    /// (see [`crate::adg::Adg::exit_node`]'s uniqueness invariant).
    pub fn new(cfg: &Projection) -> Option<Self> {
        let exit = find_exits(cfg).into_iter().next()?;
        let reversed = Reversed(cfg.index());
        let dominators = simple_fast(reversed, exit);

        let mut immediate_dominator = HashMap::new();
        let mut children: HashMap<NodeIndex, Vec<NodeIndex>> = HashMap::new();
        for node in cfg.index().node_indices() {
            let idom = dominators.immediate_dominator(node);
            immediate_dominator.insert(node, idom);
            if let Some(parent) = idom {
                children.entry(parent).or_default().push(node);
            }
        }

        let inner = DominatorTree::from_parts(exit, immediate_dominator, children);
        Some(Self { inner, exit })
    }

    pub fn root(&self) -> NodeIndex {
        self.exit
    }

    pub fn immediate_post_dominator(&self, node: NodeIndex) -> Option<NodeIndex> {
        self.inner.immediate_dominator(node)
    }

    pub fn post_dominates(&self, a: NodeIndex, b: NodeIndex) -> bool {
        self.inner.dominates(a, b)
    }

    pub fn children(&self, node: NodeIndex) -> &[NodeIndex] {
        self.inner.children(node)
    }

    pub fn strictly_post_dominates(&self, a: NodeIndex, b: NodeIndex) -> bool {
        self.inner.strictly_dominates(a, b)
    }

    pub fn post_dominators(&self, node: NodeIndex) -> PostDominators<'_> {
        PostDominators {
            tree: self,
            current: Some(node),
        }
    }

    pub fn common_post_dominator(&self, a: NodeIndex, b: NodeIndex) -> Option<NodeIndex> {
        let a_pdoms: std::collections::HashSet<NodeIndex> = self.post_dominators(a).collect();
        self.post_dominators(b).find(|pdom| a_pdoms.contains(pdom))
    }

    pub fn depth(&self, node: NodeIndex) -> usize {
        self.inner.depth(node)
    }

    pub fn as_dominator_tree(&self) -> &DominatorTree {
        &self.inner
    }
}

pub struct PostDominators<'a> {
    tree: &'a PostDominatorTree,
    current: Option<NodeIndex>,
}

impl<'a> Iterator for PostDominators<'a> {
    type Item = NodeIndex;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.current?;
        self.current = self.tree.immediate_post_dominator(node);
        Some(node)
    }
}

pub fn compute_post_dominator_tree(cfg: &Projection) -> Option<PostDominatorTree> {
    PostDominatorTree::new(cfg)
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
    fn exit_has_no_immediate_post_dominator() {
        let cfg = projection_for("class A { void m() { if (x) { y = 1; } else { y = 2; } } }");
        let tree = PostDominatorTree::new(&cfg).expect("cfg has an exit");
        assert_eq!(tree.immediate_post_dominator(tree.root()), None);
    }

    #[test]
    fn exit_post_dominates_every_node() {
        let cfg = projection_for("class A { void m() { if (x) { y = 1; } else { y = 2; } } }");
        let tree = PostDominatorTree::new(&cfg).expect("cfg has an exit");
        let exit = tree.root();
        for node in cfg.index().node_indices() {
            assert!(tree.post_dominates(exit, node));
        }
    }
}

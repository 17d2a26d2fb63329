//! Natural loop detection using dominance analysis.

use crate::adg::Projection;
use crate::cfg::analysis::find_entry;
use petgraph::algo::dominators::simple_fast;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use std::collections::{HashSet, VecDeque};

/// A natural loop: a single-entry region identified by a back-edge
/// where the header dominates the tail.
#[derive(Debug, Clone)]
pub struct NaturalLoop {
    pub header: NodeIndex,
    pub back_edge: (NodeIndex, NodeIndex),
    pub body: HashSet<NodeIndex>,
}

impl NaturalLoop {
    pub fn contains(&self, node: NodeIndex) -> bool {
        self.body.contains(&node)
    }

    pub fn size(&self) -> usize {
        self.body.len()
    }

    /// Nesting level relative to the other loops in `all_loops`: 0 for
    /// outermost loops, 1 for a loop nested inside one outer loop, etc.
    pub fn nesting_level(&self, all_loops: &[NaturalLoop]) -> usize {
        let mut level = 0;
        for other in all_loops {
            if other.header != self.header && other.body.contains(&self.header) {
                level = level.max(other.nesting_level(all_loops) + 1);
            }
        }
        level
    }
}

/// Find every back-edge `(N -> H)` where `H` dominates `N`, and build
/// its natural loop body.
pub fn detect_natural_loops(cfg: &Projection) -> Vec<NaturalLoop> {
    let entry = match find_entry(cfg) {
        Some(e) => e,
        None => return vec![],
    };

    let dominators = simple_fast(cfg.index(), entry);
    let mut loops = Vec::new();

    for edge in cfg.index().edge_references() {
        let tail = edge.source();
        let header = edge.target();
        if let Some(mut tail_dominators) = dominators.dominators(tail) {
            if tail_dominators.any(|d| d == header) {
                let body = compute_loop_body(cfg, header, tail);
                loops.push(NaturalLoop {
                    header,
                    back_edge: (tail, header),
                    body,
                });
            }
        }
    }

    loops
}

fn compute_loop_body(cfg: &Projection, header: NodeIndex, tail: NodeIndex) -> HashSet<NodeIndex> {
    let mut body = HashSet::new();
    let mut worklist = VecDeque::new();
    worklist.push_back(tail);

    while let Some(node) = worklist.pop_front() {
        if node == header || body.contains(&node) {
            continue;
        }
        body.insert(node);
        for pred in cfg.index().neighbors_directed(node, petgraph::Direction::Incoming) {
            if pred != header && !body.contains(&pred) {
                worklist.push_back(pred);
            }
        }
    }

    body.insert(header);
    body
}

pub fn find_loop_headers(cfg: &Projection) -> HashSet<NodeIndex> {
    detect_natural_loops(cfg).into_iter().map(|l| l.header).collect()
}

pub fn is_loop_header(cfg: &Projection, node: NodeIndex) -> bool {
    find_loop_headers(cfg).contains(&node)
}

pub fn loops_containing(cfg: &Projection, node: NodeIndex) -> Vec<NaturalLoop> {
    detect_natural_loops(cfg)
        .into_iter()
        .filter(|l| l.body.contains(&node))
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
    fn while_loop_has_exactly_one_natural_loop() {
        let cfg = projection_for("class A { void m() { while (x) { y = 1; } } }");
        let loops = detect_natural_loops(&cfg);
        assert_eq!(loops.len(), 1);
    }

    #[test]
    fn straight_line_code_has_no_loops() {
        let cfg = projection_for("class A { void m() { x = 1; y = 2; } }");
        assert!(detect_natural_loops(&cfg).is_empty());
    }

    #[test]
    fn nested_while_loops_report_increasing_nesting_level() {
        let cfg = projection_for(
            "class A { void m() { while (x) { while (y) { z = 1; } } } }",
        );
        let loops = detect_natural_loops(&cfg);
        assert_eq!(loops.len(), 2);
        let levels: HashSet<usize> = loops.iter().map(|l| l.nesting_level(&loops)).collect();
        assert!(levels.contains(&0));
        assert!(levels.contains(&1));
    }
}

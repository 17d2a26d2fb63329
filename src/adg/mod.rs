//! The Any-Dependency Graph container: node storage, pending-jump
//! bookkeeping, and the four single-relation projections.
//!
//! [`Adg`] owns the dense node store and the graph itself; the lowering
//! pass in [`crate::lower`] is the only code that calls its mutating
//! methods. Everything else (variable binding, data-dependence, CFG
//! analytics, export) operates on the finished graph or on one of its
//! projections.

mod project;

pub use project::Projection;

use crate::ast::{node_text, AstNode};
use crate::graph::{EdgeData, Graph, NodeId, RelationFlags};
use crate::vars::{read_write_variables, Variable};
use anyhow::{anyhow, Result};

/// What a node's payload actually is: a real AST subtree, or a synthetic
/// bookkeeping node the lowering pass inserted (a loop's exit, a block's
/// exit, a method's exit, ...).
#[derive(Debug, Clone)]
pub enum NodeKind<'a> {
    Ast(AstNode<'a>),
    Synthetic(&'static str),
}

#[derive(Debug, Clone)]
pub struct NodeData<'a> {
    pub kind: NodeKind<'a>,
    /// Present for every node also carried via `kind: Ast(_)`; kept
    /// separate so `name()` can override the AST node kind for display
    /// (e.g. an `if_statement` node is labelled `if`, not
    /// `if_statement`).
    pub name: Option<&'static str>,
    pub is_var_decl: bool,
    pub write_vars: Vec<Variable>,
    pub read_vars: Vec<Variable>,
}

impl<'a> NodeData<'a> {
    fn ast(node: AstNode<'a>, name: Option<&'static str>) -> Self {
        Self {
            kind: NodeKind::Ast(node),
            name,
            is_var_decl: false,
            write_vars: Vec::new(),
            read_vars: Vec::new(),
        }
    }

    fn synthetic(name: &'static str) -> Self {
        Self {
            kind: NodeKind::Synthetic(name),
            name: Some(name),
            is_var_decl: false,
            write_vars: Vec::new(),
            read_vars: Vec::new(),
        }
    }

    pub fn ast_node(&self) -> Option<AstNode<'a>> {
        match self.kind {
            NodeKind::Ast(n) => Some(n),
            NodeKind::Synthetic(_) => None,
        }
    }

    /// Label used in the table renderer and DOT/JSON export: the explicit
    /// name if one was given at creation time, otherwise the AST node
    /// kind (`if_statement`, `for_statement`, ...).
    pub fn label(&self) -> String {
        if let Some(name) = self.name {
            return name.to_string();
        }
        match self.kind {
            NodeKind::Ast(n) => n.kind().to_string(),
            NodeKind::Synthetic(name) => name.to_string(),
        }
    }
}

/// A queued `continue`/`break`, waiting for the enclosing loop or labeled
/// statement to rewire it to its real target. `None` means unlabeled.
type Label = Option<String>;

pub struct Adg<'a> {
    graph: Graph<NodeData<'a>>,
    source: &'a [u8],
    pending_continue: Vec<(NodeId, Label)>,
    pending_break: Vec<(NodeId, Label)>,
    pending_return: Vec<NodeId>,
}

impl<'a> Adg<'a> {
    pub fn new(source: &'a [u8]) -> Self {
        Self {
            graph: Graph::new(),
            source,
            pending_continue: Vec::new(),
            pending_break: Vec::new(),
            pending_return: Vec::new(),
        }
    }

    pub fn source(&self) -> &'a [u8] {
        self.source
    }

    pub fn add_ast_node(&mut self, node: AstNode<'a>) -> NodeId {
        self.graph.add_node(NodeData::ast(node, None))
    }

    pub fn add_named_ast_node(&mut self, node: AstNode<'a>, name: &'static str) -> NodeId {
        self.graph.add_node(NodeData::ast(node, Some(name)))
    }

    pub fn add_synthetic_node(&mut self, name: &'static str) -> NodeId {
        self.graph.add_node(NodeData::synthetic(name))
    }

    pub fn mark_var_decl(&mut self, id: NodeId) {
        self.graph.node_mut(id).is_var_decl = true;
    }

    pub fn add_edge(&mut self, from: NodeId, to: NodeId, flags: RelationFlags) {
        self.graph.add_edge(from, to, flags);
    }

    pub fn add_ddep_edge(&mut self, from: NodeId, to: NodeId, var: &str) {
        self.graph.add_ddep_edge(from, to, var);
    }

    pub fn node(&self, id: NodeId) -> &NodeData<'a> {
        self.graph.node(id)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.node_ids()
    }

    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId, &EdgeData)> + '_ {
        self.graph.edges()
    }

    pub fn edge_data(&self, from: NodeId, to: NodeId) -> Option<&EdgeData> {
        self.graph.edge_data(from, to)
    }

    pub fn successors(&self, id: NodeId) -> Vec<NodeId> {
        self.graph.successors(id)
    }

    // --- pending jump bookkeeping -----------------------------------

    pub fn push_continue(&mut self, node: NodeId, label: Option<String>) {
        self.pending_continue.push((node, label));
    }

    pub fn push_break(&mut self, node: NodeId, label: Option<String>) {
        self.pending_break.push((node, label));
    }

    pub fn push_return(&mut self, node: NodeId) {
        self.pending_return.push(node);
    }

    /// Rewire every pending `continue` whose label matches `label`
    /// (`None` matches an unlabeled continue) to flow into `target`.
    pub fn rewire_continue(&mut self, target: NodeId, label: Option<&str>) {
        let (matched, rest) = partition_by_label(&mut self.pending_continue, label);
        self.pending_continue = rest;
        for node in matched {
            self.graph.remove_out_edges_with(node, RelationFlags::empty());
            self.graph.add_edge(node, target, RelationFlags::CFLOW);
        }
    }

    /// Rewire every pending `break` whose label matches `label` to flow
    /// into `target`.
    pub fn rewire_break(&mut self, target: NodeId, label: Option<&str>) {
        let (matched, rest) = partition_by_label(&mut self.pending_break, label);
        self.pending_break = rest;
        for node in matched {
            self.graph.remove_out_edges_with(node, RelationFlags::empty());
            self.graph.add_edge(node, target, RelationFlags::CFLOW);
        }
    }

    /// Rewire every pending `return` to flow into the graph's single
    /// exit node. Called once, after the whole method has been lowered.
    pub fn wire_returns(&mut self) -> Result<()> {
        if self.pending_return.is_empty() {
            return Ok(());
        }
        let exit = self.exit_node()?;
        let returns: Vec<NodeId> = self.pending_return.drain(..).collect();
        for node in returns {
            self.graph.remove_out_edges_with(node, RelationFlags::CFLOW);
            self.graph.add_edge(node, exit, RelationFlags::CFLOW);
        }
        Ok(())
    }

    /// The root node; always node `1` since lowering starts there.
    pub fn entry_node(&self) -> NodeId {
        1
    }

    /// The unique terminal node: no out-edges, at least one in-edge, and
    /// at least one of those in-edges is a `cflow` edge.
    pub fn exit_node(&self) -> Result<NodeId> {
        let candidates: Vec<NodeId> = self
            .graph
            .node_ids()
            .filter(|&id| {
                self.graph.out_degree(id) == 0
                    && self.graph.in_degree(id) > 0
                    && self
                        .graph
                        .predecessors(id)
                        .iter()
                        .any(|&p| self.cflow_edge(p, id))
            })
            .collect();
        match candidates.as_slice() {
            [single] => Ok(*single),
            [] => Err(anyhow!("no exit node found in this graph")),
            many => Err(anyhow!(
                "expected exactly one exit node, found {}: {:?}",
                many.len(),
                many
            )),
        }
    }

    fn cflow_edge(&self, from: NodeId, to: NodeId) -> bool {
        self.graph
            .edge_data(from, to)
            .is_some_and(|e| e.flags.contains(RelationFlags::CFLOW))
    }

    // --- variable binding --------------------------------------------

    /// Populate `read_vars`/`write_vars` for every AST-bearing node that
    /// is not further decomposed (i.e. has no outgoing `syntax` edge).
    /// Must run after lowering is complete and before data-dependence
    /// computation.
    pub fn bind_variables(&mut self) {
        let leaves: Vec<NodeId> = self
            .graph
            .node_ids()
            .filter(|&id| {
                self.graph.node(id).ast_node().is_some()
                    && self
                        .graph
                        .successors(id)
                        .into_iter()
                        .all(|s| !self.syntax_edge(id, s))
            })
            .collect();
        for id in leaves {
            let ast_node = self.graph.node(id).ast_node().unwrap();
            let (writes, reads) = read_write_variables(ast_node, self.source);
            let data = self.graph.node_mut(id);
            data.write_vars = writes;
            data.read_vars = reads;
        }
    }

    fn syntax_edge(&self, from: NodeId, to: NodeId) -> bool {
        self.graph
            .edge_data(from, to)
            .is_some_and(|e| e.flags.contains(RelationFlags::SYNTAX))
    }

    // --- projections ---------------------------------------------------

    pub fn to_cfg(&self) -> Projection {
        project::project(&self.graph, RelationFlags::CFLOW)
    }

    pub fn to_cdg(&self) -> Projection {
        project::project(&self.graph, RelationFlags::CDEP)
    }

    pub fn to_ddg(&self) -> Projection {
        project::project(&self.graph, RelationFlags::DDEP)
    }

    pub fn to_ast(&self) -> Projection {
        project::project(&self.graph, RelationFlags::SYNTAX)
    }
}

fn partition_by_label(
    pending: &mut Vec<(NodeId, Label)>,
    label: Option<&str>,
) -> (Vec<NodeId>, Vec<(NodeId, Label)>) {
    let mut matched = Vec::new();
    let mut rest = Vec::new();
    for (node, node_label) in pending.drain(..) {
        if node_label.as_deref() == label {
            matched.push(node);
        } else {
            rest.push((node, node_label));
        }
    }
    (matched, rest)
}

impl<'a> std::fmt::Display for Adg<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{:<28} {:<4} {:<28} {}", "From", "", "To", "Dependencies")?;
        for (from, to, data) in self.edges() {
            writeln!(
                f,
                "{:<28} {:<4} {:<28} {}",
                format!("{}:{}", self.node(from).label(), from),
                "->",
                format!("{}:{}", self.node(to).label(), to),
                data.flags.label()
            )?;
        }
        Ok(())
    }
}

/// Convenience label accessor for error messages and tests.
pub fn node_span_text<'a>(node: &NodeData<'a>, source: &'a [u8]) -> Option<&'a str> {
    node.ast_node().map(|n| node_text(n, source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::parse_java;

    #[test]
    fn entry_node_is_one() {
        let source = "class A {}";
        let tree = parse_java(source).unwrap();
        let mut adg = Adg::new(source.as_bytes());
        adg.add_ast_node(tree.root_node());
        assert_eq!(adg.entry_node(), 1);
    }

    #[test]
    fn rewire_continue_honours_label_matching() {
        let source = "class A {}";
        let tree = parse_java(source).unwrap();
        let mut adg = Adg::new(source.as_bytes());
        let n1 = adg.add_ast_node(tree.root_node());
        let n2 = adg.add_ast_node(tree.root_node());
        let target = adg.add_synthetic_node("target");
        adg.push_continue(n1, None);
        adg.push_continue(n2, Some("outer".into()));
        adg.rewire_continue(target, None);
        assert!(adg
            .edge_data(n1, target)
            .is_some_and(|e| e.flags.contains(RelationFlags::CFLOW)));
        assert!(adg.edge_data(n2, target).is_none());
    }
}

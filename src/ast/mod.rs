//! Read-only view over the tree-sitter Java parse tree.
//!
//! The core never mutates or owns the AST: it borrows [`tree_sitter::Node`]
//! values for the lifetime of the parsed [`tree_sitter::Tree`] and the
//! source bytes. This module collects the handful of structural queries
//! the lowering and variable-extraction passes need on top of what
//! tree-sitter already exposes (`kind()`, `children()`, `byte_range()`,
//! `child_by_field_name()`).

use anyhow::{Context, Result};
use tree_sitter::{Node, Parser, Tree};

pub type AstNode<'a> = Node<'a>;

/// Parse Java source into a tree-sitter tree.
///
/// The returned [`Tree`] must outlive any [`AstNode`] borrowed from it,
/// which in turn must outlive the [`crate::graph::adg::Adg`] built from it.
pub fn parse_java(source: &str) -> Result<Tree> {
    let mut parser = Parser::new();
    let language = tree_sitter_java::LANGUAGE.into();
    parser
        .set_language(&language)
        .context("failed to load the tree-sitter Java grammar")?;
    parser
        .parse(source, None)
        .context("tree-sitter returned no parse tree")
}

/// UTF-8 text spanned by `node`.
pub fn node_text<'a>(node: AstNode<'_>, source: &'a [u8]) -> &'a str {
    std::str::from_utf8(&source[node.byte_range()]).unwrap_or("")
}

/// Depth-first collection of every descendant (and `node` itself) whose
/// `kind()` is in `node_types`, pre-order, matching `filter_nodes` from the
/// reference implementation.
pub fn filter_nodes<'a>(node: Option<AstNode<'a>>, node_types: &[&str]) -> Vec<AstNode<'a>> {
    let Some(node) = node else {
        return Vec::new();
    };
    let mut out = Vec::new();
    if node_types.contains(&node.kind()) {
        out.push(node);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        out.extend(filter_nodes(Some(child), node_types));
    }
    out
}

/// The single `switch_label` child of a `switch_block_statement_group`.
pub fn switch_label<'a>(group: AstNode<'a>) -> AstNode<'a> {
    let mut cursor = group.walk();
    group
        .children(&mut cursor)
        .find(|n| n.kind() == "switch_label")
        .expect("switch_block_statement_group always has a switch_label")
}

/// `"case"` or `"default"`, taken from the first child of the group's label.
pub fn switch_block_label(group: AstNode<'_>) -> String {
    let label = switch_label(group);
    label
        .child(0)
        .map(|n| n.kind().to_string())
        .unwrap_or_default()
}

/// Every sibling following the literal `:` token inside `node`.
pub fn nodes_after_colon<'a>(node: AstNode<'a>) -> Vec<AstNode<'a>> {
    let mut cursor = node.walk();
    let children: Vec<AstNode<'a>> = node.children(&mut cursor).collect();
    match children.iter().position(|n| n.kind() == ":") {
        Some(pos) => children[pos + 1..].to_vec(),
        None => Vec::new(),
    }
}

/// The identifier label attached to a `labeled_statement`, `break_statement`
/// or `continue_statement`, if any (`break;` and `continue;` have none).
pub fn identifier_label(node: AstNode<'_>, source: &[u8]) -> Option<String> {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .find(|n| n.kind() == "identifier")
        .map(|n| node_text(n, source).to_string())
}

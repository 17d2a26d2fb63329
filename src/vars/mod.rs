//! Read/write variable extraction for a single statement-level AST subtree.
//!
//! Every ADG node that does not decompose further into its own syntax
//! children (a `local_variable_declaration`, an `expression_statement`, a
//! loop header, ...) gets its reaching-definitions behaviour from the two
//! ordered sets this module computes over its subtree: the variables it
//! writes and the variables it reads. The data-dependence pass in
//! [`crate::dataflow`] only ever looks at these two sets, never at the AST
//! directly.
//!
//! Variable identity is by source text alone: no scope resolution, no type
//! checking. Two identifiers with the same spelling in unrelated scopes are
//! the same variable as far as this module is concerned.

use crate::ast::{node_text, AstNode};

/// A variable occurrence: its name, and — for writes produced by a typed
/// declaration — the type it was declared with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub name: String,
    pub ty: Option<String>,
}

impl Variable {
    fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: None,
        }
    }

    fn typed(name: impl Into<String>, ty: Option<String>) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Compute the ordered (writes, reads) pair for `node`.
///
/// `node` is expected to be a leaf-level ADG construct (it is never called
/// on a `block`, `if_statement`, or other node the lowering pass recurses
/// into on its own).
pub fn read_write_variables(node: AstNode<'_>, source: &[u8]) -> (Vec<Variable>, Vec<Variable>) {
    let mut writes = Vec::new();
    let mut reads = Vec::new();
    walk(node, source, &mut writes, &mut reads);
    (writes, reads)
}

fn walk(node: AstNode<'_>, source: &[u8], writes: &mut Vec<Variable>, reads: &mut Vec<Variable>) {
    match node.kind() {
        "local_variable_declaration" => {
            let ty = declared_type_text(node, source);
            let mut cursor = node.walk();
            for declarator in node
                .children(&mut cursor)
                .filter(|n| n.kind() == "variable_declarator")
            {
                declarator_writes_reads(declarator, ty.clone(), source, writes, reads);
            }
        }
        "variable_declarator" => {
            declarator_writes_reads(node, None, source, writes, reads);
        }
        "formal_parameter" => {
            if let Some(name) = node.child_by_field_name("name") {
                let ty = declared_type_text(node, source);
                writes.push(Variable::typed(node_text(name, source), ty));
            }
        }
        "catch_formal_parameter" => {
            if let Some(name) = node.child_by_field_name("name") {
                let ty = declared_type_text(node, source);
                writes.push(Variable::typed(node_text(name, source), ty));
            }
        }
        "resource" => {
            if let Some(name) = node.child_by_field_name("name") {
                writes.push(Variable::untyped(node_text(name, source)));
            }
            if let Some(value) = node.child_by_field_name("value") {
                walk(value, source, writes, reads);
            }
        }
        "enhanced_for_statement" => {
            if let Some(name) = node.child_by_field_name("name") {
                let ty = declared_type_text(node, source);
                writes.push(Variable::typed(node_text(name, source), ty));
            }
            if let Some(value) = node.child_by_field_name("value") {
                walk(value, source, writes, reads);
            }
        }
        "update_expression" => {
            if let Some(id) = leftmost_identifier(node) {
                let name = node_text(id, source).to_string();
                writes.push(Variable::untyped(name.clone()));
                reads.push(Variable::untyped(name));
            }
        }
        "field_access" => {
            if let Some(object) = node.child_by_field_name("object") {
                walk(object, source, writes, reads);
            }
        }
        "method_invocation" => {
            if let Some(object) = node.child_by_field_name("object") {
                walk(object, source, writes, reads);
            }
            if let Some(args) = node.child_by_field_name("arguments") {
                walk(args, source, writes, reads);
            }
        }
        "object_creation_expression" => {
            if let Some(args) = node.child_by_field_name("arguments") {
                walk(args, source, writes, reads);
            }
        }
        "class_declaration" => {
            if let Some(body) = node.child_by_field_name("body") {
                walk(body, source, writes, reads);
            }
        }
        "lambda_expression" => {}
        "assignment_expression" => {
            let left = node.child_by_field_name("left");
            let right = node.child_by_field_name("right");
            if let Some(left) = left {
                walk(left, source, writes, reads);
            }
            if let Some(right) = right {
                walk(right, source, writes, reads);
            }
            let target = left.and_then(leftmost_identifier);
            if let Some(target) = target {
                let name = node_text(target, source).to_string();
                writes.push(Variable::untyped(name.clone()));

                let operator = node
                    .child_by_field_name("operator")
                    .map(|n| node_text(n, source))
                    .unwrap_or("=");
                let parent_is_access = target
                    .parent()
                    .map(|p| matches!(p.kind(), "array_access" | "field_access"))
                    .unwrap_or(false);
                if operator == "=" && !parent_is_access {
                    if let Some(pos) = reads.iter().rposition(|v| v.name == name) {
                        reads.remove(pos);
                    }
                }
            }
        }
        "identifier" => {
            let excluded_parent = node
                .parent()
                .map(|p| {
                    matches!(
                        p.kind(),
                        "labeled_statement"
                            | "break_statement"
                            | "continue_statement"
                            | "method_declaration"
                            | "class_declaration"
                    )
                })
                .unwrap_or(false);
            if !excluded_parent {
                reads.push(Variable::untyped(node_text(node, source)));
            }
        }
        _ => {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                walk(child, source, writes, reads);
            }
        }
    }
}

fn declarator_writes_reads(
    declarator: AstNode<'_>,
    ty: Option<String>,
    source: &[u8],
    writes: &mut Vec<Variable>,
    reads: &mut Vec<Variable>,
) {
    if let Some(name) = declarator.child_by_field_name("name") {
        writes.push(Variable::typed(node_text(name, source), ty));
    }
    if let Some(value) = declarator.child_by_field_name("value") {
        walk(value, source, writes, reads);
    }
}

/// First identifier reachable from `node` by a pre-order depth-first walk
/// that does not descend into a nested `assignment_expression` (so that
/// `a = (b = c)` yields `a`, not `b`).
fn leftmost_identifier<'a>(node: AstNode<'a>) -> Option<AstNode<'a>> {
    if node.kind() == "identifier" {
        return Some(node);
    }
    if node.kind() == "assignment_expression" {
        return None;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = leftmost_identifier(child) {
            return Some(found);
        }
    }
    None
}

/// The joined text of every leaf token under `node`'s `type` field: a
/// primitive keyword, a bare type name, or — for a generic or union type —
/// each component name in source order, comma-separated.
fn declared_type_text(node: AstNode<'_>, source: &[u8]) -> Option<String> {
    let ty_node = node.child_by_field_name("type")?;
    let mut tokens = Vec::new();
    collect_leaf_texts(ty_node, source, &mut tokens);
    Some(tokens.join(","))
}

fn collect_leaf_texts(node: AstNode<'_>, source: &[u8], out: &mut Vec<String>) {
    let mut cursor = node.walk();
    let named: Vec<_> = node.named_children(&mut cursor).collect();
    if named.is_empty() {
        out.push(node_text(node, source).to_string());
        return;
    }
    for child in named {
        collect_leaf_texts(child, source, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{filter_nodes, parse_java};

    fn first_of<'a>(root: AstNode<'a>, kind: &str) -> AstNode<'a> {
        filter_nodes(Some(root), &[kind]).into_iter().next().unwrap()
    }

    fn extract(src: &str, kind: &str) -> (Vec<Variable>, Vec<Variable>) {
        let tree = parse_java(src).unwrap();
        let root = tree.root_node();
        let target = first_of(root, kind);
        read_write_variables(target, src.as_bytes())
    }

    #[test]
    fn plain_assignment_excludes_target_from_reads() {
        let (writes, reads) =
            extract("class A { void m() { x = 5; } }", "expression_statement");
        assert_eq!(writes, vec![Variable::untyped("x")]);
        assert!(reads.is_empty());
    }

    #[test]
    fn compound_assignment_reads_and_writes_target() {
        let (writes, reads) =
            extract("class A { void m() { x += 1; } }", "expression_statement");
        assert_eq!(writes, vec![Variable::untyped("x")]);
        assert_eq!(reads, vec![Variable::untyped("x")]);
    }

    #[test]
    fn array_store_reads_the_base() {
        let (writes, reads) = extract(
            "class A { void m() { a[i] = 5; } }",
            "expression_statement",
        );
        assert_eq!(writes, vec![Variable::untyped("a")]);
        assert!(reads.iter().any(|v| v.name == "a"));
        assert!(reads.iter().any(|v| v.name == "i"));
    }

    #[test]
    fn local_declaration_reads_the_initializer() {
        let (writes, reads) = extract(
            "class A { void m() { int a = c; } }",
            "local_variable_declaration",
        );
        assert_eq!(writes, vec![Variable::typed("a", Some("int".into()))]);
        assert_eq!(reads, vec![Variable::untyped("c")]);
    }

    #[test]
    fn generic_type_is_comma_joined() {
        let (writes, _) = extract(
            "class A { void m() { T<P> a = new T<P>(); } }",
            "local_variable_declaration",
        );
        assert_eq!(writes[0].ty.as_deref(), Some("T,P"));
    }

    #[test]
    fn update_expression_reads_and_writes() {
        let (writes, reads) = extract("class A { void m() { i++; } }", "expression_statement");
        assert_eq!(writes, vec![Variable::untyped("i")]);
        assert_eq!(reads, vec![Variable::untyped("i")]);
    }

    #[test]
    fn field_access_recurses_into_object_only() {
        let (_, reads) = extract(
            "class A { void m() { this.foo.bar(); } }",
            "expression_statement",
        );
        assert!(reads.iter().any(|v| v.name == "foo"));
        assert!(!reads.iter().any(|v| v.name == "bar"));
    }

    #[test]
    fn enhanced_for_header_is_typed() {
        let (writes, _) = extract(
            "class A { void m() { for (T v : list) {} } }",
            "enhanced_for_statement",
        );
        assert_eq!(writes[0], Variable::typed("v", Some("T".into())));
    }
}

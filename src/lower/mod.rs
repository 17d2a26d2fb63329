//! Recursive lowering of Java statement forms into ADG sub-graphs.
//!
//! Each `lower_*` function takes an AST node, the ADG it contributes to,
//! and an optional syntactic parent id, and returns the `(entry, exit)`
//! pair of the sub-graph it built. This is a direct, mutually recursive
//! descent over the tree-sitter Java grammar; the dispatch in [`lower`]
//! is the single place that maps a node kind to its constructor.

use crate::adg::Adg;
use crate::ast::{filter_nodes, identifier_label, nodes_after_colon, switch_block_label, switch_label, AstNode};
use crate::graph::{NodeId, RelationFlags};
use anyhow::{anyhow, Context, Result};

/// Parse a whole program/method and run the data-dependence pass.
/// Mirrors the reference `parse_from_ast`: lower, wire pending returns at
/// the root, then compute reaching definitions and insert DDG edges.
pub fn parse_from_ast<'a>(root: AstNode<'a>, source: &'a [u8]) -> Result<Adg<'a>> {
    let mut adg = Adg::new(source);
    lower(root, &mut adg, None)?;
    adg.wire_returns()?;
    crate::dataflow::add_data_dependency_layer(&mut adg);
    Ok(adg)
}

pub fn lower<'a>(node: AstNode<'a>, adg: &mut Adg<'a>, parent: Option<NodeId>) -> Result<(NodeId, NodeId)> {
    let source = adg.source();
    match node.kind() {
        "program" | "block" => lower_block(node, adg, parent),
        "class_declaration" => {
            let methods = filter_nodes(Some(node), &["method_declaration"]);
            let first = methods
                .into_iter()
                .next()
                .ok_or_else(|| anyhow!("class_declaration has no method_declaration"))?;
            lower(first, adg, parent)
        }
        "method_declaration" => lower_method_declaration(node, adg, parent),
        "enhanced_for_statement" => lower_enhanced_for(node, adg, parent),
        "for_statement" => lower_for(node, adg, parent),
        "while_statement" => lower_while(node, adg, parent),
        "do_statement" => lower_do_while(node, adg, parent),
        "if_statement" => lower_if(node, adg, parent),
        "switch_expression" => lower_switch(node, adg, parent),
        "continue_statement" => lower_continue(node, adg, parent, source),
        "break_statement" => lower_break(node, adg, parent, source),
        "return_statement" => lower_return(node, adg, parent),
        "try_statement" | "try_with_resources_statement" => lower_try_catch(node, adg, parent),
        "local_variable_declaration" => lower_var_decl(node, adg, parent),
        "labeled_statement" => lower_labeled(node, adg, parent, source),
        _ => lower_default(node, adg, parent, None),
    }
}

fn field<'a>(node: AstNode<'a>, name: &str) -> Result<AstNode<'a>> {
    node.child_by_field_name(name)
        .with_context(|| format!("{} missing required '{}' child", node.kind(), name))
}

/// Chain a sequence of already-lowered sub-graphs: sibling `i`'s exit
/// flows into sibling `i+1`'s entry, and every entry gets a `syntax`
/// edge from `syntax_parent` (if present).
fn combine_cf_linear<'a>(
    pairs: &[(NodeId, NodeId)],
    adg: &mut Adg<'a>,
    syntax_parent: Option<NodeId>,
) -> Result<(NodeId, NodeId)> {
    let mut iter = pairs.iter();
    let &(first_entry, mut last_exit) = iter
        .next()
        .ok_or_else(|| anyhow!("combine_cf_linear called with no sub-graphs"))?;
    if let Some(p) = syntax_parent {
        adg.add_edge(p, first_entry, RelationFlags::SYNTAX);
    }
    for &(entry, exit) in iter {
        if let Some(p) = syntax_parent {
            adg.add_edge(p, entry, RelationFlags::SYNTAX);
        }
        adg.add_edge(last_exit, entry, RelationFlags::CFLOW);
        last_exit = exit;
    }
    Ok((first_entry, last_exit))
}

fn lower_block<'a>(node: AstNode<'a>, adg: &mut Adg<'a>, parent: Option<NodeId>) -> Result<(NodeId, NodeId)> {
    let node_entry = adg.add_ast_node(node);
    let node_exit = adg.add_synthetic_node("block-exit");

    let mut pairs = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if !child.is_named() || matches!(child.kind(), "line_comment" | "block_comment") {
            let syn = adg.add_ast_node(child);
            adg.add_edge(node_entry, syn, RelationFlags::SYNTAX);
        } else {
            pairs.push(lower(child, adg, None)?);
        }
    }

    if pairs.is_empty() {
        return Ok((node_entry, node_entry));
    }

    adg.add_edge(
        node_entry,
        node_exit,
        RelationFlags::SYNTAX | RelationFlags::CDEP | RelationFlags::EXIT,
    );
    if let Some(p) = parent {
        adg.add_edge(p, node_entry, RelationFlags::SYNTAX);
    }
    let (entry, exit) = combine_cf_linear(&pairs, adg, Some(node_entry))?;
    adg.add_edge(node_entry, entry, RelationFlags::SYNTAX | RelationFlags::CFLOW);
    adg.add_edge(exit, node_exit, RelationFlags::CFLOW);
    Ok((node_entry, node_exit))
}

fn lower_method_declaration<'a>(
    node: AstNode<'a>,
    adg: &mut Adg<'a>,
    parent: Option<NodeId>,
) -> Result<(NodeId, NodeId)> {
    let method_entry = adg.add_ast_node(node);
    let method_exit = adg.add_synthetic_node("method_exit");

    let params_node = field(node, "parameters")?;
    let mut cursor = params_node.walk();
    let formal_params: Vec<_> = params_node
        .children(&mut cursor)
        .filter(|n| n.kind() == "formal_parameter")
        .collect();

    let mut pairs = Vec::with_capacity(formal_params.len() + 1);
    for p in formal_params {
        pairs.push(lower(p, adg, None)?);
    }
    pairs.push(lower(field(node, "body")?, adg, None)?);

    let (entry, exit) = combine_cf_linear(&pairs, adg, Some(method_entry))?;
    adg.add_edge(method_entry, entry, RelationFlags::CFLOW);
    adg.add_edge(exit, method_exit, RelationFlags::CFLOW);
    adg.add_edge(
        method_entry,
        method_exit,
        RelationFlags::SYNTAX | RelationFlags::EXIT,
    );
    if let Some(p) = parent {
        adg.add_edge(p, method_entry, RelationFlags::SYNTAX);
    }
    Ok((method_entry, method_exit))
}

fn lower_enhanced_for<'a>(node: AstNode<'a>, adg: &mut Adg<'a>, parent: Option<NodeId>) -> Result<(NodeId, NodeId)> {
    let body = field(node, "body")?;
    if body.kind() == ";" {
        return lower_default(node, adg, parent, Some("for_enhanced"));
    }

    let for_entry = adg.add_named_ast_node(node, "for_enhanced");
    let for_exit = adg.add_synthetic_node("for_exit");
    let (body_entry, body_exit) = lower(body, adg, None)?;

    if let Some(p) = parent {
        adg.add_edge(p, for_entry, RelationFlags::SYNTAX);
    }
    adg.add_edge(
        for_entry,
        body_entry,
        RelationFlags::SYNTAX | RelationFlags::CDEP | RelationFlags::CFLOW,
    );
    adg.add_edge(
        for_entry,
        for_exit,
        RelationFlags::SYNTAX | RelationFlags::CDEP | RelationFlags::CFLOW | RelationFlags::EXIT,
    );
    adg.add_edge(body_exit, for_entry, RelationFlags::CFLOW);

    adg.rewire_continue(for_entry, None);
    adg.rewire_break(for_exit, None);

    Ok((for_entry, for_exit))
}

fn lower_for<'a>(node: AstNode<'a>, adg: &mut Adg<'a>, parent: Option<NodeId>) -> Result<(NodeId, NodeId)> {
    let for_entry = adg.add_named_ast_node(node, "for");
    let node_init = match node.child_by_field_name("init") {
        Some(n) => adg.add_named_ast_node(n, "for_init"),
        None => adg.add_synthetic_node("for_init"),
    };
    let node_condition = match node.child_by_field_name("condition") {
        Some(n) => adg.add_named_ast_node(n, "for_condition"),
        None => adg.add_synthetic_node("for_condition"),
    };
    let (body_entry, body_exit) = lower(field(node, "body")?, adg, None)?;
    let node_update = match node.child_by_field_name("update") {
        Some(n) => adg.add_named_ast_node(n, "for_update"),
        None => adg.add_synthetic_node("for_update"),
    };
    let for_exit = adg.add_synthetic_node("for_exit");

    if let Some(p) = parent {
        adg.add_edge(p, for_entry, RelationFlags::SYNTAX);
    }
    adg.add_edge(
        for_entry,
        node_init,
        RelationFlags::SYNTAX | RelationFlags::CFLOW | RelationFlags::CDEP,
    );
    adg.add_edge(
        for_entry,
        node_condition,
        RelationFlags::SYNTAX | RelationFlags::CDEP,
    );
    adg.add_edge(for_entry, body_entry, RelationFlags::SYNTAX);
    adg.add_edge(for_entry, node_update, RelationFlags::SYNTAX);
    adg.add_edge(
        for_entry,
        for_exit,
        RelationFlags::SYNTAX | RelationFlags::CDEP | RelationFlags::EXIT,
    );
    adg.add_edge(node_init, node_condition, RelationFlags::CFLOW);
    adg.add_edge(node_condition, body_entry, RelationFlags::CFLOW | RelationFlags::CDEP);
    adg.add_edge(body_exit, node_update, RelationFlags::CFLOW);
    adg.add_edge(node_update, node_condition, RelationFlags::CFLOW | RelationFlags::BACK);
    adg.add_edge(node_condition, for_exit, RelationFlags::CFLOW);

    adg.rewire_continue(node_update, None);
    adg.rewire_break(for_exit, None);

    Ok((for_entry, for_exit))
}

fn lower_while<'a>(node: AstNode<'a>, adg: &mut Adg<'a>, parent: Option<NodeId>) -> Result<(NodeId, NodeId)> {
    let while_entry = adg.add_named_ast_node(node, "while");
    let condition = adg.add_named_ast_node(field(node, "condition")?, "while_condition");
    let (body_entry, body_exit) = lower(field(node, "body")?, adg, None)?;
    let while_exit = adg.add_synthetic_node("while_exit");

    if let Some(p) = parent {
        adg.add_edge(p, while_entry, RelationFlags::SYNTAX);
    }
    adg.add_edge(
        while_entry,
        condition,
        RelationFlags::SYNTAX | RelationFlags::CDEP | RelationFlags::CFLOW,
    );
    adg.add_edge(while_entry, body_entry, RelationFlags::SYNTAX);
    adg.add_edge(
        while_entry,
        while_exit,
        RelationFlags::SYNTAX | RelationFlags::CDEP | RelationFlags::EXIT,
    );
    adg.add_edge(condition, body_entry, RelationFlags::CFLOW | RelationFlags::CDEP);
    adg.add_edge(condition, while_exit, RelationFlags::CFLOW);
    adg.add_edge(condition, condition, RelationFlags::CDEP);
    adg.add_edge(body_exit, condition, RelationFlags::CFLOW);

    adg.rewire_continue(condition, None);
    adg.rewire_break(while_exit, None);

    Ok((while_entry, while_exit))
}

fn lower_do_while<'a>(node: AstNode<'a>, adg: &mut Adg<'a>, parent: Option<NodeId>) -> Result<(NodeId, NodeId)> {
    let while_entry = adg.add_named_ast_node(node, "do_while");
    let condition = adg.add_named_ast_node(field(node, "condition")?, "do_condition");
    let (body_entry, body_exit) = lower(field(node, "body")?, adg, None)?;
    let while_exit = adg.add_synthetic_node("do_while_exit");

    if let Some(p) = parent {
        adg.add_edge(p, while_entry, RelationFlags::SYNTAX);
    }
    adg.add_edge(while_entry, condition, RelationFlags::SYNTAX | RelationFlags::CDEP);
    adg.add_edge(
        while_entry,
        body_entry,
        RelationFlags::SYNTAX | RelationFlags::CFLOW | RelationFlags::CDEP,
    );
    adg.add_edge(
        while_entry,
        while_exit,
        RelationFlags::SYNTAX | RelationFlags::CDEP | RelationFlags::EXIT,
    );
    adg.add_edge(condition, body_entry, RelationFlags::CFLOW | RelationFlags::CDEP);
    adg.add_edge(condition, while_exit, RelationFlags::CFLOW);
    adg.add_edge(condition, condition, RelationFlags::CDEP);
    adg.add_edge(body_exit, condition, RelationFlags::CFLOW);

    adg.rewire_continue(condition, None);
    adg.rewire_break(while_exit, None);

    Ok((while_entry, while_exit))
}

fn lower_if<'a>(node: AstNode<'a>, adg: &mut Adg<'a>, parent: Option<NodeId>) -> Result<(NodeId, NodeId)> {
    let if_entry = adg.add_named_ast_node(node, "if");
    let condition = adg.add_named_ast_node(field(node, "condition")?, "if_condition");
    let (body_entry, body_exit) = lower(field(node, "consequence")?, adg, None)?;
    let if_exit = adg.add_synthetic_node("if_exit");

    if let Some(p) = parent {
        adg.add_edge(p, if_entry, RelationFlags::SYNTAX);
    }
    adg.add_edge(
        if_entry,
        condition,
        RelationFlags::SYNTAX | RelationFlags::CFLOW | RelationFlags::CDEP,
    );
    adg.add_edge(if_entry, body_entry, RelationFlags::SYNTAX);
    adg.add_edge(condition, body_entry, RelationFlags::CFLOW | RelationFlags::CDEP);
    adg.add_edge(
        if_entry,
        if_exit,
        RelationFlags::SYNTAX | RelationFlags::CDEP | RelationFlags::EXIT,
    );
    adg.add_edge(body_exit, if_exit, RelationFlags::CFLOW);

    if let Some(alt) = node.child_by_field_name("alternative") {
        let (else_entry, else_exit) = lower(alt, adg, None)?;
        adg.add_edge(if_entry, else_entry, RelationFlags::SYNTAX);
        adg.add_edge(condition, else_entry, RelationFlags::CFLOW | RelationFlags::CDEP);
        adg.add_edge(else_exit, if_exit, RelationFlags::CFLOW);
    } else {
        adg.add_edge(condition, if_exit, RelationFlags::CFLOW);
    }

    Ok((if_entry, if_exit))
}

fn lower_switch<'a>(node: AstNode<'a>, adg: &mut Adg<'a>, parent: Option<NodeId>) -> Result<(NodeId, NodeId)> {
    let switch_entry = adg.add_named_ast_node(node, "switch");
    let switch_exit = adg.add_synthetic_node("switch_exit");
    let condition = adg.add_named_ast_node(field(node, "condition")?, "switch_condition");

    let body = field(node, "body")?;
    let mut cursor = body.walk();
    for child in body.children(&mut cursor) {
        if !child.is_named() || matches!(child.kind(), "line_comment" | "block_comment") {
            let syn = adg.add_ast_node(child);
            adg.add_edge(switch_entry, syn, RelationFlags::SYNTAX);
        }
    }

    let mut cursor = body.walk();
    let groups: Vec<_> = body
        .children(&mut cursor)
        .filter(|n| n.kind() == "switch_block_statement_group")
        .collect();

    // Case arms first, then default arms -- matches the reference
    // implementation's (surprising) grouping, not source order.
    let mut arms = Vec::with_capacity(groups.len());
    for g in groups.iter().filter(|g| switch_block_label(**g) == "case") {
        arms.push(lower_switch_case_group(*g, adg)?);
    }
    for g in groups.iter().filter(|g| switch_block_label(**g) == "default") {
        arms.push(lower_switch_default_group(*g, adg)?);
    }

    let (block_entry, block_exit) = combine_cf_linear(&arms, adg, Some(switch_entry))?;
    adg.add_edge(switch_entry, condition, RelationFlags::SYNTAX | RelationFlags::CFLOW);
    adg.add_edge(condition, block_entry, RelationFlags::CFLOW);
    adg.add_edge(block_exit, switch_exit, RelationFlags::CFLOW);
    adg.add_edge(switch_entry, switch_exit, RelationFlags::SYNTAX | RelationFlags::EXIT);
    if let Some(p) = parent {
        adg.add_edge(p, switch_entry, RelationFlags::SYNTAX);
    }
    Ok((switch_entry, switch_exit))
}

fn lower_switch_block_group_body<'a>(
    node: AstNode<'a>,
    adg: &mut Adg<'a>,
    syntax_parent: NodeId,
) -> Result<(NodeId, NodeId)> {
    let mut pairs = Vec::new();
    for stmt in nodes_after_colon(node) {
        pairs.push(lower(stmt, adg, None)?);
    }
    if pairs.is_empty() {
        let n = adg.add_synthetic_node("empty-case");
        return Ok((n, n));
    }
    combine_cf_linear(&pairs, adg, Some(syntax_parent))
}

fn lower_switch_case_group<'a>(node: AstNode<'a>, adg: &mut Adg<'a>) -> Result<(NodeId, NodeId)> {
    let node_entry = adg.add_named_ast_node(node, "switch_case");
    let node_exit = adg.add_synthetic_node("switch_case_exit");
    let condition = adg.add_named_ast_node(switch_label(node), "case_condition");
    let (case_entry, case_exit) = lower_switch_block_group_body(node, adg, node_entry)?;

    adg.add_edge(node_entry, condition, RelationFlags::CFLOW);
    adg.add_edge(condition, case_entry, RelationFlags::CFLOW);
    adg.add_edge(case_exit, node_exit, RelationFlags::CFLOW);
    adg.add_edge(condition, node_exit, RelationFlags::CFLOW);
    adg.add_edge(node_entry, condition, RelationFlags::SYNTAX);
    adg.add_edge(node_entry, node_exit, RelationFlags::SYNTAX | RelationFlags::EXIT);
    adg.rewire_break(node_exit, None);

    Ok((node_entry, node_exit))
}

fn lower_switch_default_group<'a>(node: AstNode<'a>, adg: &mut Adg<'a>) -> Result<(NodeId, NodeId)> {
    let node_entry = adg.add_named_ast_node(node, "switch_default");
    let node_exit = adg.add_synthetic_node("switch_default_exit");
    let (case_entry, case_exit) = lower_switch_block_group_body(node, adg, node_entry)?;

    adg.add_edge(node_entry, node_exit, RelationFlags::SYNTAX | RelationFlags::EXIT);
    adg.add_edge(node_entry, case_entry, RelationFlags::CFLOW);
    adg.add_edge(case_exit, node_exit, RelationFlags::CFLOW);
    adg.rewire_break(node_exit, None);

    Ok((node_entry, node_exit))
}

fn find_continue_target(adg: &Adg, entry: NodeId, ast_node_kind: &str) -> Option<NodeId> {
    let wanted = match ast_node_kind {
        "for_statement" => "for_update",
        "while_statement" => "while_condition",
        "do_statement" => "do_condition",
        "enhanced_for_statement" => return Some(entry),
        _ => return None,
    };
    adg.successors(entry)
        .into_iter()
        .find(|&s| adg.node(s).name == Some(wanted))
}

fn lower_labeled<'a>(
    node: AstNode<'a>,
    adg: &mut Adg<'a>,
    parent: Option<NodeId>,
    source: &[u8],
) -> Result<(NodeId, NodeId)> {
    let label = identifier_label(node, source);
    let inner = nodes_after_colon(node)
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("labeled_statement has no body after ':'"))?;
    let (entry, exit) = lower(inner, adg, parent)?;

    if let Some(target) = find_continue_target(adg, entry, inner.kind()) {
        adg.rewire_continue(target, label.as_deref());
    }
    adg.rewire_break(exit, label.as_deref());

    Ok((entry, exit))
}

fn lower_continue<'a>(
    node: AstNode<'a>,
    adg: &mut Adg<'a>,
    parent: Option<NodeId>,
    source: &[u8],
) -> Result<(NodeId, NodeId)> {
    let label = identifier_label(node, source);
    let id = adg.add_ast_node(node);
    adg.push_continue(id, label);
    if let Some(p) = parent {
        adg.add_edge(p, id, RelationFlags::SYNTAX);
    }
    Ok((id, id))
}

fn lower_break<'a>(
    node: AstNode<'a>,
    adg: &mut Adg<'a>,
    parent: Option<NodeId>,
    source: &[u8],
) -> Result<(NodeId, NodeId)> {
    let label = identifier_label(node, source);
    let id = adg.add_ast_node(node);
    adg.push_break(id, label);
    if let Some(p) = parent {
        adg.add_edge(p, id, RelationFlags::SYNTAX);
    }
    Ok((id, id))
}

fn lower_return<'a>(node: AstNode<'a>, adg: &mut Adg<'a>, parent: Option<NodeId>) -> Result<(NodeId, NodeId)> {
    let id = adg.add_named_ast_node(node, "return");
    adg.push_return(id);
    if let Some(p) = parent {
        adg.add_edge(p, id, RelationFlags::SYNTAX);
    }
    Ok((id, id))
}

fn lower_try_block<'a>(node: AstNode<'a>, adg: &mut Adg<'a>, syntax_parent: NodeId) -> Result<(NodeId, NodeId)> {
    let resources = node
        .child_by_field_name("resources")
        .map(|r| filter_nodes(Some(r), &["resource"]))
        .unwrap_or_default();
    let body = field(node, "body")?;

    if resources.is_empty() {
        return lower(body, adg, Some(syntax_parent));
    }

    let mut pairs = Vec::with_capacity(resources.len());
    for r in resources {
        pairs.push(lower(r, adg, None)?);
    }
    let (resources_entry, resources_exit) = combine_cf_linear(&pairs, adg, Some(syntax_parent))?;
    let (try_entry, try_exit) = lower(body, adg, Some(syntax_parent))?;
    adg.add_edge(resources_exit, try_entry, RelationFlags::CFLOW);
    Ok((resources_entry, try_exit))
}

fn lower_finally_block<'a>(
    node: AstNode<'a>,
    adg: &mut Adg<'a>,
    syntax_parent: NodeId,
) -> Result<Option<(NodeId, NodeId)>> {
    let mut cursor = node.walk();
    let Some(clause) = node.children(&mut cursor).find(|n| n.kind() == "finally_clause") else {
        return Ok(None);
    };
    let mut cursor = clause.walk();
    let body = clause
        .children(&mut cursor)
        .find(|n| n.kind() == "block")
        .ok_or_else(|| anyhow!("finally_clause missing block"))?;
    Ok(Some(lower(body, adg, Some(syntax_parent))?))
}

fn lower_single_catch_block<'a>(node: AstNode<'a>, adg: &mut Adg<'a>) -> Result<(NodeId, NodeId)> {
    let case_entry = adg.add_named_ast_node(node, "catch-block");
    let param = filter_nodes(Some(node), &["catch_formal_parameter"])
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("catch_clause missing catch_formal_parameter"))?;
    let body = field(node, "body")?;

    let pairs = [lower(param, adg, None)?, lower(body, adg, None)?];
    let (entry, exit) = combine_cf_linear(&pairs, adg, Some(case_entry))?;
    adg.add_edge(case_entry, entry, RelationFlags::CFLOW);
    adg.add_edge(entry, exit, RelationFlags::CFLOW);
    Ok((case_entry, exit))
}

fn lower_many_catch_blocks<'a>(
    node: AstNode<'a>,
    adg: &mut Adg<'a>,
    syntax_parent: NodeId,
) -> Result<Option<(NodeId, NodeId)>> {
    let mut cursor = node.walk();
    let catch_nodes: Vec<_> = node.children(&mut cursor).filter(|n| n.kind() == "catch_clause").collect();
    if catch_nodes.is_empty() {
        return Ok(None);
    }
    let mut pairs = Vec::with_capacity(catch_nodes.len());
    for c in catch_nodes {
        pairs.push(lower_single_catch_block(c, adg)?);
    }
    Ok(Some(combine_cf_linear(&pairs, adg, Some(syntax_parent))?))
}

fn lower_try_catch<'a>(node: AstNode<'a>, adg: &mut Adg<'a>, parent: Option<NodeId>) -> Result<(NodeId, NodeId)> {
    let try_catch_node = adg.add_named_ast_node(node, "try_catch");
    let (try_entry, try_exit) = lower_try_block(node, adg, try_catch_node)?;
    let finally = lower_finally_block(node, adg, try_catch_node)?;
    let catches = lower_many_catch_blocks(node, adg, try_catch_node)?;

    adg.add_edge(try_catch_node, try_entry, RelationFlags::CFLOW);
    if let Some(p) = parent {
        adg.add_edge(p, try_catch_node, RelationFlags::SYNTAX);
    }

    let exit = match (catches, finally) {
        (None, None) => try_exit,
        (Some((catches_entry, catches_exit)), None) => {
            adg.add_edge(try_entry, catches_entry, RelationFlags::CFLOW);
            adg.add_edge(try_exit, catches_entry, RelationFlags::CFLOW);
            catches_exit
        }
        (None, Some((final_entry, final_exit))) => {
            adg.add_edge(try_exit, final_entry, RelationFlags::CFLOW);
            final_exit
        }
        (Some((catches_entry, catches_exit)), Some((final_entry, final_exit))) => {
            adg.add_edge(try_entry, catches_entry, RelationFlags::CFLOW);
            adg.add_edge(try_exit, catches_entry, RelationFlags::CFLOW);
            adg.add_edge(try_entry, final_entry, RelationFlags::CFLOW);
            adg.add_edge(catches_exit, final_entry, RelationFlags::CFLOW);
            final_exit
        }
    };

    Ok((try_catch_node, exit))
}

fn lower_var_decl<'a>(node: AstNode<'a>, adg: &mut Adg<'a>, parent: Option<NodeId>) -> Result<(NodeId, NodeId)> {
    let id = adg.add_ast_node(node);
    adg.mark_var_decl(id);
    if let Some(p) = parent {
        adg.add_edge(p, id, RelationFlags::SYNTAX);
    }
    Ok((id, id))
}

fn lower_default<'a>(
    node: AstNode<'a>,
    adg: &mut Adg<'a>,
    parent: Option<NodeId>,
    name: Option<&'static str>,
) -> Result<(NodeId, NodeId)> {
    let id = match name {
        Some(n) => adg.add_named_ast_node(node, n),
        None => adg.add_ast_node(node),
    };
    if let Some(p) = parent {
        adg.add_edge(p, id, RelationFlags::SYNTAX);
    }
    Ok((id, id))
}

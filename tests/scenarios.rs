//! End-to-end scenarios exercising the full `parse -> lower -> dataflow`
//! pipeline against real (small) Java methods.

use java_adg::{ast, cfg, lower};

fn build(source: &str) -> (tree_sitter::Tree, String) {
    let tree = ast::parse_java(source).expect("parses");
    (tree, source.to_string())
}

/// S1 -- simple for loop: the condition is a branch point with two
/// successors (into the body, and out to the loop exit), and the loop
/// body flows back into the condition via the update.
#[test]
fn s1_simple_for_loop_has_one_natural_loop() {
    let (tree, source) = build("class C { void m() { for (int i = 0; i < 10; i++) { a = 9; } } }");
    let adg = lower::parse_from_ast(tree.root_node(), source.as_bytes()).unwrap();
    let cfg_proj = adg.to_cfg();

    let loops = cfg::detect_natural_loops(&cfg_proj);
    assert_eq!(loops.len(), 1, "a single for loop is exactly one natural loop");
    assert!(cfg::find_unreachable(&cfg_proj).is_empty());
}

/// S2 -- for loop with an unconditional `break`: the statement
/// following the break is unreachable in the CFG projection even
/// though it still exists as an ADG node.
#[test]
fn s2_code_after_break_is_unreachable() {
    let source = "class C { void m() { for (;;) { foo(); break; bar(); } } }";
    let (tree, src) = build(source);
    let adg = lower::parse_from_ast(tree.root_node(), src.as_bytes()).unwrap();
    let cfg_proj = adg.to_cfg();

    let unreachable = cfg::find_unreachable(&cfg_proj);
    assert!(!unreachable.is_empty(), "the statement after `break` must be unreachable");
}

/// S3 -- labeled nested loops: `break label` in the inner loop must
/// rewire to the outer loop's exit, not the inner one's, so the outer
/// exit has at least two incoming cflow edges.
#[test]
fn s3_labeled_break_targets_the_outer_loop_exit() {
    let source = "class C { void m() { outer: for (;;) { for (;;) { break outer; } } } }";
    let (tree, src) = build(source);
    let adg = lower::parse_from_ast(tree.root_node(), src.as_bytes()).unwrap();
    let cfg_proj = adg.to_cfg();

    // Exactly one exit node for the whole method; the outer loop's exit
    // must have at least two predecessors: the outer condition falling
    // through, and the inner labeled break.
    let exit = adg.exit_node().unwrap();
    assert!(cfg_proj.contains(exit));

    let has_merge_from_break = cfg_proj.node_ids().any(|id| cfg_proj.predecessors(id).len() >= 2);
    assert!(has_merge_from_break, "expected the outer loop's exit to merge two incoming cflow edges");
}

/// S4 -- read-after-write produces exactly one ddep edge.
#[test]
fn s4_read_after_write_gets_a_ddep_edge() {
    let source = "class C { void m() { int a = 0; int b = a; } }";
    let (tree, src) = build(source);
    let adg = lower::parse_from_ast(tree.root_node(), src.as_bytes()).unwrap();
    let ddg = adg.to_ddg();
    assert_eq!(ddg.edge_count(), 1);
}

/// S5 -- a multi-variable declaration fuses into a single ddep edge
/// carrying both variable names.
#[test]
fn s5_multi_variable_declaration_fuses_into_one_edge() {
    let source = "class C { void m() { int a = 0, b = 0; int c = a + b; } }";
    let (tree, src) = build(source);
    let adg = lower::parse_from_ast(tree.root_node(), src.as_bytes()).unwrap();

    let mut ddep_edges: Vec<_> = adg
        .edges()
        .filter(|(_, _, data)| data.flags.contains(java_adg::graph::RelationFlags::DDEP))
        .collect();
    assert_eq!(ddep_edges.len(), 1, "both writes must fuse into a single edge");
    let (_, _, data) = ddep_edges.remove(0);
    let mut vars: Vec<_> = data.vars.iter().cloned().collect();
    vars.sort();
    assert_eq!(vars, vec!["a".to_string(), "b".to_string()]);
}

/// S6 -- a declaration with no initializer and no subsequent read
/// produces no ddep edges at all.
#[test]
fn s6_declaration_without_read_has_no_ddep_edge() {
    let source = "class C { void m() { int a; a = 1; } }";
    let (tree, src) = build(source);
    let adg = lower::parse_from_ast(tree.root_node(), src.as_bytes()).unwrap();
    let ddg = adg.to_ddg();
    assert_eq!(ddg.edge_count(), 0);
}

/// S7 -- switch fall-through with break: case 1 falls through to its
/// own exit via `break`, case 2 (no break) falls through to the
/// default chain; the switch still has exactly one overall exit.
#[test]
fn s7_switch_fallthrough_with_break_still_has_a_unique_exit() {
    let source = "class C { void m() { switch (x) { case 1: a = 1; break; case 2: a = 2; } } }";
    let (tree, src) = build(source);
    let adg = lower::parse_from_ast(tree.root_node(), src.as_bytes()).unwrap();
    // exit_node() itself asserts uniqueness; a panic here is a failing test.
    let _ = adg.exit_node().unwrap();
}

/// General invariant: the CFG projection always has exactly one node
/// with no outgoing cflow edges reachable from the method entry.
#[test]
fn every_reachable_node_leads_eventually_to_the_unique_exit() {
    let source = "class C { void m() { if (x) { a = 1; } else { a = 2; } b = a; } }";
    let (tree, src) = build(source);
    let adg = lower::parse_from_ast(tree.root_node(), src.as_bytes()).unwrap();
    let cfg_proj = adg.to_cfg();

    let reachable = cfg::find_reachable(&cfg_proj);
    assert!(!reachable.is_empty());
    let exit = adg.exit_node().unwrap();
    assert!(cfg_proj.contains(exit), "the unique exit node must appear in the cflow projection");
}

/// General invariant: projecting twice yields the same edge and node
/// counts as projecting once (idempotence of the projection operation).
#[test]
fn projection_is_idempotent() {
    let source = "class C { void m() { for (int i = 0; i < 10; i++) { a = a + i; } } }";
    let (tree, src) = build(source);
    let adg = lower::parse_from_ast(tree.root_node(), src.as_bytes()).unwrap();

    let first = adg.to_cfg();
    let second = adg.to_cfg();
    assert_eq!(first.node_count(), second.node_count());
    assert_eq!(first.edge_count(), second.edge_count());
}

/// General invariant: after a complete method is lowered, there is no
/// leftover pending continue/break/return -- every jump has a cflow
/// successor, including `continue`/`break`/`return` nodes themselves.
#[test]
fn every_jump_node_has_been_rewired_to_a_successor() {
    let source = "class C { void m() { for (int i = 0; i < 10; i++) { if (i == 5) { continue; } if (i == 9) { break; } if (i == 1) { return; } } } }";
    let (tree, src) = build(source);
    let adg = lower::parse_from_ast(tree.root_node(), src.as_bytes()).unwrap();

    for id in adg.node_ids() {
        if let Some(ast_node) = adg.node(id).ast_node() {
            if matches!(ast_node.kind(), "continue_statement" | "break_statement" | "return_statement") {
                assert!(
                    !adg.successors(id).is_empty(),
                    "jump node {id} ({}) was never rewired",
                    ast_node.kind()
                );
            }
        }
    }
}

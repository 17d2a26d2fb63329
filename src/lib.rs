//! java-adg: builds an Any-Dependency Graph from Java source.
//!
//! A single directed multigraph over one method's AST carries four
//! relations at once — `syntax` (AST-child), `cflow` (control-flow),
//! `cdep` (control-dependence) and `ddep` (data-dependence) — rather
//! than four separate graphs. [`adg::Adg`] is the graph itself;
//! [`lower`] builds one from a parsed method, [`vars`] extracts the
//! read/write variable sets the data-dependence pass needs, and
//! [`dataflow`] runs the reaching-definitions fixpoint that inserts the
//! `ddep` edges. [`cfg`] layers dominance, loop and reachability
//! analytics on top of the `cflow` projection.

pub mod adg;
pub mod ast;
pub mod cfg;
pub mod dataflow;
pub mod graph;
pub mod lower;
pub mod output;
pub mod vars;

use anyhow::Result;

/// Parse `source` as a Java compilation unit and build its Any-Dependency
/// Graph, handing it to `f` for the duration of the call.
///
/// A callback is needed rather than returning the graph directly: [`adg::Adg`]
/// borrows from the [`tree_sitter::Tree`] this function parses, and that tree
/// has nowhere to live once the function returns. Callers that need the tree
/// and source to outlive a single call (the CLI, tests) should call
/// [`ast::parse_java`] and [`lower::parse_from_ast`] directly instead.
pub fn analyze<R>(source: &str, f: impl FnOnce(&adg::Adg<'_>) -> R) -> Result<R> {
    let tree = ast::parse_java(source)?;
    let adg = lower::parse_from_ast(tree.root_node(), source.as_bytes())?;
    Ok(f(&adg))
}

//! CFG analytics layered on top of the control-flow projection of the ADG.
//!
//! Everything here takes a [`crate::adg::Projection`] as produced by
//! [`crate::adg::Adg::to_cfg`]: a plain `petgraph` digraph whose node
//! weights are [`crate::graph::NodeId`]s. The structural `cflow`/`cdep`
//! edges the lowering pass inserts directly are the graph's ground
//! truth; dominance, loops, reachability and export are ordinary graph
//! algorithms applied to that projection, kept around as enrichment for
//! anything that wants a semantic (post-dominator-based) view of
//! control dependence alongside the structural one.

pub mod analysis;
pub mod dominators;
pub mod export;
pub mod loops;
pub mod post_dominators;
pub mod reachability;

pub use analysis::{find_entry, find_exits, in_degree, is_branch_point, is_exit, is_merge_point, out_degree};
pub use dominators::{compute_dominator_tree, DominatorTree};
pub use export::{build_export, export_dot, export_json};
pub use loops::{detect_natural_loops, find_loop_headers, NaturalLoop};
pub use post_dominators::{compute_post_dominator_tree, PostDominatorTree};
pub use reachability::{find_reachable, find_unreachable};

//! Directed multi-attributed graph store underlying the ADG.
//!
//! Nodes are kept in a dense, monotonically-growing [`petgraph::graph::DiGraph`];
//! the public [`NodeId`] numbering is 1-based and never reused, matching the
//! node-identity invariant of the ADG. Edges carry a [`RelationFlags`] bitset
//! plus, for data-dependence edges, the set of variable names that justify them.

mod flags;

pub use flags::RelationFlags;

use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::HashSet;

pub type NodeId = usize;

fn to_index(id: NodeId) -> NodeIndex {
    NodeIndex::new(id - 1)
}

fn from_index(idx: NodeIndex) -> NodeId {
    idx.index() + 1
}

/// Attributes carried by an ADG edge.
#[derive(Debug, Clone, Default)]
pub struct EdgeData {
    pub flags: RelationFlags,
    pub vars: HashSet<String>,
}

impl EdgeData {
    fn merge_flags(&mut self, flags: RelationFlags) {
        self.flags |= flags;
    }
}

/// Generic directed multigraph with unioning edge attributes.
///
/// This is the graph store described by the ADG design: dense integer ids,
/// idempotent edge insertion (attributes union rather than duplicate), and
/// the handful of structural queries the lowering and data-dependence passes
/// need (predecessors/successors, degree, isolates, edge removal).
#[derive(Debug, Clone)]
pub struct Graph<N> {
    inner: DiGraph<N, EdgeData>,
}

impl<N> Graph<N> {
    pub fn new() -> Self {
        Self {
            inner: DiGraph::new(),
        }
    }

    pub fn add_node(&mut self, data: N) -> NodeId {
        from_index(self.inner.add_node(data))
    }

    pub fn node(&self, id: NodeId) -> &N {
        &self.inner[to_index(id)]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut N {
        &mut self.inner[to_index(id)]
    }

    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.inner.node_indices().map(from_index)
    }

    /// Idempotent edge insertion: if `(from, to)` already has an edge, the
    /// given flags are unioned into the existing attributes.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, flags: RelationFlags) {
        let (a, b) = (to_index(from), to_index(to));
        match self.inner.find_edge(a, b) {
            Some(e) => self.inner[e].merge_flags(flags),
            None => {
                self.inner.add_edge(
                    a,
                    b,
                    EdgeData {
                        flags,
                        vars: HashSet::new(),
                    },
                );
            }
        }
    }

    /// Add or extend a data-dependence edge, unioning `var` into its `vars` set.
    pub fn add_ddep_edge(&mut self, from: NodeId, to: NodeId, var: &str) {
        let (a, b) = (to_index(from), to_index(to));
        match self.inner.find_edge(a, b) {
            Some(e) => {
                let data = &mut self.inner[e];
                data.flags |= RelationFlags::DDEP;
                data.vars.insert(var.to_string());
            }
            None => {
                let mut vars = HashSet::new();
                vars.insert(var.to_string());
                self.inner.add_edge(
                    a,
                    b,
                    EdgeData {
                        flags: RelationFlags::DDEP,
                        vars,
                    },
                );
            }
        }
    }

    pub fn edge_data(&self, from: NodeId, to: NodeId) -> Option<&EdgeData> {
        self.inner
            .find_edge(to_index(from), to_index(to))
            .map(|e| &self.inner[e])
    }

    pub fn predecessors(&self, id: NodeId) -> Vec<NodeId> {
        self.inner
            .neighbors_directed(to_index(id), Direction::Incoming)
            .map(from_index)
            .collect()
    }

    pub fn successors(&self, id: NodeId) -> Vec<NodeId> {
        self.inner
            .neighbors_directed(to_index(id), Direction::Outgoing)
            .map(from_index)
            .collect()
    }

    pub fn in_degree(&self, id: NodeId) -> usize {
        self.inner
            .neighbors_directed(to_index(id), Direction::Incoming)
            .count()
    }

    pub fn out_degree(&self, id: NodeId) -> usize {
        self.inner
            .neighbors_directed(to_index(id), Direction::Outgoing)
            .count()
    }

    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId, &EdgeData)> + '_ {
        self.inner.edge_indices().map(move |e| {
            let (a, b) = self.inner.edge_endpoints(e).unwrap();
            (from_index(a), from_index(b), &self.inner[e])
        })
    }

    /// Remove every out-edge of `id` whose flags contain `flags` entirely.
    pub fn remove_out_edges_with(&mut self, id: NodeId, flags: RelationFlags) {
        let a = to_index(id);
        let doomed: Vec<EdgeIndex> = self
            .inner
            .edges_directed(a, Direction::Outgoing)
            .filter(|e| e.weight().flags.contains(flags))
            .map(|e| e.id())
            .collect();
        for e in doomed {
            self.inner.remove_edge(e);
        }
    }

    /// Nodes with neither predecessors nor successors.
    pub fn isolates(&self) -> Vec<NodeId> {
        self.inner
            .node_indices()
            .filter(|&n| {
                self.inner
                    .neighbors_directed(n, Direction::Incoming)
                    .count()
                    == 0
                    && self
                        .inner
                        .neighbors_directed(n, Direction::Outgoing)
                        .count()
                        == 0
            })
            .map(from_index)
            .collect()
    }
}

impl<N> Default for Graph<N> {
    fn default() -> Self {
        Self::new()
    }
}

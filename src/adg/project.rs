//! Single-relation projections of the ADG: a view containing only the
//! edges that carry a given [`RelationFlags`] bit, with isolated nodes
//! dropped. This is how the CFG, CDG, DDG and AST views are derived from
//! the one underlying multi-relation graph.

use crate::graph::{Graph, NodeId, RelationFlags};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// A single-relation view: `petgraph`-backed so the CFG analytics in
/// [`crate::cfg`] and the reaching-definitions fixpoint in
/// [`crate::dataflow`] can use its algorithms directly. Node weights are
/// the original [`NodeId`]s, so results map straight back onto the ADG.
#[derive(Debug, Clone)]
pub struct Projection {
    pub(crate) graph: DiGraph<NodeId, ()>,
    pub(crate) index_of: HashMap<NodeId, NodeIndex>,
}

impl Projection {
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.node_indices().map(|ix| self.graph[ix])
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index_of.contains_key(&id)
    }

    pub fn successors(&self, id: NodeId) -> Vec<NodeId> {
        match self.index_of.get(&id) {
            Some(&ix) => self
                .graph
                .neighbors_directed(ix, petgraph::Direction::Outgoing)
                .map(|n| self.graph[n])
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn predecessors(&self, id: NodeId) -> Vec<NodeId> {
        match self.index_of.get(&id) {
            Some(&ix) => self
                .graph
                .neighbors_directed(ix, petgraph::Direction::Incoming)
                .map(|n| self.graph[n])
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn index(&self) -> &DiGraph<NodeId, ()> {
        &self.graph
    }

    pub fn index_of(&self, id: NodeId) -> Option<NodeIndex> {
        self.index_of.get(&id).copied()
    }

    pub fn id_of(&self, ix: NodeIndex) -> NodeId {
        self.graph[ix]
    }
}

pub(crate) fn project<N>(source: &Graph<N>, flag: RelationFlags) -> Projection {
    let matched: Vec<(NodeId, NodeId)> = source
        .edges()
        .filter(|(_, _, data)| data.flags.contains(flag))
        .map(|(a, b, _)| (a, b))
        .collect();

    let mut touched: Vec<NodeId> = Vec::new();
    for &(a, b) in &matched {
        if !touched.contains(&a) {
            touched.push(a);
        }
        if !touched.contains(&b) {
            touched.push(b);
        }
    }
    touched.sort_unstable();

    let mut graph = DiGraph::new();
    let mut index_of = HashMap::with_capacity(touched.len());
    for id in touched {
        let ix = graph.add_node(id);
        index_of.insert(id, ix);
    }
    for (a, b) in matched {
        graph.add_edge(index_of[&a], index_of[&b], ());
    }

    Projection { graph, index_of }
}

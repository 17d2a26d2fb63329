//! Relation-flag bitset carried by every ADG edge.
//!
//! An ADG edge is not single-purpose: the same pair of nodes can be
//! connected for several reasons at once (e.g. a `for` condition is both
//! a `syntax` child of the loop and a `cflow`/`cdep` source for the body).
//! Rather than maintaining four parallel graphs we keep one graph whose
//! edges carry a bitset of which relations they participate in.

use serde::{Deserialize, Serialize};

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
    pub struct RelationFlags: u8 {
        /// AST-child relation.
        const SYNTAX = 0b0000_0001;
        /// Control-flow relation (the CFG projection).
        const CFLOW  = 0b0000_0010;
        /// Control-dependence relation (the CDG projection).
        const CDEP   = 0b0000_0100;
        /// Data-dependence relation (the DDG projection).
        const DDEP   = 0b0000_1000;
        /// Marks the `syntax` edge from a construct's entry straight to its exit.
        const EXIT   = 0b0001_0000;
        /// Marks a loop back-edge.
        const BACK   = 0b0010_0000;
    }
}

impl RelationFlags {
    pub fn label(&self) -> String {
        let mut parts = Vec::new();
        if self.contains(Self::SYNTAX) {
            parts.push("syntax");
        }
        if self.contains(Self::CFLOW) {
            parts.push("control-flow");
        }
        if self.contains(Self::CDEP) {
            parts.push("control-dep");
        }
        if self.contains(Self::DDEP) {
            parts.push("data-dep");
        }
        parts.join(",")
    }
}

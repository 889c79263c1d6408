//! The graph-structured stack: merged call stacks of all parses in flight.
//! Nodes are `(slot, input position)` pairs; edges point from callee return
//! frames to their callers and carry the forest node parsed so far.

use super::sppf::SppfRef;
use crate::definition::SlotId;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// A stack node reference. The root sentinel has no slot.
pub struct GssRef {
    pub slot: Option<SlotId>,
    pub position: usize,
}

impl GssRef {
    pub fn root() -> GssRef {
        GssRef {
            slot: None,
            position: 0,
        }
    }

    pub fn is_root(&self) -> bool {
        self.slot.is_none()
    }
}

#[derive(Debug, Default)]
pub struct Gss {
    edges: HashMap<GssRef, Vec<(GssRef, SppfRef)>>,
}

impl Gss {
    pub fn contains(&self, node: &GssRef) -> bool {
        self.edges.contains_key(node)
    }

    pub fn add_node(&mut self, node: GssRef) {
        self.edges.entry(node).or_default();
    }

    pub fn has_edge(&self, from: &GssRef, to: &GssRef) -> bool {
        self.edges
            .get(from)
            .map_or(false, |targets| targets.iter().any(|(target, _)| target == to))
    }

    /// Add an edge with its forest label. Callers check [has_edge] first; a
    /// node keeps at most one edge per target.
    pub fn add_edge(&mut self, from: GssRef, to: GssRef, label: SppfRef) {
        self.edges.entry(from).or_default().push((to, label));
    }

    pub fn edges(&self, node: &GssRef) -> &[(GssRef, SppfRef)] {
        self.edges
            .get(node)
            .map(|targets| targets.as_slice())
            .unwrap_or(&[])
    }
}

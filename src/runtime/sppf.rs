//! The shared packed parse forest: an arena of terminal and intermediate
//! nodes addressed by dense ids, with canonicalization tables ensuring one
//! node per key.
//!
//! Intermediate nodes come in two kinds. A `Partial` node is keyed by a
//! grammar slot and extents and represents a half-finished alternative. A
//! `Completed` node is keyed by its *nonterminal* and extents only — every
//! alternative of `A` deriving the same span collapses into the same node,
//! which is where the forest shares ambiguity: each way of deriving the span
//! is one packed child below it.

use crate::definition::{NonterminalId, SlotId};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// A forest node handle in a working register or on a stack edge. `Initial`
/// marks "no left child yet".
pub enum SppfRef {
    Initial,
    Node(NodeId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// The canonicalization key of an intermediate node.
pub enum SppfKey {
    Completed {
        nonterminal: NonterminalId,
        left: usize,
        right: usize,
    },
    Partial {
        slot: SlotId,
        left: usize,
        right: usize,
    },
}

impl SppfKey {
    pub fn left_extent(&self) -> usize {
        match *self {
            SppfKey::Completed { left, .. } | SppfKey::Partial { left, .. } => left,
        }
    }

    pub fn right_extent(&self) -> usize {
        match *self {
            SppfKey::Completed { right, .. } | SppfKey::Partial { right, .. } => right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackedKey {
    pub slot: SlotId,
    pub split: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// One way of deriving an intermediate node's span, split at `split`.
/// `left` is absent for single-symbol prefixes.
pub struct PackedNode {
    pub slot: SlotId,
    pub split: usize,
    pub left: Option<NodeId>,
    pub right: NodeId,
}

#[derive(Debug, Clone)]
pub enum SppfNode {
    Terminal {
        symbol: String,
        left: usize,
        right: usize,
    },
    Intermediate {
        key: SppfKey,
        children: BTreeMap<PackedKey, PackedNode>,
    },
}

impl SppfNode {
    pub fn left_extent(&self) -> usize {
        match self {
            SppfNode::Terminal { left, .. } => *left,
            SppfNode::Intermediate { key, .. } => key.left_extent(),
        }
    }

    pub fn right_extent(&self) -> usize {
        match self {
            SppfNode::Terminal { right, .. } => *right,
            SppfNode::Intermediate { key, .. } => key.right_extent(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SppfNode::Terminal { .. })
    }

    /// The packed children of an intermediate node, keyed by `(slot, split)`.
    pub fn packed_children(&self) -> Option<&BTreeMap<PackedKey, PackedNode>> {
        match self {
            SppfNode::Terminal { .. } => None,
            SppfNode::Intermediate { children, .. } => Some(children),
        }
    }
}

#[derive(Debug, Default)]
pub struct Forest {
    nodes: Vec<SppfNode>,
    created: HashMap<SppfKey, NodeId>,
    terminals: HashMap<(String, usize, usize), NodeId>,
}

impl Forest {
    pub fn node(&self, id: NodeId) -> &SppfNode {
        &self.nodes[id.0]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The completed-nonterminal node spanning `left..right`, if any.
    pub fn completed(&self, nonterminal: NonterminalId, left: usize, right: usize) -> Option<NodeId> {
        self.created
            .get(&SppfKey::Completed {
                nonterminal,
                left,
                right,
            })
            .copied()
    }

    pub(crate) fn terminal_node(&mut self, symbol: &str, left: usize, right: usize) -> NodeId {
        let key = (symbol.to_owned(), left, right);
        if let Some(id) = self.terminals.get(&key) {
            return *id;
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(SppfNode::Terminal {
            symbol: symbol.to_owned(),
            left,
            right,
        });
        self.terminals.insert(key, id);
        id
    }

    pub(crate) fn intermediate_node(&mut self, key: SppfKey) -> NodeId {
        if let Some(id) = self.created.get(&key) {
            return *id;
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(SppfNode::Intermediate {
            key,
            children: BTreeMap::new(),
        });
        self.created.insert(key, id);
        id
    }

    pub(crate) fn add_packed(&mut self, node: NodeId, packed: PackedNode) {
        match &mut self.nodes[node.0] {
            SppfNode::Intermediate { children, .. } => {
                children
                    .entry(PackedKey {
                        slot: packed.slot,
                        split: packed.split,
                    })
                    .or_insert(packed);
            }
            SppfNode::Terminal { symbol, .. } => {
                panic!("packed child added below terminal node {:?}", symbol)
            }
        }
    }
}

use crate::definition::ParserDefinition;
use crate::runtime::sppf::{Forest, NodeId, PackedKey, PackedNode, SppfKey, SppfNode};
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

/// The result of a successful parse: a shared packed parse forest rooted at
/// the completed start nonterminal spanning the whole input.
///
/// The forest is a DAG. Intermediate nodes expose their extents and a
/// `(slot, split)`-keyed map of packed children; packed nodes reference a
/// possibly absent left child and a right child; terminal nodes expose their
/// symbol and extents. Child extents are contained in parent extents.
pub struct ParseForest {
    definition: Rc<ParserDefinition>,
    forest: Forest,
    root: NodeId,
}

impl ParseForest {
    pub(crate) fn new(definition: Rc<ParserDefinition>, forest: Forest, root: NodeId) -> Self {
        ParseForest {
            definition,
            forest,
            root,
        }
    }

    /// The completed node of the start nonterminal over the whole input.
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn root_node(&self) -> &SppfNode {
        self.forest.node(self.root)
    }

    pub fn node(&self, id: NodeId) -> &SppfNode {
        self.forest.node(id)
    }

    pub fn node_count(&self) -> usize {
        self.forest.node_count()
    }

    pub fn extents(&self, id: NodeId) -> (usize, usize) {
        let node = self.forest.node(id);
        (node.left_extent(), node.right_extent())
    }

    /// The packed children of a node in `(slot, split)` order; empty for
    /// terminal nodes.
    pub fn packed_children(&self, id: NodeId) -> Vec<&PackedNode> {
        self.forest
            .node(id)
            .packed_children()
            .map(|children| children.values().collect())
            .unwrap_or_default()
    }

    pub fn definition(&self) -> &ParserDefinition {
        &self.definition
    }

    pub fn label(&self, id: NodeId) -> String {
        match self.forest.node(id) {
            SppfNode::Terminal { symbol, .. } => format!("{:?}", symbol),
            SppfNode::Intermediate { key, .. } => match key {
                SppfKey::Completed { nonterminal, .. } => {
                    self.definition.nonterminal_name(*nonterminal).to_owned()
                }
                SppfKey::Partial { slot, .. } => self.definition.slot(*slot).name.clone(),
            },
        }
    }

    pub fn packed_label(&self, key: &PackedKey) -> String {
        format!("{} / {}", self.definition.slot(key.slot).name, key.split)
    }
}

impl Debug for ParseForest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParseForest")
            .field("root", &self.root)
            .field("nodes", &self.forest.node_count())
            .finish()
    }
}

use crate::forest::ParseForest;
use crate::runtime::sppf::{NodeId, PackedKey, SppfNode};
use ptree::TreeItem;
use std::borrow::Cow;

#[derive(Clone)]
/// A borrowed view of one forest node (or one packed child) for rendering.
pub struct ForestView<'f> {
    forest: &'f ParseForest,
    item: ForestItem,
}

#[derive(Clone, Copy)]
enum ForestItem {
    Node(NodeId),
    Packed(NodeId, PackedKey),
}

impl<'f> TreeItem for ForestView<'f> {
    type Child = Self;

    fn write_self<W: std::io::Write>(&self, f: &mut W, _: &ptree::Style) -> std::io::Result<()> {
        match self.item {
            ForestItem::Node(id) => {
                let (left, right) = self.forest.extents(id);
                write!(f, "{} # {}-{}", self.forest.label(id), left, right)
            }
            ForestItem::Packed(_, key) => {
                write!(f, "({})", self.forest.packed_label(&key))
            }
        }
    }

    fn children(&self) -> Cow<[Self::Child]> {
        let children = match self.item {
            ForestItem::Node(id) => match self.forest.node(id) {
                SppfNode::Terminal { .. } => Vec::new(),
                SppfNode::Intermediate { children, .. } => children
                    .keys()
                    .map(|key| ForestView {
                        forest: self.forest,
                        item: ForestItem::Packed(id, *key),
                    })
                    .collect(),
            },
            ForestItem::Packed(id, key) => {
                let packed = match self.forest.node(id) {
                    SppfNode::Intermediate { children, .. } => children[&key],
                    SppfNode::Terminal { .. } => {
                        unreachable!("packed view below a terminal node")
                    }
                };
                let mut children = Vec::with_capacity(2);
                if let Some(left) = packed.left {
                    children.push(ForestView {
                        forest: self.forest,
                        item: ForestItem::Node(left),
                    });
                }
                children.push(ForestView {
                    forest: self.forest,
                    item: ForestItem::Node(packed.right),
                });
                children
            }
        };
        Cow::from(children)
    }
}

impl ParseForest {
    /// A renderable view rooted at the forest root.
    pub fn view(&self) -> ForestView<'_> {
        ForestView {
            forest: self,
            item: ForestItem::Node(self.root()),
        }
    }

    /// Print the forest as a text tree. Shared nodes are printed once per
    /// occurrence.
    pub fn print(&self) -> std::io::Result<()> {
        ptree::print_tree(&self.view())
    }
}

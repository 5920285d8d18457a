use derive_more::{Display, From, Into};

/// Index of a node in the tree's arena. Slots of pruned nodes are reused.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, From, Into)]
pub struct NodeId(usize);

/// A single path segment.
///
/// Ownership flows root to children through the arena; `parent` is an index
/// back-reference, never a second owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub(super) label: String,
    pub(super) parent: Option<NodeId>,
    pub(super) children: Vec<NodeId>,
}

impl Node {
    pub(super) fn new(label: impl Into<String>, parent: Option<NodeId>) -> Self {
        Self {
            label: label.into(),
            parent,
            children: Vec::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// A node with no children. Leaves are not necessarily terminal entries;
    /// see `PathTree::is_terminal`.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

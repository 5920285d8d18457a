use std::cmp::Ordering;
use std::collections::HashSet;

use tracing::debug;

use crate::tree::node::{Node, NodeId};

/// Splits a full path into its non-empty segments. Leading, trailing and
/// consecutive delimiters never produce a segment.
fn segments(path: &str, delimiter: char) -> impl Iterator<Item = &str> {
    path.split(delimiter).filter(|segment| !segment.is_empty())
}

/// Hierarchical view over a flat set of delimiter-separated names.
///
/// Each path segment becomes a node and shared prefixes share ancestor
/// nodes. The registry of full path strings mirrors exactly the terminal
/// paths the tree represents, and every node's children stay sorted after
/// each public structural call.
///
/// Mutation takes `&mut self`, so a single owner serializes writers and
/// readers can never observe a half-updated registry/tree pair.
#[derive(Debug)]
pub struct PathTree {
    nodes: Vec<Node>,
    free: Vec<NodeId>,
    root: NodeId,
    registry: HashSet<String>,
    delimiter: char,
    revision: u64,
}

impl PathTree {
    /// Creates an empty tree with an unlabeled root.
    pub fn new(delimiter: char) -> Self {
        Self {
            nodes: vec![Node::new("", None)],
            free: Vec::new(),
            root: NodeId::from(0),
            registry: HashSet::new(),
            delimiter,
            revision: 0,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[usize::from(id)]
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Bumped exactly once per public structural call. The rendering layer
    /// polls this to learn that the structure changed.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Number of registered full paths.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// The registered full path strings, in no particular order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.registry.iter().map(String::as_str)
    }

    /// Replaces the tree contents so that exactly the given paths are
    /// represented. Duplicates collapse and input order is irrelevant.
    /// The root label is replaced only when one is supplied; it is
    /// presentational and never part of a full path.
    pub fn set<I, S>(&mut self, root_label: Option<&str>, paths: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let current: Vec<String> = self.registry.iter().cloned().collect();
        for path in &current {
            self.delete_path(path);
        }

        if let Some(label) = root_label {
            self.node_mut(self.root).label = label.to_string();
        }

        for path in paths {
            self.insert_path(path.as_ref());
        }

        self.sort();
        self.revision += 1;
        debug!("Rebuilt tree with {} registered paths", self.registry.len());
    }

    /// Adds paths incrementally; paths already present are untouched.
    pub fn insert<I, S>(&mut self, paths: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for path in paths {
            self.insert_path(path.as_ref());
        }

        self.sort();
        self.revision += 1;
    }

    /// Removes the given paths. Paths that are not registered are silently
    /// skipped. The batch is sorted once at the end, since a delete can
    /// turn a group node into a leaf and flip its sort category.
    pub fn delete<I, S>(&mut self, paths: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for path in paths {
            self.delete_path(path.as_ref());
        }

        self.sort();
        self.revision += 1;
    }

    /// Resolves a registered full path to its node. The match is exact
    /// against the registry: structural prefixes and un-normalized
    /// spellings of registered paths return `None`.
    pub fn find(&self, path: &str) -> Option<NodeId> {
        if !self.registry.contains(path) {
            return None;
        }
        self.walk(path)
    }

    /// Labels from the root (excluded) down to `id`, joined by the
    /// delimiter.
    pub fn full_path(&self, id: NodeId) -> String {
        let mut labels = Vec::new();
        let mut current = id;
        while let Some(parent) = self.node(current).parent() {
            labels.push(self.node(current).label());
            current = parent;
        }
        labels.reverse();
        labels.join(&self.delimiter.to_string())
    }

    /// Whether the node's full path is one of the registered entries, as
    /// opposed to a purely structural grouping segment.
    pub fn is_terminal(&self, id: NodeId) -> bool {
        self.registry.contains(&self.full_path(id))
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[usize::from(id)]
    }

    /// Walks the segments from the root, creating missing nodes, and
    /// registers the normalized path. Returns false when the path has no
    /// non-empty segments and therefore nothing to represent.
    fn insert_path(&mut self, path: &str) -> bool {
        let mut current = self.root;
        let mut normalized = String::new();

        for segment in segments(path, self.delimiter) {
            if !normalized.is_empty() {
                normalized.push(self.delimiter);
            }
            normalized.push_str(segment);

            current = match self.child_by_label(current, segment) {
                Some(child) => child,
                None => self.attach(current, segment),
            };
        }

        if normalized.is_empty() {
            debug!("Skipping path with no non-empty segments: {:?}", path);
            return false;
        }

        self.registry.insert(normalized);
        true
    }

    /// Removes one registered path from the registry and prunes its nodes:
    /// walk upward, removing the current node, until a node with siblings
    /// was removed, the root is reached, or the parent is itself terminal.
    fn delete_path(&mut self, path: &str) -> bool {
        if !self.registry.contains(path) {
            debug!("Ignoring delete of unregistered path: {:?}", path);
            return false;
        }
        let Some(mut node) = self.walk(path) else {
            return false;
        };
        self.registry.remove(path);

        if !self.node(node).is_leaf() {
            // Still the grouping prefix of other registered paths.
            return true;
        }

        loop {
            let Some(parent) = self.node(node).parent() else {
                break;
            };
            let had_siblings = self.node(parent).children().len() > 1;
            self.detach(parent, node);
            if had_siblings || parent == self.root || self.is_terminal(parent) {
                break;
            }
            node = parent;
        }

        debug!("Deleted path {:?}", path);
        true
    }

    /// Follows existing nodes segment by segment. `None` when a segment is
    /// missing or the path has no segments at all.
    fn walk(&self, path: &str) -> Option<NodeId> {
        let mut current = self.root;
        for segment in segments(path, self.delimiter) {
            current = self.child_by_label(current, segment)?;
        }
        (current != self.root).then_some(current)
    }

    fn child_by_label(&self, parent: NodeId, label: &str) -> Option<NodeId> {
        self.node(parent)
            .children()
            .iter()
            .copied()
            .find(|&child| self.node(child).label() == label)
    }

    /// Appends a new child node, reusing a freed arena slot when one exists.
    fn attach(&mut self, parent: NodeId, label: &str) -> NodeId {
        let id = match self.free.pop() {
            Some(id) => {
                let node = self.node_mut(id);
                node.label = label.to_string();
                node.parent = Some(parent);
                id
            }
            None => {
                self.nodes.push(Node::new(label, Some(parent)));
                NodeId::from(self.nodes.len() - 1)
            }
        };
        self.node_mut(parent).children.push(id);
        id
    }

    /// Unlinks `child` from `parent` and releases its slot. Pruning only
    /// ever detaches childless nodes, so no recursion is needed.
    fn detach(&mut self, parent: NodeId, child: NodeId) {
        self.node_mut(parent).children.retain(|&c| c != child);
        let node = self.node_mut(child);
        node.label.clear();
        node.parent = None;
        node.children.clear();
        self.free.push(child);
    }

    /// Re-sorts every node's children, depth-first over the whole tree with
    /// an explicit stack.
    fn sort(&mut self) {
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let mut children = std::mem::take(&mut self.node_mut(id).children);
            children.sort_by(|&a, &b| self.compare(a, b));
            stack.extend(children.iter().copied());
            self.node_mut(id).children = children;
        }
    }

    /// Group nodes (with children of their own) order before leaf nodes;
    /// within a category, case-sensitive label order. Sibling labels are
    /// unique, so no further tiebreak exists.
    fn compare(&self, a: NodeId, b: NodeId) -> Ordering {
        let (a, b) = (self.node(a), self.node(b));
        a.is_leaf()
            .cmp(&b.is_leaf())
            .then_with(|| a.label().cmp(b.label()))
    }
}

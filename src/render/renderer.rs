use colored::Colorize;
use supports_color::Stream;

use crate::tree::{NodeId, PathTree};

const BRANCH_GLYPH: &str = "├── ";
const LAST_BRANCH_GLYPH: &str = "└── ";
const PIPE_GLYPH: &str = "│   ";
const INDENT_GLYPH: &str = "    ";

/// Renders a path tree as box-drawing text for the terminal.
///
/// Reads the node structure in its stored (sorted) order; the tree is never
/// mutated from here.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    /// Colors the output only when stdout supports it
    pub fn from_env() -> Self {
        Self {
            color: supports_color::on(Stream::Stdout).is_some(),
        }
    }

    /// Uncolored output, for piping and for tests
    pub fn plain() -> Self {
        Self { color: false }
    }

    /// Renders the whole tree, root label first when one is set.
    pub fn render(&self, tree: &PathTree) -> String {
        self.render_from(tree, tree.root())
    }

    /// Renders the subtree rooted at `start`, e.g. a `find` result.
    pub fn render_from(&self, tree: &PathTree, start: NodeId) -> String {
        let mut out = String::new();

        let label = self.styled(tree, start);
        if !label.is_empty() {
            out.push_str(&label);
            out.push('\n');
        }

        self.render_children(tree, start, "", &mut out);
        out
    }

    // Recursion depth is bounded by the segment depth of the longest path
    fn render_children(&self, tree: &PathTree, id: NodeId, prefix: &str, out: &mut String) {
        let children = tree.node(id).children();
        for (position, &child) in children.iter().enumerate() {
            let last = position + 1 == children.len();

            out.push_str(prefix);
            out.push_str(if last { LAST_BRANCH_GLYPH } else { BRANCH_GLYPH });
            out.push_str(&self.styled(tree, child));
            out.push('\n');

            let child_prefix = format!("{prefix}{}", if last { INDENT_GLYPH } else { PIPE_GLYPH });
            self.render_children(tree, child, &child_prefix, out);
        }
    }

    /// Group nodes render bold blue, terminal leaves green.
    fn styled(&self, tree: &PathTree, id: NodeId) -> String {
        let node = tree.node(id);
        if !self.color {
            return node.label().to_string();
        }

        if !node.is_leaf() {
            node.label().blue().bold().to_string()
        } else if tree.is_terminal(id) {
            node.label().green().to_string()
        } else {
            node.label().to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_with(paths: &[&str]) -> PathTree {
        let mut tree = PathTree::new('/');
        tree.set(None, paths.iter().copied());
        tree
    }

    #[test]
    fn renders_the_sorted_tree_with_box_glyphs() {
        let tree = tree_with(&["zeta", "alpha/one", "alpha/two", "beta"]);

        let rendered = Renderer::plain().render(&tree);

        let expected = "\
├── alpha
│   ├── one
│   └── two
├── beta
└── zeta
";
        assert_eq!(rendered, expected);
    }

    #[test]
    fn renders_the_root_label_when_present() {
        let mut tree = PathTree::new('/');
        tree.set(Some("Branches"), ["main"]);

        let rendered = Renderer::plain().render(&tree);

        assert_eq!(rendered, "Branches\n└── main\n");
    }

    #[test]
    fn renders_a_subtree_from_a_find_result() {
        let mut tree = tree_with(&["a/b", "a"]);
        tree.insert(["a/c"]);

        let node = tree.find("a").expect("registered path must resolve");
        let rendered = Renderer::plain().render_from(&tree, node);

        assert_eq!(rendered, "a\n├── b\n└── c\n");
    }

    #[test]
    fn renders_nothing_for_an_empty_unlabeled_tree() {
        let tree = tree_with(&[]);

        assert_eq!(Renderer::plain().render(&tree), "");
    }

    #[test]
    fn deep_chains_use_pipe_and_indent_prefixes() {
        let tree = tree_with(&["a/b/c", "a/d", "e"]);

        let rendered = Renderer::plain().render(&tree);

        let expected = "\
├── a
│   ├── b
│   │   └── c
│   └── d
└── e
";
        assert_eq!(rendered, expected);
    }
}

/*!
 * Directory tree diagram of the selected files
 */

use std::collections::BTreeMap;

use crate::types::TreeNode;
use crate::utils::compare_names;

/// Header line of the rendered tree
pub const TREE_HEADER: &str = "Directory tree:";

/// Build a tree from forward-slash relative paths
pub fn build_tree<I, S>(paths: I) -> TreeNode
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut root = BTreeMap::new();

    for path in paths {
        let segments: Vec<&str> = path
            .as_ref()
            .split('/')
            .filter(|s| !s.is_empty() && *s != ".")
            .collect();
        insert(&mut root, &segments);
    }

    TreeNode::Directory(root)
}

fn insert(children: &mut BTreeMap<String, TreeNode>, segments: &[&str]) {
    let Some((first, rest)) = segments.split_first() else {
        return;
    };

    if rest.is_empty() {
        children
            .entry(first.to_string())
            .or_insert(TreeNode::File);
        return;
    }

    let node = children
        .entry(first.to_string())
        .or_insert_with(|| TreeNode::Directory(BTreeMap::new()));
    // A path seen as a file earlier cannot also be a directory on disk
    if let TreeNode::File = node {
        *node = TreeNode::Directory(BTreeMap::new());
    }
    if let TreeNode::Directory(grandchildren) = node {
        insert(grandchildren, rest);
    }
}

/// Render with `├──`/`└──` connectors and four spaces per level.
///
/// Siblings are listed in the same name order the scanner visits them.
pub fn render_tree(tree: &TreeNode) -> String {
    let mut lines = vec![TREE_HEADER.to_string()];
    if let TreeNode::Directory(children) = tree {
        render_children(children, 0, &mut lines);
    }
    lines.join("\n")
}

fn render_children(children: &BTreeMap<String, TreeNode>, level: usize, lines: &mut Vec<String>) {
    let indent = "    ".repeat(level);
    let last = children.len().saturating_sub(1);

    let mut entries: Vec<(&String, &TreeNode)> = children.iter().collect();
    entries.sort_by(|a, b| compare_names(a.0, b.0));

    for (index, (name, node)) in entries.into_iter().enumerate() {
        let connector = if index == last { "└── " } else { "├── " };
        lines.push(format!("{}{}{}", indent, connector, name));

        if let TreeNode::Directory(grandchildren) = node {
            render_children(grandchildren, level + 1, lines);
        }
    }
}

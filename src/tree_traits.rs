//! Text rendering of a tree for terminals.

use std::collections::HashMap;

use termtree::Tree;

use crate::domain::{Entry, Group, GroupId, KdbTree};

pub trait TreeDisplay {
    /// Render as a `termtree` outline; entries are listed before sub-groups.
    fn to_tree_string(&self, show_entries: bool) -> Tree<String>;
}

fn group_label(group: &Group) -> String {
    if group.name.is_empty() {
        "(unnamed)".to_string()
    } else {
        group.name.clone()
    }
}

fn entry_label(entry: &Entry) -> String {
    let title = if entry.title.is_empty() {
        "(untitled)"
    } else {
        entry.title.as_str()
    };
    if entry.username.is_empty() {
        format!("* {}", title)
    } else {
        format!("* {} [{}]", title, entry.username)
    }
}

/// Builds nodes bottom-up so deep trees need no recursion.
fn build_tree(tree: &KdbTree, show_entries: bool) -> Option<Tree<String>> {
    let mut finished: HashMap<GroupId, Tree<String>> = HashMap::new();
    for (id, group) in tree.iter_postorder() {
        let mut node = Tree::new(group_label(group));
        if show_entries {
            for entry in group.entries().iter().filter_map(|&e| tree.entry(e)) {
                node.push(Tree::new(entry_label(entry)));
            }
        }
        for child in group.groups().iter().filter_map(|g| finished.remove(g)) {
            node.push(child);
        }
        finished.insert(id, node);
    }
    finished.remove(&tree.root()?)
}

impl TreeDisplay for KdbTree {
    fn to_tree_string(&self, show_entries: bool) -> Tree<String> {
        build_tree(self, show_entries).unwrap_or_else(|| Tree::new("Empty tree".to_string()))
    }
}

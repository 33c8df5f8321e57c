use tracing::instrument;

use crate::domain::{Group, GroupId, KdbTree};

/// Depth-first pre-order walk over groups, children left to right.
pub struct GroupIter<'a> {
    tree: &'a KdbTree,
    stack: Vec<GroupId>,
}

impl<'a> GroupIter<'a> {
    #[instrument(level = "trace", skip(tree))]
    pub(crate) fn new(tree: &'a KdbTree, start: Option<GroupId>) -> Self {
        Self {
            tree,
            stack: start.into_iter().collect(),
        }
    }
}

impl<'a> Iterator for GroupIter<'a> {
    type Item = (GroupId, &'a Group);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            if let Some(group) = self.tree.group(current) {
                // Push children in reverse order for left-to-right traversal
                self.stack.extend(group.groups().iter().rev().copied());
                return Some((current, group));
            }
        }
        None
    }
}

/// Depth-first post-order walk: every group after all of its descendants.
pub struct PostOrderIter<'a> {
    tree: &'a KdbTree,
    stack: Vec<(GroupId, bool)>,
}

impl<'a> PostOrderIter<'a> {
    #[instrument(level = "trace", skip(tree))]
    pub(crate) fn new(tree: &'a KdbTree, start: Option<GroupId>) -> Self {
        Self {
            tree,
            stack: start.map(|id| (id, false)).into_iter().collect(),
        }
    }
}

impl<'a> Iterator for PostOrderIter<'a> {
    type Item = (GroupId, &'a Group);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current, visited)) = self.stack.pop() {
            if let Some(group) = self.tree.group(current) {
                if visited {
                    return Some((current, group));
                }
                self.stack.push((current, true));
                for &child in group.groups().iter().rev() {
                    self.stack.push((child, false));
                }
            }
        }
        None
    }
}

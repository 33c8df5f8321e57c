//! Owned, nested mirror of a tree for encoders and decoders.
//!
//! A persistence layer walks a [`KdbTree`] into a [`GroupSnapshot`], encodes
//! it however it likes, and rebuilds an equivalent tree with
//! [`KdbTree::from_snapshot`]. Order of groups and entries is preserved at
//! every level, as is every optional timestamp.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::{
    DomainResult, Entry, Group, GroupId, KdbTree, NodeDefaults, PostOrderIter, Times,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntrySnapshot {
    pub title: String,
    pub username: String,
    pub password: String,
    pub url: String,
    pub notes: String,
    pub image: u32,
    #[serde(skip_serializing_if = "Times::is_unset")]
    pub times: Times,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupSnapshot {
    pub name: String,
    pub image: u32,
    #[serde(skip_serializing_if = "Times::is_unset")]
    pub times: Times,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<EntrySnapshot>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<GroupSnapshot>,
}

impl From<&Entry> for EntrySnapshot {
    fn from(entry: &Entry) -> Self {
        Self {
            title: entry.title.clone(),
            username: entry.username.clone(),
            password: entry.password.clone(),
            url: entry.url.clone(),
            notes: entry.notes.clone(),
            image: entry.image,
            times: entry.times,
        }
    }
}

impl From<&EntrySnapshot> for Entry {
    fn from(snapshot: &EntrySnapshot) -> Self {
        Entry {
            image: snapshot.image,
            title: snapshot.title.clone(),
            username: snapshot.username.clone(),
            password: snapshot.password.clone(),
            url: snapshot.url.clone(),
            notes: snapshot.notes.clone(),
            times: snapshot.times,
            ..Entry::default()
        }
    }
}

impl GroupSnapshot {
    pub fn group_count(&self) -> usize {
        self.walk().count()
    }

    pub fn entry_count(&self) -> usize {
        self.walk().map(|group| group.entries.len()).sum()
    }

    /// This group and all nested groups, parents before children.
    fn walk(&self) -> impl Iterator<Item = &GroupSnapshot> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let current = stack.pop()?;
            stack.extend(current.groups.iter().rev());
            Some(current)
        })
    }
}

impl KdbTree {
    /// Snapshot of everything reachable from the root, `None` for an empty tree.
    #[instrument(level = "debug", skip(self))]
    pub fn snapshot(&self) -> Option<GroupSnapshot> {
        self.root().map(|root| self.snapshot_group(root))
    }

    /// Snapshot of the subtree starting at `id`; an unknown handle yields an empty group.
    ///
    /// Built bottom-up: every group's children are finished before the group
    /// itself is visited.
    pub fn snapshot_group(&self, id: GroupId) -> GroupSnapshot {
        let mut finished: HashMap<GroupId, GroupSnapshot> = HashMap::new();
        for (current, group) in PostOrderIter::new(self, Some(id)) {
            let snapshot = GroupSnapshot {
                name: group.name.clone(),
                image: group.image,
                times: group.times,
                entries: group
                    .entries()
                    .iter()
                    .filter_map(|&e| self.entry(e).map(EntrySnapshot::from))
                    .collect(),
                groups: group
                    .groups()
                    .iter()
                    .filter_map(|g| finished.remove(g))
                    .collect(),
            };
            finished.insert(current, snapshot);
        }
        finished.remove(&id).unwrap_or_default()
    }

    /// Rebuilds a tree whose root mirrors `root`.
    #[instrument(level = "debug", skip(root), fields(name = %root.name))]
    pub fn from_snapshot(root: &GroupSnapshot, defaults: NodeDefaults) -> DomainResult<Self> {
        let mut tree = KdbTree::with_defaults(defaults);
        let root_id = tree.insert_snapshot(root)?;
        tree.set_root(root_id)?;
        debug!(
            groups = tree.group_count(),
            entries = tree.entry_count(),
            "tree rebuilt from snapshot"
        );
        Ok(tree)
    }

    /// Inserts `snapshot` as a detached subtree and returns its top group.
    pub fn insert_snapshot(&mut self, snapshot: &GroupSnapshot) -> DomainResult<GroupId> {
        let top = self.insert_snapshot_node(snapshot)?;
        let mut pending: Vec<(GroupId, &GroupSnapshot)> =
            snapshot.groups.iter().rev().map(|child| (top, child)).collect();
        while let Some((parent, current)) = pending.pop() {
            let id = self.insert_snapshot_node(current)?;
            self.add_group(parent, id)?;
            pending.extend(current.groups.iter().rev().map(|child| (id, child)));
        }
        Ok(top)
    }

    /// One group and its entries, without sub-groups.
    fn insert_snapshot_node(&mut self, snapshot: &GroupSnapshot) -> DomainResult<GroupId> {
        let id = self.insert_group(
            Group::new(snapshot.name.clone())
                .with_image(snapshot.image)
                .with_times(snapshot.times),
        );
        for entry in &snapshot.entries {
            let entry_id = self.insert_entry(Entry::from(entry));
            self.add_entry(id, entry_id)?;
        }
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn populated() -> KdbTree {
        let mut tree = KdbTree::new();
        let root = tree.create_group(None).unwrap();
        tree.group_mut(root).unwrap().name = "Root".into();
        let bank = tree.create_group(Some(root)).unwrap();
        tree.group_mut(bank).unwrap().name = "Banking".into();
        let mail = tree.create_group(Some(root)).unwrap();
        tree.group_mut(mail).unwrap().name = "Mail".into();

        let e = tree.create_entry(Some(bank)).unwrap();
        let entry = tree.entry_mut(e).unwrap();
        entry.title = "Bank".into();
        entry.password = "s3cret".into();
        entry.times.expiry = Some(Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap());
        let e2 = tree.create_entry(Some(bank)).unwrap();
        tree.entry_mut(e2).unwrap().title = "Broker".into();
        tree
    }

    #[test]
    fn test_snapshot_preserves_order_and_fields() {
        let tree = populated();
        let snapshot = tree.snapshot().unwrap();

        assert_eq!(snapshot.name, "Root");
        let names: Vec<_> = snapshot.groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Banking", "Mail"]);
        let titles: Vec<_> = snapshot.groups[0]
            .entries
            .iter()
            .map(|e| e.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Bank", "Broker"]);
        assert_eq!(snapshot.groups[0].entries[0].password, "s3cret");
        assert_eq!(snapshot.group_count(), 3);
        assert_eq!(snapshot.entry_count(), 2);
    }

    #[test]
    fn test_rebuilt_tree_has_consistent_back_references() {
        let snapshot = populated().snapshot().unwrap();
        let tree = KdbTree::from_snapshot(&snapshot, NodeDefaults::default()).unwrap();

        for (id, group) in tree.iter() {
            for &child in group.groups() {
                assert_eq!(tree.group(child).unwrap().parent(), Some(id));
            }
            for &entry in group.entries() {
                assert_eq!(tree.entry(entry).unwrap().parent(), Some(id));
            }
        }
        assert!(tree.root_group().unwrap().is_root());
        assert_eq!(tree.snapshot(), Some(snapshot));
    }

    #[test]
    fn test_deep_chain_survives_snapshot_and_rebuild() {
        let mut tree = KdbTree::new();
        let root = tree.create_group(None).unwrap();
        let mut parent = root;
        for i in 0..3_000 {
            parent = tree.create_group(Some(parent)).unwrap();
            tree.group_mut(parent).unwrap().name = format!("g{i}");
        }
        tree.create_entry(Some(parent)).unwrap();

        let snapshot = tree.snapshot().unwrap();
        assert_eq!(snapshot.group_count(), 3_001);
        assert_eq!(snapshot.entry_count(), 1);

        let rebuilt = KdbTree::from_snapshot(&snapshot, NodeDefaults::default()).unwrap();
        assert_eq!(rebuilt.depth(), 3_001);
        assert_eq!(rebuilt.entry_count(), 1);
        let (deepest, _) = rebuilt.iter_postorder().next().unwrap();
        assert_eq!(rebuilt.path(deepest).last().unwrap(), "g2999");
    }

    #[test]
    fn test_empty_tree_has_no_snapshot() {
        assert_eq!(KdbTree::new().snapshot(), None);
    }
}

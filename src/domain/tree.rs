use chrono::{DateTime, Utc};
use generational_arena::Arena;
use tracing::{debug, instrument, warn};

use crate::domain::iter::{GroupIter, PostOrderIter};
use crate::domain::{
    DomainError, DomainResult, Entry, EntryId, Group, GroupId, Placement, Times,
};

/// Values the factory operations give to freshly created nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeDefaults {
    pub group_image: u32,
    pub entry_image: u32,
    /// Stamp creation, modification and access time on creation.
    pub stamp_times: bool,
}

/// Arena-based group/entry tree.
///
/// The tree owns every node. Parents own their children through ordered
/// handle sequences; children point back at their parent through a handle
/// that only the structural operations below ever change.
#[derive(Debug, Clone)]
pub struct KdbTree {
    groups: Arena<Group>,
    entries: Arena<Entry>,
    root: Option<GroupId>,
    defaults: NodeDefaults,
}

impl Default for KdbTree {
    fn default() -> Self {
        Self::new()
    }
}

impl KdbTree {
    pub fn new() -> Self {
        Self::with_defaults(NodeDefaults::default())
    }

    pub fn with_defaults(defaults: NodeDefaults) -> Self {
        Self {
            groups: Arena::new(),
            entries: Arena::new(),
            root: None,
            defaults,
        }
    }

    pub fn defaults(&self) -> NodeDefaults {
        self.defaults
    }

    pub fn root(&self) -> Option<GroupId> {
        self.root
    }

    pub fn root_group(&self) -> Option<&Group> {
        self.root.and_then(|id| self.group(id))
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(id.0)
    }

    /// Mutable access to a group's content fields.
    pub fn group_mut(&mut self, id: GroupId) -> Option<&mut Group> {
        self.groups.get_mut(id.0)
    }

    pub fn entry(&self, id: EntryId) -> Option<&Entry> {
        self.entries.get(id.0)
    }

    /// Mutable access to an entry's content fields.
    pub fn entry_mut(&mut self, id: EntryId) -> Option<&mut Entry> {
        self.entries.get_mut(id.0)
    }

    fn group_ref(&self, id: GroupId) -> DomainResult<&Group> {
        self.group(id).ok_or(DomainError::UnknownGroup(id))
    }

    fn entry_ref(&self, id: EntryId) -> DomainResult<&Entry> {
        self.entry(id).ok_or(DomainError::UnknownEntry(id))
    }

    // ------------------------------------------------------------------
    // Allocation
    // ------------------------------------------------------------------

    /// Stores a group without attaching it anywhere.
    ///
    /// Any child handles carried by `group` are dropped: a group only gains
    /// children through [`add_group`](Self::add_group) and
    /// [`add_entry`](Self::add_entry).
    #[instrument(level = "trace", skip(self, group), fields(name = %group.name))]
    pub fn insert_group(&mut self, group: Group) -> GroupId {
        let group = Group {
            placement: Placement::Detached,
            groups: Vec::new(),
            entries: Vec::new(),
            ..group
        };
        GroupId(self.groups.insert(group))
    }

    /// Stores an entry without attaching it to a group.
    #[instrument(level = "trace", skip(self, entry), fields(title = %entry.title))]
    pub fn insert_entry(&mut self, entry: Entry) -> EntryId {
        let entry = Entry {
            parent: None,
            ..entry
        };
        EntryId(self.entries.insert(entry))
    }

    fn fresh_times(&self) -> Times {
        if self.defaults.stamp_times {
            Times::stamped(Utc::now())
        } else {
            Times::default()
        }
    }

    fn fresh_group(&self) -> Group {
        Group {
            image: self.defaults.group_image,
            times: self.fresh_times(),
            ..Group::default()
        }
    }

    fn fresh_entry(&self) -> Entry {
        Entry {
            image: self.defaults.entry_image,
            times: self.fresh_times(),
            ..Entry::default()
        }
    }

    // ------------------------------------------------------------------
    // Factories
    // ------------------------------------------------------------------

    /// Creates a group below `parent`, or a new root when `parent` is `None`.
    ///
    /// Creating a new root releases the previous root and everything below it.
    #[instrument(level = "debug", skip(self))]
    pub fn create_group(&mut self, parent: Option<GroupId>) -> DomainResult<GroupId> {
        match parent {
            None => {
                let id = self.insert_group(self.fresh_group());
                self.install_root(id);
                Ok(id)
            }
            Some(parent) => {
                self.group_ref(parent)?;
                let id = self.insert_group(self.fresh_group());
                self.add_group(parent, id)?;
                Ok(id)
            }
        }
    }

    /// Creates an entry inside `parent`.
    ///
    /// Entries always belong to a group, so `None` is rejected with
    /// [`DomainError::InvalidArgument`] and the tree is left untouched.
    #[instrument(level = "debug", skip(self))]
    pub fn create_entry(&mut self, parent: Option<GroupId>) -> DomainResult<EntryId> {
        let Some(parent) = parent else {
            return Err(DomainError::InvalidArgument(
                "an entry must be created inside a group".to_string(),
            ));
        };
        self.group_ref(parent)?;
        let id = self.insert_entry(self.fresh_entry());
        self.add_entry(parent, id)?;
        Ok(id)
    }

    /// Installs a detached group as the root, releasing the previous root.
    #[instrument(level = "debug", skip(self))]
    pub fn set_root(&mut self, group: GroupId) -> DomainResult<()> {
        match self.group_ref(group)?.placement {
            Placement::Root => Ok(()),
            Placement::Child(_) => Err(DomainError::GroupAlreadyAttached(group)),
            Placement::Detached => {
                self.install_root(group);
                Ok(())
            }
        }
    }

    fn install_root(&mut self, id: GroupId) {
        if let Some(old) = self.root.replace(id) {
            if old != id {
                warn!(%old, new = %id, "replacing root, releasing previous subtree");
                self.release_group(old);
            }
        }
        if let Some(group) = self.groups.get_mut(id.0) {
            group.placement = Placement::Root;
        }
    }

    // ------------------------------------------------------------------
    // Group structure
    // ------------------------------------------------------------------

    /// Appends the detached group `child` to `parent`'s groups.
    ///
    /// Fails without changing anything when either handle is unknown, when
    /// `child` is attached or is the root, or when `child` is `parent` or one
    /// of its ancestors.
    #[instrument(level = "debug", skip(self))]
    pub fn add_group(&mut self, parent: GroupId, child: GroupId) -> DomainResult<()> {
        self.group_ref(parent)?;
        let candidate = self.group_ref(child)?;
        match candidate.placement {
            Placement::Root => return Err(DomainError::RootNotAttachable(child)),
            Placement::Child(_) => return Err(DomainError::GroupAlreadyAttached(child)),
            Placement::Detached => {}
        }
        // a detached group without sub-groups cannot be above `parent`
        let has_subgroups = !candidate.groups.is_empty();
        if parent == child || (has_subgroups && self.is_ancestor(child, parent)) {
            return Err(DomainError::CycleDetected { parent, child });
        }

        if let Some(p) = self.groups.get_mut(parent.0) {
            p.groups.push(child);
        }
        if let Some(c) = self.groups.get_mut(child.0) {
            c.placement = Placement::Child(parent);
        }
        debug!(%parent, %child, "group attached");
        Ok(())
    }

    /// Removes `child` from `parent` and releases its whole subtree.
    ///
    /// Returns `false` (and does nothing) when `child` is not one of
    /// `parent`'s groups.
    #[instrument(level = "debug", skip(self))]
    pub fn delete_group(&mut self, parent: GroupId, child: GroupId) -> bool {
        if !self.unlink_group(parent, child) {
            return false;
        }
        self.release_group(child);
        true
    }

    /// Removes `child` from `parent` but keeps it, detached, for re-use.
    #[instrument(level = "debug", skip(self))]
    pub fn detach_group(&mut self, parent: GroupId, child: GroupId) -> bool {
        if !self.unlink_group(parent, child) {
            return false;
        }
        if let Some(c) = self.groups.get_mut(child.0) {
            c.placement = Placement::Detached;
        }
        true
    }

    /// Releases the detached group `id` together with its sub-groups and entries.
    ///
    /// Attached groups go through [`delete_group`](Self::delete_group); the
    /// root is only released by installing another one.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_group(&mut self, id: GroupId) -> DomainResult<()> {
        match self.group_ref(id)?.placement {
            Placement::Root => Err(DomainError::RootNotRemovable(id)),
            Placement::Child(_) => Err(DomainError::GroupAlreadyAttached(id)),
            Placement::Detached => {
                self.release_group(id);
                Ok(())
            }
        }
    }

    /// Moves `child` (attached or detached) to the end of `new_parent`'s groups.
    #[instrument(level = "debug", skip(self))]
    pub fn move_group(&mut self, child: GroupId, new_parent: GroupId) -> DomainResult<()> {
        self.group_ref(new_parent)?;
        let placement = self.group_ref(child)?.placement;
        if placement == Placement::Root {
            return Err(DomainError::RootNotAttachable(child));
        }
        if new_parent == child || self.is_ancestor(child, new_parent) {
            return Err(DomainError::CycleDetected {
                parent: new_parent,
                child,
            });
        }
        if let Placement::Child(old) = placement {
            self.detach_group(old, child);
        }
        self.add_group(new_parent, child)
    }

    fn unlink_group(&mut self, parent: GroupId, child: GroupId) -> bool {
        let Some(p) = self.groups.get_mut(parent.0) else {
            return false;
        };
        let Some(pos) = p.groups.iter().position(|&g| g == child) else {
            debug!(%parent, %child, "group not present, nothing to remove");
            return false;
        };
        p.groups.remove(pos);
        true
    }

    /// Frees `id` and every group and entry below it.
    fn release_group(&mut self, id: GroupId) {
        let mut stack = vec![id];
        let (mut groups, mut entries) = (0usize, 0usize);
        while let Some(current) = stack.pop() {
            if let Some(group) = self.groups.remove(current.0) {
                stack.extend(group.groups);
                for entry in group.entries {
                    if self.entries.remove(entry.0).is_some() {
                        entries += 1;
                    }
                }
                groups += 1;
            }
        }
        debug!(%id, groups, entries, "subtree released");
    }

    // ------------------------------------------------------------------
    // Entry structure
    // ------------------------------------------------------------------

    /// Appends the detached `entry` to `group`'s entries.
    #[instrument(level = "debug", skip(self))]
    pub fn add_entry(&mut self, group: GroupId, entry: EntryId) -> DomainResult<()> {
        self.group_ref(group)?;
        if self.entry_ref(entry)?.parent.is_some() {
            return Err(DomainError::EntryAlreadyAttached(entry));
        }
        if let Some(g) = self.groups.get_mut(group.0) {
            g.entries.push(entry);
        }
        if let Some(e) = self.entries.get_mut(entry.0) {
            e.parent = Some(group);
        }
        debug!(%group, %entry, "entry attached");
        Ok(())
    }

    /// Removes `entry` from `group` and releases it.
    ///
    /// Returns `false` (and does nothing) when `entry` is not in `group`.
    #[instrument(level = "debug", skip(self))]
    pub fn delete_entry(&mut self, group: GroupId, entry: EntryId) -> bool {
        if !self.unlink_entry(group, entry) {
            return false;
        }
        self.entries.remove(entry.0);
        true
    }

    /// Removes `entry` from `group` but keeps it, detached, for re-use.
    #[instrument(level = "debug", skip(self))]
    pub fn detach_entry(&mut self, group: GroupId, entry: EntryId) -> bool {
        if !self.unlink_entry(group, entry) {
            return false;
        }
        if let Some(e) = self.entries.get_mut(entry.0) {
            e.parent = None;
        }
        true
    }

    /// Releases a detached entry.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_entry(&mut self, id: EntryId) -> DomainResult<()> {
        if self.entry_ref(id)?.parent.is_some() {
            return Err(DomainError::EntryAlreadyAttached(id));
        }
        self.entries.remove(id.0);
        debug!(%id, "detached entry released");
        Ok(())
    }

    /// Moves `entry` to the end of `new_parent`'s entries.
    #[instrument(level = "debug", skip(self))]
    pub fn move_entry(&mut self, entry: EntryId, new_parent: GroupId) -> DomainResult<()> {
        self.group_ref(new_parent)?;
        if let Some(old) = self.entry_ref(entry)?.parent {
            self.detach_entry(old, entry);
        }
        self.add_entry(new_parent, entry)
    }

    fn unlink_entry(&mut self, group: GroupId, entry: EntryId) -> bool {
        let Some(g) = self.groups.get_mut(group.0) else {
            return false;
        };
        let Some(pos) = g.entries.iter().position(|&e| e == entry) else {
            debug!(%group, %entry, "entry not present, nothing to remove");
            return false;
        };
        g.entries.remove(pos);
        true
    }

    // ------------------------------------------------------------------
    // Stamped edits
    // ------------------------------------------------------------------

    /// Applies `edit` to the group and records the modification time.
    #[instrument(level = "debug", skip(self, edit))]
    pub fn edit_group(&mut self, id: GroupId, edit: impl FnOnce(&mut Group)) -> DomainResult<()> {
        let group = self
            .groups
            .get_mut(id.0)
            .ok_or(DomainError::UnknownGroup(id))?;
        edit(group);
        group.times.touch(Utc::now());
        Ok(())
    }

    /// Applies `edit` to the entry and records the modification time.
    #[instrument(level = "debug", skip(self, edit))]
    pub fn edit_entry(&mut self, id: EntryId, edit: impl FnOnce(&mut Entry)) -> DomainResult<()> {
        let entry = self
            .entries
            .get_mut(id.0)
            .ok_or(DomainError::UnknownEntry(id))?;
        edit(entry);
        entry.times.touch(Utc::now());
        Ok(())
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Groups reachable from the root, depth-first pre-order.
    pub fn iter(&self) -> GroupIter<'_> {
        GroupIter::new(self, self.root)
    }

    /// Groups below and including `start`, depth-first pre-order.
    pub fn iter_from(&self, start: GroupId) -> GroupIter<'_> {
        GroupIter::new(self, Some(start))
    }

    /// Groups reachable from the root, children before their parent.
    pub fn iter_postorder(&self) -> PostOrderIter<'_> {
        PostOrderIter::new(self, self.root)
    }

    /// Entries in depth-first group order.
    pub fn iter_entries(&self) -> impl Iterator<Item = (EntryId, &Entry)> + '_ {
        self.iter().flat_map(move |(_, group)| {
            group
                .entries
                .iter()
                .filter_map(move |&id| self.entry(id).map(|entry| (id, entry)))
        })
    }

    /// Parent, grandparent, ... up to the root (or the top of a detached subtree).
    pub fn ancestors(&self, id: GroupId) -> impl Iterator<Item = GroupId> + '_ {
        std::iter::successors(self.group(id).and_then(Group::parent), move |&g| {
            self.group(g).and_then(Group::parent)
        })
    }

    pub fn is_ancestor(&self, ancestor: GroupId, node: GroupId) -> bool {
        self.ancestors(node).any(|g| g == ancestor)
    }

    /// Group names from the top of the tree down to `id`.
    pub fn path(&self, id: GroupId) -> Vec<String> {
        let mut names: Vec<String> = self
            .ancestors(id)
            .filter_map(|g| self.group(g).map(|group| group.name.clone()))
            .collect();
        names.reverse();
        if let Some(group) = self.group(id) {
            names.push(group.name.clone());
        }
        names
    }

    /// Number of levels below and including the root, 0 for an empty tree.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack: Vec<(GroupId, usize)> =
            self.root.map(|root| (root, 1)).into_iter().collect();
        while let Some((id, level)) = stack.pop() {
            if let Some(group) = self.group(id) {
                deepest = deepest.max(level);
                stack.extend(group.groups.iter().map(|&child| (child, level + 1)));
            }
        }
        deepest
    }

    /// Number of groups reachable from the root, root included.
    pub fn group_count(&self) -> usize {
        self.iter().count()
    }

    /// Number of entries reachable from the root.
    pub fn entry_count(&self) -> usize {
        self.iter().map(|(_, group)| group.entries.len()).sum()
    }

    /// Reachable entries whose expiry time is at or before `now`.
    #[instrument(level = "debug", skip(self))]
    pub fn expired_entries(&self, now: DateTime<Utc>) -> Vec<EntryId> {
        self.iter_entries()
            .filter(|(_, entry)| entry.times.is_expired(now))
            .map(|(id, _)| id)
            .collect()
    }
}

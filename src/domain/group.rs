use std::fmt;

use generational_arena::Index;

use crate::domain::{EntryId, Times};

/// Handle of a group stored in a [`KdbTree`](crate::domain::KdbTree).
///
/// Handles are generational: once a group is released every copy of its
/// handle stops resolving, even if the slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(pub(crate) Index);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (slot, generation) = self.0.into_raw_parts();
        write!(f, "group#{slot}.{generation}")
    }
}

/// Where a group sits relative to the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placement {
    /// The tree's root; never has a parent.
    Root,
    /// Owned by the given group's `groups` sequence.
    Child(GroupId),
    /// Allocated but not reachable from the root.
    #[default]
    Detached,
}

/// Internal tree node: metadata plus ordered child groups and entries.
///
/// Content fields are public; the back-reference and child sequences are
/// only changed by the tree's structural operations.
#[derive(Debug, Clone, Default)]
pub struct Group {
    pub image: u32,
    pub name: String,
    pub times: Times,
    pub(crate) placement: Placement,
    pub(crate) groups: Vec<GroupId>,
    pub(crate) entries: Vec<EntryId>,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_image(mut self, image: u32) -> Self {
        self.image = image;
        self
    }

    pub fn with_times(mut self, times: Times) -> Self {
        self.times = times;
        self
    }

    /// The owning group, `None` for the root and for detached groups.
    pub fn parent(&self) -> Option<GroupId> {
        match self.placement {
            Placement::Child(parent) => Some(parent),
            Placement::Root | Placement::Detached => None,
        }
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub fn is_root(&self) -> bool {
        self.placement == Placement::Root
    }

    pub fn is_detached(&self) -> bool {
        self.placement == Placement::Detached
    }

    /// Child groups in display order.
    pub fn groups(&self) -> &[GroupId] {
        &self.groups
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[EntryId] {
        &self.entries
    }
}

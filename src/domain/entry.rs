use std::fmt;

use generational_arena::Index;

use crate::domain::{GroupId, Times};

/// Handle of an entry stored in a [`KdbTree`](crate::domain::KdbTree).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId(pub(crate) Index);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (slot, generation) = self.0.into_raw_parts();
        write!(f, "entry#{slot}.{generation}")
    }
}

/// Leaf record holding one set of credential fields.
///
/// All text fields are opaque and independently settable. Changing a field
/// does not touch `times`; use [`KdbTree::edit_entry`](crate::domain::KdbTree::edit_entry)
/// for a stamped edit.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Entry {
    pub image: u32,
    pub title: String,
    pub username: String,
    pub password: String,
    pub url: String,
    pub notes: String,
    pub times: Times,
    pub(crate) parent: Option<GroupId>,
}

impl Entry {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// The owning group, `None` while detached.
    pub fn parent(&self) -> Option<GroupId> {
        self.parent
    }
}

// Passwords stay out of debug output and therefore out of trace logs.
impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("image", &self.image)
            .field("title", &self.title)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("url", &self.url)
            .field("notes", &self.notes)
            .field("times", &self.times)
            .field("parent", &self.parent)
            .finish()
    }
}

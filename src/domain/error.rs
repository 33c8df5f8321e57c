//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::{EntryId, GroupId};

/// Domain errors represent violations of the tree's ownership rules.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unknown group: {0}")]
    UnknownGroup(GroupId),

    #[error("unknown entry: {0}")]
    UnknownEntry(EntryId),

    #[error("group {0} is already attached to a parent")]
    GroupAlreadyAttached(GroupId),

    #[error("entry {0} is already attached to a group")]
    EntryAlreadyAttached(EntryId),

    #[error("root group {0} cannot be attached below another group")]
    RootNotAttachable(GroupId),

    #[error("root group {0} cannot be removed, install a new root instead")]
    RootNotRemovable(GroupId),

    #[error("attaching group {child} below {parent} would create a cycle")]
    CycleDetected { parent: GroupId, child: GroupId },
}

pub type DomainResult<T> = Result<T, DomainError>;

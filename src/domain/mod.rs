//! Domain layer: the group/entry tree and its ownership rules
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod entry;
pub mod error;
pub mod group;
pub mod iter;
pub mod snapshot;
pub mod times;
pub mod tree;

pub use entry::{Entry, EntryId};
pub use error::{DomainError, DomainResult};
pub use group::{Group, GroupId, Placement};
pub use iter::{GroupIter, PostOrderIter};
pub use snapshot::{EntrySnapshot, GroupSnapshot};
pub use times::Times;
pub use tree::{KdbTree, NodeDefaults};

//! In-memory group/entry tree for password databases.
//!
//! Groups nest recursively and own their entries; every child keeps a
//! non-owning handle back to its parent. All nodes live in a
//! [`KdbTree`](domain::KdbTree), which owns the root and hands out
//! generational handles, so releasing a subtree invalidates every handle
//! into it.
//!
//! ```
//! use kdbtree::domain::KdbTree;
//!
//! let mut tree = KdbTree::new();
//! let root = tree.create_group(None).unwrap();
//! let bank = tree.create_group(Some(root)).unwrap();
//! let entry = tree.create_entry(Some(bank)).unwrap();
//! tree.entry_mut(entry).unwrap().title = "Bank".into();
//!
//! assert_eq!(tree.entry(entry).unwrap().parent(), Some(bank));
//! assert!(tree.delete_entry(bank, entry));
//! assert!(tree.delete_group(root, bank));
//! assert!(tree.root_group().unwrap().groups().is_empty());
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;

pub use domain::{
    DomainError, DomainResult, Entry, EntryId, Group, GroupId, KdbTree, NodeDefaults, Placement,
    Times,
};

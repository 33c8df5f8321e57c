//! Outline file service
//!
//! Loads, writes and summarizes outline files through the FileSystem boundary.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};

use crate::application::outline::{parse_outline, render_outline};
use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{EntryId, KdbTree, NodeDefaults};
use crate::infrastructure::traits::FileSystem;

/// Shape of a tree at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeStats {
    pub groups: usize,
    pub entries: usize,
    pub depth: usize,
    pub expired: usize,
}

/// Service for reading and writing outline files.
pub struct OutlineService {
    fs: Arc<dyn FileSystem>,
    defaults: NodeDefaults,
}

impl OutlineService {
    pub fn new(fs: Arc<dyn FileSystem>, defaults: NodeDefaults) -> Self {
        Self { fs, defaults }
    }

    /// Read an outline file and rebuild its tree.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> ApplicationResult<KdbTree> {
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read outline", path)?;
        let snapshot = parse_outline(&content, path)?;
        let tree = KdbTree::from_snapshot(&snapshot, self.defaults)?;
        debug!(
            "load: {} groups, {} entries",
            tree.group_count(),
            tree.entry_count()
        );
        Ok(tree)
    }

    /// Write `tree` to `path`, replacing any existing file.
    #[instrument(level = "debug", skip(self, tree))]
    pub fn save(&self, path: &Path, tree: &KdbTree) -> ApplicationResult<()> {
        let content = render_outline(tree)?;
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            self.fs
                .create_dir_all(dir)
                .with_path_context("create directory", dir)?;
        }
        self.fs
            .write(path, &content)
            .with_path_context("write outline", path)
    }

    /// Create a new outline holding only a root group named `name`.
    ///
    /// Refuses to overwrite an existing file.
    #[instrument(level = "debug", skip(self))]
    pub fn init(&self, path: &Path, name: &str) -> ApplicationResult<KdbTree> {
        if self.fs.exists(path) {
            return Err(ApplicationError::OutlineExists(path.to_path_buf()));
        }
        let mut tree = KdbTree::with_defaults(self.defaults);
        let root = tree.create_group(None)?;
        if let Some(group) = tree.group_mut(root) {
            group.name = name.to_string();
        }
        self.save(path, &tree)?;
        info!("initialized outline {}", path.display());
        Ok(tree)
    }

    pub fn stats(&self, tree: &KdbTree, now: DateTime<Utc>) -> TreeStats {
        TreeStats {
            groups: tree.group_count(),
            entries: tree.entry_count(),
            depth: tree.depth(),
            expired: tree.expired_entries(now).len(),
        }
    }

    /// Expired entries with the slash-joined path of their group.
    pub fn expired_with_paths(
        &self,
        tree: &KdbTree,
        now: DateTime<Utc>,
    ) -> Vec<(EntryId, String)> {
        use itertools::Itertools;

        tree.expired_entries(now)
            .into_iter()
            .map(|id| {
                let path = tree
                    .entry(id)
                    .and_then(|entry| entry.parent())
                    .map(|group| tree.path(group).iter().join("/"))
                    .unwrap_or_default();
                (id, path)
            })
            .collect()
    }
}

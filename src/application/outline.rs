//! Plaintext TOML outlines of a tree
//!
//! An outline is a [`GroupSnapshot`] rendered as TOML: the document itself is
//! the root group, sub-groups nest as `[[groups]]` and entries as `[[entries]]`.
//! Outlines are an inspection aid and carry passwords in clear text.

use std::path::Path;

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{DomainError, GroupSnapshot, KdbTree};

/// Parse outline text. `origin` is only used for error messages.
#[instrument(level = "debug", skip(content))]
pub fn parse_outline(content: &str, origin: &Path) -> ApplicationResult<GroupSnapshot> {
    let snapshot: GroupSnapshot =
        toml::from_str(content).map_err(|e| ApplicationError::Outline {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })?;
    debug!(
        groups = snapshot.group_count(),
        entries = snapshot.entry_count(),
        "outline parsed"
    );
    Ok(snapshot)
}

pub fn render_snapshot(snapshot: &GroupSnapshot) -> ApplicationResult<String> {
    toml::to_string_pretty(snapshot).map_err(render_failed)
}

fn render_failed(e: toml::ser::Error) -> ApplicationError {
    ApplicationError::OperationFailed {
        context: "serialize outline".to_string(),
        source: Box::new(e),
    }
}

/// Render everything reachable from the tree's root.
pub fn render_outline(tree: &KdbTree) -> ApplicationResult<String> {
    let snapshot = tree.snapshot().ok_or_else(|| {
        DomainError::InvalidArgument("cannot render a tree without a root".to_string())
    })?;
    render_snapshot(&snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NodeDefaults;

    const OUTLINE: &str = r#"
name = "Root"
image = 48

[[entries]]
title = "Router"
password = "admin"

[[groups]]
name = "Banking"

[groups.times]
creation = "2024-01-15T10:00:00Z"
expiry = "2026-01-01T00:00:00Z"

[[groups.entries]]
title = "Bank"
username = "alice"
url = "https://bank.example.com"

[[groups]]
name = "Mail"
"#;

    #[test]
    fn test_parse_outline_reads_nesting_and_order() {
        let snapshot = parse_outline(OUTLINE, Path::new("vault.toml")).unwrap();
        assert_eq!(snapshot.name, "Root");
        assert_eq!(snapshot.image, 48);
        assert_eq!(snapshot.entries[0].title, "Router");
        assert_eq!(snapshot.groups.len(), 2);
        assert_eq!(snapshot.groups[0].name, "Banking");
        assert_eq!(snapshot.groups[0].entries[0].username, "alice");
        assert!(snapshot.groups[0].times.creation.is_some());
        assert!(snapshot.groups[0].times.last_access.is_none());
        assert_eq!(snapshot.groups[1].name, "Mail");
    }

    #[test]
    fn test_parse_outline_reports_origin() {
        let err = parse_outline("name = [", Path::new("broken.toml")).unwrap_err();
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn test_render_then_parse_is_identical() {
        let snapshot = parse_outline(OUTLINE, Path::new("vault.toml")).unwrap();
        let tree = KdbTree::from_snapshot(&snapshot, NodeDefaults::default()).unwrap();
        let rendered = render_outline(&tree).unwrap();
        let reparsed = parse_outline(&rendered, Path::new("rendered.toml")).unwrap();
        assert_eq!(reparsed, snapshot);
    }

    #[test]
    fn test_render_failure_is_not_a_config_error() {
        let cause = <toml::ser::Error as serde::ser::Error>::custom("unsupported value");
        let err = render_failed(cause);
        assert!(matches!(err, ApplicationError::OperationFailed { .. }));
        assert!(err.to_string().contains("serialize outline"));
    }

    #[test]
    fn test_render_outline_without_root_fails() {
        let err = render_outline(&KdbTree::new()).unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::Domain(DomainError::InvalidArgument(_))
        ));
    }
}

//! Snapshot diff computation engine.
//!
//! The entry point is [`compute_changes`], which compares an optional previous
//! snapshot against the current one over the union of their paths.

use crate::diff::archive::ArchivedContent;
use crate::diff::model::{ChangeSet, ChangeType, DiffStats, RawChange};
use crate::diff::preview::{changed_lines, unified_diff};
use crate::errors::Result;
use crate::snapshot::model::{PageMetadata, Snapshot};
use crate::{log_op_degraded, log_op_end, log_op_error, log_op_start};
use std::collections::BTreeSet;
use std::time::Instant;

/// Classify a single path by presence and hash equality.
fn classify_presence(old: Option<&PageMetadata>, new: Option<&PageMetadata>) -> ChangeType {
    match (old, new) {
        (None, _) => ChangeType::Added,
        (Some(_), None) => ChangeType::Removed,
        (Some(a), Some(b)) if a.content_hash == b.content_hash => ChangeType::Unchanged,
        (Some(_), Some(_)) => ChangeType::Modified,
    }
}

/// Fetch one side of a modified page; `Ok(None)` when it was never archived.
fn fetch_optional(
    archive: &dyn ArchivedContent,
    path: &str,
    content_hash: &str,
) -> Result<Option<String>> {
    match archive.fetch(content_hash) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind().is_degradable() => {
            log_op_degraded!(
                "compute_changes",
                &e,
                path = %path,
                content_hash = %content_hash,
                "archived content unavailable, omitting diff preview"
            );
            Ok(None)
        }
        Err(e) => Err(e.with_path(path)),
    }
}

/// Compute the raw change set between `old` (absent on a first build) and `new`.
///
/// Every path in the union of both manifests is classified:
///
/// | previous | current | result |
/// |---|---|---|
/// | absent | present | Added |
/// | present | absent | Removed |
/// | same hash | same hash | Unchanged (counted, not emitted) |
/// | hash A | hash B | Modified |
///
/// For Modified pages, if `archive` holds the raw text of both sides, the
/// change carries a unified diff and its changed lines. A page missing from
/// the archive simply has no diff.
///
/// # Errors
///
/// Propagates archive errors other than `ArchivedContentUnavailable`.
pub fn compute_changes(
    old: Option<&Snapshot>,
    new: &Snapshot,
    archive: Option<&dyn ArchivedContent>,
) -> Result<ChangeSet> {
    let start = Instant::now();
    let previous_id = old.map(|s| s.id().to_string());
    log_op_start!(
        "compute_changes",
        snapshot_id = %new.id(),
        previous_snapshot_id = ?previous_id
    );

    match diff_paths(old, new, archive) {
        Ok((changes, stats)) => {
            log_op_end!(
                "compute_changes",
                duration_ms = start.elapsed().as_millis() as u64,
                snapshot_id = %new.id(),
                change_count = changes.len(),
                added = stats.added,
                modified = stats.modified,
                removed = stats.removed,
                unchanged = stats.unchanged
            );
            Ok(ChangeSet {
                previous_snapshot: previous_id,
                current_snapshot: new.id().to_string(),
                changes,
                stats,
            })
        }
        Err(e) => {
            log_op_error!(
                "compute_changes",
                &e,
                duration_ms = start.elapsed().as_millis() as u64
            );
            Err(e)
        }
    }
}

fn diff_paths(
    old: Option<&Snapshot>,
    new: &Snapshot,
    archive: Option<&dyn ArchivedContent>,
) -> Result<(Vec<RawChange>, DiffStats)> {
    let mut all_paths: BTreeSet<&str> = new.paths().collect();
    if let Some(old) = old {
        all_paths.extend(old.paths());
    }

    let mut stats = DiffStats::default();
    let mut changes = Vec::new();

    // BTreeSet iteration keeps the output sorted by path
    for path in all_paths {
        let old_meta = old.and_then(|s| s.page(path));
        let new_meta = new.page(path);
        let change_type = classify_presence(old_meta, new_meta);
        stats.record(change_type);

        if change_type == ChangeType::Unchanged {
            continue;
        }

        let mut change = RawChange {
            path: path.to_string(),
            change_type,
            old_hash: old_meta.map(|m| m.content_hash.clone()),
            new_hash: new_meta.map(|m| m.content_hash.clone()),
            old_token_count: old_meta.map(|m| m.token_count),
            new_token_count: new_meta.map(|m| m.token_count),
            old_title: old_meta.map(|m| m.title.clone()),
            new_title: new_meta.map(|m| m.title.clone()),
            diff_text: None,
            unified_diff: None,
        };

        if let (ChangeType::Modified, Some(archive), Some(a), Some(b)) =
            (change_type, archive, old_meta, new_meta)
        {
            let old_text = fetch_optional(archive, path, &a.content_hash)?;
            let new_text = fetch_optional(archive, path, &b.content_hash)?;
            if let (Some(old_text), Some(new_text)) = (old_text, new_text) {
                change.diff_text = Some(changed_lines(&old_text, &new_text));
                change.unified_diff = Some(unified_diff(&old_text, &new_text));
            }
        }

        changes.push(change);
    }

    debug_assert_eq!(
        stats.total(),
        changes.len() + stats.unchanged,
        "every compared path must be counted exactly once"
    );

    Ok((changes, stats))
}

/// Internal sanity check used by tests: stats agree with the emitted list.
#[cfg(test)]
fn stats_match(change_set: &ChangeSet) -> bool {
    let mut recount = DiffStats {
        unchanged: change_set.stats.unchanged,
        ..DiffStats::default()
    };
    for c in &change_set.changes {
        recount.record(c.change_type);
    }
    recount == change_set.stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ExError, ExErrorKind};
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeMap;

    fn page(hash: &str, tokens: u64) -> PageMetadata {
        PageMetadata {
            content_hash: hash.to_string(),
            token_count: tokens,
            title: format!("Title {}", hash),
            tags: Vec::new(),
        }
    }

    fn snapshot(id: &str, pages: &[(&str, &str, u64)]) -> Snapshot {
        let manifest = pages
            .iter()
            .map(|(p, h, t)| (p.to_string(), page(h, *t)))
            .collect();
        Snapshot::new(
            id,
            Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            BTreeMap::new(),
            manifest,
        )
    }

    struct FailingArchive;

    impl ArchivedContent for FailingArchive {
        fn fetch(&self, _content_hash: &str) -> Result<String> {
            Err(ExError::new(ExErrorKind::Io).with_message("disk on fire"))
        }
    }

    #[test]
    fn test_presence_table() {
        let a = page("h1", 1);
        let b = page("h2", 1);
        assert_eq!(classify_presence(None, Some(&a)), ChangeType::Added);
        assert_eq!(classify_presence(Some(&a), None), ChangeType::Removed);
        assert_eq!(classify_presence(Some(&a), Some(&a)), ChangeType::Unchanged);
        assert_eq!(classify_presence(Some(&a), Some(&b)), ChangeType::Modified);
    }

    #[test]
    fn test_output_sorted_by_path() {
        let old = snapshot("s1", &[("m.md", "h1", 1), ("c.md", "h2", 1)]);
        let new = snapshot("s2", &[("z.md", "h3", 1), ("a.md", "h4", 1), ("c.md", "h5", 1)]);
        let set = compute_changes(Some(&old), &new, None).unwrap();
        let paths: Vec<&str> = set.changes.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(paths, vec!["a.md", "c.md", "m.md", "z.md"]);
        assert!(stats_match(&set));
    }

    #[test]
    fn test_preview_attached_when_archived() {
        let old = snapshot("s1", &[("a.md", "h1", 10)]);
        let new = snapshot("s2", &[("a.md", "h2", 11)]);
        let mut archive = BTreeMap::new();
        archive.insert("h1".to_string(), "limit: 10\n".to_string());
        archive.insert("h2".to_string(), "limit: 20\n".to_string());
        let set = compute_changes(Some(&old), &new, Some(&archive)).unwrap();
        let change = &set.changes[0];
        assert_eq!(change.diff_text.as_deref(), Some("-limit: 10\n+limit: 20\n"));
        assert!(change.unified_diff.as_deref().unwrap().contains("+limit: 20"));
    }

    #[test]
    fn test_missing_archive_side_degrades() {
        let old = snapshot("s1", &[("a.md", "h1", 10)]);
        let new = snapshot("s2", &[("a.md", "h2", 11)]);
        let mut archive = BTreeMap::new();
        archive.insert("h2".to_string(), "only new side".to_string());
        let set = compute_changes(Some(&old), &new, Some(&archive)).unwrap();
        assert_eq!(set.stats.modified, 1);
        assert!(set.changes[0].diff_text.is_none());
        assert!(set.changes[0].unified_diff.is_none());
    }

    #[test]
    fn test_hard_archive_error_propagates() {
        let old = snapshot("s1", &[("a.md", "h1", 10)]);
        let new = snapshot("s2", &[("a.md", "h2", 11)]);
        let err = compute_changes(Some(&old), &new, Some(&FailingArchive)).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Io);
        assert_eq!(err.path(), Some("a.md"));
    }

    #[test]
    fn test_archive_not_consulted_for_added_or_removed() {
        let old = snapshot("s1", &[("gone.md", "h1", 10)]);
        let new = snapshot("s2", &[("new.md", "h2", 11)]);
        let set = compute_changes(Some(&old), &new, Some(&FailingArchive)).unwrap();
        assert_eq!(set.stats.added, 1);
        assert_eq!(set.stats.removed, 1);
    }
}

use async_trait::async_trait;
use git_revloc::core::{
    error::Result, CommitChanges, CommitKind, Locator, Patch, RevisionUri, RevlocError,
    VcsBackend, UNCOMMITTED_SHA,
};
use std::sync::atomic::{AtomicUsize, Ordering};

mod common;
use common::fixtures::*;

/// First call answers after one yield; every later call fails after five.
#[derive(Default)]
struct SlowFailingBackend {
    calls: AtomicUsize,
}

#[async_trait]
impl VcsBackend for SlowFailingBackend {
    fn is_trackable(&self, _locator: &Locator) -> bool {
        true
    }

    fn resolve_repository_root(&self, _path: &str) -> Result<String> {
        Ok("/repo".to_string())
    }

    async fn resolve_reference(
        &self,
        _repo_path: &str,
        reference: &str,
        _file: Option<&RevisionUri>,
    ) -> Result<String> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
            return Ok(PARENT_SHA.to_string());
        }
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
        Err(RevlocError::reference_not_found(reference))
    }
}

/// Never answers.
struct StalledBackend;

#[async_trait]
impl VcsBackend for StalledBackend {
    fn is_trackable(&self, _locator: &Locator) -> bool {
        true
    }

    fn resolve_repository_root(&self, _path: &str) -> Result<String> {
        Ok("/repo".to_string())
    }

    async fn resolve_reference(
        &self,
        _repo_path: &str,
        _reference: &str,
        _file: Option<&RevisionUri>,
    ) -> Result<String> {
        std::future::pending::<Result<String>>().await
    }
}

#[cfg(test)]
mod commit_record_tests {
    use super::*;

    #[tokio::test]
    async fn test_resolution_is_memoized() -> anyhow::Result<()> {
        let backend = ScriptedBackend::with_root("/repo");
        backend.answer(&format!("{SHA}^"), PARENT_SHA);
        let commit = renamed_file_commit();

        assert_eq!(commit.previous_file_sha(), format!("{SHA}^"));
        assert_eq!(commit.resolve_previous_file_sha(&backend).await?, PARENT_SHA);
        assert_eq!(commit.resolve_previous_file_sha(&backend).await?, PARENT_SHA);

        assert_eq!(backend.calls(), 1);
        assert_eq!(commit.previous_file_sha(), PARENT_SHA);
        assert_eq!(commit.previous_short_sha(), "cafebab");
        assert!(!commit.is_resolving_previous());
        Ok(())
    }

    #[tokio::test]
    async fn test_resolution_passes_previous_file() -> anyhow::Result<()> {
        let backend = ScriptedBackend::with_root("/repo");
        backend.answer(&format!("{SHA}^"), PARENT_SHA);

        renamed_file_commit()
            .resolve_previous_file_sha(&backend)
            .await?;
        assert_eq!(backend.last_file().as_deref(), Some("/repo/src/old.rs"));
        Ok(())
    }

    #[tokio::test]
    async fn test_branch_resolution_has_no_file() -> anyhow::Result<()> {
        let backend = ScriptedBackend::with_root("/repo");
        backend.answer(&format!("{SHA}^"), PARENT_SHA);
        let commit = renamed_file_commit().with_changes(CommitChanges {
            kind: Some(CommitKind::Branch),
            ..Default::default()
        });

        assert_eq!(commit.resolve_previous_file_sha(&backend).await?, PARENT_SHA);
        assert_eq!(backend.last_file(), None);
        Ok(())
    }

    #[tokio::test]
    async fn test_set_previous_sha_forces_new_resolution() -> anyhow::Result<()> {
        let backend = ScriptedBackend::with_root("/repo");
        backend.answer(&format!("{SHA}^"), PARENT_SHA);
        backend.answer("HEAD~3", "1111111111111111111111111111111111111111");
        let mut commit = renamed_file_commit();

        commit.resolve_previous_file_sha(&backend).await?;
        commit.set_previous_sha(Some("HEAD~3".to_string()));
        assert_eq!(commit.resolved_previous_file_sha(), None);
        assert_eq!(commit.previous_file_sha(), "HEAD~3");

        let resolved = commit.resolve_previous_file_sha(&backend).await?;
        assert_eq!(resolved, "1111111111111111111111111111111111111111");
        assert_eq!(backend.calls(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_resolution_is_retried() -> anyhow::Result<()> {
        let backend = ScriptedBackend::with_root("/repo");
        let commit = renamed_file_commit();

        let err = commit.resolve_previous_file_sha(&backend).await.unwrap_err();
        assert!(matches!(err, RevlocError::ReferenceNotFound { .. }));
        assert_eq!(commit.resolved_previous_file_sha(), None);
        assert!(!commit.is_resolving_previous());

        backend.answer(&format!("{SHA}^"), PARENT_SHA);
        assert_eq!(commit.resolve_previous_file_sha(&backend).await?, PARENT_SHA);
        assert_eq!(backend.calls(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_stash_resolves_from_stash_name() -> anyhow::Result<()> {
        let backend = ScriptedBackend::with_root("/repo");
        backend.answer("stash@{2}^", PARENT_SHA);
        let commit = renamed_file_commit().with_changes(CommitChanges {
            kind: Some(CommitKind::StashFile {
                stash_name: "stash@{2}".to_string(),
            }),
            ..Default::default()
        });

        assert_eq!(commit.resolve_previous_file_sha(&backend).await?, PARENT_SHA);
        Ok(())
    }

    #[tokio::test]
    async fn test_with_changes_starts_with_empty_caches() -> anyhow::Result<()> {
        let backend = ScriptedBackend::with_root("/repo");
        backend.answer(&format!("{SHA}^"), PARENT_SHA);
        let commit = renamed_file_commit();
        commit.resolve_previous_file_sha(&backend).await?;

        let copy = commit.with_changes(CommitChanges {
            sha: Some(UNCOMMITTED_SHA.to_string()),
            ..Default::default()
        });
        assert_eq!(copy.resolved_previous_file_sha(), None);
        assert!(copy.is_uncommitted());
        assert!(!commit.is_uncommitted());
        Ok(())
    }

    #[test]
    fn test_with_changes_clear_only_touches_that_field() {
        let commit = renamed_file_commit();
        let changed = commit.with_changes(CommitChanges {
            previous_file_name: Patch::Clear,
            ..Default::default()
        });

        assert_eq!(changed.previous_file_name(), None);
        assert_eq!(changed.original_file_name(), Some("src/old.rs"));
        assert_eq!(changed.working_file_name(), Some("src/new.rs"));
        assert_eq!(changed.file_name(), "src/new.rs");
        assert_eq!(changed.sha(), commit.sha());
        assert_eq!(changed.date(), commit.date());
        assert_eq!(changed.previous_uri().path(), "/repo/src/old.rs");
    }

    #[test]
    fn test_record_locator_round_trip() -> anyhow::Result<()> {
        let commit = renamed_file_commit();
        let locator = commit.to_revision_locator();
        let decoded = git_revloc::RevisionUri::new(&locator)?;

        let current = commit.uri();
        assert_eq!(decoded.path(), current.path());
        assert_eq!(decoded.repo_path(), current.repo_path());
        assert_eq!(decoded.sha(), current.sha());
        assert_eq!(decoded.short_sha().as_deref(), Some("deadbee"));
        Ok(())
    }

    #[test]
    fn test_formatted_date_keeps_commit_offset() {
        let commit = renamed_file_commit();
        assert_eq!(commit.format_date("%Y-%m-%d %H:%M %z"), "2024-03-05 14:07 +0200");
        assert_eq!(
            commit.format_date(git_revloc::core::formatting::DEFAULT_DATE_FORMAT),
            "March 5, 2024 2:07pm"
        );
    }

    #[tokio::test]
    async fn test_overlapping_failure_keeps_stored_value() -> anyhow::Result<()> {
        let backend = SlowFailingBackend::default();
        let commit = renamed_file_commit();

        let (first, second) = tokio::join!(
            commit.resolve_previous_file_sha(&backend),
            commit.resolve_previous_file_sha(&backend)
        );
        // one call answers, the other fails after it
        let answered: Vec<String> = [first, second].into_iter().filter_map(|r| r.ok()).collect();
        assert_eq!(answered, [PARENT_SHA]);

        assert_eq!(commit.resolved_previous_file_sha().as_deref(), Some(PARENT_SHA));
        assert!(!commit.is_resolving_previous());
        assert_eq!(commit.resolve_previous_file_sha(&backend).await?, PARENT_SHA);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_dropped_resolution_returns_to_unresolved() -> anyhow::Result<()> {
        let commit = renamed_file_commit();

        let mut pending = Box::pin(commit.resolve_previous_file_sha(&StalledBackend));
        tokio::select! {
            biased;
            _ = &mut pending => panic!("stalled backend answered"),
            _ = std::future::ready(()) => {}
        }
        assert!(commit.is_resolving_previous());

        drop(pending);
        assert!(!commit.is_resolving_previous());
        assert_eq!(commit.resolved_previous_file_sha(), None);

        let backend = ScriptedBackend::with_root("/repo");
        backend.answer(&format!("{SHA}^"), PARENT_SHA);
        assert_eq!(commit.resolve_previous_file_sha(&backend).await?, PARENT_SHA);
        Ok(())
    }
}

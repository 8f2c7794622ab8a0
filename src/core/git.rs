//! Git repository access through `git2`.
//!
//! This module provides the two git-facing pieces of the crate:
//!
//! - [`GitBackend`]: the [`VcsBackend`] implementation used to decode locators
//!   and resolve previous revisions. It holds no repository handle and opens
//!   the repository named by each call.
//! - [`GitRepo`]: a history reader that turns commits into [`CommitRecord`]s
//!   (file history with rename following, branch log, stash list).
//!
//! # Reference resolution
//! A reference is resolved with `revparse_single` and peeled to a commit.
//! When a file is given, the walk continues from that commit to the newest
//! ancestor that changed the file. git2's `NotFound` and `Ambiguous` codes map
//! onto [`RevlocError::ReferenceNotFound`] and [`RevlocError::AmbiguousReference`].

use crate::core::{
    backend::{is_trackable_scheme, VcsBackend},
    commit::{CommitData, CommitKind, CommitRecord},
    error::{Result, RevlocError},
    locator::Locator,
    paths,
    revision::is_uncommitted,
    revision_uri::RevisionUri,
};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Offset, Utc};
use git2::{Commit, Delta, DiffFindOptions, Oid, Repository, Sort, Tree};
use std::path::Path;

/// Repository root (working directory) of an opened repository, normalized.
fn workdir_of(repo: &Repository, searched: &str) -> Result<String> {
    let workdir = repo
        .workdir()
        .ok_or_else(|| RevlocError::repository_not_found(searched))?;
    let workdir = workdir.to_str().ok_or(RevlocError::InvalidUtf8Path)?;
    Ok(paths::normalize(workdir))
}

fn commit_date(commit: &Commit<'_>) -> DateTime<FixedOffset> {
    let when = commit.author().when();
    let offset = FixedOffset::east_opt(when.offset_minutes() * 60).unwrap_or_else(|| Utc.fix());
    DateTime::from_timestamp(when.seconds(), 0)
        .unwrap_or_default()
        .with_timezone(&offset)
}

/// Blob id of `file_name` in `tree`, if present.
fn entry_id(tree: &Tree<'_>, file_name: &str) -> Option<Oid> {
    tree.get_path(Path::new(file_name)).ok().map(|entry| entry.id())
}

/// Whether `commit` changed `file_name` relative to its first parent.
fn touches_file(commit: &Commit<'_>, file_name: &str) -> Result<bool> {
    let current = entry_id(&commit.tree()?, file_name);
    let previous = match commit.parents().next() {
        Some(parent) => entry_id(&parent.tree()?, file_name),
        None => None,
    };
    Ok(current.is_some() && current != previous)
}

/// Resolve `reference` inside `repo`, optionally to the newest commit that
/// changed `file_name`.
fn resolve_in_repo(repo: &Repository, reference: &str, file_name: Option<&str>) -> Result<String> {
    // The working copy's parent is whatever HEAD is
    let target = if is_uncommitted(reference) {
        "HEAD"
    } else {
        reference
    };

    let commit = repo
        .revparse_single(target)
        .and_then(|object| object.peel_to_commit())
        .map_err(|e| RevlocError::from_revparse(reference, e))?;

    let Some(file_name) = file_name else {
        return Ok(commit.id().to_string());
    };

    let mut walk = repo.revwalk()?;
    walk.push(commit.id())?;
    walk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
    for oid in walk {
        let candidate = repo.find_commit(oid?)?;
        if touches_file(&candidate, file_name)? {
            return Ok(candidate.id().to_string());
        }
    }

    Err(RevlocError::reference_not_found(format!(
        "{reference} -- {file_name}"
    )))
}

/// [`VcsBackend`] over `git2`.
#[derive(Debug, Default, Clone, Copy)]
pub struct GitBackend;

impl GitBackend {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl VcsBackend for GitBackend {
    fn is_trackable(&self, locator: &Locator) -> bool {
        is_trackable_scheme(locator)
    }

    fn resolve_repository_root(&self, path: &str) -> Result<String> {
        // Discovery needs an existing directory; deleted files still name one
        let mut start = Path::new(path);
        while !start.is_dir() {
            start = match start.parent() {
                Some(parent) => parent,
                None => return Err(RevlocError::repository_not_found(path)),
            };
        }

        let repo =
            Repository::discover(start).map_err(|_| RevlocError::repository_not_found(path))?;
        workdir_of(&repo, path)
    }

    async fn resolve_reference(
        &self,
        repo_path: &str,
        reference: &str,
        file: Option<&RevisionUri>,
    ) -> Result<String> {
        let repo =
            Repository::open(repo_path).map_err(|_| RevlocError::repository_not_found(repo_path))?;
        let root = workdir_of(&repo, repo_path)?;
        let file_name = file.map(|uri| paths::relative(&root, uri.path()));

        let resolved = resolve_in_repo(&repo, reference, file_name.as_deref())?;
        log::debug!("Resolved '{reference}' in {root} to {resolved}");
        Ok(resolved)
    }
}

pub struct GitRepo {
    repo: Repository,
    root: String,
}

impl GitRepo {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let searched = path.as_ref().to_string_lossy().to_string();
        let repo = Repository::discover(path)
            .map_err(|_| RevlocError::repository_not_found(searched.as_str()))?;
        let root = workdir_of(&repo, &searched)?;
        Ok(GitRepo { repo, root })
    }

    /// Normalized working directory of the repository.
    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn get_repository(&self) -> &Repository {
        &self.repo
    }

    /// Full commit id for a revision expression.
    pub fn resolve_revision(&self, reference: &str) -> Result<String> {
        resolve_in_repo(&self.repo, reference, None)
    }

    fn record(&self, commit: &Commit<'_>, kind: CommitKind, file_name: &str) -> CommitData {
        let author = commit.author();
        CommitData {
            kind,
            repo_path: self.root.clone(),
            sha: commit.id().to_string(),
            author: author.name().unwrap_or("").to_string(),
            date: commit_date(commit),
            message: commit.message().unwrap_or("").to_string(),
            file_name: file_name.to_string(),
            original_file_name: None,
            previous_file_name: None,
            previous_sha: commit.parent_id(0).ok().map(|id| id.to_string()),
            working_file_name: None,
        }
    }

    /// Name `file_name` had in `parent_tree` if `tree` renamed it.
    fn renamed_from(
        &self,
        parent_tree: &Tree<'_>,
        tree: &Tree<'_>,
        file_name: &str,
    ) -> Result<Option<String>> {
        let mut diff = self
            .repo
            .diff_tree_to_tree(Some(parent_tree), Some(tree), None)?;
        let mut find = DiffFindOptions::new();
        find.renames(true);
        diff.find_similar(Some(&mut find))?;

        for delta in diff.deltas() {
            if delta.status() == Delta::Renamed
                && delta.new_file().path() == Some(Path::new(file_name))
            {
                let old = delta
                    .old_file()
                    .path()
                    .and_then(|p| p.to_str())
                    .ok_or(RevlocError::InvalidUtf8Path)?;
                return Ok(Some(paths::normalize(old)));
            }
        }
        Ok(None)
    }

    /// Commits that changed `file_name` (relative to the root), newest first,
    /// following renames.
    pub fn file_history(&self, file_name: &str, limit: usize) -> Result<Vec<CommitRecord>> {
        let working_file_name = paths::normalize(file_name);
        let mut current = working_file_name.clone();
        let mut records = Vec::new();

        let mut walk = self.repo.revwalk()?;
        walk.push_head()?;
        walk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;

        for oid in walk {
            if records.len() >= limit {
                break;
            }

            let commit = self.repo.find_commit(oid?)?;
            let tree = commit.tree()?;
            let Some(blob) = entry_id(&tree, &current) else {
                continue;
            };

            let parent_tree = match commit.parents().next() {
                Some(parent) => Some(parent.tree()?),
                None => None,
            };
            let parent_blob = parent_tree
                .as_ref()
                .and_then(|parent| entry_id(parent, &current));
            if parent_blob == Some(blob) {
                continue;
            }

            let renamed_from = match (&parent_tree, parent_blob) {
                (Some(parent), None) => self.renamed_from(parent, &tree, &current)?,
                _ => None,
            };

            let mut data = self.record(&commit, CommitKind::File, &current);
            data.original_file_name = renamed_from.clone();
            data.previous_file_name = renamed_from.clone();
            data.working_file_name = Some(working_file_name.clone());
            records.push(CommitRecord::new(data));

            if let Some(old_name) = renamed_from {
                log::debug!("Following rename {old_name} -> {current} at {}", commit.id());
                current = old_name;
            }
        }

        log::debug!("Found {} commits for {working_file_name}", records.len());
        Ok(records)
    }

    /// Commits reachable from HEAD, newest first.
    pub fn branch_log(&self, limit: usize) -> Result<Vec<CommitRecord>> {
        let mut walk = self.repo.revwalk()?;
        walk.push_head()?;
        walk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;

        walk.take(limit)
            .map(|oid| {
                let commit = self.repo.find_commit(oid?)?;
                Ok(CommitRecord::new(self.record(&commit, CommitKind::Branch, "")))
            })
            .collect()
    }

    /// Stash entries as records named `stash@{n}`.
    pub fn stash_list(&mut self) -> Result<Vec<CommitRecord>> {
        let mut entries = Vec::new();
        self.repo.stash_foreach(|index, _message, oid| {
            entries.push((index, *oid));
            true
        })?;

        entries
            .into_iter()
            .map(|(index, oid)| {
                let commit = self.repo.find_commit(oid)?;
                let kind = CommitKind::Stash {
                    stash_name: format!("stash@{{{index}}}"),
                };
                Ok(CommitRecord::new(self.record(&commit, kind, "")))
            })
            .collect()
    }
}

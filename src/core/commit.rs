//! Commit records: one revision's association with one file.
//!
//! A [`CommitRecord`] is built by the history reader from git data and is
//! immutable apart from a few lazily filled caches:
//!
//! - short sha and staged/uncommitted flags, derived from the sha text once
//! - the resolved previous sha, filled by [`CommitRecord::resolve_previous_file_sha`]
//!   and cleared when [`CommitRecord::set_previous_sha`] changes its input
//! - formatted dates
//!
//! A record refers to its predecessor by id only. Nothing here builds or
//! retains a history graph.

use crate::core::{
    backend::VcsBackend,
    error::Result,
    formatting::{self, DEFAULT_PATH_SEPARATOR},
    locator::Locator,
    paths,
    revision::{is_staged_uncommitted, is_uncommitted, shorten_sha},
    revision_uri::{to_revision_uri, RevisionUri},
};
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, OnceLock};

/// What kind of listing a record came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommitKind {
    Blame,
    Branch,
    File,
    Stash { stash_name: String },
    StashFile { stash_name: String },
}

impl CommitKind {
    /// Records tied to a single file.
    pub fn is_file_scoped(&self) -> bool {
        matches!(
            self,
            CommitKind::Blame | CommitKind::File | CommitKind::StashFile { .. }
        )
    }

    pub fn is_stash(&self) -> bool {
        matches!(self, CommitKind::Stash { .. } | CommitKind::StashFile { .. })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CommitKind::Blame => "blame",
            CommitKind::Branch => "branch",
            CommitKind::File => "file",
            CommitKind::Stash { .. } => "stash",
            CommitKind::StashFile { .. } => "stash-file",
        }
    }
}

impl fmt::Display for CommitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Override for an optional field in [`CommitChanges`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Patch<T> {
    /// Keep the current value
    #[default]
    Keep,
    /// Unset the field
    Clear,
    /// Replace the value
    Set(T),
}

impl<T> Patch<T> {
    fn apply(self, current: Option<T>) -> Option<T> {
        match self {
            Patch::Keep => current,
            Patch::Clear => None,
            Patch::Set(value) => Some(value),
        }
    }
}

/// Overrides for [`CommitRecord::with_changes`]. Omitted fields keep their value.
#[derive(Debug, Clone, Default)]
pub struct CommitChanges {
    pub kind: Option<CommitKind>,
    pub sha: Option<String>,
    pub file_name: Option<String>,
    pub original_file_name: Patch<String>,
    pub previous_file_name: Patch<String>,
    pub previous_sha: Patch<String>,
    pub working_file_name: Patch<String>,
}

/// The declared fields of a commit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitData {
    pub kind: CommitKind,
    pub repo_path: String,
    pub sha: String,
    pub author: String,
    pub date: DateTime<FixedOffset>,
    pub message: String,
    /// File name relative to `repo_path`
    pub file_name: String,
    /// Name of the file before a rename in this commit
    pub original_file_name: Option<String>,
    /// Name of the file at the previous revision
    pub previous_file_name: Option<String>,
    /// Declared previous revision; the kind decides the default
    pub previous_sha: Option<String>,
    /// Name of the file in the working tree today
    pub working_file_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ResolutionState {
    Unresolved,
    Resolving,
    Resolved(String),
}

/// One revision's association with one file (or with the whole repository
/// for branch and stash listings).
pub struct CommitRecord {
    data: CommitData,
    short_sha: OnceLock<String>,
    uncommitted: OnceLock<bool>,
    staged: OnceLock<bool>,
    resolution: Mutex<ResolutionState>,
    formatted_dates: Mutex<HashMap<String, String>>,
    from_now: OnceLock<String>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Returns an in-flight resolution to `Unresolved` when the resolving call
/// ends without storing a value (error or dropped future).
struct PendingResolution<'a>(&'a Mutex<ResolutionState>);

impl Drop for PendingResolution<'_> {
    fn drop(&mut self) {
        let mut state = lock(self.0);
        if *state == ResolutionState::Resolving {
            *state = ResolutionState::Unresolved;
        }
    }
}

impl CommitRecord {
    pub fn new(data: CommitData) -> Self {
        Self {
            data: CommitData {
                repo_path: paths::normalize(&data.repo_path),
                ..data
            },
            short_sha: OnceLock::new(),
            uncommitted: OnceLock::new(),
            staged: OnceLock::new(),
            resolution: Mutex::new(ResolutionState::Unresolved),
            formatted_dates: Mutex::new(HashMap::new()),
            from_now: OnceLock::new(),
        }
    }

    pub fn data(&self) -> &CommitData {
        &self.data
    }

    pub fn kind(&self) -> &CommitKind {
        &self.data.kind
    }

    pub fn repo_path(&self) -> &str {
        &self.data.repo_path
    }

    pub fn sha(&self) -> &str {
        &self.data.sha
    }

    pub fn author(&self) -> &str {
        &self.data.author
    }

    pub fn date(&self) -> &DateTime<FixedOffset> {
        &self.data.date
    }

    pub fn message(&self) -> &str {
        &self.data.message
    }

    /// First line of the message.
    pub fn summary(&self) -> &str {
        self.data.message.lines().next().unwrap_or_default()
    }

    pub fn is_file_scoped(&self) -> bool {
        self.data.kind.is_file_scoped()
    }

    pub fn is_stash(&self) -> bool {
        self.data.kind.is_stash()
    }

    /// The record's file, or empty (the repository root) when not file-scoped.
    pub fn file_name(&self) -> &str {
        if self.is_file_scoped() {
            &self.data.file_name
        } else {
            ""
        }
    }

    pub fn original_file_name(&self) -> Option<&str> {
        self.data.original_file_name.as_deref()
    }

    pub fn previous_file_name(&self) -> Option<&str> {
        self.data.previous_file_name.as_deref()
    }

    pub fn working_file_name(&self) -> Option<&str> {
        self.data.working_file_name.as_deref()
    }

    /// The declared previous revision, if one was recorded.
    pub fn previous_sha(&self) -> Option<&str> {
        self.data.previous_sha.as_deref()
    }

    /// Replace the declared previous revision and drop any resolved value
    /// derived from the old one.
    pub fn set_previous_sha(&mut self, previous_sha: Option<String>) {
        self.data.previous_sha = previous_sha;
        *lock(&self.resolution) = ResolutionState::Unresolved;
    }

    pub fn short_sha(&self) -> &str {
        self.short_sha.get_or_init(|| shorten_sha(&self.data.sha))
    }

    pub fn is_uncommitted(&self) -> bool {
        *self.uncommitted.get_or_init(|| is_uncommitted(&self.data.sha))
    }

    pub fn is_staged_uncommitted(&self) -> bool {
        *self.staged.get_or_init(|| is_staged_uncommitted(&self.data.sha))
    }

    fn declared_previous_file_sha(&self) -> String {
        match &self.data.kind {
            CommitKind::Blame | CommitKind::File => self
                .data
                .previous_sha
                .clone()
                .unwrap_or_else(|| format!("{}^", self.data.sha)),
            CommitKind::Branch => format!("{}^", self.data.sha),
            CommitKind::Stash { stash_name } | CommitKind::StashFile { stash_name } => {
                format!("{stash_name}^")
            }
        }
    }

    /// The revision before this one along the file's history: the resolved
    /// id once [`Self::resolve_previous_file_sha`] has run, otherwise the
    /// declared form (which may be a `^` expression).
    pub fn previous_file_sha(&self) -> String {
        match &*lock(&self.resolution) {
            ResolutionState::Resolved(sha) => sha.clone(),
            _ => self.declared_previous_file_sha(),
        }
    }

    pub fn previous_short_sha(&self) -> String {
        shorten_sha(&self.previous_file_sha())
    }

    /// The resolved previous revision, if resolution has completed.
    pub fn resolved_previous_file_sha(&self) -> Option<String> {
        match &*lock(&self.resolution) {
            ResolutionState::Resolved(sha) => Some(sha.clone()),
            _ => None,
        }
    }

    /// Whether a resolution is currently in flight on this record.
    pub fn is_resolving_previous(&self) -> bool {
        *lock(&self.resolution) == ResolutionState::Resolving
    }

    /// Ask the backend for the concrete previous revision and cache it.
    ///
    /// Returns the cached value without calling the backend when one exists.
    /// A failed or cancelled resolution leaves the cache empty so the next
    /// call retries; it never clears a value another call already stored.
    pub async fn resolve_previous_file_sha(&self, backend: &dyn VcsBackend) -> Result<String> {
        {
            let mut state = lock(&self.resolution);
            if let ResolutionState::Resolved(sha) = &*state {
                return Ok(sha.clone());
            }
            *state = ResolutionState::Resolving;
        }
        let _pending = PendingResolution(&self.resolution);

        let declared = self.declared_previous_file_sha();
        let previous_uri = self.is_file_scoped().then(|| self.previous_uri());
        log::debug!(
            "Resolving previous revision of {} from '{declared}'",
            self.short_sha()
        );

        match backend
            .resolve_reference(&self.data.repo_path, &declared, previous_uri.as_ref())
            .await
        {
            Ok(sha) => {
                *lock(&self.resolution) = ResolutionState::Resolved(sha.clone());
                Ok(sha)
            }
            Err(e) => {
                log::warn!("Failed to resolve '{declared}': {e}");
                Err(e)
            }
        }
    }

    /// The file at this revision.
    pub fn uri(&self) -> RevisionUri {
        RevisionUri::from_repo_file(&self.data.repo_path, self.file_name(), Some(&self.data.sha))
    }

    /// The file at the previous revision, under its previous name.
    pub fn previous_uri(&self) -> RevisionUri {
        let file_name = self
            .data
            .previous_file_name
            .as_deref()
            .or(self.data.original_file_name.as_deref())
            .unwrap_or(self.file_name());
        RevisionUri::from_repo_file(
            &self.data.repo_path,
            file_name,
            Some(&self.previous_file_sha()),
        )
    }

    /// The file as it is named in the working tree, if known.
    pub fn working_uri(&self) -> Option<RevisionUri> {
        self.data
            .working_file_name
            .as_deref()
            .map(|name| RevisionUri::from_repo_file(&self.data.repo_path, name, None))
    }

    /// Encode this record's file and revision as a `gitrev:` locator.
    pub fn to_revision_locator(&self) -> Locator {
        to_revision_uri(
            &self.data.sha,
            &paths::resolve(&self.data.repo_path, self.file_name()),
            &self.data.repo_path,
        )
    }

    /// `basename<separator>directory` for file-scoped records; the repository
    /// name for branch and stash records.
    pub fn formatted_path(&self, separator: Option<&str>, relative_to: Option<&str>) -> String {
        if !self.is_file_scoped() {
            return paths::basename(&self.data.repo_path);
        }
        formatting::formatted_path(
            &paths::resolve(&self.data.repo_path, self.file_name()),
            Some(&self.data.repo_path),
            separator.unwrap_or(DEFAULT_PATH_SEPARATOR),
            relative_to,
        )
    }

    /// Format the commit date; memoized per format string.
    pub fn format_date(&self, format: &str) -> String {
        lock(&self.formatted_dates)
            .entry(format.to_string())
            .or_insert_with(|| formatting::format_date(&self.data.date, format))
            .clone()
    }

    /// Relative description of the commit date, computed on first use.
    pub fn from_now(&self) -> &str {
        self.from_now
            .get_or_init(|| formatting::relative_time(&self.data.date, Utc::now()))
    }

    /// Copy this record with overrides applied. Caches start empty.
    pub fn with_changes(&self, changes: CommitChanges) -> Self {
        let data = self.data.clone();
        Self::new(CommitData {
            kind: changes.kind.unwrap_or(data.kind),
            sha: changes.sha.unwrap_or(data.sha),
            file_name: changes.file_name.unwrap_or(data.file_name),
            original_file_name: changes.original_file_name.apply(data.original_file_name),
            previous_file_name: changes.previous_file_name.apply(data.previous_file_name),
            previous_sha: changes.previous_sha.apply(data.previous_sha),
            working_file_name: changes.working_file_name.apply(data.working_file_name),
            ..data
        })
    }
}

impl Clone for CommitRecord {
    fn clone(&self) -> Self {
        self.with_changes(CommitChanges::default())
    }
}

impl fmt::Debug for CommitRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommitRecord")
            .field("data", &self.data)
            .field("resolution", &*lock(&self.resolution))
            .finish()
    }
}

impl PartialEq for CommitRecord {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl Eq for CommitRecord {}

//! Revision-aware locators.
//!
//! [`RevisionUri`] wraps a plain [`Locator`] and adds the repository root and
//! revision id a file belongs to. It decodes all three locator families and
//! encodes the crate's own `gitrev:` form:
//!
//! ```text
//! gitrev:/repo/src/a:deadbee.ts?{"fileName":"src/a.ts","repoPath":"/repo","sha":"deadbeef..."}
//! ```
//!
//! The visible path keeps the file's directory, stem and extension so
//! consumers that know nothing about revisions still see a sensible file
//! name. The short id in it is cosmetic: the JSON payload carries the full
//! id and is the only thing decoding and equality look at.

use crate::core::{
    backend::VcsBackend,
    commit::CommitRecord,
    error::{Result, RevlocError},
    formatting::{self, DEFAULT_PATH_SEPARATOR},
    locator::{Locator, LocatorScheme, REVISION_SCHEME},
    paths,
    revision::{committed_or_none, shorten_sha},
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Payload of a revision locator, and the explicit context callers may pass
/// to [`RevisionUri::with_commit_info`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitInfo {
    pub file_name: String,
    pub repo_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
}

/// Payload of git's own diff-view locators.
#[derive(Debug, Deserialize)]
struct NativeDiffPayload {
    path: String,
    #[serde(rename = "ref", default)]
    reference: Option<String>,
}

/// A locator plus the repository and revision it addresses.
#[derive(Debug, Clone)]
pub struct RevisionUri {
    locator: Locator,
    scheme: LocatorScheme,
    path: String,
    repo_path: Option<String>,
    sha: Option<String>,
}

fn parse_payload<T: DeserializeOwned>(locator: &Locator) -> Result<T> {
    let query = locator
        .query()
        .ok_or_else(|| RevlocError::malformed_locator(locator.to_string(), "missing payload"))?;
    serde_json::from_str(query).map_err(|e| RevlocError::malformed_locator(locator.to_string(), e))
}

impl RevisionUri {
    /// Decode without a backend.
    ///
    /// Revision locators are decoded from their payload; anything else is a
    /// shallow passthrough with no repository association.
    pub fn new(locator: &Locator) -> Result<Self> {
        if locator.kind() == LocatorScheme::Revision {
            let info: CommitInfo = parse_payload(locator)?;
            return Ok(Self::with_commit_info(locator, &info));
        }
        Ok(Self::passthrough(locator))
    }

    /// Decode with an explicitly known repository root.
    ///
    /// The payload of a revision locator still wins over `repo_path`.
    pub fn with_repo_path(locator: &Locator, repo_path: &str) -> Result<Self> {
        if locator.kind() == LocatorScheme::Revision {
            return Self::new(locator);
        }
        Ok(Self {
            repo_path: Some(paths::normalize(repo_path)),
            ..Self::passthrough(locator)
        })
    }

    /// Build from explicit commit context instead of decoding it.
    ///
    /// An empty `file_name` falls back to the locator's own path.
    pub fn with_commit_info(locator: &Locator, info: &CommitInfo) -> Self {
        let repo_path = paths::normalize(&info.repo_path);
        let file_name = if info.file_name.is_empty() && locator.kind() != LocatorScheme::Revision
        {
            locator.fs_path()
        } else {
            info.file_name.clone()
        };
        Self {
            locator: locator.clone(),
            scheme: locator.kind(),
            path: paths::resolve(&repo_path, &file_name),
            repo_path: Some(repo_path),
            sha: committed_or_none(info.sha.as_deref()),
        }
    }

    /// A working-copy or revision view of `file_name` inside `repo_path`.
    pub fn from_repo_file(repo_path: &str, file_name: &str, sha: Option<&str>) -> Self {
        let repo_path = paths::normalize(repo_path);
        let locator = Locator::from_file_path(&paths::resolve(&repo_path, file_name));
        Self::with_commit_info(
            &locator,
            &CommitInfo {
                file_name: file_name.to_string(),
                repo_path,
                sha: sha.map(str::to_string),
            },
        )
    }

    fn passthrough(locator: &Locator) -> Self {
        Self {
            locator: locator.clone(),
            scheme: locator.kind(),
            path: locator.fs_path(),
            repo_path: None,
            sha: None,
        }
    }

    /// Decode any locator, consulting the backend where the locator itself
    /// does not say which repository it belongs to.
    pub fn from_locator(locator: &Locator, backend: &dyn VcsBackend) -> Result<Self> {
        if locator.kind() == LocatorScheme::Revision {
            return Self::new(locator);
        }

        if !backend.is_trackable(locator) {
            log::debug!("Locator '{locator}' is not trackable, passing through");
            return Ok(Self::passthrough(locator));
        }

        if locator.kind() == LocatorScheme::NativeDiff {
            let payload: NativeDiffPayload = parse_payload(locator)?;
            let repo_path = backend.resolve_repository_root(&payload.path)?;
            log::debug!("Resolved native diff locator '{locator}' to repository {repo_path}");
            return Ok(Self {
                locator: locator.clone(),
                scheme: LocatorScheme::NativeDiff,
                path: paths::normalize(&payload.path),
                repo_path: Some(paths::normalize(&repo_path)),
                sha: committed_or_none(payload.reference.as_deref()),
            });
        }

        if let Some(native) = backend.find_native_locator_for_file(locator)? {
            return Ok(native);
        }
        Ok(Self::passthrough(locator))
    }

    /// Fill in a missing repository root through the backend.
    pub fn resolve_repo_path(self, backend: &dyn VcsBackend) -> Result<Self> {
        if self.repo_path.is_some() {
            return Ok(self);
        }
        let repo_path = backend.resolve_repository_root(&self.path)?;
        Ok(Self {
            repo_path: Some(paths::normalize(&repo_path)),
            ..self
        })
    }

    /// The commit's file at its own revision, or at its previous revision.
    pub fn from_commit(commit: &CommitRecord, previous: bool) -> Self {
        if previous {
            commit.previous_uri()
        } else {
            commit.uri()
        }
    }

    /// Absolute filesystem path of the addressed file.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn repo_path(&self) -> Option<&str> {
        self.repo_path.as_deref()
    }

    /// Committed revision id, `None` for the working copy.
    pub fn sha(&self) -> Option<&str> {
        self.sha.as_deref()
    }

    pub fn short_sha(&self) -> Option<String> {
        self.sha.as_deref().map(shorten_sha)
    }

    pub fn scheme(&self) -> LocatorScheme {
        self.scheme
    }

    /// The wrapped locator, with its query and fragment untouched.
    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    pub fn is_revision(&self) -> bool {
        self.scheme == LocatorScheme::Revision
    }

    pub fn file_name(&self) -> String {
        paths::basename(&self.path)
    }

    /// `basename<separator>directory`, the directory relative to the repo.
    pub fn formatted_path(&self, separator: Option<&str>, relative_to: Option<&str>) -> String {
        formatting::formatted_path(
            &self.path,
            self.repo_path.as_deref(),
            separator.unwrap_or(DEFAULT_PATH_SEPARATOR),
            relative_to,
        )
    }

    pub fn relative_path(&self, relative_to: Option<&str>) -> String {
        formatting::relative_path(&self.path, self.repo_path.as_deref(), relative_to)
    }

    /// Working-copy `file:` locator for the same path.
    pub fn to_file_locator(&self) -> Locator {
        Locator::from_file_path(&self.path)
    }

    /// Encode as a revision locator. Without a repository root there is
    /// nothing to encode against, so the working-copy locator is returned.
    pub fn to_revision_locator(&self) -> Locator {
        match &self.repo_path {
            Some(repo_path) => {
                to_revision_uri(self.sha.as_deref().unwrap_or_default(), &self.path, repo_path)
            }
            None => self.to_file_locator(),
        }
    }
}

impl PartialEq for RevisionUri {
    fn eq(&self, other: &Self) -> bool {
        self.scheme == other.scheme
            && self.path == other.path
            && self.repo_path == other.repo_path
            && self.sha == other.sha
    }
}

impl Eq for RevisionUri {}

impl fmt::Display for RevisionUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.locator)
    }
}

/// Encode `file_name` (absolute, or relative to `repo_path`) at `sha`.
///
/// An empty `sha` encodes the working copy: no short id in the visible path
/// and no `sha` in the payload.
pub fn to_revision_uri(sha: &str, file_name: &str, repo_path: &str) -> Locator {
    let repo_path = paths::normalize(repo_path);
    let absolute = paths::resolve(&repo_path, file_name);
    let relative = paths::normalize(&paths::relative(&repo_path, &absolute));

    let parts = paths::split(&absolute);
    let dir = parts.dir.trim_end_matches('/');
    let short = shorten_sha(sha);
    let visible = if short.is_empty() {
        format!("{dir}/{}{}", parts.stem, parts.ext)
    } else {
        format!("{dir}/{}:{short}{}", parts.stem, parts.ext)
    };

    let mut payload = Map::new();
    payload.insert("fileName".to_string(), Value::from(relative));
    payload.insert("repoPath".to_string(), Value::from(repo_path));
    if !sha.is_empty() {
        payload.insert("sha".to_string(), Value::from(sha));
    }

    Locator::from_parts(
        REVISION_SCHEME,
        &visible,
        Some(&Value::Object(payload).to_string()),
    )
}

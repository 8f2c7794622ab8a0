//! The version-control collaborator consumed by the locator and commit code.
//!
//! Everything here is synchronous except [`VcsBackend::resolve_reference`],
//! which may have to run an external query. The git2 implementation lives in
//! [`crate::core::git::GitBackend`]; tests provide their own.

use crate::core::{
    error::Result,
    locator::{Locator, LocatorScheme},
    revision_uri::RevisionUri,
};
use async_trait::async_trait;

#[async_trait]
pub trait VcsBackend: Send + Sync {
    /// Whether a locator may belong to a known repository.
    fn is_trackable(&self, locator: &Locator) -> bool;

    /// Repository root containing `path`. Fails with `RepositoryNotFound`.
    fn resolve_repository_root(&self, path: &str) -> Result<String>;

    /// Resolve `reference` to a full commit id.
    ///
    /// With `file`, the result is the newest commit at or before `reference`
    /// that touched that file. Fails with `ReferenceNotFound` or
    /// `AmbiguousReference`.
    async fn resolve_reference(
        &self,
        repo_path: &str,
        reference: &str,
        file: Option<&RevisionUri>,
    ) -> Result<String>;

    /// Fast path for buffers that are already versioned locators.
    fn find_native_locator_for_file(&self, _locator: &Locator) -> Result<Option<RevisionUri>> {
        Ok(None)
    }
}

/// Default trackability rule: the three locator families this crate knows.
pub fn is_trackable_scheme(locator: &Locator) -> bool {
    !matches!(locator.kind(), LocatorScheme::Other)
}

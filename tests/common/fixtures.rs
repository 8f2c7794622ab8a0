//! Test data and a scripted in-memory backend

#![allow(dead_code)]

use super::repository::*;
use async_trait::async_trait;
use chrono::{FixedOffset, TimeZone};
use git_revloc::core::{
    commit::{CommitData, CommitKind, CommitRecord},
    error::{Result, RevlocError},
    locator::Locator,
    revision_uri::RevisionUri,
    VcsBackend,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub const SHA: &str = "deadbeef0123456789abcdef0123456789abcdef";
pub const PARENT_SHA: &str = "cafebabe0123456789abcdef0123456789abcdef";

/// Backend answering from fixed tables and counting resolver calls.
#[derive(Default)]
pub struct ScriptedBackend {
    pub roots: Vec<String>,
    pub references: Mutex<HashMap<String, String>>,
    pub native: Option<RevisionUri>,
    calls: AtomicUsize,
    last_file: Mutex<Option<String>>,
}

impl ScriptedBackend {
    pub fn with_root(root: &str) -> Self {
        Self {
            roots: vec![root.to_string()],
            ..Default::default()
        }
    }

    /// Answer `find_native_locator_for_file` with `native`.
    pub fn with_native(mut self, native: RevisionUri) -> Self {
        self.native = Some(native);
        self
    }

    /// Make `reference` resolve to `sha` from now on.
    pub fn answer(&self, reference: &str, sha: &str) {
        self.references
            .lock()
            .unwrap()
            .insert(reference.to_string(), sha.to_string());
    }

    pub fn forget(&self, reference: &str) {
        self.references.lock().unwrap().remove(reference);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Path of the file passed with the most recent resolution.
    pub fn last_file(&self) -> Option<String> {
        self.last_file.lock().unwrap().clone()
    }
}

#[async_trait]
impl VcsBackend for ScriptedBackend {
    fn is_trackable(&self, locator: &Locator) -> bool {
        git_revloc::core::backend::is_trackable_scheme(locator)
    }

    fn resolve_repository_root(&self, path: &str) -> Result<String> {
        self.roots
            .iter()
            .find(|root| path.starts_with(root.as_str()))
            .cloned()
            .ok_or_else(|| RevlocError::repository_not_found(path))
    }

    async fn resolve_reference(
        &self,
        _repo_path: &str,
        reference: &str,
        file: Option<&RevisionUri>,
    ) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_file.lock().unwrap() = file.map(|uri| uri.path().to_string());
        self.references
            .lock()
            .unwrap()
            .get(reference)
            .cloned()
            .ok_or_else(|| RevlocError::reference_not_found(reference))
    }

    fn find_native_locator_for_file(&self, _locator: &Locator) -> Result<Option<RevisionUri>> {
        Ok(self.native.clone())
    }
}

/// A `File` record for `src/new.rs` renamed from `src/old.rs`, in `/repo`.
pub fn renamed_file_commit() -> CommitRecord {
    CommitRecord::new(CommitData {
        kind: CommitKind::File,
        repo_path: "/repo".to_string(),
        sha: SHA.to_string(),
        author: "Test User".to_string(),
        date: FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 5, 14, 7, 0)
            .unwrap(),
        message: "Move parser".to_string(),
        file_name: "src/new.rs".to_string(),
        original_file_name: Some("src/old.rs".to_string()),
        previous_file_name: Some("src/old.rs".to_string()),
        previous_sha: None,
        working_file_name: Some("src/new.rs".to_string()),
    })
}

/// Scenario: one file edited twice, renamed, then edited again.
///
/// History of `lib/parser.rs`, oldest first: "Add parser", "Extend parser",
/// "Move parser" (rename from `parser.rs`), "Tweak parser". An unrelated
/// commit sits between the first two.
pub fn create_renamed_file_repo() -> Result<TestRepo> {
    let repo = setup_test_repo()?;
    let body = "fn parse() {}\nfn lex() {}\nfn emit() {}\nfn check() {}\n";

    commit_file(&repo.path, "parser.rs", body, "Add parser")?;
    commit_file(&repo.path, "README.md", "readme\n", "Add readme")?;
    commit_file(
        &repo.path,
        "parser.rs",
        &format!("{body}fn extra() {{}}\n"),
        "Extend parser",
    )?;
    std::fs::create_dir_all(repo.path.join("lib")).map_err(RevlocError::Io)?;
    git_mv(&repo.path, "parser.rs", "lib/parser.rs")?;
    git_commit(&repo.path, "Move parser")?;
    commit_file(
        &repo.path,
        "lib/parser.rs",
        &format!("{body}fn extra() {{}}\nfn more() {{}}\n"),
        "Tweak parser",
    )?;

    Ok(repo)
}

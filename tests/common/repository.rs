//! Git repository management and setup utilities

#![allow(dead_code)]

use git_revloc::core::error::{Result, RevlocError};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary repository. The TempDir must be kept alive for the duration
/// of the test to prevent cleanup.
pub struct TestRepo {
    pub temp_dir: TempDir,
    pub path: PathBuf,
}

impl TestRepo {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Repository root as git2 reports it: symlinks resolved, forward slashes.
    pub fn root(&self) -> String {
        self.path.to_string_lossy().replace('\\', "/")
    }

    /// Absolute path of a file inside the repository.
    pub fn file(&self, name: &str) -> String {
        format!("{}/{}", self.root(), name)
    }
}

fn git(repo_path: &Path, args: &[&str]) -> Result<()> {
    std::process::Command::new("git")
        .args(args)
        .current_dir(repo_path)
        .output()
        .map_err(RevlocError::Io)?;
    Ok(())
}

/// Sets up a fresh git repository for testing
///
/// Creates a temporary directory, initializes it as a git repository,
/// and sets up basic git configuration to avoid user prompts.
pub fn setup_test_repo() -> Result<TestRepo> {
    let temp_dir = TempDir::new().map_err(RevlocError::Io)?;
    // git2 reports canonical workdirs; compare against the same form
    let repo_path = fs::canonicalize(temp_dir.path()).map_err(RevlocError::Io)?;

    git(&repo_path, &["init"])?;
    git(&repo_path, &["config", "user.name", "Test User"])?;
    git(&repo_path, &["config", "user.email", "test@example.com"])?;

    Ok(TestRepo {
        temp_dir,
        path: repo_path,
    })
}

/// Creates a file (and its parent directories) with the given content
pub fn create_file(repo_path: &Path, filename: &str, content: &str) -> Result<()> {
    let full = repo_path.join(filename);
    if let Some(parent) = full.parent() {
        fs::create_dir_all(parent).map_err(RevlocError::Io)?;
    }
    fs::write(full, content).map_err(RevlocError::Io)?;
    Ok(())
}

/// Adds a file to the git index
pub fn git_add(repo_path: &Path, filename: &str) -> Result<()> {
    git(repo_path, &["add", "--", filename])
}

/// Creates a git commit with the specified message
pub fn git_commit(repo_path: &Path, message: &str) -> Result<()> {
    git(repo_path, &["commit", "-m", message])
}

/// Renames a tracked file
pub fn git_mv(repo_path: &Path, from: &str, to: &str) -> Result<()> {
    git(repo_path, &["mv", from, to])
}

/// Writes, stages and commits a file in one step
pub fn commit_file(repo_path: &Path, filename: &str, content: &str, message: &str) -> Result<()> {
    create_file(repo_path, filename, content)?;
    git_add(repo_path, filename)?;
    git_commit(repo_path, message)
}

/// Full id of a revision, via the git CLI
pub fn rev_parse(repo_path: &Path, revision: &str) -> Result<String> {
    let output = std::process::Command::new("git")
        .args(["rev-parse", revision])
        .current_dir(repo_path)
        .output()
        .map_err(RevlocError::Io)?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

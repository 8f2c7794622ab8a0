//! Domain-specific error types and error handling utilities.
//!
//! This module defines [`RevlocError`] which covers every failure mode of
//! locator decoding, repository lookup and reference resolution. It uses
//! `thiserror` for the error definitions and offers named constructors for
//! the variants that carry context.
//!
//! # Public API
//! - [`RevlocError`]: Main error enum covering all failure modes
//! - [`Result<T>`]: Type alias for `std::result::Result<T, RevlocError>`
//!
//! # Error Categories
//! - **Locators**: malformed URLs or revision payloads
//! - **Repositories**: repository root not found, git2 library errors
//! - **References**: unknown or ambiguous revisions during ancestor resolution
//! - **Configuration**: unreadable or unparsable config files

use std::path::PathBuf;
use thiserror::Error;

/// Domain-specific error types for git-revloc
#[derive(Error, Debug)]
pub enum RevlocError {
    // Locator errors
    #[error("Malformed locator '{locator}': {reason}")]
    MalformedLocator { locator: String, reason: String },

    // Repository errors
    #[error("Not in a git repository")]
    NotInGitRepo,

    #[error("No repository found for '{path}'")]
    RepositoryNotFound { path: String },

    #[error("Git repository error: {0}")]
    Git(#[from] git2::Error),

    #[error("Invalid UTF-8 path in repository")]
    InvalidUtf8Path,

    // Reference resolution errors
    #[error("Reference not found: {reference}")]
    ReferenceNotFound { reference: String },

    #[error("Ambiguous reference: {reference}")]
    AmbiguousReference { reference: String },

    // File and config errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file '{path}': {source}")]
    ConfigParseFailed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results using RevlocError
pub type Result<T> = std::result::Result<T, RevlocError>;

impl RevlocError {
    /// Create a malformed locator error
    pub fn malformed_locator(locator: impl Into<String>, reason: impl ToString) -> Self {
        Self::MalformedLocator {
            locator: locator.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a repository not found error
    pub fn repository_not_found(path: impl Into<String>) -> Self {
        Self::RepositoryNotFound { path: path.into() }
    }

    /// Create a reference not found error
    pub fn reference_not_found(reference: impl Into<String>) -> Self {
        Self::ReferenceNotFound {
            reference: reference.into(),
        }
    }

    /// Create an ambiguous reference error
    pub fn ambiguous_reference(reference: impl Into<String>) -> Self {
        Self::AmbiguousReference {
            reference: reference.into(),
        }
    }

    /// Create a config parse failed error
    pub fn config_parse_failed(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::ConfigParseFailed {
            path: path.into(),
            source,
        }
    }

    /// Map a git2 revparse failure for `reference` onto the resolution errors
    pub fn from_revparse(reference: &str, err: git2::Error) -> Self {
        match err.code() {
            git2::ErrorCode::NotFound => Self::reference_not_found(reference),
            git2::ErrorCode::Ambiguous => Self::ambiguous_reference(reference),
            _ => Self::Git(err),
        }
    }
}

//! Core functionality for git-revloc.
//!
//! This module holds the locator codec, commit records, the version-control
//! backend seam with its git2 implementation, and the ambient pieces
//! (errors, configuration, output).

pub mod backend;
pub mod commit;
pub mod config;
pub mod dirs;
pub mod error;
pub mod formatting;
pub mod git;
pub mod locator;
pub mod output;
pub mod paths;
pub mod revision;
pub mod revision_uri;

// === Error handling ===
pub use error::{Result, RevlocError};

// === Locators ===
// Parsed URIs and the revision-aware view over them
pub use locator::{Locator, LocatorScheme, FILE_SCHEME, NATIVE_DIFF_SCHEME, REVISION_SCHEME};
pub use revision_uri::{to_revision_uri, CommitInfo, RevisionUri};

// === Revision ids ===
pub use revision::{
    is_staged_uncommitted, is_uncommitted, shorten_sha, SHORT_SHA_LENGTH, UNCOMMITTED_SHA,
    UNCOMMITTED_STAGED_SHA,
};

// === Commit records ===
pub use commit::{CommitChanges, CommitData, CommitKind, CommitRecord, Patch};

// === Version control ===
pub use backend::VcsBackend;
pub use git::{GitBackend, GitRepo};

// === Configuration ===
pub use config::{DateStyle, RevlocConfig};

// === Output formatting ===
pub use output::{format_history_line, print_error, print_field, print_info, print_section_header};

//! git-revloc - revision locators and commit records for git-backed editors.
//!
//! A revision locator is a URI naming one file at one revision of one
//! repository, e.g.
//!
//! ```text
//! gitrev:/repo/src/a:deadbee.ts?{"fileName":"src/a.ts","repoPath":"/repo","sha":"deadbee…"}
//! ```
//!
//! # Public API
//! The main public interface is re-exported from the [`core`] module, which provides:
//! - Locator parsing and the [`RevisionUri`] encode/decode
//! - [`CommitRecord`] with lazy previous-revision resolution
//! - The [`VcsBackend`] seam and its git2 implementation, [`GitBackend`]
//! - Error handling and result types

pub mod commands;
pub mod core;

// Re-export the core public API for external users
pub use core::{
    // Commit records
    CommitChanges,
    CommitData,
    CommitKind,
    CommitRecord,
    // Version control
    GitBackend,
    GitRepo,
    // Locators
    Locator,
    LocatorScheme,
    Patch,
    // Error handling
    Result,
    RevisionUri,
    RevlocConfig,
    RevlocError,
    VcsBackend,
};

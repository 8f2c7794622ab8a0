//! Shared test utilities for git-revloc integration tests.
//!
//! Repositories are real git repositories created with the git CLI in
//! temporary directories, plus an in-memory backend for tests that should
//! not touch git at all.

pub mod assertions;
pub mod fixtures;
pub mod repository;

//! Common assertion helpers for command output validation

#![allow(dead_code)]

use predicates::prelude::*;

/// Creates a predicate that checks for git repository error messages
pub fn not_in_git_repo() -> impl Predicate<str> {
    predicates::str::contains("Not in a git repository")
        .or(predicates::str::contains("NotInGitRepo"))
}

/// Creates a predicate that checks for a malformed locator error
pub fn malformed_locator() -> impl Predicate<str> {
    predicates::str::contains("Malformed locator")
}

/// Creates a predicate for a `label: value` line printed by `decode`
pub fn has_field(label: &str, value: &str) -> impl Predicate<str> {
    let prefix = format!("{label}:");
    let value = value.to_string();
    predicates::function::function(move |output: &str| {
        output.lines().any(|line| {
            line.strip_prefix(prefix.as_str())
                .is_some_and(|rest| rest.trim() == value)
        })
    })
}

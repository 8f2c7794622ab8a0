//! Revision-id classification shared by locators and commit records.
//!
//! A revision id is either a real commit id (hex), or one of two sentinels
//! standing in for the working copy: [`UNCOMMITTED_SHA`] for plain working
//! tree changes and [`UNCOMMITTED_STAGED_SHA`] for changes recorded in the
//! index. Classification looks only at the text of the id.

/// Sentinel id for uncommitted working-tree changes.
pub const UNCOMMITTED_SHA: &str = "0000000000000000000000000000000000000000";

/// Sentinel id for changes staged in the index but not committed.
pub const UNCOMMITTED_STAGED_SHA: &str = "0000000000000000000000000000000000000000:";

/// Number of characters kept by [`shorten_sha`].
pub const SHORT_SHA_LENGTH: usize = 7;

/// Strip a trailing parent selector (`^`, `^2`, `~3`) from a revision id.
fn split_parent_suffix(id: &str) -> (&str, &str) {
    match id.find(['^', '~']) {
        Some(idx) => (&id[..idx], &id[idx..]),
        None => (id, ""),
    }
}

/// True for either working-copy sentinel, including its `^` parent form.
pub fn is_uncommitted(id: &str) -> bool {
    let (base, _) = split_parent_suffix(id);
    let base = base.strip_suffix(':').unwrap_or(base);
    base == UNCOMMITTED_SHA
}

/// True only for the staged sentinel.
pub fn is_staged_uncommitted(id: &str) -> bool {
    let (base, _) = split_parent_suffix(id);
    base == UNCOMMITTED_STAGED_SHA
}

/// True for an abbreviated or full hex commit id (7 to 40 digits).
pub fn is_sha(id: &str) -> bool {
    (SHORT_SHA_LENGTH..=40).contains(&id.len()) && id.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Shorten a real commit id for display, keeping any parent selector.
///
/// Sentinels, symbolic references and empty ids are returned unchanged.
pub fn shorten_sha(id: &str) -> String {
    if id.is_empty() || is_uncommitted(id) {
        return id.to_string();
    }

    let (base, suffix) = split_parent_suffix(id);
    if !is_sha(base) {
        return id.to_string();
    }
    format!("{}{}", &base[..SHORT_SHA_LENGTH], suffix)
}

/// Normalize a decoded id: sentinels and empty ids mean "working copy".
pub fn committed_or_none(id: Option<&str>) -> Option<String> {
    match id {
        Some(id) if !id.is_empty() && !is_uncommitted(id) => Some(id.to_string()),
        _ => None,
    }
}

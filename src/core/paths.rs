//! Pure path helpers for `/`-separated repository paths.
//!
//! Locators always carry forward-slash paths regardless of platform, so these
//! helpers operate on strings rather than [`std::path::Path`]. None of them
//! touch the filesystem: `.` and `..` segments are folded lexically.
//!
//! # Public API
//! - [`normalize`]: backslashes to slashes, no trailing slash
//! - [`resolve`]: join a path onto a base and fold dot segments
//! - [`relative`]: express one path relative to another
//! - [`dirname`], [`basename`], [`split`]: decomposition helpers

/// The pieces of a file path used to build the visible segment of a locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathParts {
    pub dir: String,
    pub stem: String,
    pub ext: String,
}

/// Convert backslashes to forward slashes and drop any trailing slash.
pub fn normalize(path: &str) -> String {
    let mut normalized = path.replace('\\', "/");
    while normalized.len() > 1 && normalized.ends_with('/') && !is_drive_root(&normalized) {
        normalized.pop();
    }
    normalized
}

pub fn is_absolute(path: &str) -> bool {
    let path = path.replace('\\', "/");
    if path.starts_with('/') {
        return true;
    }
    let bytes = path.as_bytes();
    bytes.len() >= 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && bytes[2] == b'/'
}

fn is_drive_root(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() == 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && bytes[2] == b'/'
}

/// Split a path into its root prefix ("/", "C:/" or "") and folded segments.
fn segments(path: &str) -> (String, Vec<String>) {
    let path = path.replace('\\', "/");
    let (root, rest) = if let Some(rest) = path.strip_prefix('/') {
        ("/".to_string(), rest.to_string())
    } else if is_absolute(&path) {
        (path[..3].to_string(), path[3..].to_string())
    } else {
        (String::new(), path)
    };

    let mut parts: Vec<String> = Vec::new();
    for segment in rest.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if parts.last().is_some_and(|last| last != "..") {
                    parts.pop();
                } else if root.is_empty() {
                    // A relative path may climb above its start; an absolute one may not
                    parts.push("..".to_string());
                }
            }
            other => parts.push(other.to_string()),
        }
    }
    (root, parts)
}

fn join_segments(root: &str, parts: &[String]) -> String {
    let joined = parts.join("/");
    if root.is_empty() && joined.is_empty() {
        ".".to_string()
    } else {
        format!("{root}{joined}")
    }
}

/// Fold `.`/`..` segments and duplicate slashes without resolving against a base.
pub fn clean(path: &str) -> String {
    let (root, parts) = segments(path);
    join_segments(&root, &parts)
}

/// Resolve `path` against `base`. Absolute paths ignore the base.
pub fn resolve(base: &str, path: &str) -> String {
    if is_absolute(path) || base.is_empty() {
        return clean(path);
    }
    clean(&format!("{base}/{path}"))
}

/// Express `to` relative to `from`.
///
/// An empty `from` leaves `to` unchanged (apart from cleaning). When only one
/// side is absolute there is no common base and `to` is returned cleaned.
/// Equal paths yield an empty string.
pub fn relative(from: &str, to: &str) -> String {
    if from.is_empty() {
        return clean(to);
    }

    let (from_root, from_parts) = segments(from);
    let (to_root, to_parts) = segments(to);
    if from_root != to_root {
        return join_segments(&to_root, &to_parts);
    }

    let common = from_parts
        .iter()
        .zip(to_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut result: Vec<String> = Vec::new();
    result.extend(std::iter::repeat("..".to_string()).take(from_parts.len() - common));
    result.extend(to_parts[common..].iter().cloned());
    result.join("/")
}

/// The directory portion of a path, following POSIX `dirname` conventions.
pub fn dirname(path: &str) -> String {
    let normalized = normalize(path);
    match normalized.rfind('/') {
        Some(0) => "/".to_string(),
        Some(idx) if is_drive_root(&normalized[..=idx]) => normalized[..=idx].to_string(),
        Some(idx) => normalized[..idx].to_string(),
        None => ".".to_string(),
    }
}

/// The final segment of a path.
pub fn basename(path: &str) -> String {
    let normalized = normalize(path);
    match normalized.rfind('/') {
        Some(idx) => normalized[idx + 1..].to_string(),
        None => normalized,
    }
}

/// Split a file name into stem and extension (including the dot).
///
/// A leading dot does not start an extension, so `.gitignore` has none.
pub fn split_extension(name: &str) -> (String, String) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => (name[..idx].to_string(), name[idx..].to_string()),
        _ => (name.to_string(), String::new()),
    }
}

/// Decompose a path into directory, stem and extension.
pub fn split(path: &str) -> PathParts {
    let (stem, ext) = split_extension(&basename(path));
    PathParts {
        dir: dirname(path),
        stem,
        ext,
    }
}

//! Human-readable formatting for paths and commit dates.
//!
//! Paths are shown as `basename<separator>directory`, where the directory is
//! made relative to the repository root (and optionally to a further base) so
//! that files at the top of a repository show as a bare name.
//!
//! # Public API
//! - [`format_path`]: static path formatting with [`PathFormatOptions`]
//! - [`formatted_path`]: the algorithm behind `RevisionUri::formatted_path`
//! - [`relative_path`]: repository-relative path of a file
//! - [`format_date`], [`relative_time`]: commit date rendering

use crate::core::{locator::Locator, paths};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Utc};

/// Separator placed between a file's basename and its directory.
pub const DEFAULT_PATH_SEPARATOR: &str = " \u{a0}\u{2022}\u{a0} ";

/// Date format used when none is configured or the configured one is invalid.
pub const DEFAULT_DATE_FORMAT: &str = "%B %-d, %Y %-I:%M%P";

const ELLIPSIS: char = '\u{2026}';

/// Options for [`format_path`].
#[derive(Debug, Clone)]
pub struct PathFormatOptions<'a> {
    pub relative_to: Option<&'a str>,
    pub separator: &'a str,
    pub suffix: Option<&'a str>,
    pub truncate_to: Option<usize>,
}

impl Default for PathFormatOptions<'_> {
    fn default() -> Self {
        Self {
            relative_to: None,
            separator: DEFAULT_PATH_SEPARATOR,
            suffix: None,
            truncate_to: None,
        }
    }
}

/// Directory of `path` relative to `repo_path` and then `relative_to`.
///
/// Returns an empty string when the directory collapses to the base.
fn directory_of(path: &str, repo_path: Option<&str>, relative_to: Option<&str>) -> String {
    let mut directory = paths::dirname(path);
    if let Some(repo_path) = repo_path {
        directory = paths::relative(repo_path, &directory);
    }
    if let Some(relative_to) = relative_to {
        directory = paths::relative(relative_to, &directory);
    }
    let directory = paths::normalize(&directory);
    if directory == "." {
        String::new()
    } else {
        directory
    }
}

/// `basename` alone, or `basename + separator + directory`.
pub fn formatted_path(
    path: &str,
    repo_path: Option<&str>,
    separator: &str,
    relative_to: Option<&str>,
) -> String {
    let name = paths::basename(path);
    let directory = directory_of(path, repo_path, relative_to);
    if directory.is_empty() {
        name
    } else {
        format!("{name}{separator}{directory}")
    }
}

/// Path of `path` relative to `repo_path` (if any) and then `relative_to`.
pub fn relative_path(path: &str, repo_path: Option<&str>, relative_to: Option<&str>) -> String {
    let mut relative = paths::relative(repo_path.unwrap_or_default(), path);
    if let Some(relative_to) = relative_to {
        relative = paths::relative(relative_to, &relative);
    }
    paths::normalize(&relative)
}

/// Format a plain file name without any repository association.
pub fn format_path(file_name: &str, options: &PathFormatOptions<'_>) -> String {
    let mut name = paths::basename(file_name);
    if let Some(max) = options.truncate_to {
        if name.chars().count() >= max {
            return truncate_middle(&name, max);
        }
    }
    if let Some(suffix) = options.suffix {
        name.push_str(suffix);
    }

    let directory = directory_of(file_name, None, options.relative_to);
    if directory.is_empty() {
        return name;
    }

    let head = format!("{name}{}", options.separator);
    let head_len = head.chars().count();
    match options.truncate_to {
        Some(max) if head_len + directory.chars().count() >= max => {
            format!("{head}{}", truncate_left(&directory, max.saturating_sub(head_len)))
        }
        _ => format!("{head}{directory}"),
    }
}

/// Format the filesystem path of a plain (non-revision) locator.
pub fn format_locator_path(locator: &Locator, options: &PathFormatOptions<'_>) -> String {
    format_path(&locator.fs_path(), options)
}

/// Keep the start and end of `s`, joined by an ellipsis, within `max` chars.
pub fn truncate_middle(s: &str, max: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let keep = max - 1;
    let front = keep.div_ceil(2);
    let back = keep / 2;
    let mut out: String = chars[..front].iter().collect();
    out.push(ELLIPSIS);
    out.extend(&chars[chars.len() - back..]);
    out
}

/// Keep the end of `s`, prefixed by an ellipsis, within `max` chars.
pub fn truncate_left(s: &str, max: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::from(ELLIPSIS);
    out.extend(&chars[chars.len() - (max - 1)..]);
    out
}

/// Render `date` with a strftime-style format.
///
/// An invalid format falls back to [`DEFAULT_DATE_FORMAT`] instead of failing.
pub fn format_date(date: &DateTime<FixedOffset>, format: &str) -> String {
    let items: Vec<Item<'_>> = StrftimeItems::new(format).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        log::warn!("Invalid date format '{format}', using default");
        return date.format(DEFAULT_DATE_FORMAT).to_string();
    }
    date.format_with_items(items.into_iter()).to_string()
}

fn plural(count: i64, one: &str, many: &str) -> String {
    if count == 1 {
        one.to_string()
    } else {
        format!("{count} {many}")
    }
}

/// Describe the distance from `date` to `now` ("3 days ago", "in an hour").
pub fn relative_time(date: &DateTime<FixedOffset>, now: DateTime<Utc>) -> String {
    let seconds = now.signed_duration_since(date.with_timezone(&Utc)).num_seconds();
    let future = seconds < 0;
    let seconds = seconds.abs();

    let minutes = (seconds as f64 / 60.0).round() as i64;
    let hours = (seconds as f64 / 3600.0).round() as i64;
    let days = (seconds as f64 / 86400.0).round() as i64;

    let description = if seconds < 45 {
        "a few seconds".to_string()
    } else if seconds < 90 {
        "a minute".to_string()
    } else if minutes < 45 {
        plural(minutes, "a minute", "minutes")
    } else if minutes < 90 {
        "an hour".to_string()
    } else if hours < 22 {
        plural(hours, "an hour", "hours")
    } else if hours < 36 {
        "a day".to_string()
    } else if days < 26 {
        plural(days, "a day", "days")
    } else if days < 45 {
        "a month".to_string()
    } else if days < 320 {
        plural((days as f64 / 30.4).round() as i64, "a month", "months")
    } else if days < 548 {
        "a year".to_string()
    } else {
        plural((days as f64 / 365.0).round() as i64, "a year", "years")
    };

    if future {
        format!("in {description}")
    } else {
        format!("{description} ago")
    }
}

//! Plain resource locators.
//!
//! A [`Locator`] is a URL split into decoded components. Parsing goes through
//! the `url` crate; serialization re-encodes each component with
//! `percent-encoding` so that `parse(to_string(x)) == x` for any path or query
//! text, including `%`, `?`, `#` and quotes.
//!
//! The scheme alone decides which of the locator families a value belongs to,
//! see [`LocatorScheme`].

use crate::core::{
    error::{Result, RevlocError},
    paths,
};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Scheme of ordinary filesystem locators.
pub const FILE_SCHEME: &str = "file";

/// Scheme used by git's own diff views.
pub const NATIVE_DIFF_SCHEME: &str = "git";

/// Scheme of revision locators produced by this crate.
pub const REVISION_SCHEME: &str = "gitrev";

const PATH_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

const QUERY_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'\'');

const FRAGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'`');

/// The locator families told apart by scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocatorScheme {
    /// `file:` locators
    Plain,
    /// `git:` locators from git's diff views
    NativeDiff,
    /// `gitrev:` locators produced by this crate
    Revision,
    /// Anything else (`untitled:`, `https:`, ...)
    Other,
}

impl LocatorScheme {
    pub fn from_scheme(scheme: &str) -> Self {
        match scheme {
            FILE_SCHEME => LocatorScheme::Plain,
            NATIVE_DIFF_SCHEME => LocatorScheme::NativeDiff,
            REVISION_SCHEME => LocatorScheme::Revision,
            _ => LocatorScheme::Other,
        }
    }
}

/// A URL with percent-decoded components.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator {
    scheme: String,
    authority: String,
    path: String,
    query: Option<String>,
    fragment: Option<String>,
}

fn decode_component(locator: &str, raw: &str) -> Result<String> {
    percent_decode_str(raw)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|e| RevlocError::malformed_locator(locator, e))
}

impl Locator {
    /// Parse a locator string. Relative references are rejected.
    pub fn parse(input: &str) -> Result<Self> {
        let url = Url::parse(input).map_err(|e| RevlocError::malformed_locator(input, e))?;

        let query = url
            .query()
            .map(|raw| decode_component(input, raw))
            .transpose()?;
        let fragment = url
            .fragment()
            .map(|raw| decode_component(input, raw))
            .transpose()?;

        Ok(Self {
            scheme: url.scheme().to_string(),
            authority: url.host_str().unwrap_or_default().to_string(),
            path: decode_component(input, url.path())?,
            query,
            fragment,
        })
    }

    /// Build a locator from already-decoded components.
    ///
    /// Paths that do not start with `/` (Windows drive paths) gain a leading
    /// slash so the serialized form never looks like an authority.
    pub fn from_parts(scheme: &str, path: &str, query: Option<&str>) -> Self {
        let path = paths::normalize(path);
        let path = if path.starts_with('/') {
            path
        } else {
            format!("/{path}")
        };
        Self {
            scheme: scheme.to_string(),
            authority: String::new(),
            path,
            query: query.map(str::to_string),
            fragment: None,
        }
    }

    /// A `file:` locator for an absolute filesystem path.
    pub fn from_file_path(path: &str) -> Self {
        Self::from_parts(FILE_SCHEME, path, None)
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn kind(&self) -> LocatorScheme {
        LocatorScheme::from_scheme(&self.scheme)
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// The decoded path component exactly as carried in the URL.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The path as a filesystem path (`/C:/x` becomes `C:/x`).
    pub fn fs_path(&self) -> String {
        let trimmed = self.path.strip_prefix('/').unwrap_or(&self.path);
        if paths::is_absolute(trimmed) && !trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            self.path.clone()
        }
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    pub fn with_fragment(mut self, fragment: Option<&str>) -> Self {
        self.fragment = fragment.map(str::to_string);
        self
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.scheme)?;
        if !self.authority.is_empty() || self.scheme == FILE_SCHEME {
            write!(f, "//{}", self.authority)?;
        }
        write!(f, "{}", utf8_percent_encode(&self.path, PATH_ENCODE_SET))?;
        if let Some(query) = &self.query {
            write!(f, "?{}", utf8_percent_encode(query, QUERY_ENCODE_SET))?;
        }
        if let Some(fragment) = &self.fragment {
            write!(f, "#{}", utf8_percent_encode(fragment, FRAGMENT_ENCODE_SET))?;
        }
        Ok(())
    }
}

impl FromStr for Locator {
    type Err = RevlocError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

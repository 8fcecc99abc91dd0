//! RFC 3986 style canonicalization of artifact URLs.
//!
//! Artifact URLs are the join key between a domain's evidence feed, its
//! legacy manifests and the events themselves, so every implementation must
//! agree on the canonical string byte-for-byte.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

/// Errors raised while canonicalizing a URL.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UrlError {
    /// Scheme or authority component is absent.
    #[error("URL must include scheme and host")]
    MissingSchemeOrHost,
    /// Authority is present but names no host.
    #[error("URL host is missing")]
    MissingHost,
    /// Port is not a decimal integer in `0..=65535`.
    #[error("invalid port '{0}'")]
    InvalidPort(String),
    /// Unbalanced IPv6 brackets in the authority.
    #[error("invalid IPv6 URL")]
    InvalidIpv6,
}

/// A URL in canonical form, split into the components needed by discovery.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalUrl {
    scheme: String,
    authority: String,
    path: String,
    query: String,
}

impl CanonicalUrl {
    /// Canonicalizes `input`.
    ///
    /// Scheme and host are lowercased, default ports (80 for http, 443 for
    /// https) are dropped, dot-segments are removed from the path while
    /// keeping a trailing slash, percent-escapes in path and query get
    /// uppercase hex digits, and the fragment is discarded. The query is
    /// otherwise left untouched.
    pub fn parse(input: &str) -> Result<Self, UrlError> {
        let cleaned: String = input
            .trim_start_matches(|c: char| c <= ' ')
            .chars()
            .filter(|c| !matches!(c, '\t' | '\r' | '\n'))
            .collect();
        let parts = split(&cleaned)?;
        if parts.scheme.is_empty() || parts.netloc.is_empty() {
            return Err(UrlError::MissingSchemeOrHost);
        }

        let scheme = parts.scheme.to_ascii_lowercase();
        let authority = canonical_authority(&scheme, parts.netloc)?;
        let path = uppercase_percent_escapes(&normalize_path(parts.path));
        let query = uppercase_percent_escapes(parts.query);

        Ok(Self {
            scheme,
            authority,
            path,
            query,
        })
    }

    /// Lowercased scheme.
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Userinfo, host and non-default port, as they appear after `//`.
    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Normalized path; always starts with `/`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Query string without the leading `?`.
    pub fn query(&self) -> &str {
        &self.query
    }
}

impl fmt::Display for CanonicalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}{}", self.scheme, self.authority, self.path)?;
        if !self.query.is_empty() {
            write!(f, "?{}", self.query)?;
        }
        Ok(())
    }
}

/// Canonicalizes `input` and renders it as a string.
///
/// # Example
///
/// ```rust
/// use vp_canonical::canonicalize_url;
///
/// assert_eq!(
///     canonicalize_url("HTTP://Example.COM:80/a/../b/")?,
///     "http://example.com/b/"
/// );
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn canonicalize_url(input: &str) -> Result<String, UrlError> {
    CanonicalUrl::parse(input).map(|url| url.to_string())
}

struct RawParts<'a> {
    scheme: &'a str,
    netloc: &'a str,
    path: &'a str,
    query: &'a str,
}

fn is_scheme(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn split(url: &str) -> Result<RawParts<'_>, UrlError> {
    let (scheme, mut rest) = match url.find(':') {
        Some(i) if is_scheme(&url[..i]) => (&url[..i], &url[i + 1..]),
        _ => ("", url),
    };

    let mut netloc = "";
    if let Some(after) = rest.strip_prefix("//") {
        let end = after.find(['/', '?', '#']).unwrap_or(after.len());
        netloc = &after[..end];
        rest = &after[end..];
        if netloc.contains('[') != netloc.contains(']') {
            return Err(UrlError::InvalidIpv6);
        }
    }

    if let Some(i) = rest.find('#') {
        rest = &rest[..i];
    }
    let (path, query) = match rest.split_once('?') {
        Some((path, query)) => (path, query),
        None => (rest, ""),
    };

    Ok(RawParts {
        scheme,
        netloc,
        path,
        query,
    })
}

fn canonical_authority(scheme: &str, netloc: &str) -> Result<String, UrlError> {
    let (userinfo, hostinfo) = match netloc.rfind('@') {
        Some(i) => (&netloc[..=i], &netloc[i + 1..]),
        None => ("", netloc),
    };

    let (host, port) = if let Some(bracketed) = hostinfo.strip_prefix('[') {
        let (inner, after) = bracketed.split_once(']').ok_or(UrlError::InvalidIpv6)?;
        let port = after.split_once(':').map(|(_, p)| p).unwrap_or("");
        (format!("[{}]", inner.to_lowercase()), port)
    } else {
        let (host, port) = hostinfo.split_once(':').unwrap_or((hostinfo, ""));
        (host.to_lowercase(), port)
    };
    if host.is_empty() || host == "[]" {
        return Err(UrlError::MissingHost);
    }

    let port = parse_port(port)?;
    let default_port = matches!((scheme, port), ("http", Some(80)) | ("https", Some(443)));

    let mut authority = format!("{}{}", userinfo, host);
    if let Some(port) = port.filter(|_| !default_port) {
        authority.push_str(&format!(":{}", port));
    }
    Ok(authority)
}

fn parse_port(port: &str) -> Result<Option<u16>, UrlError> {
    if port.is_empty() {
        return Ok(None);
    }
    if !port.bytes().all(|b| b.is_ascii_digit()) {
        return Err(UrlError::InvalidPort(port.to_string()));
    }
    port.parse::<u16>()
        .map(Some)
        .map_err(|_| UrlError::InvalidPort(port.to_string()))
}

fn normalize_path(path: &str) -> String {
    let original = if path.is_empty() { "/" } else { path };
    let trailing_slash = original.ends_with('/');

    let mut normalized = remove_dot_segments(original);
    if !normalized.starts_with('/') {
        normalized.insert(0, '/');
    }
    if trailing_slash && !normalized.ends_with('/') {
        normalized.push('/');
    }
    normalized
}

/// POSIX-style lexical normalization: collapses repeated slashes, drops `.`
/// and resolves `..` without climbing above the root. A leading `//` (exactly
/// two slashes) is preserved.
fn remove_dot_segments(path: &str) -> String {
    let leading = if path.starts_with("//") && !path.starts_with("///") {
        2
    } else if path.starts_with('/') {
        1
    } else {
        0
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." if leading > 0 && segments.last().map_or(true, |s| *s != "..") => {
                segments.pop();
            }
            ".." if !segments.is_empty() && segments.last() != Some(&"..") => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    let result = format!("{}{}", "/".repeat(leading), segments.join("/"));
    if result.is_empty() {
        ".".to_string()
    } else {
        result
    }
}

fn percent_escape_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"%[0-9a-fA-F]{2}").expect("invalid regex"))
}

fn uppercase_percent_escapes(text: &str) -> String {
    percent_escape_pattern()
        .replace_all(text, |caps: &regex::Captures<'_>| caps[0].to_ascii_uppercase())
        .into_owned()
}

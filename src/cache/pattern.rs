//! Key Pattern Module
//!
//! Wildcard templates used for bulk invalidation.
//!
//! `*` matches any run of characters, including `:` and the empty run.
//! Every other character matches itself exactly (case-sensitive), and the
//! whole key must be consumed.
//!
//! Two shapes are matched by key segment instead of by text:
//! - `*:{tenant}:*` selects keys whose second segment is `{tenant}`, so a
//!   later segment equal to a tenant id (an analytics metric or period) never
//!   pulls in another tenant's key.
//! - list pages built with [`KeyPattern::list_pages`] select `{prefix}p{n}`
//!   with `n` all digits, leaving detail ids such as `pat-42` alone.

use std::fmt;

use crate::error::{CacheError, Result};

/// Wildcard character recognised in patterns.
pub const WILDCARD: char = '*';

// == Key Pattern ==
/// A compiled wildcard template.
///
/// A plain template is split on `*` into literal pieces. `contacts:t1:p*`
/// compiles to `["contacts:t1:p", ""]` with an open tail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPattern {
    source: String,
    matcher: Matcher,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Matcher {
    Glob(Vec<String>),
    /// Second segment equals the tenant and at least one segment follows
    Tenant(String),
    /// `{prefix}p{digits}`
    Pages(String),
}

impl KeyPattern {
    // == Parse ==
    /// Compiles a pattern. Empty patterns are rejected.
    pub fn parse(pattern: &str) -> Result<Self> {
        if pattern.is_empty() {
            return Err(CacheError::InvalidPattern(
                "Pattern cannot be empty".to_string(),
            ));
        }

        if let Some(tenant) = tenant_segment(pattern) {
            return Ok(Self {
                source: pattern.to_string(),
                matcher: Matcher::Tenant(tenant.to_string()),
            });
        }

        let pieces = pattern.split(WILDCARD).map(str::to_string).collect();

        Ok(Self {
            source: pattern.to_string(),
            matcher: Matcher::Glob(pieces),
        })
    }

    /// Numbered list pages under `prefix`, shown as `{prefix}p*`.
    pub fn list_pages(prefix: &str) -> Self {
        Self {
            source: format!("{}p{}", prefix, WILDCARD),
            matcher: Matcher::Pages(prefix.to_string()),
        }
    }

    /// The template text as given.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// True when the pattern has no wildcard and names a single key.
    pub fn is_exact(&self) -> bool {
        matches!(&self.matcher, Matcher::Glob(pieces) if pieces.len() == 1)
    }

    // == Matches ==
    /// Full-string match of `key` against the template.
    pub fn matches(&self, key: &str) -> bool {
        match &self.matcher {
            Matcher::Glob(pieces) => glob_matches(pieces, key),
            Matcher::Tenant(tenant) => {
                let mut segments = key.splitn(3, ':');
                segments.next().is_some()
                    && segments.next() == Some(tenant.as_str())
                    && segments.next().is_some()
            }
            Matcher::Pages(prefix) => key
                .strip_prefix(prefix.as_str())
                .and_then(|rest| rest.strip_prefix('p'))
                .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit())),
        }
    }
}

/// The tenant of a `*:{tenant}:*` template, when the middle is a single
/// literal segment.
fn tenant_segment(pattern: &str) -> Option<&str> {
    let tenant = pattern.strip_prefix("*:")?.strip_suffix(":*")?;
    let literal = !tenant.is_empty() && !tenant.contains(WILDCARD) && !tenant.contains(':');
    literal.then_some(tenant)
}

/// The first piece is anchored at the start, the last at the end, and the
/// middle pieces are found leftmost-first in between. Leftmost placement is
/// always safe for a single wildcard kind, so no backtracking is needed.
fn glob_matches(pieces: &[String], key: &str) -> bool {
    let (first, rest) = match pieces.split_first() {
        Some(split) => split,
        None => return false,
    };

    if rest.is_empty() {
        return key == first;
    }

    let Some(mut remaining) = key.strip_prefix(first.as_str()) else {
        return false;
    };

    let (last, middle) = match rest.split_last() {
        Some(split) => split,
        None => return false,
    };

    for piece in middle {
        match remaining.find(piece.as_str()) {
            Some(pos) => remaining = &remaining[pos + piece.len()..],
            None => return false,
        }
    }

    remaining.ends_with(last.as_str())
}

impl fmt::Display for KeyPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

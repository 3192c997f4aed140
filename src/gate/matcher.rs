use regex::Regex;
use serde::Deserialize;

use crate::error::RouteTableError;

/// RouteMatcher
///
/// A single, deterministic classifier for a request path. Matchers are built once
/// when the route table is loaded and never mutated afterwards.
#[derive(Debug, Clone)]
pub enum RouteMatcher {
    /// Matches the path verbatim (`/about` does not match `/about/team`).
    Exact(String),
    /// Segment-aware prefix: `/profile` matches `/profile` and `/profile/edit`
    /// but not `/profiles`.
    Prefix(String),
    /// Regular expression evaluated against the whole path.
    Pattern(Regex),
}

impl RouteMatcher {
    pub fn exact(path: &str) -> Result<Self, RouteTableError> {
        Ok(Self::Exact(validate_path(path)?))
    }

    pub fn prefix(path: &str) -> Result<Self, RouteTableError> {
        let path = validate_path(path)?;
        // "/" as a prefix would swallow every route.
        let trimmed = match path.trim_end_matches('/') {
            "" => "/".to_string(),
            p => p.to_string(),
        };
        Ok(Self::Prefix(trimmed))
    }

    pub fn pattern(pattern: &str) -> Result<Self, RouteTableError> {
        Regex::new(pattern)
            .map(Self::Pattern)
            .map_err(|source| RouteTableError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })
    }

    /// matches
    ///
    /// Pure function of the path. The query string is never part of the input.
    pub fn matches(&self, path: &str) -> bool {
        match self {
            Self::Exact(expected) => path == expected,
            Self::Prefix(prefix) if prefix == "/" => true,
            Self::Prefix(prefix) => match path.strip_prefix(prefix.as_str()) {
                Some(rest) => rest.is_empty() || rest.starts_with('/'),
                None => false,
            },
            Self::Pattern(regex) => regex.is_match(path),
        }
    }
}

fn validate_path(path: &str) -> Result<String, RouteTableError> {
    if !path.starts_with('/') {
        return Err(RouteTableError::InvalidPath(path.to_string()));
    }
    Ok(path.to_string())
}

/// MatcherSpec
///
/// Serialized form of a matcher in a route table document:
/// `{ "exact": "/about" }`, `{ "prefix": "/profile" }` or `{ "pattern": "^/dashboard/admin" }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatcherSpec {
    Exact(String),
    Prefix(String),
    Pattern(String),
}

impl TryFrom<MatcherSpec> for RouteMatcher {
    type Error = RouteTableError;

    fn try_from(spec: MatcherSpec) -> Result<Self, Self::Error> {
        match spec {
            MatcherSpec::Exact(path) => RouteMatcher::exact(&path),
            MatcherSpec::Prefix(path) => RouteMatcher::prefix(&path),
            MatcherSpec::Pattern(pattern) => RouteMatcher::pattern(&pattern),
        }
    }
}

/// Returns true when any matcher in the list accepts the path (first match wins).
pub fn any_match(matchers: &[RouteMatcher], path: &str) -> bool {
    matchers.iter().any(|m| m.matches(path))
}

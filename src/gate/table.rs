use std::{collections::HashMap, path::Path};

use serde::Deserialize;

use super::matcher::{MatcherSpec, RouteMatcher, any_match};
use crate::{error::RouteTableError, models::Role};

/// RouteTable
///
/// The static route classification used by the gate. Built once at startup and
/// shared read-only across every request.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    /// Always allowed, identity is never consulted.
    pub public: Vec<RouteMatcher>,
    /// Login and registration pages, reachable without a session.
    pub auth_routes: Vec<RouteMatcher>,
    /// Allowed for any authenticated caller regardless of role.
    pub common_private: Vec<RouteMatcher>,
    /// Pages that need a session but no particular role (listing detail).
    pub login_required: Vec<RouteMatcher>,
    /// Ordered matchers per role; first match wins.
    pub role_routes: HashMap<Role, Vec<RouteMatcher>>,
}

/// RouteTableSpec
///
/// JSON document accepted by [`RouteTable::from_json`].
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RouteTableSpec {
    pub public: Vec<MatcherSpec>,
    pub auth_routes: Vec<MatcherSpec>,
    pub common_private: Vec<MatcherSpec>,
    pub login_required: Vec<MatcherSpec>,
    pub role_routes: HashMap<Role, Vec<MatcherSpec>>,
}

fn build(specs: Vec<MatcherSpec>) -> Result<Vec<RouteMatcher>, RouteTableError> {
    specs.into_iter().map(RouteMatcher::try_from).collect()
}

impl TryFrom<RouteTableSpec> for RouteTable {
    type Error = RouteTableError;

    fn try_from(spec: RouteTableSpec) -> Result<Self, Self::Error> {
        let role_routes = spec
            .role_routes
            .into_iter()
            .map(|(role, specs)| Ok((role, build(specs)?)))
            .collect::<Result<HashMap<_, _>, RouteTableError>>()?;

        Ok(Self {
            public: build(spec.public)?,
            auth_routes: build(spec.auth_routes)?,
            common_private: build(spec.common_private)?,
            login_required: build(spec.login_required)?,
            role_routes,
        })
    }
}

impl RouteTable {
    /// marketplace_default
    ///
    /// The rule set of the rental marketplace: browsing is public, listing detail
    /// pages need a session, and each dashboard belongs to exactly one role.
    pub fn marketplace_default() -> Self {
        let spec: RouteTableSpec = serde_json::from_value(serde_json::json!({
            "public": [
                { "exact": "/" },
                { "exact": "/about" },
                { "exact": "/contact" },
                { "exact": "/faq" },
                { "exact": "/listings" },
                { "prefix": "/health" },
                { "prefix": "/swagger-ui" },
                { "prefix": "/api-docs" }
            ],
            "auth_routes": [
                { "exact": "/login" },
                { "exact": "/register" }
            ],
            "common_private": [
                { "prefix": "/profile" },
                { "prefix": "/change-password" }
            ],
            "login_required": [
                { "pattern": "^/listings/[^/]+$" }
            ],
            "role_routes": {
                "admin": [
                    { "pattern": "^/dashboard/admin(/.*)?$" }
                ],
                "landlord": [
                    { "pattern": "^/dashboard/landlord(/.*)?$" },
                    { "prefix": "/listings/create" }
                ],
                "tenant": [
                    { "pattern": "^/dashboard/tenant(/.*)?$" },
                    { "prefix": "/payment" }
                ]
            }
        }))
        .expect("FATAL: built-in route table literal is malformed");

        Self::try_from(spec).expect("FATAL: built-in route table contains an invalid matcher")
    }

    pub fn from_json(raw: &str) -> Result<Self, RouteTableError> {
        let spec: RouteTableSpec = serde_json::from_str(raw)?;
        Self::try_from(spec)
    }

    pub fn from_file(path: &Path) -> Result<Self, RouteTableError> {
        let raw = std::fs::read_to_string(path).map_err(|source| RouteTableError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn is_public(&self, path: &str) -> bool {
        any_match(&self.public, path)
    }

    pub fn is_auth_route(&self, path: &str) -> bool {
        any_match(&self.auth_routes, path)
    }

    pub fn is_common_private(&self, path: &str) -> bool {
        any_match(&self.common_private, path)
    }

    pub fn is_login_required(&self, path: &str) -> bool {
        any_match(&self.login_required, path)
    }

    /// Whether the given role's pattern list accepts the path.
    pub fn role_allows(&self, role: Role, path: &str) -> bool {
        self.role_routes
            .get(&role)
            .is_some_and(|matchers| any_match(matchers, path))
    }

    /// Whether any role claims the path, i.e. it is role-protected at all.
    pub fn is_role_protected(&self, path: &str) -> bool {
        self.role_routes
            .values()
            .any(|matchers| any_match(matchers, path))
    }

    /// Whether an anonymous caller must be sent to the login page for this path.
    pub fn requires_session(&self, path: &str) -> bool {
        self.is_common_private(path) || self.is_login_required(path) || self.is_role_protected(path)
    }
}

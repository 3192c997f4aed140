//! Route authorization gate.
//!
//! Every inbound request passes through [`route_gate`] before reaching a page
//! handler. The decision itself lives in [`RouteGate::decide`], a pure function of
//! the request path and the caller identity.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderValue, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{
    AppState,
    auth::{Session, session_token},
    models::CallerIdentity,
};

pub mod matcher;
pub mod table;

pub use matcher::RouteMatcher;
pub use table::RouteTable;

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/";
pub const REDIRECT_PARAM: &str = "redirectPath";

/// Decision
///
/// The gate's only output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Pass through; downstream handling proceeds.
    Allow,
    /// No session on a protected path. Carries the originally requested path.
    RedirectToLogin { redirect_path: String },
    /// Signed in, but not entitled to this path.
    RedirectToHome,
}

impl Decision {
    /// The `Location` this decision redirects to, if any.
    pub fn location(&self) -> Option<String> {
        match self {
            Decision::Allow => None,
            Decision::RedirectToLogin { redirect_path } => Some(format!(
                "{LOGIN_PATH}?{REDIRECT_PARAM}={}",
                encode_redirect_path(redirect_path)
            )),
            Decision::RedirectToHome => Some(HOME_PATH.to_string()),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Decision::Allow => "allow",
            Decision::RedirectToLogin { .. } => "redirect_login",
            Decision::RedirectToHome => "redirect_home",
        }
    }
}

impl IntoResponse for Decision {
    /// Redirect decisions become `303 See Other`. `Allow` has no response of its own;
    /// converting it yields an empty `204` and should not happen in practice.
    fn into_response(self) -> Response {
        let Some(location) = self.location() else {
            return StatusCode::NO_CONTENT.into_response();
        };
        match HeaderValue::from_str(&location) {
            Ok(value) => (StatusCode::SEE_OTHER, [(header::LOCATION, value)]).into_response(),
            Err(_) => (
                StatusCode::SEE_OTHER,
                [(header::LOCATION, HeaderValue::from_static(HOME_PATH))],
            )
                .into_response(),
        }
    }
}

/// Percent-encodes a path for use as a single query value. `/` and the RFC 3986
/// unreserved characters pass through, so plain paths appear verbatim.
fn encode_redirect_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for byte in path.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'/' => {
                out.push(byte as char)
            }
            other => out.push_str(&format!("%{other:02X}")),
        }
    }
    out
}

/// RouteGate
///
/// The decision function bound to an immutable route table.
#[derive(Debug, Clone)]
pub struct RouteGate {
    table: RouteTable,
}

impl RouteGate {
    pub fn new(table: RouteTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Whether identity resolution can be skipped for this path.
    pub fn is_public(&self, path: &str) -> bool {
        self.table.is_public(path)
    }

    /// decide
    ///
    /// Classifies `path` for the given caller. Unclassified paths are allowed: the
    /// gate protects what the table names and leaves the rest of routing open.
    pub fn decide(&self, path: &str, identity: Option<&CallerIdentity>) -> Decision {
        let table = &self.table;

        if table.is_public(path) {
            return Decision::Allow;
        }

        let Some(identity) = identity else {
            if table.is_auth_route(path) || !table.requires_session(path) {
                return Decision::Allow;
            }
            return Decision::RedirectToLogin {
                redirect_path: path.to_string(),
            };
        };

        if table.is_common_private(path) || table.role_allows(identity.role, path) {
            return Decision::Allow;
        }
        // Claimed by some other role.
        if table.is_role_protected(path) {
            return Decision::RedirectToHome;
        }
        if table.is_login_required(path) {
            return Decision::Allow;
        }
        // Already signed in; the login and registration pages have nothing to offer.
        if table.is_auth_route(path) {
            return Decision::RedirectToHome;
        }

        Decision::Allow
    }
}

/// GateState
///
/// The gate shared across requests.
pub type GateState = Arc<RouteGate>;

/// route_gate
///
/// Middleware applying [`RouteGate::decide`] to every request. Identity comes from the
/// session token only; a failed lookup is logged and treated as an anonymous caller.
/// On `Allow` the resolved [`Session`] is attached for downstream extractors.
pub async fn route_gate(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();

    if state.gate.is_public(&path) {
        request.extensions_mut().insert(Session::default());
        return next.run(request).await;
    }

    let token = session_token(request.headers(), &state.config.session_cookie);
    let identity = match &token {
        Some(token) => match state.identity.current_identity(token).await {
            Ok(identity) => identity,
            Err(e) => {
                tracing::warn!(error = %e, path = %path, "identity lookup failed, treating caller as anonymous");
                None
            }
        },
        None => None,
    };

    let decision = state.gate.decide(&path, identity.as_ref());
    tracing::debug!(
        path = %path,
        role = identity.as_ref().map(|i| i.role.as_str()).unwrap_or("anonymous"),
        decision = decision.label(),
        "route gate decision"
    );

    match decision {
        Decision::Allow => {
            request.extensions_mut().insert(Session {
                // A token that resolved to nobody is not forwarded downstream.
                token: identity.as_ref().and(token),
                identity,
            });
            next.run(request).await
        }
        redirect => redirect.into_response(),
    }
}

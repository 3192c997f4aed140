use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// IdentityError
///
/// Every way resolving the caller can fail. The gate never surfaces these to the
/// client: each one degrades to an anonymous caller.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("session token is malformed or has a bad signature")]
    InvalidToken,
    #[error("session token has expired")]
    Expired,
    #[error("unknown role `{0}`")]
    UnknownRole(String),
    #[error("identity endpoint answered with status {0}")]
    Upstream(u16),
    #[error("identity lookup failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// RouteTableError
///
/// Raised while building the route classification table. Fatal at startup.
#[derive(Debug, Error)]
pub enum RouteTableError {
    #[error("route path `{0}` must start with '/'")]
    InvalidPath(String),
    #[error("invalid route pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("cannot read route table {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("route table is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// ApiError
///
/// Failures talking to the backend REST API. Converted into a JSON error body by
/// [`IntoResponse`] so handlers can simply use `?`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("backend API unreachable: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("backend API returned {status}: {message}")]
    Upstream { status: u16, message: String },
    #[error("backend API response could not be decoded: {0}")]
    Decode(String),
    #[error("a session is required")]
    Unauthenticated,
    #[error("the {0} role is required")]
    Forbidden(&'static str),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err)
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Transport(_) => StatusCode::BAD_GATEWAY,
            ApiError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            ApiError::Decode(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::Transport(_) => "backend_unavailable",
            ApiError::Upstream { .. } => "backend_error",
            ApiError::Decode(_) => "backend_decode_error",
            ApiError::Unauthenticated => "unauthenticated",
            ApiError::Forbidden(_) => "forbidden",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "backend API call failed");
        } else {
            tracing::debug!(error = %self, "backend API call rejected");
        }

        (
            status,
            Json(json!({
                "error": self.code(),
                "message": self.to_string(),
            })),
        )
            .into_response()
    }
}

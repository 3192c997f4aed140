use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, StatusCode, header, request::Parts},
};
use cookie::Cookie;
use jsonwebtoken::{DecodingKey, Validation, decode, errors::ErrorKind};
use serde::{Deserialize, Serialize};

use crate::{
    error::{ApiError, IdentityError},
    models::{CallerIdentity, Role},
};

/// Claims
///
/// Payload of the session token issued by the backend's login endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the backend's user id.
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Kept as a string so an unknown role is reported as such rather than as a
    /// generic decoding failure.
    pub role: String,
    pub iat: usize,
    pub exp: usize,
}

/// session_token
///
/// Pulls the session token out of the request: the session cookie first, then an
/// `Authorization: Bearer` header. Nothing else the client sends is trusted.
pub fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let from_cookie = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| Cookie::parse_encoded(pair.trim()).ok())
        .find(|cookie| cookie.name() == cookie_name)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty());

    from_cookie.or_else(|| {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
    })
}

/// IdentityProvider
///
/// The "get current caller" contract. `Ok(None)` means the token is not a live
/// session; `Err` means the lookup itself failed. The gate treats both as anonymous.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn current_identity(&self, token: &str) -> Result<Option<CallerIdentity>, IdentityError>;
}

/// IdentityState
///
/// The provider shared through the application state.
pub type IdentityState = Arc<dyn IdentityProvider>;

/// JwtIdentityProvider
///
/// Validates the session token in-process with the shared HS256 secret.
#[derive(Clone)]
pub struct JwtIdentityProvider {
    key: DecodingKey,
    validation: Validation,
}

impl JwtIdentityProvider {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::default();
        validation.validate_exp = true;
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentityProvider {
    async fn current_identity(&self, token: &str) -> Result<Option<CallerIdentity>, IdentityError> {
        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => IdentityError::Expired,
                _ => IdentityError::InvalidToken,
            }
        })?;

        let role: Role = data.claims.role.parse()?;
        Ok(Some(CallerIdentity {
            id: data.claims.sub,
            email: data.claims.email,
            role,
        }))
    }
}

#[derive(Deserialize)]
struct CurrentUserRecord {
    #[serde(alias = "_id")]
    id: String,
    #[serde(default)]
    email: Option<String>,
    role: String,
}

#[derive(Deserialize)]
struct CurrentUserResponse {
    data: Option<CurrentUserRecord>,
}

/// RemoteIdentityProvider
///
/// Asks the backend API who owns the token (`GET {base}/users/me`). A single attempt
/// per request: failure degrades to anonymous, it is never retried.
#[derive(Clone)]
pub struct RemoteIdentityProvider {
    client: reqwest::Client,
    base_url: String,
}

impl RemoteIdentityProvider {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl IdentityProvider for RemoteIdentityProvider {
    async fn current_identity(&self, token: &str) -> Result<Option<CallerIdentity>, IdentityError> {
        let response = self
            .client
            .get(format!("{}/users/me", self.base_url))
            .header(header::AUTHORIZATION, token)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(IdentityError::Upstream(status.as_u16()));
        }

        let Some(record) = response.json::<CurrentUserResponse>().await?.data else {
            return Ok(None);
        };

        Ok(Some(CallerIdentity {
            id: record.id,
            email: record.email,
            role: record.role.parse()?,
        }))
    }
}

/// MockIdentityProvider
///
/// Test double returning a fixed identity (or failing), and counting lookups so tests
/// can assert when the gate skips resolution.
#[derive(Clone, Default)]
pub struct MockIdentityProvider {
    pub identity: Option<CallerIdentity>,
    /// When true, every lookup returns a simulated failure.
    pub should_fail: bool,
    lookups: Arc<AtomicUsize>,
}

impl MockIdentityProvider {
    pub fn new(identity: CallerIdentity) -> Self {
        Self {
            identity: Some(identity),
            ..Self::default()
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn new_failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn current_identity(&self, _token: &str) -> Result<Option<CallerIdentity>, IdentityError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            return Err(IdentityError::Upstream(503));
        }
        Ok(self.identity.clone())
    }
}

/// Session
///
/// What the gate learned about the caller, attached to the request's extensions.
/// Lives exactly as long as the request.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub token: Option<String>,
    pub identity: Option<CallerIdentity>,
}

/// Caller
///
/// Extractor for handlers behind the gate: the resolved identity plus the token to
/// forward to the backend API. Rejects with 401 when the request carries no session.
#[derive(Debug, Clone)]
pub struct Caller {
    pub identity: CallerIdentity,
    pub token: String,
}

impl Caller {
    /// Handler-level role check, layered under the gate's route table.
    pub fn require(&self, role: Role) -> Result<(), ApiError> {
        if self.identity.role == role {
            Ok(())
        } else {
            Err(ApiError::Forbidden(role.as_str()))
        }
    }
}

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(ApiError::Unauthenticated)?;

        match (&session.identity, &session.token) {
            (Some(identity), Some(token)) => Ok(Caller {
                identity: identity.clone(),
                token: token.clone(),
            }),
            _ => Err(ApiError::Unauthenticated),
        }
    }
}

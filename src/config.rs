use std::{env, path::PathBuf, time::Duration};

/// AppConfig
///
/// Holds the gateway's entire configuration. Loaded once at startup, immutable
/// afterwards, and pulled into handlers via `FromRef`.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Controls log format and secret requirements.
    pub env: Env,
    // Base URL of the backend REST API (listings, users, requests, payments).
    pub api_base_url: String,
    // HS256 secret used to validate session tokens locally.
    pub jwt_secret: String,
    // Where the caller identity comes from.
    pub identity_source: IdentitySource,
    // Name of the cookie carrying the session token.
    pub session_cookie: String,
    // Socket address the HTTP server binds to.
    pub bind_addr: String,
    // Optional JSON document replacing the built-in route table.
    pub route_table_path: Option<PathBuf>,
    // Upper bound for every backend API call, identity lookups included.
    pub api_timeout: Duration,
}

/// Env
///
/// Defines the runtime context: local development or production.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

/// IdentitySource
///
/// `Jwt` decodes the session token in-process; `Remote` asks the backend's
/// current-user endpoint.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum IdentitySource {
    Jwt,
    Remote,
}

const LOCAL_JWT_SECRET: &str = "local-development-jwt-secret";
const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api/v1";
const DEFAULT_SESSION_COOKIE: &str = "accessToken";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_API_TIMEOUT_SECS: u64 = 10;

impl Default for AppConfig {
    /// Safe, non-panicking values for test state setup.
    fn default() -> Self {
        Self {
            env: Env::Local,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            jwt_secret: LOCAL_JWT_SECRET.to_string(),
            identity_source: IdentitySource::Jwt,
            session_cookie: DEFAULT_SESSION_COOKIE.to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            route_table_path: None,
            api_timeout: Duration::from_secs(DEFAULT_API_TIMEOUT_SECS),
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads every parameter from the environment.
    ///
    /// # Panics
    /// Panics in production when `JWT_SECRET` or `API_BASE_URL` is missing, and in any
    /// environment when `IDENTITY_SOURCE` or `API_TIMEOUT_SECS` holds an unusable value.
    pub fn load() -> Self {
        let env = match env::var("APP_ENV").as_deref() {
            Ok("production") => Env::Production,
            _ => Env::Local,
        };

        let (jwt_secret, api_base_url) = match env {
            Env::Production => (
                env::var("JWT_SECRET").expect("FATAL: JWT_SECRET must be set in production."),
                env::var("API_BASE_URL").expect("FATAL: API_BASE_URL must be set in production."),
            ),
            Env::Local => (
                env::var("JWT_SECRET").unwrap_or_else(|_| LOCAL_JWT_SECRET.to_string()),
                env::var("API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()),
            ),
        };

        let identity_source = match env::var("IDENTITY_SOURCE").as_deref() {
            Err(_) | Ok("jwt") => IdentitySource::Jwt,
            Ok("remote") => IdentitySource::Remote,
            Ok(other) => panic!("FATAL: IDENTITY_SOURCE must be `jwt` or `remote`, got `{other}`"),
        };

        let api_timeout = env::var("API_TIMEOUT_SECS")
            .map(|raw| {
                raw.parse::<u64>()
                    .expect("FATAL: API_TIMEOUT_SECS must be a whole number of seconds")
            })
            .unwrap_or(DEFAULT_API_TIMEOUT_SECS);

        Self {
            env,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            jwt_secret,
            identity_source,
            session_cookie: env::var("SESSION_COOKIE")
                .unwrap_or_else(|_| DEFAULT_SESSION_COOKIE.to_string()),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            route_table_path: env::var("ROUTE_TABLE_PATH").ok().map(PathBuf::from),
            api_timeout: Duration::from_secs(api_timeout),
        }
    }
}

use rental_gateway::{
    AppState, HttpMarketplaceApi, JwtIdentityProvider, RemoteIdentityProvider, RouteGate,
    RouteTable,
    api_client::ApiState,
    auth::IdentityState,
    config::{AppConfig, Env, IdentitySource},
    create_router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Initializes configuration, logging, the route table, the backend client and the
/// identity provider, then serves the gateway.
#[tokio::main]
async fn main() {
    // 1. Configuration (fail-fast)
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging: RUST_LOG wins, otherwise sensible local defaults.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "rental_gateway=debug,tower_http=info,axum=trace".into());

    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            // JSON lines for the log aggregator.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Gateway starting in {:?} mode", config.env);

    // 3. Route table: built once, never re-read.
    let table = match &config.route_table_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading route table from file");
            RouteTable::from_file(path).unwrap_or_else(|e| panic!("FATAL: {e}"))
        }
        None => RouteTable::marketplace_default(),
    };
    let gate = Arc::new(RouteGate::new(table));

    // 4. Backend API client, shared by page handlers and the remote identity lookup.
    let client = reqwest::Client::builder()
        .timeout(config.api_timeout)
        .build()
        .expect("FATAL: Failed to build the HTTP client.");
    let api = Arc::new(HttpMarketplaceApi::new(client.clone(), &config.api_base_url)) as ApiState;

    // 5. Identity provider
    let identity = match config.identity_source {
        IdentitySource::Jwt => Arc::new(JwtIdentityProvider::new(&config.jwt_secret)) as IdentityState,
        IdentitySource::Remote => {
            Arc::new(RemoteIdentityProvider::new(client, &config.api_base_url)) as IdentityState
        }
    };
    tracing::info!(source = ?config.identity_source, "Identity provider ready");

    // 6. Unified state and server
    let bind_addr = config.bind_addr.clone();
    let app = create_router(AppState {
        gate,
        identity,
        api,
        config,
    });

    let listener = TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("FATAL: Failed to bind {bind_addr}: {e}"));

    tracing::info!("Listening on {}", bind_addr);
    tracing::info!("API Documentation (Swagger UI) available at /swagger-ui");

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server terminated");
    }
}

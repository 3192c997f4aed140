use axum::{
    Router,
    extract::FromRef,
    http::HeaderName,
    middleware,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod api_client;
pub mod auth;
pub mod config;
pub mod error;
pub mod gate;
pub mod handlers;
pub mod models;

// Page routers grouped by audience (public, any signed-in caller, role dashboards).
pub mod routes;
use routes::{dashboard, private, public};

// --- Public Re-exports ---

pub use api_client::{ApiState, HttpMarketplaceApi, MarketplaceApi};
pub use auth::{IdentityState, JwtIdentityProvider, MockIdentityProvider, RemoteIdentityProvider};
pub use config::AppConfig;
pub use gate::{Decision, GateState, RouteGate, RouteTable};

/// ApiDoc
///
/// OpenAPI document for every page route, served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::home, handlers::about, handlers::contact, handlers::faq,
        handlers::login_page, handlers::register_page, handlers::list_listings,
        handlers::get_listing, handlers::get_profile, handlers::update_profile,
        handlers::change_password, handlers::user_management, handlers::update_user_status,
        handlers::admin_listings, handlers::admin_remove_listing, handlers::my_listings,
        handlers::create_listing, handlers::update_my_listing, handlers::delete_my_listing,
        handlers::landlord_requests, handlers::respond_to_request, handlers::my_requests,
        handlers::create_request, handlers::my_payments, handlers::create_payment,
    ),
    components(
        schemas(
            models::Role, models::CallerIdentity, models::Listing, models::RentalRequest,
            models::RequestStatus, models::Payment, models::PaymentStatus, models::UserAccount,
            models::CreateListingRequest, models::UpdateListingRequest,
            models::CreateRentalRequest, models::RespondToRequest, models::CreatePaymentRequest,
            models::UpdateProfileRequest, models::ChangePasswordRequest,
            models::UpdateUserStatusRequest, models::PageInfo, models::AuthPage,
            models::ProfilePage,
        )
    ),
    tags(
        (name = "rental-gateway", description = "Rental marketplace pages behind the route gate")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single, cloneable container for everything a request may need. All of it is
/// read-only after startup.
#[derive(Clone)]
pub struct AppState {
    /// Route authorization gate over the immutable route table.
    pub gate: GateState,
    /// Resolves the caller from the session token.
    pub identity: IdentityState,
    /// Backend REST API client.
    pub api: ApiState,
    /// The loaded environment configuration.
    pub config: AppConfig,
}

impl FromRef<AppState> for ApiState {
    fn from_ref(app_state: &AppState) -> ApiState {
        app_state.api.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles every page router, puts the route gate in front of all of them, and adds
/// the observability layers.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .merge(private::private_routes())
        .merge(dashboard::dashboard_routes())
        // The gate covers every path, unmatched ones included, so it sits on the
        // whole router rather than on individual groups.
        .layer(middleware::from_fn_with_state(state.clone(), gate::route_gate))
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span for every request, correlated by `x-request-id`.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}

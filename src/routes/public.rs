use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Public Router Module
///
/// Pages reachable without a session. `/login` and `/register` live here too: the
/// gate lets anonymous callers through and sends signed-in callers home.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for load balancers.
        .route("/health", get(|| async { "ok" }))
        .route("/", get(handlers::home))
        .route("/about", get(handlers::about))
        .route("/contact", get(handlers::contact))
        .route("/faq", get(handlers::faq))
        // GET /listings?location=...&min_price=...&max_price=...&bedrooms=...
        .route("/listings", get(handlers::list_listings))
        // GET /login?redirectPath=...
        // Target of the gate's login redirect.
        .route("/login", get(handlers::login_page))
        .route("/register", get(handlers::register_page))
}

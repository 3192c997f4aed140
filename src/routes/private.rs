use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Private Router Module
///
/// Pages any authenticated caller may open regardless of role. Anonymous callers are
/// redirected to `/login?redirectPath=...` by the gate before reaching these handlers.
pub fn private_routes() -> Router<AppState> {
    Router::new()
        // GET/PUT /profile
        .route(
            "/profile",
            get(handlers::get_profile).put(handlers::update_profile),
        )
        // POST /change-password
        .route("/change-password", post(handlers::change_password))
        // GET /listings/{id}
        // Listing detail needs a session but no particular role.
        .route("/listings/{id}", get(handlers::get_listing))
}

use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};

/// Dashboard Router Module
///
/// Role-owned pages. The gate redirects callers of another role to `/`; each handler
/// repeats the role check via `Caller::require`.
pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        // --- Admin ---
        .route(
            "/dashboard/admin/user-management",
            get(handlers::user_management),
        )
        .route(
            "/dashboard/admin/user-management/{id}",
            patch(handlers::update_user_status),
        )
        .route("/dashboard/admin/listings", get(handlers::admin_listings))
        .route(
            "/dashboard/admin/listings/{id}",
            delete(handlers::admin_remove_listing),
        )
        // --- Landlord ---
        .route(
            "/dashboard/landlord/my-listings",
            get(handlers::my_listings),
        )
        .route(
            "/dashboard/landlord/my-listings/{id}",
            put(handlers::update_my_listing).delete(handlers::delete_my_listing),
        )
        // POST /listings/create
        // Landlord-only despite living under /listings.
        .route("/listings/create", post(handlers::create_listing))
        .route(
            "/dashboard/landlord/requests",
            get(handlers::landlord_requests),
        )
        .route(
            "/dashboard/landlord/requests/{id}",
            patch(handlers::respond_to_request),
        )
        // --- Tenant ---
        .route(
            "/dashboard/tenant/my-requests",
            get(handlers::my_requests).post(handlers::create_request),
        )
        .route("/dashboard/tenant/payments", get(handlers::my_payments))
        .route("/payment", post(handlers::create_payment))
}

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{
    AppState,
    auth::Caller,
    error::ApiError,
    models::{
        AuthPage, AuthPageQuery, ChangePasswordRequest, CreateListingRequest,
        CreatePaymentRequest, CreateRentalRequest, Listing, ListingFilter, PageInfo, Payment,
        ProfilePage, RentalRequest, RespondToRequest, Role, UpdateListingRequest,
        UpdateProfileRequest, UpdateUserStatusRequest, UserAccount,
    },
};

// --- Static pages ---

fn page(title: &str, description: &str) -> Json<PageInfo> {
    Json(PageInfo {
        title: title.to_string(),
        description: description.to_string(),
    })
}

/// home
///
/// [Public Route] Landing page data.
#[utoipa::path(get, path = "/", responses((status = 200, body = PageInfo)))]
pub async fn home() -> Json<PageInfo> {
    page(
        "Rental Marketplace",
        "Find a home or list your property. Landlords and tenants, one marketplace.",
    )
}

#[utoipa::path(get, path = "/about", responses((status = 200, body = PageInfo)))]
pub async fn about() -> Json<PageInfo> {
    page(
        "About",
        "We connect landlords with verified tenants and keep the rental process transparent.",
    )
}

#[utoipa::path(get, path = "/contact", responses((status = 200, body = PageInfo)))]
pub async fn contact() -> Json<PageInfo> {
    page("Contact", "Reach our support team for help with listings, requests or payments.")
}

#[utoipa::path(get, path = "/faq", responses((status = 200, body = PageInfo)))]
pub async fn faq() -> Json<PageInfo> {
    page("FAQ", "Answers to common questions from landlords and tenants.")
}

/// Only local paths survive as a post-login target; anything else falls back to home.
fn local_redirect_target(raw: Option<String>) -> String {
    match raw {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => path,
        _ => "/".to_string(),
    }
}

/// login_page
///
/// [Auth Route] Login page data. Echoes the path the gate asked to return to.
#[utoipa::path(
    get,
    path = "/login",
    params(AuthPageQuery),
    responses((status = 200, body = AuthPage))
)]
pub async fn login_page(Query(query): Query<AuthPageQuery>) -> Json<AuthPage> {
    Json(AuthPage {
        page: "login".to_string(),
        redirect_path: local_redirect_target(query.redirect_path),
    })
}

/// register_page
///
/// [Auth Route] Registration page data.
#[utoipa::path(
    get,
    path = "/register",
    params(AuthPageQuery),
    responses((status = 200, body = AuthPage))
)]
pub async fn register_page(Query(query): Query<AuthPageQuery>) -> Json<AuthPage> {
    Json(AuthPage {
        page: "register".to_string(),
        redirect_path: local_redirect_target(query.redirect_path),
    })
}

// --- Listings ---

/// list_listings
///
/// [Public Route] Browses listings with optional location, price and bedroom filters.
#[utoipa::path(
    get,
    path = "/listings",
    params(ListingFilter),
    responses((status = 200, body = [Listing]))
)]
pub async fn list_listings(
    State(state): State<AppState>,
    Query(filter): Query<ListingFilter>,
) -> Result<Json<Vec<Listing>>, ApiError> {
    Ok(Json(state.api.list_listings(&filter).await?))
}

/// get_listing
///
/// [Login Required] Listing detail page, open to any signed-in role.
#[utoipa::path(
    get,
    path = "/listings/{id}",
    params(("id" = String, Path, description = "Listing ID")),
    responses((status = 200, body = Listing), (status = 404, description = "Not Found"))
)]
pub async fn get_listing(
    caller: Caller,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Listing>, ApiError> {
    Ok(Json(state.api.get_listing(&caller.token, &id).await?))
}

// --- Common private ---

/// get_profile
///
/// [Common Private] The caller's own profile, with the dashboard their role lands on.
#[utoipa::path(get, path = "/profile", responses((status = 200, body = ProfilePage)))]
pub async fn get_profile(caller: Caller) -> Json<ProfilePage> {
    let dashboard = format!("/dashboard/{}", caller.identity.role);
    Json(ProfilePage {
        identity: caller.identity,
        dashboard,
    })
}

#[utoipa::path(
    put,
    path = "/profile",
    request_body = UpdateProfileRequest,
    responses((status = 200, body = UserAccount))
)]
pub async fn update_profile(
    caller: Caller,
    State(state): State<AppState>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<UserAccount>, ApiError> {
    Ok(Json(state.api.update_profile(&caller.token, &payload).await?))
}

#[utoipa::path(
    post,
    path = "/change-password",
    request_body = ChangePasswordRequest,
    responses((status = 204, description = "Password changed"))
)]
pub async fn change_password(
    caller: Caller,
    State(state): State<AppState>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<StatusCode, ApiError> {
    state.api.change_password(&caller.token, &payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Admin dashboard ---

/// user_management
///
/// [Admin Route] Every account on the marketplace.
#[utoipa::path(
    get,
    path = "/dashboard/admin/user-management",
    responses((status = 200, body = [UserAccount]), (status = 403, description = "Not an admin"))
)]
pub async fn user_management(
    caller: Caller,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserAccount>>, ApiError> {
    caller.require(Role::Admin)?;
    Ok(Json(state.api.list_users(&caller.token).await?))
}

/// update_user_status
///
/// [Admin Route] Activates, deactivates or re-roles an account.
#[utoipa::path(
    patch,
    path = "/dashboard/admin/user-management/{id}",
    params(("id" = String, Path, description = "User ID")),
    request_body = UpdateUserStatusRequest,
    responses((status = 200, body = UserAccount))
)]
pub async fn update_user_status(
    caller: Caller,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateUserStatusRequest>,
) -> Result<Json<UserAccount>, ApiError> {
    caller.require(Role::Admin)?;
    Ok(Json(
        state
            .api
            .update_user_status(&caller.token, &id, &payload)
            .await?,
    ))
}

#[utoipa::path(
    get,
    path = "/dashboard/admin/listings",
    responses((status = 200, body = [Listing]))
)]
pub async fn admin_listings(
    caller: Caller,
    State(state): State<AppState>,
) -> Result<Json<Vec<Listing>>, ApiError> {
    caller.require(Role::Admin)?;
    Ok(Json(state.api.all_listings(&caller.token).await?))
}

/// admin_remove_listing
///
/// [Admin Route] Force-removes any listing, regardless of owner.
#[utoipa::path(
    delete,
    path = "/dashboard/admin/listings/{id}",
    params(("id" = String, Path, description = "Listing ID")),
    responses((status = 204, description = "Removed"))
)]
pub async fn admin_remove_listing(
    caller: Caller,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    caller.require(Role::Admin)?;
    state.api.remove_listing(&caller.token, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Landlord dashboard ---

#[utoipa::path(
    get,
    path = "/dashboard/landlord/my-listings",
    responses((status = 200, body = [Listing]))
)]
pub async fn my_listings(
    caller: Caller,
    State(state): State<AppState>,
) -> Result<Json<Vec<Listing>>, ApiError> {
    caller.require(Role::Landlord)?;
    Ok(Json(state.api.my_listings(&caller.token).await?))
}

/// create_listing
///
/// [Landlord Route] Publishes a new listing owned by the caller.
#[utoipa::path(
    post,
    path = "/listings/create",
    request_body = CreateListingRequest,
    responses((status = 201, body = Listing))
)]
pub async fn create_listing(
    caller: Caller,
    State(state): State<AppState>,
    Json(payload): Json<CreateListingRequest>,
) -> Result<(StatusCode, Json<Listing>), ApiError> {
    caller.require(Role::Landlord)?;
    let listing = state.api.create_listing(&caller.token, &payload).await?;
    Ok((StatusCode::CREATED, Json(listing)))
}

/// update_my_listing
///
/// [Landlord Route] Partial update; ownership is enforced by the backend.
#[utoipa::path(
    put,
    path = "/dashboard/landlord/my-listings/{id}",
    params(("id" = String, Path, description = "Listing ID")),
    request_body = UpdateListingRequest,
    responses((status = 200, body = Listing))
)]
pub async fn update_my_listing(
    caller: Caller,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateListingRequest>,
) -> Result<Json<Listing>, ApiError> {
    caller.require(Role::Landlord)?;
    Ok(Json(
        state.api.update_listing(&caller.token, &id, &payload).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/dashboard/landlord/my-listings/{id}",
    params(("id" = String, Path, description = "Listing ID")),
    responses((status = 204, description = "Deleted"))
)]
pub async fn delete_my_listing(
    caller: Caller,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    caller.require(Role::Landlord)?;
    state.api.delete_listing(&caller.token, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// landlord_requests
///
/// [Landlord Route] Rental requests received on the caller's listings.
#[utoipa::path(
    get,
    path = "/dashboard/landlord/requests",
    responses((status = 200, body = [RentalRequest]))
)]
pub async fn landlord_requests(
    caller: Caller,
    State(state): State<AppState>,
) -> Result<Json<Vec<RentalRequest>>, ApiError> {
    caller.require(Role::Landlord)?;
    Ok(Json(state.api.landlord_requests(&caller.token).await?))
}

/// respond_to_request
///
/// [Landlord Route] Approves or rejects a request; approval shares the landlord's phone.
#[utoipa::path(
    patch,
    path = "/dashboard/landlord/requests/{id}",
    params(("id" = String, Path, description = "Rental request ID")),
    request_body = RespondToRequest,
    responses((status = 200, body = RentalRequest))
)]
pub async fn respond_to_request(
    caller: Caller,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<RespondToRequest>,
) -> Result<Json<RentalRequest>, ApiError> {
    caller.require(Role::Landlord)?;
    Ok(Json(
        state
            .api
            .respond_to_request(&caller.token, &id, &payload)
            .await?,
    ))
}

// --- Tenant dashboard ---

#[utoipa::path(
    get,
    path = "/dashboard/tenant/my-requests",
    responses((status = 200, body = [RentalRequest]))
)]
pub async fn my_requests(
    caller: Caller,
    State(state): State<AppState>,
) -> Result<Json<Vec<RentalRequest>>, ApiError> {
    caller.require(Role::Tenant)?;
    Ok(Json(state.api.tenant_requests(&caller.token).await?))
}

/// create_request
///
/// [Tenant Route] Asks a landlord to rent one of their listings.
#[utoipa::path(
    post,
    path = "/dashboard/tenant/my-requests",
    request_body = CreateRentalRequest,
    responses((status = 201, body = RentalRequest))
)]
pub async fn create_request(
    caller: Caller,
    State(state): State<AppState>,
    Json(payload): Json<CreateRentalRequest>,
) -> Result<(StatusCode, Json<RentalRequest>), ApiError> {
    caller.require(Role::Tenant)?;
    let request = state.api.create_request(&caller.token, &payload).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

#[utoipa::path(
    get,
    path = "/dashboard/tenant/payments",
    responses((status = 200, body = [Payment]))
)]
pub async fn my_payments(
    caller: Caller,
    State(state): State<AppState>,
) -> Result<Json<Vec<Payment>>, ApiError> {
    caller.require(Role::Tenant)?;
    Ok(Json(state.api.my_payments(&caller.token).await?))
}

/// create_payment
///
/// [Tenant Route] Pays for an approved rental request.
#[utoipa::path(
    post,
    path = "/payment",
    request_body = CreatePaymentRequest,
    responses((status = 201, body = Payment))
)]
pub async fn create_payment(
    caller: Caller,
    State(state): State<AppState>,
    Json(payload): Json<CreatePaymentRequest>,
) -> Result<(StatusCode, Json<Payment>), ApiError> {
    caller.require(Role::Tenant)?;
    let payment = state.api.create_payment(&caller.token, &payload).await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

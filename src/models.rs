use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::{IntoParams, ToSchema};

use crate::error::IdentityError;

// --- Identity ---

/// Role
///
/// The closed set of marketplace roles. Adding a role is a data change in the
/// route table plus a variant here; nothing dispatches on role strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Role {
    Admin,
    Landlord,
    Tenant,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Landlord, Role::Tenant];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Landlord => "landlord",
            Role::Tenant => "tenant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "landlord" => Ok(Role::Landlord),
            "tenant" => Ok(Role::Tenant),
            other => Err(IdentityError::UnknownRole(other.to_string())),
        }
    }
}

/// CallerIdentity
///
/// The resolved caller for a single request. Re-derived from the session token on
/// every request and dropped when the request completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CallerIdentity {
    /// The backend's user id.
    pub id: String,
    pub email: Option<String>,
    pub role: Role,
}

impl CallerIdentity {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            email: None,
            role,
        }
    }
}

// --- Backend API records ---

/// ApiEnvelope
///
/// Every backend response is wrapped as `{ success, message, data }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub data: T,
}

/// Listing
///
/// A rental property advertised by a landlord.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Listing {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub landlord_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub location: String,
    pub rent_amount: f64,
    #[serde(default)]
    pub bedrooms: u32,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    #[ts(type = "string | null")]
    pub created_at: Option<DateTime<Utc>>,
}

/// RequestStatus
///
/// Lifecycle of a tenant's rental request, owned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum RequestStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// PaymentStatus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
}

/// RentalRequest
///
/// A tenant's request to rent a listing. Once approved, the landlord's phone is
/// revealed and the tenant can pay.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RentalRequest {
    #[serde(alias = "_id")]
    pub id: String,
    pub listing_id: String,
    pub tenant_id: String,
    #[serde(default)]
    pub status: RequestStatus,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub landlord_phone: Option<String>,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    #[ts(type = "string | null")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Payment
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Payment {
    #[serde(alias = "_id")]
    pub id: String,
    pub request_id: String,
    pub amount: f64,
    #[serde(default)]
    pub status: PaymentStatus,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    #[ts(type = "string | null")]
    pub created_at: Option<DateTime<Utc>>,
}

/// UserAccount
///
/// A marketplace account as the backend stores it (admin user management).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UserAccount {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

// --- Request payloads (forwarded verbatim to the backend) ---

/// CreateListingRequest
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreateListingRequest {
    pub title: String,
    pub description: String,
    pub location: String,
    pub rent_amount: f64,
    pub bedrooms: u32,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

/// UpdateListingRequest
///
/// Partial update; only provided fields are sent upstream.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UpdateListingRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rent_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amenities: Option<Vec<String>>,
}

/// CreateRentalRequest
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreateRentalRequest {
    pub listing_id: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub move_in_date: Option<String>,
}

/// RespondToRequest
///
/// A landlord's decision on a rental request. The phone number is shared with the
/// tenant on approval.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RespondToRequest {
    pub status: RequestStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub landlord_phone: Option<String>,
}

/// CreatePaymentRequest
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreatePaymentRequest {
    pub request_id: String,
    pub amount: f64,
}

/// UpdateProfileRequest
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UpdateProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// ChangePasswordRequest
///
/// Passed through to the backend; never logged.
#[derive(Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// UpdateUserStatusRequest
///
/// Admin moderation: activate/deactivate an account or change its role.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UpdateUserStatusRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

// --- Query parameters ---

/// ListingFilter
///
/// Search parameters for the public listings page (GET /listings).
#[derive(Debug, Clone, Serialize, Deserialize, Default, IntoParams)]
pub struct ListingFilter {
    pub location: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub bedrooms: Option<u32>,
}

/// AuthPageQuery
///
/// The login and registration pages receive the path to return to after sign-in.
#[derive(Debug, Clone, Deserialize, Default, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct AuthPageQuery {
    pub redirect_path: Option<String>,
}

// --- Page data (Output) ---

/// PageInfo
///
/// Page data for the static informational pages.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
pub struct PageInfo {
    pub title: String,
    pub description: String,
}

/// AuthPage
///
/// Page data for `/login` and `/register`. `redirect_path` is only echoed back when
/// it is a local path, so the sign-in flow cannot be turned into an open redirect.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AuthPage {
    pub page: String,
    pub redirect_path: String,
}

/// ProfilePage
///
/// The caller's own view of their session, regardless of role.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
pub struct ProfilePage {
    pub identity: CallerIdentity,
    pub dashboard: String,
}

#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use jsonwebtoken::{EncodingKey, Header, encode};
use rental_gateway::{
    AppConfig, AppState, MarketplaceApi, RouteGate, RouteTable,
    auth::{Claims, IdentityState},
    error::ApiError,
    models::{
        CallerIdentity, ChangePasswordRequest, CreateListingRequest, CreatePaymentRequest,
        CreateRentalRequest, Listing, ListingFilter, Payment, PaymentStatus, RentalRequest,
        RespondToRequest, Role, UpdateListingRequest, UpdateProfileRequest,
        UpdateUserStatusRequest, UserAccount,
    },
};
use std::{
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};
use tokio::net::TcpListener;

pub const TEST_JWT_SECRET: &str = "test-secret-value-1234567890";

pub fn identity(role: Role) -> CallerIdentity {
    CallerIdentity {
        id: format!("{role}-1"),
        email: Some(format!("{role}@example.com")),
        role,
    }
}

pub fn listing(id: &str) -> Listing {
    Listing {
        id: id.to_string(),
        landlord_id: Some("landlord-1".to_string()),
        title: "Two bedroom flat".to_string(),
        description: "Close to the station".to_string(),
        location: "Dhaka".to_string(),
        rent_amount: 25000.0,
        bedrooms: 2,
        ..Listing::default()
    }
}

pub fn rental_request(id: &str) -> RentalRequest {
    RentalRequest {
        id: id.to_string(),
        listing_id: "listing-1".to_string(),
        tenant_id: "tenant-1".to_string(),
        message: "Available from next month?".to_string(),
        ..RentalRequest::default()
    }
}

/// Mints an HS256 session token; `exp_offset` is seconds from now and may be negative.
pub fn mint_token(secret: &str, sub: &str, role: &str, exp_offset: i64) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64;

    let claims = Claims {
        sub: sub.to_string(),
        email: Some(format!("{sub}@example.com")),
        role: role.to_string(),
        iat: now as usize,
        exp: (now + exp_offset) as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

/// MockApi
///
/// Canned backend responses for handler and router tests.
#[derive(Default)]
pub struct MockApi {
    pub listings: Vec<Listing>,
    pub requests: Vec<RentalRequest>,
    pub fail_with: Option<u16>,
}

impl MockApi {
    fn check(&self) -> Result<(), ApiError> {
        match self.fail_with {
            Some(status) => Err(ApiError::Upstream {
                status,
                message: "mock failure".to_string(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl MarketplaceApi for MockApi {
    async fn list_listings(&self, _filter: &ListingFilter) -> Result<Vec<Listing>, ApiError> {
        self.check()?;
        Ok(self.listings.clone())
    }
    async fn get_listing(&self, _token: &str, id: &str) -> Result<Listing, ApiError> {
        self.check()?;
        self.listings
            .iter()
            .find(|l| l.id == id)
            .cloned()
            .ok_or(ApiError::Upstream {
                status: 404,
                message: "Listing not found".to_string(),
            })
    }
    async fn create_listing(&self, _token: &str, body: &CreateListingRequest) -> Result<Listing, ApiError> {
        self.check()?;
        Ok(Listing {
            id: "new-listing".to_string(),
            title: body.title.clone(),
            location: body.location.clone(),
            rent_amount: body.rent_amount,
            bedrooms: body.bedrooms,
            ..Listing::default()
        })
    }
    async fn my_listings(&self, _token: &str) -> Result<Vec<Listing>, ApiError> {
        self.check()?;
        Ok(self.listings.clone())
    }
    async fn update_listing(
        &self,
        token: &str,
        id: &str,
        _body: &UpdateListingRequest,
    ) -> Result<Listing, ApiError> {
        self.get_listing(token, id).await
    }
    async fn delete_listing(&self, _token: &str, _id: &str) -> Result<(), ApiError> {
        self.check()
    }
    async fn all_listings(&self, _token: &str) -> Result<Vec<Listing>, ApiError> {
        self.check()?;
        Ok(self.listings.clone())
    }
    async fn remove_listing(&self, _token: &str, _id: &str) -> Result<(), ApiError> {
        self.check()
    }
    async fn list_users(&self, _token: &str) -> Result<Vec<UserAccount>, ApiError> {
        self.check()?;
        Ok(vec![UserAccount {
            id: "tenant-1".to_string(),
            name: "Tina Tenant".to_string(),
            email: "tenant@example.com".to_string(),
            role: Role::Tenant,
            phone: None,
            is_active: true,
        }])
    }
    async fn update_user_status(
        &self,
        _token: &str,
        id: &str,
        body: &UpdateUserStatusRequest,
    ) -> Result<UserAccount, ApiError> {
        self.check()?;
        Ok(UserAccount {
            id: id.to_string(),
            name: "Tina Tenant".to_string(),
            email: "tenant@example.com".to_string(),
            role: body.role.unwrap_or(Role::Tenant),
            phone: None,
            is_active: body.is_active.unwrap_or(true),
        })
    }
    async fn update_profile(&self, _token: &str, body: &UpdateProfileRequest) -> Result<UserAccount, ApiError> {
        self.check()?;
        Ok(UserAccount {
            id: "landlord-1".to_string(),
            name: body.name.clone().unwrap_or_default(),
            email: "landlord@example.com".to_string(),
            role: Role::Landlord,
            phone: body.phone.clone(),
            is_active: true,
        })
    }
    async fn change_password(&self, _token: &str, _body: &ChangePasswordRequest) -> Result<(), ApiError> {
        self.check()
    }
    async fn create_request(&self, _token: &str, body: &CreateRentalRequest) -> Result<RentalRequest, ApiError> {
        self.check()?;
        Ok(RentalRequest {
            id: "new-request".to_string(),
            listing_id: body.listing_id.clone(),
            tenant_id: "tenant-1".to_string(),
            message: body.message.clone(),
            ..RentalRequest::default()
        })
    }
    async fn tenant_requests(&self, _token: &str) -> Result<Vec<RentalRequest>, ApiError> {
        self.check()?;
        Ok(self.requests.clone())
    }
    async fn landlord_requests(&self, _token: &str) -> Result<Vec<RentalRequest>, ApiError> {
        self.check()?;
        Ok(self.requests.clone())
    }
    async fn respond_to_request(
        &self,
        _token: &str,
        id: &str,
        body: &RespondToRequest,
    ) -> Result<RentalRequest, ApiError> {
        self.check()?;
        Ok(RentalRequest {
            id: id.to_string(),
            status: body.status,
            landlord_phone: body.landlord_phone.clone(),
            ..rental_request(id)
        })
    }
    async fn create_payment(&self, _token: &str, body: &CreatePaymentRequest) -> Result<Payment, ApiError> {
        self.check()?;
        Ok(Payment {
            id: "payment-1".to_string(),
            request_id: body.request_id.clone(),
            amount: body.amount,
            status: PaymentStatus::Paid,
            ..Payment::default()
        })
    }
    async fn my_payments(&self, _token: &str) -> Result<Vec<Payment>, ApiError> {
        self.check()?;
        Ok(vec![])
    }
}

pub fn create_app_state(identity: IdentityState, api: MockApi) -> AppState {
    let mut config = AppConfig::default();
    config.jwt_secret = TEST_JWT_SECRET.to_string();

    AppState {
        gate: Arc::new(RouteGate::new(RouteTable::marketplace_default())),
        identity,
        api: Arc::new(api),
        config,
    }
}

/// Serves `router` on an ephemeral port and returns its base address.
pub async fn spawn(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://127.0.0.1:{}", port)
}

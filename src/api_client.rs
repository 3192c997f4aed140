use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, header};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    error::ApiError,
    models::{
        ApiEnvelope, ChangePasswordRequest, CreateListingRequest, CreatePaymentRequest,
        CreateRentalRequest, Listing, ListingFilter, Payment, RentalRequest, RespondToRequest,
        UpdateListingRequest, UpdateProfileRequest, UpdateUserStatusRequest, UserAccount,
    },
};

/// MarketplaceApi
///
/// Thin wrappers over the backend REST API. Page handlers depend on this trait so
/// tests can swap in an in-memory double. Every call that acts on behalf of a caller
/// takes the caller's session token and forwards it unchanged.
#[async_trait]
pub trait MarketplaceApi: Send + Sync {
    // --- Listings ---
    async fn list_listings(&self, filter: &ListingFilter) -> Result<Vec<Listing>, ApiError>;
    async fn get_listing(&self, token: &str, id: &str) -> Result<Listing, ApiError>;
    async fn create_listing(&self, token: &str, body: &CreateListingRequest) -> Result<Listing, ApiError>;
    async fn my_listings(&self, token: &str) -> Result<Vec<Listing>, ApiError>;
    async fn update_listing(
        &self,
        token: &str,
        id: &str,
        body: &UpdateListingRequest,
    ) -> Result<Listing, ApiError>;
    async fn delete_listing(&self, token: &str, id: &str) -> Result<(), ApiError>;

    // --- Admin ---
    async fn all_listings(&self, token: &str) -> Result<Vec<Listing>, ApiError>;
    async fn remove_listing(&self, token: &str, id: &str) -> Result<(), ApiError>;
    async fn list_users(&self, token: &str) -> Result<Vec<UserAccount>, ApiError>;
    async fn update_user_status(
        &self,
        token: &str,
        id: &str,
        body: &UpdateUserStatusRequest,
    ) -> Result<UserAccount, ApiError>;

    // --- Account ---
    async fn update_profile(&self, token: &str, body: &UpdateProfileRequest) -> Result<UserAccount, ApiError>;
    async fn change_password(&self, token: &str, body: &ChangePasswordRequest) -> Result<(), ApiError>;

    // --- Rental requests ---
    async fn create_request(&self, token: &str, body: &CreateRentalRequest) -> Result<RentalRequest, ApiError>;
    async fn tenant_requests(&self, token: &str) -> Result<Vec<RentalRequest>, ApiError>;
    async fn landlord_requests(&self, token: &str) -> Result<Vec<RentalRequest>, ApiError>;
    async fn respond_to_request(
        &self,
        token: &str,
        id: &str,
        body: &RespondToRequest,
    ) -> Result<RentalRequest, ApiError>;

    // --- Payments ---
    async fn create_payment(&self, token: &str, body: &CreatePaymentRequest) -> Result<Payment, ApiError>;
    async fn my_payments(&self, token: &str) -> Result<Vec<Payment>, ApiError>;
}

/// ApiState
///
/// The backend client shared through the application state.
pub type ApiState = Arc<dyn MarketplaceApi>;

/// HttpMarketplaceApi
///
/// The reqwest implementation. The client is built once; clones share its
/// connection pool.
#[derive(Clone)]
pub struct HttpMarketplaceApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpMarketplaceApi {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let builder = self.client.request(method, format!("{}{}", self.base_url, path));
        match token {
            Some(token) => builder.header(header::AUTHORIZATION, token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|body| body.get("message").and_then(|m| m.as_str()).map(str::to_string))
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());
            return Err(ApiError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let envelope = response.json::<ApiEnvelope<T>>().await?;
        Ok(envelope.data)
    }

    async fn send_body<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        token: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send(self.request(method, path, Some(token)).json(body)).await
    }

    async fn send_empty(&self, builder: RequestBuilder) -> Result<(), ApiError> {
        // Deletions and password changes may answer without a `data` field.
        self.send::<Option<serde_json::Value>>(builder).await.map(|_| ())
    }
}

#[async_trait]
impl MarketplaceApi for HttpMarketplaceApi {
    async fn list_listings(&self, filter: &ListingFilter) -> Result<Vec<Listing>, ApiError> {
        self.send(self.request(Method::GET, "/listings", None).query(filter))
            .await
    }

    async fn get_listing(&self, token: &str, id: &str) -> Result<Listing, ApiError> {
        self.send(self.request(Method::GET, &format!("/listings/{id}"), Some(token)))
            .await
    }

    async fn create_listing(&self, token: &str, body: &CreateListingRequest) -> Result<Listing, ApiError> {
        self.send_body(Method::POST, "/landlords/listings", token, body)
            .await
    }

    async fn my_listings(&self, token: &str) -> Result<Vec<Listing>, ApiError> {
        self.send(self.request(Method::GET, "/landlords/listings", Some(token)))
            .await
    }

    async fn update_listing(
        &self,
        token: &str,
        id: &str,
        body: &UpdateListingRequest,
    ) -> Result<Listing, ApiError> {
        self.send_body(Method::PUT, &format!("/landlords/listings/{id}"), token, body)
            .await
    }

    async fn delete_listing(&self, token: &str, id: &str) -> Result<(), ApiError> {
        self.send_empty(self.request(
            Method::DELETE,
            &format!("/landlords/listings/{id}"),
            Some(token),
        ))
        .await
    }

    async fn all_listings(&self, token: &str) -> Result<Vec<Listing>, ApiError> {
        self.send(self.request(Method::GET, "/admin/listings", Some(token)))
            .await
    }

    async fn remove_listing(&self, token: &str, id: &str) -> Result<(), ApiError> {
        self.send_empty(self.request(
            Method::DELETE,
            &format!("/admin/listings/{id}"),
            Some(token),
        ))
        .await
    }

    async fn list_users(&self, token: &str) -> Result<Vec<UserAccount>, ApiError> {
        self.send(self.request(Method::GET, "/admin/users", Some(token)))
            .await
    }

    async fn update_user_status(
        &self,
        token: &str,
        id: &str,
        body: &UpdateUserStatusRequest,
    ) -> Result<UserAccount, ApiError> {
        self.send_body(Method::PATCH, &format!("/admin/users/{id}"), token, body)
            .await
    }

    async fn update_profile(&self, token: &str, body: &UpdateProfileRequest) -> Result<UserAccount, ApiError> {
        self.send_body(Method::PATCH, "/users/me", token, body).await
    }

    async fn change_password(&self, token: &str, body: &ChangePasswordRequest) -> Result<(), ApiError> {
        self.send_body::<_, Option<serde_json::Value>>(Method::POST, "/auth/change-password", token, body)
            .await
            .map(|_| ())
    }

    async fn create_request(&self, token: &str, body: &CreateRentalRequest) -> Result<RentalRequest, ApiError> {
        self.send_body(Method::POST, "/tenants/requests", token, body)
            .await
    }

    async fn tenant_requests(&self, token: &str) -> Result<Vec<RentalRequest>, ApiError> {
        self.send(self.request(Method::GET, "/tenants/requests", Some(token)))
            .await
    }

    async fn landlord_requests(&self, token: &str) -> Result<Vec<RentalRequest>, ApiError> {
        self.send(self.request(Method::GET, "/landlords/requests", Some(token)))
            .await
    }

    async fn respond_to_request(
        &self,
        token: &str,
        id: &str,
        body: &RespondToRequest,
    ) -> Result<RentalRequest, ApiError> {
        self.send_body(Method::PUT, &format!("/landlords/requests/{id}"), token, body)
            .await
    }

    async fn create_payment(&self, token: &str, body: &CreatePaymentRequest) -> Result<Payment, ApiError> {
        self.send_body(Method::POST, "/payments", token, body).await
    }

    async fn my_payments(&self, token: &str) -> Result<Vec<Payment>, ApiError> {
        self.send(self.request(Method::GET, "/payments/me", Some(token)))
            .await
    }
}

//! Registration endpoints.

use std::sync::Arc;

use async_trait::async_trait;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use domain::{AccountView, ShopView};
use registration::{
    CredentialHasher, ProvisionAccountAndShop, RegisterShopOwner, RegistrationError,
    RegistrationOutcome, SagaCoordinator, TokenIssuer, TokenPair,
};
use serde::{Deserialize, Serialize};
use store::{AccountStore, CategoryStore, ShopStore};

use crate::error::ApiError;

/// The registration workflow as the HTTP layer sees it.
///
/// Erases the coordinator's store/strategy generics so one router
/// serves every backend and strategy combination the process can be
/// configured with.
#[async_trait]
pub trait RegistrationService: Send + Sync {
    async fn register(
        &self,
        request: RegisterShopOwner,
    ) -> Result<RegistrationOutcome, RegistrationError>;

    async fn reissue(&self, email: &str, password: &str)
    -> Result<TokenPair, RegistrationError>;
}

#[async_trait]
impl<S, P, H, T> RegistrationService for SagaCoordinator<S, P, H, T>
where
    S: AccountStore + ShopStore + CategoryStore + Clone,
    P: ProvisionAccountAndShop,
    H: CredentialHasher,
    T: TokenIssuer,
{
    async fn register(
        &self,
        request: RegisterShopOwner,
    ) -> Result<RegistrationOutcome, RegistrationError> {
        self.register_shop_owner(request).await
    }

    async fn reissue(
        &self,
        email: &str,
        password: &str,
    ) -> Result<TokenPair, RegistrationError> {
        self.reissue_tokens(email, password).await
    }
}

/// Shared application state.
pub struct AppState {
    pub registration: Arc<dyn RegistrationService>,
}

/// Response body for a completed registration.
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub account: AccountView,
    pub shop: ShopView,
    pub tokens: TokenPair,
}

/// POST /register/shop-owner — registers a shop owner.
pub async fn shop_owner(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterShopOwner>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let outcome = state.registration.register(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            account: outcome.account,
            shop: outcome.shop,
            tokens: outcome.tokens,
        }),
    ))
}

/// Request body for token reissue.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReissueRequest {
    pub email: String,
    pub password: String,
}

/// POST /register/reissue — re-issues the credential pair for an
/// already-registered owner. Recovery path for registrations that
/// persisted but failed at token issuance.
pub async fn reissue(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ReissueRequest>,
) -> Result<Json<TokenPair>, ApiError> {
    let tokens = state
        .registration
        .reissue(&request.email, &request.password)
        .await?;
    Ok(Json(tokens))
}

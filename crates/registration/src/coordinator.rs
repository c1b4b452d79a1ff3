//! The registration saga coordinator.
//!
//! Orchestrates the fixed step sequence of shop-owner registration:
//! validate, resolve the category, hash the credential, provision the
//! account and shop through the configured strategy, then issue the
//! credential pair. The coordinator owns the state machine and the
//! failure reporting; how the account/shop pair stays atomic is the
//! strategy's business.

use std::time::Instant;

use domain::{AccountView, NewAccount, Role, ShopView};
use store::{AccountStore, CategoryStore, ShopStore};

use crate::category::CategoryResolver;
use crate::error::RegistrationError;
use crate::hasher::CredentialHasher;
use crate::provision::ShopDraft;
use crate::request::RegisterShopOwner;
use crate::state::RegistrationState;
use crate::strategy::ProvisionAccountAndShop;
use crate::token::{TokenIssuer, TokenPair};

/// Result of a completed registration: the two created records (with
/// the credential hash omitted) and the signed credential pair.
#[derive(Debug, Clone)]
pub struct RegistrationOutcome {
    pub account: AccountView,
    pub shop: ShopView,
    pub tokens: TokenPair,
}

/// Drives a shop-owner registration from request to outcome.
pub struct SagaCoordinator<S, P, H, T>
where
    S: AccountStore + ShopStore + CategoryStore + Clone,
    P: ProvisionAccountAndShop,
    H: CredentialHasher,
    T: TokenIssuer,
{
    categories: CategoryResolver<S>,
    store: S,
    strategy: P,
    hasher: H,
    issuer: T,
}

impl<S, P, H, T> SagaCoordinator<S, P, H, T>
where
    S: AccountStore + ShopStore + CategoryStore + Clone,
    P: ProvisionAccountAndShop,
    H: CredentialHasher,
    T: TokenIssuer,
{
    /// Creates a coordinator over a store, a provisioning strategy, a
    /// credential hasher and a token issuer.
    pub fn new(store: S, strategy: P, hasher: H, issuer: T) -> Self {
        Self {
            categories: CategoryResolver::new(store.clone()),
            store,
            strategy,
            hasher,
            issuer,
        }
    }

    /// Registers a shop owner: one account plus one linked shop, then
    /// a signed credential pair.
    ///
    /// On any failure before token issuance, no partial account/shop
    /// pair survives. A token issuance failure is the one exception:
    /// both records stay persisted and the caller retries issuance
    /// instead of re-registering.
    #[tracing::instrument(skip_all, fields(email, shop_name = %request.shop_name))]
    pub async fn register_shop_owner(
        &self,
        request: RegisterShopOwner,
    ) -> Result<RegistrationOutcome, RegistrationError> {
        let started = Instant::now();
        metrics::counter!("registrations_total").increment(1);

        let mut state = RegistrationState::Init;
        let result = self.run(request, &mut state).await;

        match &result {
            Ok(outcome) => {
                metrics::counter!("registrations_completed").increment(1);
                tracing::info!(
                    account_id = %outcome.account.id,
                    shop_id = %outcome.shop.id,
                    "registration completed"
                );
            }
            Err(e) => {
                Self::fail(&mut state, e);
            }
        }
        metrics::histogram!("registration_duration_seconds")
            .record(started.elapsed().as_secs_f64());

        result
    }

    async fn run(
        &self,
        request: RegisterShopOwner,
        state: &mut RegistrationState,
    ) -> Result<RegistrationOutcome, RegistrationError> {
        let request = request.normalized();
        tracing::Span::current().record("email", request.email.as_str());
        request.validate()?;

        let category = self.categories.resolve(&request.category_name).await?;
        Self::advance(state, RegistrationState::CategoryResolved);

        let password_hash = self.hasher.hash(&request.password)?;
        Self::advance(state, RegistrationState::CredentialHashed);

        let account = NewAccount {
            email: request.email.clone(),
            password_hash,
            display_name: request.owner_name.clone(),
            phone: request.phone.clone(),
            role: Role::ShopOwner,
        };
        let draft = ShopDraft::from_request(&request, &category);

        // The strategy owns atomicity of the pair; from out here the
        // two creations either both happened or neither did.
        let (account, shop) = self.strategy.provision(account, draft).await?;
        Self::advance(state, RegistrationState::UserCreated);
        Self::advance(state, RegistrationState::ShopCreated);

        let tokens = self.issuer.issue(&account, Some(&shop))?;
        Self::advance(state, RegistrationState::TokensIssued);
        Self::advance(state, RegistrationState::Completed);

        Ok(RegistrationOutcome {
            account: account.view(),
            shop: shop.view(),
            tokens,
        })
    }

    /// Re-issues a credential pair for an already-registered owner.
    ///
    /// This is the recovery path for a registration that persisted its
    /// records but failed at token issuance.
    pub async fn reissue_tokens(
        &self,
        email: &str,
        password: &str,
    ) -> Result<TokenPair, RegistrationError> {
        let email = email.trim().to_lowercase();

        let account = self
            .store
            .find_account_by_email(&email)
            .await?
            .ok_or_else(|| RegistrationError::AccountNotFound(email.clone()))?;

        if !self.hasher.verify(password, &account.password_hash) {
            return Err(RegistrationError::InvalidCredential(email));
        }

        let shops = self.store.find_shops_by_owner(account.id).await?;
        self.issuer.issue(&account, shops.first())
    }

    fn advance(state: &mut RegistrationState, next: RegistrationState) {
        debug_assert!(
            state.can_transition_to(next),
            "illegal saga transition {state} -> {next}"
        );
        *state = next;
    }

    fn fail(state: &mut RegistrationState, error: &RegistrationError) {
        let from = *state;
        *state = RegistrationState::Failed;
        metrics::counter!("registrations_failed", "kind" => error.kind()).increment(1);
        tracing::warn!(
            from_state = %from,
            kind = error.kind(),
            error = %error,
            "registration failed"
        );
    }
}

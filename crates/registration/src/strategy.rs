//! Interchangeable account+shop provisioning strategies.
//!
//! Both strategies produce the same observable outcome: either the
//! account and shop both exist with a valid owner link, or neither
//! survives. The manual saga gets there with an explicit compensation
//! per completed step; the transactional strategy leans on the store's
//! native multi-document atomicity. Keeping them behind one trait
//! stops the two code paths drifting apart.

use async_trait::async_trait;

use domain::{Account, NewAccount, Shop};
use store::{AccountStore, SessionStore, ShopStore, StoreError};

use crate::compensation::{CompensationAttempt, CompensationLog, CompensationOutcome};
use crate::error::RegistrationError;
use crate::provision::{ShopDraft, UserProvisioner, ShopProvisioner, map_account_insert_error};

/// Step name: create the account record.
pub const STEP_CREATE_ACCOUNT: &str = "create_account";

/// Step name: create the shop record.
pub const STEP_CREATE_SHOP: &str = "create_shop";

/// Creates the linked account and shop pair.
#[async_trait]
pub trait ProvisionAccountAndShop: Send + Sync {
    /// Provisions both records, guaranteeing that no partial pair
    /// survives a failure.
    async fn provision(
        &self,
        account: NewAccount,
        shop: ShopDraft,
    ) -> Result<(Account, Shop), RegistrationError>;
}

/// A step whose effect is durable and must be undone if the saga
/// fails later. One variant per compensatable step keeps the set of
/// undo actions in a single place.
#[derive(Debug, Clone)]
enum CompletedStep {
    AccountCreated(domain::AccountId),
}

/// Create-then-compensate strategy for stores without multi-document
/// transactions.
pub struct ManualSagaStrategy<S, L>
where
    S: AccountStore + ShopStore + Clone,
    L: CompensationLog,
{
    users: UserProvisioner<S>,
    shops: ShopProvisioner<S>,
    store: S,
    log: L,
}

impl<S, L> ManualSagaStrategy<S, L>
where
    S: AccountStore + ShopStore + Clone,
    L: CompensationLog,
{
    /// Creates a new manual saga strategy.
    pub fn new(store: S, log: L) -> Self {
        Self {
            users: UserProvisioner::new(store.clone()),
            shops: ShopProvisioner::new(store.clone()),
            store,
            log,
        }
    }

    /// Runs compensations in strict reverse order of completion.
    ///
    /// Each compensation is idempotent and its outcome only reaches
    /// the log; the caller still sees the error that triggered it.
    async fn compensate(&self, completed: &[CompletedStep]) {
        for step in completed.iter().rev() {
            match step {
                CompletedStep::AccountCreated(account_id) => {
                    let outcome = match self.store.delete_account(*account_id).await {
                        // false means the record was already gone,
                        // which a second run of the same compensation
                        // is allowed to observe.
                        Ok(_) => CompensationOutcome::Succeeded,
                        Err(e) => CompensationOutcome::Failed {
                            reason: e.to_string(),
                        },
                    };
                    self.log
                        .record(CompensationAttempt {
                            step: STEP_CREATE_ACCOUNT,
                            target_id: account_id.to_string(),
                            outcome,
                        })
                        .await;
                }
            }
        }
    }
}

#[async_trait]
impl<S, L> ProvisionAccountAndShop for ManualSagaStrategy<S, L>
where
    S: AccountStore + ShopStore + Clone,
    L: CompensationLog,
{
    async fn provision(
        &self,
        account: NewAccount,
        shop: ShopDraft,
    ) -> Result<(Account, Shop), RegistrationError> {
        let mut completed: Vec<CompletedStep> = Vec::new();

        let account = self.users.provision(account).await?;
        completed.push(CompletedStep::AccountCreated(account.id));

        match self.shops.provision(shop, account.id).await {
            Ok(shop) => Ok((account, shop)),
            Err(e) => {
                tracing::warn!(
                    account_id = %account.id,
                    error = %e,
                    "shop creation failed, compensating account"
                );
                self.compensate(&completed).await;
                Err(e)
            }
        }
    }
}

/// All-or-nothing strategy for stores with native multi-document
/// transactions. No compensation is ever needed for the pair; an
/// abort discards everything.
pub struct TransactionalStrategy<S: SessionStore> {
    store: S,
}

impl<S: SessionStore> TransactionalStrategy<S> {
    /// Creates a new transactional strategy.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    async fn run(
        &self,
        session: &mut S::Session,
        account: NewAccount,
        mut shop: ShopDraft,
    ) -> Result<(Account, Shop), RegistrationError> {
        // Same duplicate pre-check as the manual strategy, kept in
        // lockstep so the two paths report identical errors.
        if self
            .store
            .find_account_by_email_in(session, &account.email)
            .await?
            .is_some()
        {
            return Err(RegistrationError::DuplicateEmail(account.email));
        }

        // Re-read the category through the session and wait for the
        // read to finish before using its id; a category deactivated
        // since the coordinator's check fails the whole unit.
        let category = self
            .store
            .find_active_category_by_name_in(session, &shop.category_name)
            .await?
            .ok_or_else(|| RegistrationError::CategoryNotFound(shop.category_name.clone()))?;
        shop.category_id = category.id;

        let account = self
            .store
            .insert_account_in(session, account)
            .await
            .map_err(map_account_insert_error)?;

        let shop = self
            .store
            .insert_shop_in(session, shop.into_new_shop(account.id))
            .await
            .map_err(|e| RegistrationError::ShopCreationFailed(e.to_string()))?;

        Ok((account, shop))
    }
}

#[async_trait]
impl<S: SessionStore> ProvisionAccountAndShop for TransactionalStrategy<S> {
    async fn provision(
        &self,
        account: NewAccount,
        shop: ShopDraft,
    ) -> Result<(Account, Shop), RegistrationError> {
        let mut session = self.store.begin().await?;

        match self.run(&mut session, account, shop).await {
            Ok(pair) => {
                // A commit-time uniqueness conflict means a concurrent
                // session won the race for the email.
                self.store.commit(session).await.map_err(|e| match e {
                    StoreError::DuplicateKey { value, .. } => {
                        RegistrationError::DuplicateEmail(value)
                    }
                    other => RegistrationError::ShopCreationFailed(other.to_string()),
                })?;
                Ok(pair)
            }
            Err(e) => {
                if let Err(abort_err) = self.store.abort(session).await {
                    tracing::error!(error = %abort_err, "failed to abort registration session");
                }
                Err(e)
            }
        }
    }
}

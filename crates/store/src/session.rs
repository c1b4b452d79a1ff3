//! Multi-document session support for stores with native transactions.

use async_trait::async_trait;

use domain::{Account, Category, NewAccount, NewShop, Shop};

use crate::collections::{AccountStore, CategoryStore, ShopStore};
use crate::error::Result;

/// A store that can group multiple document writes into one atomic unit.
///
/// The session is a scoped resource: every session obtained from
/// [`SessionStore::begin`] must reach exactly one of [`commit`] or
/// [`abort`] before control returns to the caller, on success and
/// failure paths alike. Work unrelated to the store (token signing,
/// notification delivery) must not run while a session is open.
///
/// [`commit`]: SessionStore::commit
/// [`abort`]: SessionStore::abort
#[async_trait]
pub trait SessionStore: AccountStore + ShopStore + CategoryStore {
    /// The in-flight transaction handle.
    type Session: Send;

    /// Opens a new session.
    async fn begin(&self) -> Result<Self::Session>;

    /// Finds an account by email, reading through the session.
    async fn find_account_by_email_in(
        &self,
        session: &mut Self::Session,
        email: &str,
    ) -> Result<Option<Account>>;

    /// Finds an active category by exact name, reading through the session.
    async fn find_active_category_by_name_in(
        &self,
        session: &mut Self::Session,
        name: &str,
    ) -> Result<Option<Category>>;

    /// Stages an account insert inside the session.
    async fn insert_account_in(
        &self,
        session: &mut Self::Session,
        account: NewAccount,
    ) -> Result<Account>;

    /// Stages a shop insert inside the session.
    async fn insert_shop_in(&self, session: &mut Self::Session, shop: NewShop) -> Result<Shop>;

    /// Commits the session, making all staged writes durable at once.
    ///
    /// A uniqueness conflict detected at commit time (a concurrent
    /// session won the race) fails the whole session; none of the
    /// staged writes survive.
    async fn commit(&self, session: Self::Session) -> Result<()>;

    /// Aborts the session, discarding all staged writes.
    async fn abort(&self, session: Self::Session) -> Result<()>;
}

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use domain::{Account, AccountId, Category, NewAccount, NewShop, Shop, ShopId};

use crate::collections::{ACCOUNTS, AccountStore, CategoryStore, ShopStore};
use crate::error::{Result, StoreError};
use crate::session::SessionStore;

#[derive(Debug, Default)]
struct MemoryCollections {
    accounts: Vec<Account>,
    shops: Vec<Shop>,
    categories: Vec<Category>,
    fail_on_shop_insert: bool,
    fail_on_account_delete: bool,
    fail_on_commit: bool,
}

impl MemoryCollections {
    fn email_exists(&self, email: &str) -> bool {
        self.accounts.iter().any(|a| a.email == email)
    }
}

/// In-memory document store for testing and single-process deployments.
///
/// Enforces the same uniqueness constraint on `accounts.email` as the
/// PostgreSQL backend, and simulates multi-document sessions by staging
/// writes and applying them under one write lock at commit.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<MemoryCollections>>,
}

impl MemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the store to reject shop inserts.
    pub async fn set_fail_on_shop_insert(&self, fail: bool) {
        self.inner.write().await.fail_on_shop_insert = fail;
    }

    /// Configures the store to reject account deletes.
    ///
    /// Used to exercise the compensation-failure path.
    pub async fn set_fail_on_account_delete(&self, fail: bool) {
        self.inner.write().await.fail_on_account_delete = fail;
    }

    /// Configures the store to reject session commits.
    pub async fn set_fail_on_commit(&self, fail: bool) {
        self.inner.write().await.fail_on_commit = fail;
    }

    /// Returns the total number of account records.
    pub async fn account_count(&self) -> usize {
        self.inner.read().await.accounts.len()
    }

    /// Returns the total number of shop records.
    pub async fn shop_count(&self) -> usize {
        self.inner.read().await.shops.len()
    }
}

/// An open in-memory session holding staged writes.
#[derive(Debug, Default)]
pub struct MemorySession {
    staged_accounts: Vec<Account>,
    staged_shops: Vec<Shop>,
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn insert_account(&self, account: NewAccount) -> Result<Account> {
        let mut inner = self.inner.write().await;

        if inner.email_exists(&account.email) {
            return Err(StoreError::DuplicateKey {
                collection: ACCOUNTS,
                field: "email",
                value: account.email,
            });
        }

        let record = account.into_record();
        inner.accounts.push(record.clone());
        Ok(record)
    }

    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>> {
        let inner = self.inner.read().await;
        Ok(inner.accounts.iter().find(|a| a.email == email).cloned())
    }

    async fn count_accounts_by_email(&self, email: &str) -> Result<u64> {
        let inner = self.inner.read().await;
        Ok(inner.accounts.iter().filter(|a| a.email == email).count() as u64)
    }

    async fn delete_account(&self, id: AccountId) -> Result<bool> {
        let mut inner = self.inner.write().await;

        if inner.fail_on_account_delete {
            return Err(StoreError::Backend(
                "account delete rejected by store".to_string(),
            ));
        }

        let before = inner.accounts.len();
        inner.accounts.retain(|a| a.id != id);
        Ok(inner.accounts.len() < before)
    }
}

#[async_trait]
impl ShopStore for MemoryStore {
    async fn insert_shop(&self, shop: NewShop) -> Result<Shop> {
        let mut inner = self.inner.write().await;

        if inner.fail_on_shop_insert {
            return Err(StoreError::Backend(
                "shop insert rejected by store".to_string(),
            ));
        }

        let record = shop.into_record();
        inner.shops.push(record.clone());
        Ok(record)
    }

    async fn find_shops_by_owner(&self, owner_id: AccountId) -> Result<Vec<Shop>> {
        let inner = self.inner.read().await;
        Ok(inner
            .shops
            .iter()
            .filter(|s| s.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn count_shops_by_owner(&self, owner_id: AccountId) -> Result<u64> {
        let inner = self.inner.read().await;
        Ok(inner.shops.iter().filter(|s| s.owner_id == owner_id).count() as u64)
    }

    async fn delete_shop(&self, id: ShopId) -> Result<bool> {
        let mut inner = self.inner.write().await;
        let before = inner.shops.len();
        inner.shops.retain(|s| s.id != id);
        Ok(inner.shops.len() < before)
    }
}

#[async_trait]
impl CategoryStore for MemoryStore {
    async fn find_active_category_by_name(&self, name: &str) -> Result<Option<Category>> {
        let inner = self.inner.read().await;
        Ok(inner
            .categories
            .iter()
            .find(|c| c.name == name && c.active)
            .cloned())
    }

    async fn insert_category(&self, category: Category) -> Result<()> {
        self.inner.write().await.categories.push(category);
        Ok(())
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    type Session = MemorySession;

    async fn begin(&self) -> Result<Self::Session> {
        Ok(MemorySession::default())
    }

    async fn find_account_by_email_in(
        &self,
        session: &mut Self::Session,
        email: &str,
    ) -> Result<Option<Account>> {
        if let Some(staged) = session.staged_accounts.iter().find(|a| a.email == email) {
            return Ok(Some(staged.clone()));
        }
        self.find_account_by_email(email).await
    }

    async fn find_active_category_by_name_in(
        &self,
        _session: &mut Self::Session,
        name: &str,
    ) -> Result<Option<Category>> {
        // Categories are read-only for this workflow; the committed
        // view is the session view.
        self.find_active_category_by_name(name).await
    }

    async fn insert_account_in(
        &self,
        session: &mut Self::Session,
        account: NewAccount,
    ) -> Result<Account> {
        let inner = self.inner.read().await;
        let staged_conflict = session
            .staged_accounts
            .iter()
            .any(|a| a.email == account.email);
        if staged_conflict || inner.email_exists(&account.email) {
            return Err(StoreError::DuplicateKey {
                collection: ACCOUNTS,
                field: "email",
                value: account.email,
            });
        }
        drop(inner);

        let record = account.into_record();
        session.staged_accounts.push(record.clone());
        Ok(record)
    }

    async fn insert_shop_in(&self, session: &mut Self::Session, shop: NewShop) -> Result<Shop> {
        let inner = self.inner.read().await;
        if inner.fail_on_shop_insert {
            return Err(StoreError::Backend(
                "shop insert rejected by store".to_string(),
            ));
        }
        drop(inner);

        let record = shop.into_record();
        session.staged_shops.push(record.clone());
        Ok(record)
    }

    async fn commit(&self, session: Self::Session) -> Result<()> {
        let mut inner = self.inner.write().await;

        if inner.fail_on_commit {
            return Err(StoreError::Backend(
                "commit rejected by store".to_string(),
            ));
        }

        // Re-check uniqueness under the write lock: a concurrent
        // session may have committed the same email in the meantime.
        for staged in &session.staged_accounts {
            if inner.email_exists(&staged.email) {
                return Err(StoreError::DuplicateKey {
                    collection: ACCOUNTS,
                    field: "email",
                    value: staged.email.clone(),
                });
            }
        }

        inner.accounts.extend(session.staged_accounts);
        inner.shops.extend(session.staged_shops);
        Ok(())
    }

    async fn abort(&self, _session: Self::Session) -> Result<()> {
        // Staged writes never touched the collections; dropping the
        // session is the rollback.
        Ok(())
    }
}

//! Repository traits over the three persisted collections.

use async_trait::async_trait;
use domain::{Account, AccountId, Category, NewAccount, NewShop, Shop, ShopId};

use crate::error::Result;

/// Collection name: account records.
pub const ACCOUNTS: &str = "accounts";

/// Collection name: shop records.
pub const SHOPS: &str = "shops";

/// Collection name: category reference records.
pub const CATEGORIES: &str = "categories";

/// Operations on the `accounts` collection.
///
/// The collection carries a uniqueness constraint on `email`; inserts
/// that violate it fail with [`StoreError::DuplicateKey`] regardless of
/// what any earlier read reported.
///
/// [`StoreError::DuplicateKey`]: crate::StoreError::DuplicateKey
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Inserts a new account, returning the persisted record.
    async fn insert_account(&self, account: NewAccount) -> Result<Account>;

    /// Finds an account by exact email.
    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>>;

    /// Counts accounts with the given email (0 or 1 under the constraint).
    async fn count_accounts_by_email(&self, email: &str) -> Result<u64>;

    /// Deletes an account by ID. Returns true if a record was removed.
    ///
    /// Idempotent: deleting an already-absent record returns false
    /// without error, so a compensation can safely run twice.
    async fn delete_account(&self, id: AccountId) -> Result<bool>;
}

/// Operations on the `shops` collection.
#[async_trait]
pub trait ShopStore: Send + Sync {
    /// Inserts a new shop, returning the persisted record.
    async fn insert_shop(&self, shop: NewShop) -> Result<Shop>;

    /// Finds all shops owned by the given account.
    async fn find_shops_by_owner(&self, owner_id: AccountId) -> Result<Vec<Shop>>;

    /// Counts shops owned by the given account.
    async fn count_shops_by_owner(&self, owner_id: AccountId) -> Result<u64>;

    /// Deletes a shop by ID. Returns true if a record was removed.
    async fn delete_shop(&self, id: ShopId) -> Result<bool>;
}

/// Read access to the `categories` collection.
///
/// The registration workflow never writes categories; the insert below
/// exists for seeding and tests.
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Finds a category by exact name where `active == true`.
    async fn find_active_category_by_name(&self, name: &str) -> Result<Option<Category>>;

    /// Inserts a category record (seeding/ops tooling only).
    async fn insert_category(&self, category: Category) -> Result<()>;
}

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use sqlx::{PgPool, Postgres, Transaction};

use domain::{Account, AccountId, Category, NewAccount, NewShop, Shop, ShopId};

use crate::collections::{ACCOUNTS, AccountStore, CATEGORIES, CategoryStore, ShopStore};
use crate::error::{Result, StoreError};
use crate::session::SessionStore;

/// PostgreSQL-backed document store.
///
/// Each collection is a table with one JSONB `doc` column; the
/// uniqueness constraint on `accounts.email` is an expression index
/// over the document. Multi-document sessions map onto native
/// transactions.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new PostgreSQL store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to the given database URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = PgPool::connect(url).await?;
        Ok(Self { pool })
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }
}

fn doc_to<T: DeserializeOwned>(doc: serde_json::Value) -> Result<T> {
    serde_json::from_value(doc).map_err(StoreError::Serialization)
}

/// Maps a unique-index violation on `accounts_email_key` to the
/// taxonomy's duplicate-key error; everything else passes through.
fn map_account_insert_error(e: sqlx::Error, email: &str) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.constraint() == Some("accounts_email_key")
    {
        return StoreError::DuplicateKey {
            collection: ACCOUNTS,
            field: "email",
            value: email.to_string(),
        };
    }
    StoreError::Database(e)
}

#[async_trait]
impl AccountStore for PostgresStore {
    async fn insert_account(&self, account: NewAccount) -> Result<Account> {
        let record = account.into_record();
        let doc = serde_json::to_value(&record)?;

        sqlx::query("INSERT INTO accounts (id, doc) VALUES ($1, $2)")
            .bind(record.id.as_uuid())
            .bind(&doc)
            .execute(&self.pool)
            .await
            .map_err(|e| map_account_insert_error(e, &record.email))?;

        Ok(record)
    }

    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>> {
        let doc: Option<serde_json::Value> =
            sqlx::query_scalar("SELECT doc FROM accounts WHERE doc->>'email' = $1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;

        doc.map(doc_to).transpose()
    }

    async fn count_accounts_by_email(&self, email: &str) -> Result<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM accounts WHERE doc->>'email' = $1")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;
        Ok(count as u64)
    }

    async fn delete_account(&self, id: AccountId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ShopStore for PostgresStore {
    async fn insert_shop(&self, shop: NewShop) -> Result<Shop> {
        let record = shop.into_record();
        let doc = serde_json::to_value(&record)?;

        sqlx::query("INSERT INTO shops (id, doc) VALUES ($1, $2)")
            .bind(record.id.as_uuid())
            .bind(&doc)
            .execute(&self.pool)
            .await?;

        Ok(record)
    }

    async fn find_shops_by_owner(&self, owner_id: AccountId) -> Result<Vec<Shop>> {
        let docs: Vec<serde_json::Value> =
            sqlx::query_scalar("SELECT doc FROM shops WHERE doc->>'owner_id' = $1")
                .bind(owner_id.to_string())
                .fetch_all(&self.pool)
                .await?;

        docs.into_iter().map(doc_to).collect()
    }

    async fn count_shops_by_owner(&self, owner_id: AccountId) -> Result<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM shops WHERE doc->>'owner_id' = $1")
                .bind(owner_id.to_string())
                .fetch_one(&self.pool)
                .await?;
        Ok(count as u64)
    }

    async fn delete_shop(&self, id: ShopId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM shops WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl CategoryStore for PostgresStore {
    async fn find_active_category_by_name(&self, name: &str) -> Result<Option<Category>> {
        let doc: Option<serde_json::Value> = sqlx::query_scalar(
            "SELECT doc FROM categories WHERE doc->>'name' = $1 AND (doc->>'active')::boolean",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        doc.map(doc_to).transpose()
    }

    async fn insert_category(&self, category: Category) -> Result<()> {
        let doc = serde_json::to_value(&category)?;
        sqlx::query("INSERT INTO categories (id, doc) VALUES ($1, $2)")
            .bind(category.id.as_uuid())
            .bind(&doc)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.constraint() == Some("categories_name_key")
                {
                    return StoreError::DuplicateKey {
                        collection: CATEGORIES,
                        field: "name",
                        value: category.name.clone(),
                    };
                }
                StoreError::Database(e)
            })?;
        Ok(())
    }
}

#[async_trait]
impl SessionStore for PostgresStore {
    type Session = Transaction<'static, Postgres>;

    async fn begin(&self) -> Result<Self::Session> {
        Ok(self.pool.begin().await?)
    }

    async fn find_account_by_email_in(
        &self,
        session: &mut Self::Session,
        email: &str,
    ) -> Result<Option<Account>> {
        let doc: Option<serde_json::Value> =
            sqlx::query_scalar("SELECT doc FROM accounts WHERE doc->>'email' = $1")
                .bind(email)
                .fetch_optional(&mut **session)
                .await?;

        doc.map(doc_to).transpose()
    }

    async fn find_active_category_by_name_in(
        &self,
        session: &mut Self::Session,
        name: &str,
    ) -> Result<Option<Category>> {
        let doc: Option<serde_json::Value> = sqlx::query_scalar(
            "SELECT doc FROM categories WHERE doc->>'name' = $1 AND (doc->>'active')::boolean",
        )
        .bind(name)
        .fetch_optional(&mut **session)
        .await?;

        doc.map(doc_to).transpose()
    }

    async fn insert_account_in(
        &self,
        session: &mut Self::Session,
        account: NewAccount,
    ) -> Result<Account> {
        let record = account.into_record();
        let doc = serde_json::to_value(&record)?;

        // Under concurrent same-email sessions the second insert blocks
        // on the index entry and fails here once the first commits.
        sqlx::query("INSERT INTO accounts (id, doc) VALUES ($1, $2)")
            .bind(record.id.as_uuid())
            .bind(&doc)
            .execute(&mut **session)
            .await
            .map_err(|e| map_account_insert_error(e, &record.email))?;

        Ok(record)
    }

    async fn insert_shop_in(&self, session: &mut Self::Session, shop: NewShop) -> Result<Shop> {
        let record = shop.into_record();
        let doc = serde_json::to_value(&record)?;

        sqlx::query("INSERT INTO shops (id, doc) VALUES ($1, $2)")
            .bind(record.id.as_uuid())
            .bind(&doc)
            .execute(&mut **session)
            .await?;

        Ok(record)
    }

    async fn commit(&self, session: Self::Session) -> Result<()> {
        session.commit().await?;
        Ok(())
    }

    async fn abort(&self, session: Self::Session) -> Result<()> {
        session.rollback().await?;
        Ok(())
    }
}

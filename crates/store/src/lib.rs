//! Document store backends for the cafe registration workflow.
//!
//! This crate abstracts the three persisted collections (`accounts`,
//! `shops`, `categories`) behind repository traits, plus a session
//! trait for backends that support multi-document atomic transactions.
//!
//! Two backends are provided:
//! - [`MemoryStore`] for tests and single-process deployments
//! - [`PostgresStore`] storing each record as a JSONB document, with
//!   the email uniqueness constraint enforced by an expression index

pub mod collections;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod session;

pub use collections::{ACCOUNTS, AccountStore, CATEGORIES, CategoryStore, SHOPS, ShopStore};
pub use error::{Result, StoreError};
pub use memory::{MemorySession, MemoryStore};
pub use postgres::PostgresStore;
pub use session::SessionStore;

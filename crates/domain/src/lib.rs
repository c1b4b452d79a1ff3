//! Domain layer for the cafe registration workflow.
//!
//! This crate provides the persisted record types and their typed
//! identifiers:
//! - Account records with role assignment
//! - Shop (business entity) records with lifecycle status
//! - Category reference records
//! - Value objects shared across collections (IDs, geo locations)

pub mod account;
pub mod category;
pub mod shop;
pub mod value_objects;

pub use account::{Account, AccountView, NewAccount, Role};
pub use category::Category;
pub use shop::{NewShop, Shop, ShopStatus, ShopView};
pub use value_objects::{AccountId, CategoryId, GeoPoint, ShopId};

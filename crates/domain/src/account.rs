//! Account records and roles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::AccountId;

/// Role assigned to an account at creation.
///
/// Every account carries exactly one role; records are never created
/// without a role assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Customer,
    ShopOwner,
    Admin,
    Staff,
}

impl Role {
    /// Returns the role name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "Customer",
            Role::ShopOwner => "ShopOwner",
            Role::Admin => "Admin",
            Role::Staff => "Staff",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A persisted account record from the `accounts` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    /// Unique across the collection; enforced by the store at insert.
    pub email: String,
    /// One-way salted hash of the login credential.
    pub password_hash: String,
    pub display_name: String,
    pub phone: String,
    pub role: Role,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Returns the caller-facing view of this record.
    pub fn view(&self) -> AccountView {
        AccountView {
            id: self.id,
            email: self.email.clone(),
            display_name: self.display_name.clone(),
            phone: self.phone.clone(),
            role: self.role,
            active: self.active,
            created_at: self.created_at,
        }
    }
}

/// Input for creating an account record.
///
/// The store assigns the ID and creation timestamp when the record is
/// inserted; new accounts start active.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password_hash: String,
    pub display_name: String,
    pub phone: String,
    pub role: Role,
}

impl NewAccount {
    /// Materializes the full record with a fresh ID and timestamp.
    pub fn into_record(self) -> Account {
        Account {
            id: AccountId::new(),
            email: self.email,
            password_hash: self.password_hash,
            display_name: self.display_name,
            phone: self.phone,
            role: self.role,
            active: true,
            created_at: Utc::now(),
        }
    }
}

/// Caller-facing projection of an account. Never carries the hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountView {
    pub id: AccountId,
    pub email: String,
    pub display_name: String,
    pub phone: String,
    pub role: Role,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_account() -> NewAccount {
        NewAccount {
            email: "owner@example.com".to_string(),
            password_hash: "$2b$10$hash".to_string(),
            display_name: "Owner".to_string(),
            phone: "0901234567".to_string(),
            role: Role::ShopOwner,
        }
    }

    #[test]
    fn into_record_assigns_id_and_starts_active() {
        let record = new_account().into_record();
        assert!(record.active);
        assert_eq!(record.role, Role::ShopOwner);
        assert_eq!(record.email, "owner@example.com");
    }

    #[test]
    fn into_record_assigns_unique_ids() {
        let a = new_account().into_record();
        let b = new_account().into_record();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn view_omits_password_hash() {
        let record = new_account().into_record();
        let view = record.view();
        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "owner@example.com");
    }

    #[test]
    fn role_display() {
        assert_eq!(Role::Customer.to_string(), "Customer");
        assert_eq!(Role::ShopOwner.to_string(), "ShopOwner");
        assert_eq!(Role::Admin.to_string(), "Admin");
        assert_eq!(Role::Staff.to_string(), "Staff");
    }

    #[test]
    fn role_serialization_roundtrip() {
        let json = serde_json::to_string(&Role::ShopOwner).unwrap();
        let role: Role = serde_json::from_str(&json).unwrap();
        assert_eq!(role, Role::ShopOwner);
    }
}

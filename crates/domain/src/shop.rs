//! Shop (business entity) records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{AccountId, CategoryId, GeoPoint, ShopId};

/// Lifecycle status of a shop record.
///
/// Registration always creates shops as `Pending`; the approval flow
/// that moves them to `Approved` or `Rejected` lives elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ShopStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ShopStatus {
    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShopStatus::Pending => "Pending",
            ShopStatus::Approved => "Approved",
            ShopStatus::Rejected => "Rejected",
        }
    }
}

impl std::fmt::Display for ShopStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A persisted shop record from the `shops` collection.
///
/// Invariant: a shop never exists without a valid owner reference and
/// a valid, currently-active category reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shop {
    pub id: ShopId,
    pub name: String,
    pub address: String,
    pub description: String,
    pub phone: String,
    pub website: Option<String>,
    pub city: String,
    pub city_code: String,
    pub district: String,
    pub district_code: String,
    pub ward: String,
    pub location: GeoPoint,
    pub owner_id: AccountId,
    pub category_id: CategoryId,
    pub status: ShopStatus,
    pub created_at: DateTime<Utc>,
}

impl Shop {
    /// Returns the caller-facing view of this record.
    pub fn view(&self) -> ShopView {
        ShopView {
            id: self.id,
            name: self.name.clone(),
            address: self.address.clone(),
            description: self.description.clone(),
            phone: self.phone.clone(),
            website: self.website.clone(),
            city: self.city.clone(),
            district: self.district.clone(),
            ward: self.ward.clone(),
            location: self.location,
            owner_id: self.owner_id,
            category_id: self.category_id,
            status: self.status,
            created_at: self.created_at,
        }
    }
}

/// Input for creating a shop record.
#[derive(Debug, Clone)]
pub struct NewShop {
    pub name: String,
    pub address: String,
    pub description: String,
    pub phone: String,
    pub website: Option<String>,
    pub city: String,
    pub city_code: String,
    pub district: String,
    pub district_code: String,
    pub ward: String,
    /// Coordinates, when the owner supplied them.
    pub location: Option<GeoPoint>,
    pub owner_id: AccountId,
    pub category_id: CategoryId,
}

impl NewShop {
    /// Materializes the full record with a fresh ID and timestamp.
    ///
    /// Status starts as `Pending` and a missing location becomes the
    /// unset sentinel, not a null.
    pub fn into_record(self) -> Shop {
        Shop {
            id: ShopId::new(),
            name: self.name,
            address: self.address,
            description: self.description,
            phone: self.phone,
            website: self.website,
            city: self.city,
            city_code: self.city_code,
            district: self.district,
            district_code: self.district_code,
            ward: self.ward,
            location: self.location.unwrap_or_else(GeoPoint::unset),
            owner_id: self.owner_id,
            category_id: self.category_id,
            status: ShopStatus::Pending,
            created_at: Utc::now(),
        }
    }
}

/// Caller-facing projection of a shop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopView {
    pub id: ShopId,
    pub name: String,
    pub address: String,
    pub description: String,
    pub phone: String,
    pub website: Option<String>,
    pub city: String,
    pub district: String,
    pub ward: String,
    pub location: GeoPoint,
    pub owner_id: AccountId,
    pub category_id: CategoryId,
    pub status: ShopStatus,
    pub created_at: DateTime<Utc>,
}

//! Account and shop provisioning.

use domain::{Account, AccountId, Category, GeoPoint, NewAccount, NewShop, Shop};
use store::{AccountStore, ShopStore, StoreError};

use crate::error::RegistrationError;
use crate::request::RegisterShopOwner;

/// Everything needed to create a shop except the owner, which is not
/// known until the account insert succeeds.
#[derive(Debug, Clone)]
pub struct ShopDraft {
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
    pub location: Option<GeoPoint>,
    /// Category resolved by the coordinator before provisioning.
    pub category_id: domain::CategoryId,
    /// Kept alongside the id so the transactional strategy can re-read
    /// the category inside its session.
    pub category_name: String,
}

impl ShopDraft {
    /// Builds a draft from the inbound command and a resolved category.
    pub fn from_request(request: &RegisterShopOwner, category: &Category) -> Self {
        Self {
            name: request.shop_name.clone(),
            address: request.address.clone(),
            description: request.description.clone(),
            phone: request.phone.clone(),
            website: request.website.clone(),
            city: request.city.clone(),
            city_code: request.city_code.clone(),
            district: request.district.clone(),
            district_code: request.district_code.clone(),
            ward: request.ward.clone(),
            location: request.location,
            category_id: category.id,
            category_name: category.name.clone(),
        }
    }

    /// Completes the draft with the owner reference.
    pub fn into_new_shop(self, owner_id: AccountId) -> NewShop {
        NewShop {
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
            location: self.location,
            owner_id,
            category_id: self.category_id,
        }
    }
}

/// Maps an account-insert rejection to the registration taxonomy.
pub(crate) fn map_account_insert_error(e: StoreError) -> RegistrationError {
    match e {
        StoreError::DuplicateKey { value, .. } => RegistrationError::DuplicateEmail(value),
        other => RegistrationError::UserCreationFailed(other.to_string()),
    }
}

/// Creates account records.
pub struct UserProvisioner<A: AccountStore> {
    accounts: A,
}

impl<A: AccountStore> UserProvisioner<A> {
    /// Creates a new provisioner over the accounts collection.
    pub fn new(accounts: A) -> Self {
        Self { accounts }
    }

    /// Creates an account after a best-effort duplicate check.
    ///
    /// The pre-check gives a clean error on the common path; under a
    /// concurrent registration of the same email the store's
    /// uniqueness constraint is what actually decides, and its
    /// rejection maps to the same `DuplicateEmail`.
    pub async fn provision(&self, account: NewAccount) -> Result<Account, RegistrationError> {
        if self
            .accounts
            .find_account_by_email(&account.email)
            .await?
            .is_some()
        {
            return Err(RegistrationError::DuplicateEmail(account.email));
        }

        self.accounts
            .insert_account(account)
            .await
            .map_err(map_account_insert_error)
    }
}

/// Creates shop records linked to an owner and a category.
pub struct ShopProvisioner<S: ShopStore> {
    shops: S,
}

impl<S: ShopStore> ShopProvisioner<S> {
    /// Creates a new provisioner over the shops collection.
    pub fn new(shops: S) -> Self {
        Self { shops }
    }

    /// Creates a shop owned by the given account.
    pub async fn provision(
        &self,
        draft: ShopDraft,
        owner_id: AccountId,
    ) -> Result<Shop, RegistrationError> {
        self.shops
            .insert_shop(draft.into_new_shop(owner_id))
            .await
            .map_err(|e| RegistrationError::ShopCreationFailed(e.to_string()))
    }
}

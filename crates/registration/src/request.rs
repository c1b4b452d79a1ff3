//! The inbound registration command and its validation.

use domain::GeoPoint;
use serde::{Deserialize, Serialize};

use crate::error::RegistrationError;

/// Minimum accepted credential length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Command to register a shop owner: one account plus one shop,
/// referencing an existing active category by display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterShopOwner {
    pub shop_name: String,
    pub owner_name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub city_code: String,
    pub district: String,
    pub district_code: String,
    pub ward: String,
    pub description: String,
    pub category_name: String,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub location: Option<GeoPoint>,
}

impl RegisterShopOwner {
    /// Trims all fields and lowercases the email.
    ///
    /// Normalization happens before validation so the uniqueness
    /// constraint compares canonical emails.
    pub fn normalized(mut self) -> Self {
        self.shop_name = self.shop_name.trim().to_string();
        self.owner_name = self.owner_name.trim().to_string();
        self.email = self.email.trim().to_lowercase();
        self.phone = self.phone.trim().to_string();
        self.address = self.address.trim().to_string();
        self.category_name = self.category_name.trim().to_string();
        self
    }

    /// Checks required fields and basic shape. No side effects; runs
    /// before anything is written.
    pub fn validate(&self) -> Result<(), RegistrationError> {
        let required = [
            ("shop_name", &self.shop_name),
            ("owner_name", &self.owner_name),
            ("email", &self.email),
            ("password", &self.password),
            ("phone", &self.phone),
            ("address", &self.address),
            ("category_name", &self.category_name),
        ];
        for (field, value) in required {
            if value.is_empty() {
                return Err(RegistrationError::Validation(format!(
                    "{field} is required"
                )));
            }
        }

        if !self.email.contains('@') {
            return Err(RegistrationError::Validation(format!(
                "malformed email: {}",
                self.email
            )));
        }

        if self.password.len() < MIN_PASSWORD_LEN {
            return Err(RegistrationError::Validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        Ok(())
    }
}

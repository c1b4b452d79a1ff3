//! Registration error taxonomy.

use store::StoreError;
use thiserror::Error;

/// Errors that can occur during a registration saga.
///
/// The coordinator always surfaces the original failure; compensation
/// outcomes go to the [`CompensationLog`] and never replace the
/// primary error. Callers see one of these kinds, never a raw
/// store-level error for the provisioning writes.
///
/// [`CompensationLog`]: crate::compensation::CompensationLog
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// Missing or malformed input; detected before any write.
    #[error("Invalid registration request: {0}")]
    Validation(String),

    /// The referenced category does not exist or is inactive.
    #[error("Category not found or inactive: {0}")]
    CategoryNotFound(String),

    /// An account already exists for this email.
    ///
    /// Can fire even after a clean pre-check: under concurrent
    /// registration of the same email the store's uniqueness
    /// constraint decides the winner.
    #[error("An account already exists for email {0}")]
    DuplicateEmail(String),

    /// The account insert was rejected for a reason other than a
    /// duplicate email.
    #[error("Account creation failed: {0}")]
    UserCreationFailed(String),

    /// The shop insert was rejected. In the manual saga strategy this
    /// triggers compensation of the account created before it.
    #[error("Shop creation failed: {0}")]
    ShopCreationFailed(String),

    /// Token signing failed after both records were durably persisted.
    ///
    /// The account and shop are NOT rolled back; the caller should
    /// retry token issuance against the existing registration.
    #[error("Token issuance failed after registration was persisted: {0}")]
    TokenIssuanceFailed(String),

    /// No account exists for the given email (token reissue path).
    #[error("No account found for email {0}")]
    AccountNotFound(String),

    /// The supplied credential did not match (token reissue path).
    #[error("Credential verification failed for email {0}")]
    InvalidCredential(String),

    /// A store error on a read path outside the taxonomy above.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl RegistrationError {
    /// Returns a stable label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            RegistrationError::Validation(_) => "validation",
            RegistrationError::CategoryNotFound(_) => "category_not_found",
            RegistrationError::DuplicateEmail(_) => "duplicate_email",
            RegistrationError::UserCreationFailed(_) => "user_creation_failed",
            RegistrationError::ShopCreationFailed(_) => "shop_creation_failed",
            RegistrationError::TokenIssuanceFailed(_) => "token_issuance_failed",
            RegistrationError::AccountNotFound(_) => "account_not_found",
            RegistrationError::InvalidCredential(_) => "invalid_credential",
            RegistrationError::Store(_) => "store",
        }
    }

    /// Returns true if registration data was persisted and only the
    /// credential pair is missing, so a retry must not re-register.
    pub fn is_retriable_issuance(&self) -> bool {
        matches!(self, RegistrationError::TokenIssuanceFailed(_))
    }
}

/// Convenience type alias for registration results.
pub type Result<T> = std::result::Result<T, RegistrationError>;

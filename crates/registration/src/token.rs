//! Credential pair issuance.

use chrono::{DateTime, Duration, Utc};
use domain::{Account, Role, Shop};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::error::RegistrationError;

/// Access credential validity window.
pub const ACCESS_TOKEN_TTL_DAYS: i64 = 2;

/// Refresh credential validity window.
pub const REFRESH_TOKEN_TTL_DAYS: i64 = 7;

/// The two signing secrets, supplied by process configuration.
///
/// The secrets are independent; neither is ever derived from the
/// other. Absence is a startup configuration error, checked before
/// the first request (see the api crate's config).
#[derive(Clone)]
pub struct SigningKeys {
    access_secret: String,
    refresh_secret: String,
}

impl SigningKeys {
    /// Creates signing keys, rejecting empty secrets.
    pub fn new(
        access_secret: impl Into<String>,
        refresh_secret: impl Into<String>,
    ) -> Result<Self, RegistrationError> {
        let access_secret = access_secret.into();
        let refresh_secret = refresh_secret.into();
        if access_secret.is_empty() || refresh_secret.is_empty() {
            return Err(RegistrationError::TokenIssuanceFailed(
                "signing secret is empty".to_string(),
            ));
        }
        Ok(Self {
            access_secret,
            refresh_secret,
        })
    }
}

impl std::fmt::Debug for SigningKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Secrets never reach logs.
        f.debug_struct("SigningKeys").finish_non_exhaustive()
    }
}

/// Identity facts embedded in both credentials of a pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account ID.
    pub sub: String,
    pub email: String,
    pub role: Role,
    /// Present only for roles that own a shop.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub shop_id: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    /// Builds the claim set for an account.
    ///
    /// The builder is keyed by role and exhaustive: adding a new role
    /// forces a decision here about which claims it carries, instead
    /// of an inline conditional silently leaving one out.
    pub fn for_account(
        account: &Account,
        shop: Option<&Shop>,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        let base = Self {
            sub: account.id.to_string(),
            email: account.email.clone(),
            role: account.role,
            shop_id: None,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        match account.role {
            Role::ShopOwner => Self {
                shop_id: shop.map(|s| s.id.to_string()),
                ..base
            },
            Role::Customer | Role::Admin | Role::Staff => base,
        }
    }
}

/// An ephemeral, non-persisted credential pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub access_expires_at: DateTime<Utc>,
    pub refresh_expires_at: DateTime<Utc>,
}

/// Signs a credential pair from an account (and its shop, when the
/// role warrants one).
pub trait TokenIssuer: Send + Sync {
    /// Issues an access/refresh pair carrying the same claims.
    fn issue(&self, account: &Account, shop: Option<&Shop>) -> Result<TokenPair, RegistrationError>;
}

/// Production issuer: HMAC-SHA-256 over two independent secrets.
#[derive(Clone)]
pub struct JwtTokenIssuer {
    access_encoding: EncodingKey,
    refresh_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_decoding: DecodingKey,
}

impl JwtTokenIssuer {
    /// Creates an issuer from validated signing keys.
    pub fn new(keys: &SigningKeys) -> Self {
        Self {
            access_encoding: EncodingKey::from_secret(keys.access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(keys.refresh_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(keys.access_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(keys.refresh_secret.as_bytes()),
        }
    }

    /// Decodes and validates an access token.
    pub fn decode_access(&self, token: &str) -> Result<Claims, RegistrationError> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &self.access_decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| RegistrationError::TokenIssuanceFailed(e.to_string()))
    }

    /// Decodes and validates a refresh token.
    pub fn decode_refresh(&self, token: &str) -> Result<Claims, RegistrationError> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &self.refresh_decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| RegistrationError::TokenIssuanceFailed(e.to_string()))
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue(&self, account: &Account, shop: Option<&Shop>) -> Result<TokenPair, RegistrationError> {
        let now = Utc::now();
        let access_expires_at = now + Duration::days(ACCESS_TOKEN_TTL_DAYS);
        let refresh_expires_at = now + Duration::days(REFRESH_TOKEN_TTL_DAYS);

        let access_claims = Claims::for_account(account, shop, now, access_expires_at);
        let refresh_claims = Claims::for_account(account, shop, now, refresh_expires_at);

        let header = Header::new(Algorithm::HS256);
        let access_token = encode(&header, &access_claims, &self.access_encoding)
            .map_err(|e| RegistrationError::TokenIssuanceFailed(e.to_string()))?;
        let refresh_token = encode(&header, &refresh_claims, &self.refresh_encoding)
            .map_err(|e| RegistrationError::TokenIssuanceFailed(e.to_string()))?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            access_expires_at,
            refresh_expires_at,
        })
    }
}

//! Shop-owner registration saga.
//!
//! A registration creates an account and a dependent shop as one
//! logical unit, referencing an existing active category. Atomicity of
//! the pair is provided by one of two interchangeable strategies:
//! [`ManualSagaStrategy`] (create then compensate on failure) or
//! [`TransactionalStrategy`] (one native store transaction). The
//! [`SagaCoordinator`] drives the shared step sequence around whichever
//! strategy is configured.

pub mod category;
pub mod compensation;
pub mod coordinator;
pub mod error;
pub mod hasher;
pub mod provision;
pub mod request;
pub mod state;
pub mod strategy;
pub mod token;

pub use category::CategoryResolver;
pub use compensation::{
    CompensationAttempt, CompensationLog, CompensationOutcome, InMemoryCompensationLog,
    TracingCompensationLog,
};
pub use coordinator::{RegistrationOutcome, SagaCoordinator};
pub use error::{RegistrationError, Result};
pub use hasher::{BCRYPT_COST, BcryptHasher, CredentialHasher, PlainHasher};
pub use provision::{ShopDraft, ShopProvisioner, UserProvisioner};
pub use request::{MIN_PASSWORD_LEN, RegisterShopOwner};
pub use state::RegistrationState;
pub use strategy::{
    ManualSagaStrategy, ProvisionAccountAndShop, STEP_CREATE_ACCOUNT, STEP_CREATE_SHOP,
    TransactionalStrategy,
};
pub use token::{
    ACCESS_TOKEN_TTL_DAYS, Claims, JwtTokenIssuer, REFRESH_TOKEN_TTL_DAYS, SigningKeys,
    TokenIssuer, TokenPair,
};

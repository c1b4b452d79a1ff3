//! Registration saga state machine.

use serde::{Deserialize, Serialize};

/// The state of a registration saga in its lifecycle.
///
/// State transitions:
/// ```text
/// Init ──► CategoryResolved ──► CredentialHashed ──► UserCreated
///      ──► ShopCreated ──► TokensIssued ──► Completed
/// ```
/// with `Failed` reachable from every non-terminal state. The failure
/// reason travels in the error, not in the state, mirroring how the
/// coordinator reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RegistrationState {
    /// Request accepted, nothing resolved yet.
    #[default]
    Init,

    /// The category exists and is active.
    CategoryResolved,

    /// The login credential has been hashed.
    CredentialHashed,

    /// The account record is persisted.
    UserCreated,

    /// The shop record is persisted and linked to the account.
    ShopCreated,

    /// The credential pair has been signed.
    TokensIssued,

    /// Registration finished successfully (terminal state).
    Completed,

    /// The saga stopped on a failure (terminal state).
    Failed,
}

impl RegistrationState {
    /// Returns true if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RegistrationState::Completed | RegistrationState::Failed
        )
    }

    /// Returns true if `next` is a legal successor of this state.
    ///
    /// Every non-terminal state may fail; forward progress only moves
    /// one step at a time.
    pub fn can_transition_to(&self, next: RegistrationState) -> bool {
        use RegistrationState::*;

        if self.is_terminal() {
            return false;
        }
        if next == Failed {
            return true;
        }

        matches!(
            (self, next),
            (Init, CategoryResolved)
                | (CategoryResolved, CredentialHashed)
                | (CredentialHashed, UserCreated)
                | (UserCreated, ShopCreated)
                | (ShopCreated, TokensIssued)
                | (TokensIssued, Completed)
        )
    }

    /// Returns the state name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationState::Init => "Init",
            RegistrationState::CategoryResolved => "CategoryResolved",
            RegistrationState::CredentialHashed => "CredentialHashed",
            RegistrationState::UserCreated => "UserCreated",
            RegistrationState::ShopCreated => "ShopCreated",
            RegistrationState::TokensIssued => "TokensIssued",
            RegistrationState::Completed => "Completed",
            RegistrationState::Failed => "Failed",
        }
    }
}

impl std::fmt::Display for RegistrationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

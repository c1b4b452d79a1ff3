use thiserror::Error;

/// Errors that can occur when interacting with the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An insert violated a uniqueness constraint.
    ///
    /// This is the store acting as the source of truth under races:
    /// it can fire even when a pre-check saw no conflicting record.
    #[error("Duplicate key in {collection}.{field}: {value}")]
    DuplicateKey {
        collection: &'static str,
        field: &'static str,
        value: String,
    },

    /// The referenced record was not found.
    #[error("Record not found in {collection}: {id}")]
    NotFound {
        collection: &'static str,
        id: String,
    },

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A backend-specific rejection that fits no other variant.
    #[error("Store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Returns true if this is a uniqueness-constraint rejection.
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, StoreError::DuplicateKey { .. })
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

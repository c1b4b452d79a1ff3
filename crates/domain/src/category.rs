//! Category reference records.

use serde::{Deserialize, Serialize};

use crate::value_objects::CategoryId;

/// A read-mostly business category from the `categories` collection.
///
/// The registration workflow only ever reads categories; inactive ones
/// are treated as nonexistent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: String,
    pub active: bool,
}

impl Category {
    /// Creates an active category with a fresh ID.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: CategoryId::new(),
            name: name.into(),
            description: description.into(),
            active: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_category_is_active() {
        let category = Category::new("Cafe & Coffee Shop", "Cafes and coffee shops");
        assert!(category.active);
        assert_eq!(category.name, "Cafe & Coffee Shop");
    }

    #[test]
    fn serialization_roundtrip() {
        let category = Category::new("Bakery", "Bakeries");
        let json = serde_json::to_string(&category).unwrap();
        let deserialized: Category = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.id, category.id);
        assert_eq!(deserialized.name, "Bakery");
    }
}

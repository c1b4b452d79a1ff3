//! Category resolution.

use domain::Category;
use store::CategoryStore;

use crate::error::RegistrationError;

/// Resolves a business category by display name, rejecting unknown or
/// inactive ones. Pure read; no side effects.
pub struct CategoryResolver<C: CategoryStore> {
    categories: C,
}

impl<C: CategoryStore> CategoryResolver<C> {
    /// Creates a new resolver over the given category collection.
    pub fn new(categories: C) -> Self {
        Self { categories }
    }

    /// Looks up an active category by exact name.
    pub async fn resolve(&self, name: &str) -> Result<Category, RegistrationError> {
        self.categories
            .find_active_category_by_name(name)
            .await?
            .ok_or_else(|| RegistrationError::CategoryNotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::MemoryStore;

    #[tokio::test]
    async fn resolves_active_category() {
        let store = MemoryStore::new();
        let category = Category::new("Cafe & Coffee Shop", "Cafes");
        store.insert_category(category.clone()).await.unwrap();

        let resolver = CategoryResolver::new(store);
        let resolved = resolver.resolve("Cafe & Coffee Shop").await.unwrap();
        assert_eq!(resolved.id, category.id);
    }

    #[tokio::test]
    async fn unknown_category_rejected() {
        let resolver = CategoryResolver::new(MemoryStore::new());
        let result = resolver.resolve("Nonexistent Category").await;
        assert!(matches!(
            result,
            Err(RegistrationError::CategoryNotFound(_))
        ));
    }

    #[tokio::test]
    async fn inactive_category_rejected() {
        let store = MemoryStore::new();
        let mut category = Category::new("Retired", "No longer offered");
        category.active = false;
        store.insert_category(category).await.unwrap();

        let resolver = CategoryResolver::new(store);
        let result = resolver.resolve("Retired").await;
        assert!(matches!(
            result,
            Err(RegistrationError::CategoryNotFound(_))
        ));
    }
}

//! # Product Store
//!
//! The product collection and its mutations.
//!
//! ## Locking
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  list / search / stats ──► read lock ──► clone ──► release              │
//! │                                            │                            │
//! │                                            ▼                            │
//! │                              query pipeline runs on the snapshot        │
//! │                                                                         │
//! │  create / update / delete ──► write lock ──► mutate ──► release         │
//! │                                                                         │
//! │  Readers never observe a collection mid-mutation.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use catalog_core::{NewProduct, Product, ProductChanges};

const ENTITY: &str = "Product";

/// Shared handle to the product collection.
///
/// Cloning is cheap; clones share the same collection.
///
/// ## Usage
/// ```rust,ignore
/// let store = ProductStore::new();
///
/// let created = store.insert(new_product).await;
/// let snapshot = store.snapshot().await;
/// let removed = store.delete(&created.id).await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProductStore {
    products: Arc<RwLock<Vec<Product>>>,
}

impl ProductStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `products`.
    ///
    /// ## Returns
    /// * `Err(StoreError::Duplicate)` - two products share an id
    pub fn with_products(products: Vec<Product>) -> StoreResult<Self> {
        for (i, product) in products.iter().enumerate() {
            if products[..i].iter().any(|p| p.id == product.id) {
                return Err(StoreError::duplicate("id", product.id.clone()));
            }
        }

        Ok(ProductStore {
            products: Arc::new(RwLock::new(products)),
        })
    }

    /// An owned copy of the collection, in insertion order.
    pub async fn snapshot(&self) -> Vec<Product> {
        self.products.read().await.clone()
    }

    /// Gets a product by its id.
    pub async fn get(&self, id: &str) -> StoreResult<Product> {
        self.products
            .read()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(ENTITY, id))
    }

    /// Adds a product, assigning a fresh UUID v4 and both timestamps.
    pub async fn insert(&self, new_product: NewProduct) -> Product {
        self.insert_at(new_product, Utc::now()).await
    }

    /// Like [`insert`](Self::insert) with an explicit creation time.
    pub async fn insert_at(&self, new_product: NewProduct, now: DateTime<Utc>) -> Product {
        let product = new_product.into_product(Uuid::new_v4().to_string(), now);
        debug!(id = %product.id, name = %product.name, "Inserting product");

        self.products.write().await.push(product.clone());
        product
    }

    /// Applies `changes` to a product and refreshes `updated_at`.
    ///
    /// ## Returns
    /// * `Ok(Product)` - the product after the update
    /// * `Err(StoreError::NotFound)` - no product has this id
    pub async fn update(&self, id: &str, changes: ProductChanges) -> StoreResult<Product> {
        self.update_at(id, changes, Utc::now()).await
    }

    /// Like [`update`](Self::update) with an explicit modification time.
    pub async fn update_at(
        &self,
        id: &str,
        changes: ProductChanges,
        now: DateTime<Utc>,
    ) -> StoreResult<Product> {
        debug!(id = %id, "Updating product");

        let mut products = self.products.write().await;
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::not_found(ENTITY, id))?;

        changes.apply_to(product, now);
        Ok(product.clone())
    }

    /// Removes a product and returns it.
    pub async fn delete(&self, id: &str) -> StoreResult<Product> {
        debug!(id = %id, "Deleting product");

        let mut products = self.products.write().await;
        let index = products
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| StoreError::not_found(ENTITY, id))?;

        Ok(products.remove(index))
    }

    /// Number of products.
    pub async fn count(&self) -> usize {
        self.products.read().await.len()
    }

    /// Removes every product.
    pub async fn clear(&self) {
        debug!("Clearing product store");
        self.products.write().await.clear();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::{Category, Money};
    use chrono::{Duration, TimeZone};

    fn new_product(name: &str) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            description: format!("{} description", name),
            price: Money::from_cents(1500),
            category: Category::Kitchen,
            in_stock: true,
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_timestamps() {
        let store = ProductStore::new();
        let product = store.insert_at(new_product("Kettle"), t0()).await;

        assert!(Uuid::parse_str(&product.id).is_ok());
        assert_eq!(product.created_at, t0());
        assert_eq!(product.updated_at, t0());
        assert_eq!(store.count().await, 1);
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let store = ProductStore::new();
        let a = store.insert(new_product("A")).await;
        let b = store.insert(new_product("B")).await;
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_get_unknown_id() {
        let store = ProductStore::new();
        let err = store.get("missing").await.unwrap_err();
        assert_eq!(err, StoreError::not_found("Product", "missing"));
    }

    #[tokio::test]
    async fn test_update_refreshes_updated_at_only() {
        let store = ProductStore::new();
        let created = store.insert_at(new_product("Pan"), t0()).await;
        let later = t0() + Duration::hours(3);

        let changes = ProductChanges {
            in_stock: Some(false),
            ..Default::default()
        };
        let updated = store.update_at(&created.id, changes, later).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, t0());
        assert_eq!(updated.updated_at, later);
        assert!(!updated.in_stock);
        assert_eq!(store.get(&created.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let store = ProductStore::new();
        let result = store.update("nope", ProductChanges::default()).await;
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_returns_removed() {
        let store = ProductStore::new();
        let created = store.insert(new_product("Whisk")).await;

        let removed = store.delete(&created.id).await.unwrap();
        assert_eq!(removed, created);
        assert_eq!(store.count().await, 0);
        assert!(store.delete(&created.id).await.is_err());
    }

    #[tokio::test]
    async fn test_snapshot_is_detached() {
        let store = ProductStore::new();
        store.insert(new_product("Spoon")).await;

        let snapshot = store.snapshot().await;
        store.clear().await;

        assert_eq!(snapshot.len(), 1);
        assert_eq!(store.count().await, 0);
    }

    #[tokio::test]
    async fn test_with_products_rejects_duplicate_ids() {
        let a = new_product("A").into_product("same".to_string(), t0());
        let b = new_product("B").into_product("same".to_string(), t0());

        let err = ProductStore::with_products(vec![a, b]).unwrap_err();
        assert_eq!(err, StoreError::duplicate("id", "same"));
    }

    #[tokio::test]
    async fn test_clones_share_collection() {
        let store = ProductStore::new();
        let handle = store.clone();
        handle.insert(new_product("Bowl")).await;
        assert_eq!(store.count().await, 1);
    }
}

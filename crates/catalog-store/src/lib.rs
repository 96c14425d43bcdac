//! # catalog-store: Product Collection for the Catalog Service
//!
//! This crate owns the in-memory product collection. There is no
//! persistence: the collection lives for the lifetime of the process.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Catalog Service Data Flow                          │
//! │                                                                         │
//! │  HTTP handler (list_products)                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  catalog-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐   │   │
//! │  │   │ ProductStore  │    │  StoreError   │    │    seed      │   │   │
//! │  │   │ (store.rs)    │    │  (error.rs)   │    │  (seed.rs)   │   │   │
//! │  │   │               │    │               │    │              │   │   │
//! │  │   │ RwLock<Vec<>> │    │ NotFound      │    │ demo catalog │   │   │
//! │  │   │ snapshot/CRUD │    │ Duplicate     │    │              │   │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘   │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  catalog-core query pipeline runs on the snapshot                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - The collection and its mutations
//! - [`error`] - Store error types
//! - [`seed`] - Demo catalog
//!
//! ## Usage
//!
//! ```rust
//! use catalog_store::{seed, ProductStore};
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let store = ProductStore::with_products(seed::sample_products(chrono::Utc::now())).unwrap();
//! assert!(store.count().await > 0);
//! # });
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod seed;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use store::ProductStore;

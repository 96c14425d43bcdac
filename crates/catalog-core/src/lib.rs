//! # catalog-core: Pure Query and Error Logic for the Catalog Service
//!
//! This crate is the **heart** of the catalog service. It turns raw query
//! strings into a deterministic transformation pipeline over a product
//! collection, computes aggregate statistics, and classifies/renders every
//! failure uniformly. It performs no I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Catalog Service Architecture                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    catalog-api (axum)                           │   │
//! │  │    routes ──► extractors ──► error boundary ──► envelopes       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ catalog-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   query   │  │   stats   │  │   error   │  │  metrics  │  │   │
//! │  │   │ parse →   │  │ overview  │  │ taxonomy  │  │ rolling   │  │   │
//! │  │   │ transform │  │ pricing   │  │ render    │  │ windows   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO GLOBAL STATE • PURE FUNCTIONS                     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              catalog-store (in-memory collection)               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Category, drafts and patches)
//! - [`money`] - Integer-cent money type
//! - [`error`] - Error taxonomy, rendering and classification
//! - [`validation`] - Product body validation
//! - [`query`] - Query parsing and the filter → search → sort → paginate pipeline
//! - [`stats`] - Aggregate analytics
//! - [`response`] - Success envelopes
//! - [`metrics`] - Rolling error recorder
//!
//! ## Example Usage
//!
//! ```rust
//! use catalog_core::query::{ProductQuery, QueryParams};
//!
//! let raw = QueryParams::from_pairs([("sortBy", "price"), ("limit", "2")]);
//! let query = ProductQuery::parse(&raw).unwrap();
//! let page = query.run(&[]);
//! assert_eq!(page.meta.total_items, 0);
//! assert_eq!(page.meta.total_pages, 0);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod metrics;
pub mod money;
pub mod query;
pub mod response;
pub mod stats;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CatalogError, CatalogResult, ErrorKind, ValidationError};
pub use money::Money;
pub use response::{ApiResponse, RequestContext};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Page used when `page` is absent or not a number.
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when `limit` is absent or not a number.
pub const DEFAULT_LIMIT: u32 = 10;

/// Largest page size a client may request.
pub const MAX_LIMIT: u32 = 100;

/// Search term length bounds (after trimming).
pub const MIN_SEARCH_LENGTH: usize = 2;
pub const MAX_SEARCH_LENGTH: usize = 100;

/// Product field limits.
pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_DESCRIPTION_LENGTH: usize = 500;

/// Price bounds in cents ($0.01 to $999,999.00).
pub const MIN_PRICE_CENTS: i64 = 1;
pub const MAX_PRICE_CENTS: i64 = 99_999_900;

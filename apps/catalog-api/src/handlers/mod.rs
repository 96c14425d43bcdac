//! Route handlers.
//!
//! ```text
//! products  → list, search, get, create, update, delete
//! stats     → full report, single section
//! errors    → error metrics summary, recent records, health, reset
//! health    → service health
//! ```

pub mod errors;
pub mod health;
pub mod products;
pub mod stats;

use crate::context::Ctx;
use crate::error::HandlerError;
use catalog_core::CatalogError;

/// Fallback for unmatched routes.
pub async fn route_not_found(Ctx(ctx): Ctx) -> HandlerError {
    CatalogError::not_found("Route", Some(ctx.path.as_str())).into()
}

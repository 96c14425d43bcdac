//! # Domain Types
//!
//! Core domain types used throughout the catalog service.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    Category     │   │  ProductSummary │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  Electronics    │   │  id, name       │       │
//! │  │  name           │   │  Kitchen  ...   │   │  price, inStock │       │
//! │  │  price (Money)  │   │  Other          │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                              │
//! │                                                                         │
//! │  Request bodies (unvalidated)        Validated payloads                 │
//! │  ┌─────────────────┐  validation::   ┌─────────────────┐               │
//! │  │  ProductDraft   │ ──────────────► │   NewProduct    │               │
//! │  │  ProductPatch   │ ──────────────► │ ProductChanges  │               │
//! │  └─────────────────┘                 └─────────────────┘               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Category
// =============================================================================

/// The fixed set of product categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Electronics,
    Kitchen,
    Clothing,
    Books,
    Sports,
    Toys,
    Other,
}

impl Category {
    /// Every category, in declaration order.
    pub const ALL: [Category; 7] = [
        Category::Electronics,
        Category::Kitchen,
        Category::Clothing,
        Category::Books,
        Category::Sports,
        Category::Toys,
        Category::Other,
    ];

    /// Lowercase wire name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Category::Electronics => "electronics",
            Category::Kitchen => "kitchen",
            Category::Clothing => "clothing",
            Category::Books => "books",
            Category::Sports => "sports",
            Category::Toys => "toys",
            Category::Other => "other",
        }
    }

    /// Case-insensitive lookup. Surrounding whitespace is ignored.
    pub fn parse(value: &str) -> Option<Self> {
        let folded = value.trim().to_lowercase();
        Category::ALL.into_iter().find(|c| c.as_str() == folded)
    }

    /// Wire names of every category, for error messages.
    pub fn allowed_values() -> Vec<String> {
        Category::ALL.iter().map(|c| c.as_str().to_string()).collect()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::parse(s).ok_or_else(|| ValidationError::NotAllowed {
            field: "category".to_string(),
            allowed: Category::allowed_values(),
        })
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (UUID v4). Never changes once assigned.
    pub id: String,

    /// Display name (1-100 characters).
    pub name: String,

    /// Description (1-500 characters).
    pub description: String,

    /// Unit price.
    pub price: Money,

    pub category: Category,

    pub in_stock: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// Refreshed on every mutation.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Lightweight projection used inside statistics.
    pub fn summary(&self) -> ProductSummary {
        ProductSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            price: self.price,
            in_stock: self.in_stock,
        }
    }

    /// Stringified value of a searchable field, by its wire name.
    ///
    /// Unknown field names return `None` and therefore never match a search.
    pub fn field_text(&self, field: &str) -> Option<String> {
        match field {
            "id" => Some(self.id.clone()),
            "name" => Some(self.name.clone()),
            "description" => Some(self.description.clone()),
            "category" => Some(self.category.as_str().to_string()),
            "price" => Some(self.price.as_decimal().to_string()),
            "inStock" => Some(self.in_stock.to_string()),
            "createdAt" => Some(self.created_at.to_rfc3339()),
            "updatedAt" => Some(self.updated_at.to_rfc3339()),
            _ => None,
        }
    }
}

/// Compact product view embedded in stats reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: String,
    pub name: String,
    pub price: Money,
    pub in_stock: bool,
}

// =============================================================================
// Request Bodies
// =============================================================================

/// Unvalidated create body.
///
/// Fields are raw JSON values so validation can tell a missing field apart
/// from a field of the wrong type.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: Option<Value>,
    pub description: Option<Value>,
    pub price: Option<Value>,
    pub category: Option<Value>,
    pub in_stock: Option<Value>,
}

/// Unvalidated update body. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub name: Option<Value>,
    pub description: Option<Value>,
    pub price: Option<Value>,
    pub category: Option<Value>,
    pub in_stock: Option<Value>,
}

impl ProductPatch {
    /// True when no field was supplied.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.category.is_none()
            && self.in_stock.is_none()
    }
}

/// A validated create payload. The store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Money,
    pub category: Category,
    pub in_stock: bool,
}

impl NewProduct {
    /// Materializes the product with an assigned id and creation time.
    pub fn into_product(self, id: String, now: DateTime<Utc>) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            category: self.category,
            in_stock: self.in_stock,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A validated update payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Money>,
    pub category: Option<Category>,
    pub in_stock: Option<bool>,
}

impl ProductChanges {
    /// Applies the changes in place and refreshes `updated_at`.
    ///
    /// `id` and `created_at` are never touched.
    pub fn apply_to(self, product: &mut Product, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(category) = self.category {
            product.category = category;
        }
        if let Some(in_stock) = self.in_stock {
            product.in_stock = in_stock;
        }
        product.updated_at = now;
    }
}

// =============================================================================
// Runtime Mode
// =============================================================================

/// The deployment mode. Decides how much failure detail callers see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeMode {
    #[default]
    Development,
    Production,
    Test,
}

impl RuntimeMode {
    /// Only development exposes diagnostics and raw 5xx messages.
    pub const fn is_development(&self) -> bool {
        matches!(self, RuntimeMode::Development)
    }
}

impl fmt::Display for RuntimeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeMode::Development => f.write_str("development"),
            RuntimeMode::Production => f.write_str("production"),
            RuntimeMode::Test => f.write_str("test"),
        }
    }
}

impl FromStr for RuntimeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(RuntimeMode::Development),
            "production" | "prod" => Ok(RuntimeMode::Production),
            "test" => Ok(RuntimeMode::Test),
            other => Err(format!("Unknown runtime mode: {}", other)),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Validation Module
//!
//! Product body validation for the catalog service.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Extraction (axum Json)                                        │
//! │  └── Body must be a JSON object (malformed → classify())                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                   │
//! │  ├── missing field      → Required                                      │
//! │  ├── wrong JSON type    → WrongType                                     │
//! │  └── bad value          → TooLong / OutOfRange / NotAllowed ...         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Store                                                         │
//! │  └── id uniqueness (assigned, never client-supplied)                    │
//! │                                                                         │
//! │  Every violation in a body is reported at once.                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use catalog_core::validation::{validate_product_name, validate_product_id};
//!
//! assert_eq!(validate_product_name("  Desk Lamp ").unwrap(), "Desk Lamp");
//! assert!(validate_product_id("not-a-uuid").is_err());
//! ```

use serde_json::Value;

use crate::error::{CatalogError, CatalogResult, ValidationError};
use crate::money::Money;
use crate::types::{Category, NewProduct, ProductChanges, ProductDraft, ProductPatch};
use crate::{MAX_DESCRIPTION_LENGTH, MAX_NAME_LENGTH, MAX_PRICE_CENTS, MIN_PRICE_CENTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 100 characters
///
/// ## Returns
/// The trimmed name.
pub fn validate_product_name(name: &str) -> ValidationResult<String> {
    validate_text("name", name, MAX_NAME_LENGTH)
}

/// Validates a product description.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 500 characters
pub fn validate_description(description: &str) -> ValidationResult<String> {
    validate_text("description", description, MAX_DESCRIPTION_LENGTH)
}

fn validate_text(field: &str, value: &str, max: usize) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    // Characters, not bytes
    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(value.to_string())
}

/// Validates a category name (case-insensitive).
///
/// ## Example
/// ```rust
/// use catalog_core::validation::validate_category;
/// use catalog_core::Category;
///
/// assert_eq!(validate_category("Books").unwrap(), Category::Books);
/// assert!(validate_category("furniture").is_err());
/// ```
pub fn validate_category(category: &str) -> ValidationResult<Category> {
    category.parse()
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a product price.
///
/// ## Rules
/// - Between $0.01 and $999,999.00 inclusive
///
/// ## Example
/// ```rust
/// use catalog_core::validation::validate_price;
/// use catalog_core::Money;
///
/// assert!(validate_price(Money::from_cents(1099)).is_ok());
/// assert!(validate_price(Money::zero()).is_err());
/// ```
pub fn validate_price(price: Money) -> ValidationResult<Money> {
    if price.cents() < MIN_PRICE_CENTS || price.cents() > MAX_PRICE_CENTS {
        return Err(price_out_of_range());
    }

    Ok(price)
}

/// Validates a decimal price before it is rounded to cents.
///
/// The bounds apply to the amount as sent, so `0.005` and `999999.004`
/// are rejected rather than rounded into range.
///
/// ## Example
/// ```rust
/// use catalog_core::validation::validate_price_amount;
///
/// assert_eq!(validate_price_amount(34.5).unwrap().cents(), 3450);
/// assert!(validate_price_amount(0.005).is_err());
/// ```
pub fn validate_price_amount(amount: f64) -> ValidationResult<Money> {
    let min = Money::from_cents(MIN_PRICE_CENTS).as_decimal();
    let max = Money::from_cents(MAX_PRICE_CENTS).as_decimal();

    if !(min..=max).contains(&amount) {
        return Err(price_out_of_range());
    }

    let price = Money::from_decimal(amount).ok_or_else(|| ValidationError::InvalidFormat {
        field: "price".to_string(),
        reason: "must be a finite number".to_string(),
    })?;

    validate_price(price)
}

fn price_out_of_range() -> ValidationError {
    ValidationError::OutOfRange {
        field: "price".to_string(),
        min: Money::from_cents(MIN_PRICE_CENTS).as_decimal(),
        max: Money::from_cents(MAX_PRICE_CENTS).as_decimal(),
    }
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a product id.
///
/// ## Rules
/// - Must not be empty
/// - Must parse as a UUID (36 characters with hyphens)
pub fn validate_product_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// JSON Field Extraction
// =============================================================================

fn string_field<'a>(field: &str, value: &'a Value) -> ValidationResult<&'a str> {
    value.as_str().ok_or_else(|| ValidationError::WrongType {
        field: field.to_string(),
        expected: "string",
    })
}

fn price_field(value: &Value) -> ValidationResult<Money> {
    let amount = value.as_f64().ok_or_else(|| ValidationError::WrongType {
        field: "price".to_string(),
        expected: "number",
    })?;

    validate_price_amount(amount)
}

fn in_stock_field(value: &Value) -> ValidationResult<bool> {
    value.as_bool().ok_or_else(|| ValidationError::WrongType {
        field: "inStock".to_string(),
        expected: "boolean",
    })
}

/// Runs `check` on a present field, pushing any violation.
fn check<T>(
    violations: &mut Vec<ValidationError>,
    value: Option<&Value>,
    check: impl FnOnce(&Value) -> ValidationResult<T>,
) -> Option<T> {
    let value = value?;
    match check(value) {
        Ok(parsed) => Some(parsed),
        Err(violation) => {
            violations.push(violation);
            None
        }
    }
}

/// Like [`check`], but a missing field is itself a violation.
fn require<T>(
    violations: &mut Vec<ValidationError>,
    field: &str,
    value: Option<&Value>,
    check_fn: impl FnOnce(&Value) -> ValidationResult<T>,
) -> Option<T> {
    if value.is_none() {
        violations.push(ValidationError::Required {
            field: field.to_string(),
        });
        return None;
    }
    check(violations, value, check_fn)
}

// =============================================================================
// Body Validators
// =============================================================================

/// Validates a create body.
///
/// name, description, price and category are required; inStock defaults to
/// `true`. Every violation is collected into one Validation error.
///
/// ## Example
/// ```rust
/// use catalog_core::validation::validate_draft;
/// use catalog_core::ProductDraft;
/// use serde_json::json;
///
/// let draft: ProductDraft = serde_json::from_value(json!({
///     "name": "Desk Lamp",
///     "description": "LED lamp with dimmer",
///     "price": 34.5,
///     "category": "Electronics"
/// })).unwrap();
///
/// let product = validate_draft(draft).unwrap();
/// assert_eq!(product.price.cents(), 3450);
/// assert!(product.in_stock);
/// ```
pub fn validate_draft(draft: ProductDraft) -> CatalogResult<NewProduct> {
    let mut violations = Vec::new();

    let name = require(&mut violations, "name", draft.name.as_ref(), |v| {
        validate_product_name(string_field("name", v)?)
    });
    let description = require(
        &mut violations,
        "description",
        draft.description.as_ref(),
        |v| validate_description(string_field("description", v)?),
    );
    let price = require(&mut violations, "price", draft.price.as_ref(), price_field);
    let category = require(&mut violations, "category", draft.category.as_ref(), |v| {
        validate_category(string_field("category", v)?)
    });
    let in_stock = check(&mut violations, draft.in_stock.as_ref(), in_stock_field);

    match (name, description, price, category) {
        (Some(name), Some(description), Some(price), Some(category)) if violations.is_empty() => {
            Ok(NewProduct {
                name,
                description,
                price,
                category,
                in_stock: in_stock.unwrap_or(true),
            })
        }
        _ => Err(CatalogError::from_violations(
            "Invalid product data",
            &violations,
        )),
    }
}

/// Validates an update body. Only present fields are checked.
///
/// An empty patch is rejected.
pub fn validate_patch(patch: ProductPatch) -> CatalogResult<ProductChanges> {
    if patch.is_empty() {
        return Err(CatalogError::validation(
            "Invalid product data",
            vec!["at least one field must be provided".to_string()],
        ));
    }

    let mut violations = Vec::new();

    let changes = ProductChanges {
        name: check(&mut violations, patch.name.as_ref(), |v| {
            validate_product_name(string_field("name", v)?)
        }),
        description: check(&mut violations, patch.description.as_ref(), |v| {
            validate_description(string_field("description", v)?)
        }),
        price: check(&mut violations, patch.price.as_ref(), price_field),
        category: check(&mut violations, patch.category.as_ref(), |v| {
            validate_category(string_field("category", v)?)
        }),
        in_stock: check(&mut violations, patch.in_stock.as_ref(), in_stock_field),
    };

    if violations.is_empty() {
        Ok(changes)
    } else {
        Err(CatalogError::from_violations(
            "Invalid product data",
            &violations,
        ))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

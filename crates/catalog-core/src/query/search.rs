//! Case-insensitive substring search.

use serde::Serialize;

use super::params::QueryParams;
use crate::error::{CatalogError, CatalogResult, ValidationError};
use crate::types::Product;
use crate::{MAX_SEARCH_LENGTH, MIN_SEARCH_LENGTH};

/// Fields scanned when `fields` is not supplied.
pub const DEFAULT_SEARCH_FIELDS: [&str; 2] = ["name", "description"];

/// Fields a search can reach. Other names are accepted but never match.
pub const SEARCHABLE_FIELDS: [&str; 8] = [
    "id",
    "name",
    "description",
    "category",
    "price",
    "inStock",
    "createdAt",
    "updatedAt",
];

/// A normalized search term and the fields it scans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchSpec {
    /// Trimmed, lowercased term.
    pub term: String,
    pub fields: Vec<String>,
}

impl SearchSpec {
    /// Parses `q` (or `search`) and `fields`.
    ///
    /// Returns `Ok(None)` when no term was supplied. An empty value counts
    /// as absent; a whitespace-only value is too short.
    pub fn parse(raw: &QueryParams) -> CatalogResult<Option<Self>> {
        let term = ["q", "search"]
            .into_iter()
            .filter_map(|key| raw.get(key))
            .find(|value| !value.is_empty());

        let Some(term) = term else {
            return Ok(None);
        };

        let term = term.trim();
        let length = term.chars().count();

        let violation = if length < MIN_SEARCH_LENGTH {
            Some(ValidationError::TooShort {
                field: "q".to_string(),
                min: MIN_SEARCH_LENGTH,
            })
        } else if length > MAX_SEARCH_LENGTH {
            Some(ValidationError::TooLong {
                field: "q".to_string(),
                max: MAX_SEARCH_LENGTH,
            })
        } else {
            None
        };

        if let Some(violation) = violation {
            return Err(CatalogError::from_violations(
                "Invalid search parameters",
                &[violation],
            ));
        }

        let fields = match raw.list("fields") {
            fields if fields.is_empty() => {
                DEFAULT_SEARCH_FIELDS.iter().map(|f| f.to_string()).collect()
            }
            fields => fields,
        };

        Ok(Some(SearchSpec {
            term: term.to_lowercase(),
            fields,
        }))
    }

    /// True when any scanned field contains the term.
    pub fn matches(&self, product: &Product) -> bool {
        self.fields.iter().any(|field| {
            product
                .field_text(field)
                .is_some_and(|text| text.to_lowercase().contains(&self.term))
        })
    }

    /// Keeps matching products in their input order.
    pub fn apply(&self, products: Vec<Product>) -> Vec<Product> {
        products.into_iter().filter(|p| self.matches(p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::Category;
    use chrono::{TimeZone, Utc};

    fn product(name: &str, description: &str, category: Category) -> Product {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        Product {
            id: format!("id-{}", name.to_lowercase()),
            name: name.to_string(),
            description: description.to_string(),
            price: Money::from_cents(1250),
            category,
            in_stock: true,
            created_at: at,
            updated_at: at,
        }
    }

    fn parse(pairs: &[(&str, &str)]) -> CatalogResult<Option<SearchSpec>> {
        SearchSpec::parse(&QueryParams::from_pairs(pairs.iter().copied()))
    }

    #[test]
    fn test_absent_term_is_no_op() {
        assert_eq!(parse(&[]).unwrap(), None);
        assert_eq!(parse(&[("q", "")]).unwrap(), None);
    }

    #[test]
    fn test_term_normalized() {
        let spec = parse(&[("search", "  Wireless ")]).unwrap().unwrap();
        assert_eq!(spec.term, "wireless");
        assert_eq!(spec.fields, vec!["name", "description"]);
    }

    #[test]
    fn test_q_preferred_over_search() {
        let spec = parse(&[("search", "lamp"), ("q", "desk")]).unwrap().unwrap();
        assert_eq!(spec.term, "desk");
    }

    #[test]
    fn test_term_length_bounds() {
        assert!(parse(&[("q", "a")]).is_err());
        assert!(parse(&[("q", "   ")]).is_err());
        assert!(parse(&[("q", "ab")]).is_ok());
        assert!(parse(&[("q", "x".repeat(100).as_str())]).is_ok());
        assert!(parse(&[("q", "x".repeat(101).as_str())]).is_err());
    }

    #[test]
    fn test_matches_default_fields_case_insensitively() {
        let spec = parse(&[("q", "MOUSE")]).unwrap().unwrap();
        let products = vec![
            product("Wireless Mouse", "Ergonomic", Category::Electronics),
            product("Keyboard", "Pairs with any mouse", Category::Electronics),
            product("Novel", "A long story", Category::Books),
        ];

        let hits = spec.apply(products);
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_custom_and_unknown_fields() {
        let spec = parse(&[("q", "books"), ("fields", "category,colour")])
            .unwrap()
            .unwrap();
        assert!(spec.matches(&product("Novel", "story", Category::Books)));
        assert!(!spec.matches(&product("Books Shelf", "wood", Category::Other)));

        let spec = parse(&[("q", "xx"), ("fields", "colour")]).unwrap().unwrap();
        assert!(!spec.matches(&product("xx", "xx", Category::Other)));
    }

    #[test]
    fn test_price_field_is_searchable() {
        let spec = parse(&[("q", "12.5"), ("fields", "price")]).unwrap().unwrap();
        assert!(spec.matches(&product("Anything", "x", Category::Toys)));
    }
}

//! Category, price and stock filters.

use serde::Serialize;

use super::params::{ParamValue, QueryParams};
use crate::error::{CatalogError, CatalogResult, ValidationError};
use crate::types::{Category, Product};

/// Active filters. An absent filter means "no constraint".
///
/// Price bounds keep the decimal as sent; products are compared against it
/// exactly, never against a bound rounded to cents.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSet {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_stock: Option<bool>,
}

impl FilterSet {
    /// Parses `category`, `minPrice`, `maxPrice` and `inStock`.
    pub fn parse(raw: &QueryParams) -> CatalogResult<Self> {
        let mut violations = Vec::new();

        let categories = parse_categories(raw, &mut violations);
        let min_price = parse_price_bound(raw, "minPrice", &mut violations);
        let max_price = parse_price_bound(raw, "maxPrice", &mut violations);

        if let (Some(min), Some(max)) = (min_price, max_price) {
            if min > max {
                violations.push(ValidationError::InvertedRange {
                    min_field: "minPrice".to_string(),
                    max_field: "maxPrice".to_string(),
                });
            }
        }

        let in_stock = match raw.get("inStock") {
            None => None,
            Some("true") => Some(true),
            Some("false") => Some(false),
            Some(_) => {
                violations.push(ValidationError::NotAllowed {
                    field: "inStock".to_string(),
                    allowed: vec!["true".to_string(), "false".to_string()],
                });
                None
            }
        };

        if !violations.is_empty() {
            return Err(CatalogError::from_violations(
                "Invalid filter parameters",
                &violations,
            ));
        }

        Ok(FilterSet {
            categories,
            min_price,
            max_price,
            in_stock,
        })
    }

    /// Parses only the `category` parameter, as the stats routes accept it.
    pub fn parse_categories(raw: &QueryParams) -> CatalogResult<Vec<Category>> {
        let mut violations = Vec::new();
        let categories = parse_categories(raw, &mut violations);
        if !violations.is_empty() {
            return Err(CatalogError::from_violations(
                "Invalid filter parameters",
                &violations,
            ));
        }
        Ok(categories)
    }

    pub fn is_empty(&self) -> bool {
        self == &FilterSet::default()
    }

    /// True when the product passes every active filter.
    pub fn matches(&self, product: &Product) -> bool {
        if !self.categories.is_empty() && !self.categories.contains(&product.category) {
            return false;
        }
        let price = product.price.as_decimal();
        if self.min_price.is_some_and(|min| price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| price > max) {
            return false;
        }
        if self.in_stock.is_some_and(|wanted| product.in_stock != wanted) {
            return false;
        }
        true
    }

    /// Keeps matching products in their input order.
    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        products
            .iter()
            .filter(|p| self.matches(p))
            .cloned()
            .collect()
    }
}

fn parse_categories(raw: &QueryParams, violations: &mut Vec<ValidationError>) -> Vec<Category> {
    let mut categories = Vec::new();
    let mut invalid = Vec::new();

    for value in raw.list("category") {
        match Category::parse(&value) {
            Some(category) if !categories.contains(&category) => categories.push(category),
            Some(_) => {}
            None => invalid.push(value),
        }
    }

    if !invalid.is_empty() {
        violations.push(ValidationError::InvalidValues {
            field: "category".to_string(),
            values: invalid,
            allowed: Category::allowed_values(),
        });
    }

    categories
}

fn parse_price_bound(
    raw: &QueryParams,
    key: &str,
    violations: &mut Vec<ValidationError>,
) -> Option<f64> {
    let amount = match raw.number::<f64>(key) {
        ParamValue::Missing => return None,
        ParamValue::Number(n) if n.is_finite() && n >= 0.0 => Some(n),
        ParamValue::Number(_) | ParamValue::Malformed(_) => None,
    };

    if amount.is_none() {
        violations.push(ValidationError::Negative {
            field: key.to_string(),
        });
    }
    amount
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::money::Money;
    use chrono::{TimeZone, Utc};

    fn product(name: &str, cents: i64, category: Category, in_stock: bool) -> Product {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        Product {
            id: name.to_lowercase(),
            name: name.to_string(),
            description: format!("{} description", name),
            price: Money::from_cents(cents),
            category,
            in_stock,
            created_at: at,
            updated_at: at,
        }
    }

    fn parse(pairs: &[(&str, &str)]) -> CatalogResult<FilterSet> {
        FilterSet::parse(&QueryParams::from_pairs(pairs.iter().copied()))
    }

    #[test]
    fn test_no_filters_is_pass_through() {
        let filters = parse(&[]).unwrap();
        assert!(filters.is_empty());

        let products = vec![product("A", 100, Category::Books, false)];
        assert_eq!(filters.apply(&products), products);
    }

    #[test]
    fn test_min_price_is_inclusive() {
        let products = vec![
            product("Ten", 1000, Category::Books, true),
            product("Twenty", 2000, Category::Books, true),
            product("Thirty", 3000, Category::Books, true),
        ];
        let filters = parse(&[("minPrice", "15")]).unwrap();
        let names: Vec<_> = filters.apply(&products).into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Twenty", "Thirty"]);

        let filters = parse(&[("minPrice", "20"), ("maxPrice", "20")]).unwrap();
        assert_eq!(filters.apply(&products).len(), 1);
    }

    #[test]
    fn test_sub_cent_bounds_compare_exactly() {
        let products = vec![
            product("Fifteen", 1500, Category::Books, true),
            product("Cent More", 1501, Category::Books, true),
        ];

        let filters = parse(&[("minPrice", "15.004")]).unwrap();
        let names: Vec<_> = filters.apply(&products).into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Cent More"]);

        let filters = parse(&[("maxPrice", "15.006")]).unwrap();
        let names: Vec<_> = filters.apply(&products).into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Fifteen"]);

        // two-decimal bounds still include an equal price
        let filters = parse(&[("minPrice", "0.29"), ("maxPrice", "0.29")]).unwrap();
        assert_eq!(
            filters.apply(&[product("Gum", 29, Category::Other, true)]).len(),
            1
        );
    }

    #[test]
    fn test_categories_case_folded_and_deduplicated() {
        let filters = parse(&[("category", "Books,TOYS"), ("category", "books")]).unwrap();
        assert_eq!(filters.categories, vec![Category::Books, Category::Toys]);
    }

    #[test]
    fn test_unknown_category_named_in_error() {
        let err = parse(&[("category", "books,bogus")]).unwrap_err();
        match err.kind {
            ErrorKind::Validation { details, field } => {
                assert_eq!(field.as_deref(), Some("category"));
                assert!(details[0].contains("bogus"));
                assert!(details[0].contains(
                    "electronics, kitchen, clothing, books, sports, toys, other"
                ));
            }
            other => panic!("unexpected kind: {:?}", other),
        }
    }

    #[test]
    fn test_price_bounds_must_be_non_negative_numbers() {
        assert!(parse(&[("minPrice", "-1")]).is_err());
        assert!(parse(&[("maxPrice", "cheap")]).is_err());
        assert!(parse(&[("minPrice", "0")]).is_ok());
    }

    #[test]
    fn test_inverted_price_range_fails() {
        let err = parse(&[("minPrice", "50"), ("maxPrice", "10")]).unwrap_err();
        assert_eq!(err.status(), 400);
    }

    #[test]
    fn test_in_stock_literal_only() {
        assert_eq!(parse(&[("inStock", "false")]).unwrap().in_stock, Some(false));
        assert!(parse(&[("inStock", "TRUE")]).is_err());
        assert!(parse(&[("inStock", "1")]).is_err());
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let products = vec![
            product("Lamp", 3000, Category::Electronics, true),
            product("Cable", 900, Category::Electronics, false),
            product("Novel", 1500, Category::Books, true),
        ];
        let filters = parse(&[
            ("category", "electronics"),
            ("inStock", "true"),
            ("maxPrice", "40"),
        ])
        .unwrap();

        let kept = filters.apply(&products);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name, "Lamp");
    }
}

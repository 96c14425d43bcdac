//! Sort field and order.

use std::cmp::Ordering;

use serde::Serialize;

use super::params::QueryParams;
use crate::error::{CatalogError, CatalogResult, ValidationError};
use crate::types::Product;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Name,
    Price,
    Category,
    InStock,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    pub const ALL: [SortField; 6] = [
        SortField::Name,
        SortField::Price,
        SortField::Category,
        SortField::InStock,
        SortField::CreatedAt,
        SortField::UpdatedAt,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Price => "price",
            SortField::Category => "category",
            SortField::InStock => "inStock",
            SortField::CreatedAt => "createdAt",
            SortField::UpdatedAt => "updatedAt",
        }
    }

    /// Exact, case-sensitive lookup by wire name.
    pub fn parse(value: &str) -> Option<Self> {
        SortField::ALL.into_iter().find(|f| f.as_str() == value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// How a result set is ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SortSpec {
    pub field: SortField,
    pub order: SortOrder,
}

impl Default for SortSpec {
    /// Newest first.
    fn default() -> Self {
        SortSpec {
            field: SortField::CreatedAt,
            order: SortOrder::Desc,
        }
    }
}

impl SortSpec {
    /// Parses `sortBy` and `sortOrder`.
    ///
    /// ```text
    /// neither supplied        → createdAt desc
    /// sortOrder == "desc"     → descending
    /// any other sortOrder     → ascending (including absent)
    /// unknown sortBy          → error listing valid fields
    /// ```
    pub fn parse(raw: &QueryParams) -> CatalogResult<Self> {
        let sort_by = raw.get("sortBy");
        let sort_order = raw.get("sortOrder");

        if sort_by.is_none() && sort_order.is_none() {
            return Ok(SortSpec::default());
        }

        let field = match sort_by {
            None => SortField::CreatedAt,
            Some(value) => SortField::parse(value).ok_or_else(|| {
                CatalogError::from_violations(
                    "Invalid sort parameters",
                    &[ValidationError::NotAllowed {
                        field: "sortBy".to_string(),
                        allowed: SortField::ALL.iter().map(|f| f.as_str().to_string()).collect(),
                    }],
                )
            })?,
        };

        let order = if sort_order == Some("desc") {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        };

        Ok(SortSpec { field, order })
    }

    /// Ascending comparison on the sort field. Strings ignore case.
    pub fn compare_asc(&self, a: &Product, b: &Product) -> Ordering {
        match self.field {
            SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortField::Price => a.price.cmp(&b.price),
            SortField::Category => a.category.as_str().cmp(b.category.as_str()),
            SortField::InStock => a.in_stock.cmp(&b.in_stock),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        }
    }

    /// Sorts in place. Stable: equal keys keep their input order in
    /// both directions.
    pub fn apply(&self, mut products: Vec<Product>) -> Vec<Product> {
        match self.order {
            SortOrder::Asc => products.sort_by(|a, b| self.compare_asc(a, b)),
            SortOrder::Desc => products.sort_by(|a, b| self.compare_asc(a, b).reverse()),
        }
        products
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::Category;
    use chrono::{Duration, TimeZone, Utc};

    fn product(name: &str, cents: i64, days: i64) -> Product {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Product {
            id: name.to_string(),
            name: name.to_string(),
            description: "d".to_string(),
            price: Money::from_cents(cents),
            category: Category::Other,
            in_stock: true,
            created_at: base + Duration::days(days),
            updated_at: base + Duration::days(days),
        }
    }

    fn parse(pairs: &[(&str, &str)]) -> CatalogResult<SortSpec> {
        SortSpec::parse(&QueryParams::from_pairs(pairs.iter().copied()))
    }

    fn names(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_default_is_newest_first() {
        let spec = parse(&[]).unwrap();
        assert_eq!(spec, SortSpec::default());

        let sorted = spec.apply(vec![product("old", 1, 0), product("new", 1, 5)]);
        assert_eq!(names(&sorted), vec!["new", "old"]);
    }

    #[test]
    fn test_only_literal_desc_is_descending() {
        assert_eq!(parse(&[("sortBy", "price")]).unwrap().order, SortOrder::Asc);
        assert_eq!(
            parse(&[("sortBy", "price"), ("sortOrder", "DESC")]).unwrap().order,
            SortOrder::Asc
        );
        assert_eq!(
            parse(&[("sortBy", "price"), ("sortOrder", "desc")]).unwrap().order,
            SortOrder::Desc
        );
    }

    #[test]
    fn test_sort_order_alone_keeps_created_at() {
        let spec = parse(&[("sortOrder", "asc")]).unwrap();
        assert_eq!(spec.field, SortField::CreatedAt);
        assert_eq!(spec.order, SortOrder::Asc);
    }

    #[test]
    fn test_unknown_sort_field_lists_valid_fields() {
        let err = parse(&[("sortBy", "colour")]).unwrap_err();
        match err.kind {
            crate::error::ErrorKind::Validation { details, .. } => {
                assert_eq!(
                    details[0],
                    "sortBy must be one of: name, price, category, inStock, createdAt, updatedAt"
                );
            }
            other => panic!("unexpected kind: {:?}", other),
        }
    }

    #[test]
    fn test_price_sorts_numerically() {
        let spec = parse(&[("sortBy", "price")]).unwrap();
        let sorted = spec.apply(vec![
            product("nine", 900, 0),
            product("hundred", 10000, 0),
            product("ten", 1000, 0),
        ]);
        assert_eq!(names(&sorted), vec!["nine", "ten", "hundred"]);
    }

    #[test]
    fn test_name_sort_ignores_case() {
        let spec = parse(&[("sortBy", "name")]).unwrap();
        let sorted = spec.apply(vec![product("banana", 1, 0), product("Apple", 1, 0)]);
        assert_eq!(names(&sorted), vec!["Apple", "banana"]);
    }

    mod properties {
        use super::*;
        use crate::query::strategies::{arb_catalog, arb_sort_spec, ids};
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn sorting_is_idempotent(products in arb_catalog(0..40usize), spec in arb_sort_spec()) {
                let once = spec.apply(products);
                let twice = spec.apply(once.clone());
                prop_assert_eq!(once, twice);
            }

            #[test]
            fn sorted_output_is_an_ordered_permutation(
                products in arb_catalog(0..40usize),
                spec in arb_sort_spec()
            ) {
                let sorted = spec.apply(products.clone());

                let out_of_order = match spec.order {
                    SortOrder::Asc => Ordering::Greater,
                    SortOrder::Desc => Ordering::Less,
                };
                prop_assert!(sorted
                    .windows(2)
                    .all(|pair| spec.compare_asc(&pair[0], &pair[1]) != out_of_order));

                let mut before = ids(&products);
                let mut after = ids(&sorted);
                before.sort_unstable();
                after.sort_unstable();
                prop_assert_eq!(before, after);
            }
        }
    }

    #[test]
    fn test_ties_keep_input_order_both_directions() {
        let input = vec![product("a", 5, 0), product("b", 5, 0), product("c", 1, 0)];

        let asc = parse(&[("sortBy", "price")]).unwrap().apply(input.clone());
        assert_eq!(names(&asc), vec!["c", "a", "b"]);

        let desc = parse(&[("sortBy", "price"), ("sortOrder", "desc")])
            .unwrap()
            .apply(input);
        assert_eq!(names(&desc), vec!["a", "b", "c"]);
    }
}

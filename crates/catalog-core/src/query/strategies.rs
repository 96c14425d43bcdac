//! Proptest strategies shared by the query property tests.

use chrono::{Duration, TimeZone, Utc};
use proptest::collection::SizeRange;
use proptest::prelude::*;
use proptest::sample::select;

use super::{FilterSet, SortField, SortOrder, SortSpec};
use crate::money::Money;
use crate::types::{Category, Product};

pub(crate) fn arb_category() -> impl Strategy<Value = Category> {
    select(Category::ALL.to_vec())
}

/// A product with an arbitrary id; [`arb_catalog`] replaces it.
pub(crate) fn arb_product() -> impl Strategy<Value = Product> {
    (
        "[A-Za-z ]{1,12}",
        "[a-z ]{0,24}",
        1i64..=2_000_000,
        arb_category(),
        any::<bool>(),
        0i64..500_000,
        0i64..500_000,
    )
        .prop_map(
            |(name, description, cents, category, in_stock, created, edited)| {
                let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
                let created_at = base + Duration::seconds(created);
                Product {
                    id: String::new(),
                    name,
                    description,
                    price: Money::from_cents(cents),
                    category,
                    in_stock,
                    created_at,
                    updated_at: created_at + Duration::seconds(edited),
                }
            },
        )
}

/// Products with unique ids `p0`, `p1`, ...
pub(crate) fn arb_catalog(size: impl Into<SizeRange>) -> impl Strategy<Value = Vec<Product>> {
    proptest::collection::vec(arb_product(), size).prop_map(|mut products| {
        for (i, product) in products.iter_mut().enumerate() {
            product.id = format!("p{}", i);
        }
        products
    })
}

pub(crate) fn arb_sort_spec() -> impl Strategy<Value = SortSpec> {
    (
        select(SortField::ALL.to_vec()),
        select(vec![SortOrder::Asc, SortOrder::Desc]),
    )
        .prop_map(|(field, order)| SortSpec { field, order })
}

pub(crate) fn arb_filter_set() -> impl Strategy<Value = FilterSet> {
    (
        proptest::collection::vec(arb_category(), 0..3),
        proptest::option::of(0.0f64..20_000.0),
        proptest::option::of(0.0f64..20_000.0),
        proptest::option::of(any::<bool>()),
    )
        .prop_map(|(mut categories, min_price, max_price, in_stock)| {
            categories.dedup();
            FilterSet {
                categories,
                min_price,
                max_price,
                in_stock,
            }
        })
}

pub(crate) fn ids(products: &[Product]) -> Vec<&str> {
    products.iter().map(|p| p.id.as_str()).collect()
}

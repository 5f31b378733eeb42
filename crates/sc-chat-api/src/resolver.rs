//! Intent-to-data resolution — maps a typed intent onto catalog records.
//!
//! Pure functions over an in-memory product snapshot: no I/O, no side
//! effects, identical inputs give identical fact sets. Ambiguity is
//! surfaced, not collapsed: when several products match an entity, every
//! match appears in the fact set, tagged by product id.

use std::collections::BTreeMap;

use serde_json::{Value, json};

use sc_protocol::{FactField, FactSet, Intent, IntentGoal, Product, ProductFacts};

/// Payload cap: at most this many matched products per fact set.
const MAX_MATCHES: usize = 5;

/// Threshold used when a `RatingFilter` intent carries no criterion.
/// The boundary is inclusive everywhere: `rating >= min_rating`.
const DEFAULT_MIN_RATING: f64 = 4.0;

/// Resolve an intent against a catalog snapshot.
///
/// Candidate selection: entity matches by title (category for
/// `CategoryQuery`); a filtering goal with no entity match falls back to
/// the full catalog. An empty result is a valid fact set, never an error.
pub fn resolve(intent: &Intent, products: &[Product]) -> FactSet {
    let fields = relevant_fields(intent.goal);
    if fields.is_empty() {
        return FactSet::empty();
    }

    let candidates: Vec<&Product> = match intent.goal {
        IntentGoal::CategoryQuery => intent
            .entity
            .as_deref()
            .map(|entity| match_category(entity, products))
            .unwrap_or_default(),
        _ => intent
            .entity
            .as_deref()
            .map(|entity| match_title(entity, products))
            .unwrap_or_default(),
    };

    let candidates = if candidates.is_empty() && intent.goal.is_filtering() {
        products.iter().collect()
    } else {
        candidates
    };

    let matched: Vec<&Product> = if intent.goal == IntentGoal::RatingFilter {
        let min_rating = intent.min_rating.unwrap_or(DEFAULT_MIN_RATING);
        candidates
            .into_iter()
            .filter(|p| p.rating.is_some_and(|r| r >= min_rating))
            .collect()
    } else {
        candidates
    };

    let entries = matched
        .into_iter()
        .take(MAX_MATCHES)
        .map(|p| product_facts(p, fields))
        .collect();

    FactSet { entries }
}

/// Match an entity against product titles, case-insensitive.
///
/// Exact equality wins; otherwise every substring match is returned so
/// ambiguity stays visible to the caller.
fn match_title<'a>(entity: &str, products: &'a [Product]) -> Vec<&'a Product> {
    let needle = entity.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let exact: Vec<&Product> = products
        .iter()
        .filter(|p| p.title.to_lowercase() == needle)
        .collect();
    if !exact.is_empty() {
        return exact;
    }

    products
        .iter()
        .filter(|p| p.title.to_lowercase().contains(&needle))
        .collect()
}

/// Match an entity against the category field, case-insensitive substring.
fn match_category<'a>(entity: &str, products: &'a [Product]) -> Vec<&'a Product> {
    let needle = entity.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    products
        .iter()
        .filter(|p| {
            p.category
                .as_deref()
                .is_some_and(|c| c.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Attributes relevant to each goal. `Unknown` gets nothing — an empty
/// fact set tells the synthesizer to apologize instead of inventing data.
fn relevant_fields(goal: IntentGoal) -> &'static [FactField] {
    match goal {
        IntentGoal::PriceQuery => &[FactField::Price, FactField::DiscountPercentage],
        IntentGoal::Availability => &[FactField::Stock],
        IntentGoal::RatingFilter => &[FactField::Rating, FactField::Price],
        IntentGoal::ReviewRequest => &[FactField::Rating, FactField::Description],
        IntentGoal::CategoryQuery => &[FactField::Category, FactField::Price, FactField::Rating],
        IntentGoal::GeneralInfo => &[
            FactField::Price,
            FactField::Rating,
            FactField::Stock,
            FactField::Warranty,
            FactField::Shipping,
        ],
        IntentGoal::Unknown => &[],
    }
}

fn product_facts(product: &Product, fields: &[FactField]) -> ProductFacts {
    let mut facts = BTreeMap::new();
    for &field in fields {
        if let Some(value) = fact_value(product, field) {
            facts.insert(field, value);
        }
    }
    ProductFacts {
        product_id: product.id,
        name: product.title.clone(),
        facts,
    }
}

/// Pull one attribute off a product; absent attributes are omitted from
/// the facts map rather than rendered as null.
fn fact_value(product: &Product, field: FactField) -> Option<Value> {
    match field {
        FactField::Price => Some(json!(product.price)),
        FactField::DiscountPercentage => product.discount_percentage.map(|v| json!(v)),
        FactField::Rating => product.rating.map(|v| json!(v)),
        FactField::Stock => product.stock.map(|v| json!(v)),
        FactField::Warranty => product.warranty_information.clone().map(Value::String),
        FactField::Shipping => product.shipping_information.clone().map(Value::String),
        FactField::Brand => product.brand.clone().map(Value::String),
        FactField::Category => product.category.clone().map(Value::String),
        FactField::Description => {
            (!product.description.is_empty()).then(|| Value::String(product.description.clone()))
        }
    }
}

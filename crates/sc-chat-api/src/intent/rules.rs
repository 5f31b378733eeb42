//! Rule-based intent extraction — regex patterns for common phrasings.
//!
//! Deterministic and infallible: this tier keeps the pipeline producing
//! intents when the LLM misses, returns garbage, or is unreachable.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use super::IntentExtractor;
use crate::error::UpstreamError;
use sc_protocol::{Intent, IntentGoal};

// "price of X", "price for X", "how much is X"
static RE_PRICE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:price of|price for|how much is)\s+(?:the\s+)?([\w][\w\s-]*)$").unwrap()
});

// "rating above 4", "ratings over 4.5", "rating at least 3"
static RE_RATING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"ratings?\s+(?:above|over|greater than|at least)\s*(\d+(?:\.\d+)?)").unwrap()
});

// category mentioned near a rating filter: "show me electronics with rating above 4"
static RE_RATING_CATEGORY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:show me|list|find)\s+([\w][\w\s]*?)\s+(?:with|having|that have)\s+rating")
        .unwrap()
});

// "is X in stock", "are Xs available"
static RE_IN_STOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:is|are)\s+(?:the\s+)?([\w][\w\s-]*?)\s+(?:in stock|available)$").unwrap()
});

// "do you have X", "have any X"
static RE_HAVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:do you have|have any|got any)\s+(?:any\s+)?([\w][\w\s-]*)$").unwrap()
});

// "reviews for X", "opinions about X"
static RE_REVIEW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:reviews?|opinions?)\s+(?:for|about|of|on)\s+(?:the\s+)?([\w][\w\s-]*)$")
        .unwrap()
});

// "show me X", "list X", "browse X" — category query when X names a known category
static RE_BROWSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:show me|list|find|browse)\s+([\w][\w\s]*)$").unwrap());

/// Categories the upstream catalog is known to carry.
const KNOWN_CATEGORIES: &[&str] = &[
    "electronics",
    "fragrances",
    "groceries",
    "laptops",
    "smartphones",
    "skincare",
    "home-decoration",
];

/// Pattern-matching intent extractor.
pub struct RuleBasedExtractor;

impl RuleBasedExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RuleBasedExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IntentExtractor for RuleBasedExtractor {
    async fn extract(&self, message: &str) -> Result<Intent, UpstreamError> {
        Ok(parse_message(message).unwrap_or_else(Intent::unknown))
    }

    fn tier_name(&self) -> &str {
        "rules"
    }
}

/// Core pattern matching logic.
fn parse_message(message: &str) -> Option<Intent> {
    let lower = message.to_lowercase();
    let text = lower.trim().trim_end_matches(['?', '!', '.']).trim_end();

    // Price: "price of X", "how much is X"
    if let Some(caps) = RE_PRICE.captures(text) {
        return Some(Intent {
            goal: IntentGoal::PriceQuery,
            entity: capture_entity(&caps[1]),
            min_rating: None,
        });
    }

    // Rating filter: "rating above 4" — must be checked before the browse
    // pattern so "show me electronics with rating above 4" filters.
    if let Some(caps) = RE_RATING.captures(text) {
        let min_rating = caps[1].parse().ok()?;
        let entity = RE_RATING_CATEGORY
            .captures(text)
            .and_then(|c| capture_entity(&c[1]));
        return Some(Intent {
            goal: IntentGoal::RatingFilter,
            entity,
            min_rating: Some(min_rating),
        });
    }

    // Availability: "is X in stock", "do you have X"
    if let Some(caps) = RE_IN_STOCK.captures(text).or_else(|| RE_HAVE.captures(text)) {
        return Some(Intent {
            goal: IntentGoal::Availability,
            entity: capture_entity(&caps[1]),
            min_rating: None,
        });
    }

    // Review request: "reviews for X"
    if let Some(caps) = RE_REVIEW.captures(text) {
        return Some(Intent {
            goal: IntentGoal::ReviewRequest,
            entity: capture_entity(&caps[1]),
            min_rating: None,
        });
    }

    // Category browse: "show me electronics" — only when the candidate
    // names a category the catalog is known to carry.
    if let Some(caps) = RE_BROWSE.captures(text) {
        let candidate = &caps[1];
        if let Some(category) = KNOWN_CATEGORIES.iter().find(|c| candidate.contains(*c)) {
            return Some(Intent {
                goal: IntentGoal::CategoryQuery,
                entity: Some((*category).to_string()),
                min_rating: None,
            });
        }
    }

    None
}

fn capture_entity(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_query_patterns() {
        let intent = parse_message("What is the price of iPhone 9?").unwrap();
        assert_eq!(intent.goal, IntentGoal::PriceQuery);
        assert_eq!(intent.entity.as_deref(), Some("iphone 9"));

        let intent = parse_message("how much is the Samsung Universe 9").unwrap();
        assert_eq!(intent.goal, IntentGoal::PriceQuery);
        assert_eq!(intent.entity.as_deref(), Some("samsung universe 9"));
    }

    #[test]
    fn rating_filter_with_threshold() {
        let intent = parse_message("anything with ratings above 4.5?").unwrap();
        assert_eq!(intent.goal, IntentGoal::RatingFilter);
        assert_eq!(intent.min_rating, Some(4.5));
        assert!(intent.entity.is_none());
    }

    #[test]
    fn rating_filter_with_category_entity() {
        let intent = parse_message("show me electronics with rating above 4").unwrap();
        assert_eq!(intent.goal, IntentGoal::RatingFilter);
        assert_eq!(intent.min_rating, Some(4.0));
        assert_eq!(intent.entity.as_deref(), Some("electronics"));
    }

    #[test]
    fn availability_patterns() {
        let intent = parse_message("Do you have any laptops?").unwrap();
        assert_eq!(intent.goal, IntentGoal::Availability);
        assert_eq!(intent.entity.as_deref(), Some("laptops"));

        let intent = parse_message("is the iPhone 9 in stock?").unwrap();
        assert_eq!(intent.goal, IntentGoal::Availability);
        assert_eq!(intent.entity.as_deref(), Some("iphone 9"));
    }

    #[test]
    fn review_request_pattern() {
        let intent = parse_message("reviews for the iPhone 9").unwrap();
        assert_eq!(intent.goal, IntentGoal::ReviewRequest);
        assert_eq!(intent.entity.as_deref(), Some("iphone 9"));
    }

    #[test]
    fn category_browse_known_category() {
        let intent = parse_message("show me smartphones").unwrap();
        assert_eq!(intent.goal, IntentGoal::CategoryQuery);
        assert_eq!(intent.entity.as_deref(), Some("smartphones"));
    }

    #[test]
    fn browse_of_unknown_noun_is_no_match() {
        // "show me" alone isn't a category query unless we know the category.
        assert!(parse_message("show me something nice").is_none());
    }

    #[test]
    fn unrelated_message_is_no_match() {
        assert!(parse_message("hello there").is_none());
        assert!(parse_message("").is_none());
    }

    #[tokio::test]
    async fn extractor_degrades_to_unknown() {
        let extractor = RuleBasedExtractor::new();
        let intent = extractor.extract("tell me a joke").await.unwrap();
        assert!(intent.is_unknown());
        assert_eq!(extractor.tier_name(), "rules");
    }

    #[tokio::test]
    async fn extractor_parses_price_query() {
        let extractor = RuleBasedExtractor::new();
        let intent = extractor.extract("price of iPhone 9?").await.unwrap();
        assert_eq!(intent.goal, IntentGoal::PriceQuery);
    }
}

use serde::{Deserialize, Serialize};

/// What the user is asking for, as a closed set of goal tags.
///
/// The extraction prompt and the rule-based parser both emit these exact
/// tags; anything else normalizes to `Unknown` so the resolver can match
/// exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IntentGoal {
    /// "What does X cost?"
    PriceQuery,
    /// "Do you have X in stock?"
    Availability,
    /// "Show me things rated above N."
    RatingFilter,
    /// "What do people think of X?"
    ReviewRequest,
    /// "Show me electronics."
    CategoryQuery,
    /// Broad question about a single product ("tell me about X").
    GeneralInfo,
    #[default]
    Unknown,
}

impl IntentGoal {
    /// Map a raw goal tag from the LLM to a variant. Unrecognized tags
    /// become `Unknown` rather than an error.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "price_query" => Self::PriceQuery,
            "availability" => Self::Availability,
            "rating_filter" => Self::RatingFilter,
            "review_request" => Self::ReviewRequest,
            "category_query" => Self::CategoryQuery,
            "general_info" => Self::GeneralInfo,
            _ => Self::Unknown,
        }
    }

    /// Goals that apply a predicate across the whole catalog when no
    /// entity narrows the candidate set.
    pub fn is_filtering(self) -> bool {
        matches!(self, Self::RatingFilter)
    }
}

/// Structured interpretation of one user message.
///
/// Produced once per request by the intent extractor, consumed once by the
/// fact resolver, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    #[serde(default)]
    pub goal: IntentGoal,
    /// Product or category name the message refers to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    /// Inclusive rating threshold for `RatingFilter`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_rating: Option<f64>,
}

impl Intent {
    /// The degrade-to-unknown fallback: no goal, no entity, no criteria.
    pub fn unknown() -> Self {
        Self {
            goal: IntentGoal::Unknown,
            entity: None,
            min_rating: None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.goal == IntentGoal::Unknown
    }
}

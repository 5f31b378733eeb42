use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Attribute names a fact set may carry, as a closed set.
///
/// Keys are ordered (BTreeMap) so the prompt rendering is deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactField {
    Price,
    DiscountPercentage,
    Rating,
    Stock,
    Warranty,
    Shipping,
    Brand,
    Category,
    Description,
}

/// Resolved attributes for one matched product, tagged by its identifier
/// so multi-match fact sets stay distinguishable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductFacts {
    pub product_id: u64,
    pub name: String,
    pub facts: BTreeMap<FactField, Value>,
}

/// The minimal grounding data handed to the response synthesizer.
///
/// Empty is valid: it means "no match", and the synthesizer must apologize
/// rather than invent data. The synthesizer never sees catalog data wider
/// than this.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FactSet {
    pub entries: Vec<ProductFacts>,
}

impl FactSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// JSON rendering embedded in the synthesis prompt.
    pub fn to_prompt_json(&self) -> String {
        match serde_json::to_value(&self.entries) {
            Ok(value) => value.to_string(),
            Err(_) => "[]".to_string(),
        }
    }
}

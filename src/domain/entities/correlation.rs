use crate::domain::values::topic::Topic;
use serde::{Deserialize, Serialize};

const MAX_BOOSTED_CONFIDENCE: f64 = 0.95;

/// Historical evidence for how a stock reacts to a topic's event resolutions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CorrelationInsight {
    pub ticker: String,
    pub topic: Topic,
    /// Resolved events that mention the ticker.
    pub direct_matches: usize,
    /// Direct matches classified under `topic`.
    pub topic_matches: usize,
    /// Same-sector peers' events under `topic`.
    pub sector_matches: usize,
    pub yes_count: usize,
    pub no_count: usize,
    /// Weighted mean of signed price changes, in percent.
    pub avg_move_pct: f64,
    /// Weighted mean of absolute price changes, in percent.
    pub avg_abs_move_pct: f64,
    /// 0.0 = moves split evenly up/down, 1.0 = all one direction.
    pub consistency: f64,
    pub confidence_boost: f64,
    pub summary: String,
    pub examples: Vec<String>,
}

impl CorrelationInsight {
    pub fn empty(ticker: &str, topic: Topic) -> Self {
        Self {
            ticker: ticker.to_uppercase(),
            topic,
            direct_matches: 0,
            topic_matches: 0,
            sector_matches: 0,
            yes_count: 0,
            no_count: 0,
            avg_move_pct: 0.0,
            avg_abs_move_pct: 0.0,
            consistency: 0.0,
            confidence_boost: 0.0,
            summary: format!(
                "No historical resolutions found for {} on {} events",
                ticker.to_uppercase(),
                topic
            ),
            examples: vec![],
        }
    }

    /// Base confidence raised by the historical boost, capped at 0.95.
    pub fn apply(&self, base: f64) -> f64 {
        (base + self.confidence_boost).min(MAX_BOOSTED_CONFIDENCE)
    }
}

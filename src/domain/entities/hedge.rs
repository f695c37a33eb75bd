use crate::domain::entities::correlation::CorrelationInsight;
use crate::domain::values::outcome::Outcome;
use crate::domain::values::sizing::HedgeSizing;
use crate::domain::values::topic::Topic;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Why an event was considered for a holding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relevance {
    /// The event names the company.
    Direct,
    /// The event's topic moves the company's sector.
    Thematic,
}

impl Relevance {
    pub fn weight(&self) -> f64 {
        match self {
            Relevance::Direct => 1.0,
            Relevance::Thematic => 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationSource {
    Llm,
    Heuristic,
}

/// A suggested prediction-market position that offsets risk in a holding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HedgeRecommendation {
    pub id: String,
    pub ticker: String,
    pub event_id: String,
    pub event_title: String,
    pub event_slug: String,
    pub market_question: String,
    pub topic: Topic,
    /// Outcome to buy.
    pub position: Outcome,
    /// Current price of `position` (0.0–1.0), when known.
    pub market_price: Option<f64>,
    pub relevance: Relevance,
    /// Confidence before the historical correlation boost.
    pub base_confidence: f64,
    pub confidence: f64,
    pub rationale: String,
    pub source: RecommendationSource,
    pub correlation: Option<CorrelationInsight>,
    pub sizing: Option<HedgeSizing>,
    pub created_at: DateTime<Utc>,
}

impl HedgeRecommendation {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        ticker: String,
        event_id: String,
        event_title: String,
        event_slug: String,
        market_question: String,
        topic: Topic,
        position: Outcome,
        relevance: Relevance,
        base_confidence: f64,
        rationale: String,
        source: RecommendationSource,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            ticker,
            event_id,
            event_title,
            event_slug,
            market_question,
            topic,
            position,
            market_price: None,
            relevance,
            base_confidence,
            confidence: base_confidence,
            rationale,
            source,
            correlation: None,
            sizing: None,
            created_at: Utc::now(),
        }
    }
}

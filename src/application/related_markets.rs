//! Finding open prediction markets that bear on a stock holding.

use serde::Serialize;

use crate::application::llm_json::parse_id_list;
use crate::application::matching::{StockMatcher, TopicClassifier};
use crate::domain::entities::hedge::Relevance;
use crate::domain::entities::prediction_event::PredictionEvent;
use crate::domain::entities::stock_match::StockMatch;
use crate::domain::ports::llm::LlmProvider;
use crate::domain::values::portfolio::Holding;
use crate::domain::values::topic::Topic;

pub const DEFAULT_CANDIDATES_PER_HOLDING: usize = 5;

/// An event with its classification and stock matches computed once.
#[derive(Debug, Clone)]
pub struct EventProfile {
    pub event: PredictionEvent,
    pub topic: Topic,
    pub matches: Vec<StockMatch>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Candidate {
    pub event: PredictionEvent,
    pub topic: Topic,
    pub relevance: Relevance,
    /// Matcher confidence for the holding's ticker on direct candidates.
    pub match_confidence: Option<f64>,
}

#[derive(Default)]
pub struct RelatedMarkets {
    matcher: StockMatcher,
    classifier: TopicClassifier,
}

impl RelatedMarkets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn profile(&self, events: Vec<PredictionEvent>) -> Vec<EventProfile> {
        events
            .into_iter()
            .map(|event| EventProfile {
                topic: self.classifier.classify_event(&event).primary,
                matches: self.matcher.match_event(&event),
                event,
            })
            .collect()
    }

    /// Events directly naming the holding, then events whose topic moves the
    /// holding's sector. Direct events are ranked by match confidence, then
    /// volume; thematic events by volume.
    pub fn find(&self, holding: &Holding, profiles: &[EventProfile], limit: usize) -> Vec<Candidate> {
        let sensitive = holding.sector().sensitive_topics();

        let mut candidates: Vec<Candidate> = profiles
            .iter()
            .filter(|p| p.event.primary_market().is_some())
            .filter_map(|p| {
                if let Some(m) = p.matches.iter().find(|m| m.ticker == holding.ticker) {
                    return Some(Candidate {
                        event: p.event.clone(),
                        topic: p.topic,
                        relevance: Relevance::Direct,
                        match_confidence: Some(m.confidence),
                    });
                }
                sensitive.contains(&p.topic).then(|| Candidate {
                    event: p.event.clone(),
                    topic: p.topic,
                    relevance: Relevance::Thematic,
                    match_confidence: None,
                })
            })
            .collect();

        candidates.sort_by(|a, b| {
            b.relevance
                .weight()
                .partial_cmp(&a.relevance.weight())
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| {
                    b.match_confidence
                        .unwrap_or(0.0)
                        .partial_cmp(&a.match_confidence.unwrap_or(0.0))
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .then_with(|| {
                    b.event
                        .volume
                        .unwrap_or(0.0)
                        .partial_cmp(&a.event.volume.unwrap_or(0.0))
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .then_with(|| a.event.id.cmp(&b.event.id))
        });
        candidates.truncate(limit);
        candidates
    }

    /// Ask the model which candidates could move the stock. Any failure
    /// leaves the list untouched.
    pub async fn refine_with_llm(
        &self,
        llm: &dyn LlmProvider,
        holding: &Holding,
        candidates: Vec<Candidate>,
    ) -> Vec<Candidate> {
        if !llm.is_enabled() || candidates.is_empty() {
            return candidates;
        }

        let listing: Vec<serde_json::Value> = candidates
            .iter()
            .map(|c| {
                serde_json::json!({
                    "id": c.event.id,
                    "text": c.event.searchable_text(),
                    "topic": c.topic,
                })
            })
            .collect();
        let user = serde_json::json!({
            "ticker": holding.ticker,
            "sector": holding.sector(),
            "events": listing,
        })
        .to_string();

        let reply = match llm.complete(REFINE_SYSTEM_PROMPT, &user).await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(ticker = %holding.ticker, error = %e, "Relevance refinement failed");
                return candidates;
            }
        };
        let Some(ids) = parse_id_list(&reply) else {
            tracing::warn!(ticker = %holding.ticker, "Unparsable relevance reply; keeping all candidates");
            return candidates;
        };

        let before = candidates.len();
        let kept: Vec<Candidate> = candidates
            .into_iter()
            .filter(|c| ids.contains(&c.event.id))
            .collect();
        tracing::debug!(ticker = %holding.ticker, before, after = kept.len(), "Refined candidates");
        kept
    }
}

const REFINE_SYSTEM_PROMPT: &str = "You are an equity risk analyst. Given a stock and a list of \
prediction-market events, return ONLY a JSON array of the ids of events whose resolution could \
materially move the stock price. Return [] if none apply.";

//! Hedge recommendations for a stock portfolio.
//!
//! Pipeline: price the holdings, pull open prediction markets, pick the
//! candidate events for each holding, let the LLM choose positions (or fall
//! back to a keyword heuristic), then boost confidence with historical
//! correlation and size each bet.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::application::correlation::CorrelationModel;
use crate::application::llm_json::extract_json_array;
use crate::application::matching::text::count_whole_word;
use crate::application::related_markets::{
    Candidate, RelatedMarkets, DEFAULT_CANDIDATES_PER_HOLDING,
};
use crate::domain::entities::hedge::{HedgeRecommendation, RecommendationSource, Relevance};
use crate::domain::error::DomainError;
use crate::domain::ports::llm::LlmProvider;
use crate::domain::ports::market_source::PredictionMarketSource;
use crate::domain::ports::price_source::PriceSource;
use crate::domain::ports::resolution_store::ResolutionStore;
use crate::domain::values::confidence::Confidence;
use crate::domain::values::outcome::Outcome;
use crate::domain::values::portfolio::{Holding, Portfolio, SectorExposure};
use crate::domain::values::sizing::{compute_hedge_size, HedgeSizingConfig};

const DIRECT_BASE_CONFIDENCE: f64 = 0.45;
const THEMATIC_BASE_CONFIDENCE: f64 = 0.30;

/// Words in a market question that describe a bad outcome for a company.
const ADVERSE_KEYWORDS: &[&str] = &[
    "ban", "banned", "bans", "lawsuit", "sued", "recession", "decline", "declines", "fall",
    "falls", "drop", "drops", "below", "tariff", "tariffs", "war", "reject", "rejected",
    "rejects", "fine", "fined", "default", "bankruptcy", "bankrupt", "layoffs", "investigation",
    "probe", "breakup", "delay", "delayed", "crash", "shutdown", "strike", "sanctions", "invade",
    "invasion", "rate hike", "antitrust", "blocked", "miss", "misses", "lose", "loses",
    "downgrade", "halt", "recall", "indicted", "resign", "resigns",
];

/// Words in a market question that describe a good outcome for a company.
const POSITIVE_KEYWORDS: &[&str] = &[
    "approve", "approved", "approves", "approval", "above", "beat", "beats", "launch",
    "launches", "rate cut", "rate cuts", "rise", "rises", "gain", "gains", "record high",
    "all-time high", "win", "wins", "ceasefire", "pass", "passes", "reach", "reaches", "exceed",
    "exceeds", "growth", "surge", "release", "releases", "trade deal", "largest",
];

#[derive(Debug, Clone)]
pub struct HedgeOptions {
    pub max_recommendations: usize,
    /// How many open events to pull from the market source.
    pub event_limit: usize,
    pub candidates_per_holding: usize,
    /// Ask the LLM to prune candidates before generating positions.
    pub refine_candidates: bool,
    pub sizing: HedgeSizingConfig,
}

impl Default for HedgeOptions {
    fn default() -> Self {
        Self {
            max_recommendations: 10,
            event_limit: 200,
            candidates_per_holding: DEFAULT_CANDIDATES_PER_HOLDING,
            refine_candidates: false,
            sizing: HedgeSizingConfig::default(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HedgeReport {
    pub generated_at: DateTime<Utc>,
    pub portfolio_value_cents: u64,
    pub concentration: f64,
    pub exposure: Vec<SectorExposure>,
    /// Holdings without a usable price; skipped.
    pub unpriced: Vec<String>,
    pub events_considered: usize,
    pub candidates: usize,
    pub source: RecommendationSource,
    pub recommendations: Vec<HedgeRecommendation>,
}

/// A position choice before enrichment.
#[derive(Debug, Clone)]
struct Draft {
    holding: usize,
    candidate: usize,
    position: Outcome,
    base_confidence: f64,
    rationale: String,
}

pub struct HedgeUseCase {
    markets: Arc<dyn PredictionMarketSource>,
    prices: Arc<dyn PriceSource>,
    llm: Arc<dyn LlmProvider>,
    store: Arc<dyn ResolutionStore>,
    related: RelatedMarkets,
}

impl HedgeUseCase {
    pub fn new(
        markets: Arc<dyn PredictionMarketSource>,
        prices: Arc<dyn PriceSource>,
        llm: Arc<dyn LlmProvider>,
        store: Arc<dyn ResolutionStore>,
    ) -> Self {
        Self {
            markets,
            prices,
            llm,
            store,
            related: RelatedMarkets::new(),
        }
    }

    pub async fn recommend(
        &self,
        mut portfolio: Portfolio,
        options: &HedgeOptions,
    ) -> Result<HedgeReport, DomainError> {
        portfolio.validate()?;

        let mut unpriced = Vec::new();
        for h in &mut portfolio.holdings {
            if h.value_cents().is_some() {
                continue;
            }
            match self.prices.latest_price(&h.ticker).await {
                Ok(p) if p.is_finite() && p > 0.0 => h.price = Some(p),
                Ok(p) => {
                    tracing::warn!(ticker = %h.ticker, price = p, "Ignoring non-positive price");
                    unpriced.push(h.ticker.clone());
                }
                Err(e) => {
                    tracing::warn!(ticker = %h.ticker, error = %e, "Could not price holding");
                    unpriced.push(h.ticker.clone());
                }
            }
        }

        let holdings: Vec<Holding> = portfolio
            .holdings
            .iter()
            .filter(|h| h.value_cents().is_some())
            .cloned()
            .collect();

        let events = self.markets.fetch_active_events(options.event_limit).await?;
        let events_considered = events.len();
        let profiles = self.related.profile(events);

        // candidates[i] belongs to holdings[i]
        let mut candidates: Vec<Vec<Candidate>> = Vec::with_capacity(holdings.len());
        for h in &holdings {
            let mut found = self
                .related
                .find(h, &profiles, options.candidates_per_holding);
            if options.refine_candidates {
                found = self
                    .related
                    .refine_with_llm(self.llm.as_ref(), h, found)
                    .await;
            }
            candidates.push(found);
        }
        let candidate_count: usize = candidates.iter().map(Vec::len).sum();

        tracing::info!(
            holdings = holdings.len(),
            events = events_considered,
            candidates = candidate_count,
            llm = self.llm.name(),
            "Generating hedge recommendations"
        );

        let (drafts, source) = self.generate(&holdings, &candidates).await;

        let model = match self.store.load() {
            Ok(records) => CorrelationModel::new(records),
            Err(e) => {
                tracing::warn!(error = %e, "Resolution history unavailable; skipping correlation boost");
                CorrelationModel::new(vec![])
            }
        };

        let portfolio_value = portfolio.total_value_cents();
        let mut recommendations: Vec<HedgeRecommendation> = drafts
            .into_iter()
            .map(|d| {
                let holding = &holdings[d.holding];
                let candidate = &candidates[d.holding][d.candidate];
                self.enrich(holding, candidate, d, source, &model, portfolio_value, options)
            })
            .collect();

        recommendations.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.event_title.cmp(&b.event_title))
        });
        recommendations.truncate(options.max_recommendations);

        Ok(HedgeReport {
            generated_at: Utc::now(),
            portfolio_value_cents: portfolio_value,
            concentration: portfolio.concentration(),
            exposure: portfolio.sector_exposure(),
            unpriced,
            events_considered,
            candidates: candidate_count,
            source,
            recommendations,
        })
    }

    async fn generate(
        &self,
        holdings: &[Holding],
        candidates: &[Vec<Candidate>],
    ) -> (Vec<Draft>, RecommendationSource) {
        if candidates.iter().all(Vec::is_empty) {
            return (vec![], RecommendationSource::Heuristic);
        }
        if self.llm.is_enabled() {
            let prompt = build_prompt(holdings, candidates);
            match self.llm.complete(GENERATE_SYSTEM_PROMPT, &prompt).await {
                Ok(reply) => {
                    let drafts = parse_llm_drafts(&reply, holdings, candidates);
                    if !drafts.is_empty() {
                        return (drafts, RecommendationSource::Llm);
                    }
                    tracing::warn!("LLM returned no usable recommendations; using heuristic");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "LLM recommendation failed; using heuristic");
                }
            }
        }
        (heuristic_drafts(holdings, candidates), RecommendationSource::Heuristic)
    }

    #[allow(clippy::too_many_arguments)]
    fn enrich(
        &self,
        holding: &Holding,
        candidate: &Candidate,
        draft: Draft,
        source: RecommendationSource,
        model: &CorrelationModel,
        portfolio_value: u64,
        options: &HedgeOptions,
    ) -> HedgeRecommendation {
        let event = &candidate.event;
        let market = event.primary_market();

        let mut rec = HedgeRecommendation::new(
            holding.ticker.clone(),
            event.id.clone(),
            event.title.clone(),
            event.slug.clone(),
            market.map(|m| m.question.clone()).unwrap_or_default(),
            candidate.topic,
            draft.position,
            candidate.relevance,
            draft.base_confidence,
            draft.rationale,
            source,
        );

        let insight = model.insight(&holding.ticker, candidate.topic);
        rec.confidence = insight.apply(draft.base_confidence);
        rec.correlation = Some(insight);

        rec.market_price = market.and_then(|m| m.price_of(draft.position.label()));
        rec.sizing = match (rec.market_price, holding.value_cents()) {
            (Some(price), Some(value)) => {
                compute_hedge_size(value, price, rec.confidence, portfolio_value, &options.sizing)
            }
            _ => None,
        };
        rec
    }
}

const GENERATE_SYSTEM_PROMPT: &str = "You are a portfolio hedging assistant. For each stock \
holding you receive candidate prediction-market events. Choose events where buying Yes or No \
would pay off when the holding loses value. Respond ONLY with a JSON array of objects: \
{\"ticker\": string, \"event_id\": string, \"position\": \"yes\" | \"no\", \
\"confidence\": number between 0 and 1, \"rationale\": string}. Skip events that do not hedge.";

fn build_prompt(holdings: &[Holding], candidates: &[Vec<Candidate>]) -> String {
    let items: Vec<serde_json::Value> = holdings
        .iter()
        .zip(candidates)
        .map(|(h, cands)| {
            serde_json::json!({
                "ticker": h.ticker,
                "sector": h.sector(),
                "value_usd": h.value_cents().map(|c| c as f64 / 100.0),
                "candidates": cands.iter().map(|c| serde_json::json!({
                    "event_id": c.event.id,
                    "title": c.event.title,
                    "question": c.event.primary_market().map(|m| m.question.as_str()),
                    "yes_price": c.event.primary_market().and_then(|m| m.price_of("Yes")),
                    "topic": c.topic,
                    "relevance": c.relevance,
                })).collect::<Vec<_>>(),
            })
        })
        .collect();
    serde_json::json!({ "holdings": items }).to_string()
}

fn json_string(v: Option<&serde_json::Value>) -> Option<String> {
    match v? {
        serde_json::Value::String(s) => Some(s.trim().to_string()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Model output mapped back onto known holdings and candidates. Entries
/// naming unknown tickers or events are dropped.
fn parse_llm_drafts(
    reply: &str,
    holdings: &[Holding],
    candidates: &[Vec<Candidate>],
) -> Vec<Draft> {
    let Some(array) = extract_json_array(reply) else {
        return vec![];
    };
    let Ok(items) = serde_json::from_str::<Vec<serde_json::Value>>(array) else {
        return vec![];
    };

    let mut seen = HashSet::new();
    let mut drafts = Vec::new();
    for item in &items {
        let (Some(ticker), Some(event_id), Some(position)) = (
            json_string(item.get("ticker")),
            json_string(item.get("event_id")),
            json_string(item.get("position")),
        ) else {
            continue;
        };
        let Ok(position) = position.parse::<Outcome>() else {
            continue;
        };
        if position == Outcome::Unresolved {
            continue;
        }
        let Some(hi) = holdings
            .iter()
            .position(|h| h.ticker.eq_ignore_ascii_case(&ticker))
        else {
            tracing::debug!(%ticker, "LLM named unknown ticker");
            continue;
        };
        let Some(ci) = candidates[hi].iter().position(|c| c.event.id == event_id) else {
            tracing::debug!(%ticker, %event_id, "LLM named unknown event");
            continue;
        };
        if !seen.insert((hi, ci)) {
            continue;
        }

        let relevance = candidates[hi][ci].relevance;
        let base_confidence = item
            .get("confidence")
            .and_then(|c| c.as_f64())
            .filter(|c| c.is_finite())
            .map(|c| Confidence::clamped(c).value())
            .unwrap_or_else(|| base_confidence(relevance));
        let rationale = item
            .get("rationale")
            .and_then(|r| r.as_str())
            .unwrap_or_default()
            .to_string();

        drafts.push(Draft {
            holding: hi,
            candidate: ci,
            position,
            base_confidence,
            rationale,
        });
    }
    drafts
}

fn base_confidence(relevance: Relevance) -> f64 {
    match relevance {
        Relevance::Direct => DIRECT_BASE_CONFIDENCE,
        Relevance::Thematic => THEMATIC_BASE_CONFIDENCE,
    }
}

/// Position suggested by the wording of a market question: `Yes` when it
/// describes a bad outcome, `No` when it describes a good one.
pub fn heuristic_position(question: &str) -> Option<Outcome> {
    let q = question.to_lowercase();
    let adverse: usize = ADVERSE_KEYWORDS.iter().map(|k| count_whole_word(&q, k)).sum();
    let positive: usize = POSITIVE_KEYWORDS.iter().map(|k| count_whole_word(&q, k)).sum();
    match adverse.cmp(&positive) {
        std::cmp::Ordering::Greater => Some(Outcome::Yes),
        std::cmp::Ordering::Less => Some(Outcome::No),
        std::cmp::Ordering::Equal => None,
    }
}

fn heuristic_drafts(holdings: &[Holding], candidates: &[Vec<Candidate>]) -> Vec<Draft> {
    let mut drafts = Vec::new();
    for (hi, (holding, cands)) in holdings.iter().zip(candidates).enumerate() {
        for (ci, c) in cands.iter().enumerate() {
            let question = c
                .event
                .primary_market()
                .map(|m| m.question.as_str())
                .unwrap_or(c.event.title.as_str());
            let Some(position) = heuristic_position(question) else {
                continue;
            };
            let reason = match position {
                Outcome::Yes => "describes an outcome that would hurt",
                _ => "describes an outcome that would help",
            };
            let link = match c.relevance {
                Relevance::Direct => "names the company",
                Relevance::Thematic => "is a sector theme",
            };
            drafts.push(Draft {
                holding: hi,
                candidate: ci,
                position,
                base_confidence: base_confidence(c.relevance),
                rationale: format!(
                    "\"{question}\" {reason} {}; the event {link}, so buying {} offsets a loss",
                    holding.ticker,
                    position.label()
                ),
            });
        }
    }
    drafts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heuristic_position() {
        assert_eq!(heuristic_position("Will the FTC ban TikTok?"), Some(Outcome::Yes));
        assert_eq!(heuristic_position("Will the FDA approve the drug?"), Some(Outcome::No));
        assert_eq!(heuristic_position("Who wins the Super Bowl?"), Some(Outcome::No));
        assert_eq!(heuristic_position("Will it rain on Tuesday?"), None);
        assert_eq!(heuristic_position("Will tariffs be approved?"), None);
    }
}

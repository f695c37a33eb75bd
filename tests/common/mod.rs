//! Shared test helpers: in-memory fakes for every port plus builders.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use polyhedge::domain::catalog;
use polyhedge::domain::entities::prediction_event::{PredictionEvent, PredictionMarket};
use polyhedge::domain::entities::resolution::{PriceMove, ResolutionRecord};
use polyhedge::domain::entities::stock_match::{MatchKind, StockMatch};
use polyhedge::domain::error::DomainError;
use polyhedge::domain::ports::llm::LlmProvider;
use polyhedge::domain::ports::market_source::PredictionMarketSource;
use polyhedge::domain::ports::price_source::PriceSource;
use polyhedge::domain::ports::resolution_store::ResolutionStore;
use polyhedge::domain::values::outcome::Outcome;
use polyhedge::domain::values::topic::Topic;
use polyhedge::infrastructure::llm::NoopLlm;
use polyhedge::PolyHedge;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

// --- market source ---

#[derive(Default)]
pub struct FakeMarketSource {
    pub closed: Vec<PredictionEvent>,
    pub active: Vec<PredictionEvent>,
    /// Closed-event requests at or past this offset fail.
    pub fail_from_offset: Option<usize>,
    pub requests: Mutex<Vec<(usize, usize)>>,
}

impl FakeMarketSource {
    pub fn with_closed(closed: Vec<PredictionEvent>) -> Self {
        Self {
            closed,
            ..Default::default()
        }
    }

    pub fn with_active(active: Vec<PredictionEvent>) -> Self {
        Self {
            active,
            ..Default::default()
        }
    }

    pub fn requests(&self) -> Vec<(usize, usize)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PredictionMarketSource for FakeMarketSource {
    fn name(&self) -> &str {
        "fake_markets"
    }

    async fn fetch_closed_events(
        &self,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<PredictionEvent>, DomainError> {
        self.requests.lock().unwrap().push((offset, limit));
        if self.fail_from_offset.is_some_and(|o| offset >= o) {
            return Err(DomainError::Network("HTTP 503 Service Unavailable".into()));
        }
        Ok(self.closed.iter().skip(offset).take(limit).cloned().collect())
    }

    async fn fetch_active_events(&self, limit: usize) -> Result<Vec<PredictionEvent>, DomainError> {
        Ok(self.active.iter().take(limit).cloned().collect())
    }
}

// --- prices ---

/// Latest prices and post-resolution percentage moves keyed by ticker.
#[derive(Default)]
pub struct FakePriceSource {
    pub prices: HashMap<String, f64>,
    pub moves: HashMap<String, f64>,
}

impl FakePriceSource {
    pub fn new(prices: &[(&str, f64)], moves: &[(&str, f64)]) -> Self {
        Self {
            prices: prices.iter().map(|(t, p)| (t.to_string(), *p)).collect(),
            moves: moves.iter().map(|(t, m)| (t.to_string(), *m)).collect(),
        }
    }
}

#[async_trait]
impl PriceSource for FakePriceSource {
    fn name(&self) -> &str {
        "fake_prices"
    }

    async fn latest_price(&self, ticker: &str) -> Result<f64, DomainError> {
        self.prices
            .get(ticker)
            .copied()
            .ok_or_else(|| DomainError::NotFound(format!("No quote for {ticker}")))
    }

    async fn price_move(
        &self,
        ticker: &str,
        at: DateTime<Utc>,
        window_days: u32,
    ) -> Result<PriceMove, DomainError> {
        let change = self
            .moves
            .get(ticker)
            .ok_or_else(|| DomainError::NotFound(format!("No history for {ticker}")))?;
        let start = at.date_naive();
        let end = start + Duration::days(window_days as i64);
        Ok(PriceMove::new(ticker, start, 100.0, end, 100.0 + change))
    }
}

// --- llm ---

/// Replies are handed out in order; once exhausted every call fails.
#[derive(Default)]
pub struct FakeLlm {
    replies: Mutex<VecDeque<String>>,
    pub prompts: Mutex<Vec<String>>,
}

impl FakeLlm {
    pub fn replying(replies: &[&str]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
            prompts: Mutex::new(vec![]),
        }
    }

    pub fn failing() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmProvider for FakeLlm {
    fn name(&self) -> &str {
        "fake_llm"
    }

    async fn complete(&self, _system: &str, user: &str) -> Result<String, DomainError> {
        self.prompts.lock().unwrap().push(user.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| DomainError::Llm("HTTP 500 from fake".into()))
    }
}

// --- store ---

#[derive(Default)]
pub struct MemoryStore {
    pub records: Mutex<Vec<ResolutionRecord>>,
    pub saves: Mutex<usize>,
}

impl MemoryStore {
    pub fn with_records(records: Vec<ResolutionRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            saves: Mutex::new(0),
        }
    }

    pub fn snapshot(&self) -> Vec<ResolutionRecord> {
        self.records.lock().unwrap().clone()
    }
}

impl ResolutionStore for MemoryStore {
    fn load(&self) -> Result<Vec<ResolutionRecord>, DomainError> {
        Ok(self.records.lock().unwrap().clone())
    }

    fn save(&self, records: &[ResolutionRecord]) -> Result<(), DomainError> {
        *self.records.lock().unwrap() = records.to_vec();
        *self.saves.lock().unwrap() += 1;
        Ok(())
    }

    fn location(&self) -> String {
        "memory".into()
    }
}

// --- setup ---

pub fn setup_with(
    markets: Arc<FakeMarketSource>,
    prices: Arc<FakePriceSource>,
    llm: Arc<dyn LlmProvider>,
    store: Arc<dyn ResolutionStore>,
) -> PolyHedge {
    PolyHedge::with_providers(markets, prices, llm, store)
}

pub fn setup() -> PolyHedge {
    setup_with(
        Arc::new(FakeMarketSource::default()),
        Arc::new(FakePriceSource::default()),
        Arc::new(NoopLlm),
        Arc::new(MemoryStore::default()),
    )
}

// --- builders ---

pub fn ts(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 11, day, 18, 0, 0).unwrap()
}

pub fn market(id: &str, question: &str, yes_price: f64, closed: bool) -> PredictionMarket {
    PredictionMarket {
        id: id.to_string(),
        question: question.to_string(),
        outcomes: vec!["Yes".into(), "No".into()],
        outcome_prices: vec![yes_price, 1.0 - yes_price],
        closed,
        volume: Some(1_000.0),
    }
}

/// A closed single-market event. `winner` of `None` leaves it unresolved.
pub fn closed_event(id: &str, title: &str, winner: Option<Outcome>, day: u32) -> PredictionEvent {
    let yes_price = match winner {
        Some(Outcome::Yes) => 1.0,
        Some(Outcome::No) => 0.0,
        _ => 0.5,
    };
    PredictionEvent {
        id: id.to_string(),
        slug: id.to_string(),
        title: title.to_string(),
        description: String::new(),
        end_date: Some(ts(day)),
        closed: true,
        volume: Some(10_000.0),
        liquidity: None,
        tags: vec![],
        markets: vec![market(&format!("m-{id}"), title, yes_price, true)],
    }
}

pub fn open_event(id: &str, title: &str, yes_price: f64, volume: f64) -> PredictionEvent {
    PredictionEvent {
        id: id.to_string(),
        slug: id.to_string(),
        title: title.to_string(),
        description: String::new(),
        end_date: None,
        closed: false,
        volume: Some(volume),
        liquidity: Some(500.0),
        tags: vec![],
        markets: vec![market(&format!("m-{id}"), title, yes_price, false)],
    }
}

pub fn record(id: &str, ticker: &str, topic: Topic, outcome: Outcome, change_pct: Option<f64>) -> ResolutionRecord {
    let closed_at = ts(5);
    let d = closed_at.date_naive();
    ResolutionRecord {
        event_id: id.to_string(),
        slug: id.to_string(),
        title: format!("Resolved event {id}"),
        market_question: None,
        closed_at: Some(closed_at),
        outcome,
        winning_label: Some(outcome.label().to_string()),
        primary_topic: topic,
        topics: vec![topic],
        matches: vec![StockMatch {
            ticker: ticker.to_string(),
            company: ticker.to_string(),
            sector: catalog::sector_of(ticker),
            confidence: 0.9,
            kind: MatchKind::CompanyName,
            matched_text: ticker.to_lowercase(),
            mentions: 1,
        }],
        price_moves: change_pct
            .map(|c| vec![PriceMove::new(ticker, d, 100.0, d + Duration::days(3), 100.0 + c)])
            .unwrap_or_default(),
        volume: Some(5_000.0),
        recorded_at: Utc::now(),
    }
}

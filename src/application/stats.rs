use crate::domain::error::DomainError;
use crate::domain::ports::resolution_store::ResolutionStore;
use crate::domain::values::outcome::Outcome;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

const TOP_TICKERS: usize = 20;

#[derive(Debug, Serialize)]
pub struct TopicCount {
    pub topic: String,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct TickerCount {
    pub ticker: String,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct ResolutionStats {
    pub total_records: usize,
    pub yes_count: usize,
    pub no_count: usize,
    /// Resolved to a non-binary label (a candidate, a team, ...).
    pub other_count: usize,
    pub with_price_moves: usize,
    pub by_topic: Vec<TopicCount>,
    pub top_tickers: Vec<TickerCount>,
    pub earliest: Option<DateTime<Utc>>,
    pub latest: Option<DateTime<Utc>>,
}

pub struct StatsUseCase {
    store: Arc<dyn ResolutionStore>,
}

impl StatsUseCase {
    pub fn new(store: Arc<dyn ResolutionStore>) -> Self {
        Self { store }
    }

    pub fn execute(&self) -> Result<ResolutionStats, DomainError> {
        let records = self.store.load()?;

        let mut topics: HashMap<String, usize> = HashMap::new();
        let mut tickers: HashMap<String, usize> = HashMap::new();
        for r in &records {
            *topics.entry(r.primary_topic.to_string()).or_default() += 1;
            for m in &r.matches {
                *tickers.entry(m.ticker.clone()).or_default() += 1;
            }
        }

        let mut by_topic: Vec<TopicCount> = topics
            .into_iter()
            .map(|(topic, count)| TopicCount { topic, count })
            .collect();
        by_topic.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.topic.cmp(&b.topic)));

        let mut top_tickers: Vec<TickerCount> = tickers
            .into_iter()
            .map(|(ticker, count)| TickerCount { ticker, count })
            .collect();
        top_tickers.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.ticker.cmp(&b.ticker)));
        top_tickers.truncate(TOP_TICKERS);

        let count = |o: Outcome| records.iter().filter(|r| r.outcome == o).count();

        Ok(ResolutionStats {
            total_records: records.len(),
            yes_count: count(Outcome::Yes),
            no_count: count(Outcome::No),
            other_count: count(Outcome::Unresolved),
            with_price_moves: records.iter().filter(|r| !r.price_moves.is_empty()).count(),
            by_topic,
            top_tickers,
            earliest: records.iter().filter_map(|r| r.closed_at).min(),
            latest: records.iter().filter_map(|r| r.closed_at).max(),
        })
    }
}

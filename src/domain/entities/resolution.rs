use crate::domain::entities::stock_match::StockMatch;
use crate::domain::values::outcome::Outcome;
use crate::domain::values::topic::Topic;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Stock price change around an event's resolution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceMove {
    pub ticker: String,
    pub baseline_date: NaiveDate,
    pub baseline_price: f64,
    pub after_date: NaiveDate,
    pub after_price: f64,
    pub change_pct: f64,
}

impl PriceMove {
    pub fn new(
        ticker: &str,
        baseline_date: NaiveDate,
        baseline_price: f64,
        after_date: NaiveDate,
        after_price: f64,
    ) -> Self {
        let change_pct = if baseline_price > 0.0 {
            (after_price - baseline_price) / baseline_price * 100.0
        } else {
            0.0
        };
        Self {
            ticker: ticker.to_string(),
            baseline_date,
            baseline_price,
            after_date,
            after_price,
            change_pct,
        }
    }
}

/// One resolved event matched to stocks; a row of the resolutions cache.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResolutionRecord {
    pub event_id: String,
    pub slug: String,
    pub title: String,
    pub market_question: Option<String>,
    pub closed_at: Option<DateTime<Utc>>,
    pub outcome: Outcome,
    pub winning_label: Option<String>,
    pub primary_topic: Topic,
    pub topics: Vec<Topic>,
    pub matches: Vec<StockMatch>,
    #[serde(default)]
    pub price_moves: Vec<PriceMove>,
    pub volume: Option<f64>,
    pub recorded_at: DateTime<Utc>,
}

impl ResolutionRecord {
    pub fn has_ticker(&self, ticker: &str) -> bool {
        self.matches.iter().any(|m| m.ticker.eq_ignore_ascii_case(ticker))
    }

    pub fn has_topic(&self, topic: Topic) -> bool {
        self.topics.contains(&topic)
    }

    pub fn move_for(&self, ticker: &str) -> Option<&PriceMove> {
        self.price_moves
            .iter()
            .find(|m| m.ticker.eq_ignore_ascii_case(ticker))
    }
}

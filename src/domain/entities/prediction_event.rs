use crate::domain::values::outcome::Outcome;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Final outcome prices at or above this mark the winning outcome.
const WINNER_PRICE: f64 = 0.99;

/// A single binary or multi-outcome market inside an event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionMarket {
    pub id: String,
    pub question: String,
    pub outcomes: Vec<String>,
    /// Prices aligned with `outcomes` (0.0–1.0).
    pub outcome_prices: Vec<f64>,
    pub closed: bool,
    pub volume: Option<f64>,
}

impl PredictionMarket {
    /// Label of the winning outcome on a closed market.
    pub fn winning_outcome(&self) -> Option<&str> {
        if !self.closed {
            return None;
        }
        self.outcomes
            .iter()
            .zip(self.outcome_prices.iter())
            .find(|(_, p)| **p >= WINNER_PRICE)
            .map(|(o, _)| o.as_str())
    }

    /// Current price of an outcome label (case-insensitive).
    pub fn price_of(&self, label: &str) -> Option<f64> {
        self.outcomes
            .iter()
            .position(|o| o.eq_ignore_ascii_case(label))
            .and_then(|i| self.outcome_prices.get(i).copied())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionEvent {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub end_date: Option<DateTime<Utc>>,
    pub closed: bool,
    pub volume: Option<f64>,
    pub liquidity: Option<f64>,
    pub tags: Vec<String>,
    pub markets: Vec<PredictionMarket>,
}

impl PredictionEvent {
    /// The market with the highest volume; the first market when volumes tie
    /// or are missing.
    pub fn primary_market(&self) -> Option<&PredictionMarket> {
        let mut best: Option<&PredictionMarket> = None;
        for m in &self.markets {
            match best {
                None => best = Some(m),
                Some(b) if m.volume.unwrap_or(0.0) > b.volume.unwrap_or(0.0) => best = Some(m),
                _ => {}
            }
        }
        best
    }

    /// Resolution of the primary market: binary outcome plus the winning label.
    pub fn resolution(&self) -> (Outcome, Option<String>) {
        let Some(winner) = self.primary_market().and_then(|m| m.winning_outcome()) else {
            return (Outcome::Unresolved, None);
        };
        (Outcome::from_label(winner), Some(winner.to_string()))
    }

    /// Text the matcher and classifier run over (excluding the title).
    pub fn body_text(&self) -> String {
        let mut parts = vec![self.description.clone()];
        for m in &self.markets {
            if m.question != self.title {
                parts.push(m.question.clone());
            }
        }
        parts.join(" ")
    }

    pub fn searchable_text(&self) -> String {
        format!("{} {}", self.title, self.body_text())
    }
}

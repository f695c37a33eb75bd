use crate::domain::values::sector::Sector;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a stock was found in event text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    CashTag,
    Ticker,
    CompanyName,
    Alias,
}

impl MatchKind {
    pub fn base_confidence(&self) -> f64 {
        match self {
            MatchKind::CashTag => 0.95,
            MatchKind::CompanyName => 0.90,
            MatchKind::Ticker => 0.85,
            MatchKind::Alias => 0.75,
        }
    }
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchKind::CashTag => write!(f, "cash_tag"),
            MatchKind::Ticker => write!(f, "ticker"),
            MatchKind::CompanyName => write!(f, "company_name"),
            MatchKind::Alias => write!(f, "alias"),
        }
    }
}

/// A stock mentioned in a prediction-market event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockMatch {
    pub ticker: String,
    pub company: String,
    pub sector: Sector,
    pub confidence: f64,
    pub kind: MatchKind,
    /// Surface form of the strongest mention.
    pub matched_text: String,
    /// Surviving mentions after false-positive suppression.
    pub mentions: usize,
}

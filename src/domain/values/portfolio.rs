//! Stock holdings to hedge.
//!
//! Holdings are supplied by the user (brokerage sync is out of scope).
//! Prices may be omitted and filled in later from a price source.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::catalog;
use crate::domain::error::DomainError;
use crate::domain::values::sector::Sector;

/// A single stock position.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Holding {
    pub ticker: String,
    pub shares: f64,
    /// Last known price in dollars. `None` until priced.
    #[serde(default)]
    pub price: Option<f64>,
}

impl Holding {
    pub fn new(ticker: &str, shares: f64, price: Option<f64>) -> Self {
        Self {
            ticker: ticker.trim().to_uppercase(),
            shares,
            price,
        }
    }

    /// Position value in cents, if priced.
    pub fn value_cents(&self) -> Option<u64> {
        self.price
            .filter(|p| p.is_finite() && *p > 0.0)
            .map(|p| (p * self.shares * 100.0).round().max(0.0) as u64)
    }

    pub fn sector(&self) -> Sector {
        catalog::sector_of(&self.ticker)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Portfolio {
    pub holdings: Vec<Holding>,
    /// Uninvested cash in dollars; counts toward total value.
    #[serde(default)]
    pub cash: Option<f64>,
}

/// Exposure of the portfolio to one sector.
#[derive(Debug, Clone, Serialize)]
pub struct SectorExposure {
    pub sector: Sector,
    pub value_cents: u64,
    /// Share of priced holdings value (0.0–1.0).
    pub weight: f64,
    pub tickers: Vec<String>,
}

impl Portfolio {
    pub fn new(holdings: Vec<Holding>) -> Self {
        Self {
            holdings,
            cash: None,
        }
    }

    /// Normalize tickers and reject empty or malformed portfolios.
    pub fn validate(&mut self) -> Result<(), DomainError> {
        if self.holdings.is_empty() {
            return Err(DomainError::InvalidInput("Portfolio has no holdings".into()));
        }
        for h in &mut self.holdings {
            h.ticker = h.ticker.trim().to_uppercase();
            if h.ticker.is_empty() {
                return Err(DomainError::InvalidInput("Holding with empty ticker".into()));
            }
            if !(h.shares.is_finite() && h.shares > 0.0) {
                return Err(DomainError::InvalidInput(format!(
                    "Holding {} must have a positive share count, got {}",
                    h.ticker, h.shares
                )));
            }
        }
        Ok(())
    }

    pub fn holdings_value_cents(&self) -> u64 {
        self.holdings.iter().filter_map(|h| h.value_cents()).sum()
    }

    pub fn total_value_cents(&self) -> u64 {
        let cash = self
            .cash
            .filter(|c| c.is_finite() && *c > 0.0)
            .map(|c| (c * 100.0).round() as u64)
            .unwrap_or(0);
        self.holdings_value_cents() + cash
    }

    /// Priced value grouped by sector, largest first.
    pub fn sector_exposure(&self) -> Vec<SectorExposure> {
        let total = self.holdings_value_cents();
        let mut by_sector: HashMap<Sector, (u64, Vec<String>)> = HashMap::new();

        for h in &self.holdings {
            let Some(value) = h.value_cents() else {
                continue;
            };
            let slot = by_sector.entry(h.sector()).or_default();
            slot.0 += value;
            slot.1.push(h.ticker.clone());
        }

        let mut exposures: Vec<SectorExposure> = by_sector
            .into_iter()
            .map(|(sector, (value_cents, tickers))| SectorExposure {
                sector,
                value_cents,
                weight: if total > 0 {
                    value_cents as f64 / total as f64
                } else {
                    0.0
                },
                tickers,
            })
            .collect();
        exposures.sort_by(|a, b| {
            b.value_cents
                .cmp(&a.value_cents)
                .then_with(|| a.sector.to_string().cmp(&b.sector.to_string()))
        });
        exposures
    }

    /// Herfindahl index over position weights (1.0 = single position).
    pub fn concentration(&self) -> f64 {
        let total = self.holdings_value_cents();
        if total == 0 {
            return 0.0;
        }
        self.holdings
            .iter()
            .filter_map(|h| h.value_cents())
            .map(|v| {
                let w = v as f64 / total as f64;
                w * w
            })
            .sum()
    }
}

use crate::domain::entities::resolution::PriceMove;
use crate::domain::error::DomainError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Equity price data (e.g. Yahoo Finance).
#[async_trait]
pub trait PriceSource: Send + Sync {
    fn name(&self) -> &str;

    /// Latest traded price in dollars.
    async fn latest_price(&self, ticker: &str) -> Result<f64, DomainError>;

    /// Price change from the last close on or before `at` to the last close
    /// on or before `at + window_days`.
    async fn price_move(
        &self,
        ticker: &str,
        at: DateTime<Utc>,
        window_days: u32,
    ) -> Result<PriceMove, DomainError>;
}

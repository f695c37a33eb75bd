use std::sync::Arc;

use serde::Serialize;

use crate::domain::error::DomainError;
use crate::domain::ports::price_source::PriceSource;

#[derive(Debug, Clone, Serialize)]
pub struct Quote {
    pub ticker: String,
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Latest prices for a list of tickers. Lookup failures are reported per
/// ticker instead of failing the whole batch.
pub struct QuoteUseCase {
    prices: Arc<dyn PriceSource>,
}

impl QuoteUseCase {
    pub fn new(prices: Arc<dyn PriceSource>) -> Self {
        Self { prices }
    }

    pub async fn execute(&self, tickers: &[String]) -> Result<Vec<Quote>, DomainError> {
        let mut seen = Vec::new();
        for t in tickers {
            let t = t.trim().to_uppercase();
            if !t.is_empty() && !seen.contains(&t) {
                seen.push(t);
            }
        }
        if seen.is_empty() {
            return Err(DomainError::InvalidInput("No tickers given".into()));
        }

        let mut quotes = Vec::with_capacity(seen.len());
        for ticker in seen {
            let quote = match self.prices.latest_price(&ticker).await {
                Ok(price) => Quote {
                    ticker,
                    price: Some(price),
                    error: None,
                },
                Err(e) => {
                    tracing::warn!(ticker = %ticker, error = %e, "Quote failed");
                    Quote {
                        ticker,
                        price: None,
                        error: Some(e.to_string()),
                    }
                }
            };
            quotes.push(quote);
        }
        Ok(quotes)
    }
}

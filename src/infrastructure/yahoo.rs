use crate::domain::entities::resolution::PriceMove;
use crate::domain::error::DomainError;
use crate::domain::ports::price_source::PriceSource;
use crate::infrastructure::retry::{status_error, with_retry, RetryConfig};
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::time::Duration as StdDuration;

pub const YAHOO_CHART_URL: &str = "https://query1.finance.yahoo.com";

/// Extra calendar days fetched before the baseline so weekends and holidays
/// still leave a prior close.
const LOOKBACK_PAD_DAYS: i64 = 4;

/// Yahoo Finance prices via the v8 chart API (no auth required).
pub struct YahooClient {
    base_url: String,
    client: reqwest::Client,
    retry: RetryConfig,
}

impl YahooClient {
    pub fn new() -> Self {
        Self::with_config(YAHOO_CHART_URL, StdDuration::from_secs(15), RetryConfig::default())
    }

    pub fn with_config(base_url: &str, timeout: StdDuration, retry: RetryConfig) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::builder()
                .user_agent(
                    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
                     AppleWebKit/537.36 (KHTML, like Gecko) \
                     Chrome/120.0.0.0 Safari/537.36",
                )
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            retry,
        }
    }

    async fn chart(&self, ticker: &str, query: &[(&str, String)]) -> Result<ChartData, DomainError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, ticker.to_uppercase());
        let client = &self.client;
        let url = &url;

        let body = with_retry(&self.retry, "yahoo_chart", || async move {
            let resp = client
                .get(url)
                .query(query)
                .send()
                .await
                .map_err(|e| DomainError::Network(format!("Yahoo request failed: {e}")))?;
            let status = resp.status();
            let body = resp
                .text()
                .await
                .map_err(|e| DomainError::Network(format!("Yahoo read failed: {e}")))?;
            if !status.is_success() {
                return Err(status_error("Yahoo Finance", status, &body));
            }
            Ok(body)
        })
        .await?;

        parse_chart(ticker, &body)
    }
}

impl Default for YahooClient {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, serde::Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, serde::Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<serde_json::Value>,
}

#[derive(Debug, serde::Deserialize)]
struct ChartData {
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    #[serde(default)]
    indicators: Option<Indicators>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    symbol: String,
    #[serde(default)]
    regular_market_price: Option<f64>,
}

#[derive(Debug, serde::Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Debug, serde::Deserialize)]
struct Quote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

impl ChartData {
    /// Daily closes by trading date, skipping null bars.
    fn closes(&self) -> Vec<(NaiveDate, f64)> {
        let Some(quote) = self.indicators.as_ref().and_then(|i| i.quote.first()) else {
            return vec![];
        };
        self.timestamp
            .iter()
            .zip(quote.close.iter())
            .filter_map(|(ts, close)| {
                let date = DateTime::from_timestamp(*ts, 0)?.date_naive();
                close.filter(|c| c.is_finite() && *c > 0.0).map(|c| (date, c))
            })
            .collect()
    }
}

fn parse_chart(ticker: &str, body: &str) -> Result<ChartData, DomainError> {
    let data: ChartResponse = serde_json::from_str(body)
        .map_err(|e| DomainError::Parse(format!("Yahoo chart for {ticker}: {e}")))?;

    if let Some(err) = data.chart.error.filter(|e| !e.is_null()) {
        return Err(DomainError::NotFound(format!("Yahoo error for {ticker}: {err}")));
    }

    data.chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| DomainError::NotFound(format!("No chart results for {ticker}")))
}

/// Move from the last close on or before `at` to the last close on or
/// before `at + window_days`.
fn move_from_closes(
    ticker: &str,
    closes: &[(NaiveDate, f64)],
    at: DateTime<Utc>,
    window_days: u32,
) -> Result<PriceMove, DomainError> {
    let baseline_day = at.date_naive();
    let after_day = (at + Duration::days(window_days as i64)).date_naive();

    let baseline = closes
        .iter()
        .filter(|(d, _)| *d <= baseline_day)
        .max_by_key(|(d, _)| *d)
        .ok_or_else(|| DomainError::NotFound(format!("No close for {ticker} on or before {baseline_day}")))?;
    let after = closes
        .iter()
        .filter(|(d, _)| *d > baseline.0 && *d <= after_day)
        .max_by_key(|(d, _)| *d)
        .ok_or_else(|| DomainError::NotFound(format!("No close for {ticker} after {}", baseline.0)))?;

    Ok(PriceMove::new(ticker, baseline.0, baseline.1, after.0, after.1))
}

#[async_trait]
impl PriceSource for YahooClient {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    async fn latest_price(&self, ticker: &str) -> Result<f64, DomainError> {
        let data = self
            .chart(ticker, &[("range", "1d".into()), ("interval", "1d".into())])
            .await?;
        data.meta
            .regular_market_price
            .ok_or_else(|| DomainError::NotFound(format!("No price for {}", data.meta.symbol)))
    }

    async fn price_move(
        &self,
        ticker: &str,
        at: DateTime<Utc>,
        window_days: u32,
    ) -> Result<PriceMove, DomainError> {
        let start = at - Duration::days(window_days as i64 + LOOKBACK_PAD_DAYS);
        let end = at + Duration::days(window_days as i64 + 1);
        let data = self
            .chart(
                ticker,
                &[
                    ("period1", start.timestamp().to_string()),
                    ("period2", end.timestamp().to_string()),
                    ("interval", "1d".into()),
                ],
            )
            .await?;
        move_from_closes(&ticker.to_uppercase(), &data.closes(), at, window_days)
    }
}

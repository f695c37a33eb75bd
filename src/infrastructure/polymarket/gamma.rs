//! Polymarket Gamma API client for event discovery.
//!
//! Gamma encodes `outcomes` and `outcomePrices` as JSON arrays inside
//! strings (`"[\"Yes\",\"No\"]"`) and most numbers as strings; the
//! deserializers below accept either form.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::Client;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::time::Duration;

use crate::domain::entities::prediction_event::{PredictionEvent, PredictionMarket};
use crate::domain::error::DomainError;
use crate::domain::ports::market_source::PredictionMarketSource;
use crate::infrastructure::retry::{status_error, with_retry, RetryConfig};

pub const GAMMA_API_URL: &str = "https://gamma-api.polymarket.com";

#[derive(Debug, Clone)]
pub struct GammaConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub retry: RetryConfig,
}

impl Default for GammaConfig {
    fn default() -> Self {
        Self {
            base_url: GAMMA_API_URL.to_string(),
            timeout: Duration::from_secs(15),
            retry: RetryConfig::default(),
        }
    }
}

pub struct GammaClient {
    config: GammaConfig,
    client: Client,
}

impl GammaClient {
    pub fn new() -> Self {
        Self::with_config(GammaConfig::default())
    }

    pub fn with_config(config: GammaConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_default();
        Self { config, client }
    }

    async fn get_events(&self, query: &[(&str, String)]) -> Result<Vec<PredictionEvent>, DomainError> {
        let url = format!("{}/events", self.config.base_url.trim_end_matches('/'));
        tracing::debug!(url = %url, ?query, "Fetching Gamma events");

        let client = &self.client;
        let url = &url;
        let body = with_retry(&self.config.retry, "gamma_events", || async move {
            let resp = client
                .get(url)
                .query(query)
                .send()
                .await
                .map_err(|e| DomainError::Network(format!("Gamma API request failed: {e}")))?;
            let status = resp.status();
            let body = resp
                .text()
                .await
                .map_err(|e| DomainError::Network(format!("Gamma API read failed: {e}")))?;
            if !status.is_success() {
                return Err(status_error("Gamma API", status, &body));
            }
            Ok(body)
        })
        .await?;

        parse_events(&body)
    }
}

impl Default for GammaClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PredictionMarketSource for GammaClient {
    fn name(&self) -> &str {
        "polymarket_gamma"
    }

    async fn fetch_closed_events(
        &self,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<PredictionEvent>, DomainError> {
        self.get_events(&[
            ("closed", "true".to_string()),
            ("limit", limit.to_string()),
            ("offset", offset.to_string()),
            ("order", "endDate".to_string()),
            ("ascending", "false".to_string()),
        ])
        .await
    }

    async fn fetch_active_events(&self, limit: usize) -> Result<Vec<PredictionEvent>, DomainError> {
        self.get_events(&[
            ("active", "true".to_string()),
            ("closed", "false".to_string()),
            ("limit", limit.to_string()),
            ("order", "volume".to_string()),
            ("ascending", "false".to_string()),
        ])
        .await
    }
}

/// Parse a Gamma `/events` response body.
pub fn parse_events(body: &str) -> Result<Vec<PredictionEvent>, DomainError> {
    let raw: Vec<GammaEvent> = serde_json::from_str(body)
        .map_err(|e| DomainError::Parse(format!("Gamma events: {e}")))?;
    Ok(raw.into_iter().map(GammaEvent::into_event).collect())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GammaEvent {
    #[serde(deserialize_with = "de_string")]
    id: String,
    #[serde(default)]
    slug: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    end_date: Option<String>,
    #[serde(default)]
    closed: bool,
    #[serde(default, deserialize_with = "de_string_f64_opt")]
    volume: Option<f64>,
    #[serde(default, deserialize_with = "de_string_f64_opt")]
    liquidity: Option<f64>,
    #[serde(default)]
    tags: Vec<GammaTag>,
    #[serde(default)]
    markets: Vec<GammaMarket>,
}

#[derive(Debug, Deserialize)]
struct GammaTag {
    #[serde(default)]
    label: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GammaMarket {
    #[serde(deserialize_with = "de_string")]
    id: String,
    #[serde(default)]
    question: String,
    #[serde(default, deserialize_with = "de_string_vec")]
    outcomes: Vec<String>,
    #[serde(default, deserialize_with = "de_string_vec")]
    outcome_prices: Vec<String>,
    #[serde(default)]
    closed: bool,
    #[serde(default, deserialize_with = "de_string_f64_opt")]
    volume: Option<f64>,
}

impl GammaEvent {
    fn into_event(self) -> PredictionEvent {
        PredictionEvent {
            id: self.id,
            slug: self.slug,
            title: self.title,
            description: self.description.unwrap_or_default(),
            end_date: self.end_date.as_deref().and_then(parse_gamma_date),
            closed: self.closed,
            volume: self.volume,
            liquidity: self.liquidity,
            tags: self.tags.into_iter().filter_map(|t| t.label).collect(),
            markets: self
                .markets
                .into_iter()
                .map(|m| PredictionMarket {
                    id: m.id,
                    question: m.question,
                    outcome_prices: m
                        .outcome_prices
                        .iter()
                        .map(|p| p.trim().parse::<f64>().unwrap_or(0.0))
                        .collect(),
                    outcomes: m.outcomes,
                    closed: m.closed,
                    volume: m.volume,
                })
                .collect(),
        }
    }
}

/// RFC 3339 timestamps or bare dates (taken as midnight UTC).
fn parse_gamma_date(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc())
        })
}

fn de_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("expected id, got {other}"))),
    }
}

fn de_string_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(deserializer)?;
    match v {
        Value::Array(arr) => Ok(arr
            .into_iter()
            .filter_map(|x| match x {
                Value::String(s) => Some(s),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect()),
        Value::String(s) if s.trim().is_empty() => Ok(Vec::new()),
        Value::String(s) => serde_json::from_str::<Vec<Value>>(&s)
            .map(|arr| {
                arr.into_iter()
                    .filter_map(|x| match x {
                        Value::String(s) => Some(s),
                        Value::Number(n) => Some(n.to_string()),
                        _ => None,
                    })
                    .collect()
            })
            .map_err(serde::de::Error::custom),
        _ => Ok(Vec::new()),
    }
}

fn de_string_f64_opt<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(deserializer)?;
    match v {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(n.as_f64()),
        Value::String(s) => {
            if s.is_empty() {
                Ok(None)
            } else {
                s.parse::<f64>().map(Some).map_err(serde::de::Error::custom)
            }
        }
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::values::outcome::Outcome;

    const CLOSED_EVENTS: &str = r#"[
      {
        "id": "903193",
        "slug": "fed-decision-in-december",
        "title": "Fed decision in December?",
        "description": "Resolves per the FOMC statement.",
        "endDate": "2024-12-18T12:00:00Z",
        "closed": true,
        "volume": 1250000.5,
        "liquidity": "0",
        "tags": [{"id": "2", "label": "Economy", "slug": "economy"}],
        "markets": [
          {
            "id": "1001",
            "question": "Fed decreases rates by 25 bps after December 2024 meeting?",
            "outcomes": "[\"Yes\", \"No\"]",
            "outcomePrices": "[\"1\", \"0\"]",
            "closed": true,
            "volume": "1100000"
          },
          {
            "id": "1002",
            "question": "No change in Fed interest rates after December 2024 meeting?",
            "outcomes": "[\"Yes\", \"No\"]",
            "outcomePrices": "[\"0\", \"1\"]",
            "closed": true,
            "volume": "150000.5"
          }
        ]
      },
      {
        "id": 42,
        "slug": "bare",
        "title": "Bare event",
        "endDate": "2024-01-31",
        "markets": []
      }
    ]"#;

    #[test]
    fn test_parse_closed_events() {
        let events = parse_events(CLOSED_EVENTS).unwrap();
        assert_eq!(events.len(), 2);

        let fed = &events[0];
        assert_eq!(fed.id, "903193");
        assert_eq!(fed.tags, vec!["Economy"]);
        assert_eq!(fed.liquidity, Some(0.0));
        assert_eq!(fed.markets[0].outcomes, vec!["Yes", "No"]);
        assert_eq!(fed.markets[0].outcome_prices, vec![1.0, 0.0]);
        assert_eq!(fed.primary_market().unwrap().id, "1001");
        assert_eq!(fed.resolution().0, Outcome::Yes);

        let bare = &events[1];
        assert_eq!(bare.id, "42");
        assert_eq!(bare.description, "");
        assert_eq!(
            bare.end_date.unwrap().to_rfc3339(),
            "2024-01-31T00:00:00+00:00"
        );
    }

    #[test]
    fn test_native_arrays_accepted() {
        let body = r#"[{"id": "1", "markets": [{"id": "m", "outcomes": ["Yes", "No"],
            "outcomePrices": [0.35, 0.65]}]}]"#;
        let events = parse_events(body).unwrap();
        assert_eq!(events[0].markets[0].outcome_prices, vec![0.35, 0.65]);
    }

    #[test]
    fn test_malformed_body() {
        assert!(matches!(parse_events("{}"), Err(DomainError::Parse(_))));
    }

    #[test]
    fn test_client_defaults() {
        let client = GammaClient::new();
        assert_eq!(client.config.base_url, GAMMA_API_URL);
        assert_eq!(client.name(), "polymarket_gamma");
    }
}

//! Resolution backfill: pages through closed prediction-market events,
//! keeps the ones that resolved and mention a listed company, attaches the
//! stock's price move around the resolution, and persists the result.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;

use crate::application::matching::{StockMatcher, TopicClassifier};
use crate::domain::entities::prediction_event::PredictionEvent;
use crate::domain::entities::resolution::ResolutionRecord;
use crate::domain::error::DomainError;
use crate::domain::ports::market_source::PredictionMarketSource;
use crate::domain::ports::price_source::PriceSource;
use crate::domain::ports::resolution_store::ResolutionStore;
use crate::domain::values::outcome::Outcome;

#[derive(Debug, Clone)]
pub struct BackfillOptions {
    /// Stop after scanning this many events. `None` scans until the source
    /// runs out.
    pub max_events: Option<usize>,
    pub page_size: usize,
    pub price_window_days: u32,
    pub max_tickers_per_event: usize,
    pub skip_prices: bool,
    /// Skip events already present in the store.
    pub incremental: bool,
    /// Pause between page requests.
    pub request_delay: Duration,
}

impl Default for BackfillOptions {
    fn default() -> Self {
        Self {
            max_events: None,
            page_size: 100,
            price_window_days: 3,
            max_tickers_per_event: 3,
            skip_prices: false,
            incremental: true,
            request_delay: Duration::from_millis(250),
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct BackfillReport {
    pub events_scanned: usize,
    pub already_known: usize,
    pub unresolved: usize,
    pub unmatched: usize,
    pub records_added: usize,
    pub price_lookups: usize,
    pub price_failures: usize,
    pub errors: Vec<String>,
    pub total_records: usize,
    pub output: String,
}

pub struct BackfillUseCase {
    markets: Arc<dyn PredictionMarketSource>,
    prices: Arc<dyn PriceSource>,
    store: Arc<dyn ResolutionStore>,
    matcher: StockMatcher,
    classifier: TopicClassifier,
}

impl BackfillUseCase {
    pub fn new(
        markets: Arc<dyn PredictionMarketSource>,
        prices: Arc<dyn PriceSource>,
        store: Arc<dyn ResolutionStore>,
    ) -> Self {
        Self {
            markets,
            prices,
            store,
            matcher: StockMatcher::new(),
            classifier: TopicClassifier::new(),
        }
    }

    pub async fn execute(&self, options: &BackfillOptions) -> Result<BackfillReport, DomainError> {
        if options.page_size == 0 {
            return Err(DomainError::InvalidInput("page_size must be positive".into()));
        }

        let existing = self.store.load()?;
        let known: HashSet<String> = if options.incremental {
            existing.iter().map(|r| r.event_id.clone()).collect()
        } else {
            HashSet::new()
        };

        tracing::info!(
            source = self.markets.name(),
            existing = existing.len(),
            incremental = options.incremental,
            "Starting resolution backfill"
        );

        let mut report = BackfillReport {
            output: self.store.location(),
            ..Default::default()
        };
        let mut added: Vec<ResolutionRecord> = Vec::new();
        let mut offset = 0usize;

        loop {
            let remaining = options
                .max_events
                .map(|max| max.saturating_sub(report.events_scanned))
                .unwrap_or(options.page_size);
            if remaining == 0 {
                break;
            }
            let limit = remaining.min(options.page_size);

            let page = match self.markets.fetch_closed_events(offset, limit).await {
                Ok(page) => page,
                Err(e) => {
                    tracing::warn!(offset, error = %e, "Failed to fetch closed events page");
                    report.errors.push(format!("Fetching events at offset {offset}: {e}"));
                    break;
                }
            };
            let page_len = page.len();
            tracing::debug!(offset, count = page_len, "Fetched closed events page");

            for event in page {
                report.events_scanned += 1;
                if known.contains(&event.id) {
                    report.already_known += 1;
                    continue;
                }
                if let Some(record) = self.process_event(&event, options, &mut report).await {
                    added.push(record);
                }
            }

            if page_len < limit {
                break;
            }
            offset += page_len;
            if !options.request_delay.is_zero() {
                tokio::time::sleep(options.request_delay).await;
            }
        }

        report.records_added = added.len();
        let merged = merge_records(existing, added);
        report.total_records = merged.len();
        self.store.save(&merged)?;

        tracing::info!(
            scanned = report.events_scanned,
            added = report.records_added,
            total = report.total_records,
            output = %report.output,
            "Backfill complete"
        );
        Ok(report)
    }

    async fn process_event(
        &self,
        event: &PredictionEvent,
        options: &BackfillOptions,
        report: &mut BackfillReport,
    ) -> Option<ResolutionRecord> {
        let (outcome, winning_label) = event.resolution();
        if outcome == Outcome::Unresolved && winning_label.is_none() {
            report.unresolved += 1;
            return None;
        }

        let matches = self.matcher.match_event(event);
        if matches.is_empty() {
            report.unmatched += 1;
            return None;
        }

        let classification = self.classifier.classify_event(event);

        let mut price_moves = Vec::new();
        if let (false, Some(at)) = (options.skip_prices, event.end_date) {
            for m in matches.iter().take(options.max_tickers_per_event) {
                report.price_lookups += 1;
                match self
                    .prices
                    .price_move(&m.ticker, at, options.price_window_days)
                    .await
                {
                    Ok(mv) => price_moves.push(mv),
                    Err(e) => {
                        report.price_failures += 1;
                        tracing::warn!(
                            ticker = %m.ticker,
                            event_id = %event.id,
                            error = %e,
                            "Price move lookup failed"
                        );
                    }
                }
            }
        }

        tracing::debug!(
            event_id = %event.id,
            outcome = %outcome,
            topic = %classification.primary,
            tickers = matches.len(),
            "Recorded resolution"
        );

        Some(ResolutionRecord {
            event_id: event.id.clone(),
            slug: event.slug.clone(),
            title: event.title.clone(),
            market_question: event.primary_market().map(|m| m.question.clone()),
            closed_at: event.end_date,
            outcome,
            winning_label,
            primary_topic: classification.primary,
            topics: classification.topics(),
            matches,
            price_moves,
            volume: event.volume,
            recorded_at: Utc::now(),
        })
    }
}

/// Existing records overlaid with new ones by `event_id`, newest close first.
pub fn merge_records(
    existing: Vec<ResolutionRecord>,
    added: Vec<ResolutionRecord>,
) -> Vec<ResolutionRecord> {
    let mut by_id: HashMap<String, ResolutionRecord> = HashMap::new();
    for r in existing.into_iter().chain(added) {
        by_id.insert(r.event_id.clone(), r);
    }
    let mut merged: Vec<ResolutionRecord> = by_id.into_values().collect();
    merged.sort_by(|a, b| {
        b.closed_at
            .cmp(&a.closed_at)
            .then_with(|| a.event_id.cmp(&b.event_id))
    });
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::values::topic::Topic;
    use chrono::{DateTime, TimeZone};

    fn record(id: &str, closed_at: Option<DateTime<Utc>>, title: &str) -> ResolutionRecord {
        ResolutionRecord {
            event_id: id.into(),
            slug: id.into(),
            title: title.into(),
            market_question: None,
            closed_at,
            outcome: Outcome::Yes,
            winning_label: Some("Yes".into()),
            primary_topic: Topic::Other,
            topics: vec![Topic::Other],
            matches: vec![],
            price_moves: vec![],
            volume: None,
            recorded_at: Utc::now(),
        }
    }

    #[test]
    fn test_merge_new_wins_and_sorts() {
        let t1 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let existing = vec![record("a", Some(t1), "old"), record("b", Some(t2), "b")];
        let added = vec![record("a", Some(t1), "new"), record("c", None, "c")];

        let merged = merge_records(existing, added);
        let ids: Vec<&str> = merged.iter().map(|r| r.event_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
        assert_eq!(merged[1].title, "new");
    }
}

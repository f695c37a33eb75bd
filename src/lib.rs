pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod telemetry;

use crate::application::backfill::{BackfillOptions, BackfillReport, BackfillUseCase};
use crate::application::correlation::CorrelationModel;
use crate::application::hedge::{HedgeOptions, HedgeReport, HedgeUseCase};
use crate::application::matching::{StockMatcher, TopicClassification, TopicClassifier};
use crate::application::quote::{Quote, QuoteUseCase};
use crate::application::stats::{ResolutionStats, StatsUseCase};
use crate::config::{Config, LlmProviderKind};
use crate::domain::entities::correlation::CorrelationInsight;
use crate::domain::entities::stock_match::StockMatch;
use crate::domain::error::DomainError;
use crate::domain::ports::llm::LlmProvider;
use crate::domain::ports::market_source::PredictionMarketSource;
use crate::domain::ports::price_source::PriceSource;
use crate::domain::ports::resolution_store::ResolutionStore;
use crate::domain::values::confidence::Confidence;
use crate::domain::values::portfolio::Portfolio;
use crate::domain::values::topic::Topic;
use crate::infrastructure::llm::{GroqProvider, NoopLlm};
use crate::infrastructure::polymarket::gamma::{GammaClient, GammaConfig};
use crate::infrastructure::retry::RetryConfig;
use crate::infrastructure::storage::JsonResolutionStore;
use crate::infrastructure::yahoo::YahooClient;
use std::sync::Arc;

pub struct PolyHedge {
    backfill_uc: BackfillUseCase,
    hedge_uc: HedgeUseCase,
    stats_uc: StatsUseCase,
    quote_uc: QuoteUseCase,
    store: Arc<dyn ResolutionStore>,
    classifier: TopicClassifier,
}

impl PolyHedge {
    pub fn new(config: &Config) -> Result<Self, DomainError> {
        let retry = RetryConfig::with_max_retries(config.max_retries);

        let markets: Arc<dyn PredictionMarketSource> = Arc::new(GammaClient::with_config(GammaConfig {
            base_url: config.gamma_url.clone(),
            timeout: config.http_timeout,
            retry: retry.clone(),
        }));
        let prices: Arc<dyn PriceSource> = Arc::new(YahooClient::with_config(
            &config.yahoo_url,
            config.http_timeout,
            retry.clone(),
        ));
        let llm: Arc<dyn LlmProvider> = match (config.llm_provider, &config.groq_api_key) {
            (LlmProviderKind::Groq, Some(key)) => Arc::new(GroqProvider::with_config(
                key.clone(),
                config.llm_model.clone(),
                &config.groq_url,
                config.http_timeout,
                retry,
            )),
            _ => Arc::new(NoopLlm),
        };
        let store: Arc<dyn ResolutionStore> =
            Arc::new(JsonResolutionStore::new(&config.resolutions_path));

        tracing::debug!(
            llm = llm.name(),
            store = %store.location(),
            "Providers configured"
        );

        Ok(Self::with_providers(markets, prices, llm, store))
    }

    pub fn with_providers(
        markets: Arc<dyn PredictionMarketSource>,
        prices: Arc<dyn PriceSource>,
        llm: Arc<dyn LlmProvider>,
        store: Arc<dyn ResolutionStore>,
    ) -> Self {
        Self {
            backfill_uc: BackfillUseCase::new(markets.clone(), prices.clone(), store.clone()),
            hedge_uc: HedgeUseCase::new(markets, prices.clone(), llm, store.clone()),
            stats_uc: StatsUseCase::new(store.clone()),
            quote_uc: QuoteUseCase::new(prices),
            store,
            classifier: TopicClassifier::new(),
        }
    }

    pub async fn backfill(&self, options: &BackfillOptions) -> Result<BackfillReport, DomainError> {
        self.backfill_uc.execute(options).await
    }

    pub fn classify(&self, text: &str) -> TopicClassification {
        self.classifier.classify(text, "")
    }

    pub fn match_text(&self, text: &str, min_confidence: f64) -> Result<Vec<StockMatch>, DomainError> {
        let min = Confidence::new(min_confidence).map_err(DomainError::InvalidInput)?;
        Ok(StockMatcher::with_min_confidence(min.value()).match_text(text, ""))
    }

    /// Insight for `topic`, or for every topic the ticker's sector is
    /// sensitive to when `topic` is `None`.
    pub fn correlate(&self, ticker: &str, topic: Option<Topic>) -> Result<Vec<CorrelationInsight>, DomainError> {
        if ticker.trim().is_empty() {
            return Err(DomainError::InvalidInput("Ticker is required".into()));
        }
        let model = CorrelationModel::new(self.store.load()?);
        Ok(match topic {
            Some(t) => vec![model.insight(ticker, t)],
            None => model.sector_insights(ticker),
        })
    }

    pub async fn hedge(&self, portfolio: Portfolio, options: &HedgeOptions) -> Result<HedgeReport, DomainError> {
        self.hedge_uc.recommend(portfolio, options).await
    }

    pub async fn quote(&self, tickers: &[String]) -> Result<Vec<Quote>, DomainError> {
        self.quote_uc.execute(tickers).await
    }

    pub fn stats(&self) -> Result<ResolutionStats, DomainError> {
        self.stats_uc.execute()
    }
}

use crate::domain::entities::prediction_event::PredictionEvent;
use crate::domain::error::DomainError;
use async_trait::async_trait;

/// Source of prediction-market events (e.g. Polymarket Gamma).
#[async_trait]
pub trait PredictionMarketSource: Send + Sync {
    fn name(&self) -> &str;

    /// One page of closed events, most recently ended first.
    async fn fetch_closed_events(
        &self,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<PredictionEvent>, DomainError>;

    /// Open events, highest volume first.
    async fn fetch_active_events(&self, limit: usize) -> Result<Vec<PredictionEvent>, DomainError>;
}

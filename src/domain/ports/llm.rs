use crate::domain::error::DomainError;
use async_trait::async_trait;

/// Chat-completion style language model.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    fn name(&self) -> &str;

    /// False for providers that cannot answer; callers skip straight to
    /// their heuristic path.
    fn is_enabled(&self) -> bool {
        true
    }

    async fn complete(&self, system: &str, user: &str) -> Result<String, DomainError>;
}

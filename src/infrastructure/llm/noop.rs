use crate::domain::error::DomainError;
use crate::domain::ports::llm::LlmProvider;

/// Stand-in when no LLM is configured; callers take their heuristic path.
pub struct NoopLlm;

#[async_trait::async_trait]
impl LlmProvider for NoopLlm {
    fn name(&self) -> &str {
        "noop"
    }

    fn is_enabled(&self) -> bool {
        false
    }

    async fn complete(&self, _system: &str, _user: &str) -> Result<String, DomainError> {
        Err(DomainError::Llm("No LLM provider configured".into()))
    }
}

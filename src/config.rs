//! Runtime configuration loaded from environment variables (and `.env`).

use std::env;
use std::time::Duration;

use crate::domain::error::DomainError;
use crate::infrastructure::llm::groq::GROQ_API_URL;
use crate::infrastructure::polymarket::gamma::GAMMA_API_URL;
use crate::infrastructure::storage::json_store::DEFAULT_RESOLUTIONS_PATH;
use crate::infrastructure::yahoo::YAHOO_CHART_URL;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProviderKind {
    Groq,
    Noop,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Where backfilled resolutions are cached.
    pub resolutions_path: String,

    pub llm_provider: LlmProviderKind,
    pub groq_api_key: Option<String>,
    pub groq_url: String,
    /// Model override; provider default when unset.
    pub llm_model: Option<String>,

    pub gamma_url: String,
    pub yahoo_url: String,

    /// Pause between paged Gamma requests during backfill.
    pub request_delay: Duration,
    pub max_retries: u32,
    pub http_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            resolutions_path: DEFAULT_RESOLUTIONS_PATH.to_string(),
            llm_provider: LlmProviderKind::Noop,
            groq_api_key: None,
            groq_url: GROQ_API_URL.to_string(),
            llm_model: None,
            gamma_url: GAMMA_API_URL.to_string(),
            yahoo_url: YAHOO_CHART_URL.to_string(),
            request_delay: Duration::from_millis(250),
            max_retries: 3,
            http_timeout: Duration::from_secs(15),
        }
    }
}

impl Config {
    /// Load configuration from the process environment, reading `.env` first
    /// if present.
    pub fn from_env() -> Result<Self, DomainError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let groq_api_key = var("GROQ_API_KEY");

        let llm_provider = match var("POLYHEDGE_LLM_PROVIDER").map(|v| v.to_lowercase()) {
            Some(p) if p == "groq" => LlmProviderKind::Groq,
            Some(p) if p == "noop" || p == "none" => LlmProviderKind::Noop,
            Some(other) => {
                return Err(DomainError::Config(format!(
                    "Unknown POLYHEDGE_LLM_PROVIDER '{other}' (expected groq or noop)"
                )))
            }
            None if groq_api_key.is_some() => LlmProviderKind::Groq,
            None => LlmProviderKind::Noop,
        };
        if llm_provider == LlmProviderKind::Groq && groq_api_key.is_none() {
            return Err(DomainError::Config(
                "POLYHEDGE_LLM_PROVIDER=groq requires GROQ_API_KEY".into(),
            ));
        }

        let parse_u64 = |key: &str, default: u64| -> Result<u64, DomainError> {
            match var(key) {
                Some(v) => v
                    .parse()
                    .map_err(|_| DomainError::Config(format!("{key} must be a non-negative integer, got '{v}'"))),
                None => Ok(default),
            }
        };
        let parse_u32 = |key: &str, default: u32| -> Result<u32, DomainError> {
            let value = parse_u64(key, u64::from(default))?;
            u32::try_from(value)
                .map_err(|_| DomainError::Config(format!("{key} is too large, got {value}")))
        };

        Ok(Self {
            resolutions_path: var("POLYHEDGE_RESOLUTIONS_PATH").unwrap_or(defaults.resolutions_path),
            llm_provider,
            groq_api_key,
            groq_url: var("POLYHEDGE_GROQ_URL").unwrap_or(defaults.groq_url),
            llm_model: var("POLYHEDGE_LLM_MODEL"),
            gamma_url: var("POLYHEDGE_GAMMA_URL").unwrap_or(defaults.gamma_url),
            yahoo_url: var("POLYHEDGE_YAHOO_URL").unwrap_or(defaults.yahoo_url),
            request_delay: Duration::from_millis(parse_u64("POLYHEDGE_REQUEST_DELAY_MS", 250)?),
            max_retries: parse_u32("POLYHEDGE_MAX_RETRIES", 3)?,
            http_timeout: Duration::from_secs(parse_u64("POLYHEDGE_HTTP_TIMEOUT_SECS", 15)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, DomainError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn test_defaults() {
        let c = config(&[]).unwrap();
        assert_eq!(c.resolutions_path, "data/resolutions.json");
        assert_eq!(c.llm_provider, LlmProviderKind::Noop);
        assert_eq!(c.request_delay, Duration::from_millis(250));
        assert_eq!(c.max_retries, 3);
    }

    #[test]
    fn test_key_enables_groq() {
        let c = config(&[("GROQ_API_KEY", "gsk_test")]).unwrap();
        assert_eq!(c.llm_provider, LlmProviderKind::Groq);

        let forced = config(&[("GROQ_API_KEY", "gsk_test"), ("POLYHEDGE_LLM_PROVIDER", "noop")]).unwrap();
        assert_eq!(forced.llm_provider, LlmProviderKind::Noop);
    }

    #[test]
    fn test_invalid_values() {
        assert!(config(&[("POLYHEDGE_LLM_PROVIDER", "openai")]).is_err());
        assert!(config(&[("POLYHEDGE_LLM_PROVIDER", "groq")]).is_err());
        assert!(config(&[("POLYHEDGE_MAX_RETRIES", "-1")]).is_err());
    }

    #[test]
    fn test_retries_must_fit_u32() {
        let err = config(&[("POLYHEDGE_MAX_RETRIES", "5000000000")]).unwrap_err();
        assert!(matches!(err, DomainError::Config(_)));
        let cfg = config(&[("POLYHEDGE_MAX_RETRIES", "4294967295")]).unwrap();
        assert_eq!(cfg.max_retries, u32::MAX);
    }

    #[test]
    fn test_overrides() {
        let c = config(&[
            ("POLYHEDGE_RESOLUTIONS_PATH", "/tmp/r.json"),
            ("POLYHEDGE_REQUEST_DELAY_MS", "0"),
            ("POLYHEDGE_LLM_MODEL", "llama-3.1-8b-instant"),
        ])
        .unwrap();
        assert_eq!(c.resolutions_path, "/tmp/r.json");
        assert!(c.request_delay.is_zero());
        assert_eq!(c.llm_model.as_deref(), Some("llama-3.1-8b-instant"));
    }
}

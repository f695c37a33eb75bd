use crate::domain::error::DomainError;
use crate::domain::ports::llm::LlmProvider;
use crate::infrastructure::retry::{status_error, with_retry, RetryConfig};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const GROQ_API_URL: &str = "https://api.groq.com";
pub const DEFAULT_GROQ_MODEL: &str = "llama-3.3-70b-versatile";

const TEMPERATURE: f64 = 0.2;
const MAX_TOKENS: u32 = 2048;

/// Groq chat completions (OpenAI-compatible endpoint).
pub struct GroqProvider {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    retry: RetryConfig,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatMessageOut>,
}

#[derive(Debug, Deserialize)]
struct ChatMessageOut {
    #[serde(default)]
    content: Option<String>,
}

impl GroqProvider {
    pub fn new(api_key: String, model: Option<String>) -> Self {
        Self::with_config(api_key, model, GROQ_API_URL, Duration::from_secs(60), RetryConfig::default())
    }

    pub fn with_config(
        api_key: String,
        model: Option<String>,
        base_url: &str,
        timeout: Duration,
        retry: RetryConfig,
    ) -> Self {
        Self {
            client: Client::builder().timeout(timeout).build().unwrap_or_default(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_GROQ_MODEL.to_string()),
            retry,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

fn parse_completion(body: &str) -> Result<String, DomainError> {
    let parsed: ChatCompletionResponse =
        serde_json::from_str(body).map_err(|e| DomainError::Llm(format!("Groq response parse: {e}")))?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| DomainError::Llm("Groq returned an empty completion".into()))
}

#[async_trait::async_trait]
impl LlmProvider for GroqProvider {
    fn name(&self) -> &str {
        "groq"
    }

    fn is_enabled(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    async fn complete(&self, system: &str, user: &str) -> Result<String, DomainError> {
        if !self.is_enabled() {
            return Err(DomainError::Config("GROQ_API_KEY is not set".into()));
        }

        let url = format!("{}/openai/v1/chat/completions", self.base_url);
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: system },
                ChatMessage { role: "user", content: user },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let client = &self.client;
        let api_key = self.api_key.as_str();
        let url = &url;
        let request = &request;
        let body = with_retry(&self.retry, "groq_chat", || async move {
            let resp = client
                .post(url)
                .bearer_auth(api_key)
                .json(request)
                .send()
                .await
                .map_err(|e| DomainError::Network(format!("Groq request failed: {e}")))?;
            let status = resp.status();
            let body = resp
                .text()
                .await
                .map_err(|e| DomainError::Network(format!("Groq read failed: {e}")))?;
            if !status.is_success() {
                return Err(status_error("Groq", status, &body));
            }
            Ok(body)
        })
        .await?;

        let content = parse_completion(&body)?;
        tracing::debug!(model = %self.model, chars = content.len(), "Groq completion");
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn request_complete(buf: &[u8]) -> bool {
        let text = String::from_utf8_lossy(buf);
        let Some(split) = text.find("\r\n\r\n") else {
            return false;
        };
        let length = text[..split]
            .lines()
            .find_map(|l| {
                l.to_ascii_lowercase()
                    .strip_prefix("content-length:")
                    .map(|v| v.trim().parse::<usize>().unwrap_or(0))
            })
            .unwrap_or(0);
        buf.len() >= split + 4 + length
    }

    /// One-shot server that promises a 200-byte body and hangs up early.
    async fn serve_truncated_body() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
                if request_complete(&buf) {
                    break;
                }
            }
            socket
                .write_all(b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 200\r\n\r\n{\"choices\":")
                .await
                .unwrap();
            socket.flush().await.unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn test_defaults() {
        let p = GroqProvider::new("key".into(), None);
        assert_eq!(p.model(), DEFAULT_GROQ_MODEL);
        assert!(p.is_enabled());
        assert!(!GroqProvider::new("  ".into(), None).is_enabled());
    }

    #[test]
    fn test_parse_completion() {
        let body = r#"{"id": "x", "choices": [{"index": 0, "message": {"role": "assistant", "content": "[\"1\"]"}}]}"#;
        assert_eq!(parse_completion(body).unwrap(), "[\"1\"]");

        let empty = r#"{"choices": []}"#;
        assert!(matches!(parse_completion(empty), Err(DomainError::Llm(_))));
    }

    #[tokio::test]
    async fn test_truncated_body_is_network_error() {
        let url = serve_truncated_body().await;
        let p = GroqProvider::with_config(
            "key".into(),
            None,
            &url,
            Duration::from_secs(5),
            RetryConfig::with_max_retries(0),
        );
        match p.complete("s", "u").await {
            Err(DomainError::Network(msg)) => assert!(msg.contains("Groq read failed"), "{msg}"),
            other => panic!("expected a network error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_key_is_config_error() {
        let p = GroqProvider::new(String::new(), None);
        assert!(matches!(p.complete("s", "u").await, Err(DomainError::Config(_))));
    }
}

use crate::api::LanguageModel;
use crate::error::ProviderError;
use crate::{logi, logw};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o";

const RAW_BODY_LOG_CHARS: usize = 800;

fn snippet(raw: &str) -> String {
    raw.chars().take(RAW_BODY_LOG_CHARS).collect()
}

/// Pulls `error.message` out of an OpenAI error body, if there is one.
fn openai_error_message(raw: &str) -> Option<String> {
    let root: Value = serde_json::from_str(raw).ok()?;
    let err = root.get("error")?;
    if let Some(typ) = err.get("type").and_then(|v| v.as_str()) {
        logw(format!("OpenAI error type: {}", typ));
    }
    if let Some(code) = err.get("code").and_then(|v| v.as_str()) {
        logw(format!("OpenAI error code: {}", code));
    }
    err.get("message")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

fn openai_extract_message_content(root: &Value) -> Option<String> {
    root.get("choices")?
        .as_array()?
        .first()?
        .get("message")?
        .get("content")?
        .as_str()
        .map(|s| s.to_string())
}

#[derive(Clone)]
pub struct OpenAiClient {
    http: Client,
    api_key: String,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl OpenAiClient {
    pub fn new(http: Client, api_key: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(120),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn chat_json(&self, system: &str, user: &str, temperature: f32) -> Result<String> {
        let body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user},
            ],
            "response_format": {"type": "json_object"},
            "temperature": temperature,
        });

        logi(format!("Sending request to OpenAI (model={})", self.model));
        let resp = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .context("OpenAI request failed")?;

        let status = resp.status();
        let raw = resp.text().await.context("OpenAI response read failed")?;

        if !status.is_success() {
            logw(format!("OpenAI HTTP {}", status.as_u16()));
            if !raw.is_empty() {
                logw(format!("OpenAI raw body: {}", snippet(&raw)));
            }
            let detail = openai_error_message(&raw).unwrap_or_else(|| snippet(&raw));
            anyhow::bail!("OpenAI HTTP {}: {}", status.as_u16(), detail);
        }

        let root: Value =
            serde_json::from_str(&raw).context("OpenAI returned a non-JSON envelope")?;
        match openai_extract_message_content(&root) {
            Some(content) => Ok(content),
            None => {
                logw(format!("OpenAI raw body: {}", snippet(&raw)));
                anyhow::bail!("OpenAI response missing message content")
            }
        }
    }
}

#[async_trait]
impl LanguageModel for OpenAiClient {
    async fn complete_json(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
    ) -> Result<String, ProviderError> {
        self.chat_json(system, user, temperature)
            .await
            .map_err(|e| ProviderError::from_anyhow("OpenAI", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_first_choice_content() {
        let root = json!({
            "choices": [
                {"message": {"role": "assistant", "content": "{\"a\":1}"}},
                {"message": {"role": "assistant", "content": "ignored"}}
            ]
        });
        assert_eq!(
            openai_extract_message_content(&root).as_deref(),
            Some("{\"a\":1}")
        );
        assert!(openai_extract_message_content(&json!({"choices": []})).is_none());
    }

    #[test]
    fn reads_error_message() {
        let raw = r#"{"error":{"message":"Incorrect API key","type":"invalid_request_error","code":"invalid_api_key"}}"#;
        assert_eq!(openai_error_message(raw).as_deref(), Some("Incorrect API key"));
        assert!(openai_error_message("<html>bad gateway</html>").is_none());
    }
}

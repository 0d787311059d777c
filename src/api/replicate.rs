use crate::api::MediaGenerator;
use crate::error::ProviderError;
use crate::{logi, logok, logw};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::{Duration, Instant};

pub const DEFAULT_BASE_URL: &str = "https://api.replicate.com/v1";

const ASPECT_RATIO: &str = "9:16";
const VIDEO_FPS: u32 = 6;
const ERROR_BODY_LOG_CHARS: usize = 512;

#[derive(Debug, Clone)]
pub struct ReplicateModels {
    pub image: String,
    pub upscale: String,
    pub video: String,
}

impl Default for ReplicateModels {
    fn default() -> Self {
        Self {
            image: "minimax/image-01".to_string(),
            upscale: "recraft-ai/recraft-crisp-upscale".to_string(),
            video: "kwaivgi/kling-v1.6-standard".to_string(),
        }
    }
}

fn truncate_text(value: &str, limit: usize) -> String {
    if value.chars().count() <= limit {
        return value.to_string();
    }
    let truncated: String = value.chars().take(limit).collect();
    format!("{truncated}... (truncated)")
}

fn prediction_status(prediction: &Value) -> String {
    prediction
        .get("status")
        .and_then(Value::as_str)
        .map(|s| s.to_ascii_lowercase())
        .unwrap_or_default()
}

fn prediction_error(prediction: &Value) -> &Value {
    prediction
        .get("error")
        .filter(|e| !e.is_null())
        .unwrap_or(prediction)
}

/// Collects every http(s) URL found in a prediction output, in order and
/// without duplicates.
pub fn extract_output_urls(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(url) => {
            let trimmed = url.trim();
            if trimmed.starts_with("http") && !out.iter().any(|existing| existing == trimmed) {
                out.push(trimmed.to_string());
            }
        }
        Value::Array(rows) => {
            for row in rows {
                extract_output_urls(row, out);
            }
        }
        Value::Object(obj) => {
            if let Some(url) = obj.get("url") {
                extract_output_urls(url, out);
            }
            if let Some(output) = obj.get("output") {
                extract_output_urls(output, out);
            }
        }
        _ => {}
    }
}

fn first_output_url(prediction: &Value) -> Option<String> {
    let mut urls = Vec::new();
    if let Some(output) = prediction.get("output") {
        extract_output_urls(output, &mut urls);
    }
    urls.into_iter().next()
}

async fn response_json_or_error(resp: reqwest::Response) -> Result<Value> {
    let status = resp.status();
    let body = resp.text().await.context("Replicate response read failed")?;
    if !status.is_success() {
        anyhow::bail!(
            "Replicate request failed ({}): {}",
            status.as_u16(),
            truncate_text(&body, ERROR_BODY_LOG_CHARS)
        );
    }
    serde_json::from_str(&body).context("Replicate returned invalid JSON payload")
}

#[derive(Clone)]
pub struct ReplicateClient {
    http: Client,
    api_key: String,
    base_url: String,
    models: ReplicateModels,
    poll_interval: Duration,
    poll_timeout: Duration,
}

impl ReplicateClient {
    pub fn new(http: Client, api_key: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            models: ReplicateModels::default(),
            poll_interval: Duration::from_secs(1),
            poll_timeout: Duration::from_secs(600),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_models(mut self, models: ReplicateModels) -> Self {
        self.models = models;
        self
    }

    pub fn with_polling(mut self, interval: Duration, timeout: Duration) -> Self {
        self.poll_interval = interval;
        self.poll_timeout = timeout;
        self
    }

    /// Runs `model` to completion and returns the finished prediction.
    pub async fn run(&self, model: &str, input: Value) -> Result<Value> {
        let endpoint = format!("{}/models/{}/predictions", self.base_url, model);
        let resp = self
            .http
            .post(&endpoint)
            .bearer_auth(&self.api_key)
            .header("Prefer", "wait")
            .json(&json!({ "input": input }))
            .send()
            .await
            .with_context(|| format!("Replicate request failed ({model})"))?;
        let prediction = response_json_or_error(resp).await?;

        match prediction_status(&prediction).as_str() {
            "succeeded" => Ok(prediction),
            "starting" | "processing" => {
                let poll_url = prediction
                    .pointer("/urls/get")
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|url| !url.is_empty())
                    .ok_or_else(|| anyhow::anyhow!("Replicate prediction missing poll URL"))?
                    .to_string();
                self.poll_prediction(model, &poll_url).await
            }
            _ => anyhow::bail!(
                "Replicate prediction failed ({model}): {}",
                prediction_error(&prediction)
            ),
        }
    }

    async fn poll_prediction(&self, model: &str, poll_url: &str) -> Result<Value> {
        let started = Instant::now();
        loop {
            tokio::time::sleep(self.poll_interval).await;
            let resp = self
                .http
                .get(poll_url)
                .bearer_auth(&self.api_key)
                .send()
                .await
                .with_context(|| format!("Replicate poll request failed ({poll_url})"))?;
            let prediction = response_json_or_error(resp).await?;
            match prediction_status(&prediction).as_str() {
                "succeeded" => return Ok(prediction),
                "failed" | "canceled" => anyhow::bail!(
                    "Replicate prediction failed ({model}): {}",
                    prediction_error(&prediction)
                ),
                _ => {}
            }
            if started.elapsed() >= self.poll_timeout {
                anyhow::bail!(
                    "Replicate polling timed out after {:.1}s ({model})",
                    self.poll_timeout.as_secs_f64()
                );
            }
        }
    }
}

#[async_trait]
impl MediaGenerator for ReplicateClient {
    async fn generate_image(&self, prompt: &str) -> Result<Option<String>, ProviderError> {
        logi(format!("Generating image for prompt: {}", prompt));
        let input = json!({
            "prompt": prompt,
            "aspect_ratio": ASPECT_RATIO,
            "number_of_images": 1,
            "prompt_optimizer": true,
        });
        let prediction = self
            .run(&self.models.image, input)
            .await
            .map_err(|e| ProviderError::from_anyhow("Replicate", e))?;
        let url = first_output_url(&prediction);
        if url.is_none() {
            logw("No image generated in output");
        }
        Ok(url)
    }

    async fn upscale_image(&self, image_url: &str) -> Result<Option<String>, ProviderError> {
        logi(format!("Starting image upscale for: {}", image_url));
        let prediction = self
            .run(&self.models.upscale, json!({ "image": image_url }))
            .await
            .map_err(|e| ProviderError::from_anyhow("Replicate", e))?;
        let url = first_output_url(&prediction);
        if let Some(url) = &url {
            logok(format!("Upscale complete: {}", url));
        }
        Ok(url)
    }

    async fn image_to_video(
        &self,
        image_url: &str,
        motion_prompt: &str,
    ) -> Result<Option<String>, ProviderError> {
        logi(format!("Converting image to video: {}", image_url));
        let input = json!({
            "prompt": motion_prompt,
            "start_image": image_url,
            "aspect_ratio": ASPECT_RATIO,
            "fps": VIDEO_FPS,
        });
        let prediction = self
            .run(&self.models.video, input)
            .await
            .map_err(|e| ProviderError::from_anyhow("Replicate", e))?;
        let url = first_output_url(&prediction);
        if let Some(url) = &url {
            logok(format!("Video generation complete: {}", url));
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_urls_from_nested_output() {
        let output = json!([
            "https://cdn.test/a.png",
            {"url": "https://cdn.test/b.png"},
            "https://cdn.test/a.png",
            "not-a-url",
            null
        ]);
        let mut urls = Vec::new();
        extract_output_urls(&output, &mut urls);
        assert_eq!(urls, vec!["https://cdn.test/a.png", "https://cdn.test/b.png"]);
    }

    #[test]
    fn first_output_url_handles_plain_string_and_missing_output() {
        let prediction = json!({"status": "succeeded", "output": "https://cdn.test/v.mp4"});
        assert_eq!(
            first_output_url(&prediction).as_deref(),
            Some("https://cdn.test/v.mp4")
        );
        assert!(first_output_url(&json!({"status": "succeeded", "output": []})).is_none());
        assert!(first_output_url(&json!({"status": "succeeded"})).is_none());
    }

    #[test]
    fn truncates_long_error_bodies() {
        let long = "x".repeat(20);
        assert_eq!(truncate_text(&long, 5), "xxxxx... (truncated)");
        assert_eq!(truncate_text("short", 5), "short");
    }
}

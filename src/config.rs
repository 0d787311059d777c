use crate::api::{openai, replicate, ReplicateModels};
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_STATIC_DIR: &str = "public";

#[derive(Debug, Clone)]
pub struct Config {
    pub openai_key: String,
    pub openai_base_url: String,
    pub openai_model: String,
    pub replicate_key: String,
    pub replicate_base_url: String,
    pub models: ReplicateModels,
    pub port: u16,
    pub static_dir: PathBuf,
    pub templates_path: Option<PathBuf>,
    pub llm_timeout: Duration,
    pub media_poll_interval: Duration,
    pub media_poll_timeout: Duration,
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{}: invalid value {:?} ({})", key, raw, e)),
        None => Ok(default),
    }
}

impl Config {
    /// Reads `.env` (when present) and then the process environment.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let openai_key = non_empty("OPENAI_API_KEY")
            .context("environment: OPENAI_API_KEY missing")?;
        let replicate_key = non_empty("REPLICATE_API_KEY")
            .or_else(|| non_empty("REPLICATE_API_TOKEN"))
            .context("environment: REPLICATE_API_KEY missing")?;

        let defaults = ReplicateModels::default();
        let models = ReplicateModels {
            image: non_empty("REPLICATE_IMAGE_MODEL").unwrap_or(defaults.image),
            upscale: non_empty("REPLICATE_UPSCALE_MODEL").unwrap_or(defaults.upscale),
            video: non_empty("REPLICATE_VIDEO_MODEL").unwrap_or(defaults.video),
        };

        Ok(Self {
            openai_key,
            openai_base_url: non_empty("OPENAI_BASE_URL")
                .unwrap_or_else(|| openai::DEFAULT_BASE_URL.to_string()),
            openai_model: non_empty("OPENAI_MODEL")
                .unwrap_or_else(|| openai::DEFAULT_MODEL.to_string()),
            replicate_key,
            replicate_base_url: non_empty("REPLICATE_BASE_URL")
                .unwrap_or_else(|| replicate::DEFAULT_BASE_URL.to_string()),
            models,
            port: parse_var(&non_empty, "PORT", DEFAULT_PORT)?,
            static_dir: non_empty("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR)),
            templates_path: non_empty("PROMPT_TEMPLATES").map(PathBuf::from),
            llm_timeout: Duration::from_secs(parse_var(&non_empty, "LLM_TIMEOUT_SECS", 120)?),
            media_poll_interval: Duration::from_millis(parse_var(
                &non_empty,
                "MEDIA_POLL_INTERVAL_MS",
                1000,
            )?),
            media_poll_timeout: Duration::from_secs(parse_var(
                &non_empty,
                "MEDIA_POLL_TIMEOUT_SECS",
                600,
            )?),
        })
    }
}

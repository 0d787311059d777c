use crate::api::{LanguageModel, MediaGenerator, OpenAiClient, ReplicateClient};
use crate::config::Config;
use crate::error::{GenerationError, Result};
use crate::expander::expand_prompt;
use crate::media::render_media;
use crate::models::{GenerateRequest, ResponseBundle, VariationResult};
use crate::prompts::PromptTemplates;
use crate::schema::ExpandedPrompt;
use crate::variations::generate_variations;
use crate::{logi, logok};
use anyhow::Context;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Received,
    Expanding,
    GeneratingVariations,
    GeneratingMedia,
    Responding,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Received => "received",
            Stage::Expanding => "expanding",
            Stage::GeneratingVariations => "generating_variations",
            Stage::GeneratingMedia => "generating_media",
            Stage::Responding => "responding",
        };
        f.write_str(name)
    }
}

fn enter(stage: Stage) {
    logi(format!("stage -> {}", stage));
}

/// Runs the whole pipeline for one request. Holds no per-request state, so a
/// single instance is shared by every concurrent request.
pub struct VariationStudio {
    llm: Arc<dyn LanguageModel>,
    media: Arc<dyn MediaGenerator>,
    templates: PromptTemplates,
}

impl VariationStudio {
    pub fn new(
        llm: Arc<dyn LanguageModel>,
        media: Arc<dyn MediaGenerator>,
        templates: PromptTemplates,
    ) -> Self {
        Self {
            llm,
            media,
            templates,
        }
    }

    /// Builds the production OpenAI and Replicate clients over one shared
    /// HTTP connection pool.
    pub async fn from_config(cfg: &Config) -> anyhow::Result<Self> {
        let templates = match &cfg.templates_path {
            Some(path) => PromptTemplates::load(path).await?,
            None => PromptTemplates::default(),
        };
        let http = reqwest::Client::builder()
            .build()
            .context("Failed to build HTTP client")?;

        let llm = OpenAiClient::new(http.clone(), &cfg.openai_key)
            .with_base_url(&cfg.openai_base_url)
            .with_model(&cfg.openai_model)
            .with_timeout(cfg.llm_timeout);
        let media = ReplicateClient::new(http, &cfg.replicate_key)
            .with_base_url(&cfg.replicate_base_url)
            .with_models(cfg.models.clone())
            .with_polling(cfg.media_poll_interval, cfg.media_poll_timeout);

        Ok(Self::new(Arc::new(llm), Arc::new(media), templates))
    }

    pub async fn run(&self, request: &GenerateRequest) -> Result<ResponseBundle> {
        enter(Stage::Received);
        if request.prompt.trim().is_empty() {
            return Err(GenerationError::InvalidArgument(
                "Prompt must not be empty".to_string(),
            ));
        }

        let expanded = match &request.variators {
            Some(variators) => {
                logi("Caller supplied variators; skipping prompt expansion");
                ExpandedPrompt {
                    base_prompt: request.prompt.clone(),
                    aspects: variators.clone(),
                }
            }
            None => {
                enter(Stage::Expanding);
                expand_prompt(self.llm.as_ref(), &self.templates, &request.prompt).await?
            }
        };

        enter(Stage::GeneratingVariations);
        let variations = generate_variations(
            self.llm.as_ref(),
            &self.templates,
            &expanded.base_prompt,
            &expanded.aspects,
        )
        .await?;

        enter(Stage::GeneratingMedia);
        let media = render_media(
            self.media.as_ref(),
            &variations,
            request.generate_videos,
            &self.templates.video_motion,
        )
        .await?;

        enter(Stage::Responding);
        let results: Vec<VariationResult> = variations
            .into_iter()
            .zip(media)
            .map(|(variation, media)| VariationResult {
                text: variation.text,
                reasoning: variation.reasoning,
                images: media.images,
                video: media.video,
            })
            .collect();
        logok(format!("Prepared {} results", results.len()));

        Ok(ResponseBundle {
            results,
            base_prompt: expanded.base_prompt,
            aspects: expanded.aspects,
        })
    }
}

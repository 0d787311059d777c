#![allow(dead_code)]

use async_trait::async_trait;
use prompt_variations::api::{LanguageModel, MediaGenerator};
use prompt_variations::prompts::PromptTemplates;
use prompt_variations::{ProviderError, VariationStudio};
use serde_json::json;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const ASPECTS: [&str; 5] = ["neon city", "golden hour", "victorian era", "armor", "watercolor"];

#[derive(Debug, Clone)]
pub struct LlmCall {
    pub system: String,
    pub user: String,
    pub temperature: f32,
}

/// Answers each completion with the next scripted reply.
pub struct ScriptedLlm {
    replies: Mutex<VecDeque<Result<String, ProviderError>>>,
    calls: Mutex<Vec<LlmCall>>,
}

impl ScriptedLlm {
    pub fn new(replies: Vec<Result<String, ProviderError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn replying(replies: Vec<String>) -> Arc<Self> {
        Self::new(replies.into_iter().map(Ok).collect())
    }

    pub fn calls(&self) -> Vec<LlmCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for ScriptedLlm {
    async fn complete_json(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
    ) -> Result<String, ProviderError> {
        self.calls.lock().unwrap().push(LlmCall {
            system: system.to_string(),
            user: user.to_string(),
            temperature,
        });
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::new("fake", "no scripted reply left")))
    }
}

/// Media service whose behavior is steered by markers inside the prompt:
/// `no-image`, `image-error`, `upscale-fail`, `video-fail`.
#[derive(Default)]
pub struct FakeMedia {
    staggered: bool,
    image_calls: AtomicUsize,
    video_calls: Mutex<Vec<String>>,
}

impl FakeMedia {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Earlier image requests finish later, so completion order is the
    /// reverse of dispatch order.
    pub fn staggered() -> Arc<Self> {
        Arc::new(Self {
            staggered: true,
            ..Self::default()
        })
    }

    pub fn image_calls(&self) -> usize {
        self.image_calls.load(Ordering::SeqCst)
    }

    pub fn video_calls(&self) -> Vec<String> {
        self.video_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaGenerator for FakeMedia {
    async fn generate_image(&self, prompt: &str) -> Result<Option<String>, ProviderError> {
        let n = self.image_calls.fetch_add(1, Ordering::SeqCst);
        if self.staggered {
            let wait = 20 * (5 - n.min(5)) as u64;
            tokio::time::sleep(Duration::from_millis(wait)).await;
        }
        if prompt.contains("image-error") {
            return Err(ProviderError::new("fake", "image service unavailable"));
        }
        if prompt.contains("no-image") {
            return Ok(None);
        }
        Ok(Some(format!("https://img.test/original/{prompt}")))
    }

    async fn upscale_image(&self, image_url: &str) -> Result<Option<String>, ProviderError> {
        if image_url.contains("upscale-fail") {
            return Err(ProviderError::new("fake", "upscaler crashed"));
        }
        Ok(Some(image_url.replace("/original/", "/upscaled/")))
    }

    async fn image_to_video(
        &self,
        image_url: &str,
        _motion_prompt: &str,
    ) -> Result<Option<String>, ProviderError> {
        self.video_calls.lock().unwrap().push(image_url.to_string());
        if image_url.contains("video-fail") {
            return Err(ProviderError::new("fake", "video model rejected the image"));
        }
        Ok(Some(image_url.replace("/upscaled/", "/video/")))
    }
}

pub fn expansion_reply(base_prompt: &str, aspects: &[&str]) -> String {
    json!({ "basePrompt": base_prompt, "aspects": aspects }).to_string()
}

/// One variation per aspect; the reasoning names the aspect it targets.
pub fn variations_reply(texts: &[&str], aspects: &[&str]) -> String {
    let items: Vec<_> = texts
        .iter()
        .zip(aspects)
        .map(|(text, aspect)| {
            json!({ "variation": text, "reasoning": format!("targets aspect {aspect}") })
        })
        .collect();
    json!({ "variations": items }).to_string()
}

pub fn studio(llm: Arc<ScriptedLlm>, media: Arc<FakeMedia>) -> VariationStudio {
    studio_with(llm, media, PromptTemplates::default().without_repair())
}

pub fn studio_with(
    llm: Arc<ScriptedLlm>,
    media: Arc<FakeMedia>,
    templates: PromptTemplates,
) -> VariationStudio {
    VariationStudio::new(llm, media, templates)
}

/// LLM scripted for a full successful run with the given variation texts.
pub fn happy_llm(texts: &[&str]) -> Arc<ScriptedLlm> {
    ScriptedLlm::replying(vec![
        expansion_reply("a barista walking a runway", &ASPECTS),
        variations_reply(texts, &ASPECTS),
    ])
}

pub mod openai;
pub mod replicate;

use crate::error::ProviderError;
use async_trait::async_trait;

pub use openai::OpenAiClient;
pub use replicate::{ReplicateClient, ReplicateModels};

/// A chat-completion endpoint asked to answer with a JSON object.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Returns the raw message text; parsing is left to the caller.
    async fn complete_json(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
    ) -> Result<String, ProviderError>;
}

/// Image generation, upscaling and image-to-video. Every call yields the
/// URL of the produced asset, or `None` when the service returned nothing.
#[async_trait]
pub trait MediaGenerator: Send + Sync {
    async fn generate_image(&self, prompt: &str) -> Result<Option<String>, ProviderError>;

    async fn upscale_image(&self, image_url: &str) -> Result<Option<String>, ProviderError>;

    async fn image_to_video(
        &self,
        image_url: &str,
        motion_prompt: &str,
    ) -> Result<Option<String>, ProviderError>;
}

use crate::api::LanguageModel;
use crate::error::{GenerationError, Result};
use crate::prompts::PromptTemplates;
use crate::schema::{self, Variation, VARIATION_COUNT};
use crate::{logi, logok};

/// Asks for one variation of `base_prompt` per aspect. The returned vector
/// has exactly five entries and entry `i` targets `aspects[i]`.
pub async fn generate_variations(
    llm: &dyn LanguageModel,
    templates: &PromptTemplates,
    base_prompt: &str,
    aspects: &[String],
) -> Result<Vec<Variation>> {
    if aspects.len() != VARIATION_COUNT {
        return Err(GenerationError::InvalidArgument(format!(
            "Exactly {} variators are required",
            VARIATION_COUNT
        )));
    }

    logi(format!("Generating variations for prompt: {}", base_prompt));
    let raw = llm
        .complete_json(
            &templates.variations_system,
            &templates.variations_user_message(base_prompt, aspects),
            templates.variations_temperature,
        )
        .await?;

    let value = schema::parse_reply(&raw)?;
    let mut variations = schema::decode_variations(&value)?;

    for variation in variations.iter_mut() {
        templates.repair(&mut variation.text);
    }
    logok(format!("Validated {} variations", variations.len()));
    Ok(variations)
}
